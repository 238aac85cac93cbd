use super::{RecoError, RecoResult};
use crate::bubble::Method;
use crate::consts::{DEFAULT_AREA_RATIO, DEFAULT_RAY_COUNT, MIN_RAY_COUNT};
use crate::rdc::SmoothBoundary;
use crate::visual::ColorSource;

/// 重建参数.
///
/// 默认值: 64 条射线, `metric = 1.0`, [`Method::Auto`], 循环平滑,
/// 面积上限 20 倍, 不收集可视化描述符.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecoOptions {
    /// 射线条数, 至少为 3. 必须与校正器期望的输入长度一致.
    pub ray_count: usize,

    /// 每个像素对应的物理长度, 必须为有限正数.
    pub metric: f64,

    /// 重建方法.
    pub method: Method,

    /// 校正结果滑动平均的边界规则.
    pub smooth: SmoothBoundary,

    /// 椭圆面积上限与实例像素数之比, 至少为 1.
    pub area_ratio: f64,

    /// 是否收集可视化描述符.
    pub collect_visuals: bool,

    /// 可视化颜色来源.
    pub colors: ColorSource,
}

impl Default for RecoOptions {
    fn default() -> Self {
        Self {
            ray_count: DEFAULT_RAY_COUNT,
            metric: 1.0,
            method: Method::Auto,
            smooth: SmoothBoundary::Wrap,
            area_ratio: DEFAULT_AREA_RATIO,
            collect_visuals: false,
            colors: ColorSource::default(),
        }
    }
}

impl RecoOptions {
    /// 设置射线条数.
    #[inline]
    pub fn ray_count(mut self, ray_count: usize) -> Self {
        self.ray_count = ray_count;
        self
    }

    /// 设置像素的物理长度.
    #[inline]
    pub fn metric(mut self, metric: f64) -> Self {
        self.metric = metric;
        self
    }

    /// 设置重建方法.
    #[inline]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// 设置平滑边界规则.
    #[inline]
    pub fn smooth(mut self, smooth: SmoothBoundary) -> Self {
        self.smooth = smooth;
        self
    }

    /// 设置椭圆面积上限倍数.
    #[inline]
    pub fn area_ratio(mut self, area_ratio: f64) -> Self {
        self.area_ratio = area_ratio;
        self
    }

    /// 收集可视化描述符, 颜色取自 `colors`.
    #[inline]
    pub fn visuals(mut self, colors: ColorSource) -> Self {
        self.collect_visuals = true;
        self.colors = colors;
        self
    }

    /// 检查参数是否合法.
    pub fn validate(&self) -> RecoResult<()> {
        if !(self.metric.is_finite() && self.metric > 0.0) {
            return Err(RecoError::InvalidOptions(format!(
                "metric must be a positive finite number, got {}",
                self.metric
            )));
        }
        if self.ray_count < MIN_RAY_COUNT {
            return Err(RecoError::InvalidOptions(format!(
                "ray_count must be at least {MIN_RAY_COUNT}, got {}",
                self.ray_count
            )));
        }
        if !(self.area_ratio >= 1.0) {
            return Err(RecoError::InvalidOptions(format!(
                "area_ratio must be at least 1, got {}",
                self.area_ratio
            )));
        }
        Ok(())
    }
}
