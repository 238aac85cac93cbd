//! 气泡记录.

use crate::fitting::EllipseFit;
use crate::geometry::{ellipsoid_volume, sphere_diameter, AxisMeasure};
use crate::Idx2dF;
use itertools::Itertools;
use std::f64::consts::PI;

/// 重建方法.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// 有校正器时用 RDC, 否则用椭圆拟合.
    #[default]
    Auto,

    /// 总是用 RDC. 没有校正器时直接使用原始射线长度.
    Rdc,

    /// 总是用椭圆拟合.
    Ellipse,
}

/// 表格的长度单位.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    /// 像素.
    Pixel,

    /// 物理单位 (像素 × `metric`).
    Physical,
}

/// 一个重建完成的气泡. 构造后不可变.
///
/// 除 `position` 外, 所有长度都是物理单位.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bubble {
    id: u32,
    position: Idx2dF,
    major: f64,
    minor: f64,
    volume: f64,
    diameter: f64,
    rays: Option<Vec<f64>>,
    touches_neighbor: bool,
    method: Method,
}

impl Bubble {
    /// 由 RDC 端点的长短轴构造.
    pub(crate) fn from_axes(
        id: u32,
        axes: &AxisMeasure,
        metric: f64,
        rays: Vec<f64>,
        touches_neighbor: bool,
    ) -> Self {
        let (major, minor) = axes.semi_axes(metric);
        let volume = ellipsoid_volume(major, minor);
        Self {
            id,
            position: axes.center,
            major,
            minor,
            volume,
            diameter: sphere_diameter(volume),
            rays: Some(rays),
            touches_neighbor,
            method: Method::Rdc,
        }
    }

    /// 由椭圆拟合结果构造. 椭圆路径从不标记接触.
    pub(crate) fn from_ellipse(id: u32, fit: &EllipseFit, metric: f64) -> Self {
        let major = fit.a.max(fit.b) * metric;
        let minor = fit.a.min(fit.b) * metric;
        let volume = ellipsoid_volume(major, minor);
        Self {
            id,
            position: fit.center,
            major,
            minor,
            volume,
            diameter: sphere_diameter(volume),
            rays: None,
            touches_neighbor: false,
            method: Method::Ellipse,
        }
    }

    /// 实例编号.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 中心 `(行, 列)`, 像素.
    #[inline]
    pub fn position(&self) -> Idx2dF {
        self.position
    }

    /// 长半轴.
    #[inline]
    pub fn major(&self) -> f64 {
        self.major
    }

    /// 短半轴.
    #[inline]
    pub fn minor(&self) -> f64 {
        self.minor
    }

    /// 旋转椭球体积.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// 等体积球直径.
    #[inline]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// 射线长度. 只有 RDC 路径有.
    #[inline]
    pub fn rays(&self) -> Option<&[f64]> {
        self.rays.as_deref()
    }

    /// 是否与相邻气泡或图像边缘接触 (多于一条被遮挡射线).
    #[inline]
    pub fn touches_neighbor(&self) -> bool {
        self.touches_neighbor
    }

    /// 实际使用的重建方法, 只会是 [`Method::Rdc`] 或 [`Method::Ellipse`].
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// 椭圆截面面积 `π · major · minor`.
    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.major * self.minor
    }

    /// 旧版表格中的 `Type` 列.
    ///
    /// 旧表格的字段名与含义相反 (名为 "solitary", 实际 1 表示接触), 数值上:
    /// `1` = 与邻居接触, `0` = 孤立. 读取旧数据时按数值对应即可, 不要按字段名取反.
    #[inline]
    pub fn legacy_overlap_flag(&self) -> u8 {
        u8::from(self.touches_neighbor)
    }

    /// 表头 `STT,Center_X,Center_Y,Axis_1,Axis_2,Area,Type,Ray_1..Ray_n`.
    pub fn csv_header(ray_count: usize) -> String {
        ["STT", "Center_X", "Center_Y", "Axis_1", "Axis_2", "Area", "Type"]
            .into_iter()
            .map(String::from)
            .chain((1..=ray_count).map(|k| format!("Ray_{k}")))
            .join(",")
    }

    /// 表格中的一行. `index` 是从 1 开始的序号.
    ///
    /// 中心坐标总是像素 (`Center_X` 为列, `Center_Y` 为行); 轴长为全长 (半轴 × 2).
    /// 没有射线时填 `ray_count` 个 `0`.
    pub fn csv_record(&self, index: usize, metric: f64, unit: Unit, ray_count: usize) -> String {
        let scale = match unit {
            Unit::Pixel => 1.0 / metric,
            Unit::Physical => 1.0,
        };
        let head = format!(
            "{index},{},{},{},{},{},{}",
            self.position.1,
            self.position.0,
            2.0 * self.major * scale,
            2.0 * self.minor * scale,
            self.area() * scale * scale,
            self.legacy_overlap_flag()
        );
        let rays = match &self.rays {
            Some(rays) => rays.iter().map(|r| r * scale).join(","),
            None => std::iter::repeat("0").take(ray_count).join(","),
        };
        if rays.is_empty() {
            head
        } else {
            format!("{head},{rays}")
        }
    }
}
