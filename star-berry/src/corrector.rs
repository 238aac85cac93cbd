//! 射线长度校正接口.
//!
//! 校正模型 (通常是一个学习得到的映射) 不在本 crate 的范围内,
//! 这里只定义它与重建流程之间的边界: 物理单位的射线长度进, 物理单位的射线长度出.

use std::fmt::{Display, Formatter};

/// 校正失败.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectorError {
    /// 校正模型自身报告的错误.
    Model(String),

    /// 输出长度与输入不一致. 第一个参数为期望长度, 第二个为实际长度.
    LengthMismatch(usize, usize),

    /// 输出中含有 NaN 或无穷. 参数为第一个非法值的下标.
    NonFinite(usize),

    /// 输出中含有负长度. 参数为第一个负值的下标.
    Negative(usize),
}

impl Display for CorrectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(msg) => write!(f, "corrector failed: {msg}"),
            Self::LengthMismatch(want, got) => {
                write!(f, "corrector returned {got} lengths, expected {want}")
            }
            Self::NonFinite(k) => write!(f, "corrector returned a non-finite length at ray {k}"),
            Self::Negative(k) => write!(f, "corrector returned a negative length at ray {k}"),
        }
    }
}

impl std::error::Error for CorrectorError {}

/// 射线长度校正器.
///
/// 实现必须是同步的纯函数: 相同的输入总是给出相同的输出, 不依赖外部可变状态.
/// 重建流程只在实例的被遮挡射线多于一条时调用它.
pub trait ShapeCorrector {
    /// 把 `lengths` (物理单位) 映射为校正后的长度 (物理单位), 长度应保持不变.
    fn correct(&self, lengths: &[f64]) -> Result<Vec<f64>, CorrectorError>;

    /// 模型期望的射线条数. `None` 表示不限.
    fn ray_count(&self) -> Option<usize> {
        None
    }
}

impl<T: ShapeCorrector + ?Sized> ShapeCorrector for &T {
    #[inline]
    fn correct(&self, lengths: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        (**self).correct(lengths)
    }

    #[inline]
    fn ray_count(&self) -> Option<usize> {
        (**self).ray_count()
    }
}

/// 调用校正器, 并检查输出的长度与数值.
pub fn checked_correct<C: ShapeCorrector + ?Sized>(
    corrector: &C,
    lengths: &[f64],
) -> Result<Vec<f64>, CorrectorError> {
    let out = corrector.correct(lengths)?;
    if out.len() != lengths.len() {
        return Err(CorrectorError::LengthMismatch(lengths.len(), out.len()));
    }
    if let Some(k) = out.iter().position(|v| !v.is_finite()) {
        return Err(CorrectorError::NonFinite(k));
    }
    if let Some(k) = out.iter().position(|&v| v < 0.0) {
        return Err(CorrectorError::Negative(k));
    }
    Ok(out)
}

/// 原样返回输入的校正器.
///
/// 配合滑动平均使用时, 效果等价于只对射线长度做平滑.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityCorrector;

impl ShapeCorrector for IdentityCorrector {
    #[inline]
    fn correct(&self, lengths: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Ok(lengths.to_vec())
    }
}

/// 用闭包实现的校正器.
pub struct FnCorrector<F> {
    f: F,
    ray_count: Option<usize>,
}

impl<F> FnCorrector<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, CorrectorError>,
{
    /// 以闭包初始化, 不限制射线条数.
    #[inline]
    pub fn new(f: F) -> Self {
        Self { f, ray_count: None }
    }

    /// 限定模型期望的射线条数.
    #[inline]
    pub fn with_ray_count(mut self, ray_count: usize) -> Self {
        self.ray_count = Some(ray_count);
        self
    }
}

impl<F> ShapeCorrector for FnCorrector<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, CorrectorError>,
{
    #[inline]
    fn correct(&self, lengths: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        (self.f)(lengths)
    }

    #[inline]
    fn ray_count(&self) -> Option<usize> {
        self.ray_count
    }
}

impl<F> std::fmt::Debug for FnCorrector<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCorrector")
            .field("ray_count", &self.ray_count)
            .finish_non_exhaustive()
    }
}
