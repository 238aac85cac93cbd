//! 运行时错误.

use crate::corrector::CorrectorError;
use crate::fitting::FitError;
use std::fmt::{Display, Formatter};

/// 使整张图的重建失败的错误.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoError {
    /// 参数不合法.
    InvalidOptions(String),

    /// 校正器期望的射线条数与参数不一致.
    RayCountMismatch {
        /// 参数中的射线条数.
        configured: usize,
        /// 校正器期望的射线条数.
        corrector: usize,
    },

    /// 校正器在处理某个实例时失败.
    ///
    /// 用未校正的长度代替会悄悄得到错误的物理尺寸, 所以整张图都不输出.
    Corrector {
        /// 出错的实例编号.
        id: u32,
        /// 校正器返回的错误.
        source: CorrectorError,
    },
}

impl Display for RecoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::RayCountMismatch {
                configured,
                corrector,
            } => write!(
                f,
                "corrector expects {corrector} rays but {configured} are configured"
            ),
            Self::Corrector { id, source } => write!(f, "instance {id}: {source}"),
        }
    }
}

impl std::error::Error for RecoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Corrector { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 重建结果.
pub type RecoResult<T> = Result<T, RecoError>;

/// 单个实例被跳过的原因. 不影响同一张图中的其它实例.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// 重试后椭圆拟合仍然失败.
    EllipseFit(FitError),

    /// 射线端点找不到长轴或短轴.
    MinorAxis,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EllipseFit(e) => write!(f, "ellipse fit failed: {e}"),
            Self::MinorAxis => write!(f, "no minor axis found"),
        }
    }
}

/// 被跳过的实例.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skipped {
    /// 实例编号.
    pub id: u32,

    /// 原因.
    pub reason: SkipReason,
}
