//! 由边界点集计算长短轴与等效尺寸.

mod axis;
mod perimeter;

use crate::{Idx2dF, Idx2dI};
use std::f64::consts::PI;

pub use axis::{max_dist_axis, perpendicular_points};
pub use perimeter::{line, polygon_perimeter};

/// 一组边界点的长短轴.
///
/// 两个轴的端点都取自 (可能经过周长加密的) 输入点集, 因此单位是像素.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisMeasure {
    /// 输入点集的质心 `(行, 列)`.
    pub center: Idx2dF,

    /// 长轴的两个端点.
    pub major: (Idx2dF, Idx2dF),

    /// 短轴的两个端点.
    pub minor: (Idx2dF, Idx2dF),
}

impl AxisMeasure {
    /// 长轴全长 (像素).
    #[inline]
    pub fn major_len(&self) -> f64 {
        axis::dist(self.major.0, self.major.1)
    }

    /// 短轴全长 (像素).
    #[inline]
    pub fn minor_len(&self) -> f64 {
        axis::dist(self.minor.0, self.minor.1)
    }

    /// 物理单位下的 `(长半轴, 短半轴)`.
    #[inline]
    pub fn semi_axes(&self, metric: f64) -> (f64, f64) {
        (
            self.major_len() / 2.0 * metric,
            self.minor_len() / 2.0 * metric,
        )
    }
}

/// 计算点集的长短轴.
///
/// 1. 长轴: 所有点对中距离最远的一对;
/// 2. 短轴: 在与长轴大致垂直的点 (见 [`perpendicular_points`]) 中再找最远点对;
/// 3. 垂直点少于 2 个时, 沿 `points` 依次连成的闭合多边形逐像素加密后重新筛选.
///
/// 长轴不存在 (所有点重合), 或加密后仍找不到短轴时返回 `None`.
pub fn major_minor(points: &[Idx2dI]) -> Option<AxisMeasure> {
    if points.is_empty() {
        return None;
    }
    let pts_f: Vec<Idx2dF> = points.iter().map(|&(h, w)| (h as f64, w as f64)).collect();
    let n = pts_f.len() as f64;
    let center = (
        pts_f.iter().map(|p| p.0).sum::<f64>() / n,
        pts_f.iter().map(|p| p.1).sum::<f64>() / n,
    );

    let major = max_dist_axis(&pts_f)?;
    let major_vec = (major.1 .0 - major.0 .0, major.1 .1 - major.0 .1);

    let mut perp = perpendicular_points(&pts_f, center, major_vec);
    if perp.len() < 2 {
        let dense: Vec<Idx2dF> = polygon_perimeter(points)
            .into_iter()
            .map(|(h, w)| (h as f64, w as f64))
            .collect();
        perp = perpendicular_points(&dense, center, major_vec);
    }
    let minor = max_dist_axis(&perp)?;

    Some(AxisMeasure {
        center,
        major,
        minor,
    })
}

/// 旋转椭球体积 `4/3 · π · major² · minor`. 参数为半轴长.
#[inline]
pub fn ellipsoid_volume(major: f64, minor: f64) -> f64 {
    4.0 / 3.0 * PI * major * major * minor
}

/// 与给定体积等体积的球的直径 `(6V / π)^(1/3)`.
#[inline]
pub fn sphere_diameter(volume: f64) -> f64 {
    (6.0 * volume / PI).cbrt()
}
