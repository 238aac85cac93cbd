//! 径向距离编码 (Radial Distance Coding, RDC).
//!
//! 以实例质心为原点, 沿 `ray_count` 条等角间隔的射线向外生长, 用射线长度描述实例边界.
//! 本模块负责采样 ([`RdSample::cast`]), 遮挡判别 ([`RdSample::classify`]),
//! 以及把校正后的长度写回端点 ([`RdSample::stretch`]).

mod cast;
mod classify;
mod smooth;

use crate::consts::OCCLUSION_THRESHOLD;
use crate::{Idx2dF, Idx2dI};
use std::f64::consts::TAU;

pub use smooth::{moving_average, SmoothBoundary};

/// 一条射线的端点.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayPoint {
    /// 行坐标.
    pub row: i64,

    /// 列坐标.
    pub col: i64,

    /// 端点是否被遮挡 (与其它实例或图像边缘接触).
    pub occluded: bool,
}

impl RayPoint {
    /// 以未遮挡状态初始化.
    #[inline]
    pub fn new(row: i64, col: i64) -> Self {
        Self {
            row,
            col,
            occluded: false,
        }
    }

    /// `(行, 列)` 整数坐标.
    #[inline]
    pub fn pos(&self) -> Idx2dI {
        (self.row, self.col)
    }

    /// `(行, 列)` 浮点坐标.
    #[inline]
    pub fn pos_f64(&self) -> Idx2dF {
        (self.row as f64, self.col as f64)
    }
}

/// 第 `k` 条射线的角度, 共 `ray_count` 条. 取值范围 `[0, 2π)`.
#[inline]
pub fn ray_angle(k: usize, ray_count: usize) -> f64 {
    TAU * k as f64 / ray_count as f64
}

/// 第 `k` 条射线在图像坐标中的单位方向 `(Δ行, Δ列) = (sin θ, cos θ)`.
#[inline]
pub fn ray_direction(k: usize, ray_count: usize) -> Idx2dF {
    let (sin, cos) = ray_angle(k, ray_count).sin_cos();
    (sin, cos)
}

/// 单个实例的 RDC 采样结果.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RdSample {
    id: u32,
    center: Idx2dF,
    pixel_count: usize,

    /// 射线长度 (像素).
    ray_lengths: Vec<f64>,

    ray_points: Vec<RayPoint>,
}

impl RdSample {
    /// 实例编号.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 射线条数.
    #[inline]
    pub fn ray_count(&self) -> usize {
        self.ray_points.len()
    }

    /// 实例质心 `(行, 列)`.
    #[inline]
    pub fn center(&self) -> Idx2dF {
        self.center
    }

    /// 实例的原始像素个数.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// 射线长度 (像素).
    #[inline]
    pub fn ray_lengths(&self) -> &[f64] {
        &self.ray_lengths
    }

    /// 射线端点, 与 [`ray_angle`] 一一对应.
    #[inline]
    pub fn ray_points(&self) -> &[RayPoint] {
        &self.ray_points
    }

    /// 第 `k` 条射线的角度.
    #[inline]
    pub fn angle(&self, k: usize) -> f64 {
        ray_angle(k, self.ray_count())
    }

    /// 被遮挡射线的条数.
    #[inline]
    pub fn count_occluded(&self) -> usize {
        self.ray_points.iter().filter(|p| p.occluded).count()
    }

    /// 实例是否与邻居接触. 单条遮挡射线不算.
    #[inline]
    pub fn touches_neighbor(&self) -> bool {
        self.count_occluded() > OCCLUSION_THRESHOLD
    }

    /// 所有端点的整数坐标.
    pub fn points(&self) -> Vec<Idx2dI> {
        self.ray_points.iter().map(RayPoint::pos).collect()
    }

    /// 未遮挡端点的浮点坐标. 它们是椭圆拟合的可信边缘样本.
    pub fn trusted_points(&self) -> Vec<Idx2dF> {
        self.ray_points
            .iter()
            .filter(|p| !p.occluded)
            .map(RayPoint::pos_f64)
            .collect()
    }

    /// 所有端点的浮点坐标.
    pub fn all_points(&self) -> Vec<Idx2dF> {
        self.ray_points.iter().map(RayPoint::pos_f64).collect()
    }

    /// 物理单位下的射线长度.
    pub fn lengths_physical(&self, metric: f64) -> Vec<f64> {
        self.ray_lengths.iter().map(|&l| l * metric).collect()
    }

    /// 以新的射线长度 (像素) 重写长度和端点. 端点坐标向零截断, 可能越出图像.
    ///
    /// 遮挡标记保持不变.
    ///
    /// # 注意
    ///
    /// `lengths` 的长度必须与射线条数相同, 否则 panic. 调用方负责校验.
    pub fn stretch(&mut self, lengths: &[f64]) {
        assert_eq!(lengths.len(), self.ray_count(), "射线条数不一致");
        let n = self.ray_count();
        let (c_row, c_col) = self.center;
        for (k, (&len, point)) in lengths.iter().zip(self.ray_points.iter_mut()).enumerate() {
            let (d_row, d_col) = ray_direction(k, n);
            point.row = (c_row + d_row * len) as i64;
            point.col = (c_col + d_col * len) as i64;
        }
        self.ray_lengths = lengths.to_vec();
    }
}
