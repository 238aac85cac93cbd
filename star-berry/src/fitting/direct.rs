//! 直接最小二乘椭圆拟合 (Fitzgibbon, Pilu & Fisher, 1999; Halíř & Flusser, 1998).

use super::eigen::solve_reduced_3x3;
use super::{ConicFitter, EllipseFit, FitError, FitResult};
use crate::consts::MIN_FIT_POINTS;
use crate::Idx2dF;
use nalgebra::{DMatrix, Matrix3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

/// 一般二次曲线 `A x² + B xy + C y² + D x + E y + F = 0` 的系数.
///
/// 本 crate 中 `x` 为行坐标, `y` 为列坐标.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Conic(pub [f64; 6]);

impl Conic {
    /// 判别式 `B² - 4AC < 0`.
    #[inline]
    pub fn is_ellipse(&self) -> bool {
        let [a, b, c, ..] = self.0;
        b * b - 4.0 * a * c < 0.0
    }

    /// 转换为几何参数. 不是非退化的实椭圆时返回 `Err`.
    pub fn to_ellipse(&self) -> FitResult<EllipseFit> {
        let [a, b, c, d, e, f] = self.0;
        if !self.0.iter().all(|v| v.is_finite()) {
            return Err(FitError::Degenerate);
        }
        if !self.is_ellipse() {
            return Err(FitError::NotAnEllipse);
        }
        let m = Matrix3::new(a, b / 2.0, d / 2.0, b / 2.0, c, e / 2.0, d / 2.0, e / 2.0, f);
        if m.determinant().abs() < 1e-15 {
            return Err(FitError::Degenerate);
        }

        let denom = 4.0 * a * c - b * b;
        let cx = (b * e - 2.0 * c * d) / denom;
        let cy = (b * d - 2.0 * a * e) / denom;

        let phi = if (a - c).abs() < 1e-15 {
            if b > 0.0 {
                FRAC_PI_4
            } else if b < 0.0 {
                -FRAC_PI_4
            } else {
                0.0
            }
        } else {
            0.5 * b.atan2(a - c)
        };

        // 二次型部分的特征值.
        let sum = a + c;
        let diff = ((a - c).powi(2) + b * b).sqrt();
        let (l1, l2) = ((sum + diff) / 2.0, (sum - diff) / 2.0);

        // 中心处的取值.
        let f_c = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
        if f_c.abs() < 1e-15 {
            return Err(FitError::Degenerate);
        }
        let (a_sq, b_sq) = (-f_c / l1, -f_c / l2);
        if !(a_sq > 0.0 && b_sq > 0.0) {
            // 虚椭圆.
            return Err(FitError::NotAnEllipse);
        }

        let (semi_a, semi_b) = (a_sq.sqrt(), b_sq.sqrt());
        let (semi_a, semi_b, phi) = if semi_a >= semi_b {
            (semi_a, semi_b, phi)
        } else {
            (semi_b, semi_a, phi + FRAC_PI_2)
        };

        let fit = EllipseFit {
            center: (cx, cy),
            a: semi_a,
            b: semi_b,
            phi: normalize_angle(phi),
        };
        if fit.is_valid() {
            Ok(fit)
        } else {
            Err(FitError::Degenerate)
        }
    }
}

/// 把角度规范化到 `(-π/2, π/2]`.
fn normalize_angle(mut phi: f64) -> f64 {
    while phi > FRAC_PI_2 {
        phi -= PI;
    }
    while phi <= -FRAC_PI_2 {
        phi += PI;
    }
    phi
}

/// 默认的椭圆拟合器.
///
/// 坐标先平移到质心并缩放到平均距离 `√2`, 在约化的 3×3 问题上求解后再还原.
/// 拟合结果保证是实椭圆 (不会退化成双曲线或抛物线).
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectFitter;

impl DirectFitter {
    /// 拟合一般二次曲线, 不转换为几何参数.
    pub fn fit_conic(&self, points: &[Idx2dF]) -> FitResult<Conic> {
        let n = points.len();
        if n < MIN_FIT_POINTS {
            return Err(FitError::TooFewPoints(n, MIN_FIT_POINTS));
        }

        let (mx, my, s) = normalization(points);
        let mut design = DMatrix::<f64>::zeros(n, 6);
        for (i, &(px, py)) in points.iter().enumerate() {
            let (x, y) = ((px - mx) * s, (py - my) * s);
            design[(i, 0)] = x * x;
            design[(i, 1)] = x * y;
            design[(i, 2)] = y * y;
            design[(i, 3)] = x;
            design[(i, 4)] = y;
            design[(i, 5)] = 1.0;
        }

        // 分块散布矩阵 S = [[S11, S12], [S21, S22]].
        let scatter = design.transpose() * &design;
        let s11 = scatter.fixed_view::<3, 3>(0, 0).into_owned();
        let s12 = scatter.fixed_view::<3, 3>(0, 3).into_owned();
        let s22 = scatter.fixed_view::<3, 3>(3, 3).into_owned();

        let s22_inv = s22.try_inverse().ok_or(FitError::Singular)?;
        let reduced = s11 - s12 * s22_inv * s12.transpose();

        // 约束矩阵 C1 = [[0, 0, 2], [0, -1, 0], [2, 0, 0]] 的逆.
        let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
        let a1 = solve_reduced_3x3(&(c1_inv * reduced)).ok_or(FitError::NotAnEllipse)?;
        let a2 = -s22_inv * s12.transpose() * a1;

        Ok(denormalize(
            [a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]],
            mx,
            my,
            s,
        ))
    }
}

impl ConicFitter for DirectFitter {
    fn fit(&self, points: &[Idx2dF]) -> FitResult<EllipseFit> {
        self.fit_conic(points)?.to_ellipse()
    }
}

/// 返回 `(质心 x, 质心 y, 缩放系数)`.
fn normalization(points: &[Idx2dF]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let my = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| (p.0 - mx).hypot(p.1 - my))
        .sum::<f64>()
        / n;
    let s = if mean_dist > 1e-15 {
        SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mx, my, s)
}

/// 由 `x' = s(x - mx), y' = s(y - my)` 下的系数还原原坐标系下的系数.
fn denormalize(c: [f64; 6], mx: f64, my: f64, s: f64) -> Conic {
    let [a_, b_, c_, d_, e_, f_] = c;
    let s2 = s * s;
    let a = a_ * s2;
    let b = b_ * s2;
    let c = c_ * s2;
    let d = -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s;
    let e = -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s;
    let f = a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my
        + f_;
    Conic([a, b, c, d, e, f])
}
