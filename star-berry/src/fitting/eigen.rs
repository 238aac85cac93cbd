//! 3×3 特征值问题与实系数三次方程.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

/// 求解约化后的广义特征值问题 `M a = λ C a`, 其中 `system = C⁻¹ M`.
///
/// 由特征多项式求出全部实特征值, 再用伴随矩阵求对应的特征向量.
/// 只保留满足椭圆约束 `4 a₀ a₂ - a₁² > 0` 的特征向量; 有多个时取 `|λ|` 最小者.
pub(crate) fn solve_reduced_3x3(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let a = system;
    let tr = a.trace();
    let minor_sum = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)] + a[(0, 0)] * a[(2, 2)]
        - a[(0, 2)] * a[(2, 0)]
        + a[(1, 1)] * a[(2, 2)]
        - a[(1, 2)] * a[(2, 1)];
    let det = a.determinant();

    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in solve_cubic_real(1.0, -tr, minor_sum, -det) {
        let shifted = system - Matrix3::identity() * ev;
        let v = match null_vector_3x3(&shifted) {
            Some(v) => v,
            None => continue,
        };
        if 4.0 * v[0] * v[2] - v[1] * v[1] <= 0.0 {
            continue;
        }
        if best.map_or(true, |(b, _)| ev.abs() < b) {
            best = Some((ev.abs(), v));
        }
    }
    best.map(|(_, v)| v)
}

/// 秩为 2 的 3×3 矩阵的单位零向量.
///
/// 伴随矩阵的每一行都与零向量成比例, 取范数最大的一行. 矩阵秩过低时返回 `None`.
pub(crate) fn null_vector_3x3(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows = [
        Vector3::new(
            m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
            -(m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)]),
            m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)],
        ),
        Vector3::new(
            -(m[(0, 1)] * m[(2, 2)] - m[(0, 2)] * m[(2, 1)]),
            m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
            -(m[(0, 0)] * m[(2, 1)] - m[(0, 1)] * m[(2, 0)]),
        ),
        Vector3::new(
            m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
            -(m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)]),
            m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        ),
    ];
    let best = rows
        .iter()
        .max_by(|x, y| x.norm_squared().total_cmp(&y.norm_squared()))?;
    let norm_sq = best.norm_squared();
    if !(norm_sq >= 1e-30) {
        return None;
    }
    Some(best / norm_sq.sqrt())
}

/// 求 `a x³ + b x² + c x + d = 0` 的全部实根 (1 个或 3 个, 重根重复给出).
pub(crate) fn solve_cubic_real(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    // 化为 t³ + p t + q = 0, x = t - b / 3a.
    let (b, c, d) = (b / a, c / a, d / a);
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = -b / 3.0;

    let disc = -4.0 * p * p * p - 27.0 * q * q;
    if disc >= 0.0 {
        let r = (-p / 3.0).sqrt();
        let cos_arg = if r.abs() < 1e-15 {
            0.0
        } else {
            (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        (0..3)
            .map(|k| 2.0 * r * ((theta + 2.0 * PI * k as f64) / 3.0).cos() + shift)
            .collect()
    } else {
        let sqrt_disc = (q * q / 4.0 + p * p * p / 27.0).sqrt();
        vec![(-q / 2.0 + sqrt_disc).cbrt() + (-q / 2.0 - sqrt_disc).cbrt() + shift]
    }
}
