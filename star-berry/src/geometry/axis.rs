use crate::Idx2dF;

#[inline]
pub(crate) fn dist((h0, w0): Idx2dF, (h1, w1): Idx2dF) -> f64 {
    (h1 - h0).hypot(w1 - w0)
}

/// 穷举所有点对, 返回距离最大的一对.
///
/// 距离相同时保留最先遇到的一对, 结果只取决于输入顺序. 所有点重合 (或少于 2 个点)
/// 时返回 `None`.
pub fn max_dist_axis(points: &[Idx2dF]) -> Option<(Idx2dF, Idx2dF)> {
    let mut max_dist = 0.0;
    let mut ans = None;
    for (i, &p1) in points.iter().enumerate() {
        for &p2 in &points[i + 1..] {
            let d = dist(p1, p2);
            if d > max_dist {
                max_dist = d;
                ans = Some((p1, p2));
            }
        }
    }
    ans
}

/// 筛选出 "大致垂直于" `major` 方向的点.
///
/// 设 `v` 为点到 `center` 的向量, 当 `|cos<major, v>| < 1 / |v|` 时保留该点.
/// 容差随着到中心的距离增大而收紧. 与中心重合的点不会被保留.
/// `major` 为零向量时返回空.
pub fn perpendicular_points(points: &[Idx2dF], center: Idx2dF, major: Idx2dF) -> Vec<Idx2dF> {
    let major_norm = major.0.hypot(major.1);
    if major_norm == 0.0 {
        return Vec::new();
    }
    points
        .iter()
        .copied()
        .filter(|&p| {
            let v = (center.0 - p.0, center.1 - p.1);
            let v_norm = v.0.hypot(v.1);
            if v_norm == 0.0 {
                return false;
            }
            let cos = (major.0 * v.0 + major.1 * v.1).abs() / (major_norm * v_norm);
            cos < 1.0 / v_norm
        })
        .collect()
}
