use crate::consts::SMOOTH_WIDTH;

/// 滑动平均的边界处理规则.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmoothBoundary {
    /// 循环延拓. 射线按角度排列, 首尾两条在圆周上相邻.
    #[default]
    Wrap,

    /// 镜像延拓 `(d c b a | a b c d | d c b a)`, 旧版表格用的就是这种规则.
    Reflect,
}

impl SmoothBoundary {
    /// 把越界的下标 `i` 映射回 `[0, n)`.
    fn index(self, i: isize, n: usize) -> usize {
        let n = n as isize;
        match self {
            Self::Wrap => i.rem_euclid(n) as usize,
            Self::Reflect => {
                let m = i.rem_euclid(2 * n);
                (if m < n { m } else { 2 * n - 1 - m }) as usize
            }
        }
    }
}

/// 宽度为 [`SMOOTH_WIDTH`] 的滑动平均.
///
/// 第 `i` 个输出是输入在窗口 `[i - 2, i + 1]` 上的均值, 越界下标按 `boundary` 映射.
/// 空输入返回空.
pub fn moving_average(values: &[f64], boundary: SmoothBoundary) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let lo = -(SMOOTH_WIDTH as isize / 2);
    let hi = lo + SMOOTH_WIDTH as isize;
    (0..n as isize)
        .map(|i| {
            let sum: f64 = (i + lo..i + hi)
                .map(|j| values[boundary.index(j, n)])
                .sum();
            sum / SMOOTH_WIDTH as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_index() {
        let n = 5;
        assert_eq!(SmoothBoundary::Wrap.index(-1, n), 4);
        assert_eq!(SmoothBoundary::Wrap.index(-2, n), 3);
        assert_eq!(SmoothBoundary::Wrap.index(5, n), 0);
        assert_eq!(SmoothBoundary::Reflect.index(-1, n), 0);
        assert_eq!(SmoothBoundary::Reflect.index(-2, n), 1);
        assert_eq!(SmoothBoundary::Reflect.index(5, n), 4);
        assert_eq!(SmoothBoundary::Reflect.index(6, n), 3);
        assert_eq!(SmoothBoundary::Reflect.index(2, n), 2);
    }

    #[test]
    fn test_constant_is_fixed_point() {
        let values = vec![3.5; 64];
        for b in [SmoothBoundary::Wrap, SmoothBoundary::Reflect] {
            assert!(moving_average(&values, b).iter().all(|&v| f64_eq(v, 3.5)));
        }
    }

    #[test]
    fn test_moving_average() {
        let values = [0.0, 4.0, 8.0, 0.0, 4.0, 8.0];
        let wrap = moving_average(&values, SmoothBoundary::Wrap);
        // i = 0: [4, 8, 0, 4] -> 4.
        assert!(f64_eq(wrap[0], 4.0));
        // i = 2: [0, 4, 8, 0] -> 3.
        assert!(f64_eq(wrap[2], 3.0));

        let reflect = moving_average(&values, SmoothBoundary::Reflect);
        // i = 0: [4, 0, 0, 4] -> 2.
        assert!(f64_eq(reflect[0], 2.0));
        // i = 5: [0, 4, 8, 8] -> 5.
        assert!(f64_eq(reflect[5], 5.0));
        assert!(f64_eq(reflect[2], wrap[2]));

        // 循环延拓下总和不变.
        let s0: f64 = values.iter().sum();
        let s1: f64 = wrap.iter().sum();
        assert!(f64_eq(s0, s1));
        assert!(moving_average(&[], SmoothBoundary::Wrap).is_empty());
    }
}
