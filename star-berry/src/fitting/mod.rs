//! 椭圆拟合.
//!
//! 没有射线长度校正器时, 气泡由椭圆拟合给出. 该模块提供拟合接口 [`ConicFitter`],
//! 默认实现 [`DirectFitter`], 以及面积合理性检查与重试策略 [`fit_with_retry`].

mod direct;
mod eigen;

use crate::Idx2dF;
use log::warn;
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

pub use direct::{Conic, DirectFitter};

/// 拟合失败的原因.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitError {
    /// 点数不足.
    ///
    /// 第一个参数代表目前已有的点, 第二个参数代表拟合需要的最少点数.
    TooFewPoints(usize, usize),

    /// 散布矩阵奇异 (例如所有点共线).
    Singular,

    /// 二次曲线不是实椭圆.
    NotAnEllipse,

    /// 参数退化 (NaN, 无穷, 或半轴为零).
    Degenerate,
}

impl Display for FitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints(got, need) => {
                write!(f, "too few points for an ellipse fit: {got} < {need}")
            }
            Self::Singular => write!(f, "singular scatter matrix"),
            Self::NotAnEllipse => write!(f, "fitted conic is not a real ellipse"),
            Self::Degenerate => write!(f, "degenerate ellipse parameters"),
        }
    }
}

impl std::error::Error for FitError {}

/// 拟合结果.
pub type FitResult<T> = Result<T, FitError>;

/// 椭圆的几何参数. 坐标系为 `(行, 列)`, 单位为像素.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipseFit {
    /// 中心 `(行, 列)`.
    pub center: Idx2dF,

    /// 长半轴, `a >= b`.
    pub a: f64,

    /// 短半轴.
    pub b: f64,

    /// 长轴与行方向的夹角, `(-π/2, π/2]`.
    pub phi: f64,
}

impl EllipseFit {
    /// 面积 `π·a·b`.
    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.a * self.b
    }

    /// 所有参数有限, 且半轴为正.
    pub fn is_valid(&self) -> bool {
        self.a > 0.0
            && self.b > 0.0
            && self.a.is_finite()
            && self.b.is_finite()
            && self.center.0.is_finite()
            && self.center.1.is_finite()
            && self.phi.is_finite()
    }

    /// 面积是否落在 `[pixel_count, area_ratio × pixel_count]` 内.
    #[inline]
    pub fn is_plausible(&self, pixel_count: usize, area_ratio: f64) -> bool {
        let p = pixel_count as f64;
        let area = self.area();
        area >= p && area <= area_ratio * p
    }

    /// 在椭圆上均匀取 `n` 个参数点, 用于绘制轮廓.
    pub fn outline(&self, n: usize) -> Vec<Idx2dF> {
        let (sin_p, cos_p) = self.phi.sin_cos();
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                let (u, v) = (self.a * t.cos(), self.b * t.sin());
                (
                    self.center.0 + cos_p * u - sin_p * v,
                    self.center.1 + sin_p * u + cos_p * v,
                )
            })
            .collect()
    }
}

/// 椭圆拟合器.
///
/// 重建流程只依赖这个接口, 因此可以替换为数值上更稳健的实现.
pub trait ConicFitter {
    /// 拟合 `points` (`(行, 列)`, 像素).
    fn fit(&self, points: &[Idx2dF]) -> FitResult<EllipseFit>;
}

impl<T: ConicFitter + ?Sized> ConicFitter for &T {
    #[inline]
    fn fit(&self, points: &[Idx2dF]) -> FitResult<EllipseFit> {
        (**self).fit(points)
    }
}

impl<T: ConicFitter + ?Sized> ConicFitter for Box<T> {
    #[inline]
    fn fit(&self, points: &[Idx2dF]) -> FitResult<EllipseFit> {
        (**self).fit(points)
    }
}

/// 重试策略的输出.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RetryFit {
    /// 最终采用的椭圆.
    pub fit: EllipseFit,

    /// 是否改用了全部端点 (含被遮挡的) 重新拟合.
    pub used_all_points: bool,
}

/// 带面积检查的椭圆拟合.
///
/// 1. 先拟合可信端点 `trusted`;
/// 2. 拟合失败, 或面积不在 `[P, area_ratio × P]` 内 (`P = pixel_count`),
///   则改用全部端点 `all` 重新拟合;
/// 3. 重新拟合的结果只要数值上有效就被接受, 否则返回该次的错误.
pub fn fit_with_retry<F: ConicFitter + ?Sized>(
    fitter: &F,
    trusted: &[Idx2dF],
    all: &[Idx2dF],
    pixel_count: usize,
    area_ratio: f64,
) -> FitResult<RetryFit> {
    match fitter.fit(trusted) {
        Ok(fit) if fit.is_plausible(pixel_count, area_ratio) => {
            return Ok(RetryFit {
                fit,
                used_all_points: false,
            });
        }
        Ok(fit) => warn!(
            "椭圆面积 {:.1} 不在 [{pixel_count}, {:.1}] 内, 改用全部端点重新拟合",
            fit.area(),
            area_ratio * pixel_count as f64
        ),
        Err(e) => warn!("可信端点拟合失败 ({e}), 改用全部端点重新拟合"),
    }
    let fit = fitter.fit(all)?;
    Ok(RetryFit {
        fit,
        used_all_points: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// 按调用次序依次返回预设结果, 并记录每次收到的点数.
    struct Scripted {
        answers: Vec<FitResult<EllipseFit>>,
        calls: Cell<usize>,
        sizes: std::cell::RefCell<Vec<usize>>,
    }

    impl Scripted {
        fn new(answers: Vec<FitResult<EllipseFit>>) -> Self {
            Self {
                answers,
                calls: Cell::new(0),
                sizes: Default::default(),
            }
        }
    }

    impl ConicFitter for Scripted {
        fn fit(&self, points: &[Idx2dF]) -> FitResult<EllipseFit> {
            let i = self.calls.get();
            self.calls.set(i + 1);
            self.sizes.borrow_mut().push(points.len());
            self.answers[i]
        }
    }

    fn circle(r: f64) -> EllipseFit {
        EllipseFit {
            center: (0.0, 0.0),
            a: r,
            b: r,
            phi: 0.0,
        }
    }

    #[test]
    fn test_is_plausible() {
        let e = circle(10.0); // 面积约 314.16
        assert!(e.is_plausible(300, 20.0));
        assert!(!e.is_plausible(315, 20.0));
        assert!(!e.is_plausible(15, 20.0));
        assert!(e.is_plausible(16, 20.0));
    }

    #[test]
    fn test_first_fit_accepted() {
        let f = Scripted::new(vec![Ok(circle(10.0))]);
        let ans = fit_with_retry(&f, &[(0.0, 0.0); 6], &[(0.0, 0.0); 9], 300, 20.0).unwrap();
        assert!(!ans.used_all_points);
        assert_eq!(f.calls.get(), 1);
    }

    #[test]
    fn test_retry_on_implausible_area() {
        // 第一次面积远小于像素数.
        let f = Scripted::new(vec![Ok(circle(2.0)), Ok(circle(10.0))]);
        let ans = fit_with_retry(&f, &[(0.0, 0.0); 6], &[(0.0, 0.0); 9], 300, 20.0).unwrap();
        assert!(ans.used_all_points);
        assert_eq!(ans.fit, circle(10.0));
        assert_eq!(*f.sizes.borrow(), vec![6, 9]);
    }

    #[test]
    fn test_retry_result_not_rechecked() {
        let f = Scripted::new(vec![Ok(circle(100.0)), Ok(circle(50.0))]);
        let ans = fit_with_retry(&f, &[], &[], 300, 20.0).unwrap();
        assert_eq!(ans.fit, circle(50.0));
    }

    #[test]
    fn test_retry_failure_propagates() {
        let f = Scripted::new(vec![Err(FitError::TooFewPoints(3, 5)), Err(FitError::Singular)]);
        assert_eq!(
            fit_with_retry(&f, &[], &[], 300, 20.0),
            Err(FitError::Singular)
        );
    }

    #[test]
    fn test_retry_with_direct_fitter() {
        // 可信端点拟合出的圆远小于实例; 全部端点则落在半径 10 的圆上.
        let ring = |r: f64, n: usize| -> Vec<Idx2dF> {
            (0..n)
                .map(|k| {
                    let t = 2.0 * PI * k as f64 / n as f64;
                    (25.0 + r * t.sin(), 25.0 + r * t.cos())
                })
                .collect()
        };
        let trusted = ring(2.0, 6);
        let all = ring(10.0, 32);
        let ans = fit_with_retry(&DirectFitter, &trusted, &all, 314, 20.0).unwrap();
        assert!(ans.used_all_points);
        assert!((ans.fit.a - 10.0).abs() < 1e-6);
        assert!((ans.fit.b - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_outline_on_ellipse() {
        let e = EllipseFit {
            center: (5.0, 7.0),
            a: 4.0,
            b: 2.0,
            phi: 0.4,
        };
        let (sin_p, cos_p) = e.phi.sin_cos();
        for (h, w) in e.outline(12) {
            let (dh, dw) = (h - 5.0, w - 7.0);
            let u = cos_p * dh + sin_p * dw;
            let v = -sin_p * dh + cos_p * dw;
            assert!(((u / 4.0).powi(2) + (v / 2.0).powi(2) - 1.0).abs() < 1e-12);
        }
    }
}
