//! 整图重建.
//!
//! 对标签图中每个非空实例依次做 RDC 采样和遮挡判别, 再按 [`Method`] 选择
//! RDC (可选校正) 或椭圆拟合得到 [`Bubble`]. 实例之间没有共享的可变状态.

mod error;
mod options;

pub use crate::bubble::Method;
pub use error::{RecoError, RecoResult, SkipReason, Skipped};
pub use options::RecoOptions;

use crate::bubble::Bubble;
use crate::corrector::{checked_correct, ShapeCorrector};
use crate::fitting::{fit_with_retry, ConicFitter, DirectFitter};
use crate::geometry::major_minor;
use crate::rdc::{moving_average, RdSample};
use crate::visual::VisualItem;
use crate::{Instance, LabelImage};
use log::{debug, info, warn};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 一张图的重建结果.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconstruction {
    /// 按实例编号升序排列的气泡.
    pub bubbles: Vec<Bubble>,

    /// 可视化描述符, 按实例编号升序. 未开启收集时为空.
    pub visuals: Vec<VisualItem>,

    /// 被跳过的实例, 按实例编号升序.
    pub skipped: Vec<Skipped>,

    /// 做过 RDC 采样的实例数, 即至少有一个像素的不同编号数.
    pub attempted: usize,
}

/// 单个实例的处理结果.
struct Outcome {
    id: u32,
    bubble: Result<Bubble, SkipReason>,
    visual: Option<VisualItem>,
}

/// 重建器.
///
/// 持有参数, 可选的射线长度校正器, 以及椭圆拟合器 (默认 [`DirectFitter`]).
pub struct Reconstructor<'c> {
    options: RecoOptions,
    corrector: Option<&'c (dyn ShapeCorrector + Sync)>,
    fitter: Box<dyn ConicFitter + Send + Sync>,
}

impl std::fmt::Debug for Reconstructor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconstructor")
            .field("options", &self.options)
            .field("corrector", &self.corrector.is_some())
            .finish_non_exhaustive()
    }
}

impl<'c> Reconstructor<'c> {
    /// 以给定参数初始化, 参数不合法时返回 `Err`.
    pub fn new(options: RecoOptions) -> RecoResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            corrector: None,
            fitter: Box::new(DirectFitter),
        })
    }

    /// 接入射线长度校正器.
    ///
    /// 校正器声明的射线条数与参数不一致时返回 `Err`, 此时还没有处理任何实例.
    pub fn with_corrector(mut self, corrector: &'c (dyn ShapeCorrector + Sync)) -> RecoResult<Self> {
        if let Some(n) = corrector.ray_count() {
            if n != self.options.ray_count {
                return Err(RecoError::RayCountMismatch {
                    configured: self.options.ray_count,
                    corrector: n,
                });
            }
        }
        self.corrector = Some(corrector);
        Ok(self)
    }

    /// 替换椭圆拟合器.
    pub fn with_fitter<F: ConicFitter + Send + Sync + 'static>(mut self, fitter: F) -> Self {
        self.fitter = Box::new(fitter);
        self
    }

    /// 当前参数.
    #[inline]
    pub fn options(&self) -> &RecoOptions {
        &self.options
    }

    /// 实际使用的方法: [`Method::Rdc`] 或 [`Method::Ellipse`].
    pub fn effective_method(&self) -> Method {
        match self.options.method {
            Method::Auto if self.corrector.is_some() => Method::Rdc,
            Method::Auto => Method::Ellipse,
            m => m,
        }
    }

    /// 顺序重建整张图.
    ///
    /// 校正器失败时整张图返回 `Err`. 其它失败只会跳过对应的实例, 记录在
    /// [`Reconstruction::skipped`] 中.
    pub fn reconstruct(&self, labels: &LabelImage) -> RecoResult<Reconstruction> {
        let instances = labels.instances();
        let outcomes = instances
            .iter()
            .map(|ins| self.process(labels, ins))
            .collect::<RecoResult<Vec<_>>>()?;
        Ok(self.assemble(outcomes))
    }

    /// 以 `rayon` 并行处理各实例.
    ///
    /// 输出与 [`Reconstructor::reconstruct`] 完全相同, 包括可视化颜色.
    /// 多个实例的校正器都失败时, 返回的是其中任意一个的错误.
    #[cfg(feature = "rayon")]
    pub fn reconstruct_par(&self, labels: &LabelImage) -> RecoResult<Reconstruction> {
        let instances = labels.instances();
        let outcomes = instances
            .par_iter()
            .map(|ins| self.process(labels, ins))
            .collect::<RecoResult<Vec<_>>>()?;
        Ok(self.assemble(outcomes))
    }

    fn process(&self, labels: &LabelImage, ins: &Instance) -> RecoResult<Outcome> {
        let mut sample = RdSample::cast_instance(labels, ins, self.options.ray_count);
        sample.classify(labels);
        match self.effective_method() {
            Method::Ellipse => Ok(self.ellipse_path(&sample)),
            _ => self.rdc_path(sample),
        }
    }

    fn rdc_path(&self, mut sample: RdSample) -> RecoResult<Outcome> {
        let id = sample.id();
        let metric = self.options.metric;
        let occluded = sample.count_occluded();
        let touches = sample.touches_neighbor();

        match self.corrector {
            Some(corrector) if touches => {
                let lengths = sample.lengths_physical(metric);
                let corrected = checked_correct(corrector, &lengths)
                    .map_err(|source| RecoError::Corrector { id, source })?;
                let stretched: Vec<f64> = moving_average(&corrected, self.options.smooth)
                    .into_iter()
                    .map(|l| l / metric)
                    .collect();
                sample.stretch(&stretched);
                debug!("实例 {id}: {occluded} 条射线被遮挡, 已校正");
            }
            _ => debug!("实例 {id}: {occluded} 条射线被遮挡, 使用原始射线"),
        }

        let visual = self
            .options
            .collect_visuals
            .then(|| VisualItem::from_sample(&sample));
        let bubble = match major_minor(&sample.points()) {
            Some(axes) => Ok(Bubble::from_axes(
                id,
                &axes,
                metric,
                sample.lengths_physical(metric),
                touches,
            )),
            None => Err(SkipReason::MinorAxis),
        };
        Ok(Outcome { id, bubble, visual })
    }

    fn ellipse_path(&self, sample: &RdSample) -> Outcome {
        let id = sample.id();
        let fit = fit_with_retry(
            &*self.fitter,
            &sample.trusted_points(),
            &sample.all_points(),
            sample.pixel_count(),
            self.options.area_ratio,
        );
        match fit {
            Ok(ans) => {
                debug!(
                    "实例 {id}: 椭圆拟合成功 (a = {:.2}, b = {:.2}, 全部端点 = {})",
                    ans.fit.a, ans.fit.b, ans.used_all_points
                );
                Outcome {
                    id,
                    bubble: Ok(Bubble::from_ellipse(id, &ans.fit, self.options.metric)),
                    visual: self
                        .options
                        .collect_visuals
                        .then(|| VisualItem::from_fit(id, ans.fit)),
                }
            }
            Err(e) => Outcome {
                id,
                bubble: Err(SkipReason::EllipseFit(e)),
                visual: None,
            },
        }
    }

    fn assemble(&self, outcomes: Vec<Outcome>) -> Reconstruction {
        let mut ans = Reconstruction {
            attempted: outcomes.len(),
            ..Default::default()
        };
        for out in outcomes {
            match out.bubble {
                Ok(bubble) => ans.bubbles.push(bubble),
                Err(reason) => {
                    warn!("跳过实例 {}: {reason}", out.id);
                    ans.skipped.push(Skipped { id: out.id, reason });
                }
            }
            ans.visuals.extend(out.visual);
        }
        self.options.colors.paint(&mut ans.visuals);
        info!(
            "{} 个实例, 重建 {} 个气泡 ({} 个与邻居接触), 跳过 {} 个",
            ans.attempted,
            ans.bubbles.len(),
            ans.bubbles.iter().filter(|b| b.touches_neighbor()).count(),
            ans.skipped.len()
        );
        ans
    }
}

/// 一次性重建整张图.
///
/// 等价于 `Reconstructor::new(options)?.with_corrector(c)?.reconstruct(labels)`.
pub fn hidden_reco(
    labels: &LabelImage,
    options: RecoOptions,
    corrector: Option<&(dyn ShapeCorrector + Sync)>,
) -> RecoResult<Reconstruction> {
    let mut reco = Reconstructor::new(options)?;
    if let Some(c) = corrector {
        reco = reco.with_corrector(c)?;
    }
    reco.reconstruct(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::rgb;
    use crate::corrector::{CorrectorError, FnCorrector, IdentityCorrector};
    use crate::geometry::{ellipsoid_volume, sphere_diameter};
    use crate::visual::ColorSource;
    use crate::OwnedLabelImage;
    use ndarray::Array2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 多个测试都会调用, 只有第一次生效.
    fn init_logger() {
        let _ = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init();
    }

    /// 在 `data` 上画一个实心圆. 已有标签的像素归属于更近的圆心, 距离相同时保留原标签.
    fn disk(data: &mut Array2<u32>, id: u32, (ch, cw): (i64, i64), r: i64) {
        let (height, width) = data.dim();
        for h in 0..height as i64 {
            for w in 0..width as i64 {
                let d2 = (h - ch).pow(2) + (w - cw).pow(2);
                if d2 > r * r {
                    continue;
                }
                let p = (h as usize, w as usize);
                if data[p] == 0 {
                    data[p] = id;
                }
            }
        }
    }

    /// 圆心 `(25, 20)`, `(25, 38)`, 半径 10 的两个相交圆, 重叠部分按距离划分.
    fn touching_pair(width: usize) -> Array2<u32> {
        let mut data = Array2::<u32>::zeros((50, width));
        disk(&mut data, 1, (25, 20), 10);
        for h in 0..50i64 {
            for w in 0..width as i64 {
                let d1 = (h - 25).pow(2) + (w - 20).pow(2);
                let d2 = (h - 25).pow(2) + (w - 38).pow(2);
                if d2 <= 100 && (data[(h as usize, w as usize)] == 0 || d2 < d1) {
                    data[(h as usize, w as usize)] = 2;
                }
            }
        }
        data
    }

    /// 两个相交圆, 外加圆心 `(25, 75)` 的孤立圆 (编号 3).
    fn three_bubbles() -> OwnedLabelImage {
        let mut data = touching_pair(100);
        disk(&mut data, 3, (25, 75), 10);
        OwnedLabelImage::new(data)
    }

    fn single_disk() -> OwnedLabelImage {
        let mut data = Array2::<u32>::zeros((50, 50));
        disk(&mut data, 1, (25, 25), 10);
        OwnedLabelImage::new(data)
    }

    fn identity(l: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Ok(l.to_vec())
    }

    fn double(l: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Ok(l.iter().map(|v| v * 2.0).collect())
    }

    fn broken(_: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Err(CorrectorError::Model("boom".into()))
    }

    fn flip_even(l: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Ok(l
            .iter()
            .enumerate()
            .map(|(k, &v)| if k % 2 == 0 { -v } else { v })
            .collect())
    }

    fn truncated(l: &[f64]) -> Result<Vec<f64>, CorrectorError> {
        Ok(l[..3].to_vec())
    }

    /// 记录调用次数的校正器.
    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl ShapeCorrector for Counting {
        fn correct(&self, lengths: &[f64]) -> Result<Vec<f64>, CorrectorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(lengths.to_vec())
        }
    }

    fn rdc() -> RecoOptions {
        RecoOptions::default().method(Method::Rdc)
    }

    #[test]
    fn test_single_disk_rdc() {
        init_logger();
        let label = single_disk();
        let mut sample = RdSample::cast(&label.as_image(), 1, 64).unwrap();
        sample.classify(&label.as_image());
        assert_eq!(sample.count_occluded(), 0);

        let ans = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert_eq!(ans.attempted, 1);
        assert!(ans.skipped.is_empty());
        assert_eq!(ans.bubbles.len(), 1);

        let b = &ans.bubbles[0];
        assert_eq!(b.id(), 1);
        assert_eq!(b.method(), Method::Rdc);
        assert!(!b.touches_neighbor());
        // 水平射线端点 (25, 35) 与 (25, 15) 构成长轴.
        assert!(f64_eq(b.major(), 10.0));
        assert!((8.0..=10.0).contains(&b.minor()));
        assert!((b.position().0 - 25.0).abs() < 1.0);
        assert!((b.position().1 - 25.0).abs() < 1.0);
        let rays = b.rays().unwrap();
        assert_eq!(rays.len(), 64);
        assert!(rays.iter().all(|&r| (8.0..=11.0).contains(&r)));
        assert!(f64_eq(rays[0], 10.0));

        // 等效球径与旋转椭球体积一致, 且接近半径 10 的球.
        assert!(f64_eq(b.volume(), ellipsoid_volume(b.major(), b.minor())));
        assert!(f64_eq(b.diameter(), sphere_diameter(b.volume())));
        assert!((18.5..=20.0).contains(&b.diameter()));
    }

    #[test]
    fn test_single_disk_ellipse() {
        let label = single_disk();
        let opt = RecoOptions::default().method(Method::Ellipse);
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        assert_eq!(ans.bubbles.len(), 1);

        let b = &ans.bubbles[0];
        assert_eq!(b.method(), Method::Ellipse);
        assert!(b.rays().is_none());
        assert!(!b.touches_neighbor());
        assert!((8.5..=10.5).contains(&b.major()));
        assert!((8.5..=10.5).contains(&b.minor()));
        assert!(b.minor() <= b.major());
        assert!((b.position().0 - 25.0).abs() < 1.0);
        assert!((b.position().1 - 25.0).abs() < 1.0);
    }

    #[test]
    fn test_metric_scales_lengths() {
        let label = single_disk();
        let px = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        let mm = hidden_reco(&label.as_image(), rdc().metric(0.5), None).unwrap();
        let (px, mm) = (&px.bubbles[0], &mm.bubbles[0]);
        assert!(f64_eq(mm.major(), px.major() * 0.5));
        assert!(f64_eq(mm.minor(), px.minor() * 0.5));
        assert_eq!(mm.position(), px.position());
        for (a, b) in mm.rays().unwrap().iter().zip(px.rays().unwrap()) {
            assert!(f64_eq(*a, b * 0.5));
        }
    }

    #[test]
    fn test_touching_pair_raw_rays() {
        let label = OwnedLabelImage::new(touching_pair(60));
        let ans = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert_eq!(ans.bubbles.len(), 2);
        assert!(ans.bubbles.iter().all(Bubble::touches_neighbor));
        assert!(ans.bubbles.iter().all(|b| b.legacy_overlap_flag() == 1));

        // 被遮挡的射线都朝向另一个圆: 圆 1 朝右, 圆 2 朝左.
        for (id, sign) in [(1, 1.0), (2, -1.0)] {
            let mut sample = RdSample::cast(&label.as_image(), id, 64).unwrap();
            sample.classify(&label.as_image());
            assert!(sample.count_occluded() > 1);
            for (k, p) in sample.ray_points().iter().enumerate() {
                if p.occluded {
                    assert!(sign * sample.angle(k).cos() > 0.0, "实例 {id} 射线 {k}");
                }
            }
        }
    }

    #[test]
    fn test_ellipse_path_never_touches() {
        let label = OwnedLabelImage::new(touching_pair(60));
        // 没有校正器时 Auto 走椭圆路径.
        let reco = Reconstructor::new(RecoOptions::default()).unwrap();
        assert_eq!(reco.effective_method(), Method::Ellipse);
        let ans = reco.reconstruct(&label.as_image()).unwrap();
        assert_eq!(ans.attempted, 2);
        assert!(ans.bubbles.iter().all(|b| !b.touches_neighbor()));
        assert!(ans.bubbles.iter().all(|b| b.method() == Method::Ellipse));
    }

    #[test]
    fn test_single_contact_is_not_touching() {
        let mut data = Array2::<u32>::zeros((50, 50));
        disk(&mut data, 1, (25, 25), 10);
        // 只挡住向右的射线.
        for p in [(24, 35), (26, 35), (24, 36), (25, 36), (26, 36)] {
            data[p] = 2;
        }
        let opt = rdc().ray_count(8);
        let label = OwnedLabelImage::new(data.clone());
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        let b = ans.bubbles.iter().find(|b| b.id() == 1).unwrap();
        assert!(!b.touches_neighbor());

        // 再挡住向下的射线.
        for p in [(35, 24), (35, 26), (36, 24), (36, 25), (36, 26)] {
            data[p] = 3;
        }
        let label = OwnedLabelImage::new(data);
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        let b = ans.bubbles.iter().find(|b| b.id() == 1).unwrap();
        assert!(b.touches_neighbor());
    }

    #[test]
    fn test_corrector_only_for_touching() {
        let label = three_bubbles();
        let counter = Counting::default();
        let reco = Reconstructor::new(RecoOptions::default())
            .unwrap()
            .with_corrector(&counter)
            .unwrap();
        assert_eq!(reco.effective_method(), Method::Rdc);

        let ans = reco.reconstruct(&label.as_image()).unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        let touches: Vec<bool> = ans.bubbles.iter().map(Bubble::touches_neighbor).collect();
        assert_eq!(touches, [true, true, false]);
    }

    #[test]
    fn test_isolated_bubble_ignores_corrector() {
        let label = single_disk();
        let c = FnCorrector::new(double);
        let with = hidden_reco(&label.as_image(), RecoOptions::default(), Some(&c)).unwrap();
        let without = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_corrected_lengths() {
        let label = OwnedLabelImage::new(touching_pair(60));
        let raw = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        let c = FnCorrector::new(double);
        let fixed = hidden_reco(&label.as_image(), rdc(), Some(&c)).unwrap();
        for (r, f) in raw.bubbles.iter().zip(&fixed.bubbles) {
            assert!(f.major() > 1.5 * r.major());
            assert!(f.touches_neighbor());
            let total = |b: &Bubble| b.rays().unwrap().iter().sum::<f64>();
            // 循环滑动平均不改变总和.
            assert!((total(f) - 2.0 * total(r)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reconstruct_is_idempotent() {
        let label = three_bubbles();
        let c = FnCorrector::new(identity).with_ray_count(64);
        let reco = Reconstructor::new(RecoOptions::default().visuals(ColorSource::Seeded(7)))
            .unwrap()
            .with_corrector(&c)
            .unwrap();
        let first = reco.reconstruct(&label.as_image()).unwrap();
        let second = reco.reconstruct(&label.as_image()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identity_corrector_smooths_only() {
        let label = OwnedLabelImage::new(touching_pair(60));
        let ans = hidden_reco(&label.as_image(), rdc(), Some(&IdentityCorrector)).unwrap();
        assert_eq!(ans.bubbles.len(), 2);
        assert!(ans.bubbles.iter().all(|b| b.rays().unwrap().len() == 64));
    }

    #[test]
    fn test_corrector_error_aborts() {
        let label = three_bubbles();
        let c = FnCorrector::new(broken);
        let err = hidden_reco(&label.as_image(), RecoOptions::default(), Some(&c)).unwrap_err();
        assert!(matches!(
            err,
            RecoError::Corrector {
                id: 1,
                source: CorrectorError::Model(_)
            }
        ));

        let c = FnCorrector::new(truncated);
        let err = hidden_reco(&label.as_image(), RecoOptions::default(), Some(&c)).unwrap_err();
        assert_eq!(
            err,
            RecoError::Corrector {
                id: 1,
                source: CorrectorError::LengthMismatch(64, 3)
            }
        );
    }

    #[test]
    fn test_negative_correction_aborts() {
        init_logger();
        let label = OwnedLabelImage::new(touching_pair(60));
        let c = FnCorrector::new(flip_even);
        let err = hidden_reco(&label.as_image(), rdc(), Some(&c)).unwrap_err();
        assert_eq!(
            err,
            RecoError::Corrector {
                id: 1,
                source: CorrectorError::Negative(0)
            }
        );
    }

    #[test]
    fn test_broken_corrector_on_isolated_bubbles() {
        // 没有接触的实例不会调用校正器, 也就不会失败.
        let label = single_disk();
        let c = FnCorrector::new(broken);
        let ans = hidden_reco(&label.as_image(), RecoOptions::default(), Some(&c)).unwrap();
        assert_eq!(ans.bubbles.len(), 1);
    }

    #[test]
    fn test_ray_count_mismatch() {
        let c = FnCorrector::new(identity).with_ray_count(32);
        let err = Reconstructor::new(RecoOptions::default())
            .unwrap()
            .with_corrector(&c)
            .unwrap_err();
        assert_eq!(
            err,
            RecoError::RayCountMismatch {
                configured: 64,
                corrector: 32
            }
        );
        let ok = Reconstructor::new(RecoOptions::default().ray_count(32))
            .unwrap()
            .with_corrector(&c);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let label = single_disk();
        let err = hidden_reco(&label.as_image(), rdc().metric(0.0), None).unwrap_err();
        assert!(matches!(err, RecoError::InvalidOptions(_)));
    }

    #[test]
    fn test_id_gaps_and_empty() {
        let mut data = Array2::<u32>::zeros((50, 100));
        disk(&mut data, 2, (25, 25), 10);
        disk(&mut data, 7, (25, 75), 10);
        let label = OwnedLabelImage::new(data);
        let ans = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert_eq!(ans.attempted, 2);
        let ids: Vec<u32> = ans.bubbles.iter().map(Bubble::id).collect();
        assert_eq!(ids, [2, 7]);

        let empty = OwnedLabelImage::new(Array2::zeros((10, 10)));
        let ans = hidden_reco(&empty.as_image(), rdc(), None).unwrap();
        assert_eq!(ans, Reconstruction::default());
    }

    #[test]
    fn test_degenerate_instance_is_skipped() {
        let label = OwnedLabelImage::new(Array2::from_elem((1, 1), 1));

        let ans = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert_eq!(ans.attempted, 1);
        assert!(ans.bubbles.is_empty());
        assert_eq!(
            ans.skipped,
            [Skipped {
                id: 1,
                reason: SkipReason::MinorAxis
            }]
        );

        let opt = RecoOptions::default().method(Method::Ellipse);
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        assert!(ans.bubbles.is_empty());
        assert_eq!(ans.skipped.len(), 1);
        assert!(matches!(ans.skipped[0].reason, SkipReason::EllipseFit(_)));
    }

    #[test]
    fn test_visuals() {
        let label = three_bubbles();
        let ans = hidden_reco(&label.as_image(), rdc(), None).unwrap();
        assert!(ans.visuals.is_empty());

        let opt = rdc().visuals(ColorSource::Palette);
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        assert_eq!(ans.visuals.len(), 3);
        let ids: Vec<u32> = ans.visuals.iter().map(VisualItem::id).collect();
        assert_eq!(ids, [1, 2, 3]);
        let colors: Vec<[u8; 3]> = ans.visuals.iter().map(VisualItem::color).collect();
        assert_eq!(colors, rgb::PALETTE[..3]);
        assert!(ans
            .visuals
            .iter()
            .all(|v| matches!(v, VisualItem::Rdc { ray_lengths, .. } if ray_lengths.len() == 64)));

        let opt = RecoOptions::default()
            .method(Method::Ellipse)
            .visuals(ColorSource::Seeded(1));
        let ans = hidden_reco(&label.as_image(), opt, None).unwrap();
        assert_eq!(ans.visuals.len(), ans.bubbles.len());
        let colors: Vec<[u8; 3]> = ans.visuals.iter().map(VisualItem::color).collect();
        assert_eq!(colors, ColorSource::Seeded(1).colors(colors.len()));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_matches_sequential() {
        let label = three_bubbles();
        let c = FnCorrector::new(double);
        let reco = Reconstructor::new(RecoOptions::default().visuals(ColorSource::Seeded(3)))
            .unwrap()
            .with_corrector(&c)
            .unwrap();
        let seq = reco.reconstruct(&label.as_image()).unwrap();
        let par = reco.reconstruct_par(&label.as_image()).unwrap();
        assert_eq!(seq, par);

        let reco = Reconstructor::new(RecoOptions::default()).unwrap();
        assert_eq!(
            reco.reconstruct(&label.as_image()).unwrap(),
            reco.reconstruct_par(&label.as_image()).unwrap()
        );
    }
}
