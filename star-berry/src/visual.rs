//! 可视化描述符与静态叠加图.
//!
//! 颜色由调用方给定的种子或固定调色板决定, 不使用任何全局随机状态,
//! 相同输入总是得到相同的图像.

use crate::consts::{is_instance, rgb};
use crate::fitting::EllipseFit;
use crate::rdc::{RayPoint, RdSample};
use crate::{Idx2dF, LabelImage};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// 绘制椭圆轮廓时使用的折线段数.
const ELLIPSE_SEGMENTS: usize = 90;

/// 单个实例的可视化描述.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualItem {
    /// RDC 路径: 射线多边形.
    Rdc {
        /// 实例编号.
        id: u32,
        /// 射线端点 (可能已校正).
        points: Vec<RayPoint>,
        /// 实例质心.
        center: Idx2dF,
        /// 射线长度 (像素).
        ray_lengths: Vec<f64>,
        /// 实例原始像素数.
        pixel_count: usize,
        /// 显示颜色.
        color: [u8; 3],
    },

    /// 椭圆路径: 拟合得到的椭圆.
    Ellipse {
        /// 实例编号.
        id: u32,
        /// 拟合结果 (像素).
        fit: EllipseFit,
        /// 显示颜色.
        color: [u8; 3],
    },
}

impl VisualItem {
    pub(crate) fn from_sample(sample: &RdSample) -> Self {
        Self::Rdc {
            id: sample.id(),
            points: sample.ray_points().to_vec(),
            center: sample.center(),
            ray_lengths: sample.ray_lengths().to_vec(),
            pixel_count: sample.pixel_count(),
            color: rgb::WHITE,
        }
    }

    pub(crate) fn from_fit(id: u32, fit: EllipseFit) -> Self {
        Self::Ellipse {
            id,
            fit,
            color: rgb::WHITE,
        }
    }

    /// 实例编号.
    pub fn id(&self) -> u32 {
        match self {
            Self::Rdc { id, .. } | Self::Ellipse { id, .. } => *id,
        }
    }

    /// 显示颜色.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Rdc { color, .. } | Self::Ellipse { color, .. } => *color,
        }
    }

    fn set_color(&mut self, c: [u8; 3]) {
        match self {
            Self::Rdc { color, .. } | Self::Ellipse { color, .. } => *color = c,
        }
    }
}

/// 颜色来源.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSource {
    /// 以给定种子初始化的伪随机颜色. 每个通道取 `[0, 255)`.
    Seeded(u64),

    /// 按顺序循环使用 [`rgb::PALETTE`].
    Palette,
}

impl Default for ColorSource {
    fn default() -> Self {
        Self::Seeded(0)
    }
}

impl ColorSource {
    /// 依次生成 `n` 个颜色.
    pub fn colors(self, n: usize) -> Vec<[u8; 3]> {
        match self {
            Self::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..n)
                    .map(|_| [rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255)])
                    .collect()
            }
            Self::Palette => rgb::PALETTE.iter().copied().cycle().take(n).collect(),
        }
    }

    /// 按 `items` 的顺序为其上色.
    pub fn paint(self, items: &mut [VisualItem]) {
        let n = items.len();
        for (item, c) in items.iter_mut().zip(self.colors(n)) {
            item.set_color(c);
        }
    }
}

/// 闭合多边形的面积 (鞋带公式), 单位为像素².
pub fn polygon_area(points: &[RayPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.row * q.col - q.row * p.col
        })
        .sum();
    twice.abs() as f64 / 2.0
}

/// 绘制叠加图: 实例像素为暗灰色, 背景为黑色, 其上绘制每个描述符.
///
/// RDC 描述符绘制为射线多边形, 质心处画十字; 椭圆描述符绘制为轮廓.
pub fn render_overlay(labels: &LabelImage, items: &[VisualItem]) -> RgbImage {
    let (height, width) = labels.shape();
    let mut canvas = RgbImage::new(width as u32, height as u32);
    for ((h, w), &id) in labels.indexed_iter() {
        if is_instance(id) {
            canvas.put_pixel(w as u32, h as u32, Rgb(rgb::DARK_GRAY));
        }
    }

    for item in items {
        let color = Rgb(item.color());
        match item {
            VisualItem::Rdc { points, center, .. } => {
                let outline: Vec<Idx2dF> = points.iter().map(RayPoint::pos_f64).collect();
                draw_closed(&mut canvas, &outline, color);
                draw_cross_mut(&mut canvas, color, center.1 as i32, center.0 as i32);
            }
            VisualItem::Ellipse { fit, .. } => {
                draw_closed(&mut canvas, &fit.outline(ELLIPSE_SEGMENTS), color);
            }
        }
    }
    canvas
}

/// 渲染叠加图并保存到 `path`.
pub fn save_overlay<P: AsRef<Path>>(
    path: P,
    labels: &LabelImage,
    items: &[VisualItem],
) -> image::ImageResult<()> {
    render_overlay(labels, items).save(path)
}

fn draw_closed(canvas: &mut RgbImage, outline: &[Idx2dF], color: Rgb<u8>) {
    let n = outline.len();
    for i in 0..n {
        let (p, q) = (outline[i], outline[(i + 1) % n]);
        draw_line_segment_mut(
            canvas,
            (p.1 as f32, p.0 as f32),
            (q.1 as f32, q.0 as f32),
            color,
        );
    }
}
