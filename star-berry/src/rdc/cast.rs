use super::{ray_direction, RayPoint, RdSample};
use crate::consts::INITIAL_RADIUS;
use crate::{Idx2d, Idx2dF, Instance, LabelImage};

impl RdSample {
    /// 对编号为 `id` 的实例做 RDC 采样. 实例没有任何像素时返回 `None`.
    ///
    /// 会额外扫描一遍整张图计算质心. 批量处理时应先调用 [`LabelImage::instances`],
    /// 再使用 [`RdSample::cast_instance`].
    ///
    /// # 注意
    ///
    /// `ray_count` 为 0 时 panic.
    pub fn cast(labels: &LabelImage, id: u32, ray_count: usize) -> Option<Self> {
        let center = labels.center_of(id)?;
        let instance = Instance {
            id,
            pixel_count: labels.count(id),
            center,
        };
        Some(Self::cast_instance(labels, &instance, ray_count))
    }

    /// 对已统计好质心的实例做 RDC 采样.
    ///
    /// 每条射线从半径 [`INITIAL_RADIUS`] 开始逐像素生长. 候选点截断到图像范围内,
    /// 一旦落在其它标签或图像边缘上, 该射线即被冻结, 端点取 **上一个** 半径处的采样.
    /// 半径上限为 `ceil(对角线) + 1`, 保证在任何掩膜上都会终止.
    ///
    /// 返回的端点都没有遮挡标记, 需要再调用 [`RdSample::classify`].
    pub fn cast_instance(labels: &LabelImage, instance: &Instance, ray_count: usize) -> Self {
        assert!(ray_count > 0, "射线条数必须为正");
        let max_radius = labels.diagonal().ceil() as usize + 1;
        let mut ray_lengths = Vec::with_capacity(ray_count);
        let mut ray_points = Vec::with_capacity(ray_count);

        for k in 0..ray_count {
            let dir = ray_direction(k, ray_count);
            let mut radius = INITIAL_RADIUS;
            while radius < max_radius {
                let candidate = to_pixel(clamp_to(labels, along(instance.center, dir, radius)));
                if labels[candidate] != instance.id || labels.is_at_border(candidate) {
                    break;
                }
                radius += 1;
            }

            let end = clamp_to(labels, along(instance.center, dir, radius - 1));
            let (row, col) = to_pixel(end);
            ray_lengths.push(distance(instance.center, end));
            ray_points.push(RayPoint::new(row as i64, col as i64));
        }

        Self {
            id: instance.id,
            center: instance.center,
            pixel_count: instance.pixel_count,
            ray_lengths,
            ray_points,
        }
    }
}

#[inline]
fn along((h, w): Idx2dF, (dh, dw): Idx2dF, radius: usize) -> Idx2dF {
    let r = radius as f64;
    (h + dh * r, w + dw * r)
}

/// 截断到 `[0, H-1] × [0, W-1]`.
#[inline]
fn clamp_to(labels: &LabelImage, (h, w): Idx2dF) -> Idx2dF {
    let h_max = labels.height().saturating_sub(1) as f64;
    let w_max = labels.width().saturating_sub(1) as f64;
    (h.clamp(0.0, h_max), w.clamp(0.0, w_max))
}

/// 非负坐标向下取整为像素索引.
#[inline]
fn to_pixel((h, w): Idx2dF) -> Idx2d {
    (h as usize, w as usize)
}

#[inline]
fn distance((h0, w0): Idx2dF, (h1, w1): Idx2dF) -> f64 {
    (h1 - h0).hypot(w1 - w0)
}
