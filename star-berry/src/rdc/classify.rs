use super::{RayPoint, RdSample};
use crate::LabelImage;

impl RdSample {
    /// 判别每个端点是否被遮挡, 覆盖原有标记.
    ///
    /// 满足以下任意一条即视为遮挡:
    ///
    /// 1. 端点位于图像边缘 (或越出图像);
    /// 2. 端点补零后的 3×3 邻域内没有背景像素, 说明端点嵌在连续的前景中,
    ///   边界被相邻实例吸收了.
    pub fn classify(&mut self, labels: &LabelImage) {
        for point in self.ray_points.iter_mut() {
            point.occluded = is_occluded(labels, point);
        }
    }
}

fn is_occluded(labels: &LabelImage, point: &RayPoint) -> bool {
    let pos = match (usize::try_from(point.row), usize::try_from(point.col)) {
        (Ok(h), Ok(w)) if labels.check((h, w)) => (h, w),
        _ => return true,
    };
    labels.is_at_border(pos) || labels.is_n8_foreground(pos)
}
