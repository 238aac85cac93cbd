//! 单图统计.

use crate::reco::Reconstruction;
use crate::LabelImage;
use ordered_float::NotNan;

/// 一张图的气泡统计.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageStats {
    /// 图像宽度 (像素).
    pub width: usize,

    /// 图像高度 (像素).
    pub height: usize,

    /// 气泡个数.
    pub count: usize,

    /// 与邻居接触的气泡个数.
    pub touching: usize,

    /// 被跳过的实例个数.
    pub skipped: usize,

    /// 气泡截面总面积 (像素²).
    pub total_area_px: f64,

    /// 气泡截面总面积 (物理单位²).
    pub total_area_phys: f64,

    /// 气泡总面积占图像面积的比例. 重叠与越界部分不扣除, 因此可能大于 1.
    pub coverage: f64,

    /// 等效球径平均值 (物理单位).
    pub mean_diameter: f64,

    /// 最大等效球径 (物理单位).
    pub max_diameter: f64,
}

impl ImageStats {
    /// 统计 `reco` 的结果. `metric` 必须与重建时一致.
    pub fn new(labels: &LabelImage, reco: &Reconstruction, metric: f64) -> Self {
        let (height, width) = labels.shape();
        let bubbles = &reco.bubbles;
        let count = bubbles.len();

        let total_area_phys: f64 = bubbles.iter().map(|b| b.area()).sum();
        let total_area_px = total_area_phys / (metric * metric);
        let coverage = match labels.size() {
            0 => 0.0,
            n => total_area_px / n as f64,
        };

        let diameters = bubbles.iter().filter_map(|b| NotNan::new(b.diameter()).ok());
        let max_diameter = diameters.clone().max().map_or(0.0, NotNan::into_inner);
        let mean_diameter = match count {
            0 => 0.0,
            n => diameters.map(NotNan::into_inner).sum::<f64>() / n as f64,
        };

        Self {
            width,
            height,
            count,
            touching: bubbles.iter().filter(|b| b.touches_neighbor()).count(),
            skipped: reco.skipped.len(),
            total_area_px,
            total_area_phys,
            coverage,
            mean_diameter,
            max_diameter,
        }
    }

    /// 汇总表表头.
    pub fn csv_header() -> &'static str {
        "Image,Width,Height,Count,Touching,Skipped,Area_px,Area,Coverage,Mean_D,Max_D"
    }

    /// 汇总表中的一行.
    pub fn csv_record(&self, name: &str) -> String {
        format!(
            "{name},{},{},{},{},{},{},{},{},{},{}",
            self.width,
            self.height,
            self.count,
            self.touching,
            self.skipped,
            self.total_area_px,
            self.total_area_phys,
            self.coverage,
            self.mean_diameter,
            self.max_diameter
        )
    }
}
