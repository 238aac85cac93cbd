//! 通用常量.

/// 标签图中背景的像素值.
pub const BACKGROUND: u32 = 0;

/// 默认射线条数. 需要与外部校正模型期望的输入长度一致.
pub const DEFAULT_RAY_COUNT: usize = 64;

/// 允许的最少射线条数.
pub const MIN_RAY_COUNT: usize = 3;

/// 射线生长的起始半径 (像素).
pub const INITIAL_RADIUS: usize = 5;

/// 被遮挡射线数 **严格大于** 该值时, 才认为实例与邻居接触.
///
/// 单条遮挡射线通常来自切向接触的噪声.
pub const OCCLUSION_THRESHOLD: usize = 1;

/// 校正结果滑动平均的窗口宽度.
pub const SMOOTH_WIDTH: usize = 4;

/// 椭圆面积上限与实例像素数之比. 下限为 1 倍.
pub const DEFAULT_AREA_RATIO: f64 = 20.0;

/// 椭圆拟合所需的最少点数.
pub const MIN_FIT_POINTS: usize = 5;

/// 像素是否是背景?
#[inline]
pub const fn is_background(p: u32) -> bool {
    p == BACKGROUND
}

/// 像素是否是某个实例?
#[inline]
pub const fn is_instance(p: u32) -> bool {
    !is_background(p)
}

/// RGB 颜色.
pub mod rgb {
    /// 黑色.
    pub const BLACK: [u8; 3] = [0, 0, 0];

    /// 白色.
    pub const WHITE: [u8; 3] = [255, 255, 255];

    /// 暗灰色, 用于绘制射线.
    pub const DARK_GRAY: [u8; 3] = [64, 64, 64];

    /// 循环调色板. 颜色互相容易区分, 也与黑色背景容易区分.
    pub const PALETTE: [[u8; 3]; 10] = [
        [31, 119, 180],
        [255, 127, 14],
        [44, 160, 44],
        [214, 39, 40],
        [148, 103, 189],
        [140, 86, 75],
        [227, 119, 194],
        [188, 189, 34],
        [23, 190, 207],
        [127, 127, 127],
    ];
}
