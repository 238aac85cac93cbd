//! 实例标签图的数据结构与持久化.

mod core;
mod iter;
mod save;

use std::fmt::{Display, Formatter};
use std::path::Path;

use image::{ColorType, DynamicImage};
use ndarray::{Array2, ShapeError};

pub use self::core::{Instance, LabelImage};
pub use save::{ImgWriteRaw, ImgWriteVis};

/// 拥有所有权的二维实例标签图.
///
/// `OwnedLabelImage` 仅提供到 [`LabelImage`] 的轻量转换, 底层数据移动和文件读取,
/// 其它算法都定义在视图上.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnedLabelImage {
    data: Array2<u32>,
}

impl OwnedLabelImage {
    /// 直接以二维数组初始化. 第一维为行 (高), 第二维为列 (宽).
    #[inline]
    pub fn new(data: Array2<u32>) -> Self {
        Self { data }
    }

    /// 以行优先存储的 `buf` 初始化. 形状与长度不符时返回 `Err`.
    pub fn from_row_major(shape: crate::Idx2d, buf: Vec<u32>) -> Result<Self, LabelIoError> {
        Ok(Self {
            data: Array2::from_shape_vec(shape, buf)?,
        })
    }

    /// 获得不可变视图.
    #[inline]
    pub fn as_image(&self) -> LabelImage<'_> {
        LabelImage::new(self.data.view())
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array2<u32> {
        self.data
    }

    /// 打开单通道 8-bit 或 16-bit 标签图 (PNG, TIFF, BMP 等). 像素值即实例编号.
    ///
    /// 其它颜色类型被视为错误, 因为 RGB 图像无法无歧义地还原为实例编号.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LabelIoError> {
        let img = image::open(path.as_ref())?;
        Self::from_dynamic(img)
    }

    /// 从已解码的图像构造.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, LabelIoError> {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let buf: Vec<u32> = match img {
            DynamicImage::ImageLuma8(gray) => gray.into_raw().into_iter().map(u32::from).collect(),
            DynamicImage::ImageLuma16(gray) => {
                gray.into_raw().into_iter().map(u32::from).collect()
            }
            other => return Err(LabelIoError::UnsupportedColor(other.color())),
        };
        Self::from_row_major((h, w), buf)
    }
}

impl From<Array2<u32>> for OwnedLabelImage {
    #[inline]
    fn from(data: Array2<u32>) -> Self {
        Self::new(data)
    }
}

/// 标签图读写错误.
#[derive(Debug)]
pub enum LabelIoError {
    /// 底层编解码或文件错误.
    Image(image::ImageError),

    /// 不支持的颜色类型. 标签图必须是单通道灰度图.
    UnsupportedColor(ColorType),

    /// 缓冲区长度与形状不符.
    Shape(ShapeError),

    /// 实例编号超出目标格式的表示范围 (16-bit 存储时为 65535).
    IdOverflow(u32),
}

impl Display for LabelIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::UnsupportedColor(c) => write!(f, "unsupported label color type {c:?}"),
            Self::Shape(e) => write!(f, "label shape error: {e}"),
            Self::IdOverflow(id) => write!(f, "instance id {id} does not fit into 16 bits"),
        }
    }
}

impl std::error::Error for LabelIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            Self::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for LabelIoError {
    #[inline]
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<ShapeError> for LabelIoError {
    #[inline]
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}
