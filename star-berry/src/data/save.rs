//! 标签图的持久化存储.

use super::{LabelImage, LabelIoError, OwnedLabelImage};
use crate::consts::{is_background, rgb};
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 实例编号通常很小, 直接存储为灰度图时肉眼几乎看不出区别.
/// 因此背景保存为黑色, 各实例按编号循环使用调色板中的颜色.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError>;
}

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 保存为 16-bit 单通道灰度图, 可以被 [`OwnedLabelImage::open`] 无损读回.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径.
    ///
    /// # 注意
    ///
    /// 存在大于 `u16::MAX` 的实例编号时返回 [`LabelIoError::IdOverflow`], 不会写入任何文件.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError>;
}

/// 实例编号对应的可视化颜色.
#[inline]
pub(crate) fn pretty(id: u32) -> [u8; 3] {
    if is_background(id) {
        rgb::BLACK
    } else {
        rgb::PALETTE[(id as usize - 1) % rgb::PALETTE.len()]
    }
}

impl ImgWriteVis for LabelImage<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError> {
        let (height, width) = self.shape();
        let mut buf = image::RgbImage::new(width as u32, height as u32);
        for ((h, w), &id) in self.indexed_iter() {
            buf.put_pixel(w as u32, h as u32, image::Rgb(pretty(id)));
        }
        Ok(buf.save(path)?)
    }
}

impl ImgWriteRaw for LabelImage<'_> {
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError> {
        let (height, width) = self.shape();
        let mut buf: image::ImageBuffer<image::Luma<u16>, Vec<u16>> =
            image::ImageBuffer::new(width as u32, height as u32);
        for ((h, w), &id) in self.indexed_iter() {
            let pix = u16::try_from(id).map_err(|_| LabelIoError::IdOverflow(id))?;
            buf.put_pixel(w as u32, h as u32, image::Luma([pix]));
        }
        Ok(buf.save(path)?)
    }
}

impl ImgWriteVis for OwnedLabelImage {
    #[inline]
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError> {
        self.as_image().save(path)
    }
}

impl ImgWriteRaw for OwnedLabelImage {
    #[inline]
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelIoError> {
        self.as_image().save_raw(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pretty_cycles() {
        assert_eq!(pretty(0), rgb::BLACK);
        assert_eq!(pretty(1), rgb::PALETTE[0]);
        assert_eq!(pretty(11), rgb::PALETTE[0]);
        assert_eq!(pretty(12), rgb::PALETTE[1]);
    }

    #[test]
    fn test_save_raw_round_trip() {
        let label = OwnedLabelImage::new(array![[0, 1, 1], [0, 2, 1000]]);
        let path = std::env::temp_dir().join("star_berry_save_raw_round_trip.png");
        label.save_raw(&path).unwrap();
        let back = OwnedLabelImage::open(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, label);
    }

    #[test]
    fn test_save_raw_overflow() {
        let label = OwnedLabelImage::new(array![[0, 70_000]]);
        let path = std::env::temp_dir().join("star_berry_save_raw_overflow.png");
        let e = label.save_raw(&path).unwrap_err();
        assert!(matches!(e, LabelIoError::IdOverflow(70_000)));
        assert!(!path.exists());
    }
}
