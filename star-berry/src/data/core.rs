use super::iter::PosIter;
use crate::consts::{is_background, is_instance};
use crate::{Idx2d, Idx2dF};
use ndarray::iter::Iter;
use ndarray::{ArrayView2, Ix2};
use std::collections::BTreeMap;
use std::ops::Index;

/// 不可变、借用的二维实例标签图.
#[derive(Copy, Clone, Debug)]
pub struct LabelImage<'a> {
    /// 底层数据的轻量级视图.
    ///
    /// 这里有意把代码写死为 `ArrayView` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayView2<'a, u32>,
}

impl Index<Idx2d> for LabelImage<'_> {
    type Output = u32;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> From<ArrayView2<'a, u32>> for LabelImage<'a> {
    #[inline]
    fn from(data: ArrayView2<'a, u32>) -> Self {
        Self::new(data)
    }
}

/// 标签图中一个非空实例的概要信息.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Instance {
    /// 实例编号 (正整数).
    pub id: u32,

    /// 实例像素个数, 至少为 1.
    pub pixel_count: usize,

    /// 所有实例像素行/列坐标的平均值.
    pub center: Idx2dF,
}

impl<'a> LabelImage<'a> {
    /// 直接初始化.
    #[inline]
    pub fn new(data: ArrayView2<'a, u32>) -> Self {
        Self { data }
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'a, u32> {
        self.data
    }

    /// 获取可以迭代图像像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, u32, Ix2> {
        self.data.iter()
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&u32> {
        self.data.get(pos)
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 图像的像素个数.
    #[inline]
    pub fn size(&self) -> usize {
        let (h, w) = self.shape();
        h * w
    }

    /// 图像的对角线长度 (像素).
    #[inline]
    pub fn diagonal(&self) -> f64 {
        let (h, w) = self.shape();
        (h as f64).hypot(w as f64)
    }

    /// 判断一个索引是否合法 (未越界).
    #[inline]
    pub fn check(&self, (h, w): Idx2d) -> bool {
        let (h_len, w_len) = self.shape();
        h < h_len && w < w_len
    }

    /// 判断一个索引是否位于图像的边缘.
    #[inline]
    pub fn is_at_border(&self, (h, w): Idx2d) -> bool {
        h == 0
            || h.saturating_add(1) == self.height()
            || w == 0
            || w.saturating_add(1) == self.width()
    }

    /// 该图是否为全背景图?
    #[inline]
    pub fn is_background(&self) -> bool {
        self.data.iter().copied().all(is_background)
    }

    /// 统计图像中值为 `id` 的像素总个数.
    #[inline]
    pub fn count(&self, id: u32) -> usize {
        self.data.iter().filter(|&p| *p == id).count()
    }

    /// 图像中最大的实例编号. 全背景图返回 `0`.
    #[inline]
    pub fn max_id(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// 以行优先规则, 获取能迭代图像所有索引的迭代器.
    #[inline]
    pub fn pos_iter(&self) -> impl Iterator<Item = Idx2d> {
        PosIter::new(self.shape())
    }

    /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u32)> {
        self.data.indexed_iter()
    }

    /// 获得 `pos` 的 8-邻域像素索引. 保证返回的索引都不越界.
    pub fn n8_positions(&self, pos: Idx2d) -> Vec<Idx2d> {
        neighbour8(pos)
            .into_iter()
            .filter(|p| self.check(*p))
            .collect()
    }

    /// 判断 `pos` 处的 3×3 窗口 (含 `pos` 自身) 是否全部为实例像素.
    ///
    /// 图像外部视为补零的背景, 因此边缘像素的结果总是 `false`.
    /// `pos` 越界时同样返回 `false`.
    pub fn is_n8_foreground(&self, pos: Idx2d) -> bool {
        self.check(pos)
            && neighbour8(pos)
                .into_iter()
                .all(|p| matches!(self.get(p), Some(&v) if is_instance(v)))
            && is_instance(self[pos])
    }

    /// 一次行优先扫描, 统计每个非空实例的像素数与质心.
    ///
    /// 返回结果按实例编号升序排列. 没有任何像素的编号不会出现.
    pub fn instances(&self) -> Vec<Instance> {
        // (像素数, 行坐标和, 列坐标和). 用整数累加以避免浮点误差.
        let mut acc: BTreeMap<u32, (usize, u64, u64)> = BTreeMap::new();
        for ((h, w), &id) in self.indexed_iter() {
            if is_background(id) {
                continue;
            }
            let e = acc.entry(id).or_insert((0, 0, 0));
            e.0 += 1;
            e.1 += h as u64;
            e.2 += w as u64;
        }
        acc.into_iter()
            .map(|(id, (n, sum_h, sum_w))| Instance {
                id,
                pixel_count: n,
                center: (sum_h as f64 / n as f64, sum_w as f64 / n as f64),
            })
            .collect()
    }

    /// 获取编号为 `id` 的实例的质心. 没有任何像素时返回 `None`.
    pub fn center_of(&self, id: u32) -> Option<Idx2dF> {
        let (mut n, mut sum_h, mut sum_w) = (0usize, 0u64, 0u64);
        for ((h, w), _) in self.indexed_iter().filter(|&(_, &p)| p == id) {
            n += 1;
            sum_h += h as u64;
            sum_w += w as u64;
        }
        (n > 0).then(|| (sum_h as f64 / n as f64, sum_w as f64 / n as f64))
    }
}

/// 获得 `(h, w)` 的 8-邻居索引. 不检查越界.
#[inline]
pub(crate) fn neighbour8((h, w): Idx2d) -> [Idx2d; 8] {
    [
        (h.wrapping_sub(1), w.wrapping_sub(1)),
        (h.wrapping_sub(1), w),
        (h.wrapping_sub(1), w.saturating_add(1)),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
        (h.saturating_add(1), w.wrapping_sub(1)),
        (h.saturating_add(1), w),
        (h.saturating_add(1), w.saturating_add(1)),
    ]
}
