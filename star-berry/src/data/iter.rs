use crate::Idx2d;

/// 行优先索引迭代器.
///
/// 等价于 `(0..h).flat_map(move |r| (0..w).map(move |c| (r, c)))`,
/// 但对象更小, 且实现了 [`ExactSizeIterator`].
#[derive(Debug, Clone)]
pub struct PosIter {
    cur_h: usize,
    cur_w: usize,
    h: usize,
    w: usize,
}

impl PosIter {
    #[inline]
    pub fn new((h, w): Idx2d) -> Self {
        Self {
            cur_h: 0,
            cur_w: 0,
            h,
            w,
        }
    }
}

impl Iterator for PosIter {
    type Item = Idx2d;

    fn next(&mut self) -> Option<Self::Item> {
        if self.w == 0 || self.cur_h >= self.h {
            return None;
        }
        let ret_pos = (self.cur_h, self.cur_w);
        self.cur_w += 1;
        if self.cur_w == self.w {
            self.cur_w = 0;
            self.cur_h += 1;
        }
        Some(ret_pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for PosIter {
    #[inline]
    fn len(&self) -> usize {
        if self.w == 0 || self.cur_h >= self.h {
            0
        } else {
            (self.h - self.cur_h) * self.w - self.cur_w
        }
    }
}
