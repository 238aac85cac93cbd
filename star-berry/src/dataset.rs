//! 数据集操作.
//!
//! 提供迭代器风格的标签图加载器.

use crate::{LabelIoError, OwnedLabelImage};
use std::io;
use std::path::{Path, PathBuf};

/// 可以作为标签图读取的文件扩展名 (小写).
pub const LABEL_EXTENSIONS: [&str; 4] = ["png", "tif", "tiff", "bmp"];

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

#[inline]
fn is_label_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| LABEL_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// 列出 `dir` 下 (不递归) 所有标签图文件, 按文件名排序.
pub fn label_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let mut ans = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_label_file(&path) {
            ans.push(path);
        }
    }
    ans.sort_unstable();
    Ok(ans)
}

/// 加载 `dir` 下所有标签图, 顺序同 [`label_files`].
pub fn label_loader<P: AsRef<Path>>(dir: P) -> io::Result<LabelLoader> {
    Ok(LabelLoader::new(label_files(dir)?))
}

/// 标签图加载器. 每次迭代读取一个文件.
///
/// 读取失败不会中断迭代, 错误随路径一起返回.
#[derive(Debug)]
pub struct LabelLoader {
    files_rev: Vec<PathBuf>,
}

impl LabelLoader {
    /// 按给定顺序加载 `files`.
    pub fn new<I: IntoIterator<Item = PathBuf>>(files: I) -> Self {
        let mut files_rev: Vec<PathBuf> = files.into_iter().collect();
        files_rev.reverse();
        Self { files_rev }
    }
}

impl Iterator for LabelLoader {
    type Item = (PathBuf, Result<OwnedLabelImage, LabelIoError>);

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files_rev.pop()?;
        let data = OwnedLabelImage::open(&path);
        Some((path, data))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.files_rev.len(), Some(self.files_rev.len()))
    }
}

impl ExactSizeIterator for LabelLoader {
    #[inline]
    fn len(&self) -> usize {
        self.files_rev.len()
    }
}
