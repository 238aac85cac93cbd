//! 对 `star-berry::dataset` 的更一层封装. 提供更直接的数据集加载器.

use star_berry::dataset::{self, LabelLoader};
use std::env;
use std::path::{Path, PathBuf};

/// 获取气泡标签图目录.
///
/// 1. 若环境变量 `$BUBBLE_LABEL_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/bubbles/label`.
pub fn label_dir_from_env_or_home() -> PathBuf {
    match env::var("BUBBLE_LABEL_DIR") {
        Ok(d) if !d.is_empty() => PathBuf::from(d),
        _ => dataset::home_dataset_dir_with(["bubbles", "label"]).unwrap(),
    }
}

/// 获取输出目录.
///
/// 1. 若环境变量 `$BUBBLE_OUTPUT_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/bubbles/output`.
pub fn output_dir_from_env_or_home() -> PathBuf {
    match env::var("BUBBLE_OUTPUT_DIR") {
        Ok(d) if !d.is_empty() => PathBuf::from(d),
        _ => dataset::home_dataset_dir_with(["bubbles", "output"]).unwrap(),
    }
}

/// 从 `$BUBBLE_METRIC` 读取像素的物理长度, 未设置时为 `1.0`.
///
/// # 注意
///
/// 值无法解析为正数时 panic.
pub fn metric_from_env() -> f64 {
    match env::var("BUBBLE_METRIC") {
        Ok(s) if !s.is_empty() => {
            let m: f64 = s.trim().parse().expect("BUBBLE_METRIC is not a number");
            assert!(m.is_finite() && m > 0.0, "BUBBLE_METRIC must be positive");
            m
        }
        _ => 1.0,
    }
}

/// 获取目录下的标签图加载器.
///
/// # 注意
///
/// `path` 无法读取时 panic.
pub fn label_loader<P: AsRef<Path>>(path: P) -> LabelLoader {
    dataset::label_loader(path).expect("Cannot read label directory")
}

/// 从 `$BUBBLE_LABEL_DIR` 或者 `$HOME/dataset/bubbles/label` 下加载标签图.
#[inline]
pub fn label_loader_from_env_or_home() -> LabelLoader {
    label_loader(label_dir_from_env_or_home())
}
