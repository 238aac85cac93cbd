//! 比较椭圆拟合路径与 RDC 路径.
//!
//! 读取 `$BUBBLE_LABEL_DIR` (默认 `$HOME/dataset/bubbles/label`) 下的所有标签图,
//! 分别以各个配置重建, 输出气泡表, 叠加图与统计汇总.

mod algos;
mod result;
mod runner;

use std::fs::File;

fn main() {
    simple_logger::init_with_level(log::Level::Warn).unwrap();

    let (result, out_dir) = runner::run();
    let report = File::create(out_dir.join("report.txt")).unwrap();
    result.analyze(report).unwrap();
}
