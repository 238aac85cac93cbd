//! 程序运行函数.

use crate::algos::{self, Task};
use crate::result::AblationResult;
use std::path::PathBuf;
use std::thread;
use utils::loader;

/// 实际运行. 返回结果与输出目录.
pub fn run() -> (AblationResult, PathBuf) {
    let label_dir = loader::label_dir_from_env_or_home();
    assert!(label_dir.is_dir(), "{} is not a directory", label_dir.display());
    let out_dir = loader::output_dir_from_env_or_home();
    let metric = loader::metric_from_env();
    let (p, out) = (label_dir.as_path(), out_dir.as_path());

    // 短路判断
    assert!(
        loader::label_loader(p)
            .next()
            .is_some_and(|(_, r)| r.is_ok()),
        "Loading dataset config error"
    );

    println!(
        "Running ablation studies on {} ({} cpus, metric = {metric})...",
        p.display(),
        utils::cpus()
    );
    let tasks: [Task; 3] = [algos::ELLIPSE, algos::RDC_RAW, algos::RDC_SMOOTH];
    let result = thread::scope(|s| {
        let handles = tasks.map(|t| s.spawn(move || algos::run_task(t, p, out, metric)));

        AblationResult::from_iter(
            tasks.iter().map(|t| t.name).zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            ),
        )
    });
    (result, out_dir)
}
