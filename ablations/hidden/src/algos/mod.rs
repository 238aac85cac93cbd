mod profile;

use log::{info, warn};
use star_berry::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use utils::loader;

pub use profile::Profile;

/// 一个待比较的重建配置.
#[derive(Copy, Clone)]
pub struct Task {
    pub name: &'static str,
    pub method: Method,
    pub corrector: Option<&'static (dyn ShapeCorrector + Sync)>,
    pub parallel: bool,
}

/// 椭圆拟合路径.
pub const ELLIPSE: Task = Task {
    name: "ellipse",
    method: Method::Ellipse,
    corrector: None,
    parallel: false,
};

/// 原始射线长度的 RDC 路径.
pub const RDC_RAW: Task = Task {
    name: "rdc-raw",
    method: Method::Rdc,
    corrector: None,
    parallel: false,
};

/// 只做滑动平均的 RDC 路径, 并行处理各实例.
pub const RDC_SMOOTH: Task = Task {
    name: "rdc-smooth",
    method: Method::Rdc,
    corrector: Some(&IdentityCorrector),
    parallel: true,
};

/// 把一张图的气泡表 (像素与物理单位) 写进 `dir`.
fn write_tables(dir: &Path, reco: &Reconstruction, metric: f64, ray_count: usize) -> io::Result<()> {
    for (unit, name) in [(Unit::Pixel, "bubble_px.csv"), (Unit::Physical, "bubble.csv")] {
        let mut w = BufWriter::new(File::create(dir.join(name))?);
        writeln!(w, "{}", Bubble::csv_header(ray_count))?;
        for (i, b) in reco.bubbles.iter().enumerate() {
            writeln!(w, "{}", b.csv_record(i + 1, metric, unit, ray_count))?;
        }
        w.flush()?;
    }
    Ok(())
}

/// 以 `task` 重建 `p` 下所有标签图, 结果写进 `out/{task.name}/{文件名}/`.
pub fn run_task(task: Task, p: &Path, out: &Path, metric: f64) -> Profile {
    let mut profile = Profile::new();
    let options = RecoOptions::default()
        .method(task.method)
        .metric(metric)
        .visuals(ColorSource::Seeded(0));
    let mut reco = Reconstructor::new(options).unwrap();
    if let Some(c) = task.corrector {
        reco = reco.with_corrector(c).unwrap();
    }

    let task_dir = out.join(task.name);
    fs::create_dir_all(&task_dir).unwrap();
    let mut summary = BufWriter::new(File::create(task_dir.join("summary.csv")).unwrap());
    writeln!(summary, "{}", ImageStats::csv_header()).unwrap();

    for (path, label) in loader::label_loader(p) {
        let name = path.file_stem().map_or_else(
            || "unnamed".to_string(),
            |s| s.to_string_lossy().into_owned(),
        );
        let label = match label {
            Ok(label) => label,
            Err(e) => {
                warn!("{}: 读取 {} 失败: {e}", task.name, path.display());
                profile.count_failed();
                continue;
            }
        };
        let view = label.as_image();
        if view.is_background() {
            profile.count_trivial();
            continue;
        }

        profile.count_target(true);
        let ans = if task.parallel {
            reco.reconstruct_par(&view)
        } else {
            reco.reconstruct(&view)
        };
        profile.target_elapsed();

        let ans = match ans {
            Ok(ans) => ans,
            Err(e) => {
                warn!("{}: {name} 重建失败: {e}", task.name);
                profile.count_failed();
                continue;
            }
        };
        profile.count_reco(&ans);
        info!("{}: {name}, {} 个气泡", task.name, ans.bubbles.len());

        let dir = task_dir.join(&name);
        fs::create_dir_all(&dir).unwrap();
        write_tables(&dir, &ans, metric, options.ray_count).unwrap();
        save_overlay(dir.join("overlay.png"), &view, &ans.visuals).unwrap();
        let stats = ImageStats::new(&view, &ans, metric);
        writeln!(summary, "{}", stats.csv_record(&name)).unwrap();
    }
    summary.flush().unwrap();
    profile.finish()
}
