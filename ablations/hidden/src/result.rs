//! 实验结果.

use crate::algos::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Empty label images: {}", p.get_trivial())?;
    writeln!(w, "{S4}Reconstructed label images: {}", p.get_target())?;
    writeln!(w, "{S4}Failed label images: {}", p.get_failed())?;
    writeln!(w, "{S4}Instances attempted: {}", p.get_attempted())?;
    writeln!(
        w,
        "{S4}Bubbles: {} ({} touching), skipped: {}",
        p.get_bubbles(),
        p.get_touching(),
        p.get_skipped()
    )?;
    writeln!(w, "{S4}Effective total time: {} us", p.get_target_time_us())?;
    writeln!(
        w,
        "{S4}Effective average time: {} us",
        f64_to_display(p.get_avg_target_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming image costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 分析运行结果, 同时写进 `report`.
    ///
    /// # 注意
    ///
    /// 写入 `report` 失败时立即返回错误, 之后的配置不再输出.
    pub fn analyze<W: Write>(&self, mut report: W) -> io::Result<()> {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf)?;
            println!("{}", String::from_utf8_lossy(&buf));
            report.write_all(&buf)?;
            writeln!(report)?;
            buf.clear();

            utils::sep();
            utils::sep_to(&mut report)?;
        }
        report.flush()
    }
}
