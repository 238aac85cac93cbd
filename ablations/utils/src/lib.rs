//! 消融实验依赖的通用组件: 分隔线输出, 核心数, 以及数据集路径与像素尺寸的解析.

use std::io::{self, Write};

pub mod loader;

/// 报告中各段之间的分隔线.
pub const SEP: &str = "--------------------------------------------------------";

/// 在标准输出打印分隔线.
#[inline]
pub fn sep() {
    println!("{SEP}");
}

/// 将分隔线 (带换行) 写入 `w`.
///
/// # 注意
///
/// 写入失败时返回错误, 由调用方决定如何处理.
#[inline]
pub fn sep_to<W: Write>(mut w: W) -> io::Result<()> {
    writeln!(w, "{SEP}")
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 写满即失败的输出.
    struct Full;

    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sep_to() {
        let mut buf = Vec::new();
        sep_to(&mut buf).unwrap();
        sep_to(&mut buf).unwrap();
        assert_eq!(buf, format!("{SEP}\n{SEP}\n").into_bytes());
    }

    #[test]
    fn test_sep_to_error() {
        let err = sep_to(Full).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_cpus() {
        assert!(cpus() >= 1);
    }
}
