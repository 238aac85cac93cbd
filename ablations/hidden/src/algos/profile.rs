//! 算法运行统计.

use star_berry::reco::Reconstruction;
use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::from_secs(0),
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// ablation/benchmark 数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 没有任何实例的标签图个数.
    trivial: u64,

    /// 至少有一个实例的标签图个数.
    target: u64,

    /// 读取失败或重建失败的标签图个数.
    failed: u64,

    /// 重建普通标签图花费的总时间.
    target_time: AccTimer,

    /// 整个任务花费的总时间 (包括读写文件).
    real_time: AccTimer,

    /// 重建普通标签图最耗时的一次任务所消耗的时间.
    most: Duration,

    /// 尝试重建的实例总数.
    attempted: u64,

    /// 输出的气泡总数.
    bubbles: u64,

    /// 与邻居接触的气泡总数.
    touching: u64,

    /// 被跳过的实例总数.
    skipped: u64,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            trivial: 0,
            target: 0,
            failed: 0,
            target_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: Duration::MAX,
            attempted: 0,
            bubbles: 0,
            touching: 0,
            skipped: 0,
        }
    }

    /// 记录一个没有实例的标签图.
    #[inline]
    pub fn count_trivial(&mut self) {
        self.trivial += 1;
    }

    /// 记录一个失败的标签图.
    #[inline]
    pub fn count_failed(&mut self) {
        self.failed += 1;
    }

    /// 记录一个普通标签图. `start` 表明是否同时开启新一轮计时.
    #[inline]
    pub fn count_target(&mut self, start: bool) {
        self.target += 1;
        if start {
            self.target_time.start();
        }
    }

    /// 结束一次普通标签图计时.
    #[inline]
    pub fn target_elapsed(&mut self) {
        let d = self.target_time.elapsed();
        self.most = match self.most {
            Duration::MAX => d,
            once_duration => std::cmp::max(d, once_duration),
        };
    }

    /// 累加一张图的重建结果.
    pub fn count_reco(&mut self, reco: &Reconstruction) {
        self.attempted += reco.attempted as u64;
        self.bubbles += reco.bubbles.len() as u64;
        self.touching += reco.bubbles.iter().filter(|b| b.touches_neighbor()).count() as u64;
        self.skipped += reco.skipped.len() as u64;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    #[inline]
    pub fn get_trivial(&self) -> u64 {
        self.trivial
    }

    #[inline]
    pub fn get_target(&self) -> u64 {
        self.target
    }

    #[inline]
    pub fn get_failed(&self) -> u64 {
        self.failed
    }

    #[inline]
    pub fn get_attempted(&self) -> u64 {
        self.attempted
    }

    #[inline]
    pub fn get_bubbles(&self) -> u64 {
        self.bubbles
    }

    #[inline]
    pub fn get_touching(&self) -> u64 {
        self.touching
    }

    #[inline]
    pub fn get_skipped(&self) -> u64 {
        self.skipped
    }

    /// 以微秒为单位获得重建普通标签图的总时间.
    #[inline]
    pub fn get_target_time_us(&self) -> u64 {
        self.target_time.get_total_us()
    }

    /// 以微秒为单位获得任务的总时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得重建普通标签图的平均时间.
    #[inline]
    pub fn get_avg_target_time_us(&self) -> Option<f64> {
        match self.target {
            0 => None,
            target => Some(self.get_target_time_us() as f64 / target as f64),
        }
    }

    /// 获取最耗时的一次任务所消耗的时间. 不存在任务时返回 `None`.
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        match self.most {
            Duration::MAX => None,
            d => Some(d),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
