use std::time::{Duration, Instant};

use spin::Once;

// 进程内固定的时间起点，第一次访问时确定
static EPOCH: Once<Instant> = Once::new();

/// 系统节拍
///
/// 1 tick = 1ms，从进程内固定的起点开始计数，单调不减。
/// 计数宽度为 `u32`，约 49.7 天后回绕，回绕不做修正。
pub struct Systick;

impl Systick {
    /// 固定时间起点
    ///
    /// 在任务启动前调用一次，可以让所有任务的 tick 从同一起点开始。
    pub fn init() -> Instant {
        Self::epoch()
    }

    pub fn epoch() -> Instant {
        *EPOCH.call_once(Instant::now)
    }

    pub fn now() -> Instant {
        Instant::now()
    }

    /// 当前 tick（毫秒）
    pub fn now_ticks() -> u32 {
        let epoch = Self::epoch();
        Self::ticks_between(epoch, Instant::now())
    }

    /// 某个时刻对应的 tick
    pub fn ticks_at(instant: Instant) -> u32 {
        Self::ticks_between(Self::epoch(), instant)
    }

    /// 自起点以来经过的时间
    pub fn elapsed() -> Duration {
        Self::epoch().elapsed()
    }

    fn ticks_between(epoch: Instant, instant: Instant) -> u32 {
        // 截断即回绕
        instant.saturating_duration_since(epoch).as_millis() as u32
    }
}
