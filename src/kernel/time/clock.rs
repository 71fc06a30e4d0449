//! 时钟抽象
//!
//! 周期任务通过 [`Clock`] 读取时间和执行绝对时刻休眠：
//! - [`SystemClock`] 使用单调时钟和真实线程休眠
//! - [`ManualClock`] 由调用方推进时间，并可以为每次唤醒注入迟到或提前，
//!   用于对周期调度做确定性测试

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use spin::Mutex;

use super::timer::Delay;

pub trait Clock {
    /// 当前时刻，单调不减
    fn now(&self) -> Instant;

    /// 阻塞到绝对时刻 `deadline`
    fn sleep_until(&self, deadline: Instant);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep_until(&self, deadline: Instant) {
        (**self).sleep_until(deadline)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep_until(&self, deadline: Instant) {
        (**self).sleep_until(deadline)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) {
        Delay::sleep_until(deadline)
    }
}

/// 单次唤醒相对截止时刻的偏差
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOffset {
    Late(Duration),
    Early(Duration),
}

#[derive(Debug)]
struct ManualState {
    now: Instant,
    offsets: VecDeque<WakeOffset>,
}

/// 手动推进的时钟
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            state: Mutex::new(ManualState {
                now,
                offsets: VecDeque::new(),
            }),
        }
    }

    /// 推进时间，模拟任务执行耗时
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += duration;
    }

    /// 为后续的 `sleep_until` 依次注入唤醒偏差，用完后准时唤醒
    pub fn push_offsets<I>(&self, offsets: I)
    where
        I: IntoIterator<Item = WakeOffset>,
    {
        self.state.lock().offsets.extend(offsets);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn sleep_until(&self, deadline: Instant) {
        let mut state = self.state.lock();
        // 已过期：不休眠，也不消耗偏差
        if state.now >= deadline {
            return;
        }
        let wake = match state.offsets.pop_front() {
            Some(WakeOffset::Late(late)) => deadline + late,
            Some(WakeOffset::Early(early)) => deadline.checked_sub(early).unwrap_or(deadline),
            None => deadline,
        };
        // 时间不能倒退
        state.now = state.now.max(wake);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let start = Instant::now();
        let clock = ManualClock::starting_at(start);

        assert_eq!(clock.now(), start);
        clock.advance(Duration::from_millis(7));
        assert_eq!(clock.now(), start + Duration::from_millis(7));
    }

    #[test]
    fn test_manual_clock_sleep_with_offsets() {
        let start = Instant::now();
        let clock = ManualClock::starting_at(start);
        let ms = Duration::from_millis;

        clock.push_offsets([WakeOffset::Late(ms(2)), WakeOffset::Early(ms(1))]);

        clock.sleep_until(start + ms(10));
        assert_eq!(clock.now(), start + ms(12));

        clock.sleep_until(start + ms(20));
        assert_eq!(clock.now(), start + ms(19));

        clock.sleep_until(start + ms(30));
        assert_eq!(clock.now(), start + ms(30));
    }

    #[test]
    fn test_manual_clock_past_deadline_keeps_time() {
        let start = Instant::now();
        let clock = ManualClock::starting_at(start);
        clock.advance(Duration::from_millis(50));
        clock.push_offsets([WakeOffset::Late(Duration::from_millis(3))]);

        clock.sleep_until(start + Duration::from_millis(10));
        assert_eq!(clock.now(), start + Duration::from_millis(50));
    }

    #[test]
    fn test_system_clock_sleep_until() {
        let clock = SystemClock;
        let deadline = clock.now() + Duration::from_millis(15);
        clock.sleep_until(deadline);
        assert!(clock.now() >= deadline);
    }
}
