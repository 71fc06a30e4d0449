use std::thread;
use std::time::{Duration, Instant};

pub struct Delay;

impl Delay {
    /// 阻塞当前任务至少 `ms` 毫秒
    pub fn delay(ms: u32) {
        Self::delay_for(Duration::from_millis(u64::from(ms)));
    }

    /// 阻塞当前任务至少 `duration`，不保证上限
    pub fn delay_for(duration: Duration) {
        if duration.is_zero() {
            return;
        }
        Self::sleep_until(Instant::now() + duration);
    }

    /// 阻塞到绝对时刻 `deadline`，已过期则立即返回
    pub fn sleep_until(deadline: Instant) {
        loop {
            let now = Instant::now();
            match deadline.checked_duration_since(now) {
                Some(remaining) if !remaining.is_zero() => thread::sleep(remaining),
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_at_least_requested() {
        let start = Instant::now();
        Delay::delay(25);
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_delay_zero_returns_immediately() {
        let start = Instant::now();
        Delay::delay(0);
        Delay::delay_for(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_sleep_until_past_deadline() {
        let past = Instant::now();
        Delay::delay(5);

        let start = Instant::now();
        Delay::sleep_until(past);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_sleep_until_reaches_deadline() {
        let deadline = Instant::now() + Duration::from_millis(30);
        Delay::sleep_until(deadline);
        assert!(Instant::now() >= deadline);
    }
}
