//! # PeriodicRunner - 固定周期唤醒
//!
//! 以绝对时刻驱动的周期循环，并统计每次唤醒的抖动。
//!
//! ## 调度规则
//!
//! ```text
//!   next_deadline = start + period
//!   loop:
//!       sleep_until(next_deadline)          绝对时刻休眠
//!       deadline       = next_deadline
//!       next_deadline  = deadline + period  从上一个截止时刻推进，而不是从 now
//!       jitter         = max(0, now - deadline)
//! ```
//!
//! 截止时刻只从上一个截止时刻推进一个周期，迟到不会累积成漂移，
//! 长期平均频率严格等于 `1 / period`。
//! 单次执行超过一个周期时，后续几个截止时刻已经过期，
//! 循环会立即连续执行直到追上，迟到量全部记为抖动。

use std::time::{Duration, Instant};

use crate::config::{JITTER_REPORT_WINDOW, MAX_PERIOD};

use super::clock::{Clock, SystemClock};
use super::jitter::{JitterReport, JitterStats};

pub struct PeriodicRunner<C: Clock = SystemClock> {
    clock: C,
    period: Duration,
    next_deadline: Instant,
    stats: JitterStats,
    window: u32,
    iterations: u64,
}

impl PeriodicRunner<SystemClock> {
    /// 创建周期循环，第一个截止时刻为 `now + period`
    pub fn new(period: Duration) -> Self {
        Self::with_clock(SystemClock, period)
    }
}

impl<C: Clock> PeriodicRunner<C> {
    /// 使用指定时钟创建周期循环
    ///
    /// 超过 [`MAX_PERIOD`] 的周期会被截断为 `MAX_PERIOD`。
    pub fn with_clock(clock: C, period: Duration) -> Self {
        let period = period.min(MAX_PERIOD);
        let next_deadline = clock.now() + period;
        Self {
            clock,
            period,
            next_deadline,
            stats: JitterStats::new(),
            window: JITTER_REPORT_WINDOW,
            iterations: 0,
        }
    }

    /// 设置报告窗口（样本数），最小为 1
    pub fn with_window(mut self, window: u32) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// 当前窗口的累计统计
    pub fn stats(&self) -> &JitterStats {
        &self.stats
    }

    /// 已完成的唤醒次数
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// 等待下一个截止时刻
    ///
    /// # 返回值
    /// 本次唤醒的抖动，总是 `>= 0`
    pub fn wait_next(&mut self) -> Duration {
        let deadline = self.next_deadline;
        self.clock.sleep_until(deadline);
        let woke_at = self.clock.now();

        self.next_deadline = deadline + self.period;

        let jitter = JitterStats::lateness(deadline, woke_at);
        self.stats.record(jitter);
        self.iterations += 1;
        jitter
    }

    /// 等待下一个截止时刻，窗口满时返回报告并开始新窗口
    pub fn tick(&mut self) -> Option<JitterReport> {
        self.wait_next();
        if self.stats.count() >= self.window {
            let report = self.stats.take_report();
            tracing::debug!(
                period_us = self.period.as_micros() as u64,
                max_us = report.max.as_micros() as u64,
                avg_us = report.average.as_micros() as u64,
                "jitter window complete"
            );
            Some(report)
        } else {
            None
        }
    }

    /// 运行周期循环
    ///
    /// # 参数
    /// - `limit`: 唤醒次数上限，`None` 表示永远运行
    /// - `on_report`: 每个窗口结束时调用
    pub fn run<F>(&mut self, limit: Option<u64>, mut on_report: F)
    where
        F: FnMut(&JitterReport),
    {
        let mut remaining = limit;
        while remaining != Some(0) {
            if let Some(report) = self.tick() {
                on_report(&report);
            }
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
        }
    }
}
