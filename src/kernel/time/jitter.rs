//! 抖动统计
//!
//! 抖动定义为实际唤醒时刻相对截止时刻的迟到量。
//! 提前唤醒记为 0，只统计迟到。

use core::fmt;
use std::time::{Duration, Instant};

/// 一个统计窗口的抖动报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterReport {
    /// 窗口内最大抖动
    pub max: Duration,
    /// 窗口内平均抖动
    pub average: Duration,
    /// 窗口内样本数
    pub samples: u32,
}

impl fmt::Display for JitterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max jitter {} us, avg {} us over {} samples",
            self.max.as_micros(),
            self.average.as_micros(),
            self.samples
        )
    }
}

/// 抖动累加器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JitterStats {
    max: Duration,
    total: Duration,
    count: u32,
}

impl JitterStats {
    pub const fn new() -> Self {
        Self {
            max: Duration::ZERO,
            total: Duration::ZERO,
            count: 0,
        }
    }

    /// 计算一次唤醒的抖动，提前唤醒截断为 0
    pub fn lateness(deadline: Instant, woke_at: Instant) -> Duration {
        woke_at.saturating_duration_since(deadline)
    }

    /// 记录一个样本
    pub fn record(&mut self, jitter: Duration) {
        self.max = self.max.max(jitter);
        self.total = self.total.saturating_add(jitter);
        self.count = self.count.saturating_add(1);
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// 平均抖动，没有样本时为 0
    pub fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count
        }
    }

    pub fn report(&self) -> JitterReport {
        JitterReport {
            max: self.max,
            average: self.average(),
            samples: self.count,
        }
    }

    /// 生成报告并清零累加器，开始新窗口
    pub fn take_report(&mut self) -> JitterReport {
        let report = self.report();
        self.reset();
        report
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
