use core::ops::Range;
use core::time::Duration;

// 任务线程默认栈大小
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024; // 64KB

// 调度器空转时每次休眠的间隔
pub const SCHEDULER_IDLE_INTERVAL: Duration = Duration::from_secs(1);

// 抖动统计窗口：每采样 N 次输出一次报告
pub const JITTER_REPORT_WINDOW: u32 = 100;

// 周期上限，保证截止时刻的加法不会溢出 Instant
pub const MAX_PERIOD: Duration = Duration::from_secs(u32::MAX as u64);

// 演示任务参数
pub const SENSOR_PERIOD: Duration = Duration::from_millis(1000);
pub const SENSOR_RANGE: Range<f32> = 20.0..30.0;
pub const PROCESSING_DELAY: Duration = Duration::from_millis(200);
pub const MONITOR_PERIOD: Duration = Duration::from_millis(5000);
pub const JITTER_PERIOD: Duration = Duration::from_millis(10); // 100Hz
