//! 演示任务
//!
//! 四个演示工作负载，每个都接受可选的迭代上限：
//! `None` 表示永远运行，测试中传入上限让任务自然结束。
//!
//! | 任务 | 行为 |
//! |---|---|
//! | 传感器 | 每秒产生一条 [`SensorData`] 发送到队列 |
//! | 处理 | 阻塞接收队列消息，模拟处理耗时 |
//! | 监控 | 定期输出心跳 |
//! | 抖动分析 | 100Hz 周期循环，每个窗口输出抖动报告 |

use core::time::Duration;

use rand::Rng;

use crate::config::SENSOR_RANGE;
use crate::ipc::BlockingQueue;
use crate::kernel::Kernel;
use crate::kernel::time::{JitterReport, PeriodicRunner};

/// 传感器消息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorData {
    /// 从 1 开始递增
    pub id: u32,
    /// 温度读数（摄氏度）
    pub value: f32,
    /// 采样时的 tick
    pub timestamp: u32,
}

fn within(limit: Option<u32>, done: u32) -> bool {
    limit.is_none_or(|n| done < n)
}

/// 传感器任务（生产者）
pub fn sensor_task(queue: &BlockingQueue<SensorData>, period: Duration, limit: Option<u32>) {
    let mut rng = rand::rng();
    let mut id = 0;

    while within(limit, id) {
        id += 1;
        let value: f32 = rng.random_range(SENSOR_RANGE);
        let data = SensorData {
            id,
            value,
            timestamp: Kernel::now_ticks(),
        };

        tracing::info!(target: "sensor", id, value, "read sensor, sending to queue");
        queue.send(data);

        Kernel::delay_for(period);
    }
}

/// 处理任务（消费者）
///
/// 每条消息处理完后交给 `sink`。
pub fn processing_task<F>(
    queue: &BlockingQueue<SensorData>,
    processing_delay: Duration,
    limit: Option<u32>,
    mut sink: F,
) where
    F: FnMut(SensorData),
{
    let mut received = 0;

    while within(limit, received) {
        let data = queue.receive_blocking();
        received += 1;

        tracing::info!(
            target: "processing",
            id = data.id,
            value = data.value,
            timestamp = data.timestamp,
            "received sensor data"
        );
        Kernel::delay_for(processing_delay);
        sink(data);
    }
}

/// 监控任务，定期输出心跳
pub fn monitor_task(period: Duration, limit: Option<u32>) {
    let mut beats = 0;

    while within(limit, beats) {
        beats += 1;
        tracing::info!(target: "monitor", beats, "system heartbeat ok");
        Kernel::delay_for(period);
    }
}

/// 抖动分析任务
///
/// # 参数
/// - `period`: 唤醒周期
/// - `window`: 每个报告包含的样本数
/// - `limit`: 唤醒次数上限
/// - `on_report`: 每个窗口结束时调用
pub fn jitter_task<F>(period: Duration, window: u32, limit: Option<u64>, mut on_report: F)
where
    F: FnMut(&JitterReport),
{
    tracing::info!(
        target: "jitter",
        period_us = period.as_micros() as u64,
        window,
        "starting periodic loop"
    );

    let mut runner = PeriodicRunner::new(period).with_window(window);
    runner.run(limit, |report| {
        tracing::info!(
            target: "jitter",
            max_us = report.max.as_micros() as u64,
            avg_us = report.average.as_micros() as u64,
            samples = report.samples,
            "jitter report"
        );
        on_report(report);
    });
}
