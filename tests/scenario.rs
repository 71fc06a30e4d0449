//! # 端到端场景
//!
//! - 传感器/处理：1Hz 生产者 + 阻塞消费者，运行 5 秒
//! - 抖动分析：10ms 周期运行 1000 次

use std::time::Duration;

use neon_rtos_sim::config::{JITTER_REPORT_WINDOW, SENSOR_PERIOD};
use neon_rtos_sim::demo::{self, SensorData};
use neon_rtos_sim::{BlockingQueue, JitterReport, Kernel, Task};
use serial_test::serial;

// 平均抖动上限（轻负载）
const MAX_AVG_JITTER: Duration = Duration::from_millis(5);

#[test]
#[serial]
fn test_sensor_to_processing_pipeline() {
    Kernel::init();

    let sensor_queue: BlockingQueue<SensorData> = BlockingQueue::new();
    let processed: BlockingQueue<SensorData> = BlockingQueue::new();

    let producer_queue = sensor_queue.clone();
    let consumer_queue = sensor_queue.clone();
    let processed_tx = processed.clone();

    let mut tasks = [
        Task::new("Sensor", 1, move || {
            demo::sensor_task(&producer_queue, SENSOR_PERIOD, Some(5))
        }),
        Task::new("Process", 2, move || {
            demo::processing_task(&consumer_queue, Duration::from_millis(200), Some(5), |data| {
                processed_tx.send(data)
            })
        }),
    ];

    Kernel::start_all(&mut tasks).unwrap();
    Kernel::join_all(&mut tasks).unwrap();

    let items: Vec<SensorData> = std::iter::from_fn(|| processed.try_receive()).collect();
    assert_eq!(items.len(), 5);
    assert_eq!(items.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!(items.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    // 生产间隔约一秒
    let span = items[4].timestamp - items[0].timestamp;
    assert!(span >= 4000, "span {} ms", span);

    // 没有多余的消息
    assert_eq!(sensor_queue.receive(Some(Duration::from_millis(100))), None);
}

#[test]
#[serial]
fn test_jitter_task_under_light_load() {
    let reports: BlockingQueue<JitterReport> = BlockingQueue::new();
    let reports_tx = reports.clone();

    let mut jitter = Task::new("Jitter", 4, move || {
        demo::jitter_task(
            Duration::from_millis(10),
            JITTER_REPORT_WINDOW,
            Some(1000),
            |report| reports_tx.send(*report),
        )
    });
    jitter.start().unwrap();
    jitter.join().unwrap();

    let reports: Vec<JitterReport> = std::iter::from_fn(|| reports.try_receive()).collect();
    assert_eq!(reports.len(), 1000 / JITTER_REPORT_WINDOW as usize);

    for report in &reports {
        assert_eq!(report.samples, JITTER_REPORT_WINDOW);
        assert!(report.max >= report.average);
    }

    let total: Duration = reports.iter().map(|r| r.average).sum();
    let average = total / reports.len() as u32;
    assert!(average < MAX_AVG_JITTER, "average jitter {:?}", average);
}
