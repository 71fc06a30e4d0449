use std::process::ExitCode;

use neon_rtos_sim::config::{
    JITTER_PERIOD, JITTER_REPORT_WINDOW, MONITOR_PERIOD, PROCESSING_DELAY, SENSOR_PERIOD,
};
use neon_rtos_sim::demo::{self, SensorData};
use neon_rtos_sim::log::{LoggerConfig, logger_init};
use neon_rtos_sim::{BlockingQueue, Kernel, Task};

fn main() -> ExitCode {
    if let Err(e) = logger_init(&LoggerConfig::default()) {
        eprintln!("failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    Kernel::init();
    tracing::info!("--- neon-rtos-sim starting ---");

    let sensor_queue: BlockingQueue<SensorData> = BlockingQueue::new();

    // 优先级数值越大越高，仅作为元数据
    let producer_queue = sensor_queue.clone();
    let consumer_queue = sensor_queue;
    let mut tasks = [
        Task::new("Sensor", 1, move || {
            demo::sensor_task(&producer_queue, SENSOR_PERIOD, None)
        }),
        Task::new("Process", 2, move || {
            demo::processing_task(&consumer_queue, PROCESSING_DELAY, None, |_| {})
        }),
        Task::new("Monitor", 3, || demo::monitor_task(MONITOR_PERIOD, None)),
        Task::new("Jitter", 4, || {
            demo::jitter_task(JITTER_PERIOD, JITTER_REPORT_WINDOW, None, |_| {})
        }),
    ];

    if let Err(e) = Kernel::start_all(&mut tasks) {
        tracing::error!(error = %e, "failed to start tasks");
        return ExitCode::FAILURE;
    }

    // 用 join_all 保持主线程存活；Kernel::run_scheduler() 是永不返回的另一种方式
    match Kernel::join_all(&mut tasks) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "task stopped abnormally");
            ExitCode::FAILURE
        }
    }
}
