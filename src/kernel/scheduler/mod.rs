//! # Kernel - 内核门面
//!
//! 汇总时钟访问和调度器入口：
//! - `now_ticks()` / `delay()` / `sleep_until()` 转发到时间子系统
//! - `run_scheduler()` 模拟"内核接管主线程"，永不返回
//! - `join_all()` 是另一种保持进程存活的方式：等待所有任务结束
//!
//! 任务都是独立的系统线程，由操作系统调度；这里没有就绪队列，
//! 优先级也不参与调度。

use std::thread;
use std::time::{Duration, Instant};

use crate::config::SCHEDULER_IDLE_INTERVAL;
use crate::error::{Result, RtosError};
use crate::kernel::task::Task;
use crate::kernel::time::{Delay, Systick};

pub struct Kernel;

impl Kernel {
    /// 内核初始化
    ///
    /// 固定 tick 的起点。可以不调用，第一次读取 tick 时也会自动固定。
    pub fn init() {
        let epoch = Systick::init();
        tracing::debug!(?epoch, "kernel initialized");
    }

    /// 当前 tick（毫秒），单调不减
    pub fn now_ticks() -> u32 {
        Systick::now_ticks()
    }

    pub fn now() -> Instant {
        Systick::now()
    }

    /// 阻塞当前任务至少 `ms` 毫秒
    pub fn delay(ms: u32) {
        Delay::delay(ms)
    }

    pub fn delay_for(duration: Duration) {
        Delay::delay_for(duration)
    }

    pub fn sleep_until(deadline: Instant) {
        Delay::sleep_until(deadline)
    }

    /// 启动调度器，阻塞调用线程，永不返回
    ///
    /// 任务已经在各自的线程上运行，主线程只是空转休眠。
    pub fn run_scheduler() -> ! {
        tracing::info!("scheduler started, blocking main thread");
        loop {
            thread::sleep(SCHEDULER_IDLE_INTERVAL);
        }
    }

    /// 依次启动所有任务
    ///
    /// 遇到第一个启动失败的任务时返回错误，之前已启动的任务继续运行。
    pub fn start_all(tasks: &mut [Task]) -> Result<()> {
        for task in tasks.iter_mut() {
            task.start()?;
        }
        tracing::info!(count = tasks.len(), "all tasks started");
        Ok(())
    }

    /// 等待所有任务结束
    ///
    /// 总是等待全部任务，返回第一个异常结束的任务的错误。
    pub fn join_all(tasks: &mut [Task]) -> Result<()> {
        let mut first_err: Option<RtosError> = None;
        for task in tasks.iter_mut() {
            if let Err(e) = task.join() {
                tracing::warn!(task = task.name(), error = %e, "task joined with failure");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
