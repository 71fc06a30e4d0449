//! # 任务状态
//!
//! ## 状态转换图
//!
//! ```text
//!   ┌─────────┐  start()  ┌─────────┐  工作函数返回/失败  ┌─────────┐
//!   │ Created │──────────►│ Running │────────────────────►│ Stopped │
//!   └─────────┘           └─────────┘                     └─────────┘
//! ```
//!
//! 每个任务只能启动一次，`Stopped` 为终止状态。

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    /// 已创建，尚未启动
    Created = 0,
    /// 工作函数正在独立线程上执行
    Running = 1,
    /// 工作函数已返回（正常或异常）
    Stopped = 2,
}

impl TaskState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => TaskState::Created,
            1 => TaskState::Running,
            _ => TaskState::Stopped,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Created => "created",
            TaskState::Running => "running",
            TaskState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// 任务线程与任务句柄共享的状态
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: TaskState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: TaskState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// 任务的退出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskExit {
    /// 工作函数正常返回
    Completed,
    /// 工作函数返回错误或 panic
    Failed(String),
}

impl TaskExit {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskExit::Failed(_))
    }
}

/// 工作函数的返回值
///
/// 工作函数可以返回 `()`，也可以返回 `Result<(), E>`，
/// 错误会被转换为 [`TaskExit::Failed`]。
pub trait TaskOutcome {
    fn into_exit(self) -> TaskExit;
}

impl TaskOutcome for () {
    fn into_exit(self) -> TaskExit {
        TaskExit::Completed
    }
}

impl<E: fmt::Display> TaskOutcome for core::result::Result<(), E> {
    fn into_exit(self) -> TaskExit {
        match self {
            Ok(()) => TaskExit::Completed,
            Err(e) => TaskExit::Failed(e.to_string()),
        }
    }
}
