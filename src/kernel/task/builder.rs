//! 任务构建器
//!
//! 提供链式 API 创建任务，支持设置优先级和栈大小。

use super::priority::Priority;
use super::{Task, TaskFunction};
use crate::config::DEFAULT_STACK_SIZE;
use crate::error::Result;

/// 任务构建器
///
/// # 示例
///
/// ```rust
/// use neon_rtos_sim::kernel::task::{Task, Priority};
///
/// // 只创建，不启动
/// let task = Task::builder("simple_task").build(|| {});
///
/// // 自定义配置并立即启动
/// let mut task = Task::builder("custom_task")
///     .priority(Priority::HIGH)
///     .stack_size(256 * 1024)
///     .spawn(|| {
///         // 任务逻辑
///     })
///     .unwrap();
/// task.join().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    name: String,
    priority: Priority,
    stack_size: usize,
}

impl TaskBuilder {
    /// 创建新的任务构建器
    ///
    /// # 默认值
    /// - 优先级: `Priority::NORMAL`
    /// - 栈大小: `DEFAULT_STACK_SIZE`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: Priority::default(),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// 设置任务线程的栈大小（字节）
    ///
    /// 栈大小会向上对齐到 8 字节，接近 `usize::MAX` 时饱和。
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.saturating_add(7) & !7;
        self
    }

    /// 创建任务，处于 `Created` 状态
    pub fn build<F>(self, func: F) -> Task
    where
        F: TaskFunction,
    {
        Task::with_config(self.name, self.priority, self.stack_size, func)
    }

    /// 创建并启动任务
    ///
    /// # 返回值
    /// - `Ok(Task)`: 已启动的任务
    /// - `Err(RtosError::TaskSpawn)`: 无法创建线程
    pub fn spawn<F>(self, func: F) -> Result<Task>
    where
        F: TaskFunction,
    {
        let mut task = self.build(func);
        task.start()?;
        Ok(task)
    }
}
