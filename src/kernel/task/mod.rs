use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::DEFAULT_STACK_SIZE;
use crate::error::{Result, RtosError};

// 子模块
pub mod builder;
pub mod priority;
pub mod state;

// 重新导出
pub use builder::TaskBuilder;
pub use priority::Priority;
pub use state::{TaskExit, TaskOutcome, TaskState};

use state::StateCell;

pub trait TaskFunction: Send + 'static {
    fn call(self: Box<Self>) -> TaskExit;
}

// 为闭包实现TaskFunction
impl<F, R> TaskFunction for F
where
    F: FnOnce() -> R + Send + 'static,
    R: TaskOutcome,
{
    fn call(self: Box<Self>) -> TaskExit {
        (*self)().into_exit()
    }
}

/// 任务
///
/// 包装一个工作函数，`start()` 后在独立的系统线程上执行。
/// 任务由创建者独占持有，创建者负责最终调用 `join()`。
///
/// # 示例
/// ```rust
/// use neon_rtos_sim::kernel::task::{Task, TaskState};
///
/// let mut task = Task::new("worker", 2, || {
///     // 任务逻辑
/// });
/// assert_eq!(task.state(), TaskState::Created);
///
/// task.start().unwrap();
/// task.join().unwrap();
/// assert_eq!(task.state(), TaskState::Stopped);
/// ```
pub struct Task {
    name: String,
    priority: Priority,
    stack_size: usize,
    state: Arc<StateCell>,
    task_fn: Option<Box<dyn TaskFunction>>,
    handle: Option<JoinHandle<TaskExit>>,
    exit: Option<TaskExit>,
}

// 统一的任务入口：执行工作函数并捕获失败，保证状态最终进入 Stopped
fn task_wrapper_entry(
    name: &str,
    priority: Priority,
    task_fn: Box<dyn TaskFunction>,
    state: &StateCell,
) -> TaskExit {
    tracing::info!(task = name, %priority, "task started");

    let exit = match panic::catch_unwind(AssertUnwindSafe(move || task_fn.call())) {
        Ok(exit) => exit,
        Err(payload) => TaskExit::Failed(panic_message(payload.as_ref())),
    };

    match &exit {
        TaskExit::Completed => tracing::info!(task = name, "task ended"),
        TaskExit::Failed(reason) => {
            tracing::error!(task = name, reason = reason.as_str(), "task stopped abnormally")
        }
    }

    state.set(TaskState::Stopped);
    exit
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

impl Task {
    /// 创建任务，不会立即执行
    ///
    /// # 参数
    /// - `name`: 任务名称，创建后不可修改
    /// - `priority`: 优先级，仅作为元数据
    /// - `func`: 工作函数，返回 `()` 或 `Result<(), E>`
    pub fn new<F>(name: impl Into<String>, priority: u8, func: F) -> Self
    where
        F: TaskFunction,
    {
        Self::with_config(name.into(), Priority::from(priority), DEFAULT_STACK_SIZE, func)
    }

    pub(crate) fn with_config<F>(name: String, priority: Priority, stack_size: usize, func: F) -> Self
    where
        F: TaskFunction,
    {
        Self {
            name,
            priority,
            stack_size,
            state: Arc::new(StateCell::new(TaskState::Created)),
            task_fn: Some(Box::new(func)),
            handle: None,
            exit: None,
        }
    }

    /// 创建任务构建器
    ///
    /// # 示例
    /// ```rust
    /// use neon_rtos_sim::kernel::task::{Task, Priority};
    ///
    /// let mut task = Task::builder("monitor")
    ///     .priority(Priority::HIGH)
    ///     .spawn(|| {})
    ///     .unwrap();
    /// task.join().unwrap();
    /// ```
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(name)
    }

    /// 在独立线程上启动工作函数，立即返回
    ///
    /// # 返回值
    /// - `Ok(())` - 任务进入 `Running`
    /// - `Err(RtosError::TaskAlreadyStarted)` - 任务已启动过
    /// - `Err(RtosError::TaskSpawn)` - 无法创建线程，任务直接进入 `Stopped`
    pub fn start(&mut self) -> Result<()> {
        let Some(task_fn) = self.task_fn.take() else {
            return Err(RtosError::TaskAlreadyStarted {
                name: self.name.clone(),
            });
        };

        let name = self.name.clone();
        let priority = self.priority;
        let state = Arc::clone(&self.state);

        self.state.set(TaskState::Running);
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .stack_size(self.stack_size)
            .spawn(move || task_wrapper_entry(&name, priority, task_fn, &state));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.state.set(TaskState::Stopped);
                self.exit = Some(TaskExit::Failed(reason.clone()));
                Err(RtosError::TaskSpawn {
                    name: self.name.clone(),
                    reason,
                })
            }
        }
    }

    /// 等待工作函数返回
    ///
    /// 未启动或已结束的任务立即返回，可以重复调用。
    ///
    /// # 返回值
    /// - `Ok(())` - 正常结束或从未启动
    /// - `Err(RtosError::TaskFailed)` - 工作函数返回错误或 panic
    pub fn join(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            let exit = handle
                .join()
                .unwrap_or_else(|payload| TaskExit::Failed(panic_message(payload.as_ref())));
            self.exit = Some(exit);
        }

        match &self.exit {
            Some(TaskExit::Failed(reason)) => Err(RtosError::TaskFailed {
                name: self.name.clone(),
                reason: reason.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取任务优先级
    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == TaskState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TaskState::Stopped
    }

    /// 退出结果，`join()` 之后可用
    pub fn exit(&self) -> Option<&TaskExit> {
        self.exit.as_ref()
    }
}

impl core::fmt::Debug for Task {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("state", &self.state())
            .field("exit", &self.exit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_task() {
        let mut task = Task::new("task1", 3, || {});

        assert_eq!(task.name(), "task1");
        assert_eq!(task.priority(), Priority::HIGH);
        assert_eq!(task.state(), TaskState::Created);
        assert_eq!(task.stack_size(), DEFAULT_STACK_SIZE);
        assert!(task.exit().is_none());

        task.start().unwrap();
        task.join().unwrap();

        assert_eq!(task.state(), TaskState::Stopped);
        assert_eq!(task.exit(), Some(&TaskExit::Completed));
    }

    #[test]
    fn test_task_runs_work_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let mut task = Task::new("counter", 1, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        task.start().unwrap();
        task.join().unwrap();
        task.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_task_start_twice() {
        let mut task = Task::new("twice", 1, || {});
        task.start().unwrap();

        assert_eq!(
            task.start(),
            Err(RtosError::TaskAlreadyStarted {
                name: "twice".to_string()
            })
        );
        task.join().unwrap();
    }

    #[test]
    fn test_task_state_transitions() {
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let mut task = Task::new("gated", 2, move || {
            release_rx.recv().unwrap();
        });
        assert_eq!(task.state(), TaskState::Created);

        task.start().unwrap();
        assert!(task.is_running());
        assert!(!task.is_finished());

        release_tx.send(()).unwrap();
        task.join().unwrap();
        assert!(task.is_finished());
    }

    #[test]
    fn test_join_without_start() {
        let mut task = Task::new("idle", 0, || {});

        task.join().unwrap();
        assert_eq!(task.state(), TaskState::Created);
        assert!(task.exit().is_none());
    }

    #[test]
    fn test_task_returns_error() {
        let mut task = Task::new("faulty", 1, || -> core::result::Result<(), String> {
            Err("sensor offline".to_string())
        });
        task.start().unwrap();

        let expected = Err(RtosError::TaskFailed {
            name: "faulty".to_string(),
            reason: "sensor offline".to_string(),
        });
        assert_eq!(task.join(), expected);
        // 重复 join 返回相同结果
        assert_eq!(task.join(), expected);
        assert_eq!(task.state(), TaskState::Stopped);
    }

    #[test]
    fn test_task_panic_is_contained() {
        let mut bad = Task::new("panicker", 1, || {
            let divisor = 0;
            if divisor == 0 {
                panic!("division by zero");
            }
        });
        let mut good = Task::new("survivor", 1, || {
            thread::sleep(Duration::from_millis(20));
        });

        bad.start().unwrap();
        good.start().unwrap();

        match bad.join() {
            Err(RtosError::TaskFailed { name, reason }) => {
                assert_eq!(name, "panicker");
                assert!(reason.contains("division by zero"), "reason: {}", reason);
            }
            other => panic!("unexpected join result: {:?}", other),
        }
        assert_eq!(bad.state(), TaskState::Stopped);

        good.join().unwrap();
        assert_eq!(good.exit(), Some(&TaskExit::Completed));
    }

    #[test]
    fn test_task_thread_named() {
        let (tx, rx) = mpsc::channel();
        let mut task = Task::new("named_thread", 1, move || {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        });
        task.start().unwrap();
        task.join().unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("named_thread"));
    }
}
