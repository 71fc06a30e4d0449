//! # BlockingQueue - 可阻塞、可超时的消息队列
//!
//! 基于 `Arc` 的无界 FIFO 队列，无需全局变量，可以通过闭包传递给任务。
//!
//! ## 设计思路
//!
//! - 一把互斥锁保护内部的 `VecDeque`，整个生命周期只有这一把锁
//! - 每次 `send` 通过条件变量唤醒至多一个等待的接收者
//! - 接收者被唤醒后重新检查"队列非空"，不依赖通知本身（防虚假唤醒）
//! - 发送永不阻塞，也没有容量上限
//! - 队列没有关闭协议，接收超时以 `None` 表示，而不是错误
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use neon_rtos_sim::ipc::BlockingQueue;
//! use neon_rtos_sim::kernel::task::Task;
//!
//! let queue = BlockingQueue::new();
//! let producer_queue = queue.clone();
//!
//! let mut producer = Task::new("producer", 1, move || {
//!     producer_queue.send(42u32);
//! });
//! producer.start().unwrap();
//!
//! assert_eq!(queue.receive(Some(Duration::from_secs(1))), Some(42));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 队列内部状态
struct QueueInner<T> {
    /// 消息序列
    items: Mutex<VecDeque<T>>,
    /// 非空通知
    not_empty: Condvar,
}

/// 可克隆、可传递的阻塞消息队列
///
/// 克隆得到的是同一个队列的另一个句柄。
pub struct BlockingQueue<T> {
    inner: Arc<QueueInner<T>>,
}

impl<T> Clone for BlockingQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> core::fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .finish()
    }
}

impl<T> QueueInner<T> {
    // 锁中毒时仍然取回数据：所有修改都是锁内的单步操作，不会留下半完成的状态
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> BlockingQueue<T> {
    /// 创建一个空队列
    pub fn new() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                items: Mutex::new(VecDeque::new()),
                not_empty: Condvar::new(),
            }),
        }
    }

    /// 向队尾追加一条消息
    ///
    /// 不会阻塞，唤醒至多一个正在等待的接收者。
    pub fn send(&self, item: T) {
        let mut items = self.inner.lock();
        items.push_back(item);
        tracing::trace!(len = items.len(), "queue send");
        drop(items);
        self.inner.not_empty.notify_one();
    }

    /// 从队头取出一条消息
    ///
    /// # 参数
    /// - `timeout`: `None` 表示无限等待；`Some(d)` 表示最多等待 `d`
    ///
    /// # 返回值
    /// - `Some(T)` - 成功取出队头消息
    /// - `None` - 等待窗口内没有消息（仅限超时模式）
    pub fn receive(&self, timeout: Option<Duration>) -> Option<T> {
        match timeout {
            None => Some(self.receive_blocking()),
            Some(timeout) => self.receive_timeout(timeout),
        }
    }

    /// 无限等待，直到取出一条消息
    pub fn receive_blocking(&self) -> T {
        let mut items = self.inner.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .inner
                .not_empty
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// 最多等待 `timeout`，超时返回 `None`
    ///
    /// `timeout` 为零时等价于 [`try_receive`](Self::try_receive)。
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let items = self.inner.lock();
        let (mut items, result) = self
            .inner
            .not_empty
            .wait_timeout_while(items, timeout, |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        let item = items.pop_front();
        if item.is_none() {
            tracing::trace!(?timeout, timed_out = result.timed_out(), "queue receive timed out");
        }
        item
    }

    /// 非阻塞地取出一条消息
    pub fn try_receive(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    /// 获取队列当前消息数量
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// 检查队列是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
