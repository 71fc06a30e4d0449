//! 任务优先级定义
//!
//! 优先级只作为任务的元数据保存，调度时不使用：
//! 所有任务都是独立的系统线程，由操作系统调度。

use core::fmt;

/// 任务优先级
///
/// 数值越大，优先级越高。
///
/// # 示例
/// ```rust
/// use neon_rtos_sim::kernel::task::Priority;
///
/// let priority = Priority::HIGH;
/// assert!(priority > Priority::NORMAL);
/// assert_eq!(Priority::from(3), Priority::HIGH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    /// 空闲优先级（最低）
    pub const IDLE: Priority = Priority(0);
    /// 低优先级
    pub const LOW: Priority = Priority(1);
    /// 普通优先级
    pub const NORMAL: Priority = Priority(2);
    /// 高优先级
    pub const HIGH: Priority = Priority(3);
    /// 关键优先级
    pub const CRITICAL: Priority = Priority(4);

    pub const fn new(value: u8) -> Self {
        Priority(value)
    }

    /// 获取优先级数值
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// 检查是否为空闲优先级
    pub fn is_idle(self) -> bool {
        self == Priority::IDLE
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        Priority(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::CRITICAL > Priority::HIGH);
        assert!(Priority::HIGH > Priority::NORMAL);
        assert!(Priority::NORMAL > Priority::LOW);
        assert!(Priority::LOW > Priority::IDLE);
        assert!(Priority::new(200) > Priority::CRITICAL);
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::NORMAL);
        assert!(!Priority::default().is_idle());
        assert!(Priority::IDLE.is_idle());
    }

    #[test]
    fn test_priority_conversions() {
        assert_eq!(Priority::from(4), Priority::CRITICAL);
        assert_eq!(Priority::HIGH.as_u8(), 3);
        assert_eq!(Priority::new(7).to_string(), "7");
    }
}
