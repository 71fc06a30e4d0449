use thiserror::Error;

/// 内核错误
///
/// 队列操作不会产生错误：超时接收返回 `None`，发送永远成功。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RtosError {
    // 任务相关
    #[error("task `{name}` has already been started")]
    TaskAlreadyStarted { name: String },
    #[error("failed to spawn thread for task `{name}`: {reason}")]
    TaskSpawn { name: String, reason: String },
    #[error("task `{name}` stopped abnormally: {reason}")]
    TaskFailed { name: String, reason: String },

    // 日志相关
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("logger has been already initialized")]
    LoggerAlreadyInitialized,
    #[error("failed to initialize logger: {0}")]
    LoggerInit(String),
}

pub type Result<T> = core::result::Result<T, RtosError>;
