//! 日志模块
//!
//! 内核各处直接使用 `tracing` 宏记录事件，
//! 宿主程序在启动时调用 [`logger_init`] 安装订阅者：
//! - 文本格式输出到标准输出
//! - 过滤级别由 [`LoggerConfig::level`] 指定，不读取环境变量
//! - 测试环境下可以不安装订阅者，日志被静默丢弃

use core::fmt;
use core::str::FromStr;
use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, RtosError};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(usize)]
pub enum LogLevel {
    /// 错误级别
    Error = 0,
    /// 警告级别
    Warn = 1,
    /// 信息级别
    #[default]
    Info = 2,
    /// 调试级别
    Debug = 3,
    /// 跟踪级别
    Trace = 4,
}

impl LogLevel {
    /// 对应的过滤指令
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = RtosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(RtosError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 过滤指令，例如 `info` 或 `neon_rtos_sim=debug`
    pub level: String,
    /// 是否输出事件的 target
    pub with_targets: bool,
    /// 是否输出 ANSI 颜色
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_level(LogLevel::default())
    }
}

impl LoggerConfig {
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level: level.as_str().to_string(),
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}

/// 安装全局日志订阅者
///
/// # 返回值
/// - `Ok(())` - 安装成功
/// - `Err(RtosError::InvalidLogLevel)` - 过滤指令无法解析
/// - `Err(RtosError::LoggerAlreadyInitialized)` - 进程内已安装过订阅者
pub fn logger_init(cfg: &LoggerConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&cfg.level)
        .map_err(|_| RtosError::InvalidLogLevel(cfg.level.clone()))?;
    let fmt_layer = tfmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(as_error)
}

fn as_error(e: impl fmt::Display) -> RtosError {
    let s = e.to_string();
    if s.contains("already") {
        RtosError::LoggerAlreadyInitialized
    } else {
        RtosError::LoggerInit(s)
    }
}
