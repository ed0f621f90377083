//! 可观测性模块
//!
//! 日志初始化。日志统一写到 stderr，stdout 只输出报告。

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 构建日志过滤器：`RUST_LOG` 优先，否则使用配置中的级别
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// 初始化全局日志订阅者；重复调用时保留已有的订阅者
pub fn init_logging(config: &LoggingConfig) {
    let filter = env_filter(config);

    let result = if config.structured {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(
            "Logging initialized (level: {}, structured: {})",
            config.level,
            config.structured
        );
    }
}
