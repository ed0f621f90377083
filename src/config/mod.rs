//! 配置管理模块
//!
//! 提供工具配置加载功能，支持 TOML 配置文件和环境变量覆盖。

pub mod config;
pub mod loader;

pub use config::{AppConfig, FormatConfig, LoggingConfig, PathsConfig};
pub use loader::ConfigLoader;
