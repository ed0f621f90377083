//! MIF - 记忆交换格式工具集
//!
//! 记忆记录有两种序列化：YAML 头部 + Markdown 正文的人工编辑形式，以及 JSON-LD 规范形式。
//! 本库负责两者之间的映射、schema 验证、命名空间检查和本体的 JSON-LD 导出。

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod namespace;
pub mod observability;
pub mod report;
pub mod services;
pub mod transform;
pub mod validation;

pub use error::{MifError, Result};
