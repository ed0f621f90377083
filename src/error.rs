//! 错误处理模块
//!
//! 定义库内统一的错误类型。单个文件的失败不会以 `Err` 形式中断批处理，
//! 而是被记录为报告中的 [`Finding`](crate::report::Finding)。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum MifError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),

    /// 文档结构无法解析（缺少标记行、头部不是映射等）
    #[error("文档解析失败: {0}")]
    Parse(String),

    /// YAML 语法错误
    #[error("YAML 解析错误: {0}")]
    Yaml(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// Schema 加载或编译失败
    #[error("Schema 错误: {0}")]
    Schema(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// JSON-LD 上下文文件错误
    #[error("上下文错误: {0}")]
    Context(String),

    /// 文件发现（glob）错误
    #[error("文件发现错误: {0}")]
    Discovery(String),

    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for MifError {
    fn from(e: std::io::Error) -> Self {
        MifError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for MifError {
    fn from(e: serde_json::Error) -> Self {
        MifError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for MifError {
    fn from(e: serde_yaml::Error) -> Self {
        MifError::Yaml(e.to_string())
    }
}

impl From<figment::Error> for MifError {
    fn from(e: figment::Error) -> Self {
        MifError::Config(e.to_string())
    }
}

impl From<glob::PatternError> for MifError {
    fn from(e: glob::PatternError) -> Self {
        MifError::Discovery(e.to_string())
    }
}

impl From<glob::GlobError> for MifError {
    fn from(e: glob::GlobError) -> Self {
        MifError::Discovery(e.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, MifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MifError::NotFound("schema not found: schema/mif.schema.json".to_string());
        assert_eq!(err.to_string(), "资源不存在: schema not found: schema/mif.schema.json");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MifError = io.into();
        assert!(matches!(err, MifError::Io(ref message) if message == "missing"));
        assert!(err.to_string().starts_with("IO 错误"));
    }
}
