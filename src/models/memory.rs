//! 记忆文档模型
//!
//! 记忆记录的人工可编辑形式：`---` 标记行包围的 YAML 头部，加上自由文本正文。

use crate::error::{MifError, Result};
use crate::models::scalar_style::{ScalarPaths, plain_scalar_paths};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;

/// 头部块：`---` 开始行、YAML 映射、`---` 结束行
static FRONTMATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---").expect("frontmatter pattern is valid")
});

/// 已解析的记忆文档
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    /// 头部字段（原生 snake_case 命名）
    pub header: Map<String, Value>,
    /// 去除首尾空白后的正文
    pub body: String,
    /// 头部中未加引号的普通标量位置，只有这些位置参与时间值规范化
    pub plain_scalars: ScalarPaths,
}

impl MemoryDocument {
    /// 从文本解析记忆文档
    pub fn parse(text: &str) -> Result<Self> {
        let captures = FRONTMATTER
            .captures(text)
            .ok_or_else(|| MifError::Parse("no frontmatter block found".to_string()))?;

        let (Some(block), Some(whole)) = (captures.get(1), captures.get(0)) else {
            return Err(MifError::Parse("no frontmatter block found".to_string()));
        };

        let header = match serde_yaml::from_str::<Value>(block.as_str())? {
            Value::Object(map) => map,
            Value::Null => return Err(MifError::Parse("frontmatter is empty".to_string())),
            _ => return Err(MifError::Parse("frontmatter is not a mapping".to_string())),
        };

        let plain_scalars = plain_scalar_paths(block.as_str())?;
        let body = text[whole.end()..].trim().to_string();

        Ok(Self {
            header,
            body,
            plain_scalars,
        })
    }

    /// 从文件读取并解析
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// 声明的命名空间；缺失或非字符串时为空串
    pub fn namespace(&self) -> &str {
        self.header
            .get("namespace")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// 记录引用的本体 ID（`ontology: {id: ...}`）
    pub fn ontology_id(&self) -> Option<&str> {
        self.header
            .get("ontology")
            .and_then(Value::as_object)
            .and_then(|ontology| ontology.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}
