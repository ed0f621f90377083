//! 批处理报告
//!
//! 每个文件独立处理，失败以 [`Finding`] 形式收集，批处理不会因单个文件中断。

use crate::validation::SchemaViolation;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// 发现项的严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// 单个文件的一条发现
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// 头部或本体文档无法解析
    ParseFailure { message: String },
    /// 规范记录不满足 schema
    SchemaViolation { path: String, message: String },
    /// 两种序列化在核心字段上不一致
    ConversionMismatch {
        field: String,
        markdown: Option<Value>,
        json: Option<Value>,
    },
    /// 缺少对应的 JSON-LD 文件
    MissingCounterpart { expected: String },
    /// 命名空间未在任何本体中找到（仅警告）
    NamespaceUnresolved {
        namespace: String,
        ontology: Option<String>,
    },
}

impl Finding {
    pub fn parse_failure(message: impl fmt::Display) -> Self {
        Finding::ParseFailure {
            message: message.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::NamespaceUnresolved { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl From<SchemaViolation> for Finding {
    fn from(violation: SchemaViolation) -> Self {
        Finding::SchemaViolation {
            path: violation.path,
            message: violation.message,
        }
    }
}

fn render_value(value: &Option<Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<missing>".to_string(),
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ParseFailure { message } => write!(f, "{message}"),
            Finding::SchemaViolation { path, message } => write!(f, "{path}: {message}"),
            Finding::ConversionMismatch {
                field,
                markdown,
                json,
            } => write!(
                f,
                "Field '{field}': MD={} vs JSON={}",
                render_value(markdown),
                render_value(json)
            ),
            Finding::MissingCounterpart { expected } => {
                write!(f, "Missing JSON counterpart: {expected}")
            }
            Finding::NamespaceUnresolved {
                namespace,
                ontology: Some(ontology),
            } => write!(
                f,
                "namespace '{namespace}' not found in base ontology or '{ontology}'"
            ),
            Finding::NamespaceUnresolved {
                namespace,
                ontology: None,
            } => write!(f, "namespace '{namespace}' not found in base ontology"),
        }
    }
}

/// 一次批处理的汇总报告
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 相对路径 -> 发现项，按首次出现顺序
    entries: IndexMap<String, Vec<Finding>>,
    /// 已检查的文件数
    pub files_checked: usize,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个文件的检查结果；无发现项时只计数
    pub fn record(&mut self, file: impl Into<String>, findings: Vec<Finding>) {
        self.files_checked += 1;
        if findings.is_empty() {
            return;
        }
        self.entries.entry(file.into()).or_default().extend(findings);
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// 存在错误级别的发现项时为真；警告不影响退出码
    pub fn has_failures(&self) -> bool {
        self.findings()
            .any(|(_, finding)| finding.severity() == Severity::Error)
    }

    pub fn findings(&self) -> impl Iterator<Item = (&str, &Finding)> {
        self.entries
            .iter()
            .flat_map(|(file, findings)| findings.iter().map(move |f| (file.as_str(), f)))
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &[Finding])> {
        self.entries
            .iter()
            .map(|(file, findings)| (file.as_str(), findings.as_slice()))
    }

    /// 按文件分组渲染，`heading` 为首行
    pub fn render(&self, heading: &str) -> String {
        let mut out = String::from(heading);
        out.push('\n');
        for (file, findings) in self.files() {
            out.push('\n');
            out.push_str(file);
            out.push_str(":\n");
            for finding in findings {
                out.push_str("  - ");
                out.push_str(&finding.to_string());
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_warnings_do_not_fail() {
        let mut report = BatchReport::new();
        report.record(
            "examples/a.memory.md",
            vec![Finding::NamespaceUnresolved {
                namespace: "x/y".into(),
                ontology: None,
            }],
        );
        report.record("examples/b.memory.md", vec![]);

        assert!(!report.is_clean());
        assert!(!report.has_failures());
        assert_eq!(report.files_checked, 2);
    }

    #[test]
    fn test_errors_fail_and_group_by_file() {
        let mut report = BatchReport::new();
        report.record(
            "examples/a.memory.md",
            vec![SchemaViolation::new("$.title", "1 is not of type \"string\"").into()],
        );
        report.record(
            "examples/a.memory.md",
            vec![Finding::parse_failure("Could not parse frontmatter")],
        );

        assert!(report.has_failures());
        assert_eq!(
            report.render("Memory frontmatter validation FAILED:"),
            "Memory frontmatter validation FAILED:\n\nexamples/a.memory.md:\n  - $.title: 1 is not of type \"string\"\n  - Could not parse frontmatter\n"
        );
    }

    #[test]
    fn test_mismatch_rendering() {
        let finding = Finding::ConversionMismatch {
            field: "title".into(),
            markdown: Some(json!("A")),
            json: None,
        };
        assert_eq!(finding.to_string(), "Field 'title': MD=\"A\" vs JSON=<missing>");
    }
}
