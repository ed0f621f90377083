use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 格式常量配置
///
/// 两种序列化之间映射时使用的固定标识。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// 规范记录的 `@context` 引用
    pub context_url: String,
    /// 记录的 `@type` 标记
    pub memory_type: String,
    /// 引用条目的 `@type` 标记
    pub citation_type: String,
    /// 记录 URN 的命名方案（`urn:<scheme>:<id>`）
    pub urn_scheme: String,
    /// 本体节点标识的前缀（`<scheme>:namespace/...`）
    pub ontology_scheme: String,
    /// 基础本体 ID
    pub base_ontology: String,
    /// 命名空间前导标记字符
    pub namespace_marker: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            context_url: "https://mif-spec.dev/schema/context.jsonld".into(),
            memory_type: "Memory".into(),
            citation_type: "Citation".into(),
            urn_scheme: "mif".into(),
            ontology_scheme: "mif".into(),
            base_ontology: "mif-base".into(),
            namespace_marker: "_".into(),
        }
    }
}

impl FormatConfig {
    /// 命名空间前导标记（校验后保证为单个字符）
    pub fn marker(&self) -> Option<char> {
        let mut chars = self.namespace_marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// 路径配置，均相对于仓库根目录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// 记忆记录 JSON Schema
    pub memory_schema: PathBuf,
    /// 本体 JSON Schema
    pub ontology_schema: PathBuf,
    /// 本体 JSON-LD 上下文
    pub ontology_context: PathBuf,
    /// 记忆记录目录（递归搜索 `*.memory.md`）
    pub memory_dirs: Vec<PathBuf>,
    /// 本体目录（仅搜索当前层 `*.ontology.yaml`）
    pub ontology_dirs: Vec<PathBuf>,
    /// 往返转换测试目录
    pub conversion_dir: PathBuf,
    /// 批量转换时递归搜索的本体根目录
    pub ontology_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            memory_schema: PathBuf::from("schema/mif.schema.json"),
            ontology_schema: PathBuf::from("schema/ontology/ontology.schema.json"),
            ontology_context: PathBuf::from("schema/ontology/ontology.context.jsonld"),
            memory_dirs: vec![
                PathBuf::from("examples"),
                PathBuf::from("ontologies/examples/memories"),
            ],
            ontology_dirs: vec![
                PathBuf::from("ontologies"),
                PathBuf::from("ontologies/examples"),
            ],
            conversion_dir: PathBuf::from("examples"),
            ontology_root: PathBuf::from("ontologies"),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 仓库根目录
    pub root: PathBuf,
    /// 格式常量
    pub format: FormatConfig,
    /// 路径配置
    pub paths: PathsConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 将相对路径解析到仓库根目录下
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// 以仓库根目录为基准的相对路径，用于报告输出
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
