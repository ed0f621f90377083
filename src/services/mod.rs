//! 批处理服务模块
//!
//! 每个命令对应一个服务：发现文件、逐个处理、汇总为 [`BatchReport`](crate::report::BatchReport)。
//! 单个文件的失败只进入报告，不会中断批处理。

pub mod memory_validation;
pub mod namespace_validation;
pub mod ontology_export;
pub mod ontology_validation;

pub use conversion_test::{ConversionReport, ConversionTestService};
pub use memory_validation::MemoryValidationService;
pub use namespace_validation::NamespaceValidationService;
pub use ontology_export::{ExportOutcome, OntologyExporter};
pub use ontology_validation::OntologyValidationService;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::ontology::NamespaceOutline;
use crate::namespace::NamespaceIndex;
use glob::Pattern;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 记忆记录文件后缀
pub const MEMORY_SUFFIX: &str = ".memory.md";
/// 本体文件后缀
pub const ONTOLOGY_SUFFIX: &str = ".ontology.yaml";

/// 在 `dir` 下查找以 `suffix` 结尾的文件，结果按路径排序
///
/// 目录不存在时返回空列表。
pub fn discover(dir: &Path, suffix: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!("Skipping missing directory {}", dir.display());
        return Ok(Vec::new());
    }

    let base = Pattern::escape(&dir.display().to_string());
    let pattern = if recursive {
        format!("{base}/**/*{suffix}")
    } else {
        format!("{base}/*{suffix}")
    };

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 依次搜索多个目录，保持目录顺序
pub fn discover_all(dirs: &[PathBuf], suffix: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in dirs {
        files.extend(discover(dir, suffix, recursive)?);
    }
    Ok(files)
}

/// 配置中所有记忆目录下的记录文件（递归）
pub fn memory_files(config: &AppConfig) -> Result<Vec<PathBuf>> {
    let dirs: Vec<PathBuf> = config
        .paths
        .memory_dirs
        .iter()
        .map(|dir| config.resolve(dir))
        .collect();
    discover_all(&dirs, MEMORY_SUFFIX, true)
}

/// 配置中所有本体目录下的本体文件（仅当前层）
pub fn ontology_files(config: &AppConfig) -> Result<Vec<PathBuf>> {
    let dirs: Vec<PathBuf> = config
        .paths
        .ontology_dirs
        .iter()
        .map(|dir| config.resolve(dir))
        .collect();
    discover_all(&dirs, ONTOLOGY_SUFFIX, false)
}

/// 读取 JSON 文件
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// 构建命名空间索引
///
/// 只读取每个本体的 ID 与命名空间树；解析失败或没有 ID 的本体只记录警告并跳过。
pub fn load_namespace_index(config: &AppConfig) -> Result<NamespaceIndex> {
    let mut index = NamespaceIndex::new();

    for path in ontology_files(config)? {
        let doc = match NamespaceOutline::read(&path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Skipping ontology {}: {}", config.relative(&path), e);
                continue;
            }
        };
        match index.insert_document(&doc) {
            Some(id) => debug!("Loaded ontology '{}' from {}", id, config.relative(&path)),
            None => warn!(
                "Skipping ontology {}: no ontology.id declared",
                config.relative(&path)
            ),
        }
    }

    Ok(index)
}
