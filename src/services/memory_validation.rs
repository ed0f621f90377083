//! 记忆记录 schema 验证服务

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::memory::MemoryDocument;
use crate::report::{BatchReport, Finding};
use crate::services::memory_files;
use crate::transform::memory::FieldMapper;
use crate::validation::{JsonSchemaValidator, SchemaValidator, ValidationAdapter};
use std::path::Path;
use tracing::{debug, info, warn};

pub const FAILURE_HEADING: &str = "Memory frontmatter validation FAILED:";
pub const SUCCESS_HEADING: &str = "All memory frontmatter validated successfully.";

/// 验证所有记忆记录的规范形式
pub struct MemoryValidationService<'a> {
    config: &'a AppConfig,
    mapper: FieldMapper,
}

impl<'a> MemoryValidationService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            mapper: FieldMapper::new(&config.format),
        }
    }

    /// 加载配置中的 schema 并验证全部记录
    ///
    /// schema 缺失或无法编译时返回错误，此时不处理任何记录。
    pub fn run(&self) -> Result<BatchReport> {
        let schema_path = self.config.resolve(&self.config.paths.memory_schema);
        let validator = JsonSchemaValidator::from_file(&schema_path)?;
        info!("Loaded memory schema from {}", schema_path.display());
        self.run_with(&validator)
    }

    /// 使用给定的验证器处理全部记录
    pub fn run_with<V: SchemaValidator + ?Sized>(&self, validator: &V) -> Result<BatchReport> {
        let adapter = ValidationAdapter::new(validator, &self.mapper);
        let mut report = BatchReport::new();

        for path in memory_files(self.config)? {
            let findings = self.check_file(&adapter, &path);
            report.record(self.config.relative(&path), findings);
        }

        info!(
            "Validated {} memory files, {} with findings",
            report.files_checked,
            report.files().count()
        );
        Ok(report)
    }

    fn check_file<V: SchemaValidator + ?Sized>(
        &self,
        adapter: &ValidationAdapter<'_, V>,
        path: &Path,
    ) -> Vec<Finding> {
        debug!("Validating {}", path.display());
        match MemoryDocument::read(path) {
            Ok(doc) => adapter.validate(&doc).into_iter().map(Finding::from).collect(),
            Err(e) => {
                warn!("Could not parse frontmatter in {}: {}", path.display(), e);
                vec![Finding::parse_failure(format!(
                    "Could not parse frontmatter: {e}"
                ))]
            }
        }
    }
}
