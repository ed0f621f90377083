//! 本体文档 schema 验证服务
//!
//! 直接验证原始 YAML 文档（转为 JSON 后），不经过类型化模型。

use crate::config::AppConfig;
use crate::error::Result;
use crate::report::{BatchReport, Finding};
use crate::services::ontology_files;
use crate::validation::{JsonSchemaValidator, SchemaValidator};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

pub const FAILURE_HEADING: &str = "Ontology validation FAILED:";
pub const SUCCESS_HEADING: &str = "All ontology files validated successfully.";

pub struct OntologyValidationService<'a> {
    config: &'a AppConfig,
}

impl<'a> OntologyValidationService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<BatchReport> {
        let schema_path = self.config.resolve(&self.config.paths.ontology_schema);
        let validator = JsonSchemaValidator::from_file(&schema_path)?;
        info!("Loaded ontology schema from {}", schema_path.display());
        self.run_with(&validator)
    }

    pub fn run_with<V: SchemaValidator + ?Sized>(&self, validator: &V) -> Result<BatchReport> {
        let mut report = BatchReport::new();

        for path in ontology_files(self.config)? {
            debug!("Validating {}", path.display());
            let findings = match load_raw(&path) {
                Ok(document) => validator
                    .violations(&document)
                    .into_iter()
                    .map(Finding::from)
                    .collect(),
                Err(e) => {
                    warn!("Could not load ontology {}: {}", path.display(), e);
                    vec![Finding::parse_failure(format!("YAML parse error: {e}"))]
                }
            };
            report.record(self.config.relative(&path), findings);
        }

        info!("Validated {} ontology files", report.files_checked);
        Ok(report)
    }
}

/// 读取 YAML 文档为 JSON 值
fn load_raw(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}
