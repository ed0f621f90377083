//! 本体 JSON-LD 导出服务

use crate::config::AppConfig;
use crate::error::{MifError, Result};
use crate::models::ontology::OntologyDocument;
use crate::services::{ONTOLOGY_SUFFIX, discover, read_json};
use crate::transform::ontology::OntologyTransformer;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 导出输出文件扩展名
pub const OUTPUT_EXTENSION: &str = "jsonld";

/// 批量导出中单个文件的结果
#[derive(Debug)]
pub enum ExportOutcome {
    Converted { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: MifError },
}

impl ExportOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ExportOutcome::Converted { .. })
    }
}

/// 默认输出路径：替换扩展名为 `.jsonld`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

pub struct OntologyExporter<'a> {
    config: &'a AppConfig,
    transformer: OntologyTransformer,
}

impl<'a> OntologyExporter<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            transformer: OntologyTransformer::new(config.format.ontology_scheme.clone()),
        }
    }

    /// 读取上下文文件中的 `@context` 成员
    pub fn load_context(&self) -> Result<Value> {
        let path = self.config.resolve(&self.config.paths.ontology_context);
        if !path.exists() {
            return Err(MifError::Context(format!(
                "context file not found: {}",
                path.display()
            )));
        }
        let document = read_json(&path)?;
        document
            .get("@context")
            .cloned()
            .ok_or_else(|| MifError::Context(format!("no @context member in {}", path.display())))
    }

    /// 转换单个文件，返回实际写入的输出路径
    pub fn convert_file(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        if !input.exists() {
            return Err(MifError::NotFound(format!(
                "input file not found: {}",
                input.display()
            )));
        }
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(input));

        let doc = OntologyDocument::read(input)?;
        let context = self.load_context()?;
        let linked = self.transformer.to_linked_data(&doc, &context);

        let text = serde_json::to_string_pretty(&linked)?;
        std::fs::write(&output, text)?;
        debug!("Wrote {}", output.display());
        Ok(output)
    }

    /// 递归转换本体根目录下的全部本体；单个失败不影响其他文件
    pub fn convert_all(&self) -> Result<Vec<ExportOutcome>> {
        let root = self.config.resolve(&self.config.paths.ontology_root);
        if !root.is_dir() {
            warn!("Ontologies directory not found: {}", root.display());
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::new();
        for input in discover(&root, ONTOLOGY_SUFFIX, true)? {
            let outcome = match self.convert_file(&input, None) {
                Ok(output) => ExportOutcome::Converted { input, output },
                Err(error) => {
                    warn!("Error converting {}: {}", input.display(), error);
                    ExportOutcome::Failed { input, error }
                }
            };
            outcomes.push(outcome);
        }

        info!(
            "Converted {} of {} ontology files",
            outcomes.iter().filter(|o| o.is_converted()).count(),
            outcomes.len()
        );
        Ok(outcomes)
    }
}
