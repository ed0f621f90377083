//! 命名空间检查服务（仅警告）

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::memory::MemoryDocument;
use crate::namespace::{NamespaceIndex, NamespaceResolver, Resolution};
use crate::report::{BatchReport, Finding};
use crate::services::{load_namespace_index, memory_files};
use tracing::{debug, info, warn};

pub const WARNING_HEADING: &str = "Namespace validation warnings:";
pub const SUCCESS_HEADING: &str = "All memory namespaces validated successfully.";
pub const EXTENSION_NOTE: &str = "Note: Namespace extensions are allowed. Review warnings above.";

pub struct NamespaceValidationService<'a> {
    config: &'a AppConfig,
}

impl<'a> NamespaceValidationService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<BatchReport> {
        let index = load_namespace_index(self.config)?;
        info!("Loaded {} ontologies", index.len());
        self.run_with(&index)
    }

    /// 针对给定索引检查全部记录；无法解析的记录跳过
    pub fn run_with(&self, index: &NamespaceIndex) -> Result<BatchReport> {
        let format = &self.config.format;
        let resolver = NamespaceResolver::new(index, &format.base_ontology, format.marker());
        let mut report = BatchReport::new();

        for path in memory_files(self.config)? {
            let relative = self.config.relative(&path);
            let doc = match MemoryDocument::read(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Skipping {}: {}", relative, e);
                    continue;
                }
            };

            let namespace = doc.namespace();
            let ontology = doc.ontology_id();
            let resolution = resolver.resolve(namespace, ontology);
            debug!("{}: namespace '{}' -> {:?}", relative, namespace, resolution);

            let findings = match resolution {
                Resolution::Unresolved => {
                    warn!("{}: namespace '{}' not found", relative, namespace);
                    vec![Finding::NamespaceUnresolved {
                        namespace: namespace.to_string(),
                        ontology: ontology.map(str::to_string),
                    }]
                }
                _ => Vec::new(),
            };
            report.record(relative, findings);
        }

        Ok(report)
    }
}
