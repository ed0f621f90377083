//! 核心数据模型模块
//!
//! 记忆文档（YAML 头部 + 正文）与本体文档。

pub mod memory;
pub mod ontology;
pub mod scalar_style;

pub use memory::MemoryDocument;
pub use ontology::{NamespaceEntry, NamespaceOutline, NamespaceTree, OntologyDocument};
pub use scalar_style::{ScalarPaths, plain_scalar_paths};
