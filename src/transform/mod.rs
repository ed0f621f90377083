//! 转换模块
//!
//! 头部标量规范化、记忆记录字段映射、本体 JSON-LD 转换。

pub mod canonicalize;
pub mod memory;
pub mod ontology;

pub use canonicalize::{Temporal, canonicalize};
pub use memory::{BlockKind, FieldMapper};
pub use ontology::OntologyTransformer;
