//! 记忆记录字段映射
//!
//! 将 YAML 头部（snake_case 原生命名）映射为 JSON-LD 规范记录（camelCase）。
//! 每种嵌套块有各自的重命名表，互不影响；不在识别集合中的顶层键不进入规范形式，
//! 自由扩展字段必须写在 `extensions` 下。

use crate::config::FormatConfig;
use crate::models::memory::MemoryDocument;
use crate::transform::canonicalize::canonicalize;
use serde_json::{Map, Value};

/// 有独立重命名表的嵌套块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Temporal,
    Decay,
    Embedding,
    Provenance,
    Citation,
}

impl BlockKind {
    /// 原生键 -> 规范键
    pub const fn renames(self) -> &'static [(&'static str, &'static str)] {
        match self {
            BlockKind::Temporal => &[
                ("valid_from", "validFrom"),
                ("valid_until", "validUntil"),
                ("recorded_at", "recordedAt"),
                ("access_count", "accessCount"),
                ("last_accessed", "lastAccessed"),
            ],
            BlockKind::Decay => &[("last_reinforced", "lastReinforced")],
            BlockKind::Embedding => &[
                ("model_version", "modelVersion"),
                ("source_text", "sourceText"),
            ],
            BlockKind::Provenance => &[
                ("source_type", "sourceType"),
                ("trust_level", "trustLevel"),
            ],
            BlockKind::Citation => &[("type", "citationType"), ("role", "citationRole")],
        }
    }

    pub fn canonical_key(self, key: &str) -> &str {
        self.renames()
            .iter()
            .find(|(native, _)| *native == key)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(key)
    }

    /// 重命名映射中的键；表外的键原样保留
    pub fn rename(self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (self.canonical_key(key).to_string(), value.clone()))
            .collect()
    }
}

/// 顶层字段的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    /// 改写为 URN
    Identifier,
    /// 原样复制
    Copy,
    Temporal,
    Embedding,
    Provenance,
    Citations,
}

/// 识别的头部字段：原生键、规范键、处理方式
const FIELDS: &[(&str, &str, FieldRule)] = &[
    ("id", "@id", FieldRule::Identifier),
    ("type", "memoryType", FieldRule::Copy),
    ("created", "created", FieldRule::Copy),
    ("modified", "modified", FieldRule::Copy),
    ("namespace", "namespace", FieldRule::Copy),
    ("title", "title", FieldRule::Copy),
    ("tags", "tags", FieldRule::Copy),
    ("aliases", "aliases", FieldRule::Copy),
    ("temporal", "temporal", FieldRule::Temporal),
    ("provenance", "provenance", FieldRule::Provenance),
    ("embedding", "embedding", FieldRule::Embedding),
    ("entities", "entities", FieldRule::Copy),
    ("relationships", "relationships", FieldRule::Copy),
    ("citations", "citations", FieldRule::Citations),
    ("blocks", "blocks", FieldRule::Copy),
    ("extensions", "extensions", FieldRule::Copy),
];

/// 识别的原生头部键
pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|(native, _, _)| *native)
}

/// `temporal` 块，内部的 `decay` 子块使用自己的表
pub fn map_temporal(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };
    let mut temporal = BlockKind::Temporal.rename(map);
    if let Some(Value::Object(decay)) = temporal.get("decay") {
        let decay = BlockKind::Decay.rename(decay);
        temporal.insert("decay".to_string(), Value::Object(decay));
    }
    Value::Object(temporal)
}

pub fn map_embedding(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(BlockKind::Embedding.rename(map)),
        other => other.clone(),
    }
}

pub fn map_provenance(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(BlockKind::Provenance.rename(map)),
        other => other.clone(),
    }
}

/// 单条引用加上类型标记后重命名
pub fn map_citation(value: &Value, citation_type: &str) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };
    let mut citation = Map::new();
    citation.insert("@type".to_string(), Value::String(citation_type.to_string()));
    citation.extend(BlockKind::Citation.rename(map));
    Value::Object(citation)
}

pub fn map_citations(value: &Value, citation_type: &str) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| map_citation(item, citation_type))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// 头部 -> 规范记录映射器
#[derive(Debug, Clone)]
pub struct FieldMapper {
    context_url: String,
    memory_type: String,
    citation_type: String,
    urn_scheme: String,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(&FormatConfig::default())
    }
}

impl FieldMapper {
    pub fn new(format: &FormatConfig) -> Self {
        Self {
            context_url: format.context_url.clone(),
            memory_type: format.memory_type.clone(),
            citation_type: format.citation_type.clone(),
            urn_scheme: format.urn_scheme.clone(),
        }
    }

    /// 记录 ID 改写为 `urn:<scheme>:<id>`
    pub fn urn(&self, id: &Value) -> Value {
        let id = match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Value::String(format!("urn:{}:{}", self.urn_scheme, id))
    }

    /// 映射已规范化的头部；缺失字段不补默认值
    pub fn map(&self, header: &Map<String, Value>, body: &str) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(
            "@context".to_string(),
            Value::String(self.context_url.clone()),
        );
        record.insert("@type".to_string(), Value::String(self.memory_type.clone()));

        for (native, canonical, rule) in FIELDS {
            let Some(value) = header.get(*native) else {
                continue;
            };
            let mapped = match rule {
                FieldRule::Identifier => self.urn(value),
                FieldRule::Copy => value.clone(),
                FieldRule::Temporal => map_temporal(value),
                FieldRule::Embedding => map_embedding(value),
                FieldRule::Provenance => map_provenance(value),
                FieldRule::Citations => map_citations(value, &self.citation_type),
            };
            record.insert(canonical.to_string(), mapped);
        }

        record.insert("content".to_string(), Value::String(body.to_string()));
        record
    }

    /// 规范化标量后映射整篇文档
    pub fn canonical_record(&self, doc: &MemoryDocument) -> Map<String, Value> {
        let header = match canonicalize(&Value::Object(doc.header.clone()), &doc.plain_scalars) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.map(&header, &doc.body)
    }
}
