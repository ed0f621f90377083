//! 本体文档模型
//!
//! 本体声明命名空间层级树、实体类型/特征/关系词汇表以及发现启发式规则。

use crate::error::{MifError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// 命名空间树的一层：名称 -> 节点（YAML 中可为空）
pub type NamespaceTree = IndexMap<String, Option<NamespaceEntry>>;

/// 任意取值的文本形式：字符串原样，其他值按 JSON 渲染
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 标识类取值：非空字符串、数字或布尔值
fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

/// 本体元数据块
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OntologyMeta {
    pub id: Option<Value>,
    pub version: Option<Value>,
    pub description: Option<Value>,
    pub schema_url: Option<Value>,
}

impl OntologyMeta {
    /// 标识的文本形式（YAML `id: 2024` -> `"2024"`）
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().and_then(scalar_id)
    }

    /// 版本号总是渲染为字符串（YAML `1.0` -> `"1.0"`）
    pub fn version_string(&self) -> Option<String> {
        self.version.as_ref().map(value_text)
    }
}

/// 命名空间节点的取值形式
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NamespaceEntry {
    /// 只有描述文本
    Description(String),
    /// 完整节点
    Node(NamespaceNode),
    /// 其他无法识别的取值，只保留节点名
    Other(Value),
}

impl NamespaceNode {
    pub fn replaces_path(&self) -> Option<String> {
        self.replaces.as_ref().map(value_text)
    }
}

impl NamespaceEntry {
    pub fn children(&self) -> Option<&NamespaceTree> {
        match self {
            NamespaceEntry::Node(node) => node.children.as_ref(),
            _ => None,
        }
    }
}

/// 命名空间节点
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceNode {
    pub description: Option<Value>,
    pub type_hint: Option<Value>,
    /// 被本节点取代的命名空间路径
    pub replaces: Option<Value>,
    pub children: Option<NamespaceTree>,
}

/// 实体类型定义
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityTypeDef {
    pub name: Option<String>,
    pub base: Option<String>,
    pub description: Option<Value>,
    /// 必需的特征名称
    pub traits: Option<Vec<String>>,
    pub schema: Option<Value>,
}

/// 实体类型集合，支持列表和映射两种写法
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntityTypes {
    List(Vec<EntityTypeDef>),
    Map(IndexMap<String, EntityTypeDef>),
}

impl Default for EntityTypes {
    fn default() -> Self {
        EntityTypes::List(Vec::new())
    }
}

impl EntityTypes {
    /// 统一为列表形式；映射形式中条目自带的 `name` 优先于键名
    pub fn to_list(&self) -> Vec<EntityTypeDef> {
        match self {
            EntityTypes::List(list) => list.clone(),
            EntityTypes::Map(map) => map
                .iter()
                .map(|(key, def)| EntityTypeDef {
                    name: def.name.clone().or_else(|| Some(key.clone())),
                    ..def.clone()
                })
                .collect(),
        }
    }
}

/// 特征定义
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraitDef {
    pub description: Option<Value>,
    pub fields: Option<Value>,
    pub requires: Option<Value>,
}

/// 关系定义
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipDef {
    pub description: Option<Value>,
    pub from: Option<Vec<String>>,
    pub to: Option<Vec<String>>,
    pub symmetric: Option<bool>,
}

/// 发现规则配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
    pub enabled: Option<bool>,
    pub confidence_threshold: Option<f64>,
    pub patterns: Option<Vec<DiscoveryPattern>>,
}

/// 单条发现规则
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryPattern {
    pub content_pattern: Option<Value>,
    pub file_pattern: Option<Value>,
    pub suggest_entity: Option<String>,
    pub suggest_namespace: Option<Value>,
}

/// 本体文档
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OntologyDocument {
    pub ontology: Option<OntologyMeta>,
    pub namespaces: Option<NamespaceTree>,
    #[serde(default)]
    pub entity_types: EntityTypes,
    pub traits: Option<IndexMap<String, TraitDef>>,
    pub relationships: Option<IndexMap<String, RelationshipDef>>,
    pub discovery: Option<DiscoveryConfig>,
    /// 没有 `ontology` 块时，元数据直接写在顶层
    #[serde(flatten)]
    pub top_level: OntologyMeta,
}

impl OntologyDocument {
    /// 从 YAML 文本解析；空文档视为错误
    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
        if raw.is_null() {
            return Err(MifError::Parse("empty or invalid YAML document".to_string()));
        }
        Ok(serde_yaml::from_value(raw)?)
    }

    /// 从文件读取并解析
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// 元数据：优先 `ontology` 块，否则顶层字段
    pub fn metadata(&self) -> &OntologyMeta {
        self.ontology.as_ref().unwrap_or(&self.top_level)
    }

    /// 展平后的全部命名空间路径（包含中间节点）
    pub fn namespace_paths(&self) -> BTreeSet<String> {
        self.namespaces
            .as_ref()
            .map(|tree| flatten_namespaces(tree, None))
            .unwrap_or_default()
    }
}

/// 命名空间索引用到的本体子集：只读取 `ontology.id` 与 `namespaces`
///
/// 词汇表等其他部分即使结构有误，也不影响命名空间的加载。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceOutline {
    pub ontology: Option<Value>,
    pub namespaces: Option<NamespaceTree>,
}

impl NamespaceOutline {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
        if raw.is_null() {
            return Err(MifError::Parse("empty or invalid YAML document".to_string()));
        }
        Ok(serde_yaml::from_value(raw)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// `ontology` 块中声明的 ID
    pub fn declared_id(&self) -> Option<String> {
        self.ontology
            .as_ref()
            .and_then(|meta| meta.get("id"))
            .and_then(scalar_id)
    }

    pub fn namespace_paths(&self) -> BTreeSet<String> {
        self.namespaces
            .as_ref()
            .map(|tree| flatten_namespaces(tree, None))
            .unwrap_or_default()
    }
}

/// 展平命名空间树：节点路径为 `父路径/名称`，根节点无前缀
pub fn flatten_namespaces(tree: &NamespaceTree, prefix: Option<&str>) -> BTreeSet<String> {
    tree.iter()
        .flat_map(|(name, entry)| {
            let path = match prefix {
                Some(parent) => format!("{parent}/{name}"),
                None => name.clone(),
            };
            let descendants = entry
                .as_ref()
                .and_then(NamespaceEntry::children)
                .map(|children| flatten_namespaces(children, Some(&path)))
                .unwrap_or_default();
            std::iter::once(path).chain(descendants)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_flatten_nested_tree() {
        let doc = OntologyDocument::from_yaml(
            "namespaces:\n  a:\n    children:\n      b: {}\n      c:\n        children:\n          d: {}\n",
        )
        .unwrap();

        assert_eq!(doc.namespace_paths(), set(&["a", "a/b", "a/c", "a/c/d"]));
    }

    #[test]
    fn test_flatten_mixed_node_forms() {
        let doc = OntologyDocument::from_yaml(
            "namespaces:\n  _semantic:\n    description: Facts\n    children:\n      preferences: User preferences\n      decisions:\n  _episodic: Events\n",
        )
        .unwrap();

        assert_eq!(
            doc.namespace_paths(),
            set(&[
                "_semantic",
                "_semantic/preferences",
                "_semantic/decisions",
                "_episodic"
            ])
        );
    }

    #[test]
    fn test_no_namespaces_is_empty_set() {
        let doc = OntologyDocument::from_yaml("ontology:\n  id: x\n").unwrap();
        assert!(doc.namespace_paths().is_empty());
        assert_eq!(doc.metadata().id_string().as_deref(), Some("x"));
    }

    #[test]
    fn test_entity_types_map_form() {
        let doc = OntologyDocument::from_yaml(
            "entity_types:\n  person:\n    base: semantic\n    traits: [named]\n  renamed:\n    name: company\n",
        )
        .unwrap();

        let list = doc.entity_types.to_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name.as_deref(), Some("person"));
        assert_eq!(list[0].traits, Some(vec!["named".to_string()]));
        assert_eq!(list[1].name.as_deref(), Some("company"));
    }

    #[test]
    fn test_metadata_falls_back_to_top_level() {
        let doc = OntologyDocument::from_yaml("id: flat\nversion: 1.0\n").unwrap();

        assert!(doc.ontology.is_none());
        assert_eq!(doc.metadata().id_string().as_deref(), Some("flat"));
        assert_eq!(doc.metadata().version_string().as_deref(), Some("1.0"));
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(
            OntologyDocument::from_yaml(""),
            Err(MifError::Parse(_))
        ));
    }

    #[test]
    fn test_children_kept_when_replaces_is_not_a_string() {
        let doc = OntologyDocument::from_yaml(
            "namespaces:\n  tools:\n    replaces: [old, older]\n    children:\n      cargo: {}\n",
        )
        .unwrap();

        assert_eq!(doc.namespace_paths(), set(&["tools", "tools/cargo"]));
        let Some(Some(NamespaceEntry::Node(node))) = doc.namespaces.as_ref().and_then(|t| t.get("tools")) else {
            panic!("tools should parse as a full node");
        };
        assert_eq!(node.replaces_path().as_deref(), Some(r#"["old","older"]"#));
    }

    #[test]
    fn test_outline_ignores_malformed_vocabulary() {
        let outline = NamespaceOutline::from_yaml(
            "ontology:\n  id: dev\nnamespaces:\n  tools:\n    children:\n      cargo: {}\nrelationships:\n  uses:\n    from: person\nentity_types: 12\n",
        )
        .unwrap();

        assert_eq!(outline.declared_id().as_deref(), Some("dev"));
        assert_eq!(outline.namespace_paths(), set(&["tools", "tools/cargo"]));
    }

    #[test]
    fn test_numeric_ontology_id_is_stringified() {
        let outline = NamespaceOutline::from_yaml("ontology:\n  id: 2024\nnamespaces:\n  a: {}\n").unwrap();
        assert_eq!(outline.declared_id().as_deref(), Some("2024"));

        let doc = OntologyDocument::from_yaml("ontology:\n  id: 2024\n").unwrap();
        assert_eq!(doc.metadata().id_string().as_deref(), Some("2024"));

        let anonymous = NamespaceOutline::from_yaml("ontology: just a string\n").unwrap();
        assert_eq!(anonymous.declared_id(), None);
    }
}
