//! 本体 JSON-LD 转换
//!
//! 单向：YAML 本体文档 -> JSON-LD。命名空间节点以完整路径为标识，
//! 实体类型、特征、关系以名称为标识，交叉引用改写为标识列表。

use crate::models::ontology::{
    DiscoveryConfig, DiscoveryPattern, EntityTypeDef, NamespaceEntry, NamespaceTree,
    OntologyDocument, RelationshipDef, TraitDef,
};
use serde_json::{Map, Value, json};

/// 缺省的发现置信度阈值
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// 本体转换器
#[derive(Debug, Clone)]
pub struct OntologyTransformer {
    scheme: String,
}

impl Default for OntologyTransformer {
    fn default() -> Self {
        Self::new("mif")
    }
}

impl OntologyTransformer {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }

    /// `<scheme>:<kind>/<name>`
    fn node_id(&self, kind: &str, name: &str) -> Value {
        Value::String(format!("{}:{}/{}", self.scheme, kind, name))
    }

    fn node_type(&self, kind: &str) -> Value {
        Value::String(format!("{}:{}", self.scheme, kind))
    }

    fn id_list(&self, kind: &str, names: &[String]) -> Value {
        Value::Array(names.iter().map(|name| self.node_id(kind, name)).collect())
    }

    /// 转换整篇本体文档；`context` 为上下文文件中的 `@context` 成员
    pub fn to_linked_data(&self, doc: &OntologyDocument, context: &Value) -> Value {
        let meta = doc.metadata();
        let mut out = Map::new();

        out.insert("@context".into(), context.clone());
        out.insert(
            "@id".into(),
            self.node_id(
                "ontology",
                meta.id_string().as_deref().unwrap_or("unknown"),
            ),
        );
        out.insert("@type".into(), self.node_type("Ontology"));

        if let Some(id) = &meta.id {
            out.insert("identifier".into(), id.clone());
        }
        if let Some(version) = meta.version_string() {
            out.insert("version".into(), Value::String(version));
        }
        if let Some(description) = &meta.description {
            out.insert("description".into(), description.clone());
        }
        if let Some(schema_url) = &meta.schema_url {
            out.insert("schema_url".into(), schema_url.clone());
        }

        if let Some(namespaces) = &doc.namespaces {
            out.insert(
                "namespaces".into(),
                Value::Object(self.transform_namespaces(namespaces, None)),
            );
        }

        let entity_types = doc.entity_types.to_list();
        if !entity_types.is_empty() {
            out.insert(
                "entity_types".into(),
                Value::Array(
                    entity_types
                        .iter()
                        .map(|et| self.transform_entity_type(et))
                        .collect(),
                ),
            );
        }

        if let Some(traits) = &doc.traits {
            let traits = traits
                .iter()
                .map(|(name, def)| (name.clone(), self.transform_trait(name, def)))
                .collect();
            out.insert("traits".into(), Value::Object(traits));
        }

        if let Some(relationships) = &doc.relationships {
            let relationships = relationships
                .iter()
                .map(|(name, def)| (name.clone(), self.transform_relationship(name, def)))
                .collect();
            out.insert("relationships".into(), Value::Object(relationships));
        }

        if let Some(discovery) = &doc.discovery {
            out.insert("discovery".into(), self.transform_discovery(discovery));
        }

        Value::Object(out)
    }

    fn transform_namespaces(&self, tree: &NamespaceTree, parent: Option<&str>) -> Map<String, Value> {
        tree.iter()
            .map(|(name, entry)| {
                (
                    name.clone(),
                    self.transform_namespace(name, entry.as_ref(), parent),
                )
            })
            .collect()
    }

    /// 命名空间节点，子节点递归
    pub fn transform_namespace(
        &self,
        name: &str,
        entry: Option<&NamespaceEntry>,
        parent: Option<&str>,
    ) -> Value {
        let full_path = match parent {
            Some(parent) => format!("{parent}/{name}"),
            None => name.to_string(),
        };

        let mut node = Map::new();
        node.insert("@id".into(), self.node_id("namespace", &full_path));
        node.insert("@type".into(), self.node_type("Namespace"));
        node.insert("name".into(), Value::String(name.to_string()));

        match entry {
            Some(NamespaceEntry::Description(text)) => {
                node.insert("description".into(), Value::String(text.clone()));
            }
            Some(NamespaceEntry::Node(detail)) => {
                if let Some(description) = &detail.description {
                    node.insert("description".into(), description.clone());
                }
                if let Some(type_hint) = &detail.type_hint {
                    node.insert("type_hint".into(), type_hint.clone());
                }
                if let Some(replaces) = detail.replaces_path() {
                    node.insert("replaces".into(), self.node_id("namespace", &replaces));
                }
                if let Some(children) = &detail.children {
                    node.insert(
                        "children".into(),
                        Value::Object(self.transform_namespaces(children, Some(&full_path))),
                    );
                }
            }
            Some(NamespaceEntry::Other(_)) | None => {}
        }

        Value::Object(node)
    }

    pub fn transform_entity_type(&self, def: &EntityTypeDef) -> Value {
        let name = def.name.as_deref().unwrap_or("unknown");

        let mut node = Map::new();
        node.insert("@id".into(), self.node_id("entityType", name));
        node.insert("@type".into(), self.node_type("EntityType"));
        node.insert("name".into(), Value::String(name.to_string()));
        node.insert(
            "base".into(),
            Value::String(def.base.clone().unwrap_or_else(|| "semantic".to_string())),
        );

        if let Some(description) = &def.description {
            node.insert("description".into(), description.clone());
        }
        if let Some(traits) = &def.traits {
            node.insert("traits".into(), self.id_list("trait", traits));
        }
        if let Some(schema) = &def.schema {
            node.insert("schema".into(), schema.clone());
        }

        Value::Object(node)
    }

    pub fn transform_trait(&self, name: &str, def: &TraitDef) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), self.node_id("trait", name));
        node.insert("@type".into(), self.node_type("Trait"));
        node.insert("name".into(), Value::String(name.to_string()));

        if let Some(description) = &def.description {
            node.insert("description".into(), description.clone());
        }
        if let Some(fields) = &def.fields {
            node.insert("fields".into(), fields.clone());
        }
        if let Some(requires) = &def.requires {
            node.insert("requires".into(), requires.clone());
        }

        Value::Object(node)
    }

    pub fn transform_relationship(&self, name: &str, def: &RelationshipDef) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), self.node_id("relationship", name));
        node.insert("@type".into(), self.node_type("Relationship"));
        node.insert("name".into(), Value::String(name.to_string()));

        if let Some(description) = &def.description {
            node.insert("description".into(), description.clone());
        }
        if let Some(from) = &def.from {
            node.insert("from".into(), self.id_list("entityType", from));
        }
        if let Some(to) = &def.to {
            node.insert("to".into(), self.id_list("entityType", to));
        }
        if let Some(symmetric) = def.symmetric {
            node.insert("symmetric".into(), Value::Bool(symmetric));
        }

        Value::Object(node)
    }

    fn transform_discovery(&self, discovery: &DiscoveryConfig) -> Value {
        let mut out = Map::new();
        out.insert("enabled".into(), Value::Bool(discovery.enabled.unwrap_or(false)));
        out.insert(
            "confidence_threshold".into(),
            json!(discovery
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)),
        );

        if let Some(patterns) = &discovery.patterns {
            out.insert(
                "patterns".into(),
                Value::Array(
                    patterns
                        .iter()
                        .enumerate()
                        .map(|(index, pattern)| self.transform_discovery_pattern(pattern, index))
                        .collect(),
                ),
            );
        }

        Value::Object(out)
    }

    /// 发现规则按下标编号
    pub fn transform_discovery_pattern(&self, pattern: &DiscoveryPattern, index: usize) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), self.node_id("pattern", &index.to_string()));
        node.insert("@type".into(), self.node_type("DiscoveryPattern"));

        if let Some(content_pattern) = &pattern.content_pattern {
            node.insert("content_pattern".into(), content_pattern.clone());
        }
        if let Some(file_pattern) = &pattern.file_pattern {
            node.insert("file_pattern".into(), file_pattern.clone());
        }
        if let Some(entity) = &pattern.suggest_entity {
            node.insert("suggest_entity".into(), self.node_id("entityType", entity));
        }
        if let Some(namespace) = &pattern.suggest_namespace {
            node.insert("suggest_namespace".into(), namespace.clone());
        }

        Value::Object(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ONTOLOGY: &str = r#"
ontology:
  id: dev-tools
  version: 1.0
  description: Developer tooling
namespaces:
  _semantic:
    description: Facts
    type_hint: semantic
    children:
      tools: Tool knowledge
  legacy:
    replaces: _semantic/tools
entity_types:
  - name: tool
    base: semantic
    traits: [versioned]
  - description: nameless
traits:
  versioned:
    fields: [version]
relationships:
  depends_on:
    from: [tool]
    to: [tool]
    symmetric: false
discovery:
  enabled: true
  patterns:
    - content_pattern: "cargo add"
      suggest_entity: tool
      suggest_namespace: _semantic/tools
"#;

    fn transform() -> Value {
        let doc = OntologyDocument::from_yaml(ONTOLOGY).unwrap();
        OntologyTransformer::default().to_linked_data(&doc, &json!({"mif": "https://mif-spec.dev/"}))
    }

    #[test]
    fn test_document_header() {
        let out = transform();

        assert_eq!(out["@context"], json!({"mif": "https://mif-spec.dev/"}));
        assert_eq!(out["@id"], json!("mif:ontology/dev-tools"));
        assert_eq!(out["@type"], json!("mif:Ontology"));
        assert_eq!(out["identifier"], json!("dev-tools"));
        assert_eq!(out["version"], json!("1.0"));
    }

    #[test]
    fn test_namespace_nodes() {
        let out = transform();

        assert_eq!(
            out["namespaces"]["_semantic"],
            json!({
                "@id": "mif:namespace/_semantic",
                "@type": "mif:Namespace",
                "name": "_semantic",
                "description": "Facts",
                "type_hint": "semantic",
                "children": {
                    "tools": {
                        "@id": "mif:namespace/_semantic/tools",
                        "@type": "mif:Namespace",
                        "name": "tools",
                        "description": "Tool knowledge"
                    }
                }
            })
        );
        assert_eq!(
            out["namespaces"]["legacy"]["replaces"],
            json!("mif:namespace/_semantic/tools")
        );
    }

    #[test]
    fn test_vocabulary_cross_references() {
        let out = transform();

        assert_eq!(out["entity_types"][0]["traits"], json!(["mif:trait/versioned"]));
        assert_eq!(out["entity_types"][1]["@id"], json!("mif:entityType/unknown"));
        assert_eq!(out["entity_types"][1]["base"], json!("semantic"));
        assert_eq!(out["traits"]["versioned"]["@id"], json!("mif:trait/versioned"));
        assert_eq!(out["traits"]["versioned"]["fields"], json!(["version"]));
        assert_eq!(
            out["relationships"]["depends_on"],
            json!({
                "@id": "mif:relationship/depends_on",
                "@type": "mif:Relationship",
                "name": "depends_on",
                "from": ["mif:entityType/tool"],
                "to": ["mif:entityType/tool"],
                "symmetric": false
            })
        );
    }

    #[test]
    fn test_discovery_patterns_indexed() {
        let out = transform();

        assert_eq!(out["discovery"]["enabled"], json!(true));
        assert_eq!(out["discovery"]["confidence_threshold"], json!(0.8));
        assert_eq!(
            out["discovery"]["patterns"][0],
            json!({
                "@id": "mif:pattern/0",
                "@type": "mif:DiscoveryPattern",
                "content_pattern": "cargo add",
                "suggest_entity": "mif:entityType/tool",
                "suggest_namespace": "_semantic/tools"
            })
        );
    }

    #[test]
    fn test_missing_sections_omitted() {
        let doc = OntologyDocument::from_yaml("ontology:\n  id: bare\n").unwrap();
        let out = OntologyTransformer::new("ex").to_linked_data(&doc, &Value::Null);

        assert_eq!(out["@id"], json!("ex:ontology/bare"));
        for key in ["namespaces", "entity_types", "traits", "relationships", "discovery"] {
            assert!(out.get(key).is_none(), "unexpected {key}");
        }
    }

    #[test]
    fn test_children_survive_odd_replaces() {
        let doc = OntologyDocument::from_yaml(
            "ontology:\n  id: 7\nnamespaces:\n  tools:\n    replaces: [old, older]\n    children:\n      cargo: {}\n",
        )
        .unwrap();
        let out = OntologyTransformer::default().to_linked_data(&doc, &Value::Null);

        assert_eq!(out["@id"], json!("mif:ontology/7"));
        assert_eq!(out["identifier"], json!(7));
        assert_eq!(
            out["namespaces"]["tools"]["replaces"],
            json!(r#"mif:namespace/["old","older"]"#)
        );
        assert_eq!(
            out["namespaces"]["tools"]["children"]["cargo"]["@id"],
            json!("mif:namespace/tools/cargo")
        );
    }
}
