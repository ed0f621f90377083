//! Namespace Resolution Module
//!
//! Decides whether a record's namespace is acceptable given the flattened
//! namespace trees of the loaded ontologies. Resolution is warn-only: an
//! unresolved namespace is reported, never treated as a failure.

use crate::models::ontology::NamespaceOutline;
use std::collections::{BTreeSet, HashMap};

/// Flattened namespace paths per ontology id
#[derive(Debug, Clone, Default)]
pub struct NamespaceIndex {
    ontologies: HashMap<String, BTreeSet<String>>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ontology under its declared id; documents without one are ignored
    pub fn insert_document(&mut self, doc: &NamespaceOutline) -> Option<&str> {
        let id = doc.declared_id()?;
        self.ontologies.insert(id.clone(), doc.namespace_paths());
        self.ontologies.get_key_value(&id).map(|(key, _)| key.as_str())
    }

    pub fn insert(&mut self, id: impl Into<String>, paths: BTreeSet<String>) {
        self.ontologies.insert(id.into(), paths);
    }

    pub fn get(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.ontologies.get(id)
    }

    pub fn len(&self) -> usize {
        self.ontologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ontologies.is_empty()
    }
}

/// Outcome of resolving one namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No namespace declared
    Empty,
    /// Present verbatim in the base ontology
    Base,
    /// First segment is a base namespace; the rest is an unmodeled extension
    BaseExtension { confirmed: String },
    /// A segment below a base namespace matched the referenced domain ontology
    DomainSegment { ontology: String, segment: String },
    /// Present verbatim in the referenced domain ontology
    Domain { ontology: String },
    /// Present in the domain ontology once the leading marker is stripped
    DomainStripped { ontology: String },
    /// Nothing matched; reported as a warning only
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }
}

/// Namespace resolver over a [`NamespaceIndex`]
#[derive(Debug, Clone)]
pub struct NamespaceResolver<'a> {
    index: &'a NamespaceIndex,
    base_ontology: &'a str,
    marker: Option<char>,
    empty: BTreeSet<String>,
}

impl<'a> NamespaceResolver<'a> {
    pub fn new(index: &'a NamespaceIndex, base_ontology: &'a str, marker: Option<char>) -> Self {
        Self {
            index,
            base_ontology,
            marker,
            empty: BTreeSet::new(),
        }
    }

    fn base(&self) -> &BTreeSet<String> {
        self.index.get(self.base_ontology).unwrap_or(&self.empty)
    }

    /// Resolve `namespace`, optionally against the ontology the record references.
    ///
    /// Never fails: the worst outcome is [`Resolution::Unresolved`].
    pub fn resolve(&self, namespace: &str, ontology: Option<&str>) -> Resolution {
        if namespace.is_empty() {
            return Resolution::Empty;
        }

        let base = self.base();
        if base.contains(namespace) {
            return Resolution::Base;
        }

        let domain = ontology.and_then(|id| self.index.get(id).map(|paths| (id, paths)));

        let mut segments = namespace.split('/');
        let first = segments.next().unwrap_or_default();

        if base.contains(first) {
            let mut confirmed = first.to_string();
            for segment in segments {
                let candidate = format!("{confirmed}/{segment}");
                if base.contains(&candidate) {
                    confirmed = candidate;
                    continue;
                }
                match domain {
                    Some((id, paths)) => {
                        if paths.contains(&candidate) || paths.contains(segment) {
                            return Resolution::DomainSegment {
                                ontology: id.to_string(),
                                segment: segment.to_string(),
                            };
                        }
                        // keep walking from the last confirmed base path
                    }
                    None => return Resolution::BaseExtension { confirmed },
                }
            }
            return Resolution::BaseExtension { confirmed };
        }

        if let Some((id, paths)) = domain {
            if paths.contains(namespace) {
                return Resolution::Domain {
                    ontology: id.to_string(),
                };
            }
            let stripped = self
                .marker
                .and_then(|marker| namespace.strip_prefix(marker));
            if stripped.is_some_and(|stripped| paths.contains(stripped)) {
                return Resolution::DomainStripped {
                    ontology: id.to_string(),
                };
            }
        }

        Resolution::Unresolved
    }
}
