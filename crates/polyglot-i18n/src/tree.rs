//! Namespace trees and the per-language dictionary table

use polyglot_common::KEY_SEPARATOR;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// A node of a namespace tree: a translated string or a nested tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationNode {
    /// Leaf string.
    Text(String),
    /// Nested tree.
    Tree(NamespaceTree),
}

/// Mapping from keys to strings or nested trees. Leaves are strings only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTree(BTreeMap<String, TranslationNode>);

/// Returned when a loader produces something other than a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotATree {
    /// JSON type that was found instead.
    pub found: &'static str,
}

impl NamespaceTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a leaf or subtree at the top level.
    pub fn insert(&mut self, key: impl Into<String>, node: TranslationNode) {
        self.0.insert(key.into(), node);
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Descends the tree along a dotted path and returns the leaf string.
    ///
    /// A path that stops at a subtree, or runs into a leaf before its last
    /// segment, is simply not found.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut segments = path.split(KEY_SEPARATOR);
        let mut node = self.0.get(segments.next()?)?;

        for segment in segments {
            match node {
                TranslationNode::Tree(tree) => node = tree.0.get(segment)?,
                TranslationNode::Text(_) => return None,
            }
        }

        match node {
            TranslationNode::Text(text) => Some(text.as_str()),
            TranslationNode::Tree(_) => None,
        }
    }

    /// Total number of leaf strings in the tree.
    pub fn leaf_count(&self) -> usize {
        self.0
            .values()
            .map(|node| match node {
                TranslationNode::Text(_) => 1,
                TranslationNode::Tree(tree) => tree.leaf_count(),
            })
            .sum()
    }

    /// Builds a tree from loader output.
    ///
    /// The root must be an object. Nested values that are neither strings
    /// nor objects are dropped with a warning.
    pub fn from_json(value: Value) -> Result<Self, NotATree> {
        match value {
            Value::Object(map) => Ok(Self::from_object(map, "")),
            other => Err(NotATree {
                found: json_type(&other),
            }),
        }
    }

    fn from_object(map: serde_json::Map<String, Value>, prefix: &str) -> Self {
        let mut tree = BTreeMap::new();
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{KEY_SEPARATOR}{key}")
            };
            match value {
                Value::String(text) => {
                    tree.insert(key, TranslationNode::Text(text));
                }
                Value::Object(nested) => {
                    tree.insert(key, TranslationNode::Tree(Self::from_object(nested, &path)));
                }
                other => warn!(
                    "Dropping non-string translation value at '{}' ({})",
                    path,
                    json_type(&other)
                ),
            }
        }
        Self(tree)
    }
}

impl TryFrom<Value> for NamespaceTree {
    type Error = NotATree;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loaded dictionaries: language code -> namespace -> tree.
///
/// Slots are only ever filled with complete trees; a failed load leaves an
/// empty tree behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryTable(BTreeMap<String, BTreeMap<String, Arc<NamespaceTree>>>);

impl DictionaryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills a slot, replacing whatever was there.
    pub fn insert(&mut self, language: &str, namespace: &str, tree: Arc<NamespaceTree>) {
        self.0
            .entry(language.to_string())
            .or_default()
            .insert(namespace.to_string(), tree);
    }

    /// Returns the tree in a slot.
    pub fn get(&self, language: &str, namespace: &str) -> Option<&Arc<NamespaceTree>> {
        self.0.get(language)?.get(namespace)
    }

    /// Looks a path up in one slot.
    pub fn lookup(&self, language: &str, namespace: &str, path: &str) -> Option<&str> {
        self.get(language, namespace)?.lookup(path)
    }

    /// Whether any namespace of the language has been loaded.
    pub fn has_language(&self, language: &str) -> bool {
        self.0.contains_key(language)
    }

    /// Languages with at least one slot, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Namespaces loaded for a language, sorted.
    pub fn namespaces(&self, language: &str) -> Vec<String> {
        self.0
            .get(language)
            .map(|namespaces| namespaces.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterates over every `(language, namespace, tree)` slot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Arc<NamespaceTree>)> {
        self.0.iter().flat_map(|(language, namespaces)| {
            namespaces
                .iter()
                .map(move |(namespace, tree)| (language.as_str(), namespace.as_str(), tree))
        })
    }

    /// Builds a table from `{ language: { namespace: tree } }` JSON.
    pub fn from_json(value: Value) -> Result<Self, NotATree> {
        let languages = match value {
            Value::Object(languages) => languages,
            other => {
                return Err(NotATree {
                    found: json_type(&other),
                })
            }
        };

        let mut table = Self::new();
        for (language, namespaces) in languages {
            let namespaces = match namespaces {
                Value::Object(namespaces) => namespaces,
                other => {
                    return Err(NotATree {
                        found: json_type(&other),
                    })
                }
            };
            for (namespace, tree) in namespaces {
                table.insert(&language, &namespace, Arc::new(NamespaceTree::from_json(tree)?));
            }
        }
        Ok(table)
    }
}
