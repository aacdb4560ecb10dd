//! Value types shared by the builder, the matcher, and the CLI.
//!
//! The serialized [`Model`] layout is a compatibility surface: existing
//! model files look like
//!
//! ```json
//! {
//!   "version": 1,
//!   "size": 1,
//!   "index": {
//!     "quel est le statut de la commande": { "templateIndex": 0, "categorie": "orders" }
//!   }
//! }
//! ```
//!
//! and must keep loading. Key order inside `index` is significant: it is the
//! order the matcher scans, and therefore decides ties.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use anyhow::{bail, Error};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::normalize::{normalize, tokenize};

/// Schema version written into every model file.
pub const MODEL_VERSION: u32 = 1;

/// One question template from the catalog.
///
/// Only `question` and `category` are read by the core; every other field
/// of the catalog record is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(rename = "categorie", alias = "category", default)]
    pub category: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TemplateEntry {
    pub fn new(question: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            category: category.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// The question text, with an absent question read as empty.
    pub fn question_text(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }
}

/// Where a normalized key points back to in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Position of the template in the originating catalog.
    #[serde(rename = "templateIndex")]
    pub template_index: usize,
    /// Category copied from the template at build time. Files written for
    /// templates without a category omit the field.
    #[serde(rename = "categorie", alias = "category", default)]
    pub category: String,
}

/// An indexed key with its pre-split tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IndexedKey {
    pub(crate) key: String,
    pub(crate) entry: IndexEntry,
    pub(crate) tokens: Vec<String>,
}

/// Insertion-ordered map from normalized key to [`IndexEntry`].
///
/// Re-inserting an existing key replaces its entry in place, so a key
/// keeps the position of its first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ModelIndex {
    records: Vec<IndexedKey>,
    positions: HashMap<String, usize>,
}

impl ModelIndex {
    /// Insert or replace `key`, returning the entry it replaced.
    pub(crate) fn insert(&mut self, key: String, entry: IndexEntry) -> Option<IndexEntry> {
        if let Some(&pos) = self.positions.get(&key) {
            return Some(std::mem::replace(&mut self.records[pos].entry, entry));
        }
        let tokens = tokenize(&key);
        self.positions.insert(key.clone(), self.records.len());
        self.records.push(IndexedKey { key, entry, tokens });
        None
    }

    pub(crate) fn records(&self) -> &[IndexedKey] {
        &self.records
    }

    fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.positions.get(key).map(|&pos| &self.records[pos].entry)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

impl Serialize for ModelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for rec in &self.records {
            map.serialize_entry(&rec.key, &rec.entry)?;
        }
        map.end()
    }
}

/// Compiled intent index. Immutable once built.
///
/// Produced by [`crate::index::build`] or by deserializing a model file;
/// deserialization validates the schema version, the key form, and the
/// declared size. To reload, build or load a new `Model` and swap the
/// shared reference (e.g. an `Arc<Model>`); there is no in-place update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct Model {
    version: u32,
    size: usize,
    index: ModelIndex,
}

impl Model {
    pub(crate) fn from_index(index: ModelIndex) -> Self {
        Self {
            version: MODEL_VERSION,
            size: index.len(),
            index,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of distinct normalized keys.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.index.get(key)
    }

    /// Keys in index order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.records().iter().map(|r| r.key.as_str())
    }

    /// `(key, entry)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.index.records().iter().map(|r| (r.key.as_str(), &r.entry))
    }

    /// Number of keys per category, sorted by category name.
    pub fn categories(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for rec in self.index.records() {
            *counts.entry(rec.entry.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn records(&self) -> &[IndexedKey] {
        self.index.records()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::from_index(ModelIndex::default())
    }
}

/// Wire form of a model file, before validation.
#[derive(Deserialize)]
struct RawModel {
    version: u32,
    size: usize,
    index: RawIndex,
}

/// `index` object entries in document order, duplicates included.
struct RawIndex(Vec<(String, IndexEntry)>);

impl<'de> Deserialize<'de> for RawIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawIndexVisitor;

        impl<'de> Visitor<'de> for RawIndexVisitor {
            type Value = RawIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping normalized keys to index entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawIndex, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, IndexEntry>()? {
                    entries.push((key, entry));
                }
                Ok(RawIndex(entries))
            }
        }

        deserializer.deserialize_map(RawIndexVisitor)
    }
}

impl TryFrom<RawModel> for Model {
    type Error = Error;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        if raw.version != MODEL_VERSION {
            bail!(
                "unsupported model version {} (expected {})",
                raw.version,
                MODEL_VERSION
            );
        }

        let mut index = ModelIndex::default();
        for (key, entry) in raw.index.0 {
            if key.is_empty() {
                bail!("model index contains an empty key");
            }
            if normalize(&key) != key {
                bail!("model key is not normalized: {:?}", key);
            }
            index.insert(key, entry);
        }

        if raw.size != index.len() {
            bail!(
                "model declares size {} but its index holds {} keys",
                raw.size,
                index.len()
            );
        }

        Ok(Model::from_index(index))
    }
}

/// Outcome of matching one question against a [`Model`].
///
/// `key` is `None` only for an empty model. A zero `score` with a key means
/// nothing overlapped; thresholds are the caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub key: Option<String>,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
}

/// Write whole-number scores (`0`, `1`) as JSON integers and everything
/// else as a float, so output reads `"score": 1` rather than `1.0`.
pub(crate) fn serialize_score<S: Serializer>(
    score: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if score.is_finite() && score.fract() == 0.0 && score.abs() < 1e15 {
        serializer.serialize_i64(*score as i64)
    } else {
        serializer.serialize_f64(*score)
    }
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            key: None,
            score: 0.0,
        }
    }
}
