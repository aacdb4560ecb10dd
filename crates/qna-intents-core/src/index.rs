//! Catalog → [`Model`] builder.
//!
//! A single fold over the catalog in order:
//!
//! 1. Normalize the template's question.
//! 2. Skip it if the normalized form is empty.
//! 3. Otherwise record `key → { templateIndex, category }`, replacing any
//!    earlier template with the same key (last write wins, first position
//!    kept).
//!
//! An empty catalog, or one where every question is unindexable, yields a
//! valid empty model rather than an error.

use crate::models::{IndexEntry, Model, ModelIndex, TemplateEntry};
use crate::normalize::normalize;

/// A key that a later template took over from an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    pub key: String,
    pub previous_index: usize,
    pub template_index: usize,
}

/// What happened to each catalog entry during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of catalog entries seen.
    pub entries: usize,
    /// Catalog positions whose question normalized to nothing.
    pub skipped: Vec<usize>,
    /// Last-write-wins replacements, in catalog order.
    pub overwritten: Vec<Overwrite>,
}

/// Build a model from `catalog`. The catalog is not modified.
pub fn build(catalog: &[TemplateEntry]) -> Model {
    build_with_stats(catalog).0
}

/// Same as [`build`], also reporting skipped and overwritten entries.
pub fn build_with_stats(catalog: &[TemplateEntry]) -> (Model, BuildStats) {
    let (index, stats) = catalog.iter().enumerate().fold(
        (
            ModelIndex::default(),
            BuildStats {
                entries: catalog.len(),
                ..BuildStats::default()
            },
        ),
        |(mut index, mut stats), (i, template)| {
            let key = normalize(template.question_text());
            if key.is_empty() {
                stats.skipped.push(i);
                return (index, stats);
            }

            let entry = IndexEntry {
                template_index: i,
                category: template.category.clone(),
            };
            if let Some(prev) = index.insert(key.clone(), entry) {
                stats.overwritten.push(Overwrite {
                    key,
                    previous_index: prev.template_index,
                    template_index: i,
                });
            }
            (index, stats)
        },
    );

    (Model::from_index(index), stats)
}
