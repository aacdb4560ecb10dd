//! `qna merge`: fold new question/answer records into the catalog file.
//!
//! # Usage
//!
//! ```bash
//! qna merge --input ./data/qna_sample.json
//! qna merge --input ./data/qna_sample.json --dry-run
//! ```
//!
//! # Rules
//!
//! Each incoming record must be an object with a non-empty `question`, a
//! non-empty `categorie`, a `champs` array, and a non-empty `reponse`;
//! otherwise it is reported under `errors` and left out.
//!
//! Records are identified by a *merge key*: the question trimmed, with
//! whitespace runs collapsed and lowercased. Accents and punctuation stay
//! significant here, unlike the intent normalizer. A record whose merge
//! key already exists replaces the existing one if they differ
//! (`updated`) and is ignored otherwise (`skipped`); anything else is
//! appended (`added`). Records are compared by their serialized text, so
//! the same fields in a different order count as a difference and the
//! catalog takes the incoming layout.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::config::Config;

/// A rejected incoming record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeError {
    pub entry: Value,
    pub error: String,
}

/// Outcome counts of a merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<MergeError>,
}

/// Merge identity of a question.
pub fn merge_key(question: &str) -> String {
    question.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn non_empty_str<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// First rule `entry` breaks, if any.
pub fn validate_entry(entry: &Value) -> Option<&'static str> {
    if !entry.is_object() {
        return Some("invalid entry");
    }
    if non_empty_str(entry, "question").is_none() {
        return Some("missing question");
    }
    if non_empty_str(entry, "categorie").is_none() {
        return Some("missing categorie");
    }
    if !entry.get("champs").is_some_and(Value::is_array) {
        return Some("champs must be an array");
    }
    if non_empty_str(entry, "reponse").is_none() {
        return Some("missing reponse");
    }
    None
}

fn same_record(a: &Value, b: &Value) -> bool {
    a.to_string() == b.to_string()
}

/// Merge `incoming` into `existing` in place.
pub fn merge_entries(existing: &mut Vec<Value>, incoming: Vec<Value>) -> MergeReport {
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (i, entry) in existing.iter().enumerate() {
        if let Some(q) = entry.get("question").and_then(Value::as_str) {
            positions.insert(merge_key(q), i);
        }
    }

    let mut report = MergeReport::default();
    for entry in incoming {
        if let Some(error) = validate_entry(&entry) {
            report.errors.push(MergeError {
                entry,
                error: error.to_string(),
            });
            continue;
        }

        let key = merge_key(non_empty_str(&entry, "question").unwrap_or_default());
        match positions.get(&key) {
            Some(&i) if same_record(&existing[i], &entry) => report.skipped += 1,
            Some(&i) => {
                existing[i] = entry;
                report.updated += 1;
            }
            None => {
                positions.insert(key, existing.len());
                existing.push(entry);
                report.added += 1;
            }
        }
    }
    report
}

fn load_incoming(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input file: {}", path.display()))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => bail!(
            "input file must contain an array of Q/A objects: {}",
            path.display()
        ),
    }
}

/// CLI entry point for `qna merge`.
pub fn run_merge(
    config: &Config,
    input: &Path,
    catalog_path: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let catalog_path = catalog_path.unwrap_or_else(|| config.catalog.path.clone());
    let incoming = load_incoming(input)?;
    let mut working = catalog::load_raw(&catalog_path)?;

    let report = merge_entries(&mut working, incoming);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if dry_run {
        println!("[DRY RUN] Catalog not written.");
        return Ok(());
    }

    catalog::write_raw(&catalog_path, &working)?;
    println!("Catalog updated: {}", catalog_path.display());
    Ok(())
}
