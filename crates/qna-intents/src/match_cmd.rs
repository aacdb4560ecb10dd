//! `qna match`: score one question against a model file.
//!
//! # Usage
//!
//! ```bash
//! qna match --question "statut commande ?"
//! qna match --question "statut commande ?" --model ./data/intents_model.json --explain --top 3
//! ```
//!
//! # Response Shape
//!
//! ```json
//! {
//!   "question": "statut commande ?",
//!   "match": { "key": "quel est le statut de la commande", "score": 0.2857142857142857 }
//! }
//! ```
//!
//! A whole-number score is printed as an integer (`0`, `1`); any other
//! score is a float.
//!
//! `explain` and `candidates` are added only when `--explain` / `--top`
//! are given. The command never applies a confidence threshold.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use qna_intents_core::{best_match, explain, rank, tokenize, MatchResult, Model, ScoredIntent};

use crate::config::Config;
use crate::model_file;

/// Scoring breakdown for the winning key.
#[derive(Debug, Clone, Serialize)]
pub struct MatchExplanation {
    /// Deduplicated query tokens, in first-seen order.
    pub query_tokens: Vec<String>,
    pub overlap: usize,
    pub key_tokens: usize,
    pub template_index: usize,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutput {
    pub question: String,
    #[serde(rename = "match")]
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<MatchExplanation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ScoredIntent>>,
}

fn unique_tokens(question: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(question)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Match `question` against an in-memory model.
pub fn match_question(
    model: &Model,
    question: &str,
    with_explain: bool,
    top: Option<usize>,
) -> MatchOutput {
    let result = best_match(question, model);

    let explanation = if with_explain {
        explain(question, model).map(|best| MatchExplanation {
            query_tokens: unique_tokens(question),
            overlap: best.overlap,
            key_tokens: best.key_tokens,
            template_index: best.template_index,
            category: best.category,
        })
    } else {
        None
    };

    MatchOutput {
        question: question.to_string(),
        result,
        explain: explanation,
        candidates: top.map(|n| rank(question, model, n)),
    }
}

/// CLI entry point for `qna match`.
pub fn run_match(
    config: &Config,
    question: &str,
    model_path: Option<PathBuf>,
    with_explain: bool,
    top: Option<usize>,
) -> Result<()> {
    let model_path = model_path.unwrap_or_else(|| config.model.path.clone());
    let model = model_file::load_model(&model_path)?;

    if model.is_empty() {
        eprintln!(
            "Warning: model {} has no keys; nothing can match.",
            model_path.display()
        );
    }

    let output = match_question(&model, question, with_explain, top);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
