//! Model statistics.
//!
//! `qna stats` gives a quick look at a built model: schema version, key
//! count, and how keys spread across categories. Handy after a `qna build`
//! to confirm that the catalog indexed as expected.

use anyhow::Result;
use std::path::PathBuf;

use qna_intents_core::Model;

use crate::config::Config;
use crate::model_file;

/// Render the stats report for `model`.
pub fn render_stats(model_path: &str, model: &Model) -> String {
    let mut out = String::new();
    out.push_str("QnA Intents — Model Stats\n");
    out.push_str("=========================\n\n");
    out.push_str(&format!("  Model:       {}\n", model_path));
    out.push_str(&format!("  Version:     {}\n", model.version()));
    out.push_str(&format!("  Keys:        {}\n", model.size()));

    let categories = model.categories();
    if categories.is_empty() {
        return out;
    }

    out.push_str("\n  By category:\n");
    let width = categories.keys().map(|c| c.chars().count()).max().unwrap_or(0);
    for (category, count) in &categories {
        let label = if category.is_empty() {
            "(none)"
        } else {
            *category
        };
        out.push_str(&format!("    {:<width$}  {}\n", label, count, width = width.max(6)));
    }
    out
}

/// CLI entry point for `qna stats`.
pub fn run_stats(config: &Config, model_path: Option<PathBuf>) -> Result<()> {
    let model_path = model_path.unwrap_or_else(|| config.model.path.clone());
    let model = model_file::load_model(&model_path)?;
    print!("{}", render_stats(&model_path.display().to_string(), &model));
    Ok(())
}
