//! Model file persistence.
//!
//! The model file is the only artifact `qna build` produces. It is UTF-8
//! JSON indented by two spaces, in the `{ version, size, index }` layout
//! described in [`qna_intents_core::models`]. Loading goes through the
//! validating deserializer, so anything returned here is safe to match
//! against.

use anyhow::{Context, Result};
use std::path::Path;

use qna_intents_core::Model;

/// Serialize `model` to `path`, creating parent directories as needed.
pub fn write_model(path: &Path, model: &Model) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let text = serde_json::to_string_pretty(model)?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write model file: {}", path.display()))?;
    Ok(())
}

/// Read and validate a model file.
pub fn load_model(path: &Path) -> Result<Model> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    let model: Model = serde_json::from_str(&content)
        .with_context(|| format!("Invalid model file: {}", path.display()))?;
    Ok(model)
}
