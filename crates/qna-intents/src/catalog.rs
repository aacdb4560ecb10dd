//! Question template catalog files.
//!
//! A catalog is a JSON array of template records:
//!
//! ```json
//! [
//!   {
//!     "question": "Combien de sessions uniques (SESSIONID) sont enregistrées ?",
//!     "categorie": "Sessions",
//!     "champs": ["SESSIONID"],
//!     "reponse": "Exemples de sessions uniques : 994729870, 2315658237."
//!   }
//! ]
//! ```
//!
//! Only `question` and `categorie` matter to the index; the rest is kept
//! as-is. The raw form ([`load_raw`] / [`write_raw`]) is what `qna merge`
//! edits, so unknown fields and their values survive a rewrite.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

use qna_intents_core::TemplateEntry;

/// Load a catalog file as raw JSON records.
pub fn load_raw(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

    match value {
        Value::Array(items) => Ok(items),
        _ => bail!(
            "catalog file must contain a JSON array of templates: {}",
            path.display()
        ),
    }
}

/// Load a catalog file as typed template entries, in file order.
pub fn load_catalog(path: &Path) -> Result<Vec<TemplateEntry>> {
    load_raw(path)?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).with_context(|| {
                format!("Invalid template at position {} in {}", i, path.display())
            })
        })
        .collect()
}

/// Write raw records back as indented JSON, creating parent directories.
pub fn write_raw(path: &Path, items: &[Value]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    let mut text = serde_json::to_string_pretty(items)?;
    text.push('\n');
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write catalog file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_catalog_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("templates.json");
        std::fs::write(
            &path,
            r#"[
                {"question": "Quels hôtes ?", "categorie": "Infrastructure", "champs": ["USERHOST"]},
                {"categorie": "Vide"},
                {"question": "Combien de sessions ?", "category": "Sessions"}
            ]"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].question_text(), "Quels hôtes ?");
        assert_eq!(catalog[0].extra.get("champs"), Some(&json!(["USERHOST"])));
        assert_eq!(catalog[1].question, None);
        assert_eq!(catalog[2].category, "Sessions");
    }

    #[test]
    fn test_non_array_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("templates.json");
        std::fs::write(&path, r#"{"question": "x"}"#).unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.json");
        let err = load_raw(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_write_raw_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/templates.json");
        let items = vec![json!({"question": "a", "categorie": "b", "reponse": "c"})];
        write_raw(&path, &items).unwrap();
        assert_eq!(load_raw(&path).unwrap(), items);
    }

    #[test]
    fn test_field_order_survives_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("templates.json");
        std::fs::write(
            &path,
            r#"[{"question": "q", "reponse": "r", "categorie": "c", "champs": []}]"#,
        )
        .unwrap();

        let mut items = load_raw(&path).unwrap();
        crate::merge::merge_entries(&mut items, Vec::new());
        write_raw(&path, &items).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let q = text.find("\"question\"").unwrap();
        let r = text.find("\"reponse\"").unwrap();
        let c = text.find("\"categorie\"").unwrap();
        let f = text.find("\"champs\"").unwrap();
        assert!(q < r && r < c && c < f, "field order changed:\n{}", text);
    }
}
