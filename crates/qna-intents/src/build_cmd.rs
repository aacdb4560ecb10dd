//! `qna build`: catalog file → model file.
//!
//! # Usage
//!
//! ```bash
//! qna build
//! qna build --catalog ./data/question_templates.json --output ./data/intents_model.json
//! qna build --progress json
//! ```
//!
//! On success prints `Intent model written: <path> (entries: <size>)` on
//! stdout. Progress goes to stderr.

use anyhow::Result;
use std::path::{Path, PathBuf};

use qna_intents_core::{build_with_stats, Model};

use crate::catalog;
use crate::config::Config;
use crate::model_file;
use crate::progress::{BuildProgressEvent, BuildProgressReporter, ProgressMode};

/// Load `catalog_path`, build the model, and write it to `output`.
pub fn build_model_file(
    catalog_path: &Path,
    output: &Path,
    reporter: &dyn BuildProgressReporter,
) -> Result<Model> {
    let templates = catalog::load_catalog(catalog_path)?;
    reporter.report(BuildProgressEvent::CatalogLoaded {
        path: catalog_path.display().to_string(),
        entries: templates.len() as u64,
    });

    let (model, stats) = build_with_stats(&templates);
    for position in stats.skipped {
        reporter.report(BuildProgressEvent::Skipped { position });
    }
    for ow in stats.overwritten {
        reporter.report(BuildProgressEvent::Overwritten {
            key: ow.key,
            previous: ow.previous_index,
            position: ow.template_index,
        });
    }

    model_file::write_model(output, &model)?;
    reporter.report(BuildProgressEvent::ModelWritten {
        path: output.display().to_string(),
        size: model.size() as u64,
    });

    Ok(model)
}

/// CLI entry point for `qna build`.
pub fn run_build(
    config: &Config,
    catalog_path: Option<PathBuf>,
    output: Option<PathBuf>,
    progress: ProgressMode,
) -> Result<()> {
    let catalog_path = catalog_path.unwrap_or_else(|| config.catalog.path.clone());
    let output = output.unwrap_or_else(|| config.model.path.clone());
    let reporter = progress.reporter();

    let model = build_model_file(&catalog_path, &output, reporter.as_ref())?;

    let shown = std::path::absolute(&output).unwrap_or(output);
    println!(
        "Intent model written: {} (entries: {})",
        shown.display(),
        model.size()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<BuildProgressEvent>>);

    impl BuildProgressReporter for Recorder {
        fn report(&self, event: BuildProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_build_reports_skips_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let catalog_path = tmp.path().join("templates.json");
        std::fs::write(
            &catalog_path,
            r#"[
                {"question": "Quel est le statut ?", "categorie": "a"},
                {"question": "???", "categorie": "b"},
                {"question": "quel EST le statut", "categorie": "c"}
            ]"#,
        )
        .unwrap();
        let output = tmp.path().join("data/intents_model.json");

        let recorder = Recorder::default();
        let model = build_model_file(&catalog_path, &output, &recorder).unwrap();
        assert_eq!(model.size(), 1);
        assert!(output.exists());

        let events = recorder.0.into_inner().unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            BuildProgressEvent::CatalogLoaded { entries: 3, .. }
        ));
        assert_eq!(events[1], BuildProgressEvent::Skipped { position: 1 });
        assert_eq!(
            events[2],
            BuildProgressEvent::Overwritten {
                key: "quel est le statut".into(),
                previous: 0,
                position: 2,
            }
        );
        assert!(matches!(
            events[3],
            BuildProgressEvent::ModelWritten { size: 1, .. }
        ));
    }

    #[test]
    fn test_build_missing_catalog_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("model.json");
        let err = build_model_file(&tmp.path().join("absent.json"), &output, &Recorder::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
        assert!(!output.exists());
    }
}
