//! Build progress reporting.
//!
//! `qna build` reports what it is doing (catalog loaded, templates skipped
//! or overwritten, model written) on **stderr**, so stdout stays
//! parseable for scripts. Output is either human-readable lines or one
//! JSON object per line.

use std::io::Write;

/// A single progress event emitted by `qna build`.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildProgressEvent {
    /// Catalog file read; `entries` templates to index.
    CatalogLoaded { path: String, entries: u64 },
    /// Template at `position` normalized to an empty question.
    Skipped { position: usize },
    /// `key` moved from template `previous` to template `position`.
    Overwritten {
        key: String,
        previous: usize,
        position: usize,
    },
    /// Model file written with `size` keys.
    ModelWritten { path: String, size: u64 },
}

/// Reports build progress. Implementations write to stderr (human or JSON).
pub trait BuildProgressReporter: Send + Sync {
    fn report(&self, event: BuildProgressEvent);
}

/// Human-friendly progress on stderr: "build  catalog  ./data/templates.json  1,234 templates".
pub struct StderrProgress;

impl BuildProgressReporter for StderrProgress {
    fn report(&self, event: BuildProgressEvent) {
        let line = match &event {
            BuildProgressEvent::CatalogLoaded { path, entries } => {
                format!("build  catalog  {}  {} templates\n", path, format_number(*entries))
            }
            BuildProgressEvent::Skipped { position } => {
                format!("build  skipped  template #{} (empty question)\n", position)
            }
            BuildProgressEvent::Overwritten {
                key,
                previous,
                position,
            } => {
                format!(
                    "build  overwritten  \"{}\"  template #{} -> #{}\n",
                    key, previous, position
                )
            }
            BuildProgressEvent::ModelWritten { path, size } => {
                format!("build  wrote  {}  {} keys\n", path, format_number(*size))
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl BuildProgressReporter for JsonProgress {
    fn report(&self, event: BuildProgressEvent) {
        let obj = event_json(&event);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &BuildProgressEvent) -> serde_json::Value {
    match event {
        BuildProgressEvent::CatalogLoaded { path, entries } => serde_json::json!({
            "event": "progress",
            "phase": "catalog",
            "path": path,
            "entries": entries
        }),
        BuildProgressEvent::Skipped { position } => serde_json::json!({
            "event": "progress",
            "phase": "skipped",
            "templateIndex": position
        }),
        BuildProgressEvent::Overwritten {
            key,
            previous,
            position,
        } => serde_json::json!({
            "event": "progress",
            "phase": "overwritten",
            "key": key,
            "previous": previous,
            "templateIndex": position
        }),
        BuildProgressEvent::ModelWritten { path, size } => serde_json::json!({
            "event": "progress",
            "phase": "written",
            "path": path,
            "size": size
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl BuildProgressReporter for NoProgress {
    fn report(&self, _event: BuildProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: auto, off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    Auto,
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Replace `Auto` with a concrete mode for the current stderr.
    pub fn resolve(self) -> Self {
        match self {
            ProgressMode::Auto => {
                if atty::is(atty::Stream::Stderr) {
                    ProgressMode::Human
                } else {
                    ProgressMode::Off
                }
            }
            other => other,
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn BuildProgressReporter> {
        match self.resolve() {
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
            ProgressMode::Off | ProgressMode::Auto => Box::new(NoProgress),
        }
    }
}
