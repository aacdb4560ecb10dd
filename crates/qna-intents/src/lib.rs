//! # QnA Intents
//!
//! **Match free-text questions to a catalog of known question templates.**
//!
//! QnA Intents compiles a question template catalog into a normalized
//! lookup index (the *model*) and scores user questions against it with a
//! deterministic bag-of-words overlap. The algorithm lives in
//! [`qna_intents_core`]; this crate adds files, configuration, and the
//! `qna` command line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌────────────────────┐
//! │   Catalog    │──▶│  qna build    │──▶│ intents_model.json │
//! │ (JSON array) │   │ normalize+fold│   │ {version,size,index}│
//! └──────────────┘   └───────────────┘   └─────────┬──────────┘
//!                                                  │
//!                                                  ▼
//!                                          ┌──────────────┐
//!                           question ─────▶│  qna match   │──▶ { question, match }
//!                                          └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! qna build                                    # catalog → ./data/intents_model.json
//! qna match --question "statut commande ?"     # best key + score
//! qna match --question "sessions" --top 3 --explain
//! qna merge --input ./data/qna_sample.json --dry-run
//! qna stats
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`catalog`] | Template catalog file loading and rewriting |
//! | [`model_file`] | Model file write/load with validation |
//! | [`build_cmd`] | `qna build`: catalog → model file |
//! | [`match_cmd`] | `qna match`: question → best key and score |
//! | [`merge`] | `qna merge`: validate and fold Q/A records into the catalog |
//! | [`stats`] | `qna stats`: model size and category breakdown |
//! | [`progress`] | Build progress on stderr (human or JSON lines) |
//!
//! ## Configuration
//!
//! Configured via a TOML file (default: `config/qna.toml`); see [`config`].
//! Every setting has a default, so the file is optional.

pub mod build_cmd;
pub mod catalog;
pub mod config;
pub mod match_cmd;
pub mod merge;
pub mod model_file;
pub mod progress;
pub mod stats;

pub use qna_intents_core::{best_match, build, MatchResult, Model, TemplateEntry};
