//! # QnA Intents Core
//!
//! Pure, I/O-free logic for QnA Intents: the text normalizer, the intent
//! index builder, and the token-overlap matcher, plus the value types that
//! flow between them.
//!
//! This crate performs no filesystem access and holds no configuration.
//! Everything here is synchronous and deterministic; a built [`Model`] is
//! immutable and can be shared across threads behind an `Arc`.
//!
//! ```rust
//! use qna_intents_core::{build, best_match, TemplateEntry};
//!
//! let catalog = vec![TemplateEntry::new("Quel est le statut de la commande", "orders")];
//! let model = build(&catalog);
//! let result = best_match("statut commande ?", &model);
//! assert_eq!(result.key.as_deref(), Some("quel est le statut de la commande"));
//! assert!((result.score - 2.0 / 7.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Case folding, diacritic stripping, punctuation collapsing, tokenization |
//! | [`models`] | `TemplateEntry`, `IndexEntry`, `Model`, `MatchResult` |
//! | [`index`] | Catalog → `Model` builder |
//! | [`matcher`] | Best match, ranked candidates, score explanations |

pub mod index;
pub mod matcher;
pub mod models;
pub mod normalize;

pub use index::{build, build_with_stats, BuildStats, Overwrite};
pub use matcher::{best_match, explain, rank, ScoredIntent};
pub use models::{IndexEntry, MatchResult, Model, TemplateEntry, MODEL_VERSION};
pub use normalize::{normalize, tokenize};
