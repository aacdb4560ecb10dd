//! Token-overlap matcher.
//!
//! # Scoring
//!
//! The query is normalized, tokenized, and deduplicated into a set. Each
//! model key `k` is scored as
//!
//! ```text
//! score(k) = |{ t ∈ tokens(k) : t ∈ query }| / max(|tokens(k)|, 1)
//! ```
//!
//! i.e. the fraction of the *key's own* tokens that the query covers. The
//! denominator is deliberately the key length, not the query length or the
//! union: a short template phrase embedded in a long question scores 1.0.
//!
//! # Selection
//!
//! Keys are scanned in model index order and a key replaces the current
//! best only on a strictly greater score, so ties go to the key inserted
//! first. A non-empty model always yields a key, even at score 0.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{serialize_score, IndexedKey, MatchResult, Model};
use crate::normalize::tokenize;

/// A scored candidate with the numbers behind its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredIntent {
    pub key: String,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Key tokens present in the query.
    pub overlap: usize,
    /// Token count of the key (the score denominator).
    pub key_tokens: usize,
    pub template_index: usize,
    pub category: String,
}

fn query_tokens(question: &str) -> HashSet<String> {
    tokenize(question).into_iter().collect()
}

fn score_tokens(key_tokens: &[String], query: &HashSet<String>) -> (usize, f64) {
    let overlap = key_tokens.iter().filter(|t| query.contains(*t)).count();
    let score = overlap as f64 / key_tokens.len().max(1) as f64;
    (overlap, score)
}

fn scored(rec: &IndexedKey, overlap: usize, score: f64) -> ScoredIntent {
    ScoredIntent {
        key: rec.key.clone(),
        score,
        overlap,
        key_tokens: rec.tokens.len(),
        template_index: rec.entry.template_index,
        category: rec.entry.category.clone(),
    }
}

/// First record with the strictly greatest score, with its overlap and score.
fn best_record<'m>(
    model: &'m Model,
    query: &HashSet<String>,
) -> Option<(&'m IndexedKey, usize, f64)> {
    let mut best: Option<(&IndexedKey, usize, f64)> = None;
    for rec in model.records() {
        let (overlap, score) = score_tokens(&rec.tokens, query);
        match best {
            Some((_, _, best_score)) if score <= best_score => {}
            _ => best = Some((rec, overlap, score)),
        }
    }
    best
}

/// Find the model key that best matches `question`.
///
/// Returns `{ key: None, score: 0 }` only when the model is empty.
pub fn best_match(question: &str, model: &Model) -> MatchResult {
    let query = query_tokens(question);
    match best_record(model, &query) {
        Some((rec, _, score)) => MatchResult {
            key: Some(rec.key.clone()),
            score,
        },
        None => MatchResult::none(),
    }
}

/// Score breakdown of the [`best_match`] winner, `None` for an empty model.
pub fn explain(question: &str, model: &Model) -> Option<ScoredIntent> {
    let query = query_tokens(question);
    best_record(model, &query).map(|(rec, overlap, score)| scored(rec, overlap, score))
}

/// Score every key and return the top `limit`, best first.
///
/// Equal scores keep model index order, so `rank(q, m, 1)` names the same
/// key as [`best_match`].
pub fn rank(question: &str, model: &Model, limit: usize) -> Vec<ScoredIntent> {
    let query = query_tokens(question);
    let mut candidates: Vec<ScoredIntent> = model
        .records()
        .iter()
        .map(|rec| {
            let (overlap, score) = score_tokens(&rec.tokens, &query);
            scored(rec, overlap, score)
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build;
    use crate::models::TemplateEntry;

    fn model_of(questions: &[&str]) -> Model {
        let catalog: Vec<TemplateEntry> = questions
            .iter()
            .map(|q| TemplateEntry::new(*q, "cat"))
            .collect();
        build(&catalog)
    }

    #[test]
    fn test_concrete_scenario() {
        let model = model_of(&["Quel est le statut de la commande"]);
        let result = best_match("statut commande ?", &model);
        assert_eq!(
            result.key.as_deref(),
            Some("quel est le statut de la commande")
        );
        assert!((result.score - 2.0 / 7.0).abs() < 1e-9);

        let why = explain("statut commande ?", &model).unwrap();
        assert_eq!(why.overlap, 2);
        assert_eq!(why.key_tokens, 7);
        assert_eq!(why.template_index, 0);
    }

    #[test]
    fn test_empty_model() {
        let model = model_of(&[]);
        assert_eq!(best_match("anything", &model), MatchResult::none());
        assert_eq!(best_match("", &model), MatchResult::none());
        assert!(explain("anything", &model).is_none());
        assert!(rank("anything", &model, 5).is_empty());
    }

    #[test]
    fn test_empty_query_still_returns_first_key() {
        let model = model_of(&["alpha beta", "gamma"]);
        let result = best_match("", &model);
        assert_eq!(result.key.as_deref(), Some("alpha beta"));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_zero_overlap_returns_first_key() {
        let model = model_of(&["alpha beta", "gamma"]);
        let result = best_match("delta epsilon", &model);
        assert_eq!(result.key.as_deref(), Some("alpha beta"));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_tie_break_first_inserted_wins() {
        let model = model_of(&["sessions actives", "sessions bloquees"]);
        let result = best_match("sessions", &model);
        assert_eq!(result.key.as_deref(), Some("sessions actives"));
        assert!((result.score - 0.5).abs() < 1e-9);

        let reversed = model_of(&["sessions bloquees", "sessions actives"]);
        let result = best_match("sessions", &reversed);
        assert_eq!(result.key.as_deref(), Some("sessions bloquees"));
    }

    #[test]
    fn test_tie_break_survives_overwrite() {
        // "b" is overwritten later but keeps the first slot.
        let model = model_of(&["shared b", "shared a", "Shared-B"]);
        let result = best_match("shared", &model);
        assert_eq!(result.key.as_deref(), Some("shared b"));
    }

    #[test]
    fn test_denominator_is_key_length_not_query_length() {
        // A short key fully covered by a long, noisy query scores 1.0 and
        // beats a longer key that shares more tokens with the query.
        let model = model_of(&[
            "liste des utilisateurs actifs connectes hier soir",
            "utilisateurs actifs",
        ]);
        let query = "donne moi la liste des utilisateurs actifs stp";
        let result = best_match(query, &model);
        assert_eq!(result.key.as_deref(), Some("utilisateurs actifs"));
        assert_eq!(result.score, 1.0);

        let ranked = rank(query, &model, 2);
        assert_eq!(ranked[1].overlap, 4);
        assert!((ranked[1].score - 4.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_duplicates_do_not_inflate_score() {
        let model = model_of(&["statut commande"]);
        let result = best_match("commande commande commande", &model);
        assert!((result.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_query_is_normalized_like_keys() {
        let model = model_of(&["Combien d'opérations SELECT sont enregistrées ?"]);
        let result = best_match("COMBIEN D’OPÉRATIONS select SONT ENREGISTREES", &model);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_own_question_matches_itself_fully() {
        let questions = [
            "Quels sont les utilisateurs OS (OS_USERNAME) qui se connectent ?",
            "Quels sont les hôtes d'où proviennent les connexions ?",
            "Combien de sessions uniques (SESSIONID) sont enregistrées ?",
        ];
        let model = model_of(&questions);
        for q in questions {
            let result = best_match(q, &model);
            assert_eq!(result.score, 1.0, "question {:?}", q);
            assert_eq!(result.key, Some(crate::normalize::normalize(q)));
        }
    }

    #[test]
    fn test_scores_in_unit_range() {
        let model = model_of(&[
            "quel est le statut de la commande",
            "a a a",
            "combien de sessions",
            "x",
        ]);
        for q in ["", "a", "a a a a b", "statut", "x y z", "日本", "combien de x"] {
            let result = best_match(q, &model);
            assert!(result.key.is_some());
            assert!(
                (0.0..=1.0).contains(&result.score),
                "score out of range for {:?}: {}",
                q,
                result.score
            );
        }
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let model = model_of(&["a b c d", "a b", "z", "a"]);
        let ranked = rank("a b", &model, 3);
        let keys: Vec<&str> = ranked.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a b", "a", "a b c d"]);
        assert_eq!(ranked[2].score, 0.5);
        assert!(rank("a b", &model, 0).is_empty());
    }

    #[test]
    fn test_rank_top_agrees_with_best_match() {
        let model = model_of(&["un deux", "deux trois", "trois un", "quatre"]);
        for q in ["un", "deux", "trois", "quatre cinq", "", "un deux trois"] {
            let best = best_match(q, &model);
            let top = &rank(q, &model, 1)[0];
            assert_eq!(best.key.as_deref(), Some(top.key.as_str()), "query {:?}", q);
            assert_eq!(best.score, top.score);
        }
    }

    #[test]
    fn test_matches_deserialized_model_identically() {
        let model = model_of(&["statut commande", "commande annulee", "statut"]);
        let text = serde_json::to_string(&model).unwrap();
        let loaded: Model = serde_json::from_str(&text).unwrap();
        for q in ["statut", "commande", "statut de la commande annulee"] {
            assert_eq!(best_match(q, &model), best_match(q, &loaded));
        }
    }

    #[test]
    fn test_model_shared_across_threads() {
        let model = std::sync::Arc::new(model_of(&["statut commande", "sessions"]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let model = std::sync::Arc::clone(&model);
                std::thread::spawn(move || best_match("statut", &model))
            })
            .collect();
        for h in handles {
            let result = h.join().unwrap();
            assert_eq!(result.key.as_deref(), Some("statut commande"));
        }
    }
}
