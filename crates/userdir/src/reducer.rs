//! Picking one value out of a provider's scored guesses.

use serde::{Deserialize, Serialize};

/// One scored guess for an inferred attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGuess {
    pub label: String,
    pub score: f64,
}

impl CandidateGuess {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Argmax over `(label, score)` pairs.
///
/// Returns `None` for empty input. Ties keep the earliest candidate. A NaN
/// running maximum is replaced by the next candidate; a NaN candidate never
/// replaces a comparable maximum.
pub fn choose_best<L, S>(candidates: impl IntoIterator<Item = (L, S)>) -> Option<L>
where
    S: PartialOrd,
{
    let mut best: Option<(L, S)> = None;
    for (label, score) in candidates {
        let replace = match &best {
            None => true,
            Some((_, best_score)) => {
                score > *best_score || best_score.partial_cmp(best_score).is_none()
            }
        };
        if replace {
            best = Some((label, score));
        }
    }
    best.map(|(label, _)| label)
}

/// Label of the highest-scoring guess, if any.
pub fn choose_best_label(candidates: &[CandidateGuess]) -> Option<String> {
    choose_best(candidates.iter().map(|c| (&c.label, c.score))).cloned()
}
