//! Candidate ranking over a single job's pool.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::competency::CompetencyModel;
use crate::matching::scorer::HybridScorer;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Scoring corpus: declared skills followed by the CV.
    #[serde(default)]
    pub text: String,
}

impl Candidate {
    /// Joins the declared-skills field and the CV with a single space; a
    /// missing part counts as an empty string.
    pub fn from_profile(
        id: impl Into<String>,
        name: Option<String>,
        skills: Option<&str>,
        cv: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            text: format!("{} {}", skills.unwrap_or_default(), cv.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: u32,
}

/// Scores every candidate, sorts by score descending and keeps the first
/// `top_n`. Ties keep their input order. The input slice is left untouched.
pub fn rank(
    scorer: &HybridScorer,
    candidates: &[Candidate],
    model: Option<&CompetencyModel>,
    top_n: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|candidate| {
            let score = scorer.score(&candidate.text, model);
            debug!(candidate_id = %candidate.id, score, "candidate scored");
            ScoredCandidate {
                candidate: candidate.clone(),
                score,
            }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_n);
    scored
}
