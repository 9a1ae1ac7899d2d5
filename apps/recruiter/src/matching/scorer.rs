//! Hybrid scorer: weighs a candidate's free text against a competency model.
//!
//! Algorithm:
//! 1. Lower-case the candidate text; matching is substring containment, so
//!    "java" also hits "javascript".
//! 2. For each synonym group `(skill, terms)`:
//!    - `skill` found → +10
//!    - first term found (in order) → +5, at most once per group
//! 3. Required skills without a synonym group earn nothing unless
//!    `score_unlisted_required` is set.
//! 4. Each desirable skill found → +3
//!
//! Scores are only comparable within one job's candidate pool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matching::competency::CompetencyModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub required: u32,
    pub synonym: u32,
    pub desirable: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            required: 10,
            synonym: 5,
            desirable: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Award the exact-match points to required skills that have no synonym
    /// group. Off by default so scores match the established ranking.
    pub score_unlisted_required: bool,
}

/// Per-candidate explanation of a score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub matched_required: Vec<String>,
    /// Skill → the synonym that earned its bonus.
    pub matched_synonyms: BTreeMap<String, String>,
    pub matched_desirable: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HybridScorer {
    config: ScoringConfig,
}

impl HybridScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores `candidate_text`. A missing model scores zero.
    pub fn score(&self, candidate_text: &str, model: Option<&CompetencyModel>) -> u32 {
        self.breakdown(candidate_text, model).total
    }

    pub fn breakdown(
        &self,
        candidate_text: &str,
        model: Option<&CompetencyModel>,
    ) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();
        let Some(model) = model else {
            return breakdown;
        };

        let weights = self.config.weights;
        let text = candidate_text.to_lowercase();

        for (skill, terms) in &model.synonyms {
            if contains(&text, skill) {
                breakdown.total += weights.required;
                breakdown.matched_required.push(skill.clone());
            }
            if let Some(term) = terms.iter().find(|term| contains(&text, term)) {
                breakdown.total += weights.synonym;
                breakdown
                    .matched_synonyms
                    .insert(skill.clone(), term.clone());
            }
        }

        if self.config.score_unlisted_required {
            let mut seen = std::collections::HashSet::new();
            for skill in model.unlisted_required() {
                if seen.insert(skill) && contains(&text, skill) {
                    breakdown.total += weights.required;
                    breakdown.matched_required.push(skill.to_string());
                }
            }
        }

        for skill in &model.desirable {
            if contains(&text, skill) {
                breakdown.total += weights.desirable;
                breakdown.matched_desirable.push(skill.clone());
            }
        }

        breakdown
    }
}

/// `text` must already be lower-cased.
fn contains(text: &str, needle: &str) -> bool {
    text.contains(&needle.to_lowercase())
}
