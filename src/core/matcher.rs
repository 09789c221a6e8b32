use std::sync::Arc;

use crate::core::categorizer::SkillTaxonomy;
use crate::core::scoring::calculate_skill_match_score;
use crate::models::{ExchangePair, MatchResult, SkillMatch, UserSkillProfile};

pub const DEFAULT_MATCH_MIN_SCORE: u32 = 5;
pub const DEFAULT_MATCH_LIMIT: usize = 10;
pub const DEFAULT_PAIR_MIN_SCORE: u32 = 10;
pub const DEFAULT_PAIR_LIMIT: usize = 20;

/// Skill matching orchestrator
///
/// Holds the taxonomy used for category bonuses and runs the two ranking
/// jobs on top of [`calculate_skill_match_score`]:
/// - ranking a candidate pool against one target member
/// - pairing every two members who can teach each other
///
/// Both sorts are stable, so equal scores keep discovery order.
#[derive(Debug, Clone)]
pub struct Matcher {
    taxonomy: Arc<SkillTaxonomy>,
}

impl Matcher {
    pub fn new(taxonomy: SkillTaxonomy) -> Self {
        Self {
            taxonomy: Arc::new(taxonomy),
        }
    }

    pub fn with_standard_taxonomy() -> Self {
        Self::new(SkillTaxonomy::standard())
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// Score `b` against `a`, with `a` in the teaching role for direct matches
    pub fn score(&self, a: &UserSkillProfile, b: &UserSkillProfile) -> MatchResult {
        calculate_skill_match_score(a, b, &self.taxonomy)
    }

    /// Rank candidates for one member
    ///
    /// The target itself (same `id`) is skipped if present in the pool.
    /// Every candidate scoring at least `min_score` is kept, best first,
    /// then the list is cut to `limit`.
    pub fn find_matches(
        &self,
        target: &UserSkillProfile,
        candidates: &[UserSkillProfile],
        min_score: u32,
        limit: usize,
    ) -> Vec<SkillMatch> {
        let mut matches: Vec<SkillMatch> = candidates
            .iter()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let result = self.score(target, candidate);
                if result.score >= min_score {
                    Some(SkillMatch {
                        user: candidate.clone(),
                        match_score: result.score,
                        match_details: result.details,
                    })
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches.truncate(limit);

        matches
    }

    /// Find members who can teach each other
    ///
    /// Visits every unordered pair `(users[i], users[j])` with `i < j` once,
    /// keeping pairs with at least one direct and one reverse match and a
    /// score of at least `min_score`. Quadratic in `users.len()`; callers
    /// bound the pool size.
    pub fn find_exchange_pairs(
        &self,
        users: &[UserSkillProfile],
        min_score: u32,
        limit: usize,
    ) -> Vec<ExchangePair> {
        let mut pairs = Vec::new();

        for (i, user_a) in users.iter().enumerate() {
            for user_b in &users[i + 1..] {
                let result = self.score(user_a, user_b);

                if result.score >= min_score && result.is_mutual_exchange() {
                    pairs.push(ExchangePair {
                        user_a: user_a.clone(),
                        user_b: user_b.clone(),
                        exchange_score: result.score,
                        exchange_details: result.details,
                        mutual_exchange: true,
                    });
                }
            }
        }

        pairs.sort_by(|a, b| b.exchange_score.cmp(&a.exchange_score));
        pairs.truncate(limit);

        pairs
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_standard_taxonomy()
    }
}
