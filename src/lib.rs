//! Guru Match - skill matching service for the yoohoo.guru skill exchange
//!
//! Scores how well two members complement each other (who can teach what
//! the other wants), ranks matches for a single member, pairs members for
//! mutual exchange and categorizes free-text skill names.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_skill_match_score, Matcher, SkillTaxonomy};
pub use crate::models::{ExchangePair, MatchDetail, MatchResult, SkillMatch, UserSkillProfile};
