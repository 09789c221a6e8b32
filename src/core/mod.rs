// Core algorithm exports
pub mod catalog;
pub mod categorizer;
pub mod matcher;
pub mod scoring;

pub use catalog::{list_skills, skill_details, suggest_skills, summarize_skills};
pub use categorizer::{RiskLevel, SkillCategory, SkillTaxonomy, OTHER_CATEGORY};
pub use matcher::Matcher;
pub use scoring::{calculate_skill_match_score, skills_overlap};
