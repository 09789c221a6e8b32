use serde::{Deserialize, Serialize};
use crate::core::categorizer::SkillCategory;
use crate::models::domain::{ExchangePair, SkillMatch, SkillSuggestion, SkillSummary};

/// Success envelope shared by every skills endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Failure envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody { message: message.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesData {
    pub target_user_id: String,
    pub matches: Vec<SkillMatch>,
    pub total_matches: usize,
    pub algorithm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePairsData {
    pub exchange_pairs: Vec<ExchangePair>,
    pub total_pairs: usize,
    pub algorithm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsData {
    pub skills: Vec<SkillSummary>,
    pub total: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsData {
    pub suggestions: Vec<SkillSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesData {
    pub categories: Vec<SkillCategory>,
    pub high_risk: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLookupData {
    pub skill: String,
    pub category: String,
    pub risk_level: String,
    pub requires_liability_waiver: bool,
    pub metadata: Option<SkillCategory>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cached_snapshots: u64,
}
