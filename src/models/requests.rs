use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for `GET /skills/matches/{userId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchesQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[validate(range(max = 10000))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<u32>,
}

/// Query for `GET /skills/exchange-pairs`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ExchangePairsQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[validate(range(max = 10000))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<u32>,
}

/// Query for `GET /skills`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SkillsQuery {
    pub category: Option<String>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub popular: Option<String>,
}

impl SkillsQuery {
    /// Only the literal `true` turns the popular filter on
    pub fn popular_only(&self) -> bool {
        self.popular.as_deref() == Some("true")
    }
}

/// Query for `GET /skills/suggestions/autocomplete`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SuggestionsQuery {
    #[validate(length(max = 200))]
    pub q: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
}

/// Query for `GET /categories`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesQuery {
    #[serde(alias = "risk_level", rename = "riskLevel")]
    pub risk_level: Option<String>,
}

/// Query for `GET /categories/lookup`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryLookupQuery {
    #[validate(length(max = 200))]
    pub skill: Option<String>,
}
