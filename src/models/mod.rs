// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ExchangePair, Location, MatchDetail, MatchResult, ParticipantRole, SkillDetails, SkillFilter,
    SkillMatch, SkillParticipant, SkillSuggestion, SkillSummary, UserSkillProfile, REDACTED_FIELDS,
};
pub use requests::{
    CategoriesQuery, CategoryLookupQuery, ExchangePairsQuery, MatchesQuery, SkillsQuery,
    SuggestionsQuery,
};
pub use responses::{
    ApiResponse, CategoriesData, CategoryLookupData, ErrorBody, ErrorResponse, ExchangePairsData,
    HealthResponse, MatchesData, SkillsData, SuggestionsData,
};
