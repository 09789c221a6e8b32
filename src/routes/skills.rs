use actix_web::{web, HttpResponse};

use crate::core::catalog::{self, DEFAULT_SUGGESTION_LIMIT};
use crate::models::{
    ApiResponse, ExchangePairsData, ExchangePairsQuery, MatchesData, MatchesQuery, SkillFilter,
    SkillsData, SkillsQuery, SuggestionsData, SuggestionsQuery,
};
use crate::routes::{validate_query, ApiError, AppState};
use crate::services::{StoreError, UserSnapshot};

pub const MATCHING_ALGORITHM: &str = "ai_skill_matching_v1";
pub const PAIRING_ALGORITHM: &str = "mutual_skill_exchange_v1";

/// Configure skill routes
///
/// Fixed paths go first so `/skills/{skill_name}` cannot shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/skills", web::get().to(list_skills))
        .route("/skills/exchange-pairs", web::get().to(exchange_pairs))
        .route("/skills/suggestions/autocomplete", web::get().to(suggestions))
        .route("/skills/matches/{user_id}", web::get().to(skill_matches))
        .route("/skills/{skill_name}", web::get().to(skill_details));
}

/// Current member list, or the endpoint's failure message
async fn load_users(state: &AppState, failure: &str) -> Result<UserSnapshot, ApiError> {
    state
        .cache
        .users(state.store.as_ref())
        .await
        .map_err(|e| store_failure(e, failure))
}

fn store_failure(err: StoreError, failure: &str) -> ApiError {
    tracing::error!("{}: {}", failure, err);
    ApiError::Internal(failure.to_string())
}

/// Skill catalog with offer/want counts
///
/// GET /api/v1/skills?category=&search=&popular=true
async fn list_skills(
    state: web::Data<AppState>,
    query: web::Query<SkillsQuery>,
) -> Result<HttpResponse, ApiError> {
    validate_query(&*query)?;

    let users = load_users(&state, "Failed to fetch skills").await?;
    let query = query.into_inner();
    let filter = SkillFilter {
        popular: query.popular_only(),
        category: query.category,
        search: query.search,
    };

    let taxonomy = state.matcher.taxonomy();
    let skills = catalog::list_skills(&users, taxonomy, &filter);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SkillsData {
        total: skills.len(),
        skills,
        categories: taxonomy.category_names(),
    })))
}

/// Teachers and learners of one skill
///
/// GET /api/v1/skills/{skill_name}
async fn skill_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let skill_name = path.into_inner();
    let users = load_users(&state, "Failed to fetch skill details").await?;

    let mut details = catalog::skill_details(&users, &skill_name, state.matcher.taxonomy());
    for participant in details.teachers.iter_mut().chain(details.learners.iter_mut()) {
        participant.user = participant.user.redacted();
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/// Skill name autocomplete
///
/// GET /api/v1/skills/suggestions/autocomplete?q={prefix}&limit=10
async fn suggestions(
    state: web::Data<AppState>,
    query: web::Query<SuggestionsQuery>,
) -> Result<HttpResponse, ApiError> {
    validate_query(&*query)?;

    let term = query.q.as_deref().unwrap_or_default();
    if term.chars().count() < catalog::MIN_SUGGESTION_QUERY_LEN {
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(SuggestionsData {
            suggestions: Vec::new(),
        })));
    }

    let users = load_users(&state, "Failed to fetch suggestions").await?;
    let limit = state
        .matching
        .effective_limit(query.limit, DEFAULT_SUGGESTION_LIMIT);

    let suggestions = catalog::suggest_skills(&users, term, limit, state.matcher.taxonomy());

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SuggestionsData { suggestions })))
}

/// Ranked matches for one member
///
/// GET /api/v1/skills/matches/{user_id}?limit=10&minScore=5
async fn skill_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MatchesQuery>,
) -> Result<HttpResponse, ApiError> {
    validate_query(&*query)?;

    const FAILURE: &str = "Failed to fetch skill matches";
    let user_id = path.into_inner();
    let users = load_users(&state, FAILURE).await?;

    let target = match users.iter().find(|u| u.id == user_id) {
        Some(user) => user.clone(),
        None => state
            .store
            .fetch_user(&user_id)
            .await
            .map_err(|e| store_failure(e, FAILURE))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?,
    };

    let min_score = query
        .min_score
        .unwrap_or(state.matching.default_match_min_score);
    let limit = state
        .matching
        .effective_limit(query.limit, state.matching.default_match_limit);

    let mut matches = state.matcher.find_matches(&target, &users, min_score, limit);
    for m in &mut matches {
        m.user = m.user.redacted();
    }

    tracing::debug!(
        "Found {} matches for user {} (min_score={}, limit={})",
        matches.len(),
        user_id,
        min_score,
        limit
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MatchesData {
        target_user_id: user_id,
        total_matches: matches.len(),
        matches,
        algorithm: MATCHING_ALGORITHM.to_string(),
    })))
}

/// Community-wide mutual exchange pairs
///
/// GET /api/v1/skills/exchange-pairs?limit=20&minScore=10
async fn exchange_pairs(
    state: web::Data<AppState>,
    query: web::Query<ExchangePairsQuery>,
) -> Result<HttpResponse, ApiError> {
    validate_query(&*query)?;

    let users = load_users(&state, "Failed to fetch exchange pairs").await?;

    let pool_size = state.matching.max_pairing_pool;
    let pool = if users.len() > pool_size {
        tracing::warn!(
            "Exchange pairing pool truncated from {} to {} members",
            users.len(),
            pool_size
        );
        &users[..pool_size]
    } else {
        &users[..]
    };

    let min_score = query
        .min_score
        .unwrap_or(state.matching.default_pair_min_score);
    let limit = state
        .matching
        .effective_limit(query.limit, state.matching.default_pair_limit);

    let mut pairs = state.matcher.find_exchange_pairs(pool, min_score, limit);
    for pair in &mut pairs {
        pair.user_a = pair.user_a.redacted();
        pair.user_b = pair.user_b.redacted();
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ExchangePairsData {
        total_pairs: pairs.len(),
        exchange_pairs: pairs,
        algorithm: PAIRING_ALGORITHM.to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingSettings;
    use crate::core::Matcher;
    use crate::models::UserSkillProfile;
    use crate::services::{InMemoryUserStore, SnapshotCache};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn state(users: Vec<UserSkillProfile>) -> AppState {
        AppState {
            store: Arc::new(InMemoryUserStore::new(users)),
            cache: Arc::new(SnapshotCache::disabled()),
            matcher: Matcher::with_standard_taxonomy(),
            matching: MatchingSettings::default(),
        }
    }

    #[actix_web::test]
    async fn test_fixed_paths_win_over_skill_name() {
        let users = vec![
            UserSkillProfile::new("a").offering(["Guitar"]).wanting(["Python"]),
            UserSkillProfile::new("b").offering(["Python"]).wanting(["Guitar"]),
        ];
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(users)))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/skills/exchange-pairs").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["algorithm"], PAIRING_ALGORITHM);
        assert_eq!(body["data"]["totalPairs"], 1);

        let req = test::TestRequest::get()
            .uri("/api/v1/skills/suggestions/autocomplete?q=gu")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["suggestions"][0]["name"], "Guitar");
    }

    #[actix_web::test]
    async fn test_pool_cap_limits_pairing() {
        let users = vec![
            UserSkillProfile::new("a").offering(["Guitar"]).wanting(["Python"]),
            UserSkillProfile::new("b").offering(["Yoga"]),
            UserSkillProfile::new("c").offering(["Python"]).wanting(["Guitar"]),
        ];
        let mut app_state = state(users);
        app_state.matching.max_pairing_pool = 2;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/skills/exchange-pairs").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["totalPairs"], 0);
    }
}
