use actix_web::{web, HttpResponse};

use crate::core::RiskLevel;
use crate::models::{ApiResponse, CategoriesData, CategoriesQuery, CategoryLookupData, CategoryLookupQuery};
use crate::routes::{validate_query, ApiError, AppState};

/// Configure taxonomy lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/categories", web::get().to(list_categories))
        .route("/categories/lookup", web::get().to(lookup_category));
}

/// List the skill taxonomy
///
/// GET /api/v1/categories?riskLevel={low|medium|high|extreme}
async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<CategoriesQuery>,
) -> Result<HttpResponse, ApiError> {
    let taxonomy = state.matcher.taxonomy();

    let risk_filter = match query.risk_level.as_deref() {
        Some(level) => Some(
            level
                .parse::<RiskLevel>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
        None => None,
    };

    let categories = taxonomy
        .categories()
        .iter()
        .filter(|c| risk_filter.map_or(true, |level| c.risk_level == level))
        .cloned()
        .collect();

    let high_risk = taxonomy
        .high_risk_categories()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoriesData { categories, high_risk })))
}

/// Categorize one skill and report its risk
///
/// GET /api/v1/categories/lookup?skill={skill}
async fn lookup_category(
    state: web::Data<AppState>,
    query: web::Query<CategoryLookupQuery>,
) -> Result<HttpResponse, ApiError> {
    validate_query(&*query)?;

    let taxonomy = state.matcher.taxonomy();
    let skill = query.skill.clone().unwrap_or_default();
    let category = taxonomy.categorize(&skill);

    let data = CategoryLookupData {
        category: category.to_string(),
        risk_level: taxonomy.risk_level(&skill).to_string(),
        requires_liability_waiver: taxonomy.requires_liability_waiver(&skill),
        metadata: taxonomy.metadata(category).cloned(),
        skill,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}
