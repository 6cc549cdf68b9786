use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{MatchListResponse, MatchQuery};
use crate::routes::AppState;
use crate::services::CacheKey;

/// Largest page the match list will return
const MAX_LIMIT: usize = 500;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(list_matches));
}

/// Ranked GP/LP pairs
///
/// GET /api/v1/admin/matches?minScore=50&limit=20
///
/// The full ranking is cached until the next registration write; filters
/// are applied to the cached list.
async fn list_matches(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<MatchQuery>,
) -> Result<HttpResponse, ApiError> {
    let cache_key = CacheKey::matches(state.matcher.label_matching());

    let result = match state.cache.get(&cache_key).await {
        Some(result) => result,
        None => {
            let generation = state.cache.generation();
            let gps = state.store.list_gps().await?;
            let lps = state.store.list_lps().await?;

            let result = Arc::new(state.matcher.find_matches(&gps, &lps));
            tracing::info!(
                "Scored {} GPs against {} LPs: {} pairs matched",
                gps.len(),
                lps.len(),
                result.matches.len()
            );

            state.cache.set(&cache_key, result.clone(), generation).await;
            result
        }
    };

    let min_score = query.min_score.unwrap_or(0);
    let limit = query.limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT);

    let matches: Vec<_> = result
        .matches
        .iter()
        .filter(|m| m.score >= min_score)
        .take(limit)
        .cloned()
        .collect();

    Ok(HttpResponse::Ok().json(MatchListResponse {
        total_results: matches.len(),
        total_pairs: result.total_pairs,
        matches,
    }))
}
