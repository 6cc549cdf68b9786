// Route exports
pub mod admin;
pub mod forms;
pub mod matches;
pub mod messages;
pub mod pipeline;

use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::core::{Matcher, StrategyTag, TAXONOMY_VERSION};
use crate::models::{HealthResponse, TaxonomyResponse, TaxonomyTag};
use crate::services::{MatchCache, Notifier, PipelineBoard, RecordStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub board: Arc<PipelineBoard>,
    pub matcher: Matcher,
    pub cache: Arc<MatchCache>,
    pub notifier: Option<Arc<Notifier>>,
    pub auth: Arc<AuthVerifier>,
    /// Gated document slug -> download URL
    pub documents: Arc<HashMap<String, String>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .route("/taxonomy", web::get().to(taxonomy))
            .configure(forms::configure)
            .configure(messages::configure)
            .service(
                web::scope("/admin")
                    .configure(admin::configure)
                    .configure(matches::configure)
                    .configure(pipeline::configure),
            ),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Strategy vocabulary for intake form pickers
async fn taxonomy() -> impl Responder {
    let tags = StrategyTag::ALL
        .iter()
        .map(|tag| TaxonomyTag {
            label: tag.label().to_string(),
            aliases: tag.aliases().iter().map(|a| a.to_string()).collect(),
        })
        .collect();

    HttpResponse::Ok().json(TaxonomyResponse {
        version: TAXONOMY_VERSION,
        tags,
    })
}
