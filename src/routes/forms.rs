//! Public lead-capture forms.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    ContactRequest, DocumentAccessRequest, DocumentAccessResponse, GpRegistrationRequest, LpRegistrationRequest,
    SubmissionResponse,
};
use crate::routes::AppState;
use crate::services::{notify_best_effort, Notification};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/registrations/gp", web::post().to(register_gp))
        .route("/registrations/lp", web::post().to(register_lp))
        .route("/contact", web::post().to(submit_contact))
        .route("/documents/access", web::post().to(request_document));
}

/// GP registration
///
/// POST /api/v1/registrations/gp
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "firm": "string",
///   "aumBracket": "€500M+",
///   "strategies": ["string"],
///   "fundInMarket": "Fund III"
/// }
/// ```
async fn register_gp(
    state: web::Data<AppState>,
    req: web::Json<GpRegistrationRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let gp = state.store.insert_gp(req.into_inner().into_new_gp()).await?;
    state.cache.invalidate_all();

    tracing::info!("Registered GP {} ({})", gp.id, gp.firm);

    notify_best_effort(
        state.notifier.as_deref(),
        Notification::GpRegistration {
            name: gp.name.clone(),
            email: gp.email.clone(),
            firm: gp.firm.clone(),
        },
    )
    .await;

    Ok(HttpResponse::Created().json(gp))
}

/// LP registration
///
/// POST /api/v1/registrations/lp
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "organization": "string",
///   "investorType": "Family Office",
///   "interests": ["string"],
///   "jurisdiction": "UK"
/// }
/// ```
async fn register_lp(
    state: web::Data<AppState>,
    req: web::Json<LpRegistrationRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let lp = state.store.insert_lp(req.into_inner().into_new_lp()).await?;
    state.board.upsert(lp.clone()).await;
    state.cache.invalidate_all();

    tracing::info!("Registered LP {} ({})", lp.id, lp.organization);

    notify_best_effort(
        state.notifier.as_deref(),
        Notification::LpRegistration {
            name: lp.name.clone(),
            email: lp.email.clone(),
            organization: lp.organization.clone(),
        },
    )
    .await;

    Ok(HttpResponse::Created().json(lp))
}

/// Contact form
///
/// POST /api/v1/contact
async fn submit_contact(
    state: web::Data<AppState>,
    req: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let contact = state.store.insert_contact(req.into_inner()).await?;

    notify_best_effort(
        state.notifier.as_deref(),
        Notification::Contact {
            name: contact.name.clone(),
            email: contact.email.clone(),
            message: contact.message.clone(),
        },
    )
    .await;

    Ok(HttpResponse::Created().json(SubmissionResponse {
        success: true,
        id: contact.id,
    }))
}

/// Unlock a gated document in exchange for contact details
///
/// POST /api/v1/documents/access
///
/// Unknown document slugs are rejected before anything is stored.
async fn request_document(
    state: web::Data<AppState>,
    req: web::Json<DocumentAccessRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let url = state
        .documents
        .get(req.document.trim())
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Unknown document: {}", req.document)))?;

    let mut request = req.into_inner();
    request.document = request.document.trim().to_string();
    let stored = state.store.insert_document_request(request).await?;

    tracing::info!("Granted document {} to {}", stored.document, stored.email);

    notify_best_effort(
        state.notifier.as_deref(),
        Notification::DocumentAccess {
            name: stored.name.clone(),
            email: stored.email.clone(),
            document: stored.document.clone(),
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(DocumentAccessResponse {
        request_id: stored.id,
        document: stored.document,
        url,
    }))
}
