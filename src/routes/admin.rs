use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::core::{export_csv, export_filename, ExportEntity};
use crate::error::ApiError;
use crate::models::ApprovalRequest;
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/gps", web::get().to(list_gps))
        .route("/gps/{id}/approval", web::patch().to(set_gp_approval))
        .route("/gps/{id}", web::delete().to(delete_gp))
        .route("/lps", web::get().to(list_lps))
        .route("/lps/{id}/approval", web::patch().to(set_lp_approval))
        .route("/lps/{id}", web::delete().to(delete_lp))
        .route("/contacts", web::get().to(list_contacts))
        .route("/document-requests", web::get().to(list_document_requests))
        .route("/export/{entity}", web::get().to(export_registrations));
}

async fn list_gps(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let gps = state.store.list_gps().await?;
    Ok(HttpResponse::Ok().json(gps))
}

async fn list_lps(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let lps = state.store.list_lps().await?;
    Ok(HttpResponse::Ok().json(lps))
}

/// PATCH /api/v1/admin/gps/{id}/approval
async fn set_gp_approval(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ApprovalRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let gp = state.store.update_gp_approval(id, req.approval).await?;
    state.cache.invalidate_all();

    tracing::info!("{} set GP {} approval to {}", admin.0.user_id, id, gp.approval);

    Ok(HttpResponse::Ok().json(gp))
}

/// PATCH /api/v1/admin/lps/{id}/approval
///
/// Applied to the pipeline board first and reverted if the write fails.
async fn set_lp_approval(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ApprovalRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let lp = state.board.set_approval(state.store.as_ref(), id, req.approval).await?;
    state.cache.invalidate_all();

    tracing::info!("{} set LP {} approval to {}", admin.0.user_id, id, lp.approval);

    Ok(HttpResponse::Ok().json(lp))
}

async fn delete_gp(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.store.delete_gp(id).await?;
    state.cache.invalidate_all();

    tracing::info!("{} deleted GP {}", admin.0.user_id, id);

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_lp(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.store.delete_lp(id).await?;
    state.board.remove(id).await;
    state.cache.invalidate_all();

    tracing::info!("{} deleted LP {}", admin.0.user_id, id);

    Ok(HttpResponse::NoContent().finish())
}

async fn list_contacts(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let contacts = state.store.list_contacts().await?;
    Ok(HttpResponse::Ok().json(contacts))
}

async fn list_document_requests(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let requests = state.store.list_document_requests().await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// Download registrations as CSV
///
/// GET /api/v1/admin/export/{gp|lp}
async fn export_registrations(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let entity: ExportEntity = path.parse().map_err(ApiError::NotFound)?;

    let body = match entity {
        ExportEntity::Gp => export_csv(&state.store.list_gps().await?)?,
        ExportEntity::Lp => export_csv(&state.store.list_lps().await?)?,
    };
    let filename = export_filename(entity, chrono::Utc::now().date_naive());

    tracing::info!("Exported {}", filename);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(body))
}
