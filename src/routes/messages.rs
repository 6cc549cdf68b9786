use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{MessageView, PostMessageRequest};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/investors/{id}/messages", web::get().to(list_messages))
        .route("/investors/{id}/messages", web::post().to(post_message));
}

/// Thread for one investor, oldest first
///
/// GET /api/v1/investors/{id}/messages
async fn list_messages(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let lp_id = path.into_inner();
    state.store.get_lp(lp_id).await?;

    let messages: Vec<MessageView> = state
        .store
        .list_messages(lp_id)
        .await?
        .into_iter()
        .map(|message| MessageView::for_viewer(message, &user.user_id))
        .collect();

    Ok(HttpResponse::Ok().json(messages))
}

/// POST /api/v1/investors/{id}/messages
///
/// The author is always the caller.
async fn post_message(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<PostMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let lp_id = path.into_inner();
    state.store.get_lp(lp_id).await?;

    let message = state.store.insert_message(lp_id, &user.user_id, body).await?;
    tracing::debug!("{} posted message {} on investor {}", user.user_id, message.id, lp_id);

    Ok(HttpResponse::Created().json(MessageView::for_viewer(message, &user.user_id)))
}
