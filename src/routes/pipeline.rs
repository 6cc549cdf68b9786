//! Investor pipeline (Kanban) endpoints.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{BoardColumn, BoardResponse, MoveStageRequest, MoveStageResponse};
use crate::routes::AppState;
use crate::services::MoveOutcome;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/pipeline", web::get().to(get_board))
        .route("/pipeline/{id}/move", web::post().to(move_investor));
}

/// GET /api/v1/admin/pipeline
async fn get_board(_admin: AdminUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.board.refresh(state.store.as_ref()).await?;

    let columns = state
        .board
        .columns()
        .await
        .into_iter()
        .map(|(stage, investors)| BoardColumn { stage, investors })
        .collect();

    Ok(HttpResponse::Ok().json(BoardResponse { columns }))
}

/// Drop an investor onto another column
///
/// POST /api/v1/admin/pipeline/{id}/move
///
/// Request body:
/// ```json
/// { "stage": "Meeting Scheduled" }
/// ```
async fn move_investor(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<MoveStageRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let outcome = state.board.move_stage(state.store.as_ref(), id, req.stage).await?;

    let changed = matches!(outcome, MoveOutcome::Moved(_));
    if changed {
        tracing::info!("{} moved investor {} to {}", admin.0.user_id, id, req.stage);
    }

    let investor = match outcome {
        MoveOutcome::Moved(lp) | MoveOutcome::Unchanged(lp) => lp,
    };

    Ok(HttpResponse::Ok().json(MoveStageResponse { investor, changed }))
}
