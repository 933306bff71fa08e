use crate::error::EngineError;
use crate::models::{
    ActorQuery, ErrorResponse, HealthResponse, MatchBoardResponse, RecomputeRequest,
    RecomputeResponse,
};
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/recompute", web::post().to(recompute_matches))
        .route("/matches/wizard", web::get().to(wizard_board))
        .route("/matches/report", web::get().to(report_board));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recompute the candidate board
///
/// POST /api/v1/matches/recompute
///
/// Request body:
/// ```json
/// {
///   "actorStaffId": 1
/// }
/// ```
async fn recompute_matches(
    state: web::Data<AppState>,
    req: web::Json<RecomputeRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recompute request: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let summary = state.pipeline.recompute(req.actor_staff_id).await?;

    tracing::info!(
        "Recompute by staff {} stored {} candidate(s), {} on the wizard",
        req.actor_staff_id,
        summary.total_candidates,
        summary.wizard.len()
    );

    Ok(HttpResponse::Ok().json(RecomputeResponse {
        total_candidates: summary.total_candidates,
        wizard_matches: summary.wizard,
    }))
}

/// Candidates for children still seeking a tutor
///
/// GET /api/v1/matches/wizard?actorStaffId={id}
async fn wizard_board(
    state: web::Data<AppState>,
    query: web::Query<ActorQuery>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = query.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let matches = state.pipeline.wizard_view(query.actor_staff_id).await?;
    let total_results = matches.len();

    Ok(HttpResponse::Ok().json(MatchBoardResponse { matches, total_results }))
}

/// Every stored candidate, for reporting
///
/// GET /api/v1/matches/report?actorStaffId={id}
async fn report_board(
    state: web::Data<AppState>,
    query: web::Query<ActorQuery>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = query.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let matches = state.pipeline.report_view(query.actor_staff_id).await?;
    let total_results = matches.len();

    Ok(HttpResponse::Ok().json(MatchBoardResponse { matches, total_results }))
}
