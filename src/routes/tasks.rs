use crate::error::EngineError;
use crate::models::{
    ActorQuery, CompleteTaskRequest, ErrorResponse, TaskAcceptedResponse, TaskResponse,
    TechnicalReviewRequest,
};
use crate::routes::AppState;
use crate::services::access::{Action, Resource};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure follow-up task routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/tasks/technical-reviews", web::post().to(schedule_technical_review))
        .route("/tasks/{id}", web::get().to(task_status))
        .route("/tasks/{id}/complete", web::post().to(complete_task));
}

/// Schedule a technical review of a tutor's equipment
///
/// POST /api/v1/tasks/technical-reviews
///
/// Fire-and-forget: the response acknowledges scheduling, not task
/// creation. The emitter waits for the tutor row to become visible and
/// gives up after its deadline if it never does.
async fn schedule_technical_review(
    state: web::Data<AppState>,
    req: web::Json<TechnicalReviewRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    state.access.require(req.actor_staff_id, Resource::Tasks, Action::Create).await?;

    let job_id = state.emitter.emit_technical_review(req.tutor_id);

    tracing::info!(
        "Staff {} scheduled technical review of tutor {} as job {}",
        req.actor_staff_id,
        req.tutor_id,
        job_id
    );

    Ok(HttpResponse::Accepted().json(TaskAcceptedResponse {
        accepted: true,
        job_id: job_id.to_string(),
    }))
}

/// Fetch a follow-up task
///
/// GET /api/v1/tasks/{id}?actorStaffId=123
async fn task_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<ActorQuery>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = query.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    state.access.require(query.actor_staff_id, Resource::Tasks, Action::Read).await?;

    let task = state.emitter.task_status(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TaskResponse { task }))
}

/// Close out a follow-up task
///
/// POST /api/v1/tasks/{id}/complete
async fn complete_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<CompleteTaskRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    state.access.require(req.actor_staff_id, Resource::Tasks, Action::Complete).await?;

    let task = state.emitter.complete_task(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TaskResponse { task }))
}
