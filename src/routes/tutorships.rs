use crate::error::EngineError;
use crate::models::{
    ActorQuery, ApproveTutorshipRequest, CreateTutorshipRequest, DeleteTutorshipResponse,
    ErrorResponse, TutorshipResponse,
};
use crate::routes::AppState;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure tutorship lifecycle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/tutorships", web::post().to(create_tutorship))
        .route("/tutorships/{id}/approve", web::post().to(approve_tutorship))
        .route("/tutorships/{id}", web::delete().to(delete_tutorship));
}

/// Create a tutorship for a chosen child and tutor pair
///
/// POST /api/v1/tutorships
///
/// Request body:
/// ```json
/// {
///   "actorStaffId": 1,
///   "childId": 10,
///   "tutorId": 20,
///   "approverRoleId": 2
/// }
/// ```
async fn create_tutorship(
    state: web::Data<AppState>,
    req: web::Json<CreateTutorshipRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create tutorship request: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let tutorship = state
        .lifecycle
        .create_tutorship(req.actor_staff_id, req.child_id, req.tutor_id, req.approver_role_id)
        .await?;

    Ok(HttpResponse::Created().json(TutorshipResponse { tutorship }))
}

/// Record an approval on a pending tutorship
///
/// POST /api/v1/tutorships/{id}/approve
async fn approve_tutorship(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<ApproveTutorshipRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let tutorship = state
        .lifecycle
        .approve_tutorship(req.actor_staff_id, path.into_inner(), req.approver_role_id)
        .await?;

    Ok(HttpResponse::Ok().json(TutorshipResponse { tutorship }))
}

/// Delete a tutorship, restoring party statuses
///
/// DELETE /api/v1/tutorships/{id}?actorStaffId={staffId}
async fn delete_tutorship(
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

    state.lifecycle.delete_tutorship(query.actor_staff_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeleteTutorshipResponse { success: true }))
}
