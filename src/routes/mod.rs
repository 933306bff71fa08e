// Route exports
pub mod matching;
pub mod tasks;
pub mod tutorships;

use crate::services::{AccessControl, MatchPipeline, TaskEmitter, TutorStore, TutorshipLifecycle};
use actix_web::web;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TutorStore>,
    pub pipeline: Arc<MatchPipeline>,
    pub lifecycle: Arc<TutorshipLifecycle>,
    pub emitter: Arc<TaskEmitter>,
    pub access: Arc<AccessControl>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matching::configure)
            .configure(tutorships::configure)
            .configure(tasks::configure),
    );
}
