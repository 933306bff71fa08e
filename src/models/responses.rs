use crate::models::domain::{FollowUpTask, MatchRecord, Tutorship};
use serde::{Deserialize, Serialize};

/// Response for the recompute endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeResponse {
    pub total_candidates: usize,
    pub wizard_matches: Vec<MatchRecord>,
}

/// Response for the wizard and report read endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBoardResponse {
    pub matches: Vec<MatchRecord>,
    pub total_results: usize,
}

/// Response carrying a tutorship after a lifecycle operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorshipResponse {
    pub tutorship: Tutorship,
}

/// Response for tutorship deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTutorshipResponse {
    pub success: bool,
}

/// Response for fire-and-forget task emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAcceptedResponse {
    pub accepted: bool,
    pub job_id: String,
}

/// Response for task completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: FollowUpTask,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
