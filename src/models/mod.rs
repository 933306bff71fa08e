// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidatePair, Child, Coordinates, FollowUpTask, Gender, LifeStatus, MatchRecord,
    PrevStatusSnapshot, ResolvedDistance, RoleKind, StaffMember, TaskStatus, TaskType, Tutor,
    TutorStatus, TutoringStatus, Tutorship, TutorshipActivation,
};
pub use requests::{
    ActorQuery, ApproveTutorshipRequest, CompleteTaskRequest, CreateTutorshipRequest,
    RecomputeRequest, TechnicalReviewRequest,
};
pub use responses::{
    DeleteTutorshipResponse, ErrorResponse, HealthResponse, MatchBoardResponse, RecomputeResponse,
    TaskAcceptedResponse, TaskResponse, TutorshipResponse,
};
