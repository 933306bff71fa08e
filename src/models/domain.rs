use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Gender of a tutor or child. Matching only ever pairs equal genders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

/// Tutorship side of a tutor's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TutorStatus {
    HasTutee,
    NoTutee,
    NotAvailable,
}

impl TutorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorStatus::HasTutee => "has_tutee",
            TutorStatus::NoTutee => "no_tutee",
            TutorStatus::NotAvailable => "not_available",
        }
    }
}

/// Tutoring side of a child's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TutoringStatus {
    SeekingTutor,
    SeekingTutorHighPriority,
    HasTutor,
    NotRelevant,
}

impl TutoringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutoringStatus::SeekingTutor => "seeking_tutor",
            TutoringStatus::SeekingTutorHighPriority => "seeking_tutor_high_priority",
            TutoringStatus::HasTutor => "has_tutor",
            TutoringStatus::NotRelevant => "not_relevant",
        }
    }
}

/// Life status of a child. Drives eligibility for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LifeStatus {
    InTreatment,
    Healthy,
    Deceased,
}

impl LifeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStatus::InTreatment => "in_treatment",
            LifeStatus::Healthy => "healthy",
            LifeStatus::Deceased => "deceased",
        }
    }
}

/// Lifecycle state of a tutorship. `Inactive` rows are soft-deleted and may be
/// superseded by a manual re-match of the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TutorshipActivation {
    PendingFirstApproval,
    Active,
    Inactive,
}

impl TutorshipActivation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorshipActivation::PendingFirstApproval => "pending_first_approval",
            TutorshipActivation::Active => "active",
            TutorshipActivation::Inactive => "inactive",
        }
    }
}

/// Kinds of follow-up work items the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskType {
    TuteeMatch,
    TechnicalReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Completed,
    Cancelled,
}

/// Staff roles recognized by the capability matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RoleKind {
    Admin,
    TutorCoordinator,
    TuteeCoordinator,
    TechnicalCoordinator,
    Tutor,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::TutorCoordinator => "tutor_coordinator",
            RoleKind::TuteeCoordinator => "tutee_coordinator",
            RoleKind::TechnicalCoordinator => "technical_coordinator",
            RoleKind::Tutor => "tutor",
        }
    }
}

/// A volunteer tutor. `age` is a denormalized whole-year value refreshed from
/// `birth_date` at the start of every recompute.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tutor {
    pub id: i64,
    pub staff_id: i64,
    pub full_name: String,
    pub city: String,
    pub birth_date: NaiveDate,
    pub age: i16,
    pub gender: Gender,
    pub tutorship_status: TutorStatus,
    pub tutee_wellness_note: Option<String>,
    pub tutee_family_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A child seeking a tutor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Child {
    pub id: i64,
    pub full_name: String,
    pub city: String,
    pub birth_date: NaiveDate,
    pub age: i16,
    pub gender: Gender,
    pub life_status: LifeStatus,
    pub tutoring_status: TutoringStatus,
    pub wellness_note: Option<String>,
    pub family_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The pairing relationship under dual approval.
/// Invariant: `approval_counter == last_approver.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tutorship {
    pub id: i64,
    pub child_id: i64,
    pub tutor_id: i64,
    pub activation: TutorshipActivation,
    pub approval_counter: i16,
    pub last_approver: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Statuses both parties held before their first tutorship together, kept so a
/// later deletion can restore them. At most one snapshot exists per child.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrevStatusSnapshot {
    pub id: i64,
    pub tutorship_id: Option<i64>,
    pub child_id: i64,
    pub tutor_id: i64,
    pub prev_tutor_status: TutorStatus,
    pub prev_child_status: TutoringStatus,
    pub created_at: DateTime<Utc>,
}

/// A staff member of the organization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StaffMember {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// City coordinates as resolved by the geocoding provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of a geodistance lookup. Coordinates are absent when the provider
/// could not resolve one of the cities and the distance degraded to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDistance {
    pub distance_km: i32,
    pub coord_a: Option<Coordinates>,
    pub coord_b: Option<Coordinates>,
}

/// An in-flight candidate pairing moving through the pipeline. Distance and
/// coordinates are attached by the geodistance stage, the grade by the grader.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    pub child_id: i64,
    pub child_name: String,
    pub child_city: String,
    pub child_age: i16,
    pub child_gender: Gender,
    pub tutor_id: i64,
    pub tutor_name: String,
    pub tutor_city: String,
    pub tutor_age: i16,
    pub tutor_gender: Gender,
    pub distance_km: i32,
    pub tutor_coord: Option<Coordinates>,
    pub child_coord: Option<Coordinates>,
    pub grade: i16,
}

/// A persisted, graded candidate as served to the match wizard and reports.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchRecord {
    pub id: i64,
    pub child_id: i64,
    pub child_name: String,
    pub child_city: String,
    pub child_age: i16,
    pub child_gender: Gender,
    pub tutor_id: i64,
    pub tutor_name: String,
    pub tutor_city: String,
    pub tutor_age: i16,
    pub tutor_gender: Gender,
    pub distance_km: i32,
    pub grade: i16,
    pub is_used: bool,
    pub computed_at: DateTime<Utc>,
}

/// A follow-up work item for a coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowUpTask {
    pub id: i64,
    pub task_type: TaskType,
    pub assignee_staff_id: Option<i64>,
    pub child_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub tutorship_id: Option<i64>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&TutoringStatus::SeekingTutorHighPriority).unwrap(),
            "\"seeking_tutor_high_priority\""
        );
        assert_eq!(
            serde_json::to_string(&TutorshipActivation::PendingFirstApproval).unwrap(),
            "\"pending_first_approval\""
        );
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }

    #[test]
    fn as_str_matches_serde_encoding() {
        for status in [
            TutoringStatus::SeekingTutor,
            TutoringStatus::SeekingTutorHighPriority,
            TutoringStatus::HasTutor,
            TutoringStatus::NotRelevant,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json.trim_matches('"'), status.as_str());
        }
        for status in [TutorStatus::HasTutee, TutorStatus::NoTutee, TutorStatus::NotAvailable] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json.trim_matches('"'), status.as_str());
        }
    }

    #[test]
    fn role_kinds_round_trip() {
        for kind in [
            RoleKind::Admin,
            RoleKind::TutorCoordinator,
            RoleKind::TuteeCoordinator,
            RoleKind::TechnicalCoordinator,
            RoleKind::Tutor,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: RoleKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
