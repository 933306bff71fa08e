use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to recompute the candidate repository
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecomputeRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
}

/// Request to create a tutorship from a manual match decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTutorshipRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "child_id", rename = "childId")]
    pub child_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "tutor_id", rename = "tutorId")]
    pub tutor_id: i64,
    /// Role under which the creating coordinator signs the first approval.
    #[validate(range(min = 1))]
    #[serde(alias = "approver_role_id", rename = "approverRoleId")]
    pub approver_role_id: i64,
}

/// Request to record an approval on a pending tutorship
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApproveTutorshipRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "approver_role_id", rename = "approverRoleId")]
    pub approver_role_id: i64,
}

/// Actor reference carried on requests without a body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActorQuery {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
}

/// Request to schedule a technical review of a tutor's equipment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TechnicalReviewRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "tutor_id", rename = "tutorId")]
    pub tutor_id: i64,
}

/// Request to close out a follow-up task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteTaskRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "actor_staff_id", rename = "actorStaffId")]
    pub actor_staff_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_both_casings() {
        let camel: CreateTutorshipRequest = serde_json::from_str(
            r#"{"actorStaffId": 1, "childId": 2, "tutorId": 3, "approverRoleId": 4}"#,
        )
        .unwrap();
        let snake: CreateTutorshipRequest = serde_json::from_str(
            r#"{"actor_staff_id": 1, "child_id": 2, "tutor_id": 3, "approver_role_id": 4}"#,
        )
        .unwrap();

        assert_eq!(camel.child_id, snake.child_id);
        assert_eq!(camel.approver_role_id, 4);
    }

    #[test]
    fn test_validation_rejects_non_positive_ids() {
        let req = RecomputeRequest { actor_staff_id: 0 };
        assert!(req.validate().is_err());

        let req = RecomputeRequest { actor_staff_id: 7 };
        assert!(req.validate().is_ok());
    }
}
