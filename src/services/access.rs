use crate::error::EngineError;
use crate::models::RoleKind;
use crate::services::store::TutorStore;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

/// Resources the capability matrix covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Tutorships,
    MatchCandidates,
    Tasks,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Tutorships => "tutorships",
            Resource::MatchCandidates => "match_candidates",
            Resource::Tasks => "tasks",
        }
    }
}

/// Actions the capability matrix covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Approve,
    Delete,
    Recompute,
    Complete,
    Read,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Approve => "approve",
            Action::Delete => "delete",
            Action::Recompute => "recompute",
            Action::Complete => "complete",
            Action::Read => "read",
        }
    }
}

/// Typed capability matrix
///
/// Admins hold every capability. Tutor and tutee coordinators run the
/// matching workflow end to end. Technical coordinators only work their own
/// task queue. The tutor role is bookkeeping and grants nothing here.
pub fn allows(role: RoleKind, resource: Resource, action: Action) -> bool {
    match (role, resource, action) {
        (RoleKind::Admin, _, _) => true,
        (
            RoleKind::TutorCoordinator | RoleKind::TuteeCoordinator,
            Resource::Tutorships | Resource::MatchCandidates,
            _,
        ) => true,
        (
            RoleKind::TutorCoordinator | RoleKind::TuteeCoordinator,
            Resource::Tasks,
            Action::Create | Action::Complete | Action::Read,
        ) => true,
        (RoleKind::TechnicalCoordinator, Resource::Tasks, Action::Complete | Action::Read) => true,
        _ => false,
    }
}

/// A staff member resolved for one request
#[derive(Debug, Clone)]
pub struct Actor {
    pub staff_id: i64,
    pub roles: Vec<RoleKind>,
}

/// Resolves actors against the staff directory and the capability matrix
pub struct AccessControl {
    store: Arc<TutorStore>,
}

impl AccessControl {
    pub fn new(store: Arc<TutorStore>) -> Self {
        Self { store }
    }

    /// Resolve the actor and require one role allowing (resource, action).
    ///
    /// Unknown and inactive staff both come back as permission denied, so the
    /// API does not reveal which staff ids exist.
    pub async fn require(
        &self,
        staff_id: i64,
        resource: Resource,
        action: Action,
    ) -> Result<Actor, EngineError> {
        let denied = EngineError::PermissionDenied {
            resource: resource.as_str(),
            action: action.as_str(),
        };

        let Some(member) = self.store.staff_member(staff_id).await? else {
            tracing::debug!("Unknown staff id {} attempted {:?} {:?}", staff_id, action, resource);
            return Err(denied);
        };

        if !member.is_active {
            tracing::debug!("Inactive staff {} attempted {:?} {:?}", staff_id, action, resource);
            return Err(denied);
        }

        let roles = self.store.staff_role_kinds(staff_id).await?;
        if roles.iter().any(|role| allows(*role, resource, action)) {
            Ok(Actor { staff_id, roles })
        } else {
            tracing::debug!(
                "Staff {} lacks a role for {:?} {:?} (holds {:?})",
                staff_id,
                action,
                resource,
                roles
            );
            Err(denied)
        }
    }
}

/// Entity ids attached to an audit event
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityRefs {
    pub actor_staff_id: Option<i64>,
    pub child_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub tutorship_id: Option<i64>,
}

/// Persistent audit sink for lifecycle attempts
///
/// Writes never fail the operation being audited; a broken sink degrades to a
/// warning in the logs.
pub struct AuditLog {
    pool: PgPool,
}

impl AuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, action: &str, success: bool, refs: EntityRefs, context: Value) {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_events
                (action, success, actor_staff_id, child_id, tutor_id, tutorship_id, context)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(action)
        .bind(success)
        .bind(refs.actor_staff_id)
        .bind(refs.child_id)
        .bind(refs.tutor_id)
        .bind(refs.tutorship_id)
        .bind(context)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!("Audit write for '{}' failed: {}", action, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_everything() {
        for resource in [Resource::Tutorships, Resource::MatchCandidates, Resource::Tasks] {
            for action in [
                Action::Create,
                Action::Approve,
                Action::Delete,
                Action::Recompute,
                Action::Complete,
                Action::Read,
            ] {
                assert!(allows(RoleKind::Admin, resource, action));
            }
        }
    }

    #[test]
    fn test_coordinators_run_the_matching_workflow() {
        for role in [RoleKind::TutorCoordinator, RoleKind::TuteeCoordinator] {
            assert!(allows(role, Resource::Tutorships, Action::Create));
            assert!(allows(role, Resource::Tutorships, Action::Approve));
            assert!(allows(role, Resource::Tutorships, Action::Delete));
            assert!(allows(role, Resource::MatchCandidates, Action::Recompute));
            assert!(allows(role, Resource::Tasks, Action::Create));
            assert!(allows(role, Resource::Tasks, Action::Complete));
        }
    }

    #[test]
    fn test_technical_coordinator_only_works_tasks() {
        assert!(allows(RoleKind::TechnicalCoordinator, Resource::Tasks, Action::Complete));
        assert!(allows(RoleKind::TechnicalCoordinator, Resource::Tasks, Action::Read));
        assert!(!allows(RoleKind::TechnicalCoordinator, Resource::Tasks, Action::Create));
        assert!(!allows(RoleKind::TechnicalCoordinator, Resource::Tutorships, Action::Create));
        assert!(!allows(RoleKind::TechnicalCoordinator, Resource::Tutorships, Action::Approve));
        assert!(!allows(RoleKind::TechnicalCoordinator, Resource::MatchCandidates, Action::Recompute));
    }

    #[test]
    fn test_tutor_role_grants_nothing() {
        for resource in [Resource::Tutorships, Resource::MatchCandidates, Resource::Tasks] {
            for action in [Action::Create, Action::Approve, Action::Delete, Action::Read] {
                assert!(!allows(RoleKind::Tutor, resource, action));
            }
        }
    }
}
