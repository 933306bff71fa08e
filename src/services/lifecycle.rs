use crate::core::transitions::{self, CreationContext, ExistingPair, GatingTask};
use crate::error::EngineError;
use crate::models::{
    Child, PrevStatusSnapshot, RoleKind, TaskStatus, TaskType, Tutor, TutorStatus, TutoringStatus,
    Tutorship, TutorshipActivation,
};
use crate::services::access::{AccessControl, Action, AuditLog, EntityRefs, Resource};
use crate::services::store::TutorStore;
use crate::services::tasks::TaskEmitter;
use serde_json::json;
use sqlx::Row;
use std::sync::Arc;

/// Executes tutorship lifecycle operations
///
/// Decisions come from the pure planners in `core::transitions`; this type
/// owns the transactions that carry them out. Every operation is audited,
/// success or not, and any failure rolls the whole transaction back.
pub struct TutorshipLifecycle {
    store: Arc<TutorStore>,
    access: Arc<AccessControl>,
    audit: Arc<AuditLog>,
    emitter: Arc<TaskEmitter>,
}

impl TutorshipLifecycle {
    pub fn new(
        store: Arc<TutorStore>,
        access: Arc<AccessControl>,
        audit: Arc<AuditLog>,
        emitter: Arc<TaskEmitter>,
    ) -> Self {
        Self { store, access, audit, emitter }
    }

    /// Create a tutorship from a coordinator's manual match decision
    ///
    /// The creating role signs the first approval, so the row starts pending
    /// with one approval on record. Emission of the tutee match confirmation
    /// task happens after commit and never delays the caller.
    pub async fn create_tutorship(
        &self,
        actor_staff_id: i64,
        child_id: i64,
        tutor_id: i64,
        approver_role_id: i64,
    ) -> Result<Tutorship, EngineError> {
        let outcome =
            self.create_inner(actor_staff_id, child_id, tutor_id, approver_role_id).await;

        let refs = EntityRefs {
            actor_staff_id: Some(actor_staff_id),
            child_id: Some(child_id),
            tutor_id: Some(tutor_id),
            tutorship_id: outcome.as_ref().ok().map(|t| t.id),
        };
        self.audit
            .record(
                "tutorship_create",
                outcome.is_ok(),
                refs,
                json!({ "approver_role_id": approver_role_id }),
            )
            .await;

        if let Ok(tutorship) = &outcome {
            let job_id = self.emitter.emit_tutee_match(tutorship.id, child_id, tutor_id);
            tracing::debug!("Scheduled tutee match emission {} for tutorship {}", job_id, tutorship.id);
        }

        outcome
    }

    async fn create_inner(
        &self,
        actor_staff_id: i64,
        child_id: i64,
        tutor_id: i64,
        approver_role_id: i64,
    ) -> Result<Tutorship, EngineError> {
        self.access.require(actor_staff_id, Resource::Tutorships, Action::Create).await?;

        let mut tx = self.store.pool().begin().await?;

        // Row locks serialize concurrent lifecycle work on the same parties
        let Some(child) =
            sqlx::query_as::<_, Child>("SELECT * FROM children WHERE id = $1 FOR UPDATE")
                .bind(child_id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Err(EngineError::NotFound { entity: "child", id: child_id });
        };

        let Some(tutor) =
            sqlx::query_as::<_, Tutor>("SELECT * FROM tutors WHERE id = $1 FOR UPDATE")
                .bind(tutor_id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Err(EngineError::NotFound { entity: "tutor", id: tutor_id });
        };

        let existing = sqlx::query_as::<_, Tutorship>(
            "SELECT * FROM tutorships WHERE child_id = $1 AND tutor_id = $2 FOR UPDATE",
        )
        .bind(child_id)
        .bind(tutor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let other_live: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tutorships WHERE child_id = $1 AND tutor_id <> $2 AND activation <> $3",
        )
        .bind(child_id)
        .bind(tutor_id)
        .bind(TutorshipActivation::Inactive)
        .fetch_one(&mut *tx)
        .await?;

        let plan = transitions::plan_creation(&CreationContext {
            child_id,
            existing: existing
                .as_ref()
                .map(|t| ExistingPair { id: t.id, activation: t.activation }),
            child_has_live_tutorship: other_live > 0,
            child_life_status: child.life_status,
            tutor_status: tutor.tutorship_status,
            child_status: child.tutoring_status,
        })?;

        if let Some(stale_id) = plan.supersede_inactive {
            sqlx::query("DELETE FROM prev_status_snapshots WHERE tutorship_id = $1")
                .bind(stale_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM tutorships WHERE id = $1")
                .bind(stale_id)
                .execute(&mut *tx)
                .await?;
            tracing::info!("Superseded inactive tutorship {} for re-match", stale_id);
        }

        // A tutor committed here abandons their pending matches elsewhere.
        // Raw delete: the snatched children keep their current statuses.
        let snatched = sqlx::query(
            "DELETE FROM tutorships WHERE tutor_id = $1 AND activation = $2 AND child_id <> $3 RETURNING id, child_id",
        )
        .bind(tutor_id)
        .bind(TutorshipActivation::PendingFirstApproval)
        .bind(child_id)
        .fetch_all(&mut *tx)
        .await?;
        for row in &snatched {
            tracing::info!(
                "Tutor {} snatched from pending tutorship {} (child {})",
                tutor_id,
                row.get::<i64, _>("id"),
                row.get::<i64, _>("child_id")
            );
        }

        let tutorship = sqlx::query_as::<_, Tutorship>(
            r#"
            INSERT INTO tutorships (child_id, tutor_id, activation, approval_counter, last_approver)
            VALUES ($1, $2, $3, 1, $4)
            RETURNING *
            "#,
        )
        .bind(child_id)
        .bind(tutor_id)
        .bind(TutorshipActivation::PendingFirstApproval)
        .bind(vec![approver_role_id])
        .fetch_one(&mut *tx)
        .await?;

        if let Some(snapshot) = plan.snapshot {
            // One snapshot per child: clear leftovers before the fresh one
            sqlx::query("DELETE FROM prev_status_snapshots WHERE child_id = $1")
                .bind(child_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                r#"
                INSERT INTO prev_status_snapshots
                    (tutorship_id, child_id, tutor_id, prev_tutor_status, prev_child_status)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(tutorship.id)
            .bind(child_id)
            .bind(tutor_id)
            .bind(snapshot.prev_tutor_status)
            .bind(snapshot.prev_child_status)
            .execute(&mut *tx)
            .await?;
        }

        if plan.advance_child {
            sqlx::query("UPDATE children SET tutoring_status = $1, updated_at = NOW() WHERE id = $2")
                .bind(TutoringStatus::HasTutor)
                .bind(child_id)
                .execute(&mut *tx)
                .await?;
        }

        // Sweep other soft-deleted rows this tutor accumulated. Their
        // snapshots stay behind for later restores.
        let swept = sqlx::query(
            "DELETE FROM tutorships WHERE tutor_id = $1 AND activation = $2 AND id <> $3",
        )
        .bind(tutor_id)
        .bind(TutorshipActivation::Inactive)
        .bind(tutorship.id)
        .execute(&mut *tx)
        .await?;
        if swept.rows_affected() > 0 {
            tracing::debug!(
                "Swept {} inactive tutorship(s) for tutor {}",
                swept.rows_affected(),
                tutor_id
            );
        }

        sqlx::query("UPDATE tutors SET tutorship_status = $1, updated_at = NOW() WHERE id = $2")
            .bind(TutorStatus::HasTutee)
            .bind(tutor_id)
            .execute(&mut *tx)
            .await?;

        // Re-match bookkeeping for the wizard
        sqlx::query("UPDATE match_candidates SET is_used = TRUE WHERE child_id = $1 AND tutor_id = $2")
            .bind(child_id)
            .bind(tutor_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Created tutorship {} (child {}, tutor {})",
            tutorship.id,
            child_id,
            tutor_id
        );

        Ok(tutorship)
    }

    /// Record one role's approval; the second approval activates
    pub async fn approve_tutorship(
        &self,
        actor_staff_id: i64,
        tutorship_id: i64,
        approver_role_id: i64,
    ) -> Result<Tutorship, EngineError> {
        let outcome = self.approve_inner(actor_staff_id, tutorship_id, approver_role_id).await;

        let refs = EntityRefs {
            actor_staff_id: Some(actor_staff_id),
            child_id: outcome.as_ref().ok().map(|t| t.child_id),
            tutor_id: outcome.as_ref().ok().map(|t| t.tutor_id),
            tutorship_id: Some(tutorship_id),
        };
        self.audit
            .record(
                "tutorship_approve",
                outcome.is_ok(),
                refs,
                json!({ "approver_role_id": approver_role_id }),
            )
            .await;

        outcome
    }

    async fn approve_inner(
        &self,
        actor_staff_id: i64,
        tutorship_id: i64,
        approver_role_id: i64,
    ) -> Result<Tutorship, EngineError> {
        self.access.require(actor_staff_id, Resource::Tutorships, Action::Approve).await?;

        let mut tx = self.store.pool().begin().await?;

        let Some(tutorship) = sqlx::query_as::<_, Tutorship>(
            "SELECT * FROM tutorships WHERE id = $1 FOR UPDATE",
        )
        .bind(tutorship_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Err(EngineError::NotFound { entity: "tutorship", id: tutorship_id });
        };

        // The final approval is gated on the newest confirmation task
        let gating = if tutorship.approval_counter == transitions::REQUIRED_APPROVALS - 1 {
            sqlx::query(
                r#"
                SELECT id, status FROM tasks
                WHERE task_type = $1 AND tutor_id = $2 AND child_id = $3
                ORDER BY id DESC
                LIMIT 1
                "#,
            )
            .bind(TaskType::TuteeMatch)
            .bind(tutorship.tutor_id)
            .bind(tutorship.child_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| GatingTask { id: row.get("id"), status: row.get("status") })
        } else {
            None
        };

        let outcome = transitions::apply_approval(&tutorship, approver_role_id, gating)?;

        let updated = sqlx::query_as::<_, Tutorship>(
            r#"
            UPDATE tutorships
            SET activation = $1, approval_counter = $2, last_approver = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(outcome.activation)
        .bind(outcome.approval_counter)
        .bind(&outcome.last_approver)
        .bind(tutorship_id)
        .fetch_one(&mut *tx)
        .await?;

        if outcome.finalized {
            // Idempotent tutor role grant for the owning staff member
            sqlx::query(
                r#"
                INSERT INTO staff_roles (staff_id, role_id)
                SELECT t.staff_id, r.id FROM tutors t, roles r
                WHERE t.id = $1 AND r.kind = $2
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(tutorship.tutor_id)
            .bind(RoleKind::Tutor)
            .execute(&mut *tx)
            .await?;

            // Mirror the child's wellness fields onto the tutor's record
            sqlx::query(
                r#"
                UPDATE tutors
                SET tutee_wellness_note = c.wellness_note,
                    tutee_family_status = c.family_status,
                    updated_at = NOW()
                FROM children c
                WHERE tutors.id = $1 AND c.id = $2
                "#,
            )
            .bind(tutorship.tutor_id)
            .bind(tutorship.child_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if outcome.finalized {
            tracing::info!("Tutorship {} activated after dual approval", tutorship_id);
        } else {
            tracing::info!(
                "Tutorship {} now holds {} approval(s)",
                tutorship_id,
                outcome.approval_counter
            );
        }

        Ok(updated)
    }

    /// Delete a tutorship and restore party statuses from snapshots
    pub async fn delete_tutorship(
        &self,
        actor_staff_id: i64,
        tutorship_id: i64,
    ) -> Result<(), EngineError> {
        let outcome = self.delete_inner(actor_staff_id, tutorship_id).await;

        let refs = EntityRefs {
            actor_staff_id: Some(actor_staff_id),
            child_id: outcome.as_ref().ok().map(|t| t.child_id),
            tutor_id: outcome.as_ref().ok().map(|t| t.tutor_id),
            tutorship_id: Some(tutorship_id),
        };
        self.audit.record("tutorship_delete", outcome.is_ok(), refs, json!({})).await;

        outcome.map(|_| ())
    }

    async fn delete_inner(
        &self,
        actor_staff_id: i64,
        tutorship_id: i64,
    ) -> Result<Tutorship, EngineError> {
        self.access.require(actor_staff_id, Resource::Tutorships, Action::Delete).await?;

        let mut tx = self.store.pool().begin().await?;

        let Some(tutorship) = sqlx::query_as::<_, Tutorship>(
            "SELECT * FROM tutorships WHERE id = $1 FOR UPDATE",
        )
        .bind(tutorship_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Err(EngineError::NotFound { entity: "tutorship", id: tutorship_id });
        };

        let own_snapshot = sqlx::query_as::<_, PrevStatusSnapshot>(
            "SELECT * FROM prev_status_snapshots WHERE tutorship_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(tutorship_id)
        .fetch_optional(&mut *tx)
        .await?;

        // May be the same row, or one orphaned by an earlier deletion
        let child_snapshot = sqlx::query_as::<_, PrevStatusSnapshot>(
            "SELECT * FROM prev_status_snapshots WHERE child_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(tutorship.child_id)
        .fetch_optional(&mut *tx)
        .await?;

        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tutorships WHERE child_id = $1 AND id <> $2 AND activation <> $3",
        )
        .bind(tutorship.child_id)
        .bind(tutorship_id)
        .bind(TutorshipActivation::Inactive)
        .fetch_one(&mut *tx)
        .await?;

        let plan = transitions::plan_deletion(
            own_snapshot.as_ref(),
            child_snapshot.as_ref(),
            remaining as usize,
        );

        sqlx::query("UPDATE tutors SET tutorship_status = $1, updated_at = NOW() WHERE id = $2")
            .bind(plan.tutor_status_after)
            .bind(tutorship.tutor_id)
            .execute(&mut *tx)
            .await?;

        if let Some(status) = plan.child_status_after {
            sqlx::query("UPDATE children SET tutoring_status = $1, updated_at = NOW() WHERE id = $2")
                .bind(status)
                .bind(tutorship.child_id)
                .execute(&mut *tx)
                .await?;
        }

        // Outstanding confirmation work for the pair goes with the tutorship
        sqlx::query(
            "DELETE FROM tasks WHERE task_type = $1 AND tutor_id = $2 AND child_id = $3 AND status = $4",
        )
        .bind(TaskType::TuteeMatch)
        .bind(tutorship.tutor_id)
        .bind(tutorship.child_id)
        .bind(TaskStatus::Open)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tutorships WHERE id = $1")
            .bind(tutorship_id)
            .execute(&mut *tx)
            .await?;

        if plan.purge_child_snapshots {
            sqlx::query("DELETE FROM prev_status_snapshots WHERE child_id = $1")
                .bind(tutorship.child_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Deleted tutorship {} (child {}, tutor {})",
            tutorship_id,
            tutorship.child_id,
            tutorship.tutor_id
        );

        Ok(tutorship)
    }
}
