use crate::core::eligibility;
use crate::error::EngineError;
use crate::models::{
    LifeStatus, PrevStatusSnapshot, TaskStatus, TutorStatus, TutoringStatus, Tutorship,
    TutorshipActivation,
};

/// Approvals required before a tutorship becomes active.
pub const REQUIRED_APPROVALS: i16 = 2;

/// Existing tutorship row for the same (child, tutor) pair.
#[derive(Debug, Clone, Copy)]
pub struct ExistingPair {
    pub id: i64,
    pub activation: TutorshipActivation,
}

/// Inputs for planning a tutorship creation.
#[derive(Debug, Clone, Copy)]
pub struct CreationContext {
    pub child_id: i64,
    pub existing: Option<ExistingPair>,
    /// The child holds some other pending or active tutorship.
    pub child_has_live_tutorship: bool,
    pub child_life_status: LifeStatus,
    pub tutor_status: TutorStatus,
    pub child_status: TutoringStatus,
}

/// Party statuses to record before they are overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotValues {
    pub prev_tutor_status: TutorStatus,
    pub prev_child_status: TutoringStatus,
}

/// Side effects a creation asks of the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationPlan {
    /// Soft-deleted row for the same pair to drop before re-creating it.
    pub supersede_inactive: Option<i64>,
    /// Present exactly when this is the child's first live tutorship.
    pub snapshot: Option<SnapshotValues>,
    /// Advance the child to `has_tutor`. Tracks `snapshot`.
    pub advance_child: bool,
}

/// Decide what a manual match creation must do, or why it must be rejected.
///
/// An inactive row for the same pair is superseded, any other row is a
/// conflict. A snapshot is taken only on the child's first live tutorship so
/// that later deletions restore the statuses from before tutoring started.
pub fn plan_creation(ctx: &CreationContext) -> Result<CreationPlan, EngineError> {
    let mut supersede_inactive = None;
    if let Some(existing) = ctx.existing {
        match existing.activation {
            TutorshipActivation::Inactive => supersede_inactive = Some(existing.id),
            _ => return Err(EngineError::DuplicateRelationship { existing_id: existing.id }),
        }
    }

    if !eligibility::child_matchable(ctx.child_life_status) {
        return Err(EngineError::IneligibleChild {
            child_id: ctx.child_id,
            life_status: ctx.child_life_status.as_str(),
        });
    }

    let first = !ctx.child_has_live_tutorship;
    let snapshot = if first {
        Some(SnapshotValues {
            prev_tutor_status: ctx.tutor_status,
            prev_child_status: ctx.child_status,
        })
    } else {
        None
    };

    Ok(CreationPlan { supersede_inactive, snapshot, advance_child: first })
}

/// The newest tutee match confirmation task for the pair, if one exists.
#[derive(Debug, Clone, Copy)]
pub struct GatingTask {
    pub id: i64,
    pub status: TaskStatus,
}

/// Row changes produced by one approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub approval_counter: i16,
    pub last_approver: Vec<i64>,
    pub activation: TutorshipActivation,
    /// True when this was the final approval and the tutorship went active.
    pub finalized: bool,
}

/// Apply one role's approval to a pending tutorship.
///
/// The final approval is gated on the tutee match confirmation task: an open
/// task blocks it, while a completed or cancelled one does not. A pair that
/// never got such a task is not blocked.
pub fn apply_approval(
    tutorship: &Tutorship,
    approver_role_id: i64,
    gating_task: Option<GatingTask>,
) -> Result<ApprovalOutcome, EngineError> {
    if tutorship.activation == TutorshipActivation::Inactive {
        return Err(EngineError::InvariantViolation(format!(
            "tutorship {} is inactive and cannot be approved",
            tutorship.id
        )));
    }
    if tutorship.approval_counter as usize != tutorship.last_approver.len() {
        return Err(EngineError::InvariantViolation(format!(
            "tutorship {}: approval counter {} does not match {} recorded approvers",
            tutorship.id,
            tutorship.approval_counter,
            tutorship.last_approver.len()
        )));
    }
    if tutorship.last_approver.contains(&approver_role_id) {
        return Err(EngineError::DuplicateApproval { tutorship_id: tutorship.id, approver_role_id });
    }
    if tutorship.approval_counter >= REQUIRED_APPROVALS {
        return Err(EngineError::InvariantViolation(format!(
            "tutorship {} already holds {} approvals",
            tutorship.id, tutorship.approval_counter
        )));
    }

    if tutorship.approval_counter == REQUIRED_APPROVALS - 1 {
        if let Some(task) = gating_task {
            if task.status == TaskStatus::Open {
                return Err(EngineError::BlockedByIncompleteTask { task_id: task.id });
            }
        }
    }

    let mut last_approver = tutorship.last_approver.clone();
    last_approver.push(approver_role_id);
    let approval_counter = last_approver.len() as i16;
    let finalized = approval_counter == REQUIRED_APPROVALS;
    let activation =
        if finalized { TutorshipActivation::Active } else { tutorship.activation };

    Ok(ApprovalOutcome { approval_counter, last_approver, activation, finalized })
}

/// Side effects a deletion asks of the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionPlan {
    pub tutor_status_after: TutorStatus,
    /// None leaves the child's status untouched.
    pub child_status_after: Option<TutoringStatus>,
    /// Drop every snapshot for the child once its last live tutorship is gone.
    pub purge_child_snapshots: bool,
}

/// Decide the restores a tutorship deletion must perform.
///
/// The tutor falls back to the status snapshotted for this tutorship, or to
/// `no_tutee` when none was taken. The child is only restored when this was
/// its last remaining tutorship, from whichever snapshot still covers it.
pub fn plan_deletion(
    own_snapshot: Option<&PrevStatusSnapshot>,
    child_snapshot: Option<&PrevStatusSnapshot>,
    remaining_tutorships: usize,
) -> DeletionPlan {
    let tutor_status_after =
        own_snapshot.map(|s| s.prev_tutor_status).unwrap_or(TutorStatus::NoTutee);

    let last = remaining_tutorships == 0;
    let child_status_after =
        if last { child_snapshot.map(|s| s.prev_child_status) } else { None };

    DeletionPlan { tutor_status_after, child_status_after, purge_child_snapshots: last }
}
