// Unit tests for the tutormatch engine

use chrono::Utc;
use std::collections::HashSet;
use tutormatch::core::distance::{city_distance_km, haversine_distance};
use tutormatch::core::eligibility::wizard_rows;
use tutormatch::core::grader::grade_in_place;
use tutormatch::core::transitions::{
    apply_approval, plan_creation, plan_deletion, CreationContext, GatingTask,
};
use tutormatch::models::{
    CandidatePair, Coordinates, Gender, LifeStatus, MatchRecord, PrevStatusSnapshot, TaskStatus,
    TutorStatus, TutoringStatus, Tutorship, TutorshipActivation,
};

fn create_test_pair(child_age: i16, tutor_age: i16, distance_km: i32) -> CandidatePair {
    CandidatePair {
        child_id: 1,
        child_name: "Test Child".to_string(),
        child_city: "Haifa".to_string(),
        child_age,
        child_gender: Gender::Female,
        tutor_id: 2,
        tutor_name: "Test Tutor".to_string(),
        tutor_city: "Tel Aviv".to_string(),
        tutor_age,
        tutor_gender: Gender::Female,
        distance_km,
        tutor_coord: None,
        child_coord: None,
        grade: 0,
    }
}

fn create_test_record(id: i64, child_id: i64, grade: i16) -> MatchRecord {
    MatchRecord {
        id,
        child_id,
        child_name: format!("Child {}", child_id),
        child_city: "Haifa".to_string(),
        child_age: 12,
        child_gender: Gender::Female,
        tutor_id: id + 100,
        tutor_name: format!("Tutor {}", id + 100),
        tutor_city: "Tel Aviv".to_string(),
        tutor_age: 24,
        tutor_gender: Gender::Female,
        distance_km: 8,
        grade,
        is_used: false,
        computed_at: Utc::now(),
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(32.0853, 34.7818, 32.0853, 34.7818);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_known_cities() {
    // Jerusalem to Tel Aviv is approximately 54 km
    let distance = haversine_distance(31.7683, 35.2137, 32.0853, 34.7818);
    assert!(distance > 50.0 && distance < 58.0, "Expected ~54km, got {}", distance);

    // Jerusalem to Haifa is approximately 116 km
    let distance = haversine_distance(31.7683, 35.2137, 32.7940, 34.9896);
    assert!(distance > 110.0 && distance < 122.0, "Expected ~116km, got {}", distance);
}

#[test]
fn test_city_distance_rounds_up() {
    let tel_aviv = Coordinates { latitude: 32.0853, longitude: 34.7818 };

    assert_eq!(city_distance_km(tel_aviv, tel_aviv), 0);

    // Roughly half a kilometer north still counts as a full kilometer
    let nearby = Coordinates { latitude: 32.0898, longitude: 34.7818 };
    assert_eq!(city_distance_km(tel_aviv, nearby), 1);
}

#[test]
fn test_grading_a_full_board() {
    let mut board = vec![
        create_test_pair(10, 12, 3),  // close in age and distance
        create_test_pair(12, 24, 18), // middling on both
        create_test_pair(9, 26, 35),  // wide gap, neutral distance
        create_test_pair(14, 20, 72), // beyond the far cutoff
    ];
    for (i, pair) in board.iter_mut().enumerate() {
        pair.child_id = i as i64 + 1;
    }

    grade_in_place(&mut board);

    let grades: Vec<i16> = board.iter().map(|p| p.grade).collect();
    assert_eq!(grades, vec![40, 49, 67, -5]);

    // Review order survives grading
    let order: Vec<i64> = board.iter().map(|p| p.child_id).collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
}

#[test]
fn test_wizard_hides_covered_children() {
    let records = vec![
        create_test_record(1, 10, 40),
        create_test_record(2, 11, 55), // child 11 already has a live tutorship
        create_test_record(3, 11, 30),
        create_test_record(4, 12, 80),
    ];
    let covered: HashSet<i64> = [11].into_iter().collect();

    let wizard = wizard_rows(records, &covered);

    let child_ids: Vec<i64> = wizard.iter().map(|r| r.child_id).collect();
    assert_eq!(child_ids, vec![10, 12]);
}

#[test]
fn test_wizard_keeps_everything_when_nobody_is_covered() {
    let records = vec![create_test_record(1, 10, 40), create_test_record(2, 11, 55)];
    let covered = HashSet::new();

    let wizard = wizard_rows(records, &covered);
    assert_eq!(wizard.len(), 2);
}

#[test]
fn test_creation_to_deletion_walkthrough() {
    // A coordinator picks the pair; this is the child's first tutorship
    let ctx = CreationContext {
        child_id: 10,
        existing: None,
        child_has_live_tutorship: false,
        child_life_status: LifeStatus::InTreatment,
        tutor_status: TutorStatus::NoTutee,
        child_status: TutoringStatus::SeekingTutorHighPriority,
    };
    let plan = plan_creation(&ctx).unwrap();
    assert!(plan.advance_child);
    let snapshot_values = plan.snapshot.expect("first tutorship records a snapshot");

    // The creating role signed the first approval at insert time
    let tutorship = Tutorship {
        id: 501,
        child_id: 10,
        tutor_id: 20,
        activation: TutorshipActivation::PendingFirstApproval,
        approval_counter: 1,
        last_approver: vec![2],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    // The final approval waits for the confirmation task
    let open_task = Some(GatingTask { id: 900, status: TaskStatus::Open });
    assert!(apply_approval(&tutorship, 3, open_task).is_err());

    // Once the task is done the second role activates the tutorship
    let done_task = Some(GatingTask { id: 900, status: TaskStatus::Completed });
    let outcome = apply_approval(&tutorship, 3, done_task).unwrap();
    assert!(outcome.finalized);
    assert_eq!(outcome.activation, TutorshipActivation::Active);
    assert_eq!(outcome.last_approver, vec![2, 3]);

    // Deleting the last tutorship restores both parties from the snapshot
    let snapshot = PrevStatusSnapshot {
        id: 700,
        tutorship_id: Some(tutorship.id),
        child_id: 10,
        tutor_id: 20,
        prev_tutor_status: snapshot_values.prev_tutor_status,
        prev_child_status: snapshot_values.prev_child_status,
        created_at: Utc::now(),
    };
    let deletion = plan_deletion(Some(&snapshot), Some(&snapshot), 0);
    assert_eq!(deletion.tutor_status_after, TutorStatus::NoTutee);
    assert_eq!(deletion.child_status_after, Some(TutoringStatus::SeekingTutorHighPriority));
    assert!(deletion.purge_child_snapshots);
}
