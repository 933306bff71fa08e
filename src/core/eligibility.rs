use crate::models::{Child, Gender, LifeStatus, MatchRecord, Tutor};
use std::collections::HashSet;

/// Life statuses that exclude a child from candidate generation and from
/// manual tutorship creation. Applied identically on both paths.
pub const EXCLUDED_LIFE_STATUSES: [LifeStatus; 2] = [LifeStatus::Healthy, LifeStatus::Deceased];

/// Check whether a child's life status allows matching
#[inline]
pub fn child_matchable(life_status: LifeStatus) -> bool {
    !EXCLUDED_LIFE_STATUSES.contains(&life_status)
}

/// Excluded statuses as their stored text values, for array binds in SQL.
pub fn excluded_life_status_values() -> Vec<String> {
    EXCLUDED_LIFE_STATUSES.iter().map(|s| s.as_str().to_string()).collect()
}

/// Matching never crosses genders
#[inline]
pub fn genders_match(child: Gender, tutor: Gender) -> bool {
    child == tutor
}

/// Structural eligibility of a (child, tutor) pairing, mirroring the candidate
/// fetch query: same gender, active owning staff, no tutorship row in any
/// state between the two, and a matchable child.
#[inline]
pub fn pair_eligible(
    child: &Child,
    tutor: &Tutor,
    tutor_staff_active: bool,
    has_existing_tutorship: bool,
) -> bool {
    if !tutor_staff_active || has_existing_tutorship {
        return false;
    }
    if !genders_match(child.gender, tutor.gender) {
        return false;
    }
    child_matchable(child.life_status)
}

/// Wizard view rule: hide candidates whose child is already covered by a
/// pending or active tutorship. The report view keeps them.
pub fn wizard_rows(records: Vec<MatchRecord>, covered_children: &HashSet<i64>) -> Vec<MatchRecord> {
    records
        .into_iter()
        .filter(|record| !covered_children.contains(&record.child_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TutorStatus, TutoringStatus};
    use chrono::{NaiveDate, Utc};

    fn create_test_child(gender: Gender, life_status: LifeStatus) -> Child {
        Child {
            id: 1,
            full_name: "Test Child".to_string(),
            city: "Haifa".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2014, 3, 9).unwrap(),
            age: 12,
            gender,
            life_status,
            tutoring_status: TutoringStatus::SeekingTutor,
            wellness_note: None,
            family_status: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_test_tutor(gender: Gender) -> Tutor {
        Tutor {
            id: 7,
            staff_id: 3,
            full_name: "Test Tutor".to_string(),
            city: "Tel Aviv".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2001, 6, 21).unwrap(),
            age: 25,
            gender,
            tutorship_status: TutorStatus::NoTutee,
            tutee_wellness_note: None,
            tutee_family_status: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_eligible_pair() {
        let child = create_test_child(Gender::Female, LifeStatus::InTreatment);
        let tutor = create_test_tutor(Gender::Female);

        assert!(pair_eligible(&child, &tutor, true, false));
    }

    #[test]
    fn test_gender_mismatch_filtered() {
        let child = create_test_child(Gender::Female, LifeStatus::InTreatment);
        let tutor = create_test_tutor(Gender::Male);

        assert!(!pair_eligible(&child, &tutor, true, false));
    }

    #[test]
    fn test_excluded_life_statuses_filtered() {
        let tutor = create_test_tutor(Gender::Male);
        for status in [LifeStatus::Healthy, LifeStatus::Deceased] {
            let child = create_test_child(Gender::Male, status);
            assert!(!pair_eligible(&child, &tutor, true, false), "{:?} must be excluded", status);
            assert!(!child_matchable(status));
        }
        assert!(child_matchable(LifeStatus::InTreatment));
    }

    #[test]
    fn test_inactive_staff_filtered() {
        let child = create_test_child(Gender::Male, LifeStatus::InTreatment);
        let tutor = create_test_tutor(Gender::Male);

        assert!(!pair_eligible(&child, &tutor, false, false));
    }

    #[test]
    fn test_existing_relationship_filtered() {
        let child = create_test_child(Gender::Male, LifeStatus::InTreatment);
        let tutor = create_test_tutor(Gender::Male);

        assert!(!pair_eligible(&child, &tutor, true, true));
    }

    #[test]
    fn test_excluded_values_match_stored_text() {
        let values = excluded_life_status_values();
        assert_eq!(values, vec!["healthy".to_string(), "deceased".to_string()]);
    }
}
