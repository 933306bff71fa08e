// Core algorithm exports
pub mod distance;
pub mod eligibility;
pub mod grader;
pub mod transitions;

pub use distance::{city_distance_km, haversine_distance};
pub use eligibility::{child_matchable, genders_match, pair_eligible, wizard_rows};
pub use grader::{grade_candidate, grade_in_place};
pub use transitions::{apply_approval, plan_creation, plan_deletion};
