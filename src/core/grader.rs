use crate::models::CandidatePair;

/// Distance beyond which a pairing is graded down to the floor outright.
const FAR_DISTANCE_KM: i32 = 50;

/// Lowest grade a candidate can carry.
pub const MIN_GRADE: i16 = -5;
/// Highest grade a candidate can carry.
pub const MAX_GRADE: i16 = 100;

/// Grade every candidate in place, preserving list order.
///
/// Grading formula per candidate at position `index` of `total`:
///     base  = index / (total - 1) * 100        # single candidate = 100
///     score = base + age_bonus + distance_bonus
///     a distance above 50 km overrides the score to exactly -5
///     grade = ceil(clamp(score, -5, 100))
///
/// The base score is positional on purpose: the fetch order is the review
/// order, and later rows get the benefit of the doubt.
pub fn grade_in_place(pairs: &mut [CandidatePair]) {
    let total = pairs.len();
    for (index, pair) in pairs.iter_mut().enumerate() {
        let age_gap = (pair.tutor_age - pair.child_age).abs();
        pair.grade = grade_candidate(index, total, age_gap, pair.distance_km);
    }
}

/// Grade a single candidate from its position and attributes
pub fn grade_candidate(index: usize, total: usize, age_gap: i16, distance_km: i32) -> i16 {
    let score = base_score(index, total) + age_bonus(age_gap);
    finalize(with_distance(score, distance_km))
}

/// Positional base score (0-100), evenly spread over the candidate list
#[inline]
pub fn base_score(index: usize, total: usize) -> f64 {
    if total <= 1 {
        100.0
    } else {
        index as f64 / (total - 1) as f64 * 100.0
    }
}

/// Bonus for a small tutor-child age gap
#[inline]
pub fn age_bonus(age_gap: i16) -> f64 {
    match age_gap {
        g if g < 5 => 20.0,
        g if g < 10 => 10.0,
        g if g < 15 => 5.0,
        _ => 0.0,
    }
}

/// Apply the distance rule. Between 30 and 50 km the score is untouched;
/// above 50 km the score is replaced by the floor, not adjusted.
#[inline]
pub fn with_distance(score: f64, distance_km: i32) -> f64 {
    if distance_km > FAR_DISTANCE_KM {
        return MIN_GRADE as f64;
    }
    score
        + match distance_km {
            d if d < 10 => 20.0,
            d if d < 20 => 10.0,
            d if d < 30 => 5.0,
            _ => 0.0,
        }
}

/// Clamp to the grade range and round up to a whole grade
#[inline]
pub fn finalize(score: f64) -> i16 {
    score.clamp(MIN_GRADE as f64, MAX_GRADE as f64).ceil() as i16
}
