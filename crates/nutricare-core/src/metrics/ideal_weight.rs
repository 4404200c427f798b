//! Ideal weight estimate.

use super::round2;
use crate::models::Sex;

/// Estimate ideal weight (kg) from height (m) and sex.
///
/// `(cm - 100) - (cm - 150) / k`, with `k = 4` for men and `k = 2` for women.
/// Implausible heights are not rejected.
pub fn compute_ideal_weight(height_m: f64, sex: Sex) -> f64 {
    let height_cm = height_m * 100.0;
    let divisor = match sex {
        Sex::Male => 4.0,
        Sex::Female => 2.0,
    };
    round2((height_cm - 100.0) - ((height_cm - 150.0) / divisor))
}
