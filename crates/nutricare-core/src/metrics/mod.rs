//! Metrics calculator.
//!
//! Pure functions mapping raw measurements to derived body metrics. Nothing
//! here validates its inputs: the store validates forms before calling in.

mod bmi;
mod ideal_weight;

pub use bmi::*;
pub use ideal_weight::*;

/// Round to two decimal places, the precision every derived metric is stored at.
///
/// Ties round half away from zero on the binary value. A formatter such as
/// JavaScript's `toFixed(2)` can land on the other side for a few inputs whose
/// binary form sits exactly at or just off a half cent.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
