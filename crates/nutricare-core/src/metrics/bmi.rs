//! Body Mass Index.

use serde::{Deserialize, Serialize};

use super::round2;

/// BMI band, ordered from lightest to heaviest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiClass {
    /// Classify an unrounded BMI value.
    ///
    /// The normal band closes at 24.9, so values in `[24.9, 25)` are overweight.
    pub fn classify(value: f64) -> Self {
        if value < 18.5 {
            BmiClass::Underweight
        } else if value < 24.9 {
            BmiClass::Normal
        } else if value < 29.9 {
            BmiClass::Overweight
        } else {
            BmiClass::Obese
        }
    }

    /// Stable lowercase name (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiClass::Underweight => "underweight",
            BmiClass::Normal => "normal",
            BmiClass::Overweight => "overweight",
            BmiClass::Obese => "obese",
        }
    }

    /// Label shown to clinic staff.
    pub fn label(&self) -> &'static str {
        match self {
            BmiClass::Underweight => "Abaixo do peso",
            BmiClass::Normal => "Peso normal",
            BmiClass::Overweight => "Sobrepeso",
            BmiClass::Obese => "Obesidade",
        }
    }
}

/// Result of a BMI computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BmiResult {
    /// BMI rounded to two decimals
    pub value: f64,
    /// Band of the unrounded value
    pub classification: BmiClass,
}

/// Compute BMI from weight (kg) and height (m).
///
/// `height_m` must be non-zero; a zero height yields an infinite or NaN value.
pub fn compute_bmi(weight_kg: f64, height_m: f64) -> BmiResult {
    let raw = weight_kg / (height_m * height_m);
    BmiResult {
        value: round2(raw),
        classification: BmiClass::classify(raw),
    }
}
