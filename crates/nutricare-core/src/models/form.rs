//! Registration form input and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::patient::{Age, Sex};

/// Required form fields, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Weight,
    Height,
    Age,
    Sex,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Weight => "weight",
            FormField::Height => "height",
            FormField::Age => "age",
            FormField::Sex => "sex",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(FormField),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: FormField, value: String },

    #[error("{field} must be a positive number, got {value}")]
    OutOfRange { field: FormField, value: f64 },

    #[error("Unknown sex: {0:?}")]
    UnknownSex(String),
}

impl ValidationError {
    /// The field the error refers to.
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingField(field)
            | ValidationError::InvalidNumber { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
            ValidationError::UnknownSex(_) => FormField::Sex,
        }
    }
}

/// Raw registration form, exactly as typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientForm {
    pub name: String,
    /// Weight in kg
    pub weight: String,
    /// Height in m
    pub height: String,
    /// Age in years
    pub age: String,
    pub sex: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for PatientForm {
    /// A cleared form. Sex starts out as male.
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: String::new(),
            height: String::new(),
            age: String::new(),
            sex: Sex::Male.as_str().to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        }
    }
}

/// A form that passed validation, with typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
    pub age: Age,
    pub sex: Sex,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl PatientForm {
    /// Validate the form.
    ///
    /// Presence of every required field is checked before any of them is parsed.
    pub fn validate(&self) -> Result<ValidatedForm, ValidationError> {
        let required = [
            (FormField::Name, &self.name),
            (FormField::Weight, &self.weight),
            (FormField::Height, &self.height),
            (FormField::Age, &self.age),
            (FormField::Sex, &self.sex),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }

        let weight_kg = parse_positive(FormField::Weight, &self.weight)?;
        let height_m = parse_positive(FormField::Height, &self.height)?;
        let age = Age::parse(&self.age)?;
        let sex = Sex::parse(&self.sex)
            .ok_or_else(|| ValidationError::UnknownSex(self.sex.trim().to_string()))?;

        Ok(ValidatedForm {
            name: self.name.trim().to_string(),
            weight_kg,
            height_m,
            age,
            sex,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

/// Parse a decimal measurement. A decimal comma is accepted (`"1,70"`).
fn parse_positive(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })?;

    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(value)
}
