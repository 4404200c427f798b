//! Patient models.

use serde::{Deserialize, Serialize};

use super::form::{PatientForm, ValidatedForm, ValidationError};
use crate::metrics::{compute_bmi, compute_ideal_weight, BmiClass, BmiResult};

/// Biological sex, used by the ideal weight formula.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    #[serde(alias = "masculino")]
    Male,
    #[serde(alias = "feminino")]
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parse a form value. Accepts English and Portuguese spellings, any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "masculino" => Some(Sex::Male),
            "female" | "f" | "feminino" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Age of a patient.
///
/// New registrations always carry whole years. Records written by older
/// clients may hold free text such as `"30 anos"`; numeric text is read as
/// years, anything else is kept verbatim rather than rejecting the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "AgeRepr", into = "AgeRepr")]
pub enum Age {
    Years(u32),
    Text(String),
}

impl Age {
    pub fn new(years: u32) -> Self {
        Age::Years(years)
    }

    /// Whole years, if known.
    pub fn years(&self) -> Option<u32> {
        match self {
            Age::Years(n) => Some(*n),
            Age::Text(_) => None,
        }
    }

    /// Parse a form value.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .map(Age::Years)
            .map_err(|_| ValidationError::InvalidNumber {
                field: super::FormField::Age,
                value: trimmed.to_string(),
            })
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Years(n) => write!(f, "{}", n),
            Age::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AgeRepr {
    Number(u32),
    Text(String),
}

impl From<AgeRepr> for Age {
    fn from(repr: AgeRepr) -> Self {
        match repr {
            AgeRepr::Number(n) => Age::Years(n),
            AgeRepr::Text(s) => Age::parse(&s).unwrap_or_else(|_| Age::Text(s.trim().to_string())),
        }
    }
}

impl From<Age> for AgeRepr {
    fn from(age: Age) -> Self {
        match age {
            Age::Years(n) => AgeRepr::Number(n),
            Age::Text(s) => AgeRepr::Text(s),
        }
    }
}

/// A registered patient.
///
/// Fields are private: the derived metrics (`bmi_value`, `bmi_classification`,
/// `ideal_weight_kg`) are only ever written together by [`PatientRecord::recompute`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Local UUID, fixed at creation
    id: String,
    name: String,
    weight_kg: f64,
    height_m: f64,
    age: Age,
    #[serde(default)]
    sex: Sex,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    address: String,
    bmi_value: f64,
    bmi_classification: BmiClass,
    ideal_weight_kg: f64,
    /// Creation timestamp
    #[serde(default)]
    created_at: String,
    /// Last update timestamp
    #[serde(default)]
    updated_at: String,
}

impl PatientRecord {
    /// Create a new record from a validated form, with a fresh ID.
    pub fn from_form(form: ValidatedForm) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let mut record = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            weight_kg: 0.0,
            height_m: 0.0,
            age: Age::Years(0),
            sex: Sex::Male,
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            bmi_value: 0.0,
            bmi_classification: BmiClass::Underweight,
            ideal_weight_kg: 0.0,
            created_at: now.clone(),
            updated_at: now,
        };
        record.assign(form);
        record
    }

    /// Replace every user-entered field, keeping `id` and `created_at`.
    pub fn apply_form(&mut self, form: ValidatedForm) {
        self.assign(form);
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    fn assign(&mut self, form: ValidatedForm) {
        self.name = form.name;
        self.weight_kg = form.weight_kg;
        self.height_m = form.height_m;
        self.age = form.age;
        self.sex = form.sex;
        self.phone = form.phone;
        self.email = form.email;
        self.address = form.address;
        self.recompute();
    }

    /// Recompute the derived metrics from weight, height and sex.
    pub fn recompute(&mut self) {
        let bmi = compute_bmi(self.weight_kg, self.height_m);
        self.bmi_value = bmi.value;
        self.bmi_classification = bmi.classification;
        self.ideal_weight_kg = compute_ideal_weight(self.height_m, self.sex);
    }

    /// Project back into form-prefill data for editing.
    pub fn to_form(&self) -> PatientForm {
        PatientForm {
            name: self.name.clone(),
            weight: self.weight_kg.to_string(),
            height: self.height_m.to_string(),
            age: self.age.to_string(),
            sex: self.sex.as_str().to_string(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }

    /// One-line summary for list rows, e.g. `"Ana, 34 anos, IMC 22.86 (Peso normal)"`.
    pub fn summary(&self) -> String {
        format!(
            "{}, {} anos, IMC {:.2} ({})",
            self.name,
            self.age,
            self.bmi_value,
            self.bmi_classification.label()
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn age(&self) -> &Age {
        &self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn bmi(&self) -> BmiResult {
        BmiResult {
            value: self.bmi_value,
            classification: self.bmi_classification,
        }
    }

    pub fn bmi_value(&self) -> f64 {
        self.bmi_value
    }

    pub fn bmi_classification(&self) -> BmiClass {
        self.bmi_classification
    }

    pub fn ideal_weight_kg(&self) -> f64 {
        self.ideal_weight_kg
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, weight: &str, height: &str, sex: &str) -> ValidatedForm {
        PatientForm {
            name: name.into(),
            weight: weight.into(),
            height: height.into(),
            age: "34".into(),
            sex: sex.into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_from_form() {
        let record = PatientRecord::from_form(form("Ana", "70", "1.75", "female"));
        assert_eq!(record.name(), "Ana");
        assert_eq!(record.id().len(), 36); // UUID format
        assert_eq!(record.bmi_value(), 22.86);
        assert_eq!(record.bmi_classification(), BmiClass::Normal);
        assert_eq!(record.ideal_weight_kg(), 62.5);
        assert_eq!(record.created_at(), record.updated_at());
    }

    #[test]
    fn test_apply_form_keeps_identity() {
        let mut record = PatientRecord::from_form(form("Ana", "70", "1.75", "female"));
        let id = record.id().to_string();
        let created = record.created_at().to_string();

        record.apply_form(form("Ana Paula", "90", "1.75", "female"));

        assert_eq!(record.id(), id);
        assert_eq!(record.created_at(), created);
        assert_eq!(record.name(), "Ana Paula");
        assert_eq!(record.bmi_value(), 29.39);
        assert_eq!(record.bmi_classification(), BmiClass::Overweight);
    }

    #[test]
    fn test_to_form_prefill() {
        let record = PatientRecord::from_form(form("Bruno", "82.5", "1.8", "m"));
        let prefill = record.to_form();
        assert_eq!(prefill.name, "Bruno");
        assert_eq!(prefill.weight, "82.5");
        assert_eq!(prefill.height, "1.8");
        assert_eq!(prefill.age, "34");
        assert_eq!(prefill.sex, "male");

        // Re-submitting the prefill reproduces the same measurements
        let again = PatientRecord::from_form(prefill.validate().unwrap());
        assert_eq!(again.bmi(), record.bmi());
        assert_ne!(again.id(), record.id());
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!(Sex::parse("Masculino"), Some(Sex::Male));
        assert_eq!(Sex::parse(" female "), Some(Sex::Female));
        assert_eq!(Sex::parse("F"), Some(Sex::Female));
        assert_eq!(Sex::parse("other"), None);
        assert_eq!(Sex::default(), Sex::Male);
    }

    #[test]
    fn test_age_accepts_string_or_number() {
        let from_num: Age = serde_json::from_str("34").unwrap();
        let from_text: Age = serde_json::from_str("\" 34 \"").unwrap();
        assert_eq!(from_num, Age::new(34));
        assert_eq!(from_text, Age::new(34));
        assert_eq!(serde_json::to_string(&Age::new(34)).unwrap(), "34");
    }

    #[test]
    fn test_age_keeps_free_text() {
        let age: Age = serde_json::from_str("\"30 anos\"").unwrap();
        assert_eq!(age, Age::Text("30 anos".into()));
        assert_eq!(age.years(), None);
        assert_eq!(age.to_string(), "30 anos");
        assert_eq!(serde_json::to_string(&age).unwrap(), "\"30 anos\"");

        // Form input is still held to whole years
        assert!(Age::parse("30 anos").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let record = PatientRecord::from_form(form("Ana", "70", "1.75", "female"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["weightKg"], 70.0);
        assert_eq!(json["heightM"], 1.75);
        assert_eq!(json["sex"], "female");
        assert_eq!(json["bmiClassification"], "normal");
        assert_eq!(json["idealWeightKg"], 62.5);
    }

    #[test]
    fn test_summary() {
        let record = PatientRecord::from_form(form("Ana", "70", "1.75", "female"));
        assert_eq!(record.summary(), "Ana, 34 anos, IMC 22.86 (Peso normal)");
    }
}
