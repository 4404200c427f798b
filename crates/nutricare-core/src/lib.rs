//! NutriCare Core Library
//!
//! Local-first patient registry for a nutrition clinic: body metrics from
//! entered measurements, and a patient list persisted on the device.
//!
//! # Architecture
//!
//! ```text
//!     Mobile UI (Swift/Kotlin via UniFFI)
//!                    │
//!              PatientForm (raw strings)
//!                    │
//!     ┌──────────────▼──────────────┐
//!     │        PatientStore         │
//!     │  validate → metrics → push  │──── Metrics Calculator
//!     └──────────────┬──────────────┘     (BMI, ideal weight)
//!                    │ whole collection as JSON
//!                    ▼
//!          KeyValueSlot ("patients")
//!                    │
//!               SQLite kv_store
//! ```
//!
//! # Modules
//!
//! - [`metrics`]: BMI and ideal weight calculator
//! - [`models`]: Domain types (PatientRecord, PatientForm, Sex, Age)
//! - [`db`]: SQLite-backed key-value slot
//! - [`store`]: Patient store (load/save/add/update/remove)

pub mod db;
pub mod metrics;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::{Database, KeyValueSlot, MemorySlot};
pub use metrics::{compute_bmi, compute_ideal_weight, BmiClass, BmiResult};
pub use models::{Age, FormField, PatientForm, PatientRecord, Sex, ValidationError};
pub use store::{LoadOutcome, PatientStore, Persisted, PersistenceError, StoreError, PATIENTS_KEY};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum NutriCareError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Load error: {0}")]
    PersistenceReadError(String),

    #[error("Save error: {0}")]
    PersistenceWriteError(String),
}

impl From<db::DbError> for NutriCareError {
    fn from(e: db::DbError) -> Self {
        NutriCareError::DatabaseError(e.to_string())
    }
}

impl From<ValidationError> for NutriCareError {
    fn from(e: ValidationError) -> Self {
        NutriCareError::InvalidInput(e.to_string())
    }
}

impl From<PersistenceError> for NutriCareError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::Read(msg) => NutriCareError::PersistenceReadError(msg),
            PersistenceError::Write(msg) => NutriCareError::PersistenceWriteError(msg),
        }
    }
}

impl From<StoreError> for NutriCareError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(e) => e.into(),
            StoreError::Persistence(e) => e.into(),
            StoreError::NotFound(id) => NutriCareError::NotFound(id),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for NutriCareError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        NutriCareError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a patient store backed by the database at the given path.
///
/// The stored patient list is read before this returns; a recovered read
/// is reported by `last_load_report`.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<NutriCareCore>, NutriCareError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(NutriCareCore::new(db)))
}

/// Create a store on an in-memory database (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<NutriCareCore>, NutriCareError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(NutriCareCore::new(db)))
}

/// Compute BMI from weight (kg) and height (m).
#[uniffi::export]
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> Result<FfiBmiResult, NutriCareError> {
    if height_m == 0.0 {
        return Err(NutriCareError::InvalidInput("height must be non-zero".into()));
    }
    Ok(compute_bmi(weight_kg, height_m).into())
}

/// Compute the ideal weight (kg) for a height (m) and sex.
#[uniffi::export]
pub fn calculate_ideal_weight(height_m: f64, sex: String) -> Result<f64, NutriCareError> {
    let sex = Sex::parse(&sex).ok_or(ValidationError::UnknownSex(sex))?;
    Ok(compute_ideal_weight(height_m, sex))
}

/// An empty registration form.
#[uniffi::export]
pub fn blank_form() -> FfiPatientForm {
    PatientForm::default().into()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe patient store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct NutriCareCore {
    store: Arc<Mutex<PatientStore<Database>>>,
}

impl NutriCareCore {
    fn new(db: Database) -> Self {
        let (store, _) = PatientStore::open(db);
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

fn load_report(store: &PatientStore<Database>, outcome: Option<&LoadOutcome>) -> FfiLoadReport {
    FfiLoadReport {
        count: store.len() as u32,
        warning: outcome.and_then(|o| o.warning()).map(|e| e.to_string()),
    }
}

#[uniffi::export]
impl NutriCareCore {
    // =========================================================================
    // Persistence
    // =========================================================================

    /// Reload the persisted patient list, replacing what is in memory.
    ///
    /// A corrupt list is reported through `warning`, not as an error.
    pub fn load_patients(&self) -> Result<FfiLoadReport, NutriCareError> {
        let mut store = self.store.lock()?;
        let outcome = store.load();
        Ok(load_report(&store, Some(&outcome)))
    }

    /// Result of the load done when the store was opened (or the latest reload).
    pub fn last_load_report(&self) -> Result<FfiLoadReport, NutriCareError> {
        let store = self.store.lock()?;
        Ok(load_report(&store, store.last_load()))
    }

    /// Write the in-memory list to disk.
    pub fn save_patients(&self) -> Result<(), NutriCareError> {
        let store = self.store.lock()?;
        store.save()?;
        Ok(())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// All patients, in registration order.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, NutriCareError> {
        let store = self.store.lock()?;
        Ok(store.records().iter().map(FfiPatient::from).collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, NutriCareError> {
        let store = self.store.lock()?;
        Ok(store.get(&id).map(FfiPatient::from))
    }

    /// Register a new patient.
    pub fn add_patient(&self, form: FfiPatientForm) -> Result<FfiMutation, NutriCareError> {
        let mut store = self.store.lock()?;
        let persisted = store.add(&form.into())?;
        Ok(persisted.into())
    }

    /// Replace an existing patient's data, keeping its ID.
    pub fn update_patient(
        &self,
        id: String,
        form: FfiPatientForm,
    ) -> Result<FfiMutation, NutriCareError> {
        let mut store = self.store.lock()?;
        let persisted = store.update(&id, &form.into())?;
        Ok(persisted.into())
    }

    /// Delete a patient.
    pub fn remove_patient(&self, id: String) -> Result<FfiRemoval, NutriCareError> {
        let mut store = self.store.lock()?;
        let persisted = store.remove(&id);
        Ok(FfiRemoval {
            removed: persisted.value,
            warning: persisted.write_error.map(|e| e.to_string()),
        })
    }

    /// Form prefill for editing a patient.
    pub fn edit_patient(&self, id: String) -> Result<Option<FfiPatientForm>, NutriCareError> {
        let store = self.store.lock()?;
        Ok(store.edit(&id).map(Into::into))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
    /// Age as entered
    pub age: String,
    /// Age in whole years, when the stored age is a number
    pub age_years: Option<u32>,
    pub sex: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub bmi_value: f64,
    pub bmi_classification: String,
    pub bmi_label: String,
    pub ideal_weight_kg: f64,
    pub summary: String,
}

impl From<&PatientRecord> for FfiPatient {
    fn from(record: &PatientRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            weight_kg: record.weight_kg(),
            height_m: record.height_m(),
            age: record.age().to_string(),
            age_years: record.age().years(),
            sex: record.sex().as_str().to_string(),
            phone: record.phone().to_string(),
            email: record.email().to_string(),
            address: record.address().to_string(),
            bmi_value: record.bmi_value(),
            bmi_classification: record.bmi_classification().as_str().to_string(),
            bmi_label: record.bmi_classification().label().to_string(),
            ideal_weight_kg: record.ideal_weight_kg(),
            summary: record.summary(),
        }
    }
}

/// FFI-safe registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientForm {
    pub name: String,
    pub weight: String,
    pub height: String,
    pub age: String,
    pub sex: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl From<FfiPatientForm> for PatientForm {
    fn from(form: FfiPatientForm) -> Self {
        PatientForm {
            name: form.name,
            weight: form.weight,
            height: form.height,
            age: form.age,
            sex: form.sex,
            phone: form.phone,
            email: form.email,
            address: form.address,
        }
    }
}

impl From<PatientForm> for FfiPatientForm {
    fn from(form: PatientForm) -> Self {
        Self {
            name: form.name,
            weight: form.weight,
            height: form.height,
            age: form.age,
            sex: form.sex,
            phone: form.phone,
            email: form.email,
            address: form.address,
        }
    }
}

/// FFI-safe BMI result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBmiResult {
    pub value: f64,
    pub classification: String,
    pub label: String,
}

impl From<BmiResult> for FfiBmiResult {
    fn from(bmi: BmiResult) -> Self {
        Self {
            value: bmi.value,
            classification: bmi.classification.as_str().to_string(),
            label: bmi.classification.label().to_string(),
        }
    }
}

/// FFI-safe load report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLoadReport {
    pub count: u32,
    /// Set when the stored list could not be read and an empty list is used
    pub warning: Option<String>,
}

/// FFI-safe result of an add or update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMutation {
    pub patient: FfiPatient,
    /// Set when the change is in memory but could not be saved
    pub warning: Option<String>,
}

impl From<Persisted<PatientRecord>> for FfiMutation {
    fn from(persisted: Persisted<PatientRecord>) -> Self {
        Self {
            patient: FfiPatient::from(&persisted.value),
            warning: persisted.write_error.map(|e| e.to_string()),
        }
    }
}

/// FFI-safe result of a removal.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRemoval {
    pub removed: bool,
    /// Set when the removal could not be saved
    pub warning: Option<String>,
}
