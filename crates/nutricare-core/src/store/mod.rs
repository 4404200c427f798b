//! Patient store.
//!
//! Owns the in-memory patient collection and its durable copy. Every mutation
//! writes the whole collection back to the slot under [`PATIENTS_KEY`].

mod persistence;

pub use persistence::*;

use log::{info, warn};
use thiserror::Error;

use crate::db::KeyValueSlot;
use crate::models::{PatientForm, PatientRecord, ValidationError};

/// Slot key holding the serialized patient collection.
pub const PATIENTS_KEY: &str = "patients";

/// Persistence errors. Neither is fatal: reads fall back to an empty
/// collection, writes leave memory as the source of truth.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Could not load patients: {0}")]
    Read(String),

    #[error("Could not save patients: {0}")]
    Write(String),
}

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Patient not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a mutation that has been applied in memory.
///
/// `write_error` is set when the durable copy could not be updated; the
/// in-memory collection keeps the change regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub write_error: Option<PersistenceError>,
}

impl<T> Persisted<T> {
    /// Whether the durable copy matches memory after this mutation.
    pub fn is_durable(&self) -> bool {
        self.write_error.is_none()
    }
}

/// The patient collection and the slot it is persisted to.
pub struct PatientStore<S: KeyValueSlot> {
    slot: S,
    records: Vec<PatientRecord>,
    /// Outcome of the last load; `None` until the slot has been read
    last_load: Option<LoadOutcome>,
}

impl<S: KeyValueSlot> PatientStore<S> {
    /// Create an empty store. Nothing is read until [`PatientStore::load`]
    /// or the first mutation, whichever comes first.
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            records: Vec::new(),
            last_load: None,
        }
    }

    /// Create a store and load the persisted collection.
    pub fn open(slot: S) -> (Self, LoadOutcome) {
        let mut store = Self::new(slot);
        let outcome = store.load();
        (store, outcome)
    }

    /// The backing slot.
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// What the last load found, if the slot has been read.
    pub fn last_load(&self) -> Option<&LoadOutcome> {
        self.last_load.as_ref()
    }

    /// All patients, in insertion order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a new patient from a submitted form.
    ///
    /// On a validation error nothing is changed.
    pub fn add(&mut self, form: &PatientForm) -> StoreResult<Persisted<PatientRecord>> {
        self.ensure_loaded();
        let validated = form.validate().map_err(|e| {
            warn!("Rejected patient form: {}", e);
            e
        })?;

        let record = PatientRecord::from_form(validated);
        info!(
            "Registered patient {} (BMI {:.2}, {})",
            record.id(),
            record.bmi_value(),
            record.bmi_classification().as_str()
        );
        self.records.push(record.clone());

        Ok(Persisted {
            value: record,
            write_error: self.persist(),
        })
    }

    /// Replace an existing patient's data in place, keeping its ID.
    pub fn update(
        &mut self,
        id: &str,
        form: &PatientForm,
    ) -> StoreResult<Persisted<PatientRecord>> {
        self.ensure_loaded();
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let validated = form.validate().map_err(|e| {
            warn!("Rejected edit of patient {}: {}", id, e);
            e
        })?;

        let record = &mut self.records[index];
        record.apply_form(validated);
        let record = record.clone();
        info!("Updated patient {}", id);

        Ok(Persisted {
            value: record,
            write_error: self.persist(),
        })
    }

    /// Remove a patient. Returns whether a record was removed; the collection
    /// is written back either way.
    pub fn remove(&mut self, id: &str) -> Persisted<bool> {
        self.ensure_loaded();
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;
        if removed {
            info!("Removed patient {}", id);
        }

        Persisted {
            value: removed,
            write_error: self.persist(),
        }
    }

    /// Form prefill for editing `record`. Does not touch the collection.
    pub fn edit_initiate(&self, record: &PatientRecord) -> PatientForm {
        record.to_form()
    }

    /// Form prefill for the patient with `id`, if present.
    pub fn edit(&self, id: &str) -> Option<PatientForm> {
        self.get(id).map(|r| self.edit_initiate(r))
    }
}
