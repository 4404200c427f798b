//! Loading and saving the patient collection.

use std::collections::HashSet;

use log::{info, warn};

use super::{PatientStore, PersistenceError, PATIENTS_KEY};
use crate::db::KeyValueSlot;
use crate::models::PatientRecord;

/// What [`PatientStore::load`] found in the slot.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Empty,
    /// Stored collection loaded
    Loaded { count: usize },
    /// Slot unreadable or payload corrupt; continuing with an empty collection
    Recovered { error: PersistenceError },
}

impl LoadOutcome {
    /// The error to show the user, if loading had to recover.
    pub fn warning(&self) -> Option<&PersistenceError> {
        match self {
            LoadOutcome::Recovered { error } => Some(error),
            _ => None,
        }
    }
}

impl<S: KeyValueSlot> PatientStore<S> {
    /// Replace the in-memory collection with the persisted one.
    ///
    /// Never fails: an unreadable or corrupt slot leaves the collection empty
    /// and is reported as [`LoadOutcome::Recovered`].
    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match self.read_records() {
            Ok(None) => {
                self.records.clear();
                LoadOutcome::Empty
            }
            Ok(Some(records)) => {
                let count = records.len();
                self.records = records;
                LoadOutcome::Loaded { count }
            }
            Err(error) => {
                warn!("{}; starting with an empty patient list", error);
                self.records.clear();
                LoadOutcome::Recovered { error }
            }
        };
        info!("Patient list ready: {} record(s)", self.records.len());
        self.last_load = Some(outcome.clone());
        outcome
    }

    /// Load once before the first mutation, so a save never replaces a
    /// stored list that was never read.
    pub(super) fn ensure_loaded(&mut self) {
        if self.last_load.is_none() {
            self.load();
        }
    }

    /// Write the whole collection to the slot, replacing the prior value.
    ///
    /// On failure the in-memory collection is kept as is.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(&self.records)
            .map_err(|e| PersistenceError::Write(e.to_string()))?;
        self.slot
            .set(PATIENTS_KEY, &payload)
            .map_err(|e| PersistenceError::Write(e.to_string()))
    }

    /// Save after a mutation, logging instead of propagating a failure.
    pub(super) fn persist(&self) -> Option<PersistenceError> {
        match self.save() {
            Ok(()) => None,
            Err(error) => {
                warn!("{}; keeping in-memory changes", error);
                Some(error)
            }
        }
    }

    fn read_records(&self) -> Result<Option<Vec<PatientRecord>>, PersistenceError> {
        let payload = self
            .slot
            .get(PATIENTS_KEY)
            .map_err(|e| PersistenceError::Read(e.to_string()))?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        let parsed: Vec<PatientRecord> =
            serde_json::from_str(&payload).map_err(|e| PersistenceError::Read(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(parsed.len());
        for mut record in parsed {
            if !seen.insert(record.id().to_string()) {
                warn!("Dropping duplicate patient id {}", record.id());
                continue;
            }
            record.recompute();
            records.push(record);
        }
        Ok(Some(records))
    }
}
