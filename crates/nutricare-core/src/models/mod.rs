//! Domain models for the nutricare system.

mod form;
mod patient;

pub use form::*;
pub use patient::*;
