//! Service layer for LexiCompare business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services report progress through event channels so any interface can
//! drive its own display.

pub mod comparison;

pub use comparison::{
    CancelFlag, ComparisonError, ComparisonEvent, ComparisonService, DEFAULT_WORKERS,
};
