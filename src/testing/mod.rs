//! Testability harness utilities.
//!
//! Deterministic trace generation shared by unit tests, integration tests and
//! the fixture replay harness, so grading can be exercised without pedals.

pub mod synthetic;

pub use synthetic::{JitterSpec, SyntheticRep, SyntheticTrace, TraceBuilder};
