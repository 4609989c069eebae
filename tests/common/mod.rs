//! Common test utilities shared across integration tests.

pub mod datasets;

pub use datasets::*;
