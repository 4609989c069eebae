//! E2E test suite entry point.

#[path = "../common/mod.rs"]
mod common;
mod evaluate_workflow;
mod fixture;
mod inspect_workflow;
