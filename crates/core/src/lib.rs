//! Domain types and pure logic for the wizard platform.
//!
//! Nothing in this crate performs I/O. The REST client lives in
//! `wizplat-client` and the run lifecycle in `wizplat-player`; both build on
//! the model types, the dependency evaluator, and the response store defined
//! here.

pub mod dependency;
pub mod error;
pub mod models;
pub mod navigation;
pub mod protection;
pub mod responses;
pub mod run_names;
pub mod step_validation;
pub mod types;
