//! Wizard run player.
//!
//! [`RunController`] drives one run of a wizard through its lifecycle:
//! eager creation, step navigation with validation, completion, and the
//! save decision at the end. Persistence goes through the [`RunStore`]
//! trait, implemented for [`wizplat_client::ApiClient`].

pub mod controller;
pub mod error;
pub mod save;
pub mod store;

pub use controller::{AdvanceOutcome, NavigationContext, RunController, RunPhase, SavePrompt};
pub use error::{PlayerError, SaveError};
pub use save::{flush_responses, FlushReport, SaveOutcome};
pub use store::RunStore;
