//! REST client for the wizard platform backend.
//!
//! [`ApiClient`] wraps every backend endpoint the player and the CLI need
//! using [`reqwest`]. Authentication state lives in an explicit
//! [`AuthSession`] handle passed in at construction, so token lifecycle is
//! visible to (and testable by) the caller.

pub mod analytics;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod runs;
pub mod session;
pub mod templates;
pub mod users;
pub mod wizards;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use session::AuthSession;
