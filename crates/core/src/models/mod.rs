//! Wire models shared by the client and the player.
//!
//! Field names follow the backend JSON contract (snake_case).

pub mod analytics;
pub mod run;
pub mod template;
pub mod user;
pub mod wizard;
