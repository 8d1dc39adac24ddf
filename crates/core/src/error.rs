/// Errors from the domain rules in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A user-supplied value breaks a rule. The message is shown as is.
    #[error("{0}")]
    Validation(String),

    /// A user-supplied value collides with existing data.
    #[error("{0}")]
    Conflict(String),
}
