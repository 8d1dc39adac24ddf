use wizplat_client::{ApiError, ErrorKind};
use wizplat_core::error::CoreError;
use wizplat_core::types::EntityId;

/// Errors from run navigation and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Wizard {0} has no steps")]
    EmptyWizard(EntityId),

    #[error("Run {run_id} belongs to wizard {actual}, not {expected}")]
    WizardMismatch {
        run_id: EntityId,
        expected: EntityId,
        actual: EntityId,
    },

    /// Mutation attempted in view-only mode or on an abandoned run.
    #[error("This run is read-only")]
    ReadOnly,

    #[error("Step {0} cannot be skipped")]
    NotSkippable(usize),

    /// A save operation was called without the matching end-of-wizard
    /// prompt being shown.
    #[error("No save decision is pending")]
    NoPendingDecision,

    #[error("The run has not been created yet")]
    NotStarted,
}

/// Errors from the save reconciliation flow.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    DuplicateName(String),

    /// The user's existing runs could not be fetched, so uniqueness could not
    /// be checked. Nothing was written.
    #[error("Could not check existing run names: {message}")]
    LookupFailed { kind: ErrorKind, message: String },

    /// The flush stopped part-way. `written` lists the rows created in
    /// `run_id` before the failure; they are left in place.
    #[error("Saving run {run_id} stopped after {} rows were written: {source}", .written.len())]
    PartialFlush {
        run_id: EntityId,
        written: Vec<EntityId>,
        source: ApiError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

impl From<CoreError> for SaveError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Conflict(msg) => Self::DuplicateName(msg),
            CoreError::Validation(msg) => Self::InvalidName(msg),
        }
    }
}

impl SaveError {
    /// Message suitable for showing next to the save form.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidName(msg) | Self::DuplicateName(msg) => msg.clone(),
            Self::LookupFailed { message, .. } => message.clone(),
            Self::PartialFlush { .. } => {
                "Some answers could not be saved. Please try saving again.".to_string()
            }
            Self::Api(e) => e.user_message(),
            Self::Player(e) => e.to_string(),
        }
    }
}
