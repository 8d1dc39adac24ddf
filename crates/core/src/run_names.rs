//! Naming rules for stored runs.
//!
//! Names are unique per user, compared trimmed and case-insensitively. The
//! check runs client-side against the user's run list; the backend is not
//! assumed to enforce it.

use crate::error::CoreError;
use crate::models::run::WizardRun;
use crate::types::EntityId;

/// Longest accepted run name, in characters.
pub const MAX_RUN_NAME_LEN: usize = 255;

/// Comparison key for a run name.
pub fn normalize_run_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim and check a user-entered name.
pub fn validate_run_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Run name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_RUN_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Run name must be at most {MAX_RUN_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Find an existing run, other than `exclude`, whose name collides with
/// `candidate`.
pub fn find_duplicate<'a>(
    candidate: &str,
    existing: &'a [WizardRun],
    exclude: Option<EntityId>,
) -> Option<&'a WizardRun> {
    let key = normalize_run_name(candidate);
    existing.iter().find(|run| {
        Some(run.id) != exclude
            && run
                .run_name
                .as_deref()
                .is_some_and(|name| normalize_run_name(name) == key)
    })
}

/// Validate `candidate` and reject it when it collides with an existing run.
pub fn check_run_name(
    candidate: &str,
    existing: &[WizardRun],
    exclude: Option<EntityId>,
) -> Result<String, CoreError> {
    let name = validate_run_name(candidate)?;
    if let Some(dup) = find_duplicate(&name, existing, exclude) {
        return Err(CoreError::Conflict(format!(
            "A run named '{}' already exists",
            dup.run_name.as_deref().unwrap_or(&name)
        )));
    }
    Ok(name)
}
