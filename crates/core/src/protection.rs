//! Wizard lifecycle protection.
//!
//! A wizard that has never been run can be edited freely. Once it has runs
//! edits are allowed with a warning, and once any run is stored the wizard
//! becomes read-only so stored answers keep matching their structure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionState {
    Draft,
    InUse,
    Published,
}

/// Derived edit/delete permissions of a wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionStatus {
    pub state: ProtectionState,
    pub can_edit: bool,
    pub can_delete: bool,
    pub total_runs: u64,
    pub stored_runs: u64,
    pub in_progress_runs: u64,
    pub completed_runs: u64,
    pub message: String,
    pub actions: Vec<String>,
}

impl ProtectionStatus {
    pub fn from_counts(
        total_runs: u64,
        stored_runs: u64,
        in_progress_runs: u64,
        completed_runs: u64,
    ) -> Self {
        let (state, can_edit, can_delete, message, actions): (_, _, _, String, &[&str]) =
            if total_runs == 0 {
                (
                    ProtectionState::Draft,
                    true,
                    true,
                    "This wizard has never been run. All modifications and deletions are allowed."
                        .into(),
                    &["edit", "delete", "publish", "test"][..],
                )
            } else if stored_runs > 0 {
                (
                    ProtectionState::Published,
                    false,
                    false,
                    format!(
                        "This wizard has {stored_runs} stored run(s) and is read-only to protect \
                         user data. You can create a clone or new version to make changes."
                    ),
                    &["view", "clone", "create_version", "archive", "export"][..],
                )
            } else {
                (
                    ProtectionState::InUse,
                    true,
                    true,
                    format!(
                        "This wizard has {total_runs} active run(s) but no stored data. \
                         Modifications will affect existing runs."
                    ),
                    &["edit_with_warning", "delete_with_warning", "clone", "view"][..],
                )
            };

        Self {
            state,
            can_edit,
            can_delete,
            total_runs,
            stored_runs,
            in_progress_runs,
            completed_runs,
            message,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Whether edits should be confirmed by the user first.
    pub fn requires_warning(&self) -> bool {
        self.state == ProtectionState::InUse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_run_is_draft() {
        let status = ProtectionStatus::from_counts(0, 0, 0, 0);
        assert_eq!(status.state, ProtectionState::Draft);
        assert!(status.can_edit && status.can_delete);
        assert!(!status.requires_warning());
    }

    #[test]
    fn stored_runs_make_it_read_only() {
        let status = ProtectionStatus::from_counts(5, 1, 2, 3);
        assert_eq!(status.state, ProtectionState::Published);
        assert!(!status.can_edit);
        assert!(!status.can_delete);
        assert!(status.actions.iter().any(|a| a == "clone"));
    }

    #[test]
    fn runs_without_storage_warn() {
        let status = ProtectionStatus::from_counts(3, 0, 3, 0);
        assert_eq!(status.state, ProtectionState::InUse);
        assert!(status.can_edit);
        assert!(status.requires_warning());
    }
}
