//! Answers files for non-interactive runs.
//!
//! A JSON object mapping option-set ids to values:
//!
//! ```json
//! {
//!   "4f6c3a1e-0000-4000-8000-000000000001": "red",
//!   "4f6c3a1e-0000-4000-8000-000000000002": ["wifi", "bluetooth"],
//!   "4f6c3a1e-0000-4000-8000-000000000003": 4
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use wizplat_core::models::wizard::Wizard;
use wizplat_core::responses::ResponseValue;
use wizplat_core::types::EntityId;
use wizplat_player::{PlayerError, RunController, RunStore};

pub type Answers = HashMap<EntityId, ResponseValue>;

pub fn parse_answers(raw: &str) -> Result<Answers, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn load_answers(path: &Path) -> anyhow::Result<Answers> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    parse_answers(&raw).with_context(|| format!("Invalid answers file {}", path.display()))
}

/// Split answers into those that belong to `wizard` and the unknown ids.
pub fn partition_answers(wizard: &Wizard, answers: Answers) -> (Answers, Vec<EntityId>) {
    let mut known = Answers::new();
    let mut unknown = Vec::new();
    for (id, value) in answers {
        if wizard.option_set(id).is_some() {
            known.insert(id, value);
        } else {
            unknown.push(id);
        }
    }
    (known, unknown)
}

/// Load the answers of `wizard` into the player. Unknown ids are logged and
/// ignored.
pub fn apply_answers<S: RunStore>(
    player: &mut RunController<S>,
    answers: Answers,
) -> Result<usize, PlayerError> {
    let (known, unknown) = partition_answers(player.wizard(), answers);
    for id in &unknown {
        tracing::warn!(option_set_id = %id, "Answer for unknown option set ignored");
    }
    let count = known.len();
    for (id, value) in known {
        player.set_response(id, value)?;
    }
    Ok(count)
}
