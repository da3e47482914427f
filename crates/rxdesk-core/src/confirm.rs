// ── Confirmation gate ──
//
// Destructive row actions ask the user before touching the backend.
// Delete asks twice; status changes ask once.

use rxdesk_api::RecordId;

/// A question put to the user before a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// First delete prompt.
    Delete { entity: &'static str, id: RecordId },
    /// Second delete prompt: the action cannot be undone.
    Irreversible { entity: &'static str, id: RecordId },
    StatusChange {
        entity: &'static str,
        id: RecordId,
        status: String,
    },
}

impl Confirmation {
    pub fn message(&self) -> String {
        match self {
            Self::Delete { entity, id } => format!("Delete {entity} {id}?"),
            Self::Irreversible { entity, id } => {
                format!("This permanently removes {entity} {id}. Continue?")
            }
            Self::StatusChange { entity, id, status } => {
                format!("Change status of {entity} {id} to {status}?")
            }
        }
    }
}

/// Answers confirmation prompts. The CLI backs this with a terminal
/// prompt (or `--yes`); tests script the answers.
pub trait ConfirmGate: Sync {
    fn confirm(&self, prompt: &Confirmation) -> bool;
}

/// Accepts every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &Confirmation) -> bool {
        true
    }
}

impl<F> ConfirmGate for F
where
    F: Fn(&Confirmation) -> bool + Sync,
{
    fn confirm(&self, prompt: &Confirmation) -> bool {
        self(prompt)
    }
}
