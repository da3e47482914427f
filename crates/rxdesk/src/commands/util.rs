//! Shared helpers for command handlers.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use rxdesk_core::{ConfirmGate, Confirmation, Entity, FilterState, FilterValue};

use crate::error::CliError;

/// Terminal confirmation prompts, auto-approved by `--yes`.
///
/// A prompt that cannot be shown (no TTY) counts as "no".
pub struct TerminalGate {
    pub assume_yes: bool,
}

impl ConfirmGate for TerminalGate {
    fn confirm(&self, prompt: &Confirmation) -> bool {
        if self.assume_yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt.message())
            .default(false)
            .interact()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "confirmation prompt unavailable");
                false
            })
    }
}

/// Spinner on stderr while a request is in flight. Hidden under `--quiet`
/// and when stderr is not a terminal.
pub fn spinner(message: impl Into<String>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// CLI subcommand that lists `entity` (`discounts`, `day-close`).
pub fn command_name(entity: Entity) -> &'static str {
    match entity {
        Entity::DayCloses => "day-close",
        other => other.into(),
    }
}

/// Parse `--filter FIELD=VALUE` pairs against the entity's filter set.
pub fn parse_filters(entity: Entity, pairs: &[(String, String)]) -> Result<FilterState, CliError> {
    let mut state = FilterState::new();
    for (key, raw) in pairs {
        let Some(field) = entity.filter(key) else {
            let known: Vec<_> = entity.filters().iter().map(|f| f.key).collect();
            return Err(CliError::Validation {
                field: key.clone(),
                reason: if known.is_empty() {
                    format!("{} cannot be filtered", entity.title())
                } else {
                    format!("unknown filter; expected one of: {}", known.join(", "))
                },
            });
        };
        state.set(key.as_str(), Some(FilterValue::parse(field, raw)?));
    }
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn command_names_match_the_cli() {
        assert_eq!(command_name(Entity::TcsRecords), "tcs-records");
        assert_eq!(command_name(Entity::DayCloses), "day-close");
        assert_eq!(command_name(Entity::MrVisits), "mr-visits");
    }

    #[test]
    fn filters_are_checked_against_the_entity() {
        let filter = parse_filters(
            Entity::Discounts,
            &[("status".into(), "published".into())],
        )
        .unwrap();
        assert_eq!(
            filter.get("status"),
            Some(&FilterValue::Exact("Published".into()))
        );

        let err = parse_filters(Entity::Discounts, &[("colour".into(), "red".into())]).unwrap_err();
        assert!(matches!(err, CliError::Validation { field, .. } if field == "colour"));
    }

    #[test]
    fn yes_flag_approves_every_prompt() {
        let gate = TerminalGate { assume_yes: true };
        assert!(gate.confirm(&Confirmation::Delete {
            entity: "discount",
            id: rxdesk_core::RecordId::from(1),
        }));
    }
}
