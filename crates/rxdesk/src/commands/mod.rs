//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod menu;
pub mod resource;
pub mod util;

use rxdesk_core::{Backend, Entity};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the resource handler.
pub async fn dispatch(cmd: Command, backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    let (entity, args) = match cmd {
        Command::Products(args) => (Entity::Products, args),
        Command::Categories(args) => (Entity::Categories, args),
        Command::Variants(args) => (Entity::Variants, args),
        Command::PackagingUnits(args) => (Entity::PackagingUnits, args),
        Command::Discounts(args) => (Entity::Discounts, args),
        Command::Suppliers(args) => (Entity::Suppliers, args),
        Command::Payments(args) => (Entity::Payments, args),
        Command::Orders(args) => (Entity::Orders, args),
        Command::TcsRecords(args) => (Entity::TcsRecords, args),
        Command::DayClose(args) => (Entity::DayCloses, args),
        Command::Faqs(args) => (Entity::Faqs, args),
        Command::MrVisits(args) => (Entity::MrVisits, args),
        // Local commands are handled before dispatch
        Command::Menu | Command::Config(_) | Command::Completions(_) => unreachable!(),
    };
    tracing::debug!(%entity, command = ?args.command, "dispatching command");
    resource::handle(backend, entity, args, global).await
}
