//! `rxdesk menu`: the sidebar, section by section.

use strum::IntoEnumIterator;

use rxdesk_core::navigation::active_menu_path;
use rxdesk_core::{Entity, Route};

use crate::cli::GlobalOpts;
use crate::output;

use super::util;

pub fn handle(global: &GlobalOpts) {
    let mut lines = Vec::new();
    let mut section = None;
    for entity in Entity::iter() {
        let path = active_menu_path(&Route::List(entity));
        if section != Some(path.section) {
            if section.is_some() {
                lines.push(String::new());
            }
            lines.push(path.section.to_string());
            section = Some(path.section);
        }
        let item = path.item.unwrap_or_default();
        lines.push(format!("  {item:<16} rxdesk {}", util::command_name(entity)));
    }
    output::print_output(&lines.join("\n"), global.quiet);
}
