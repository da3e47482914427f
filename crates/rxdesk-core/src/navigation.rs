// ── Row actions and routes ──
//
// Row actions either navigate (view/edit) or mutate (delete/status).
// Navigation carries the record id with it; nothing is refetched here.

use std::fmt;

use strum::Display;

use rxdesk_api::RecordId;

use crate::catalog::Entity;
use crate::confirm::ConfirmGate;
use crate::error::CoreError;
use crate::list::{ListController, MutationOutcome};
use crate::resource::RecordApi;

/// Top-level sidebar groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MenuSection {
    Dashboard,
    Catalog,
    Promotions,
    Procurement,
    Sales,
    Accounting,
    Content,
    #[strum(to_string = "Field Force")]
    FieldForce,
}

/// A page in the admin app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    List(Entity),
    Create(Entity),
    View { entity: Entity, id: RecordId },
    Edit { entity: Entity, id: RecordId },
}

impl Route {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            Self::Dashboard => None,
            Self::List(entity)
            | Self::Create(entity)
            | Self::View { entity, .. }
            | Self::Edit { entity, .. } => Some(*entity),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => f.write_str("/"),
            Self::List(entity) => write!(f, "/{entity}"),
            Self::Create(entity) => write!(f, "/{entity}/new"),
            Self::View { entity, id } => write!(f, "/{entity}/{id}"),
            Self::Edit { entity, id } => write!(f, "/{entity}/{id}/edit"),
        }
    }
}

/// Section and item highlighted in the sidebar for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuPath {
    pub section: MenuSection,
    pub item: Option<&'static str>,
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item {
            Some(item) => write!(f, "{} > {item}", self.section),
            None => write!(f, "{}", self.section),
        }
    }
}

/// Menu path to highlight for `route`. Create/view/edit pages highlight
/// their entity's list item.
pub fn active_menu_path(route: &Route) -> MenuPath {
    match route.entity() {
        Some(entity) => MenuPath {
            section: entity.section(),
            item: Some(entity.title()),
        },
        None => MenuPath {
            section: MenuSection::Dashboard,
            item: None,
        },
    }
}

/// Action triggered from a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
    ChangeStatus(String),
}

/// What a row action resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Navigate(Route),
    Delete(RecordId),
    ChangeStatus { id: RecordId, status: String },
}

/// Map a row action to a navigation or a mutation.
pub fn dispatch(entity: Entity, id: RecordId, action: RowAction) -> Dispatch {
    match action {
        RowAction::View => Dispatch::Navigate(Route::View { entity, id }),
        RowAction::Edit => Dispatch::Navigate(Route::Edit { entity, id }),
        RowAction::Delete => Dispatch::Delete(id),
        RowAction::ChangeStatus(status) => Dispatch::ChangeStatus { id, status },
    }
}

/// Result of running a dispatched row action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Navigate(Route),
    Mutated(MutationOutcome),
}

/// Run a row action against a list view. Mutations go through the list
/// controller's confirmation flow.
pub async fn perform<A: RecordApi>(
    list: &ListController<A>,
    id: RecordId,
    action: RowAction,
    gate: &impl ConfirmGate,
) -> Result<RowOutcome, CoreError> {
    match dispatch(list.entity(), id, action) {
        Dispatch::Navigate(route) => Ok(RowOutcome::Navigate(route)),
        Dispatch::Delete(id) => list
            .request_delete(&id, gate)
            .await
            .map(RowOutcome::Mutated),
        Dispatch::ChangeStatus { id, status } => list
            .request_status_change(&id, &status, gate)
            .await
            .map(RowOutcome::Mutated),
    }
}
