//! Page-level logic between `rxdesk-api` and UI consumers (CLI today).
//!
//! Every admin page in the back office is the same pattern instantiated
//! for a different entity. This crate owns that pattern once:
//!
//! - **[`Entity`]**: the catalog. Each variant declares its endpoint
//!   ([`ResourceSpec`]), display columns, filters, list mode, status field,
//!   and form schema.
//!
//! - **[`ListController`]**: Collection, Filter, and Page state for one
//!   list view, with a stale-response guard and confirmation-gated
//!   delete/status mutations. State is published through a `watch` channel.
//!
//! - **[`FormController`]**: create/edit form state, declarative validation
//!   on blur and on submit, and JSON/multipart serialization.
//!
//! - **[`navigation`]**: row actions to routes, and the route to menu path
//!   mapping.
//!
//! - **[`transfer`]**: CSV export of the visible rows, spreadsheet import.
//!
//! - **[`Backend`]**: builds per-entity resource clients from one
//!   [`BackendConfig`].

pub mod backend;
pub mod catalog;
pub mod config;
pub mod confirm;
pub mod error;
pub mod form;
pub mod list;
pub mod model;
pub mod navigation;
pub mod notice;
pub mod resource;
pub mod transfer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use catalog::{Entity, ListMode, StatusField};
pub use config::{BackendConfig, TlsVerification};
pub use confirm::{ConfirmGate, Confirmation};
pub use error::CoreError;
pub use form::{FieldValue, FormController, FormMode, FormState, Submitted};
pub use list::{ListController, ListState, LoadPhase, MutationOutcome};
pub use model::{Column, ColumnKind, FilterField, FilterKind, FilterState, FilterValue};
pub use navigation::{Dispatch, MenuPath, MenuSection, Route, RowAction};
pub use notice::{Notice, NoticeLevel};
pub use resource::RecordApi;

// Wire types consumers need without depending on the api crate directly.
pub use rxdesk_api::{
    Download, FilePart, ImportSummary, ListPage, ListQuery, Payload, Record, RecordId,
    ResourceClient, ResourceSpec,
};
