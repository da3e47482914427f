// ── List-view model types ──

pub mod column;
pub mod filter;

pub use column::{Column, ColumnKind};
pub use filter::{FilterField, FilterKind, FilterState, FilterValue};
