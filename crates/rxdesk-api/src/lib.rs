// rxdesk-api: Async REST resource client for the pharmacy back-office API.
//
// One `ResourceClient` per entity. Response shapes and failure shapes are
// normalized here so nothing downstream branches on backend quirks.

pub mod client;
pub mod error;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::ResourceClient;
pub use error::Error;
pub use resource::{PayloadEncoding, ResourceSpec};
pub use transport::{TlsMode, TransportConfig};
pub use types::{Download, FilePart, ImportSummary, ListPage, ListQuery, Payload, Record, RecordId};
