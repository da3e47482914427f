// ── Resource seam ──
//
// Controllers talk to the backend through `RecordApi` so tests can swap
// in an in-memory fake. `ResourceClient` is the production impl.

use std::future::Future;

use rxdesk_api::{
    Download, Error, FilePart, ImportSummary, ListPage, ListQuery, Payload, Record, RecordId,
    ResourceClient, ResourceSpec,
};

/// The eight operations every entity endpoint supports.
pub trait RecordApi: Send + Sync {
    fn spec(&self) -> &ResourceSpec;

    fn list(&self, query: &ListQuery) -> impl Future<Output = Result<ListPage, Error>> + Send;

    fn get_by_id(&self, id: &RecordId) -> impl Future<Output = Result<Record, Error>> + Send;

    fn create(&self, payload: &Payload) -> impl Future<Output = Result<Record, Error>> + Send;

    fn update(
        &self,
        id: &RecordId,
        payload: &Payload,
    ) -> impl Future<Output = Result<Record, Error>> + Send;

    fn remove(&self, id: &RecordId) -> impl Future<Output = Result<(), Error>> + Send;

    fn bulk_import(&self, file: FilePart)
    -> impl Future<Output = Result<ImportSummary, Error>> + Send;

    fn bulk_export(&self, query: &ListQuery) -> impl Future<Output = Result<Download, Error>> + Send;
}

impl RecordApi for ResourceClient {
    fn spec(&self) -> &ResourceSpec {
        ResourceClient::spec(self)
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage, Error> {
        ResourceClient::list(self, query).await
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<Record, Error> {
        ResourceClient::get_by_id(self, id).await
    }

    async fn create(&self, payload: &Payload) -> Result<Record, Error> {
        ResourceClient::create(self, payload).await
    }

    async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, Error> {
        ResourceClient::update(self, id, payload).await
    }

    async fn remove(&self, id: &RecordId) -> Result<(), Error> {
        ResourceClient::remove(self, id).await
    }

    async fn bulk_import(&self, file: FilePart) -> Result<ImportSummary, Error> {
        ResourceClient::bulk_import(self, file).await
    }

    async fn bulk_export(&self, query: &ListQuery) -> Result<Download, Error> {
        ResourceClient::bulk_export(self, query).await
    }
}
