// ── Backend handle ──
//
// Cheaply cloneable entry point: holds the config and one shared HTTP
// client, and hands out per-entity resource clients and controllers.

use std::sync::Arc;

use tracing::debug;

use rxdesk_api::{RecordId, ResourceClient};

use crate::catalog::Entity;
use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::form::FormController;
use crate::list::ListController;

#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    config: BackendConfig,
    http: reqwest::Client,
}

impl Backend {
    /// Build the shared HTTP client. No request is sent.
    pub fn new(config: BackendConfig) -> Result<Self, CoreError> {
        let http = config.transport().build_client()?;
        debug!(url = %config.api_url, "backend client ready");
        Ok(Self {
            inner: Arc::new(BackendInner { config, http }),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    pub fn client(&self, entity: Entity) -> Result<ResourceClient, CoreError> {
        Ok(ResourceClient::with_client(
            self.inner.http.clone(),
            self.inner.config.api_url.as_str(),
            entity.spec(),
        )?)
    }

    pub fn list(&self, entity: Entity) -> Result<ListController<ResourceClient>, CoreError> {
        Ok(ListController::new(
            Arc::new(self.client(entity)?),
            entity,
            self.inner.config.page_size,
        ))
    }

    pub fn create_form(&self, entity: Entity) -> Result<FormController<ResourceClient>, CoreError> {
        Ok(FormController::create(Arc::new(self.client(entity)?), entity))
    }

    pub fn edit_form(
        &self,
        entity: Entity,
        id: RecordId,
    ) -> Result<FormController<ResourceClient>, CoreError> {
        Ok(FormController::edit(
            Arc::new(self.client(entity)?),
            entity,
            id,
        ))
    }
}
