// ── List controller ──
//
// Owns Collection, Filter, and Page state for one list view. Visible rows
// are always derived from (records, committed filter, page); nothing
// caches a filtered copy. Each load takes a generation number and only
// the newest load may write its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use rxdesk_api::{ListQuery, Payload, Record, RecordId};

use crate::catalog::{Entity, ListMode};
use crate::confirm::{ConfirmGate, Confirmation};
use crate::error::CoreError;
use crate::model::{FilterState, FilterValue};
use crate::resource::RecordApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Result of a confirmation-gated mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// The user declined a prompt; nothing was sent.
    Cancelled,
}

/// Snapshot of one list view.
#[derive(Debug, Clone)]
pub struct ListState {
    pub mode: ListMode,
    pub phase: LoadPhase,
    /// Last loaded records, in backend order.
    pub records: Vec<Record>,
    /// Backend-reported total (server mode) or loaded count.
    pub total: u64,
    /// Committed filter; drives the visible rows.
    pub filter: FilterState,
    /// Filter being edited, not yet applied.
    pub draft: FilterState,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    /// Message for the last failed load.
    pub error: Option<String>,
}

impl ListState {
    fn new(mode: ListMode, page_size: u32) -> Self {
        Self {
            mode,
            phase: LoadPhase::Idle,
            records: Vec::new(),
            total: 0,
            filter: FilterState::new(),
            draft: FilterState::new(),
            page: 1,
            page_size: page_size.max(1),
            error: None,
        }
    }

    fn page_window(&self) -> (usize, usize) {
        let size = usize::try_from(self.page_size.max(1)).unwrap_or(usize::MAX);
        let page = usize::try_from(self.page.saturating_sub(1)).unwrap_or(0);
        (page.saturating_mul(size), size)
    }

    /// Rows matching the committed filter, across all pages.
    pub fn filtered_total(&self) -> u64 {
        match self.mode {
            ListMode::Client => {
                let n = self.records.iter().filter(|r| self.filter.matches(r)).count();
                u64::try_from(n).unwrap_or(u64::MAX)
            }
            ListMode::Server => self.total,
        }
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.filtered_total().div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Rows on the current page.
    pub fn visible(&self) -> Vec<&Record> {
        let (skip, size) = self.page_window();
        match self.mode {
            ListMode::Client => self
                .records
                .iter()
                .filter(|r| self.filter.matches(r))
                .skip(skip)
                .take(size)
                .collect(),
            // A backend that ignores paging returns everything; window it here.
            ListMode::Server if self.records.len() > size => {
                self.records.iter().skip(skip).take(size).collect()
            }
            ListMode::Server => self.records.iter().collect(),
        }
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count().max(1));
    }
}

/// Drives one entity's list view against a [`RecordApi`].
///
/// All methods take `&self`; state changes are published through a
/// `watch` channel so a renderer can [`subscribe`](Self::subscribe).
pub struct ListController<A> {
    api: Arc<A>,
    entity: Entity,
    state: watch::Sender<ListState>,
    generation: AtomicU64,
}

impl<A: RecordApi> ListController<A> {
    pub fn new(api: Arc<A>, entity: Entity, page_size: u32) -> Self {
        let (state, _) = watch::channel(ListState::new(entity.list_mode(), page_size));
        Self {
            api,
            entity,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Override the entity's default list mode.
    pub fn with_mode(self, mode: ListMode) -> Self {
        self.state.send_modify(|s| s.mode = mode);
        self
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn snapshot(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    /// Rows on the current page, cloned out of the state.
    pub fn visible(&self) -> Vec<Record> {
        self.state.borrow().visible().into_iter().cloned().collect()
    }

    pub fn page_count(&self) -> u32 {
        self.state.borrow().page_count()
    }

    /// Query for the current state. Client-mode views fetch everything.
    pub fn query(&self) -> ListQuery {
        let s = self.state.borrow();
        match s.mode {
            ListMode::Client => ListQuery::default(),
            ListMode::Server => {
                ListQuery::with_filters(s.filter.to_params()).paged(s.page, s.page_size)
            }
        }
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Fetch records for the current filter and page.
    ///
    /// On failure the collection is emptied, the error message stored in
    /// state, and the error returned. A response that arrives after a
    /// newer load was issued is dropped.
    pub async fn load(&self) -> Result<(), CoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query();
        self.state.send_modify(|s| {
            s.phase = LoadPhase::Loading;
            s.error = None;
        });
        info!(entity = %self.entity, generation, "loading list");

        let result = self.api.list(&query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            warn!(entity = %self.entity, generation, "discarding stale list response");
            return Ok(());
        }

        match result {
            Ok(page) => {
                info!(entity = %self.entity, count = page.items.len(), total = page.total, "list loaded");
                self.state.send_modify(|s| {
                    s.records = page.items;
                    s.total = page.total;
                    s.phase = LoadPhase::Loaded;
                    if s.mode == ListMode::Client {
                        s.clamp_page();
                    }
                });
                Ok(())
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!(entity = %self.entity, error = %err, "list load failed");
                self.state.send_modify(|s| {
                    s.records.clear();
                    s.total = 0;
                    s.phase = LoadPhase::Failed;
                    s.error = Some(err.user_message());
                });
                Err(err)
            }
        }
    }

    /// Reload after an external change (import, another tab).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.load().await
    }

    // ── Filtering ───────────────────────────────────────────────────

    /// Commit `filter`, reset to page 1, and refetch in server mode.
    pub async fn apply_filter(&self, filter: FilterState) -> Result<(), CoreError> {
        let mode = self.state.borrow().mode;
        self.state.send_modify(|s| {
            s.draft = filter.clone();
            s.filter = filter;
            s.page = 1;
        });
        debug!(entity = %self.entity, "filter applied");
        match mode {
            ListMode::Server => self.load().await,
            ListMode::Client => Ok(()),
        }
    }

    /// Edit the draft without touching the visible rows.
    pub fn stage_filter(&self, field: &str, value: Option<FilterValue>) {
        self.state.send_modify(|s| s.draft.set(field, value));
    }

    /// Throw the draft away, back to the committed filter.
    pub fn discard_draft(&self) {
        self.state.send_modify(|s| s.draft = s.filter.clone());
    }

    pub async fn apply_staged(&self) -> Result<(), CoreError> {
        let draft = self.state.borrow().draft.clone();
        self.apply_filter(draft).await
    }

    pub async fn clear_filter(&self) -> Result<(), CoreError> {
        self.apply_filter(FilterState::new()).await
    }

    // ── Paging ──────────────────────────────────────────────────────

    /// Move to `page`. Out-of-range pages are ignored (`Ok(false)`).
    pub async fn change_page(&self, page: u32) -> Result<bool, CoreError> {
        let (count, mode) = {
            let s = self.state.borrow();
            (s.page_count(), s.mode)
        };
        if page == 0 || page > count {
            debug!(entity = %self.entity, page, count, "page out of range");
            return Ok(false);
        }
        self.state.send_modify(|s| s.page = page);
        if mode == ListMode::Server {
            self.load().await?;
        }
        Ok(true)
    }

    // ── Row mutations ───────────────────────────────────────────────

    /// Delete one row after two confirmations. On success exactly that
    /// row leaves the collection; no refetch.
    pub async fn request_delete(
        &self,
        id: &RecordId,
        gate: &impl ConfirmGate,
    ) -> Result<MutationOutcome, CoreError> {
        let entity = self.api.spec().entity;
        self.ensure_row(id)?;

        let first = Confirmation::Delete {
            entity,
            id: id.clone(),
        };
        let second = Confirmation::Irreversible {
            entity,
            id: id.clone(),
        };
        if !gate.confirm(&first) || !gate.confirm(&second) {
            debug!(entity, %id, "delete cancelled");
            return Ok(MutationOutcome::Cancelled);
        }

        self.api.remove(id).await?;
        self.state.send_modify(|s| {
            if let Some(pos) = s.records.iter().position(|r| r.id() == id) {
                s.records.remove(pos);
                s.total = s.total.saturating_sub(1);
            }
            s.clamp_page();
        });
        info!(entity, %id, "record deleted");
        Ok(MutationOutcome::Applied)
    }

    /// Set the row's status after one confirmation, patching the row in
    /// place with what the backend returns.
    pub async fn request_status_change(
        &self,
        id: &RecordId,
        status: &str,
        gate: &impl ConfirmGate,
    ) -> Result<MutationOutcome, CoreError> {
        let entity = self.api.spec().entity;
        let Some(field) = self.entity.status() else {
            return Err(CoreError::InvalidInput {
                field: "status".into(),
                reason: format!("{} have no status", self.api.spec().plural_label()),
            });
        };
        let Some(status) = field.normalize(status) else {
            return Err(CoreError::InvalidInput {
                field: field.field.into(),
                reason: format!("expected one of: {}", field.choices.join(", ")),
            });
        };
        self.ensure_row(id)?;

        let prompt = Confirmation::StatusChange {
            entity,
            id: id.clone(),
            status: status.to_owned(),
        };
        if !gate.confirm(&prompt) {
            debug!(entity, %id, "status change cancelled");
            return Ok(MutationOutcome::Cancelled);
        }

        let mut payload = Payload::new();
        payload.insert(field.field, Value::from(status));
        let updated = self.api.update(id, &payload).await?;

        self.state.send_modify(|s| {
            if let Some(row) = s.records.iter_mut().find(|r| r.id() == id) {
                row.set(field.field, Value::from(status));
                row.merge(updated.fields());
            }
        });
        info!(entity, %id, status, "status changed");
        Ok(MutationOutcome::Applied)
    }

    fn ensure_row(&self, id: &RecordId) -> Result<(), CoreError> {
        if self.state.borrow().contains(id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: self.api.spec().entity.into(),
                id: id.to_string(),
            })
        }
    }
}
