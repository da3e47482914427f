#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{Call, FakeApi, ids, rec};
use rxdesk_api::{Error, ListQuery, RecordId};
use rxdesk_core::confirm::AlwaysConfirm;
use rxdesk_core::navigation::{RowOutcome, perform};
use rxdesk_core::{
    Confirmation, CoreError, Entity, FilterState, FilterValue, ListController, ListMode,
    LoadPhase, MutationOutcome, Route, RowAction,
};

fn discounts() -> Vec<rxdesk_api::Record> {
    vec![
        rec(json!({"id": 1, "name": "Monsoon Sale", "status": "Published", "valid_from": "2024-06-01"})),
        rec(json!({"id": 2, "name": "Flat 50", "status": "Draft", "valid_from": "2024-07-01"})),
        rec(json!({"id": 3, "name": "Senior Citizen", "status": "Published", "valid_from": "2024-01-01"})),
        rec(json!({"id": 4, "name": "Clearance", "status": "Archived", "valid_from": "2023-12-01"})),
        rec(json!({"id": 5, "name": "Festive", "status": "Draft", "valid_from": "2024-10-15"})),
    ]
}

fn controller(records: Vec<rxdesk_api::Record>) -> (Arc<FakeApi>, ListController<FakeApi>) {
    let api = Arc::new(FakeApi::new(Entity::Discounts.spec(), records));
    let list = ListController::new(Arc::clone(&api), Entity::Discounts, 10);
    (api, list)
}

fn published() -> FilterState {
    FilterState::new().with("status", FilterValue::Exact("Published".into()))
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn load_populates_collection() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let state = list.snapshot();
    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(state.records.len(), 5);
    assert_eq!(api.calls(), vec![Call::List(ListQuery::default())]);
}

#[tokio::test]
async fn failed_load_empties_collection_and_keeps_message() {
    let api = Arc::new(
        FakeApi::new(Entity::Discounts.spec(), discounts()).reply_list(
            Duration::ZERO,
            Err(Error::FetchFailed {
                entity: "discounts".into(),
                status: Some(500),
                cause: None,
            }),
        ),
    );
    let list = ListController::new(api, Entity::Discounts, 10);

    let err = list.load().await.unwrap_err();
    assert!(matches!(err, CoreError::FetchFailed { .. }));

    let state = list.snapshot();
    assert_eq!(state.phase, LoadPhase::Failed);
    assert!(state.records.is_empty());
    assert_eq!(state.error.as_deref(), Some("Failed to fetch discounts"));
}

#[tokio::test(start_paused = true)]
async fn stale_response_never_overwrites_newer_one() {
    let slow = vec![rec(json!({"id": 1, "name": "old"}))];
    let fast = vec![rec(json!({"id": 2, "name": "new"}))];
    let api = Arc::new(
        FakeApi::new(Entity::Discounts.spec(), Vec::new())
            .reply_list(Duration::from_millis(500), Ok(slow))
            .reply_list(Duration::from_millis(10), Ok(fast)),
    );
    let list = ListController::new(api, Entity::Discounts, 10);

    let (first, second) = tokio::join!(list.load(), list.load());
    first.unwrap();
    second.unwrap();

    assert_eq!(ids(&list.snapshot().records), vec![RecordId::from(2)]);
}

#[tokio::test]
async fn subscribers_see_state_changes() {
    let (_api, list) = controller(discounts());
    let mut rx = list.subscribe();
    list.load().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().records.len(), 5);
}

// ── Filtering and paging ────────────────────────────────────────────

#[tokio::test]
async fn client_filter_shows_matching_rows_only() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    list.apply_filter(published()).await.unwrap();
    assert_eq!(ids(&list.visible()), vec![RecordId::from(1), RecordId::from(3)]);
    // Client mode filters in memory.
    assert_eq!(api.count(|c| matches!(c, Call::List(_))), 1);
}

#[tokio::test]
async fn client_filter_shrinks_page_bounds() {
    let api = Arc::new(FakeApi::new(Entity::Discounts.spec(), discounts()));
    let list = ListController::new(api, Entity::Discounts, 1);
    list.load().await.unwrap();
    assert_eq!(list.page_count(), 5);

    list.apply_filter(published()).await.unwrap();
    assert_eq!(list.page_count(), 2);
    assert!(!list.change_page(3).await.unwrap());
    assert_eq!(list.snapshot().page, 1);

    assert!(list.change_page(2).await.unwrap());
    assert_eq!(ids(&list.visible()), vec![RecordId::from(3)]);
}

#[tokio::test]
async fn clearing_filter_restores_every_row() {
    let (_api, list) = controller(discounts());
    list.load().await.unwrap();

    list.apply_filter(published()).await.unwrap();
    list.clear_filter().await.unwrap();

    assert_eq!(ids(&list.visible()), ids(&discounts()));
    assert!(list.snapshot().filter.is_empty());
}

#[tokio::test]
async fn staged_filter_applies_only_on_commit() {
    let (_api, list) = controller(discounts());
    list.load().await.unwrap();

    list.stage_filter("name", Some(FilterValue::Contains("sale".into())));
    assert_eq!(list.visible().len(), 5);

    list.discard_draft();
    assert!(list.snapshot().draft.is_empty());

    list.stage_filter("name", Some(FilterValue::Contains("sale".into())));
    list.apply_staged().await.unwrap();
    assert_eq!(ids(&list.visible()), vec![RecordId::from(1)]);
}

#[tokio::test]
async fn filter_resets_to_first_page() {
    let api = Arc::new(FakeApi::new(Entity::Discounts.spec(), discounts()));
    let list = ListController::new(api, Entity::Discounts, 2);
    list.load().await.unwrap();

    assert!(list.change_page(3).await.unwrap());
    assert_eq!(ids(&list.visible()), vec![RecordId::from(5)]);

    list.apply_filter(published()).await.unwrap();
    assert_eq!(list.snapshot().page, 1);
}

#[tokio::test]
async fn out_of_range_page_is_ignored() {
    let api = Arc::new(FakeApi::new(Entity::Discounts.spec(), discounts()));
    let list = ListController::new(api, Entity::Discounts, 2);
    list.load().await.unwrap();

    assert!(!list.change_page(4).await.unwrap());
    assert!(!list.change_page(0).await.unwrap());
    assert_eq!(list.snapshot().page, 1);
}

#[tokio::test]
async fn server_mode_sends_filter_and_page() {
    let api = Arc::new(FakeApi::new(Entity::Discounts.spec(), discounts()));
    let list = ListController::new(Arc::clone(&api), Entity::Discounts, 2).with_mode(ListMode::Server);
    list.load().await.unwrap();

    list.apply_filter(published()).await.unwrap();
    assert!(list.change_page(2).await.unwrap());

    let queries: Vec<_> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::List(q) => Some(q),
            _ => None,
        })
        .collect();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[1].filters.get("status").map(String::as_str), Some("Published"));
    assert_eq!(queries[1].page, Some(1));
    assert_eq!(queries[2].page, Some(2));
    assert_eq!(queries[2].page_size, Some(2));
}

// ── Row mutations ───────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_exactly_one_row_without_refetch() {
    let (api, list) = controller(discounts().into_iter().take(3).collect());
    list.load().await.unwrap();

    let outcome = list
        .request_delete(&RecordId::from(2), &AlwaysConfirm)
        .await
        .unwrap();

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(ids(&list.snapshot().records), vec![RecordId::from(1), RecordId::from(3)]);
    assert_eq!(api.count(|c| matches!(c, Call::Remove(_))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::List(_))), 1);
}

#[tokio::test]
async fn delete_asks_twice_and_stops_on_second_no() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let asked = AtomicUsize::new(0);
    let gate = |prompt: &Confirmation| {
        asked.fetch_add(1, Ordering::SeqCst);
        matches!(prompt, Confirmation::Delete { .. })
    };
    let outcome = list.request_delete(&RecordId::from(1), &gate).await.unwrap();

    assert_eq!(outcome, MutationOutcome::Cancelled);
    assert_eq!(asked.load(Ordering::SeqCst), 2);
    assert_eq!(api.count(|c| matches!(c, Call::Remove(_))), 0);
    assert_eq!(list.snapshot().records.len(), 5);
}

#[tokio::test]
async fn failed_delete_leaves_collection_untouched() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();
    api.fail_next_mutation(Error::FetchFailed {
        entity: "discounts".into(),
        status: Some(409),
        cause: Some("Discount is applied to open orders".into()),
    });

    let err = list
        .request_delete(&RecordId::from(1), &AlwaysConfirm)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Discount is applied to open orders");
    assert_eq!(list.snapshot().records.len(), 5);
}

#[tokio::test]
async fn delete_of_unknown_row_sends_nothing() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let err = list
        .request_delete(&RecordId::from(99), &AlwaysConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(api.count(|c| matches!(c, Call::Remove(_))), 0);
}

#[tokio::test]
async fn status_change_patches_row_in_place() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let outcome = list
        .request_status_change(&RecordId::from(2), "published", &AlwaysConfirm)
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Applied);

    let state = list.snapshot();
    let row = state.records.iter().find(|r| r.id() == &RecordId::from(2)).unwrap();
    assert_eq!(row.text("status"), "Published");
    assert_eq!(row.text("name"), "Flat 50");

    let updates: Vec<_> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Update(id, payload) => Some((id, payload.fields().clone())),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, RecordId::from(2));
    assert_eq!(updates[0].1.get("status"), Some(&json!("Published")));
}

#[tokio::test]
async fn status_change_rejects_unknown_status() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let err = list
        .request_status_change(&RecordId::from(2), "Live", &AlwaysConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert!(api.calls().iter().all(|c| !matches!(c, Call::Update(..))));
}

#[tokio::test]
async fn declined_status_change_sends_nothing() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let outcome = list
        .request_status_change(&RecordId::from(2), "Archived", &|_: &Confirmation| false)
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Cancelled);
    assert_eq!(api.count(|c| matches!(c, Call::Update(..))), 0);
}

// ── Row action dispatch ─────────────────────────────────────────────

#[tokio::test]
async fn row_actions_navigate_or_mutate() {
    let (api, list) = controller(discounts());
    list.load().await.unwrap();

    let view = perform(&list, RecordId::from(3), RowAction::View, &AlwaysConfirm)
        .await
        .unwrap();
    assert_eq!(
        view,
        RowOutcome::Navigate(Route::View {
            entity: Entity::Discounts,
            id: RecordId::from(3)
        })
    );
    assert_eq!(api.calls().len(), 1);

    let deleted = perform(&list, RecordId::from(3), RowAction::Delete, &AlwaysConfirm)
        .await
        .unwrap();
    assert_eq!(deleted, RowOutcome::Mutated(MutationOutcome::Applied));
    assert_eq!(list.snapshot().records.len(), 4);
}
