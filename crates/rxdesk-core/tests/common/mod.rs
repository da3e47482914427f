#![allow(clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use rxdesk_api::{
    Download, Error, FilePart, ImportSummary, ListPage, ListQuery, Payload, Record, RecordId,
    ResourceSpec,
};
use rxdesk_core::RecordApi;

/// A recorded call against [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListQuery),
    Get(RecordId),
    Create(Payload),
    Update(RecordId, Payload),
    Remove(RecordId),
    Import(String),
    Export(ListQuery),
}

type ListReply = (Duration, Result<Vec<Record>, Error>);

/// In-memory backend: a record table plus scripted list replies and
/// one-shot mutation failures.
pub struct FakeApi {
    spec: ResourceSpec,
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<Call>>,
    list_replies: Mutex<VecDeque<ListReply>>,
    mutation_error: Mutex<Option<Error>>,
}

impl FakeApi {
    pub fn new(spec: ResourceSpec, records: Vec<Record>) -> Self {
        Self {
            spec,
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            list_replies: Mutex::new(VecDeque::new()),
            mutation_error: Mutex::new(None),
        }
    }

    /// Next list call answers with `records` after `delay`.
    pub fn reply_list(self, delay: Duration, reply: Result<Vec<Record>, Error>) -> Self {
        self.list_replies.lock().unwrap().push_back((delay, reply));
        self
    }

    /// Next create/update/remove fails with `err`.
    pub fn fail_next_mutation(&self, err: Error) {
        *self.mutation_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_error(&self) -> Option<Error> {
        self.mutation_error.lock().unwrap().take()
    }

    fn not_found(&self, id: &RecordId) -> Error {
        Error::NotFound {
            entity: self.spec.entity.into(),
            id: id.to_string(),
        }
    }
}

impl RecordApi for FakeApi {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage, Error> {
        self.record(Call::List(query.clone()));
        let scripted = self.list_replies.lock().unwrap().pop_front();
        let items = match scripted {
            Some((delay, reply)) => {
                tokio::time::sleep(delay).await;
                reply?
            }
            None => self.records(),
        };
        let total = items.len() as u64;
        Ok(ListPage { items, total })
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<Record, Error> {
        self.record(Call::Get(id.clone()));
        self.records()
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, payload: &Payload) -> Result<Record, Error> {
        self.record(Call::Create(payload.clone()));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let next = records
            .iter()
            .filter_map(|r| match r.id() {
                RecordId::Int(i) => Some(*i),
                RecordId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        let mut fields = payload.fields().clone();
        fields.insert("id".into(), Value::from(next));
        let record = Record::new(RecordId::from(next), fields);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, Error> {
        self.record(Call::Update(id.clone(), payload.clone()));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let row = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        row.merge(payload.fields());
        Ok(row.clone())
    }

    async fn remove(&self, id: &RecordId) -> Result<(), Error> {
        self.record(Call::Remove(id.clone()));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(self.not_found(id));
        }
        Ok(())
    }

    async fn bulk_import(&self, file: FilePart) -> Result<ImportSummary, Error> {
        self.record(Call::Import(file.file_name));
        Ok(ImportSummary {
            created: 2,
            updated: 1,
            failed: 0,
            message: None,
        })
    }

    async fn bulk_export(&self, query: &ListQuery) -> Result<Download, Error> {
        self.record(Call::Export(query.clone()));
        Ok(Download {
            file_name: self.spec.export_file_name(),
            content_type: None,
            bytes: b"PK\x03\x04".to_vec(),
        })
    }
}

pub fn rec(value: Value) -> Record {
    Record::from_value(value, "id").unwrap()
}

pub fn ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(|r| r.id().clone()).collect()
}
