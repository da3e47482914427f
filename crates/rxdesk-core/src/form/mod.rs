// ── Form controller ──
//
// Create and edit share one controller. Edit mode hydrates from the
// backend record, mapping backend names to form names; submit maps them
// back. Nothing reaches the backend while a field is invalid.

pub mod schema;
pub mod state;

use std::sync::Arc;

use tracing::{debug, info, warn};

use rxdesk_api::{FilePart, Payload, Record, RecordId};

use crate::catalog::Entity;
use crate::error::CoreError;
use crate::navigation::Route;
use crate::resource::RecordApi;

pub use schema::{FieldKind, FieldSpec, FormSchema, Requirement};
pub use state::{FieldValue, FormState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// A successful submit: the saved record and where to go next.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub record: Record,
    pub return_to: Route,
}

pub struct FormController<A> {
    api: Arc<A>,
    entity: Entity,
    schema: FormSchema,
    mode: FormMode,
    state: FormState,
}

impl<A: RecordApi> FormController<A> {
    /// Blank form with schema defaults.
    pub fn create(api: Arc<A>, entity: Entity) -> Self {
        let schema = entity.form();
        let mut state = FormState::default();
        for field in schema.fields {
            let value = field.default.map_or_else(
                || FieldValue::empty(field.kind),
                |d| FieldValue::from_input(field.kind, d),
            );
            state.put(field.name, value);
        }
        Self {
            api,
            entity,
            schema,
            mode: FormMode::Create,
            state,
        }
    }

    /// Empty edit form for `id`. Call [`load`](Self::load) to hydrate it.
    pub fn edit(api: Arc<A>, entity: Entity, id: RecordId) -> Self {
        let schema = entity.form();
        let mut state = FormState::default();
        for field in schema.fields {
            state.put(field.name, FieldValue::empty(field.kind));
        }
        Self {
            api,
            entity,
            schema,
            mode: FormMode::Edit(id),
            state,
        }
    }

    /// Fetch the record being edited and hydrate the form. On failure the
    /// form stays empty.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let FormMode::Edit(id) = &self.mode else {
            return Ok(());
        };
        match self.api.get_by_id(id).await {
            Ok(record) => {
                self.hydrate(&record);
                Ok(())
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!(entity = %self.entity, %id, error = %err, "could not load record for edit");
                Err(err)
            }
        }
    }

    /// Fill the form from a backend record. Fields the record lacks are
    /// left empty.
    pub fn hydrate(&mut self, record: &Record) {
        for field in self.schema.fields {
            let value = record.get(field.backend).map_or_else(
                || FieldValue::empty(field.kind),
                |v| FieldValue::from_backend(field.kind, v),
            );
            self.state.put(field.name, value);
        }
        self.state.clear_errors();
        debug!(entity = %self.entity, id = %record.id(), "form hydrated");
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn schema(&self) -> FormSchema {
        self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    fn field(&self, name: &str) -> Result<&'static FieldSpec, CoreError> {
        self.schema
            .field(name)
            .ok_or_else(|| CoreError::InvalidInput {
                field: name.to_owned(),
                reason: format!(
                    "unknown field; expected one of: {}",
                    self.schema
                        .fields
                        .iter()
                        .map(|f| f.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }

    /// Change one field's value.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), CoreError> {
        let field = self.field(name)?;
        self.state.put(field.name, value);
        Ok(())
    }

    /// Change one field from raw text input.
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), CoreError> {
        let field = self.field(name)?;
        self.state
            .put(field.name, FieldValue::from_input(field.kind, raw));
        Ok(())
    }

    /// Attach a file to a file field.
    pub fn attach(&mut self, name: &str, file: FilePart) -> Result<(), CoreError> {
        let field = self.field(name)?;
        if field.kind != FieldKind::File {
            return Err(CoreError::InvalidInput {
                field: name.to_owned(),
                reason: "not a file field".into(),
            });
        }
        self.state.put(field.name, FieldValue::File(Some(file)));
        Ok(())
    }

    /// Validate one field on blur. Returns its error, if any.
    pub fn blur(&mut self, name: &str) -> Option<&str> {
        let field = self.schema.field(name)?;
        let error = self.check(field).err();
        self.state.set_error(field.name, error);
        self.state.error(field.name)
    }

    fn check(&self, field: &FieldSpec) -> Result<(), String> {
        let empty = FieldValue::empty(field.kind);
        let value = self.state.value(field.name).unwrap_or(&empty);
        field.check(value, &self.state)
    }

    /// Validate every field. Returns true when the form is valid.
    pub fn validate(&mut self) -> bool {
        let results: Vec<_> = self
            .schema
            .fields
            .iter()
            .map(|f| (f.name, self.check(f).err()))
            .collect();
        for (name, error) in results {
            self.state.set_error(name, error);
        }
        !self.state.has_errors()
    }

    /// Backend payload: backend field names, JSON-typed values, and any
    /// attached files.
    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        for field in self.schema.fields {
            match self.state.value(field.name) {
                Some(FieldValue::File(Some(file))) => {
                    let mut file = file.clone();
                    file.field = field.backend.to_owned();
                    payload.attach(file);
                }
                Some(value) => {
                    if let Some(json) = value.to_backend(field.kind) {
                        payload.insert(field.backend, json);
                    }
                }
                None => {}
            }
        }
        payload
    }

    /// Validate, then create or update. Backend field errors are attached
    /// to the matching form fields.
    pub async fn submit(&mut self) -> Result<Submitted, CoreError> {
        if !self.validate() {
            debug!(entity = %self.entity, errors = self.state.errors().len(), "submit blocked by validation");
            return Err(CoreError::InvalidForm {
                errors: self.state.errors().clone(),
            });
        }

        let payload = self.payload();
        self.state.set_submitting(true);
        let result = match &self.mode {
            FormMode::Create => self.api.create(&payload).await,
            FormMode::Edit(id) => self.api.update(id, &payload).await,
        };
        self.state.set_submitting(false);

        match result {
            Ok(record) => {
                info!(entity = %self.entity, id = %record.id(), "record saved");
                Ok(Submitted {
                    record,
                    return_to: Route::List(self.entity),
                })
            }
            Err(err) => {
                let err = CoreError::from(err);
                if let CoreError::Rejected { field_errors, .. } = &err {
                    for (backend, messages) in field_errors {
                        let name = self
                            .schema
                            .by_backend(backend)
                            .map_or_else(|| backend.clone(), |f| f.name.to_owned());
                        self.state.set_error(name, Some(messages.join("; ")));
                    }
                }
                warn!(entity = %self.entity, error = %err, "submit failed");
                Err(err)
            }
        }
    }
}
