use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::client::{Client, HistoryNote, NoteKind};
use crate::datetime::{self, Period};
use crate::query::{self, FilterMode, QueryState, SortKey};
use crate::schema::{Entity, ValidationError};
use crate::store::{RecordId, Store, StoreError};
use crate::tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Creating,
    Viewing(RecordId),
    Editing(RecordId),
    NoteEditing(RecordId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no form is open")]
    NoOpenForm,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error("this record type has no tags")]
    TagsUnsupported,
    #[error("unsupported filter mode: {0}")]
    FilterUnsupported(&'static str),
    #[error("unsupported sort key: {0}")]
    SortUnsupported(&'static str),
    #[error("no date field to filter by period")]
    PeriodUnsupported,
}

#[derive(Debug)]
pub struct Screen<R: Entity> {
    store: Store<R>,
    query: QueryState,
    period: Period,
    modal: Modal,
    draft: Option<R>,
    error: Option<ValidationError>,
}

impl<R: Entity> Screen<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            query: QueryState::new(R::schema().default_sort()),
            period: Period::All,
            modal: Modal::Closed,
            draft: None,
            error: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn modal(&self) -> Modal {
        self.modal
    }

    #[must_use]
    pub fn draft(&self) -> Option<&R> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn visible(&self, today: NaiveDate) -> Vec<&R> {
        let schema = R::schema();
        let in_window = self.store.records().iter().filter(|record| {
            match schema.date_value(record) {
                Some(date) => datetime::in_period(&date, self.period, today),
                None => true,
            }
        });
        query::run(schema, in_window, &self.query)
    }

    #[tracing::instrument(skip(self, records), fields(kind = R::KIND))]
    pub fn seed(&mut self, records: Vec<R>) {
        let count = records.len();
        for record in records {
            self.store.insert(record);
        }
        debug!(count, "seeded records");
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Creating;
        self.draft = Some(R::blank());
        self.error = None;
        debug!(kind = R::KIND, "opened create form");
    }

    pub fn open_view(&mut self, id: RecordId) -> Result<(), ScreenError> {
        self.store.get(id)?;
        self.modal = Modal::Viewing(id);
        self.draft = None;
        self.error = None;
        debug!(kind = R::KIND, %id, "opened record details");
        Ok(())
    }

    pub fn open_edit(&mut self, id: RecordId) -> Result<(), ScreenError> {
        let draft = self.store.get(id)?.clone();
        self.modal = Modal::Editing(id);
        self.draft = Some(draft);
        self.error = None;
        debug!(kind = R::KIND, %id, "opened edit form");
        Ok(())
    }

    pub fn close(&mut self) {
        self.modal = Modal::Closed;
        self.draft = None;
        self.error = None;
    }

    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<String, ScreenError> {
        let draft = self.draft.as_mut().ok_or(ScreenError::NoOpenForm)?;
        let spec = R::schema()
            .field(name)
            .ok_or_else(|| ScreenError::UnknownField(name.to_string()))?;
        Ok(spec.write(draft, raw))
    }

    pub fn toggle_tag(&mut self, tag: &str) -> Result<bool, ScreenError> {
        let draft = self.draft.as_mut().ok_or(ScreenError::NoOpenForm)?;
        if let Some(vocabulary) = R::schema().vocabulary()
            && !vocabulary.iter().any(|known| *known == tag)
        {
            return Err(ScreenError::UnknownTag(tag.to_string()));
        }
        let current = draft.tags_mut().ok_or(ScreenError::TagsUnsupported)?;
        let next = tags::toggle(current, tag);
        let present = next.iter().any(|existing| existing == tag);
        *current = next;
        Ok(present)
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub fn save(&mut self) -> Result<RecordId, ScreenError> {
        let Some(draft) = self.draft.clone() else {
            return Err(ScreenError::NoOpenForm);
        };
        if let Err(err) = R::schema().validate(&draft) {
            self.error = Some(err.clone());
            return Err(err.into());
        }

        let mut record = draft;
        if let Some(record_tags) = record.tags_mut() {
            tags::dedupe(record_tags);
        }

        let id = match self.modal {
            Modal::Creating => self.store.insert(record),
            Modal::Editing(id) => {
                self.store.update(id, record)?;
                id
            }
            _ => return Err(ScreenError::NoOpenForm),
        };

        self.modal = Modal::Closed;
        self.draft = None;
        self.error = None;
        info!(kind = R::KIND, %id, "saved record");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND, id = %id))]
    pub fn delete(&mut self, id: RecordId) -> Result<R, ScreenError> {
        let removed = self.store.delete(id)?;
        match self.modal {
            Modal::Viewing(open) | Modal::Editing(open) | Modal::NoteEditing(open)
                if open == id =>
            {
                self.modal = Modal::Closed;
                self.draft = None;
                self.error = None;
            }
            _ => {}
        }
        info!(kind = R::KIND, "deleted record");
        Ok(removed)
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) -> Result<(), ScreenError> {
        if !R::schema().supports_mode(mode) {
            return Err(ScreenError::FilterUnsupported(mode.label()));
        }
        self.query.mode = mode;
        Ok(())
    }

    pub fn set_search(&mut self, term: &str) {
        self.query.search = term.to_string();
    }

    pub fn select_sort(&mut self, key: SortKey) -> Result<(), ScreenError> {
        if !R::schema().supports_sort(key) {
            return Err(ScreenError::SortUnsupported(key.label()));
        }
        self.query.select_sort(key);
        Ok(())
    }

    pub fn set_period(&mut self, period: Period) -> Result<(), ScreenError> {
        if period != Period::All && !R::schema().supports_sort(SortKey::Date) {
            return Err(ScreenError::PeriodUnsupported);
        }
        self.period = period;
        Ok(())
    }

    fn open_note_editor(&mut self, client: RecordId) -> Result<(), ScreenError> {
        self.store.get(client)?;
        self.modal = Modal::NoteEditing(client);
        self.draft = None;
        self.error = None;
        Ok(())
    }
}

impl<R: Entity> Default for Screen<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct ClientWorkspace {
    pub screen: Screen<Client>,
    notes: Store<HistoryNote>,
    note_draft: Option<HistoryNote>,
    editing_note: Option<RecordId>,
}

impl ClientWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::new(),
            notes: Store::new(),
            note_draft: None,
            editing_note: None,
        }
    }

    #[must_use]
    pub fn notes(&self) -> &Store<HistoryNote> {
        &self.notes
    }

    #[must_use]
    pub fn note_draft(&self) -> Option<&HistoryNote> {
        self.note_draft.as_ref()
    }

    #[must_use]
    pub fn notes_for(&self, client: RecordId) -> Vec<&HistoryNote> {
        self.notes
            .records()
            .iter()
            .filter(|note| note.client_id == client)
            .collect()
    }

    pub fn begin_note(&mut self, client: RecordId) -> Result<(), ScreenError> {
        self.screen.open_note_editor(client)?;
        let mut draft = HistoryNote::blank();
        draft.client_id = client;
        self.note_draft = Some(draft);
        self.editing_note = None;
        debug!(client = %client, "opened note form");
        Ok(())
    }

    pub fn edit_note(&mut self, note: RecordId) -> Result<(), ScreenError> {
        let existing = self.notes.get(note)?.clone();
        self.screen.open_note_editor(existing.client_id)?;
        self.note_draft = Some(existing);
        self.editing_note = Some(note);
        debug!(%note, "opened note edit form");
        Ok(())
    }

    pub fn set_note_field(&mut self, name: &str, raw: &str) -> Result<String, ScreenError> {
        let draft = self.note_draft.as_mut().ok_or(ScreenError::NoOpenForm)?;
        let spec = HistoryNote::schema()
            .field(name)
            .ok_or_else(|| ScreenError::UnknownField(name.to_string()))?;
        Ok(spec.write(draft, raw))
    }

    pub fn set_note_kind(&mut self, kind: NoteKind) -> Result<(), ScreenError> {
        let draft = self.note_draft.as_mut().ok_or(ScreenError::NoOpenForm)?;
        draft.kind = kind;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn save_note(&mut self) -> Result<RecordId, ScreenError> {
        let Modal::NoteEditing(client) = self.screen.modal else {
            return Err(ScreenError::NoOpenForm);
        };
        let Some(draft) = self.note_draft.clone() else {
            return Err(ScreenError::NoOpenForm);
        };
        if let Err(err) = HistoryNote::schema().validate(&draft) {
            self.screen.error = Some(err.clone());
            return Err(err.into());
        }

        let id = match self.editing_note {
            Some(existing) => {
                self.notes.update(existing, draft)?;
                existing
            }
            None => self.notes.insert(draft),
        };

        self.note_draft = None;
        self.editing_note = None;
        self.screen.modal = Modal::Viewing(client);
        self.screen.error = None;
        info!(%id, client = %client, "saved history note");
        Ok(id)
    }

    pub fn cancel_note(&mut self) {
        if let Modal::NoteEditing(client) = self.screen.modal {
            self.note_draft = None;
            self.editing_note = None;
            self.screen.error = None;
            self.screen.modal = if self.screen.store.contains(client) {
                Modal::Viewing(client)
            } else {
                Modal::Closed
            };
        }
    }

    #[tracing::instrument(skip(self), fields(id = %note))]
    pub fn delete_note(&mut self, note: RecordId) -> Result<HistoryNote, ScreenError> {
        let removed = self.notes.delete(note)?;
        if self.editing_note == Some(note) {
            self.cancel_note();
        }
        Ok(removed)
    }

    #[tracing::instrument(skip(self), fields(id = %client))]
    pub fn delete_client(&mut self, client: RecordId) -> Result<Client, ScreenError> {
        let closing_note_form = matches!(
            self.screen.modal,
            Modal::NoteEditing(open) if open == client
        );
        let removed = self.screen.delete(client)?;
        if closing_note_form {
            self.note_draft = None;
            self.editing_note = None;
        }
        let retained = self.notes_for(client).len();
        if retained > 0 {
            debug!(client = %client, retained, "client deleted; history notes retained");
        }
        Ok(removed)
    }
}
