use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::schema::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self(Uuid::nil())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: RecordId },
}

#[derive(Debug, Clone)]
pub struct Store<R> {
    records: Vec<R>,
}

impl<R: Entity> Store<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Result<&R, StoreError> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or(StoreError::NotFound { kind: R::KIND, id })
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.iter().any(|record| record.id() == id)
    }

    #[tracing::instrument(skip(self, record))]
    pub fn insert(&mut self, mut record: R) -> RecordId {
        let id = RecordId::fresh();
        record.set_id(id);
        self.records.push(record);
        debug!(kind = R::KIND, %id, count = self.records.len(), "inserted record");
        id
    }

    #[tracing::instrument(skip(self, record), fields(id = %id))]
    pub fn update(&mut self, id: RecordId, mut record: R) -> Result<(), StoreError> {
        let slot = self
            .records
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(StoreError::NotFound { kind: R::KIND, id })?;
        record.set_id(id);
        *slot = record;
        debug!(kind = R::KIND, "updated record");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: RecordId) -> Result<R, StoreError> {
        let idx = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound { kind: R::KIND, id })?;
        let removed = self.records.remove(idx);
        debug!(kind = R::KIND, count = self.records.len(), "deleted record");
        Ok(removed)
    }
}

impl<R: Entity> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;

    fn named(name: &str) -> Client {
        let mut client = Client::blank();
        client.name = name.to_string();
        client
    }

    #[test]
    fn insert_assigns_fresh_unique_ids() {
        let mut store = Store::new();
        let first = store.insert(named("Ana"));
        let second = store.insert(named("Beto"));
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).expect("first present").name, "Ana");
        assert_eq!(store.get(second).expect("second present").name, "Beto");
    }

    #[test]
    fn update_replaces_in_place_and_keeps_the_id() {
        let mut store = Store::new();
        let id = store.insert(named("Ana"));
        store.update(id, named("Ana Lima")).expect("update");
        assert_eq!(store.len(), 1);
        let updated = store.get(id).expect("still present");
        assert_eq!(updated.name, "Ana Lima");
        assert_eq!(updated.id, id);
    }

    #[test]
    fn delete_removes_by_id_and_ids_are_never_reused() {
        let mut store = Store::new();
        let first = store.insert(named("Ana"));
        store.delete(first).expect("delete");
        assert!(store.is_empty());
        assert!(matches!(
            store.get(first),
            Err(StoreError::NotFound { kind: "client", id }) if id == first
        ));

        let replacement = store.insert(named("Beto"));
        assert_ne!(replacement, first);
    }

    #[test]
    fn missing_ids_surface_not_found() {
        let mut store: Store<Client> = Store::new();
        let ghost = RecordId::fresh();
        assert!(matches!(
            store.update(ghost, named("X")),
            Err(StoreError::NotFound { kind: "client", .. })
        ));
        assert!(matches!(
            store.delete(ghost),
            Err(StoreError::NotFound { kind: "client", .. })
        ));
        assert!(!store.contains(ghost));
    }
}
