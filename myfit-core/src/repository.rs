/*!
CRUD repositories over persisted entity collections.

Every repository stores its whole collection as one JSON array under the
entity's storage key. Each mutation reads the collection, changes it, and
writes it back in full.

Records are decoded one at a time. A record that is valid JSON but does not
fit the entity type is hidden from reads and written back unchanged, so a
single odd record never costs the rest of the collection.
*/

use crate::model::Entity;
use crate::persistence::{PersistOutcome, Persistence};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// CRUD operations over one entity collection
///
/// None of the operations fail: lookups of unknown ids yield `None`, and
/// write failures are reported through [`PersistOutcome`] without undoing
/// the caller's own copy of the data.
pub trait EntityRepository<T: Entity> {
    /// Whole collection in storage order
    fn get_all(&self) -> Vec<T>;

    /// Entity with the given id, if present
    fn get_by_id(&self, id: &str) -> Option<T>;

    /// Insert the entity, or replace the existing entity with the same id in place
    fn save(&self, entity: &T) -> PersistOutcome;

    /// Remove the entity with the given id
    fn delete_by_id(&self, id: &str) -> PersistOutcome;

    /// Overwrite the whole collection
    fn replace_all(&self, entities: &[T]) -> PersistOutcome;
}

/// Repository backed by a [`KeyValueStore`]
#[derive(Debug)]
pub struct StoreRepository<T, S: KeyValueStore> {
    persistence: Persistence<S>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, S: KeyValueStore> StoreRepository<T, S> {
    /// Create a repository over `store`
    pub fn new(store: S) -> Self {
        Self {
            persistence: Persistence::new(store),
            _entity: PhantomData,
        }
    }

    /// Storage key of the managed collection
    pub fn key(&self) -> &'static str {
        T::STORAGE_KEY
    }

    fn read(&self) -> Vec<StoredRecord<T>> {
        let raw: Vec<Value> = self.persistence.load(T::STORAGE_KEY, Vec::new());

        raw.into_iter()
            .enumerate()
            .map(|(index, value)| {
                let decoded = T::deserialize(&value);
                match decoded {
                    Ok(entity) => StoredRecord::Decoded(entity),
                    Err(e) => {
                        warn!(
                            key = T::STORAGE_KEY,
                            index,
                            error = %e,
                            "skipping record that does not decode"
                        );
                        StoredRecord::Undecodable(value)
                    }
                }
            })
            .collect()
    }

    fn write(&self, records: &[StoredRecord<T>]) -> PersistOutcome {
        self.persistence.save(T::STORAGE_KEY, records)
    }
}

/// One element of a stored collection
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum StoredRecord<T> {
    Decoded(T),
    /// Kept verbatim so that rewriting the collection does not drop it
    Undecodable(Value),
}

impl<T: Entity> StoredRecord<T> {
    fn id(&self) -> Option<&str> {
        match self {
            StoredRecord::Decoded(entity) => Some(entity.id()),
            StoredRecord::Undecodable(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

impl<T: Entity, S: KeyValueStore + Clone> Clone for StoreRepository<T, S> {
    fn clone(&self) -> Self {
        Self {
            persistence: self.persistence.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity, S: KeyValueStore> EntityRepository<T> for StoreRepository<T, S> {
    fn get_all(&self) -> Vec<T> {
        self.read()
            .into_iter()
            .filter_map(|record| match record {
                StoredRecord::Decoded(entity) => Some(entity),
                StoredRecord::Undecodable(_) => None,
            })
            .collect()
    }

    fn get_by_id(&self, id: &str) -> Option<T> {
        self.get_all().into_iter().find(|entity| entity.id() == id)
    }

    fn save(&self, entity: &T) -> PersistOutcome {
        let mut records = self.read();

        match records.iter().position(|existing| existing.id() == Some(entity.id())) {
            Some(index) => {
                debug!(key = T::STORAGE_KEY, id = entity.id(), "replacing entity");
                records[index] = StoredRecord::Decoded(entity.clone());
            }
            None => {
                debug!(key = T::STORAGE_KEY, id = entity.id(), "appending entity");
                records.push(StoredRecord::Decoded(entity.clone()));
            }
        }

        self.write(&records)
    }

    fn delete_by_id(&self, id: &str) -> PersistOutcome {
        let mut records = self.read();

        if let Some(index) = records.iter().position(|record| record.id() == Some(id)) {
            debug!(key = T::STORAGE_KEY, id, "deleting entity");
            records.remove(index);
        }

        self.write(&records)
    }

    fn replace_all(&self, entities: &[T]) -> PersistOutcome {
        debug!(key = T::STORAGE_KEY, count = entities.len(), "replacing collection");
        self.persistence.save(T::STORAGE_KEY, entities)
    }
}
