use std::collections::BTreeMap;
use std::sync::RwLock;

use worksphere_core::NumericId;

use super::records::Record;
use super::r#trait::{EntityStore, StoreError};

#[derive(Debug)]
struct Table<E> {
    rows: BTreeMap<u64, E>,
    next_id: u64,
}

/// In-memory entity table with unique-key enforcement.
///
/// Intended for tests/dev and the single-process deployment. A single
/// `RwLock` guards the table, so each call is atomic.
#[derive(Debug)]
pub struct InMemoryEntityStore<E> {
    table: RwLock<Table<E>>,
}

impl<E> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Record> InMemoryEntityStore<E> {
    fn check_unique(rows: &BTreeMap<u64, E>, candidate: &E, id: u64) -> Result<(), StoreError> {
        let keys = candidate.unique_keys();
        if keys.is_empty() {
            return Ok(());
        }
        for (other_id, other) in rows {
            if *other_id == id {
                continue;
            }
            for (field, value) in other.unique_keys() {
                if keys.iter().any(|(f, v)| *f == field && *v == value) {
                    return Err(StoreError::UniqueViolation {
                        kind: E::KIND,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<E: Record> EntityStore<E> for InMemoryEntityStore<E> {
    fn find(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.get(&id.get()).cloned())
    }

    fn save(&self, mut entity: E) -> Result<E, StoreError> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;

        let id = match entity.id().get() {
            0 => table.next_id,
            existing => existing,
        };
        Self::check_unique(&table.rows, &entity, id)?;

        entity.assign_id(E::Id::from_raw(id));
        table.next_id = table.next_id.max(id + 1);
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    fn delete(&self, id: E::Id) -> Result<bool, StoreError> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.remove(&id.get()).is_some())
    }

    fn list(&self) -> Result<Vec<E>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    fn find_where(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().filter(|e| predicate(e)).cloned().collect())
    }

    fn max_by(&self, key: &dyn Fn(&E) -> Option<u64>) -> Result<Option<u64>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().filter_map(|e| key(e)).max())
    }
}
