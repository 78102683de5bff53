use std::sync::Arc;

use thiserror::Error;

use worksphere_core::{DomainError, Entity, EntityKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} with {field} '{value}' already exists")]
    UniqueViolation {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => DomainError::Conflict(err.to_string()),
            other => DomainError::Store(other.to_string()),
        }
    }
}

/// Keyed entity storage.
///
/// - `save` assigns an id on first save (id `0`) and returns the stored copy
/// - `max_by` is the indexed-maximum query: implementations backed by a real
///   index answer it without a scan
pub trait EntityStore<E: Entity>: Send + Sync {
    fn find(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    fn save(&self, entity: E) -> Result<E, StoreError>;

    /// Returns whether a row was removed.
    fn delete(&self, id: E::Id) -> Result<bool, StoreError>;

    /// All rows ordered by id.
    fn list(&self) -> Result<Vec<E>, StoreError>;

    fn find_where(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Vec<E>, StoreError>;

    fn max_by(&self, key: &dyn Fn(&E) -> Option<u64>) -> Result<Option<u64>, StoreError>;

    fn find_one(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Option<E>, StoreError> {
        Ok(self.find_where(predicate)?.into_iter().next())
    }

    fn count_where(&self, predicate: &dyn Fn(&E) -> bool) -> Result<usize, StoreError> {
        Ok(self.find_where(predicate)?.len())
    }
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn find(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        (**self).find(id)
    }

    fn save(&self, entity: E) -> Result<E, StoreError> {
        (**self).save(entity)
    }

    fn delete(&self, id: E::Id) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<E>, StoreError> {
        (**self).list()
    }

    fn find_where(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        (**self).find_where(predicate)
    }

    fn max_by(&self, key: &dyn Fn(&E) -> Option<u64>) -> Result<Option<u64>, StoreError> {
        (**self).max_by(key)
    }
}
