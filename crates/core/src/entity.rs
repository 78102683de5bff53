//! Entity trait: identity + continuity across state changes.

use crate::id::NumericId;

/// Entity marker + minimal interface.
pub trait Entity: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: NumericId;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Replace the identifier. Called once by the store on first save.
    fn assign_id(&mut self, id: Self::Id);
}
