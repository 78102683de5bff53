//! Entity persistence boundary.
//!
//! Every call is its own atomic unit: a save either lands completely
//! (including its unique-key checks) or not at all.

pub mod in_memory;
pub mod records;
pub mod r#trait;

pub use in_memory::InMemoryEntityStore;
pub use records::{Record, UniqueKey};
pub use r#trait::{EntityStore, StoreError};
