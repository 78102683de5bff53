//! Infrastructure layer: storage, id allocation, notifications, config and
//! password hashing.

pub mod allocator;
pub mod config;
pub mod hasher;
pub mod notify;
pub mod store;

pub use allocator::EmployeeIdAllocator;
pub use config::{Config, ConfigError};
pub use hasher::BcryptHasher;
pub use notify::{BusNotifier, Notification, Notifier, WorkerHandle, spawn_notification_logger};
pub use store::{EntityStore, InMemoryEntityStore, Record, StoreError};
