//! Domain events and the in-process bus that carries them.
//!
//! Workflows publish facts (a leave request was submitted, a request was
//! decided) and side-effect consumers such as the notification logger
//! subscribe. Publishing never blocks the publishing operation.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
