//! Event/Job Bus for the identity core (spec §4.9): event payload
//! definitions, a NATS-backed [`nats::EventBus`], and the commit-deferred
//! [`nats::PendingEvents`] queue that keeps rolled-back transactions from
//! publishing anything.

pub mod events;
pub mod nats;

pub use events::*;
pub use nats::*;
