// Session state: the store, its boot-time resolver and the event sink it reports to.

pub mod events;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use events::{SessionEvent, SessionEvents, TracingEvents};
pub use resolver::resolve_session;
pub use store::{SessionSnapshot, SessionStore, StoreOptions};
