//! Session storage

mod memory;

pub use memory::InMemorySessionStore;
