//! Collaborator implementations.
//!
//! * [`InMemoryIdentityStore`] - Thread-safe in-memory store implementing every
//!   collaborator trait, for tests and local experimentation
//!
//! A deployment talking to a live Keycloak server supplies its own
//! implementations of the traits in [`crate::services`].

pub mod in_memory;

pub use in_memory::{InMemoryIdentityStats, InMemoryIdentityStore};
