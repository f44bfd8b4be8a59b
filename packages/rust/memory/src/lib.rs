//! Memory-store client and the per-recipient remember/recall adapter.
//!
//! The store is an external semantic-memory service: messages go in under a
//! namespaced identity, relevant facts come back out ranked by the store's
//! own relevance scoring (treated as an opaque ordered sequence here).

mod adapter;
mod client;

pub use adapter::{MemoryAdapter, recipient_identity};
pub use client::{MemoryClient, MemoryMessage};
