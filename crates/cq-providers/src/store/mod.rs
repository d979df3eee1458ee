//! Authoritative Store Implementations
//!
//! | Store | Description |
//! |-------|-------------|
//! | [`InMemoryDocumentStore`] | JSON documents in process memory |

pub mod memory;

pub use memory::InMemoryDocumentStore;
