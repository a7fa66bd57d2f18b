//! coursepulse-store — Response store and invitation collaborators.
//!
//! Implements the `ResponseStore` and `InvitationSource` traits from
//! `coursepulse-core`: an in-memory store for tests and single-process
//! deployments, an append-only JSON-lines file store, and a TOML-driven
//! factory for choosing between them.

pub mod config;
pub mod invitations;
pub mod jsonl;
pub mod memory;

pub use config::{build_store, StoreConfig};
pub use invitations::FixedInvitations;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
