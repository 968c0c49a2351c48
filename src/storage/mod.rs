//! Persistence for the training log. [session_store::SessionStore] is the
//! single owner of history; everything above it works on in-memory
//! snapshots.

pub mod entities;
pub mod kv;
pub mod session_store;
