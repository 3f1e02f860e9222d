//! Film, user and friendship storage for Reelmate.
//!
//! This crate provides the storage abstraction behind the film catalog and
//! the user directory. Two implementations share one contract: an in-memory
//! store for tests and single-process use, and a SQLite store for durable
//! deployments.

mod error;
mod id;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use error::*;
pub use id::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
