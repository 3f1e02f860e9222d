//! Core entity definitions for Reelmate.
//!
//! This crate defines the data types shared across the Reelmate workspace:
//! films, users, their friendship edges, the genre and MPA reference data,
//! and the field validation rules every store and service relies on.

mod film;
mod reference;
mod user;
mod validation;

pub use film::*;
pub use reference::*;
pub use user::*;
pub use validation::*;
