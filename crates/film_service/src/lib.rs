//! Film catalog, user directory and rating facade for Reelmate.
//!
//! The services in this crate sit between callers and a [`FilmStore`]. They
//! validate input, resolve references, and turn missing records into
//! [`ServiceError::NotFound`]. [`RatingFacade`] ties the catalog and the
//! directory together for operations that span films and users.
//!
//! [`FilmStore`]: film_store::FilmStore

mod error;
mod facade;
mod film_catalog;
mod reference;
mod user_directory;

pub use error::*;
pub use facade::*;
pub use film_catalog::*;
pub use reference::*;
pub use user_directory::*;
