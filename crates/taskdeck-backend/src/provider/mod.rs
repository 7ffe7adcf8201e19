//! Provider traits, one per remote resource family.
//!
//! Saga steps depend on these seams rather than on a concrete client, so
//! actions can be driven against the real service or the in-memory double.

mod accounts;
mod files;
mod rows;
mod sessions;
mod teams;

pub use accounts::Accounts;
pub use files::Files;
pub use rows::Rows;
pub use sessions::Sessions;
pub use teams::Teams;
