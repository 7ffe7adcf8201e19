//! Multi-step server actions for taskdeck.
//!
//! Every action here touches several backend resources that must appear
//! to change together. Since the backend offers no multi-resource
//! atomicity, each action runs as a saga: steps commit one at a time, and
//! the first failure rolls the already-committed ones back before the
//! action returns.

pub mod actions;
mod error;

pub use error::{ActionError, Result};
