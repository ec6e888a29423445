//! Core types and trait definitions for the Cellar bar companion.
//!
//! No HTTP or database dependencies live here.
//! The store, enrichment, and API crates all depend on it.

// Trait futures carry explicit `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod bottle;
pub mod enrich;
pub mod error;
pub mod event;
pub mod note;
pub mod review;
pub mod store;
pub mod user;

pub use error::{Error, Result};
