//! Core types and trait definitions for the Dossier investigation graph.
//!
//! This crate is deliberately free of HTTP, async and file-system
//! dependencies. All other crates depend on it.

pub mod attachment;
pub mod entity;
pub mod error;
pub mod project;
pub mod relationship;
pub mod store;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
