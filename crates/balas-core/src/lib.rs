//! # balas-core
//!
//! Core types, traits, and abstractions for the balas engine.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other balas crates depend on: the message and transcript models,
//! the match outcome types, the inference backend traits, and the shared
//! default constants.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
