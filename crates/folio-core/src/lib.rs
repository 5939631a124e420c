//! Folio Core — shared errors, identifiers, and file utilities.
//!
//! This crate provides the foundational pieces used across all Folio
//! crates. It has no internal Folio dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`cancel`]: Cooperative cancellation for corpus scans
//! - [`traits`]: Configuration abstraction for front ends
//! - [`util`]: Identifier, path, and file utilities

pub mod cancel;
pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use cancel::{CancelHandle, CancelSignal};
pub use error::{Error, Result};
pub use traits::ConfigManager;

// Convenience re-exports from util
pub use util::ids::{generate_id, sanitize, slug_from_path, slugify, unique_slug};
