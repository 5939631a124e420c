//! Utility modules for identifiers, paths, and file discovery.
//!
//! # Modules
//!
//! - [`files`]: Async file discovery and reading utilities
//! - [`ids`]: Heading ids, slugs, and path-derived slugs
//! - [`paths`]: Home-directory expansion for configured paths

pub mod files;
pub mod ids;
pub mod paths;
