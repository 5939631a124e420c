//! Integration test suite for the Folio page store.
//!
//! Exercises the store over the JSON file backend across process-like
//! restarts, and the markdown import/export path end to end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod integration;
