//! Cache module for request results held in memory
//!
//! This module provides a fetch cache that keeps the last successfully loaded value
//! for each request key and serves it while it is younger than a fixed freshness
//! window. Stale entries are kept until the next successful load replaces them, and
//! concurrent loads for the same key are collapsed into one.

mod fetch;

pub use fetch::{EntryState, FetchCache, DEFAULT_FRESHNESS_WINDOW};
