//! Shared foundational types used across the Kiln incremental build harness.
//!
//! This crate provides content hashing for cache invalidation and helpers for
//! the `/`-separated virtual paths that every other crate keys its state by.

#![warn(missing_docs)]

pub mod hash;
pub mod vpath;

pub use hash::ContentHash;
pub use vpath::{ancestors, file_name, is_absolute, join, normalize, parent_dir, Ancestors};
