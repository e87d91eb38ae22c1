//! URL handling module for Finsight
//!
//! This module validates fetch targets, derives the robots.txt location for a
//! target, and matches hosts against configured host patterns.

mod matcher;
mod target;

// Re-export main types and functions
pub use matcher::matches_host_pattern;
pub use target::FetchTarget;
