//! Shared types for the pending-splice workspace.
//!
//! - [`Item`] - one element of an input sequence, ready or pending
//! - [`is_pending`] - the classifier predicate
//! - [`Rejection`] - the first failure reported by an aggregation
//! - [`SpliceConfig`] - environment-driven settings

pub mod env_utils;
pub mod item;
pub mod rejection;

pub use item::{count_pending, is_pending, Item};
pub use rejection::Rejection;

use env_utils::env_bool;

/// Env var enabling `[timing]` lines on stderr.
pub const ENV_DEBUG_TIMING: &str = "SPLICE_DEBUG_TIMING";

/// Settings for a splice call. None of these change results.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SpliceConfig {
    /// Emit `[timing] stage=...` lines to stderr.
    pub timing: bool,
}

impl SpliceConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            timing: env_bool(ENV_DEBUG_TIMING),
        }
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }
}
