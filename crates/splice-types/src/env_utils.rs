//! Environment variable parsing for splice configuration.
//!
//! Every flag the splicing machinery reads from the environment goes through
//! these helpers. Anything other than a recognized truthy value reads as off.
//!
//! # Example
//!
//! ```
//! use splice_types::env_utils::{env_bool, env_bool_or};
//!
//! let timing = env_bool("SPLICE_DEBUG_TIMING");
//! let quiet = env_bool_or("SPLICE_QUIET", true);
//! # let _ = (timing, quiet);
//! ```

/// `true` if the variable is "1", "true", "yes" or "on" (case-insensitive).
pub fn env_bool(key: &str) -> bool {
    env_bool_or(key, false)
}

/// Like [`env_bool`], with an explicit default when the variable is unset.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}
