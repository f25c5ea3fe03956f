//! Per-call options: rewrite flags and filter callbacks.

pub mod flags;
pub mod options;

pub use flags::{OptionFlags, ResolvedFlags, DEFAULT_FLAGS};
pub use options::{AttributeFilter, NodeFilter, ReplaceOptions, ResolvedOptions};
