//! Needle normalization: turning caller input into compiled substitutions.
//!
//! Needles are either literal text, matched verbatim, or caller-built regular
//! expressions. Both are applied to every match in a value, and each
//! substitution sees the output of the one before it.

pub mod flags;
pub mod normalize;
pub mod template;

pub use flags::compile_pattern;
pub use normalize::{apply_all, normalize, Needle, Needles, Replacements, Substitution};
pub use template::expand_template;
