use crate::errors::ReplaceError;
use regex::{Regex, RegexBuilder};

/// Compile a pattern source with JavaScript-style flag letters.
///
/// `g` and `u` are accepted and have no effect: matching is always global and
/// always Unicode-aware. Sticky matching (`y`) has no counterpart and is
/// rejected along with unknown letters.
pub fn compile_pattern(source: &str, flags: &str) -> Result<Regex, ReplaceError> {
    let mut builder = RegexBuilder::new(source);

    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'g' | 'u' => {}
            other => {
                return Err(ReplaceError::invalid(format!(
                    "unsupported pattern flag '{other}' in /{source}/{flags}"
                )))
            }
        }
    }

    builder
        .build()
        .map_err(|e| ReplaceError::invalid(format!("invalid pattern /{source}/: {e}")))
}
