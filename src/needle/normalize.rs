use crate::errors::ReplaceError;
use crate::needle::flags::compile_pattern;
use crate::needle::template::expand_template;
use regex::{Captures, NoExpand, Regex, Replacer};
use serde_json::Value;
use std::borrow::Cow;

const NEEDLE_SHAPE: &str = "Needle must be a string, RegExp or Array of such";
const REPLACEMENT_SHAPE: &str = "Replacement must be a string or Array of such";

/// A single search term.
#[derive(Debug, Clone)]
pub enum Needle {
    /// Matched verbatim and case-sensitively.
    Literal(String),
    /// Matched as a regular expression; its replacement may use capture
    /// references.
    Pattern(Regex),
}

impl From<&str> for Needle {
    fn from(value: &str) -> Self {
        Needle::Literal(value.to_string())
    }
}

impl From<String> for Needle {
    fn from(value: String) -> Self {
        Needle::Literal(value)
    }
}

impl From<&String> for Needle {
    fn from(value: &String) -> Self {
        Needle::Literal(value.clone())
    }
}

impl From<Regex> for Needle {
    fn from(value: Regex) -> Self {
        Needle::Pattern(value)
    }
}

impl From<&Regex> for Needle {
    fn from(value: &Regex) -> Self {
        Needle::Pattern(value.clone())
    }
}

impl TryFrom<&Value> for Needle {
    type Error = ReplaceError;

    /// A JSON string is a literal; an object `{"pattern": "...", "flags": "..."}`
    /// is a regular expression.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Needle::Literal(text.clone())),
            Value::Object(map) => {
                let source = map
                    .get("pattern")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ReplaceError::invalid(NEEDLE_SHAPE))?;
                let flags = match map.get("flags") {
                    None | Some(Value::Null) => "",
                    Some(Value::String(flags)) => flags.as_str(),
                    Some(_) => return Err(ReplaceError::invalid("pattern flags must be a string")),
                };
                compile_pattern(source, flags).map(Needle::Pattern)
            }
            _ => Err(ReplaceError::invalid(NEEDLE_SHAPE)),
        }
    }
}

/// One or more needles. A single needle is treated as a one-element list.
#[derive(Debug, Clone)]
pub struct Needles(Vec<Needle>);

impl Needles {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Needle> {
        self.0.iter()
    }
}

impl From<Needle> for Needles {
    fn from(value: Needle) -> Self {
        Needles(vec![value])
    }
}

impl From<&str> for Needles {
    fn from(value: &str) -> Self {
        Needles(vec![value.into()])
    }
}

impl From<String> for Needles {
    fn from(value: String) -> Self {
        Needles(vec![value.into()])
    }
}

impl From<Regex> for Needles {
    fn from(value: Regex) -> Self {
        Needles(vec![value.into()])
    }
}

impl From<&Regex> for Needles {
    fn from(value: &Regex) -> Self {
        Needles(vec![value.into()])
    }
}

impl<N: Into<Needle>> From<Vec<N>> for Needles {
    fn from(value: Vec<N>) -> Self {
        Needles(value.into_iter().map(Into::into).collect())
    }
}

impl<N: Into<Needle>, const K: usize> From<[N; K]> for Needles {
    fn from(value: [N; K]) -> Self {
        Needles(value.into_iter().map(Into::into).collect())
    }
}

impl<N: Clone + Into<Needle>> From<&[N]> for Needles {
    fn from(value: &[N]) -> Self {
        Needles(value.iter().cloned().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for Needles {
    type Error = ReplaceError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(_) | Value::Object(_) => Needle::try_from(item),
                    _ => Err(ReplaceError::invalid(NEEDLE_SHAPE)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Needles),
            other => Needle::try_from(other).map(Needles::from),
        }
    }
}

/// One or more replacement strings. A single string is treated as a
/// one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacements(Vec<String>);

impl Replacements {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<&str> for Replacements {
    fn from(value: &str) -> Self {
        Replacements(vec![value.to_string()])
    }
}

impl From<String> for Replacements {
    fn from(value: String) -> Self {
        Replacements(vec![value])
    }
}

impl<S: Into<String>> From<Vec<S>> for Replacements {
    fn from(value: Vec<S>) -> Self {
        Replacements(value.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const K: usize> From<[S; K]> for Replacements {
    fn from(value: [S; K]) -> Self {
        Replacements(value.into_iter().map(Into::into).collect())
    }
}

impl<S: Clone + Into<String>> From<&[S]> for Replacements {
    fn from(value: &[S]) -> Self {
        Replacements(value.iter().cloned().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for Replacements {
    type Error = ReplaceError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Replacements(vec![text.clone()])),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ReplaceError::invalid(REPLACEMENT_SHAPE))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Replacements),
            _ => Err(ReplaceError::invalid(REPLACEMENT_SHAPE)),
        }
    }
}

/// A compiled needle paired with its replacement.
#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    replacement: String,
    literal: bool,
}

impl Substitution {
    pub fn literal(needle: &str, replacement: impl Into<String>) -> Result<Self, ReplaceError> {
        let pattern = Regex::new(&regex::escape(needle))
            .map_err(|e| ReplaceError::invalid(format!("cannot compile needle {needle:?}: {e}")))?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
            literal: true,
        })
    }

    pub fn pattern(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
            literal: false,
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Replace every match in `value`. Borrows when nothing matched.
    pub fn apply<'v>(&self, value: &'v str) -> Cow<'v, str> {
        if self.literal {
            self.pattern
                .replace_all(value, NoExpand(&self.replacement))
        } else {
            self.pattern.replace_all(
                value,
                TemplateReplacer {
                    template: &self.replacement,
                    haystack: value,
                    named_groups: self.pattern.capture_names().flatten().next().is_some(),
                },
            )
        }
    }
}

struct TemplateReplacer<'a> {
    template: &'a str,
    haystack: &'a str,
    named_groups: bool,
}

impl Replacer for TemplateReplacer<'_> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        expand_template(self.template, caps, self.haystack, self.named_groups, dst);
    }
}

/// Pair needles with replacements and compile them, preserving order.
///
/// After a scalar on either side has been wrapped into a one-element list, the
/// two lists must be the same length.
pub fn normalize(
    needles: impl Into<Needles>,
    replacements: impl Into<Replacements>,
) -> Result<Vec<Substitution>, ReplaceError> {
    let needles = needles.into();
    let replacements = replacements.into();

    if needles.len() != replacements.len() {
        return Err(ReplaceError::LengthMismatch {
            needles: needles.len(),
            replacements: replacements.len(),
        });
    }

    needles
        .0
        .into_iter()
        .zip(replacements.0)
        .map(|(needle, replacement)| match needle {
            Needle::Literal(text) => Substitution::literal(&text, replacement),
            Needle::Pattern(pattern) => Ok(Substitution::pattern(pattern, replacement)),
        })
        .collect()
}

/// Apply every substitution in order; each sees the previous one's output.
pub fn apply_all<'v>(substitutions: &[Substitution], value: &'v str) -> Cow<'v, str> {
    let mut current = Cow::Borrowed(value);
    for substitution in substitutions {
        let next = match substitution.apply(&current) {
            Cow::Owned(next) => Some(next),
            Cow::Borrowed(_) => None,
        };
        if let Some(next) = next {
            current = Cow::Owned(next);
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_needle_is_escaped() {
        let subs = normalize(r"\{\{var(\d+)\}\}", "val$1").unwrap();
        assert_eq!(subs[0].apply("{{var001}}"), "{{var001}}");
        assert_eq!(subs[0].apply(r"x\{\{var(\d+)\}\}x"), "xval$1x");
    }

    #[test]
    fn literal_replacement_is_verbatim() {
        let subs = normalize("{{var1}}", "val$1 $$ $&").unwrap();
        assert_eq!(subs[0].apply("{{var1}}"), "val$1 $$ $&");
    }

    #[test]
    fn literal_matches_every_occurrence() {
        let subs = normalize("{{var1}}", "val1").unwrap();
        assert_eq!(
            subs[0].apply("{{var1}},{{var1}} {{var2}},{{var2}}"),
            "val1,val1 {{var2}},{{var2}}"
        );
    }

    #[test]
    fn literal_is_case_sensitive() {
        let subs = normalize("abc", "x").unwrap();
        assert_eq!(subs[0].apply("ABC abc"), "ABC x");
    }

    #[test]
    fn pattern_uses_backreferences_globally() {
        let re = Regex::new(r"\{\{var(\d)\}\}").unwrap();
        let subs = normalize(re, "val$1").unwrap();
        assert_eq!(subs[0].apply("{{var1}} {{var2}}"), "val1 val2");
    }

    #[test]
    fn substitutions_compose_in_order() {
        let subs = normalize(["a", "b"], ["b", "c"]).unwrap();
        assert_eq!(apply_all(&subs, "a"), "c");

        let subs = normalize(["b", "a"], ["c", "b"]).unwrap();
        assert_eq!(apply_all(&subs, "a"), "b");
    }

    #[test]
    fn untouched_value_is_borrowed() {
        let subs = normalize("zzz", "y").unwrap();
        assert!(matches!(apply_all(&subs, "abc"), Cow::Borrowed("abc")));
    }

    #[test]
    fn mixed_needles() {
        let re = Regex::new("n1").unwrap();
        let needles: Vec<Needle> = vec![re.into(), "n2".into()];
        let subs = normalize(needles, ["r1", "r2"]).unwrap();
        assert!(!subs[0].is_literal());
        assert!(subs[1].is_literal());
        assert_eq!(apply_all(&subs, "n1 n2"), "r1 r2");
    }

    #[test]
    fn singular_pairs_are_accepted() {
        assert!(normalize(vec!["n"], "r").is_ok());
        assert!(normalize("n", vec!["r"]).is_ok());
        assert!(normalize(Regex::new("n").unwrap(), ["r"]).is_ok());
    }

    #[test]
    fn slices_are_accepted() {
        let needles = ["a", "b"];
        let replacements = vec!["1".to_string(), "2".to_string()];
        let subs = normalize(&needles[..], replacements.as_slice()).unwrap();
        assert_eq!(apply_all(&subs, "ab"), "12");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = normalize(["n1", "n2"], "r").unwrap_err();
        assert!(matches!(
            err,
            ReplaceError::LengthMismatch {
                needles: 2,
                replacements: 1
            }
        ));
        assert!(normalize("n", ["r1", "r2"]).is_err());
    }

    #[test]
    fn needles_from_json() {
        let needles = Needles::try_from(&json!(["a", {"pattern": "b+", "flags": "gi"}])).unwrap();
        assert_eq!(needles.len(), 2);
        assert!(matches!(needles.iter().nth(1), Some(Needle::Pattern(_))));

        let single = Needles::try_from(&json!("a")).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn needles_from_json_reject_other_shapes() {
        for value in [json!(1), json!(true), json!(null), json!({}), json!([1]), json!([["a"]])] {
            let err = Needles::try_from(&value).unwrap_err();
            assert!(err.to_string().contains(NEEDLE_SHAPE), "{value}");
        }
    }

    #[test]
    fn replacements_from_json() {
        assert_eq!(Replacements::try_from(&json!("r")).unwrap().len(), 1);
        assert_eq!(Replacements::try_from(&json!(["r1", "r2"])).unwrap().len(), 2);

        for value in [json!(1), json!(null), json!({}), json!(["r", 2])] {
            assert!(Replacements::try_from(&value).is_err(), "{value}");
        }
    }
}
