use crate::config::flags::{OptionFlags, ResolvedFlags};
use crate::errors::{FilterError, ReplaceError};
use crate::tree::{AttributeRef, FilterResult, NodeRef, NodeTree};
use serde_json::Value;
use std::fmt;

/// Fallible node filter.
pub type NodeFilter<'f, T> = dyn Fn(NodeRef<'_, T>) -> Result<FilterResult, FilterError> + 'f;

/// Fallible attribute filter.
pub type AttributeFilter<'f, T> = dyn Fn(AttributeRef<'_, T>) -> Result<bool, FilterError> + 'f;

/// Caller options for one replacement call.
///
/// Anything left unset falls back to [`crate::config::DEFAULT_FLAGS`], to
/// accepting every node and to accepting every attribute.
pub struct ReplaceOptions<'f, T: NodeTree> {
    flags: OptionFlags,
    accept_node: Option<Box<NodeFilter<'f, T>>>,
    accept_attribute: Option<Box<AttributeFilter<'f, T>>>,
}

impl<T: NodeTree> Default for ReplaceOptions<'_, T> {
    fn default() -> Self {
        Self::from_flags(OptionFlags::default())
    }
}

impl<T: NodeTree> fmt::Debug for ReplaceOptions<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceOptions")
            .field("flags", &self.flags)
            .field("accept_node", &self.accept_node.is_some())
            .field("accept_attribute", &self.accept_attribute.is_some())
            .finish()
    }
}

impl<'f, T: NodeTree> ReplaceOptions<'f, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flags(flags: OptionFlags) -> Self {
        Self {
            flags,
            accept_node: None,
            accept_attribute: None,
        }
    }

    /// Build options from a JSON object of flags, e.g.
    /// `{"attributes": false}`. Anything but an object is rejected, as are
    /// unknown keys and non-boolean values.
    pub fn from_json(value: &Value) -> Result<Self, ReplaceError> {
        if !value.is_object() {
            return Err(ReplaceError::invalid("Options must be an object"));
        }
        let flags = OptionFlags::deserialize_json(value)?;
        Ok(Self::from_flags(flags))
    }

    pub fn attributes(mut self, enabled: bool) -> Self {
        self.flags.attributes = Some(enabled);
        self
    }

    pub fn character_data(mut self, enabled: bool) -> Self {
        self.flags.character_data = Some(enabled);
        self
    }

    pub fn subtree(mut self, enabled: bool) -> Self {
        self.flags.subtree = Some(enabled);
        self
    }

    pub fn accept_node<F>(self, filter: F) -> Self
    where
        F: Fn(NodeRef<'_, T>) -> FilterResult + 'f,
    {
        self.try_accept_node(move |node| Ok(filter(node)))
    }

    /// Install a node filter whose errors abort the traversal.
    pub fn try_accept_node<F>(mut self, filter: F) -> Self
    where
        F: Fn(NodeRef<'_, T>) -> Result<FilterResult, FilterError> + 'f,
    {
        self.accept_node = Some(Box::new(filter));
        self
    }

    pub fn accept_attribute<F>(self, filter: F) -> Self
    where
        F: Fn(AttributeRef<'_, T>) -> bool + 'f,
    {
        self.try_accept_attribute(move |attribute| Ok(filter(attribute)))
    }

    /// Install an attribute filter whose errors abort the traversal.
    pub fn try_accept_attribute<F>(mut self, filter: F) -> Self
    where
        F: Fn(AttributeRef<'_, T>) -> Result<bool, FilterError> + 'f,
    {
        self.accept_attribute = Some(Box::new(filter));
        self
    }

    pub fn flags(&self) -> &OptionFlags {
        &self.flags
    }

    /// Merge with the defaults into a call-scoped, immutable view.
    pub fn resolve(&self) -> Result<ResolvedOptions<'_, 'f, T>, ReplaceError> {
        let flags = self.flags.resolve()?;
        Ok(ResolvedOptions {
            flags,
            accept_node: self.accept_node.as_deref(),
            accept_attribute: self.accept_attribute.as_deref(),
        })
    }
}

/// Options with defaults applied, valid for a single call.
pub struct ResolvedOptions<'o, 'f, T: NodeTree> {
    pub flags: ResolvedFlags,
    accept_node: Option<&'o NodeFilter<'f, T>>,
    accept_attribute: Option<&'o AttributeFilter<'f, T>>,
}

impl<T: NodeTree> fmt::Debug for ResolvedOptions<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("flags", &self.flags)
            .field("accept_node", &self.accept_node.is_some())
            .field("accept_attribute", &self.accept_attribute.is_some())
            .finish()
    }
}

impl<T: NodeTree> ResolvedOptions<'_, '_, T> {
    pub fn accept_node(&self, node: NodeRef<'_, T>) -> Result<FilterResult, ReplaceError> {
        match self.accept_node {
            Some(filter) => filter(node).map_err(ReplaceError::Filter),
            None => Ok(FilterResult::Accept),
        }
    }

    pub fn accept_attribute(&self, attribute: AttributeRef<'_, T>) -> Result<bool, ReplaceError> {
        match self.accept_attribute {
            Some(filter) => filter(attribute).map_err(ReplaceError::Filter),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use serde_json::json;

    #[test]
    fn defaults_enable_everything() {
        let options = ReplaceOptions::<Document>::new();
        let resolved = options.resolve().unwrap();
        assert!(resolved.flags.attributes);
        assert!(resolved.flags.character_data);
        assert!(resolved.flags.subtree);
    }

    #[test]
    fn builder_overrides_single_flag() {
        let options = ReplaceOptions::<Document>::new().subtree(false);
        let resolved = options.resolve().unwrap();
        assert!(!resolved.flags.subtree);
        assert!(resolved.flags.attributes);
    }

    #[test]
    fn disabling_both_targets_is_rejected() {
        let options = ReplaceOptions::<Document>::new()
            .attributes(false)
            .character_data(false);
        let err = options.resolve().unwrap_err();
        assert!(err.to_string().contains("'attributes' or 'characterData'"));
    }

    #[test]
    fn default_filters_accept() {
        let mut doc = Document::new();
        let el = doc.append_element(doc.root(), "el").unwrap();
        let options = ReplaceOptions::<Document>::new();
        let resolved = options.resolve().unwrap();

        let decision = resolved.accept_node(NodeRef::new(&doc, el)).unwrap();
        assert_eq!(decision, FilterResult::Accept);
        let attr = AttributeRef::new("a", "v", NodeRef::new(&doc, el));
        assert!(resolved.accept_attribute(attr).unwrap());
    }

    #[test]
    fn filter_errors_are_wrapped() {
        let mut doc = Document::new();
        let el = doc.append_element(doc.root(), "el").unwrap();
        let options =
            ReplaceOptions::<Document>::new().try_accept_node(|_| Err("filter exploded".into()));
        let resolved = options.resolve().unwrap();

        let err = resolved.accept_node(NodeRef::new(&doc, el)).unwrap_err();
        assert!(matches!(err, ReplaceError::Filter(_)));
        assert!(err.to_string().contains("filter exploded"));
    }

    #[test]
    fn from_json_requires_an_object() {
        for value in [json!(true), json!(1), json!("1"), json!(null), json!([])] {
            let err = ReplaceOptions::<Document>::from_json(&value).unwrap_err();
            assert!(err.to_string().contains("Options must be an object"), "{value}");
        }
    }

    #[test]
    fn from_json_reads_flags() {
        let options =
            ReplaceOptions::<Document>::from_json(&json!({"characterData": false})).unwrap();
        assert_eq!(options.flags().character_data, Some(false));
        assert_eq!(options.flags().attributes, None);
    }
}
