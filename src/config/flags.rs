use crate::errors::ReplaceError;
use serde::Deserialize;
use serde_json::Value;

/// Which parts of the tree a call may rewrite. `None` means "use the
/// default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionFlags {
    /// Rewrite attribute values of accepted elements.
    pub attributes: Option<bool>,
    /// Rewrite text nodes.
    #[serde(alias = "characterData")]
    pub character_data: Option<bool>,
    /// Descend into child elements.
    pub subtree: Option<bool>,
}

/// Flags after merging with [`DEFAULT_FLAGS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFlags {
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
}

pub const DEFAULT_FLAGS: ResolvedFlags = ResolvedFlags {
    attributes: true,
    character_data: true,
    subtree: true,
};

impl OptionFlags {
    pub fn resolve(&self) -> Result<ResolvedFlags, ReplaceError> {
        let flags = ResolvedFlags {
            attributes: self.attributes.unwrap_or(DEFAULT_FLAGS.attributes),
            character_data: self.character_data.unwrap_or(DEFAULT_FLAGS.character_data),
            subtree: self.subtree.unwrap_or(DEFAULT_FLAGS.subtree),
        };
        if !flags.attributes && !flags.character_data {
            return Err(ReplaceError::invalid(
                "Options must have at least 'attributes' or 'characterData' set to true",
            ));
        }
        Ok(flags)
    }

    pub(crate) fn deserialize_json(value: &Value) -> Result<Self, ReplaceError> {
        OptionFlags::deserialize(value)
            .map_err(|e| ReplaceError::invalid(format!("invalid options: {e}")))
    }
}
