use serde::{Deserialize, Serialize};

use crate::introspect::ScopeFlags;

/// Storage-independent shape of a saved member reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedReference {
    /// Host-chosen identifier of the target, `None` when unset.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_scope_bits")]
    pub scope_flags: u32,
}

impl Default for PersistedReference {
    fn default() -> Self {
        Self {
            target: None,
            token: String::new(),
            scope_flags: default_scope_bits(),
        }
    }
}

impl PersistedReference {
    /// Unknown bits are dropped.
    pub const fn scope(&self) -> ScopeFlags {
        ScopeFlags::from_bits_truncate(self.scope_flags)
    }
}

fn default_scope_bits() -> u32 {
    ScopeFlags::default().bits()
}
