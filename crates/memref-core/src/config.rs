use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::MemberFilter;
use crate::introspect::ScopeFlags;

pub const SCOPE_ENV: &str = "MEMREF_SCOPE";
pub const FILTER_ENV: &str = "MEMREF_FILTER";
pub const CATEGORIES_ENV: &str = "MEMREF_CATEGORIES";

/// Serializable form of a [`MemberFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub fields: bool,
    pub properties: bool,
    pub methods: bool,
    /// Flag names, e.g. `["public", "instance"]`.
    pub scope: Vec<String>,
    pub options: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fields: true,
            properties: true,
            methods: true,
            scope: vec!["public".to_string(), "instance".to_string()],
            options: Vec::new(),
        }
    }
}

impl FilterConfig {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Overrides settings from `MEMREF_SCOPE`, `MEMREF_FILTER` and
    /// `MEMREF_CATEGORIES` when they are set.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(scope) = lookup(SCOPE_ENV) {
            self.scope = split_list(&scope, ',');
        }
        if let Some(filter) = lookup(FILTER_ENV) {
            self.options = split_list(&filter, ';');
        }
        if let Some(categories) = lookup(CATEGORIES_ENV) {
            let enabled = split_list(&categories, ',');
            let has = |name: &str| enabled.iter().any(|c| c.eq_ignore_ascii_case(name));
            self.fields = has("fields");
            self.properties = has("properties");
            self.methods = has("methods");
        }
        self
    }

    pub fn scope_flags(&self) -> Result<ScopeFlags> {
        ScopeFlags::parse_list(&self.scope)
    }

    pub fn to_filter(&self) -> Result<MemberFilter> {
        Ok(MemberFilter::new(&self.options)
            .with_categories(self.fields, self.properties, self.methods)
            .with_scope(self.scope_flags()?))
    }
}

fn split_list(input: &str, separator: char) -> Vec<String> {
    input
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
