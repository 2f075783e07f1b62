mod parse;
mod types;

pub use parse::{parse_option, parse_options};
pub use types::FilterOption;

use crate::codec::{self, Token};
use crate::introspect::{self, MemberDescriptor, MemberEntry, MemberKind, ScopeFlags, TypeInfo};

/// A list of options, all of which a member must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    options: Vec<FilterOption>,
}

impl FilterQuery {
    pub fn parse<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            options: parse_options(options),
        }
    }

    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn matches(&self, member: &MemberDescriptor) -> bool {
        self.options.iter().all(|option| option.matches(member))
    }
}

impl From<Vec<FilterOption>> for FilterQuery {
    fn from(options: Vec<FilterOption>) -> Self {
        Self { options }
    }
}

/// Decides which members of a type are offered to a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFilter {
    pub fields: bool,
    pub properties: bool,
    pub methods: bool,
    pub scope: ScopeFlags,
    pub query: FilterQuery,
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self {
            fields: true,
            properties: true,
            methods: true,
            scope: ScopeFlags::default(),
            query: FilterQuery::default(),
        }
    }
}

impl MemberFilter {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            query: FilterQuery::parse(options),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_categories(mut self, fields: bool, properties: bool, methods: bool) -> Self {
        self.fields = fields;
        self.properties = properties;
        self.methods = methods;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: ScopeFlags) -> Self {
        self.scope = scope;
        self
    }

    pub const fn allows_kind(&self, kind: MemberKind) -> bool {
        match kind {
            MemberKind::Data => self.fields,
            MemberKind::Accessor => self.properties,
            MemberKind::Callable => self.methods,
        }
    }

    pub fn is_valid_member(&self, member: &MemberDescriptor) -> bool {
        self.allows_kind(member.kind()) && self.query.matches(member)
    }

    pub fn select<'a>(&self, info: &'a TypeInfo) -> Vec<&'a MemberEntry> {
        introspect::members(info, self.scope)
            .into_iter()
            .filter(|entry| self.is_valid_member(&entry.descriptor))
            .collect()
    }

    /// Tokens of every selected member, in introspection order.
    pub fn candidates(&self, info: &TypeInfo) -> Vec<Token> {
        self.select(info)
            .into_iter()
            .map(|entry| codec::encode(&entry.descriptor))
            .collect()
    }
}
