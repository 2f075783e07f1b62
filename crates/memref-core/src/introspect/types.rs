use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared type of a member, return value or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    Bool,
    Int,
    Float,
    String,
    StringArray,
    Void,
    BoolArray,
    IntArray,
    FloatArray,
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Name of the type as the host runtime spells it.
    pub fn native_name(&self) -> &str {
        match self {
            Self::Bool => "Boolean",
            Self::Int => "Int32",
            Self::Float => "Single",
            Self::String => "String",
            Self::StringArray => "String[]",
            Self::Void => "Void",
            Self::BoolArray => "Boolean[]",
            Self::IntArray => "Int32[]",
            Self::FloatArray => "Single[]",
            Self::Named(name) => name,
        }
    }

    /// Name written into tokens and matched by `r:` and `mpt:` options.
    pub fn pretty_name(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::StringArray => "string[]",
            Self::Void => "void",
            Self::BoolArray => "bool[]",
            Self::IntArray => "int[]",
            Self::FloatArray => "float[]",
            Self::Named(name) => name,
        }
    }

    /// Older writers spelled `float[]` as `float`.
    pub(crate) fn legacy_pretty_name(&self) -> &str {
        match self {
            Self::FloatArray => "float",
            other => other.pretty_name(),
        }
    }

    /// True when `name` is either the pretty or the native spelling.
    pub fn matches_name(&self, name: &str) -> bool {
        self.pretty_name() == name || self.native_name() == name
    }

    /// Parses a pretty or native spelling; anything unknown is a named type.
    pub fn parse(name: &str) -> Self {
        match name {
            "bool" | "Boolean" => Self::Bool,
            "int" | "Int32" => Self::Int,
            "float" | "Single" => Self::Float,
            "string" | "String" => Self::String,
            "string[]" | "String[]" => Self::StringArray,
            "void" | "Void" => Self::Void,
            "bool[]" | "Boolean[]" => Self::BoolArray,
            "int[]" | "Int32[]" => Self::IntArray,
            "float[]" | "Single[]" => Self::FloatArray,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.pretty_name().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    #[serde(rename = "field")]
    Data,
    #[serde(rename = "property")]
    Accessor,
    #[serde(rename = "method")]
    Callable,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "field"),
            Self::Accessor => write!(f, "property"),
            Self::Callable => write!(f, "method"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

impl Param {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

/// One introspected member. Produced fresh by every introspection call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberDescriptor {
    Data {
        name: String,
        ty: TypeRef,
    },
    Accessor {
        name: String,
        ty: TypeRef,
    },
    Callable {
        name: String,
        return_type: TypeRef,
        params: Vec<Param>,
    },
}

impl MemberDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Data { name, .. } | Self::Accessor { name, .. } | Self::Callable { name, .. } => {
                name
            }
        }
    }

    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Data { .. } => MemberKind::Data,
            Self::Accessor { .. } => MemberKind::Accessor,
            Self::Callable { .. } => MemberKind::Callable,
        }
    }

    /// Declared type for data members and accessors, return type for callables.
    pub const fn value_type(&self) -> &TypeRef {
        match self {
            Self::Data { ty, .. } | Self::Accessor { ty, .. } => ty,
            Self::Callable { return_type, .. } => return_type,
        }
    }

    pub fn params(&self) -> &[Param] {
        match self {
            Self::Callable { params, .. } => params,
            _ => &[],
        }
    }

    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Callable { .. })
    }

    /// Checks that every name and type in the signature survives encoding
    /// as a single token fragment.
    pub fn validate(&self) -> Result<()> {
        check_fragment("member name", self.name())?;
        check_fragment("type", self.value_type().pretty_name())?;
        for param in self.params() {
            check_fragment("parameter name", &param.name)?;
            check_fragment("parameter type", param.ty.pretty_name())?;
        }
        Ok(())
    }
}

/// Characters the token grammar splits on.
const RESERVED: [char; 4] = ['/', '(', ')', ','];

fn check_fragment(what: &'static str, fragment: &str) -> Result<()> {
    let defect = if fragment.is_empty() {
        "is empty"
    } else if fragment.contains(char::is_whitespace) {
        "contains whitespace"
    } else if fragment.contains(RESERVED) {
        "contains one of '/', '(', ')' or ','"
    } else {
        return Ok(());
    };
    Err(Error::InvalidName {
        what,
        name: fragment.to_string(),
        defect,
    })
}

bitflags! {
    /// Which visibility and ownership categories an introspection query considers.
    ///
    /// Bit values are the persisted integer representation and must not change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScopeFlags: u32 {
        const DECLARED_ONLY = 1 << 1;
        const INSTANCE = 1 << 2;
        const STATIC = 1 << 3;
        const PUBLIC = 1 << 4;
        const NON_PUBLIC = 1 << 5;
    }
}

impl Default for ScopeFlags {
    fn default() -> Self {
        Self::PUBLIC | Self::INSTANCE
    }
}

impl ScopeFlags {
    /// Parses flag names such as `public`, `non_public` or `declared-only`.
    pub fn parse_list<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::empty();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let key = name.to_ascii_uppercase().replace('-', "_");
            let flag = Self::from_name(&key)
                .ok_or_else(|| Error::UnknownScopeFlag(name.to_string()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    NonPublic,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    #[default]
    Instance,
    Static,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_names() {
        assert_eq!(TypeRef::Bool.pretty_name(), "bool");
        assert_eq!(TypeRef::Int.pretty_name(), "int");
        assert_eq!(TypeRef::Float.pretty_name(), "float");
        assert_eq!(TypeRef::String.pretty_name(), "string");
        assert_eq!(TypeRef::StringArray.pretty_name(), "string[]");
        assert_eq!(TypeRef::Void.pretty_name(), "void");
        assert_eq!(TypeRef::BoolArray.pretty_name(), "bool[]");
        assert_eq!(TypeRef::IntArray.pretty_name(), "int[]");
        assert_eq!(TypeRef::named("Vector3").pretty_name(), "Vector3");
    }

    #[test]
    fn float_array_is_disambiguated() {
        assert_eq!(TypeRef::FloatArray.pretty_name(), "float[]");
        assert_eq!(TypeRef::FloatArray.legacy_pretty_name(), "float");
        assert_eq!(TypeRef::Float.legacy_pretty_name(), "float");
    }

    #[test]
    fn matches_pretty_or_native() {
        assert!(TypeRef::Int.matches_name("int"));
        assert!(TypeRef::Int.matches_name("Int32"));
        assert!(!TypeRef::Int.matches_name("Int"));
        assert!(TypeRef::named("Rect").matches_name("Rect"));
    }

    #[test]
    fn parse_accepts_both_spellings() {
        assert_eq!(TypeRef::parse("Boolean"), TypeRef::Bool);
        assert_eq!(TypeRef::parse("bool"), TypeRef::Bool);
        assert_eq!(TypeRef::parse("Single[]"), TypeRef::FloatArray);
        assert_eq!(TypeRef::parse("Color"), TypeRef::named("Color"));
    }

    #[test]
    fn descriptor_accessors() {
        let d = MemberDescriptor::Callable {
            name: "Compute".to_string(),
            return_type: TypeRef::Bool,
            params: vec![Param::new(TypeRef::Int, "x")],
        };
        assert_eq!(d.name(), "Compute");
        assert_eq!(d.kind(), MemberKind::Callable);
        assert_eq!(d.value_type(), &TypeRef::Bool);
        assert_eq!(d.params().len(), 1);

        let f = MemberDescriptor::Data {
            name: "count".to_string(),
            ty: TypeRef::Int,
        };
        assert!(f.params().is_empty());
        assert!(!f.is_callable());
    }

    #[test]
    fn scope_flags_default() {
        assert_eq!(ScopeFlags::default().bits(), 20);
    }

    #[test]
    fn scope_flags_parse_list() {
        let flags = ScopeFlags::parse_list(["public", "non-public", "static"]).unwrap();
        assert_eq!(
            flags,
            ScopeFlags::PUBLIC | ScopeFlags::NON_PUBLIC | ScopeFlags::STATIC
        );
        assert!(ScopeFlags::parse_list(["protected"]).is_err());
        assert_eq!(ScopeFlags::parse_list([""]).unwrap(), ScopeFlags::empty());
    }

    #[test]
    fn validate_rejects_unencodable_fragments() {
        let field = |name: &str, ty: TypeRef| MemberDescriptor::Data {
            name: name.to_string(),
            ty,
        };
        assert!(field("count", TypeRef::Int).validate().is_ok());
        assert!(field("count", TypeRef::named("List<int>")).validate().is_ok());

        assert!(field("", TypeRef::Int).validate().is_err());
        assert!(field("two words", TypeRef::Int).validate().is_err());
        assert!(field("Run(", TypeRef::Int).validate().is_err());
        assert!(field("a/b", TypeRef::Int).validate().is_err());
        assert!(field("map", TypeRef::named("")).validate().is_err());
        assert!(field("map", TypeRef::named("Dictionary<int, string>")).validate().is_err());

        let method = MemberDescriptor::Callable {
            name: "Run".to_string(),
            return_type: TypeRef::Void,
            params: vec![Param::new(TypeRef::Int, "a,b")],
        };
        let err = method.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter name 'a,b' contains one of '/', '(', ')' or ','"
        );
    }
}
