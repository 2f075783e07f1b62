#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod introspect;
pub mod manifest;
pub mod reference;
pub mod value;

pub use codec::{decode, encode, Token};
pub use config::FilterConfig;
pub use error::{Error, Result};
pub use filter::{FilterOption, FilterQuery, MemberFilter};
pub use introspect::{
    Binding, MemberDescriptor, MemberEntry, MemberKind, Param, Reflect, ScopeFlags, TypeInfo,
    TypeRef, Typed, Visibility,
};
pub use manifest::TypeManifest;
pub use reference::{
    Diagnostics, MemberReference, PersistedReference, ReferenceState, TracingDiagnostics,
};
pub use value::{FromValue, IntoValue, Value, ValueType};
