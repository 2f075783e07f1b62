mod parse;
mod types;

pub use parse::parse_token;
pub use types::{ParsedToken, Token};

use tracing::debug;

use crate::error::{Error, Result};
use crate::introspect::{self, MemberDescriptor, MemberEntry, ScopeFlags, TypeInfo, TypeRef};

pub(crate) const FIELDS: &str = "Fields";
pub(crate) const PROPERTIES: &str = "Properties";
pub(crate) const METHODS: &str = "Methods";
pub(crate) const SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Naming {
    Current,
    Legacy,
}

impl Naming {
    fn type_name(self, ty: &TypeRef) -> &str {
        match self {
            Self::Current => ty.pretty_name(),
            Self::Legacy => ty.legacy_pretty_name(),
        }
    }
}

pub fn encode(member: &MemberDescriptor) -> Token {
    match member {
        MemberDescriptor::Data { name, ty } => {
            Token::new(format!("{FIELDS}{SEPARATOR}{} {name}", ty.pretty_name()))
        }
        MemberDescriptor::Accessor { name, ty } => {
            Token::new(format!("{PROPERTIES}{SEPARATOR}{} {name}", ty.pretty_name()))
        }
        MemberDescriptor::Callable {
            name,
            return_type,
            params,
        } => {
            let params = params
                .iter()
                .map(|p| format!("{} {}", p.ty.pretty_name(), p.name))
                .collect::<Vec<_>>()
                .join(", ");
            Token::new(format!(
                "{METHODS}{SEPARATOR}{} {name} ({params})",
                return_type.pretty_name()
            ))
        }
    }
}

/// Resolves `token` against the live members of `info` under `flags`.
///
/// Returns the first member whose signature matches every fragment. Tokens
/// written before `float[]` had its own spelling are retried with the
/// legacy naming when nothing matches exactly.
pub fn decode<'a>(token: &str, info: &'a TypeInfo, flags: ScopeFlags) -> Result<&'a MemberEntry> {
    let parsed = parse_token(token)?;
    let live = introspect::members(info, flags);

    if let Some(entry) = find(&parsed, &live, Naming::Current) {
        return Ok(entry);
    }
    if let Some(entry) = find(&parsed, &live, Naming::Legacy) {
        debug!(token, type_name = info.name(), "resolved token through legacy type names");
        return Ok(entry);
    }

    Err(Error::Unresolved {
        token: token.to_string(),
        type_name: info.name().to_string(),
    })
}

fn find<'a>(
    parsed: &ParsedToken,
    live: &[&'a MemberEntry],
    naming: Naming,
) -> Option<&'a MemberEntry> {
    live.iter()
        .copied()
        .find(|entry| matches(parsed, &entry.descriptor, naming))
}

fn matches(parsed: &ParsedToken, member: &MemberDescriptor, naming: Naming) -> bool {
    match (parsed, member) {
        (
            ParsedToken::Data { ty, name },
            MemberDescriptor::Data {
                ty: live_ty,
                name: live_name,
            },
        )
        | (
            ParsedToken::Accessor { ty, name },
            MemberDescriptor::Accessor {
                ty: live_ty,
                name: live_name,
            },
        ) => ty == naming.type_name(live_ty) && name == live_name,
        (
            ParsedToken::Callable {
                return_type,
                name,
                params,
            },
            MemberDescriptor::Callable {
                return_type: live_return,
                name: live_name,
                params: live_params,
            },
        ) => {
            return_type == naming.type_name(live_return)
                && name == live_name
                && params.len() == live_params.len()
                && params
                    .iter()
                    .zip(live_params)
                    .all(|((ty, name), live)| {
                        ty == naming.type_name(&live.ty) && name == &live.name
                    })
        }
        _ => false,
    }
}
