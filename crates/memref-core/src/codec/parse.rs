use crate::error::{Error, Result};

use super::types::ParsedToken;
use super::{FIELDS, METHODS, PROPERTIES, SEPARATOR};

pub fn parse_token(token: &str) -> Result<ParsedToken> {
    let Some((category, signature)) = token.split_once(SEPARATOR) else {
        return Err(Error::UnknownCategory(token.to_string()));
    };

    match category {
        FIELDS => {
            let (ty, name) = split_pair(signature)
                .ok_or_else(|| malformed(token, "expected '<type> <name>'"))?;
            Ok(ParsedToken::Data { ty, name })
        }
        PROPERTIES => {
            let (ty, name) = split_pair(signature)
                .ok_or_else(|| malformed(token, "expected '<type> <name>'"))?;
            Ok(ParsedToken::Accessor { ty, name })
        }
        METHODS => parse_callable(token, signature),
        _ => Err(Error::UnknownCategory(token.to_string())),
    }
}

fn parse_callable(token: &str, signature: &str) -> Result<ParsedToken> {
    let parts: Vec<&str> = signature.split('(').filter(|p| !p.is_empty()).collect();
    let [head, tail] = parts.as_slice() else {
        return Err(malformed(token, "expected exactly one parameter list"));
    };

    let (return_type, name) = split_pair(head)
        .ok_or_else(|| malformed(token, "expected '<return type> <name>'"))?;

    let params = tail
        .trim_end()
        .trim_end_matches(')')
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            split_pair(p).ok_or_else(|| malformed(token, "expected '<type> <name>' parameter"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedToken::Callable {
        return_type,
        name,
        params,
    })
}

/// Splits on whitespace into exactly two fragments.
fn split_pair(input: &str) -> Option<(String, String)> {
    let mut parts = input.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Some((first.to_string(), second.to_string())),
        _ => None,
    }
}

fn malformed(token: &str, reason: &'static str) -> Error {
    Error::MalformedToken {
        token: token.to_string(),
        reason,
    }
}
