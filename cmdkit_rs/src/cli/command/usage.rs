//! Positional argument extraction from usage strings.
//!
//! `"deploy <target> [region] [tags...]"` declares three positionals after the
//! command name. Each token must be wrapped in `<>` (required) or `[]`
//! (optional); a trailing `..`/`...` inside the brackets makes it variadic.

use heck::ToLowerCamelCase;

use crate::error::CliError;

/// One positional slot declared by a usage string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    /// lowerCamelCase identifier (`project-name` -> `projectName`)
    pub id: String,
    /// Bracket contents as written, dots removed
    pub value_name: String,
    pub required: bool,
    pub variadic: bool,
}

/// Parse every positional token after the command name.
pub fn parse_usage(usage: &str) -> Result<Vec<Positional>, CliError> {
    usage
        .split_whitespace()
        .skip(1)
        .map(|token| parse_token(token, usage))
        .collect()
}

/// Ordered positional identifiers of `usage`.
pub fn args_from_usage(usage: &str) -> Result<Vec<String>, CliError> {
    Ok(parse_usage(usage)?.into_iter().map(|p| p.id).collect())
}

fn parse_token(token: &str, usage: &str) -> Result<Positional, CliError> {
    let invalid = || {
        CliError::configuration(format!(
            "expect arg \"{}\" of \"{}\" to be wrapped with \"[]\" or \"<>\"",
            token, usage
        ))
    };

    let (required, inner) = if let Some(rest) = token.strip_prefix('<') {
        (true, rest.strip_suffix('>').ok_or_else(invalid)?)
    } else if let Some(rest) = token.strip_prefix('[') {
        (false, rest.strip_suffix(']').ok_or_else(invalid)?)
    } else {
        return Err(invalid());
    };

    let name = inner.trim_end_matches('.');
    let variadic = inner.len() - name.len() >= 2;
    if name.is_empty() || inner.len() - name.len() == 1 {
        return Err(invalid());
    }

    Ok(Positional {
        id: name.to_lower_camel_case(),
        value_name: name.to_string(),
        required,
        variadic,
    })
}
