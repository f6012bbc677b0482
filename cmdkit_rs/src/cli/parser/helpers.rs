//! Helper functions for command-line inspection before the parser runs.
//!
//! - Command suggestion (prefix match, then Levenshtein distance)
//! - Help flag detection on raw arguments

use strsim::levenshtein;

/// Tokens accepted in command position besides registered names.
pub(crate) const GLOBAL_FLAG_TOKENS: &[&str] = &["-V", "--version"];

/// Suggest a registered command name for a mistyped one.
///
/// A name that starts with the input wins (first one in registration
/// order); otherwise the closest name within distance 2.
pub(crate) fn suggest_similar_command<'a>(input: &str, names: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    if input_lower.is_empty() {
        return None;
    }

    if let Some(&prefixed) = names.iter().find(|name| name.starts_with(&input_lower)) {
        return Some(prefixed);
    }

    let mut best_match: Option<(&str, usize)> = None;
    for &name in names {
        let distance = levenshtein(&input_lower, name);
        // Only suggest if distance is small (max 2 for reasonable similarity)
        if distance <= 2 && best_match.is_none_or(|(_, best)| distance < best) {
            best_match = Some((name, distance));
        }
    }

    best_match.map(|(name, _)| name)
}

/// Whether the raw arguments ask for help anywhere.
pub(crate) fn is_help_requested(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--help" || arg == "-h")
}
