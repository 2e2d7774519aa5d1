//! Autocomplete suggestions.
//!
//! Suggestions are constructed fresh per call from static token metadata
//! and never cached. Functions are decorated with a trailing `(` and
//! operators with a trailing space, so accepting a suggestion leaves the
//! caret at the next useful position.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::metadata::ColumnType;
use crate::vocabulary::{TokenCategory, TokenDef};

/// The longest trailing run of characters that could be a partial function
/// name: everything after the last parenthesis, comma, or whitespace.
static PARTIAL_FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^(,\s]+$").unwrap());

/// One ranked autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Display text.
    pub label: String,
    /// Text to insert, including decoration.
    pub value: String,
    /// The raw pattern source of the underlying token.
    pub pattern: String,
    /// Accepted input types.
    pub input_types: Vec<ColumnType>,
    /// Result type, if the token computes a value.
    pub return_type: Option<ColumnType>,
    /// Parameter count for display.
    pub num_params: usize,
    /// Call signature for display.
    pub signature: String,
    /// One-line help text.
    pub help: String,
    /// True when this candidate stands for a column-name literal.
    pub is_column_name: bool,
}

/// Build a suggestion from a token definition, or `None` when the token has
/// no usable surface pattern.
pub fn suggestion_for(def: &TokenDef) -> Option<Suggestion> {
    if def.pattern.is_empty() {
        return None;
    }

    let text = def.pattern.replace('\\', "");
    let value = match def.category {
        TokenCategory::Function => format!("{}(", text),
        TokenCategory::Operator => format!("{} ", text),
        // The alias keyword's pattern is an alternation over its spellings;
        // insert the canonical lowercase form instead.
        TokenCategory::As => format!("{} ", def.label),
        _ => text,
    };

    Some(Suggestion {
        label: def.label.clone(),
        value,
        pattern: def.pattern.clone(),
        input_types: def.input_types.clone(),
        return_type: def.return_type,
        num_params: def.num_params,
        signature: def.signature.clone(),
        help: def.help.clone(),
        is_column_name: def.category == TokenCategory::ColumnName,
    })
}

/// Rank suggestions against a partial function name, case-insensitively:
/// candidates whose insert text starts with the partial sort before
/// candidates that merely contain it; candidates matching neither are
/// dropped. Order within each band is preserved.
pub fn rank_partial_matches(suggestions: Vec<Suggestion>, partial: &str) -> Vec<Suggestion> {
    let needle = partial.to_lowercase();
    let mut prefixed = Vec::new();
    let mut contained = Vec::new();

    for suggestion in suggestions {
        let haystack = suggestion.value.to_lowercase();
        if haystack.starts_with(&needle) {
            prefixed.push(suggestion);
        } else if haystack.contains(&needle) {
            contained.push(suggestion);
        }
    }

    prefixed.extend(contained);
    prefixed
}

/// Extract a trailing partial function name from a raw expression.
///
/// Returns `None` when the trailing run contains a quote character (the
/// user is mid-way through a column-name literal) or when there is nothing
/// completable at the end of the input.
pub fn extract_partial_function(expression: &str) -> Option<String> {
    let partial = PARTIAL_FUNCTION.find(expression)?.as_str();
    if partial.contains('"') || partial.contains('\'') {
        return None;
    }
    Some(partial.to_string())
}
