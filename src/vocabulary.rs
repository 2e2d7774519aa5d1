//! Token vocabulary construction.
//!
//! The vocabulary is built once per schema session from the engine's
//! computed-function metadata. Pattern priority is fixed at construction:
//! structural tokens first, then the metadata-declared functions and
//! operators, then the numeric bucket family ordered longest-name-first, and
//! finally the case-conversion tokens. The lexer tries patterns in exactly
//! this order, so the ordering is what keeps overlapping names (`bin100` vs
//! `bin10`) from shadowing each other.

use regex::Regex;
use std::collections::HashSet;

use crate::error::{ExprResult, ExpressionError};
use crate::metadata::{ColumnType, FunctionCategory, FunctionMetadata, FunctionTable};

/// Lexical category of a token definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Whitespace,
    Comma,
    /// The alias keyword (`AS` / `As` / `as`).
    As,
    /// A quoted column-name literal.
    ColumnName,
    LeftParen,
    RightParen,
    Function,
    Operator,
}

/// One lexable token definition.
#[derive(Debug, Clone)]
pub struct TokenDef {
    /// Unique name within the vocabulary, e.g. `"sqrt"` or `"comma"`.
    pub name: String,
    /// Human-readable display text.
    pub label: String,
    /// Raw pattern source, as supplied by the metadata.
    pub pattern: String,
    /// Lexical category.
    pub category: TokenCategory,
    /// Accepted input types, with float/integer and datetime/date declared
    /// interchangeable.
    pub input_types: Vec<ColumnType>,
    /// Result type, if the token computes a value.
    pub return_type: Option<ColumnType>,
    /// Parameter count, for autocomplete display only.
    pub num_params: usize,
    /// Call signature, for autocomplete display only.
    pub signature: String,
    /// Help text, for autocomplete display only.
    pub help: String,
    regex: Regex,
}

impl TokenDef {
    /// Length of the match at the start of `input`, if this token matches.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.regex.find(input).map(|m| m.end())
    }
}

/// The bucket/bin functions whose names are prefixes of one another.
/// Registration is deferred until after every other metadata entry, in this
/// order, so a longer name always outranks its shorter siblings.
const BIN_FUNCTIONS: [&str; 6] = ["bin1000th", "bin1000", "bin100th", "bin100", "bin10th", "bin10"];

/// Case-conversion functions, registered absolute last.
const CASE_FUNCTIONS: [&str; 2] = ["uppercase", "lowercase"];

/// Structural token patterns, seeded ahead of every metadata entry.
const STRUCTURAL_TOKENS: [(&str, &str, &str, TokenCategory); 6] = [
    ("whitespace", "whitespace", r"\s+", TokenCategory::Whitespace),
    ("comma", ",", ",", TokenCategory::Comma),
    ("as", "as", "(AS|As|as)", TokenCategory::As),
    (
        "columnName",
        "Column Name",
        // "name", 'name', or the dollar-quoted $'name' form.
        r#""(?:[^"\\]|\\.)*"|\$?'(?:[^'\\]|\\.)*'"#,
        TokenCategory::ColumnName,
    ),
    ("leftParen", "(", r"\(", TokenCategory::LeftParen),
    ("rightParen", ")", r"\)", TokenCategory::RightParen),
];

/// An ordered, immutable set of token definitions for one schema session.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    defs: Vec<TokenDef>,
}

impl Vocabulary {
    /// Build a vocabulary from the engine's computed-function metadata.
    ///
    /// Fails with [`ExpressionError::Configuration`] if the metadata is
    /// empty, an entry is missing its name or pattern, a pattern does not
    /// compile, or two entries share a name.
    pub fn build(metadata: &FunctionTable) -> ExprResult<Self> {
        if metadata.is_empty() {
            return Err(ExpressionError::config(
                "computed-function metadata is empty",
            ));
        }

        let mut defs = Vec::with_capacity(STRUCTURAL_TOKENS.len() + metadata.len());
        let mut names = HashSet::new();

        for (name, label, pattern, category) in STRUCTURAL_TOKENS.iter() {
            defs.push(structural_token(name, label, pattern, *category)?);
            names.insert(name.to_string());
        }

        let deferred: HashSet<&str> = BIN_FUNCTIONS
            .iter()
            .chain(CASE_FUNCTIONS.iter())
            .copied()
            .collect();

        for meta in metadata.values() {
            if deferred.contains(meta.name.as_str()) {
                continue;
            }
            push_unique(&mut defs, &mut names, make_token(meta)?)?;
        }

        // Longer bin names first, then the case tokens absolute last.
        for name in BIN_FUNCTIONS.iter().chain(CASE_FUNCTIONS.iter()) {
            if let Some(meta) = metadata.get(*name) {
                push_unique(&mut defs, &mut names, make_token(meta)?)?;
            }
        }

        Ok(Vocabulary { defs })
    }

    /// Token definitions in match-priority order.
    pub fn defs(&self) -> &[TokenDef] {
        &self.defs
    }

    /// Look up a token definition by name.
    pub fn get(&self, name: &str) -> Option<&TokenDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// The single structural definition of the given category.
    pub fn structural(&self, category: TokenCategory) -> &TokenDef {
        self.defs
            .iter()
            .find(|d| d.category == category)
            .unwrap_or_else(|| unreachable!("structural tokens are always seeded"))
    }

    /// Operator definitions, in vocabulary order.
    pub fn operators(&self) -> impl Iterator<Item = &TokenDef> {
        self.defs
            .iter()
            .filter(|d| d.category == TokenCategory::Operator)
    }

    /// Function definitions, in vocabulary order.
    pub fn functions(&self) -> impl Iterator<Item = &TokenDef> {
        self.defs
            .iter()
            .filter(|d| d.category == TokenCategory::Function)
    }
}

fn push_unique(
    defs: &mut Vec<TokenDef>,
    names: &mut HashSet<String>,
    def: TokenDef,
) -> ExprResult<()> {
    if !names.insert(def.name.clone()) {
        return Err(ExpressionError::config(format!(
            "duplicate token name {:?} in computed-function metadata",
            def.name
        )));
    }
    defs.push(def);
    Ok(())
}

fn structural_token(
    name: &str,
    label: &str,
    pattern: &str,
    category: TokenCategory,
) -> ExprResult<TokenDef> {
    Ok(TokenDef {
        name: name.to_string(),
        label: label.to_string(),
        pattern: pattern.to_string(),
        category,
        input_types: Vec::new(),
        return_type: None,
        num_params: 0,
        signature: String::new(),
        help: String::new(),
        regex: compile_anchored(pattern)?,
    })
}

fn make_token(meta: &FunctionMetadata) -> ExprResult<TokenDef> {
    if meta.name.is_empty() || meta.pattern.is_empty() {
        return Err(ExpressionError::config(format!(
            "metadata entry {:?} is missing a name or pattern",
            meta.name
        )));
    }

    // float/int and date/datetime are interchangeable.
    let input_types = match meta.input_type {
        ColumnType::Float => vec![ColumnType::Float, ColumnType::Integer],
        ColumnType::Datetime => vec![ColumnType::Datetime, ColumnType::Date],
        other => vec![other],
    };

    let category = match meta.category {
        FunctionCategory::Function => TokenCategory::Function,
        FunctionCategory::Operator => TokenCategory::Operator,
    };

    Ok(TokenDef {
        name: meta.name.clone(),
        label: meta.label.clone(),
        pattern: meta.pattern.clone(),
        category,
        input_types,
        return_type: Some(meta.return_type),
        num_params: meta.num_params,
        signature: meta.signature.clone(),
        help: meta.help.clone(),
        regex: compile_anchored(&meta.pattern)?,
    })
}

fn compile_anchored(pattern: &str) -> ExprResult<Regex> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
        ExpressionError::config(format!("invalid token pattern {:?}: {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_metadata::full_metadata;

    #[test]
    fn test_empty_metadata_is_a_configuration_error() {
        let metadata = FunctionTable::new();
        let err = Vocabulary::build(&metadata).unwrap_err();
        assert!(matches!(err, ExpressionError::Configuration(_)));
    }

    #[test]
    fn test_missing_pattern_is_a_configuration_error() {
        let mut metadata = full_metadata();
        metadata.get_mut("sqrt").unwrap().pattern.clear();
        let err = Vocabulary::build(&metadata).unwrap_err();
        assert!(matches!(err, ExpressionError::Configuration(_)));
    }

    #[test]
    fn test_structural_tokens_come_first() {
        let vocab = Vocabulary::build(&full_metadata()).unwrap();
        let categories: Vec<TokenCategory> =
            vocab.defs().iter().take(6).map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![
                TokenCategory::Whitespace,
                TokenCategory::Comma,
                TokenCategory::As,
                TokenCategory::ColumnName,
                TokenCategory::LeftParen,
                TokenCategory::RightParen,
            ]
        );
    }

    #[test]
    fn test_bin_functions_are_deferred_longest_first() {
        let vocab = Vocabulary::build(&full_metadata()).unwrap();
        let names: Vec<&str> = vocab.defs().iter().map(|d| d.name.as_str()).collect();

        let tail: Vec<&str> = names[names.len() - 8..].to_vec();
        assert_eq!(
            tail,
            vec![
                "bin1000th",
                "bin1000",
                "bin100th",
                "bin100",
                "bin10th",
                "bin10",
                "uppercase",
                "lowercase",
            ]
        );
    }

    #[test]
    fn test_float_input_expands_to_integer() {
        let vocab = Vocabulary::build(&full_metadata()).unwrap();
        let sqrt = vocab.get("sqrt").unwrap();
        assert_eq!(sqrt.input_types, vec![ColumnType::Float, ColumnType::Integer]);
    }

    #[test]
    fn test_datetime_input_expands_to_date() {
        let vocab = Vocabulary::build(&full_metadata()).unwrap();
        let bucket = vocab.get("day_bucket").unwrap();
        assert_eq!(
            bucket.input_types,
            vec![ColumnType::Datetime, ColumnType::Date]
        );
    }

    #[test]
    fn test_column_name_pattern_matches_all_quoting_forms() {
        let vocab = Vocabulary::build(&full_metadata()).unwrap();
        let def = vocab.structural(TokenCategory::ColumnName);
        assert_eq!(def.match_len("\"Sales\" + 1"), Some(7));
        assert_eq!(def.match_len("'Sales'"), Some(7));
        assert_eq!(def.match_len("$'Sales'"), Some(8));
        assert_eq!(def.match_len("Sales"), None);
    }
}
