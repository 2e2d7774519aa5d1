//! The expression engine: one instance per schema session.
//!
//! An [`ExpressionEngine`] owns the vocabulary built from the table
//! engine's computed-function metadata and exposes the full boundary
//! surface: `lex`, `parse`, autocomplete suggestions, partial-function
//! extraction, and the token lookback helpers. It must be rebuilt when the
//! schema's computed-function metadata changes.
//!
//! All methods are synchronous, CPU-bound transformations over immutable
//! input. The engine carries no per-call mutable state, but it is not
//! internally synchronized; confine one instance to one thread or guard it
//! externally.

use crate::error::{ExprResult, ExpressionError};
use crate::lexer::{clean_tokens, LexResult, Lexer, Token};
use crate::metadata::FunctionTable;
use crate::parser::Parser;
use crate::suggest::{
    extract_partial_function, rank_partial_matches, suggestion_for, Suggestion,
};
use crate::visitor::{self, ComputedColumnSpec};
use crate::vocabulary::{TokenCategory, Vocabulary};

/// Number of content-assist candidates that never complete a bare function
/// name: the open-parenthesis and column-name rules, which always lead the
/// empty-prefix candidate list.
const NON_FUNCTION_CANDIDATES: usize = 2;

/// Expression front end bound to one schema session.
#[derive(Debug, Default)]
pub struct ExpressionEngine {
    vocabulary: Option<Vocabulary>,
}

impl ExpressionEngine {
    /// Create an uninitialized engine. Every method except `init` returns
    /// [`ExpressionError::Configuration`] until `init` succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the vocabulary from the engine's computed-function metadata.
    ///
    /// Idempotent: once initialized, further calls are no-ops and the
    /// vocabulary from the first call stays in effect.
    pub fn init(&mut self, metadata: &FunctionTable) -> ExprResult<()> {
        if self.vocabulary.is_some() {
            return Ok(());
        }
        self.vocabulary = Some(Vocabulary::build(metadata)?);
        Ok(())
    }

    /// True once `init` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.vocabulary.is_some()
    }

    fn vocabulary(&self) -> ExprResult<&Vocabulary> {
        self.vocabulary.as_ref().ok_or_else(|| {
            ExpressionError::config("expression engine used before init()")
        })
    }

    /// Tokenize an expression, keeping whitespace tokens and collecting
    /// lexical errors instead of failing. This is the raw form the
    /// autocomplete path consumes.
    pub fn tokenize(&self, expression: &str) -> ExprResult<LexResult> {
        Ok(Lexer::new(self.vocabulary()?).tokenize(expression))
    }

    /// Tokenize an expression, failing on the first lexical error. On
    /// success the result has whitespace tokens stripped.
    pub fn lex(&self, expression: &str) -> ExprResult<LexResult> {
        let mut result = self.tokenize(expression)?;
        if let Some(error) = result.errors.first() {
            return Err(ExpressionError::Lex {
                message: error.message.clone(),
                offset: error.offset,
            });
        }
        result.tokens = clean_tokens(&result.tokens);
        Ok(result)
    }

    /// Parse an expression into an ordered list of computed-column specs.
    ///
    /// Fails on the first lexical, grammatical, or resolution error; no
    /// partial results are produced.
    pub fn parse(&self, expression: &str) -> ExprResult<Vec<ComputedColumnSpec>> {
        let vocabulary = self.vocabulary()?;
        let lex_result = self.lex(expression)?;
        let chain = Parser::new(vocabulary).parse(&lex_result.tokens)?;
        visitor::visit(&chain)
    }

    /// Ranked next-token suggestions for a partially typed expression.
    ///
    /// Error-tolerant by design: lexical errors feed the partial-function
    /// fallback instead of aborting, and an unrecoverable expression yields
    /// an empty list. Only an uninitialized engine is an error.
    pub fn get_autocomplete_suggestions(
        &self,
        expression: &str,
        lex_result: Option<&LexResult>,
    ) -> ExprResult<Vec<Suggestion>> {
        let vocabulary = self.vocabulary()?;
        let parser = Parser::new(vocabulary);

        let result = match lex_result {
            // Fresh input: everything that can start an expression.
            None => map_candidates(parser.content_assist(&[])),

            Some(result) if !result.errors.is_empty() => {
                match extract_partial_function(expression) {
                    Some(partial) => {
                        let candidates = parser.content_assist(&[]);
                        let candidates =
                            &candidates[NON_FUNCTION_CANDIDATES.min(candidates.len())..];
                        rank_partial_matches(map_candidates(candidates.to_vec()), &partial)
                    }
                    // No completable trailing run: unrecoverable.
                    None => Vec::new(),
                }
            }

            Some(result) => {
                let tokens = clean_tokens(&result.tokens);
                map_candidates(parser.content_assist(&tokens))
            }
        };

        Ok(result)
    }

    /// Extract a trailing partial function name from a raw expression, if
    /// one exists.
    pub fn extract_partial_function(&self, expression: &str) -> ExprResult<Option<String>> {
        self.vocabulary()?;
        Ok(extract_partial_function(expression))
    }

    /// Scan backward through a cleaned token stream for the nearest token
    /// of any of the given categories, looking at most `limit` tokens back.
    /// A `limit` of zero, or one at least the stream length, searches the
    /// whole stream.
    pub fn last_token_of(
        &self,
        lex_result: &LexResult,
        categories: &[TokenCategory],
        limit: usize,
    ) -> Option<Token> {
        let tokens = clean_tokens(&lex_result.tokens);
        let window = if limit == 0 || limit >= tokens.len() {
            tokens.len()
        } else {
            limit
        };
        tokens
            .iter()
            .rev()
            .take(window)
            .find(|t| categories.contains(&t.category))
            .cloned()
    }

    /// Scan backward through a cleaned token stream for the nearest token
    /// with the given definition name, with the same `limit` semantics as
    /// [`Self::last_token_of`].
    pub fn last_token_named(
        &self,
        lex_result: &LexResult,
        name: &str,
        limit: usize,
    ) -> Option<Token> {
        let tokens = clean_tokens(&lex_result.tokens);
        let window = if limit == 0 || limit >= tokens.len() {
            tokens.len()
        } else {
            limit
        };
        tokens
            .iter()
            .rev()
            .take(window)
            .find(|t| t.name == name)
            .cloned()
    }

    /// The nearest function or operator token, scanning backward.
    pub fn last_function_or_operator(
        &self,
        lex_result: &LexResult,
        limit: usize,
    ) -> Option<Token> {
        self.last_token_of(
            lex_result,
            &[TokenCategory::Function, TokenCategory::Operator],
            limit,
        )
    }

    /// The nearest column-name token, scanning backward.
    pub fn last_column_name(&self, lex_result: &LexResult, limit: usize) -> Option<Token> {
        self.last_token_of(lex_result, &[TokenCategory::ColumnName], limit)
    }
}

fn map_candidates(defs: Vec<&crate::vocabulary::TokenDef>) -> Vec<Suggestion> {
    defs.into_iter().filter_map(suggestion_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_metadata::full_metadata;

    fn engine() -> ExpressionEngine {
        let mut engine = ExpressionEngine::new();
        engine.init(&full_metadata()).unwrap();
        engine
    }

    #[test]
    fn test_uninitialized_engine_is_a_configuration_error() {
        let engine = ExpressionEngine::new();
        assert!(matches!(
            engine.parse("\"a\" + \"b\""),
            Err(ExpressionError::Configuration(_))
        ));
        assert!(matches!(
            engine.get_autocomplete_suggestions("", None),
            Err(ExpressionError::Configuration(_))
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut engine = ExpressionEngine::new();
        engine.init(&full_metadata()).unwrap();

        // A second init with different metadata leaves the first vocabulary
        // in effect.
        let mut reduced = full_metadata();
        reduced.remove("sqrt");
        engine.init(&reduced).unwrap();

        let specs = engine.parse("sqrt(\"Profit\")").unwrap();
        assert_eq!(specs[0].computed_function_name, "sqrt");
    }

    #[test]
    fn test_parse_round_trip() {
        let specs = engine().parse("\"A\" * \"B\"").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].computed_function_name, "*");
        assert_eq!(specs[0].inputs, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_parse_surfaces_first_lex_error() {
        let engine = engine();
        let err = engine.parse("\"Sales\" @ \"Profit\"").unwrap_err();
        match err {
            ExpressionError::Lex { message, offset } => {
                assert_eq!(offset, 8);
                assert!(message.contains("\"@\""));
            }
            other => panic!("expected lex error, got {:?}", other),
        }
    }

    #[test]
    fn test_lex_strips_whitespace() {
        let result = engine().lex("\"a\" + \"b\"").unwrap();
        assert_eq!(result.tokens.len(), 3);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_suggestions_for_fresh_input() {
        let suggestions = engine().get_autocomplete_suggestions("", None).unwrap();
        // Open paren and column name lead, functions and operators follow.
        assert_eq!(suggestions[0].value, "(");
        assert!(suggestions[1].is_column_name);
        assert!(suggestions.iter().any(|s| s.value == "sqrt("));
        assert!(suggestions.iter().any(|s| s.value == "+ "));
    }

    #[test]
    fn test_suggestions_after_clean_prefix() {
        let engine = engine();
        let lex_result = engine.tokenize("\"Sales\" ").unwrap();
        let suggestions = engine
            .get_autocomplete_suggestions("\"Sales\" ", Some(&lex_result))
            .unwrap();
        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().all(|s| s.value.ends_with(' ')));
        assert!(suggestions.iter().any(|s| s.value == "+ "));
    }

    #[test]
    fn test_suggestions_for_partial_function_name() {
        let engine = engine();
        let lex_result = engine.tokenize("sq").unwrap();
        assert!(!lex_result.errors.is_empty());

        let suggestions = engine
            .get_autocomplete_suggestions("sq", Some(&lex_result))
            .unwrap();
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].value.starts_with("sq"));
        assert!(suggestions.iter().all(|s| s.value.to_lowercase().contains("sq")));
    }

    #[test]
    fn test_suggestions_for_unrecoverable_input() {
        let engine = engine();
        let lex_result = engine.tokenize("\"Sal").unwrap();
        assert!(!lex_result.errors.is_empty());

        let suggestions = engine
            .get_autocomplete_suggestions("\"Sal", Some(&lex_result))
            .unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_lookback_helpers() {
        let engine = engine();
        let lex_result = engine.tokenize("\"Sales\" + sqrt(\"Profit\")").unwrap();

        let last_fn = engine.last_function_or_operator(&lex_result, 0).unwrap();
        assert_eq!(last_fn.name, "sqrt");

        let last_col = engine.last_column_name(&lex_result, 0).unwrap();
        assert_eq!(last_col.payload, "Profit");

        // A narrow window stops before reaching a match.
        assert!(engine.last_function_or_operator(&lex_result, 2).is_none());
        assert_eq!(
            engine.last_token_named(&lex_result, "add", 0).unwrap().image,
            "+"
        );
    }

    #[test]
    fn test_suggest_never_fails_on_lex_errors() {
        let engine = engine();
        for input in ["@@@", "\"Sales\" @@", "sq", "(((", "\"unterminated"] {
            let lex_result = engine.tokenize(input).unwrap();
            engine
                .get_autocomplete_suggestions(input, Some(&lex_result))
                .unwrap();
        }
    }
}
