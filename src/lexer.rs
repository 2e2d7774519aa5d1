//! Lexer for computed-column expressions.
//!
//! Tokenizes a raw expression string against the vocabulary's ordered
//! pattern list: at each position the first definition that matches wins,
//! and the construction-time ordering of the vocabulary guarantees that the
//! first match is also the intended longest one. Tokenizing is stateless
//! per call; the only shared state is the immutable vocabulary.

use crate::vocabulary::{TokenCategory, TokenDef, Vocabulary};

/// A lexed token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Name of the matching token definition.
    pub name: String,
    /// Lexical category of the matching definition.
    pub category: TokenCategory,
    /// The raw matched text.
    pub image: String,
    /// The unwrapped value: for column-name literals the bare name without
    /// quotes, otherwise identical to `image`.
    pub payload: String,
    /// Byte offset of the match in the original input. Positions always
    /// refer to the raw string, even after whitespace is filtered out.
    pub start: usize,
}

/// A lexical error: some input segment matched no token pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    /// Error message, carrying the offending substring and position.
    pub message: String,
    /// Byte offset of the unmatched segment.
    pub offset: usize,
    /// The unmatched segment itself.
    pub text: String,
}

/// The raw result of tokenizing one expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexResult {
    /// Tokens lexed so far, whitespace included.
    pub tokens: Vec<Token>,
    /// Lexical errors; non-empty means tokenization stopped early.
    pub errors: Vec<LexError>,
}

/// Tokenizer over an immutable vocabulary.
pub struct Lexer<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Lexer<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Lexer { vocabulary }
    }

    /// Tokenize `input`, returning all tokens up to the first unmatched
    /// segment. On an unmatched segment, a single [`LexError`] is recorded
    /// and scanning stops.
    pub fn tokenize(&self, input: &str) -> LexResult {
        let mut result = LexResult::default();
        let mut pos = 0;

        'scan: while pos < input.len() {
            let rest = &input[pos..];
            for def in self.vocabulary.defs() {
                if let Some(len) = def.match_len(rest) {
                    if len == 0 {
                        continue;
                    }
                    let image = &rest[..len];
                    result.tokens.push(make_token(def, image, pos));
                    pos += len;
                    continue 'scan;
                }
            }

            // No pattern matched: collect the unmatched run for the error
            // message, then stop.
            let text = unmatched_run(self.vocabulary, input, pos);
            result.errors.push(LexError {
                message: format!(
                    "unexpected characters {:?} at offset {}: not a column name, function, or operator",
                    text, pos
                ),
                offset: pos,
                text,
            });
            break;
        }

        result
    }
}

fn make_token(def: &TokenDef, image: &str, start: usize) -> Token {
    let payload = match def.category {
        TokenCategory::ColumnName => unquote(image),
        _ => image.to_string(),
    };
    Token {
        name: def.name.clone(),
        category: def.category,
        image: image.to_string(),
        payload,
        start,
    }
}

/// Strip the quoting from a column-name literal (`"x"`, `'x'`, `$'x'`).
fn unquote(image: &str) -> String {
    let bare = image.strip_prefix('$').unwrap_or(image);
    let bare = bare
        .strip_prefix(['"', '\''])
        .and_then(|s| s.strip_suffix(['"', '\'']))
        .unwrap_or(bare);
    bare.to_string()
}

/// The run of characters starting at `pos` that no token pattern matches.
fn unmatched_run(vocabulary: &Vocabulary, input: &str, pos: usize) -> String {
    let mut end = pos;
    while end < input.len() {
        let rest = &input[end..];
        if vocabulary
            .defs()
            .iter()
            .any(|d| d.match_len(rest).is_some_and(|l| l > 0))
        {
            break;
        }
        end += rest.chars().next().map_or(1, char::len_utf8);
    }
    input[pos..end].to_string()
}

/// Strip whitespace tokens from a stream, preserving raw positions.
pub fn clean_tokens(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| t.category != TokenCategory::Whitespace)
        .cloned()
        .collect()
}
