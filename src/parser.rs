//! Recursive-descent parser for the computed-column grammar.
//!
//! Grammar (whitespace already stripped):
//!
//! ```text
//! SuperExpression := Expression+
//! Expression      := OperatorComputedColumn | FunctionComputedColumn
//! OperatorComputedColumn := [ColumnName] Operator [ColumnName] [As]
//! FunctionComputedColumn := Function LeftParen ColumnName (Comma ColumnName)* RightParen [As]
//! ColumnName      := QuotedLiteral | LeftParen Expression+ RightParen
//! As              := ("AS"|"As"|"as") QuotedLiteral
//! ```
//!
//! Omitted operands around an operator are legal and deferred to the
//! semantic visitor, which resolves them against the previous computed
//! column. Parse state lives in a per-call cursor, so a shared `Parser`
//! instance never leaks state between calls.
//!
//! The parser also answers content-assist queries: given a token prefix,
//! [`Parser::content_assist`] replays the grammar over the prefix and
//! reports every token definition that could legally come next.

use std::collections::HashSet;

use crate::ast::{Expression, ExpressionChain, FunctionForm, Operand, OperatorForm};
use crate::error::{ExprResult, ExpressionError};
use crate::lexer::Token;
use crate::vocabulary::{TokenCategory, TokenDef, Vocabulary};

/// What the grammar would accept next at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expectation {
    Structural(TokenCategory),
    AnyOperator,
    AnyFunction,
}

/// Internal parse outcome: a hard grammar error, or (in assist mode) the
/// prefix ran out at a position where more input is required.
enum Abort {
    Exhausted,
    Error(String),
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    assist: bool,
    expected: Vec<Expectation>,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token], assist: bool) -> Self {
        Cursor {
            tokens,
            pos: 0,
            assist,
            expected: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> &'t Token {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    /// Record that `expectation` would be legal here. Only meaningful in
    /// assist mode, and only when the prefix is exhausted.
    fn expect(&mut self, expectation: Expectation) {
        if self.assist && !self.expected.contains(&expectation) {
            self.expected.push(expectation);
        }
    }

    /// Abort at a position where a token is required but the input ended.
    fn exhausted(&self, message: impl Into<String>) -> Abort {
        if self.assist {
            Abort::Exhausted
        } else {
            Abort::Error(message.into())
        }
    }
}

/// Parser over an immutable vocabulary, reusable across calls.
pub struct Parser<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Parser<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Parser { vocabulary }
    }

    /// Parse a cleaned token stream into an expression chain.
    ///
    /// Structural violations surface as [`ExpressionError::Parse`] carrying
    /// the first error only; no recovery is attempted.
    pub fn parse(&self, tokens: &[Token]) -> ExprResult<ExpressionChain> {
        let mut cursor = Cursor::new(tokens, false);
        match parse_chain(&mut cursor) {
            Ok(chain) => Ok(chain),
            Err(Abort::Error(message)) => Err(ExpressionError::Parse(message)),
            Err(Abort::Exhausted) => Err(ExpressionError::parse("unexpected end of expression")),
        }
    }

    /// Grammar positions reachable from a token prefix: every token
    /// definition that could legally appear next. An ungrammatical prefix
    /// yields no candidates.
    ///
    /// For the empty prefix the first two candidates are always the open
    /// parenthesis and the column-name literal; the autocomplete engine
    /// relies on that ordering when completing partial function names.
    pub fn content_assist(&self, tokens: &[Token]) -> Vec<&TokenDef> {
        let mut cursor = Cursor::new(tokens, true);
        match parse_chain(&mut cursor) {
            Ok(_) | Err(Abort::Exhausted) => self.expand(&cursor.expected),
            Err(Abort::Error(_)) => Vec::new(),
        }
    }

    fn expand(&self, expected: &[Expectation]) -> Vec<&TokenDef> {
        let mut defs: Vec<&TokenDef> = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |def: &'v TokenDef, defs: &mut Vec<&'v TokenDef>| {
            if seen.insert(def.name.clone()) {
                defs.push(def);
            }
        };

        for expectation in expected {
            match expectation {
                Expectation::Structural(category) => {
                    push(self.vocabulary.structural(*category), &mut defs);
                }
                Expectation::AnyOperator => {
                    for def in self.vocabulary.operators() {
                        push(def, &mut defs);
                    }
                }
                Expectation::AnyFunction => {
                    for def in self.vocabulary.functions() {
                        push(def, &mut defs);
                    }
                }
            }
        }

        defs
    }
}

/// Record the set of tokens that can start an expression.
fn expect_expression_start(cursor: &mut Cursor<'_>) {
    cursor.expect(Expectation::Structural(TokenCategory::LeftParen));
    cursor.expect(Expectation::Structural(TokenCategory::ColumnName));
    cursor.expect(Expectation::AnyOperator);
    cursor.expect(Expectation::AnyFunction);
}

fn parse_chain(cursor: &mut Cursor<'_>) -> Result<ExpressionChain, Abort> {
    let mut chain = Vec::new();
    loop {
        if cursor.at_end() {
            expect_expression_start(cursor);
            return Ok(chain);
        }
        chain.push(parse_expression(cursor)?);
    }
}

fn parse_expression(cursor: &mut Cursor<'_>) -> Result<Expression, Abort> {
    let token = match cursor.peek() {
        Some(token) => token,
        None => return Err(cursor.exhausted("unexpected end of expression")),
    };

    match token.category {
        TokenCategory::Function => parse_function_form(cursor).map(Expression::Function),
        TokenCategory::ColumnName | TokenCategory::LeftParen | TokenCategory::Operator => {
            parse_operator_form(cursor).map(Expression::Operator)
        }
        _ => Err(Abort::Error(format!(
            "unexpected token '{}' at offset {}",
            token.image, token.start
        ))),
    }
}

fn parse_operator_form(cursor: &mut Cursor<'_>) -> Result<OperatorForm, Abort> {
    let left = parse_operand(cursor)?;

    let operator = match cursor.peek() {
        Some(token) if token.category == TokenCategory::Operator => {
            Some(cursor.advance().clone())
        }
        Some(_) => None,
        None => {
            cursor.expect(Expectation::AnyOperator);
            if cursor.assist {
                return Err(Abort::Exhausted);
            }
            None
        }
    };

    let right = if operator.is_some() {
        parse_operand(cursor)?
    } else {
        Operand::Implicit
    };

    let alias = parse_alias(cursor)?;

    Ok(OperatorForm {
        left,
        operator,
        right,
        alias,
    })
}

fn parse_function_form(cursor: &mut Cursor<'_>) -> Result<FunctionForm, Abort> {
    let function = cursor.advance().clone();

    match cursor.peek() {
        Some(token) if token.category == TokenCategory::LeftParen => {
            cursor.advance();
        }
        Some(token) => {
            return Err(Abort::Error(format!(
                "expected '(' after function '{}', found '{}'",
                function.image, token.image
            )));
        }
        None => {
            cursor.expect(Expectation::Structural(TokenCategory::LeftParen));
            return Err(cursor.exhausted(format!(
                "expected '(' after function '{}'",
                function.image
            )));
        }
    }

    let mut args = vec![parse_argument(cursor, &function)?];
    loop {
        match cursor.peek() {
            Some(token) if token.category == TokenCategory::Comma => {
                cursor.advance();
                args.push(parse_argument(cursor, &function)?);
            }
            Some(token) if token.category == TokenCategory::RightParen => {
                cursor.advance();
                break;
            }
            Some(token) => {
                return Err(Abort::Error(format!(
                    "expected ',' or ')' in arguments of '{}', found '{}' at offset {}",
                    function.image, token.image, token.start
                )));
            }
            None => {
                cursor.expect(Expectation::Structural(TokenCategory::Comma));
                cursor.expect(Expectation::Structural(TokenCategory::RightParen));
                return Err(cursor.exhausted(format!(
                    "unmatched parenthesis: expected ')' to close '{}('",
                    function.image
                )));
            }
        }
    }

    let alias = parse_alias(cursor)?;

    Ok(FunctionForm {
        function,
        args,
        alias,
    })
}

/// An operand around an operator: a quoted column, a parenthesized nested
/// expression, or omitted entirely.
fn parse_operand(cursor: &mut Cursor<'_>) -> Result<Operand, Abort> {
    match cursor.peek() {
        Some(token) if token.category == TokenCategory::ColumnName => {
            let payload = token.payload.clone();
            cursor.advance();
            Ok(Operand::Column(payload))
        }
        Some(token) if token.category == TokenCategory::LeftParen => {
            cursor.advance();
            Ok(Operand::Nested(parse_nested(cursor)?))
        }
        Some(_) => Ok(Operand::Implicit),
        None => {
            cursor.expect(Expectation::Structural(TokenCategory::ColumnName));
            cursor.expect(Expectation::Structural(TokenCategory::LeftParen));
            if cursor.assist {
                return Err(Abort::Exhausted);
            }
            Ok(Operand::Implicit)
        }
    }
}

/// A function argument: unlike operator operands, an argument must be
/// present.
fn parse_argument(cursor: &mut Cursor<'_>, function: &Token) -> Result<Operand, Abort> {
    match cursor.peek() {
        Some(token) if token.category == TokenCategory::ColumnName => {
            let payload = token.payload.clone();
            cursor.advance();
            Ok(Operand::Column(payload))
        }
        Some(token) if token.category == TokenCategory::LeftParen => {
            cursor.advance();
            Ok(Operand::Nested(parse_nested(cursor)?))
        }
        Some(token) => Err(Abort::Error(format!(
            "function '{}' is missing a required argument; found '{}' at offset {}",
            function.image, token.image, token.start
        ))),
        None => {
            cursor.expect(Expectation::Structural(TokenCategory::ColumnName));
            cursor.expect(Expectation::Structural(TokenCategory::LeftParen));
            Err(cursor.exhausted(format!(
                "function '{}' is missing a required argument",
                function.image
            )))
        }
    }
}

/// The body of a parenthesized nested expression, ending at `)`.
fn parse_nested(cursor: &mut Cursor<'_>) -> Result<ExpressionChain, Abort> {
    let mut chain = Vec::new();
    loop {
        match cursor.peek() {
            Some(token) if token.category == TokenCategory::RightParen => {
                cursor.advance();
                return Ok(chain);
            }
            Some(_) => chain.push(parse_expression(cursor)?),
            None => {
                cursor.expect(Expectation::Structural(TokenCategory::RightParen));
                expect_expression_start(cursor);
                return Err(cursor.exhausted("unmatched parenthesis: expected ')'"));
            }
        }
    }
}

/// Optional trailing alias: `as "Name"`.
fn parse_alias(cursor: &mut Cursor<'_>) -> Result<Option<String>, Abort> {
    match cursor.peek() {
        Some(token) if token.category == TokenCategory::As => {
            cursor.advance();
            match cursor.peek() {
                Some(token) if token.category == TokenCategory::ColumnName => {
                    let payload = token.payload.clone();
                    cursor.advance();
                    Ok(Some(payload))
                }
                Some(token) => Err(Abort::Error(format!(
                    "expected column name after 'as', found '{}' at offset {}",
                    token.image, token.start
                ))),
                None => {
                    cursor.expect(Expectation::Structural(TokenCategory::ColumnName));
                    Err(cursor.exhausted("expected column name after 'as'"))
                }
            }
        }
        Some(_) => Ok(None),
        None => {
            cursor.expect(Expectation::Structural(TokenCategory::As));
            Ok(None)
        }
    }
}
