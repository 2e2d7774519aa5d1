//! Parse tree for computed-column expressions.
//!
//! The grammar's intermediate structure is an explicit tagged union; the
//! semantic visitor is a plain recursive function over these types.

use crate::lexer::Token;

/// An operand position in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal quoted column reference, unwrapped.
    Column(String),
    /// A parenthesized nested expression chain.
    Nested(Vec<Expression>),
    /// Omitted operand, resolved against the previous computed column.
    Implicit,
}

/// One computed-column definition in infix-operator notation.
///
/// Both operands and the operator itself may be absent: an omitted operand
/// resolves to the previous computed column's output, and a form with no
/// operator is a sanctioned no-op that the visitor discards.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorForm {
    pub left: Operand,
    pub operator: Option<Token>,
    pub right: Operand,
    pub alias: Option<String>,
}

/// One computed-column definition in function-call notation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionForm {
    pub function: Token,
    pub args: Vec<Operand>,
    pub alias: Option<String>,
}

/// A single expression production.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Operator(OperatorForm),
    Function(FunctionForm),
}

impl Expression {
    /// The user-supplied alias, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Expression::Operator(form) => form.alias.as_deref(),
            Expression::Function(form) => form.alias.as_deref(),
        }
    }
}

/// A full parse: one or more expressions chained left to right. Every
/// expression after the first may omit its left/first operand, which then
/// resolves to the immediately preceding computed column.
pub type ExpressionChain = Vec<Expression>;
