//! Boundary types consumed from the table engine.
//!
//! The engine supplies two pieces of data before the expression front end can
//! operate: a schema mapping column names to primitive types, and a
//! computed-function metadata table describing every function and operator
//! available for computed columns. Both arrive as plain data (typically
//! JSON) and deserialize into the types here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive column types understood by the table engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
        };
        write!(f, "{}", name)
    }
}

/// Whether a metadata entry is surfaced in function-call or infix notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCategory {
    Function,
    Operator,
}

/// One entry in the computed-function metadata table.
///
/// `pattern` is a regular-expression source matched against the remaining
/// input during lexing; for most functions it is simply the function name,
/// while operators escape their symbol (e.g. `\+`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Unique token name, e.g. `"sqrt"` or `"add"`.
    pub name: String,
    /// Human-readable display text.
    pub label: String,
    /// Regular-expression source for the lexer.
    pub pattern: String,
    /// Function-call or infix-operator surface form.
    pub category: FunctionCategory,
    /// Declared input type; expanded to interchangeable siblings at
    /// vocabulary construction (float/integer, datetime/date).
    pub input_type: ColumnType,
    /// Type of the computed column this function produces.
    pub return_type: ColumnType,
    /// Number of parameters; informs autocomplete only, not parsing.
    #[serde(default)]
    pub num_params: usize,
    /// Call signature for display, e.g. `"sqrt(x)"`.
    #[serde(default)]
    pub signature: String,
    /// One-line help text.
    #[serde(default)]
    pub help: String,
}

/// The computed-function metadata table, keyed by function name.
///
/// A `BTreeMap` keeps vocabulary construction deterministic: token pattern
/// priority must be fixed at build time.
pub type FunctionTable = BTreeMap<String, FunctionMetadata>;

/// Schema mapping column name to primitive type.
pub type Schema = BTreeMap<String, ColumnType>;
