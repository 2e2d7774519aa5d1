//! # Trellis
//!
//! Computed-column expression front end for the Trellis data grid.
//!
//! ## Architecture
//!
//! Trellis turns user-typed expression strings such as
//! `"Sales" + sqrt("Profit")` or `$'Sales' + $'Profit' as 'Total'` into
//! engine-consumable computed-column specs, and powers per-keystroke
//! autocomplete over the same grammar:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │      Computed-function metadata (from table engine)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [vocabulary]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Vocabulary (ordered token definitions, regexes)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lexer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Token stream                         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!              ┌───────────┴────────────┐
//!              ▼ [parser]               ▼ [content assist]
//! ┌───────────────────────┐  ┌───────────────────────────┐
//! │   Expression chain    │  │  Autocomplete suggestions │
//! └───────────────────────┘  └───────────────────────────┘
//!              │
//!              ▼ [visitor]
//! ┌─────────────────────────────────────────────────────────┐
//! │           Vec<ComputedColumnSpec> (to engine)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole pipeline is owned by an [`engine::ExpressionEngine`], built
//! once per metadata set and rebuilt whenever the table engine's
//! computed-function metadata changes.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod suggest;
pub mod visitor;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod test_metadata;

pub use engine::ExpressionEngine;
pub use error::{ExprResult, ExpressionError};
pub use visitor::ComputedColumnSpec;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::engine::ExpressionEngine;
    pub use crate::error::{ExprResult, ExpressionError};
    pub use crate::functions::ComputedFunction;
    pub use crate::lexer::{LexResult, Token};
    pub use crate::metadata::{
        ColumnType, FunctionCategory, FunctionMetadata, FunctionTable, Schema,
    };
    pub use crate::suggest::Suggestion;
    pub use crate::visitor::ComputedColumnSpec;
    pub use crate::vocabulary::{TokenCategory, Vocabulary};
}
