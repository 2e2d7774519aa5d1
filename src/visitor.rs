//! Semantic pass over the parse tree.
//!
//! A single depth-first, left-to-right walk that turns an expression chain
//! into an ordered list of computed-column specs. Sibling productions share
//! one accumulator so that later expressions (and the enclosing production
//! of a nested parenthetical) can reference earlier results by name.

use serde::{Deserialize, Serialize};

use crate::ast::{Expression, FunctionForm, Operand, OperatorForm};
use crate::error::{ExprResult, ExpressionError};
use crate::functions::ComputedFunction;

/// The engine-consumable result of parsing one expression clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedColumnSpec {
    /// Output column name: the user-supplied alias, or a deterministic
    /// formatter-generated name.
    pub column: String,
    /// Canonical function or operator name, e.g. `"+"` or `"sqrt"`.
    pub computed_function_name: String,
    /// Ordered input column references.
    pub inputs: Vec<String>,
}

/// Walk an expression chain and emit computed-column specs in encounter
/// order.
pub fn visit(chain: &[Expression]) -> ExprResult<Vec<ComputedColumnSpec>> {
    let mut specs = Vec::new();
    visit_chain(chain, &mut specs)?;
    Ok(specs)
}

fn visit_chain(chain: &[Expression], specs: &mut Vec<ComputedColumnSpec>) -> ExprResult<()> {
    for expression in chain {
        match expression {
            Expression::Operator(form) => visit_operator(form, specs)?,
            Expression::Function(form) => visit_function(form, specs)?,
        }
    }
    Ok(())
}

fn visit_operator(form: &OperatorForm, specs: &mut Vec<ComputedColumnSpec>) -> ExprResult<()> {
    let left = resolve_operand(&form.left, specs)?;

    // A clause with no operator is a sanctioned no-op, not an error.
    let operator = match &form.operator {
        Some(token) => resolve_function(&token.image)?,
        None => return Ok(()),
    };

    let right = resolve_operand(&form.right, specs)?;

    let inputs = vec![left, right];
    let column = match &form.alias {
        Some(alias) => alias.clone(),
        None => operator.default_column_name(&inputs),
    };

    specs.push(ComputedColumnSpec {
        column,
        computed_function_name: operator.name().to_string(),
        inputs,
    });
    Ok(())
}

fn visit_function(form: &FunctionForm, specs: &mut Vec<ComputedColumnSpec>) -> ExprResult<()> {
    let function = resolve_function(&form.function.image)?;

    let mut inputs = Vec::with_capacity(form.args.len());
    for arg in &form.args {
        inputs.push(resolve_operand(arg, specs)?);
    }

    let column = match &form.alias {
        Some(alias) => alias.clone(),
        None => function.default_column_name(&inputs),
    };

    specs.push(ComputedColumnSpec {
        column,
        computed_function_name: function.name().to_string(),
        inputs,
    });
    Ok(())
}

/// Resolve an operand to a concrete column reference.
///
/// A nested parenthetical contributes its own specs to the accumulator
/// first, then resolves to the most recent one; an omitted operand resolves
/// to the most recent spec directly. Either way, an empty accumulator means
/// the expression references a previous result that does not exist.
fn resolve_operand(operand: &Operand, specs: &mut Vec<ComputedColumnSpec>) -> ExprResult<String> {
    match operand {
        Operand::Column(name) => Ok(name.clone()),
        Operand::Nested(chain) => {
            visit_chain(chain, specs)?;
            previous_column(specs)
        }
        Operand::Implicit => previous_column(specs),
    }
}

fn previous_column(specs: &[ComputedColumnSpec]) -> ExprResult<String> {
    specs
        .last()
        .map(|spec| spec.column.clone())
        .ok_or_else(|| {
            ExpressionError::Resolution(
                "expression omits an operand but no previous computed column exists".to_string(),
            )
        })
}

fn resolve_function(image: &str) -> ExprResult<ComputedFunction> {
    ComputedFunction::from_name(image).ok_or_else(|| {
        ExpressionError::parse(format!("unknown computed function '{}'", image))
    })
}
