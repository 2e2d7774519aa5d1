//! Computed-function metadata fixture shared by unit tests.
//!
//! Mirrors the full function table a table engine supplies: eleven infix
//! operators and the complete function set, including the bucket families
//! whose names overlap.

use crate::metadata::{ColumnType, FunctionCategory, FunctionMetadata, FunctionTable};

fn entry(
    name: &str,
    label: &str,
    pattern: &str,
    category: FunctionCategory,
    input_type: ColumnType,
    return_type: ColumnType,
    num_params: usize,
) -> (String, FunctionMetadata) {
    (
        name.to_string(),
        FunctionMetadata {
            name: name.to_string(),
            label: label.to_string(),
            pattern: pattern.to_string(),
            category,
            input_type,
            return_type,
            num_params,
            signature: match category {
                FunctionCategory::Operator => format!("x {} y", label),
                FunctionCategory::Function => format!("{}(x)", name),
            },
            help: String::new(),
        },
    )
}

fn operator(name: &str, label: &str, pattern: &str, ty: ColumnType, ret: ColumnType) -> (String, FunctionMetadata) {
    entry(name, label, pattern, FunctionCategory::Operator, ty, ret, 2)
}

fn function(name: &str, pattern: &str, ty: ColumnType, ret: ColumnType, num_params: usize) -> (String, FunctionMetadata) {
    entry(name, name, pattern, FunctionCategory::Function, ty, ret, num_params)
}

/// The full metadata table, keyed by function name.
pub fn full_metadata() -> FunctionTable {
    use ColumnType::{Datetime, Float, Integer, String as Str};

    [
        operator("add", "+", r"\+", Float, Float),
        operator("subtract", "-", "-", Float, Float),
        operator("multiply", "*", r"\*", Float, Float),
        operator("divide", "/", "/", Float, Float),
        operator("pow", "^", r"\^", Float, Float),
        operator("percent_of", "%", "%", Float, Float),
        operator("equals", "==", "==", Float, ColumnType::Boolean),
        operator("not_equals", "!=", "!=", Float, ColumnType::Boolean),
        operator("greater_than", ">", ">", Float, ColumnType::Boolean),
        operator("less_than", "<", "<", Float, ColumnType::Boolean),
        operator("is", "is", "is", Str, ColumnType::Boolean),
        function("sqrt", "sqrt", Float, Float, 1),
        function("pow2", "pow2", Float, Float, 1),
        function("abs", "abs", Float, Float, 1),
        function("invert", "invert", Float, Float, 1),
        function("log", "log", Float, Float, 1),
        function("exp", "exp", Float, Float, 1),
        function("bin10", "bin10", Float, Float, 1),
        function("bin100", "bin100", Float, Float, 1),
        function("bin1000", "bin1000", Float, Float, 1),
        function("bin10th", "bin10th", Float, Float, 1),
        function("bin100th", "bin100th", Float, Float, 1),
        function("bin1000th", "bin1000th", Float, Float, 1),
        function("length", "length", Str, Integer, 1),
        function("uppercase", "uppercase", Str, Str, 1),
        function("lowercase", "lowercase", Str, Str, 1),
        function("concat_comma", "concat_comma", Str, Str, 2),
        function("concat_space", "concat_space", Str, Str, 2),
        function("hour_of_day", "hour_of_day", Datetime, Integer, 1),
        function("day_of_week", "day_of_week", Datetime, Str, 1),
        function("month_of_year", "month_of_year", Datetime, Str, 1),
        function("second_bucket", "second_bucket", Datetime, Datetime, 1),
        function("minute_bucket", "minute_bucket", Datetime, Datetime, 1),
        function("hour_bucket", "hour_bucket", Datetime, Datetime, 1),
        function("day_bucket", "day_bucket", Datetime, ColumnType::Date, 1),
        function("week_bucket", "week_bucket", Datetime, ColumnType::Date, 1),
        function("month_bucket", "month_bucket", Datetime, ColumnType::Date, 1),
        function("year_bucket", "year_bucket", Datetime, ColumnType::Date, 1),
    ]
    .into_iter()
    .collect()
}
