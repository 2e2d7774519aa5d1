//! The closed set of computed functions and operators.
//!
//! The semantic visitor resolves every function or operator token against
//! this enum, and default column names come from the per-variant formatter.
//! Dispatch is by enum key rather than by matching on raw token strings.

/// Every function and operator a computed column can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputedFunction {
    // Infix operators
    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
    PercentOf,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Is,

    // Numeric functions
    Sqrt,
    Pow2,
    Abs,
    Invert,
    Log,
    Exp,

    // Numeric bucket functions (two decimal-scale families)
    Bin10,
    Bin100,
    Bin1000,
    Bin10th,
    Bin100th,
    Bin1000th,

    // String functions
    Length,
    Uppercase,
    Lowercase,
    ConcatComma,
    ConcatSpace,

    // Datetime functions
    HourOfDay,
    DayOfWeek,
    MonthOfYear,

    // Datetime bucket-by-duration functions
    SecondBucket,
    MinuteBucket,
    HourBucket,
    DayBucket,
    WeekBucket,
    MonthBucket,
    YearBucket,
}

impl ComputedFunction {
    /// Resolve a lexed token image (`"+"`, `"sqrt"`, ...) to its variant.
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "+" => ComputedFunction::Add,
            "-" => ComputedFunction::Subtract,
            "*" => ComputedFunction::Multiply,
            "/" => ComputedFunction::Divide,
            "^" => ComputedFunction::Pow,
            "%" => ComputedFunction::PercentOf,
            "==" => ComputedFunction::Equals,
            "!=" => ComputedFunction::NotEquals,
            ">" => ComputedFunction::GreaterThan,
            "<" => ComputedFunction::LessThan,
            "is" => ComputedFunction::Is,

            "sqrt" => ComputedFunction::Sqrt,
            "pow2" => ComputedFunction::Pow2,
            "abs" => ComputedFunction::Abs,
            "invert" => ComputedFunction::Invert,
            "log" => ComputedFunction::Log,
            "exp" => ComputedFunction::Exp,

            "bin10" => ComputedFunction::Bin10,
            "bin100" => ComputedFunction::Bin100,
            "bin1000" => ComputedFunction::Bin1000,
            "bin10th" => ComputedFunction::Bin10th,
            "bin100th" => ComputedFunction::Bin100th,
            "bin1000th" => ComputedFunction::Bin1000th,

            "length" => ComputedFunction::Length,
            "uppercase" => ComputedFunction::Uppercase,
            "lowercase" => ComputedFunction::Lowercase,
            "concat_comma" => ComputedFunction::ConcatComma,
            "concat_space" => ComputedFunction::ConcatSpace,

            "hour_of_day" => ComputedFunction::HourOfDay,
            "day_of_week" => ComputedFunction::DayOfWeek,
            "month_of_year" => ComputedFunction::MonthOfYear,

            "second_bucket" => ComputedFunction::SecondBucket,
            "minute_bucket" => ComputedFunction::MinuteBucket,
            "hour_bucket" => ComputedFunction::HourBucket,
            "day_bucket" => ComputedFunction::DayBucket,
            "week_bucket" => ComputedFunction::WeekBucket,
            "month_bucket" => ComputedFunction::MonthBucket,
            "year_bucket" => ComputedFunction::YearBucket,

            _ => return None,
        };
        Some(func)
    }

    /// Canonical name, used as `computed_function_name` in emitted specs.
    pub fn name(&self) -> &'static str {
        match self {
            ComputedFunction::Add => "+",
            ComputedFunction::Subtract => "-",
            ComputedFunction::Multiply => "*",
            ComputedFunction::Divide => "/",
            ComputedFunction::Pow => "^",
            ComputedFunction::PercentOf => "%",
            ComputedFunction::Equals => "==",
            ComputedFunction::NotEquals => "!=",
            ComputedFunction::GreaterThan => ">",
            ComputedFunction::LessThan => "<",
            ComputedFunction::Is => "is",

            ComputedFunction::Sqrt => "sqrt",
            ComputedFunction::Pow2 => "pow2",
            ComputedFunction::Abs => "abs",
            ComputedFunction::Invert => "invert",
            ComputedFunction::Log => "log",
            ComputedFunction::Exp => "exp",

            ComputedFunction::Bin10 => "bin10",
            ComputedFunction::Bin100 => "bin100",
            ComputedFunction::Bin1000 => "bin1000",
            ComputedFunction::Bin10th => "bin10th",
            ComputedFunction::Bin100th => "bin100th",
            ComputedFunction::Bin1000th => "bin1000th",

            ComputedFunction::Length => "length",
            ComputedFunction::Uppercase => "uppercase",
            ComputedFunction::Lowercase => "lowercase",
            ComputedFunction::ConcatComma => "concat_comma",
            ComputedFunction::ConcatSpace => "concat_space",

            ComputedFunction::HourOfDay => "hour_of_day",
            ComputedFunction::DayOfWeek => "day_of_week",
            ComputedFunction::MonthOfYear => "month_of_year",

            ComputedFunction::SecondBucket => "second_bucket",
            ComputedFunction::MinuteBucket => "minute_bucket",
            ComputedFunction::HourBucket => "hour_bucket",
            ComputedFunction::DayBucket => "day_bucket",
            ComputedFunction::WeekBucket => "week_bucket",
            ComputedFunction::MonthBucket => "month_bucket",
            ComputedFunction::YearBucket => "year_bucket",
        }
    }

    /// True for the infix-operator variants.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            ComputedFunction::Add
                | ComputedFunction::Subtract
                | ComputedFunction::Multiply
                | ComputedFunction::Divide
                | ComputedFunction::Pow
                | ComputedFunction::PercentOf
                | ComputedFunction::Equals
                | ComputedFunction::NotEquals
                | ComputedFunction::GreaterThan
                | ComputedFunction::LessThan
                | ComputedFunction::Is
        )
    }

    /// Default output-column name for this function applied to `inputs`.
    ///
    /// Operators format as `(left op right)`, functions as `fn(a, b)`. The
    /// result is deterministic so that chained expressions can reference an
    /// earlier column by its generated name.
    pub fn default_column_name(&self, inputs: &[String]) -> String {
        if self.is_operator() {
            let left = inputs.first().map(String::as_str).unwrap_or("");
            let right = inputs.get(1).map(String::as_str).unwrap_or("");
            format!("({} {} {})", left, self.name(), right)
        } else {
            format!("{}({})", self.name(), inputs.join(", "))
        }
    }
}

impl std::fmt::Display for ComputedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips() {
        for name in [
            "+", "-", "*", "/", "^", "%", "==", "!=", ">", "<", "is", "sqrt", "pow2", "abs",
            "invert", "log", "exp", "bin10", "bin100", "bin1000", "bin10th", "bin100th",
            "bin1000th", "length", "uppercase", "lowercase", "concat_comma", "concat_space",
            "hour_of_day", "day_of_week", "month_of_year", "second_bucket", "minute_bucket",
            "hour_bucket", "day_bucket", "week_bucket", "month_bucket", "year_bucket",
        ] {
            let func = ComputedFunction::from_name(name)
                .unwrap_or_else(|| panic!("{} should resolve", name));
            assert_eq!(func.name(), name);
        }
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert_eq!(ComputedFunction::from_name("median"), None);
        assert_eq!(ComputedFunction::from_name(""), None);
    }

    #[test]
    fn test_operator_column_name() {
        let inputs = vec!["Sales".to_string(), "Profit".to_string()];
        assert_eq!(
            ComputedFunction::Add.default_column_name(&inputs),
            "(Sales + Profit)"
        );
        assert_eq!(
            ComputedFunction::Is.default_column_name(&inputs),
            "(Sales is Profit)"
        );
    }

    #[test]
    fn test_function_column_name() {
        assert_eq!(
            ComputedFunction::Sqrt.default_column_name(&["Profit".to_string()]),
            "sqrt(Profit)"
        );
        assert_eq!(
            ComputedFunction::ConcatComma
                .default_column_name(&["First".to_string(), "Last".to_string()]),
            "concat_comma(First, Last)"
        );
    }
}
