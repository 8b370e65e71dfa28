use crate::{Parameter, ParameterIndex, ParameterType, Parameters, Value};
use itertools::Itertools;

/// Renders bound parameters for logs.
///
/// Each parameter is wrapped in square brackets. Arrays bound with an
/// array binding type are flattened into a single bracket group, other
/// arrays keep their nesting. Values with no textual form are rendered
/// as `?`. Formatting never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParameterFormatter;

impl ParameterFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Formats a parameter set as `with parameters (...)`.
    /// Returns an empty string when there are no parameters.
    pub fn format_parameters(&self, parameters: &Parameters) -> String {
        if parameters.is_empty() {
            return String::new();
        }

        let formatted = parameters
            .iter()
            .map(|(index, parameter)| match index {
                ParameterIndex::Named(name) => {
                    format!(":{} => {}", name.trim_start_matches(':'), self.format_parameter(parameter))
                }
                ParameterIndex::Positional(_) => self.format_parameter(parameter),
            })
            .join(", ");

        format!("with parameters ({})", formatted)
    }

    pub fn format_parameter(&self, parameter: &Parameter) -> String {
        self.format_value(&parameter.value, Some(parameter.value_type))
    }

    /// Formats one value with its (optional) declared binding type.
    pub fn format_value(&self, value: &Value, value_type: Option<ParameterType>) -> String {
        let flatten = value_type.is_some_and(|t| t.is_array());
        format!("[{}]", Self::value_to_string(value, flatten))
    }

    fn value_to_string(value: &Value, flatten: bool) -> String {
        match value {
            Value::NULL => String::new(),
            Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::String(_) => value.to_string(),
            Value::Boolean(b) => (if *b { "true" } else { "false" }).to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Json(json) => json.to_string(),
            Value::Uuid(uuid) => uuid.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) if !flatten => format!("[{}]", Self::value_to_string(item, false)),
                    _ => Self::value_to_string(item, flatten),
                })
                .join(", "),
            Value::Bytes(_) => "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterFormatter;
    use crate::{params, Parameter, ParameterType, Value};
    use chrono::NaiveDate;

    fn typed(value: Value, value_type: ParameterType) -> Parameter {
        Parameter::new(value, value_type)
    }

    #[test]
    fn empty_parameters_produce_nothing() {
        assert_eq!(ParameterFormatter::new().format_parameters(&params![]), "");
    }

    #[test]
    fn scalars_are_bracketed() {
        let formatter = ParameterFormatter::new();
        assert_eq!(
            formatter.format_parameters(&params![456, "tralala", 456]),
            "with parameters ([456], [tralala], [456])"
        );
        assert_eq!(
            formatter.format_parameters(&params!["one", "two"]),
            "with parameters ([one], [two])"
        );
    }

    #[test]
    fn null_renders_empty_brackets() {
        let formatter = ParameterFormatter::new();
        assert_eq!(
            formatter.format_parameters(&params![Value::NULL]),
            "with parameters ([])"
        );
    }

    #[test]
    fn booleans_render_as_words() {
        let formatter = ParameterFormatter::new();
        assert_eq!(formatter.format_value(&Value::Boolean(true), None), "[true]");
        assert_eq!(formatter.format_value(&Value::Boolean(false), None), "[false]");
    }

    #[test]
    fn datetimes_render_canonically() {
        let dt = NaiveDate::from_ymd_opt(2016, 7, 5)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();

        assert_eq!(
            ParameterFormatter::new().format_value(&Value::from(dt), None),
            "[2016-07-05 01:00:00]"
        );
    }

    #[test]
    fn array_types_are_flattened() {
        let formatter = ParameterFormatter::new();
        let params = params![typed(Value::from(vec![456, 3, 456]), ParameterType::IntegerArray)];
        assert_eq!(formatter.format_parameters(&params), "with parameters ([456, 3, 456])");

        let nested = Value::Array(vec![Value::from(vec![1, 2]), Value::Int(3)]);
        assert_eq!(
            formatter.format_value(&nested, Some(ParameterType::IntegerArray)),
            "[1, 2, 3]"
        );
    }

    #[test]
    fn untyped_nested_arrays_keep_their_nesting() {
        let nested = Value::Array(vec![Value::from(vec![1, 2]), Value::Int(3)]);
        assert_eq!(
            ParameterFormatter::new().format_value(&nested, None),
            "[[1, 2], 3]"
        );
    }

    #[test]
    fn grouped_arrays_render_successive_groups() {
        let params = params![
            typed(Value::from(vec![1, 2]), ParameterType::IntegerArray),
            typed(Value::from(vec![3, 4, 5]), ParameterType::IntegerArray),
        ];

        assert_eq!(
            ParameterFormatter::new().format_parameters(&params),
            "with parameters ([1, 2], [3, 4, 5])"
        );
    }

    #[test]
    fn opaque_values_render_a_placeholder() {
        assert_eq!(
            ParameterFormatter::new().format_value(&Value::Bytes(vec![0, 1, 2]), None),
            "[?]"
        );
    }

    #[test]
    fn named_parameters_render_their_names() {
        assert_eq!(
            ParameterFormatter::new().format_parameters(&params!["one" => "one", "two" => "two"]),
            "with parameters (:one => [one], :two => [two])"
        );
    }

    #[test]
    fn brackets_are_balanced_for_every_arity() {
        let formatter = ParameterFormatter::new();
        for arity in 0..6 {
            let values: Vec<i64> = (0..arity).collect();
            let value = Value::from(values);
            let out = formatter.format_value(&value, None);
            assert_eq!(out.matches('[').count(), out.matches(']').count());
            assert_eq!(out.matches(", ").count(), arity.saturating_sub(1) as usize);
        }
    }
}
