//! Canonical rendering of parsed statements.
//!
//! The [`Normalizer`] walks the raw parse tree and produces the
//! JSON-shaped output tree:
//!
//! - single-item clause lists collapse to the bare item,
//! - string literals are wrapped as `{"literal": ..}` so they never read as
//!   column names,
//! - absent clauses are omitted rather than written as `null`,
//! - operator and function applications follow the selected [`CallStyle`].

mod expression;
mod query;
mod statement;

use serde_json::{Map, Value};

use crate::ast::Statement;
use crate::options::CallStyle;

/// Renders parse trees as canonical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalizer {
    style: CallStyle,
}

impl Normalizer {
    /// Creates a normalizer for the given call style.
    #[must_use]
    pub const fn new(style: CallStyle) -> Self {
        Self { style }
    }

    /// Returns the call style in use.
    #[must_use]
    pub const fn style(&self) -> CallStyle {
        self.style
    }

    /// Renders one statement.
    #[must_use]
    pub fn statement(&self, statement: &Statement) -> Value {
        self.render_statement(statement)
    }

    /// Renders an operator or function application.
    ///
    /// In nested style the name is the key and keyword arguments are
    /// siblings: `{"sum": "x"}`, `{"flatten": {}, "input": "y"}`. In
    /// normalized style the shape is `{"op": name, "args": [..], "kwargs":
    /// {..}}` with empty parts left out.
    pub(crate) fn call(&self, name: &str, args: Vec<Value>, kwargs: Map<String, Value>) -> Value {
        let mut map = Map::new();
        match self.style {
            CallStyle::Nested => {
                let args = match args.len() {
                    0 => Value::Object(Map::new()),
                    _ => collapse(args),
                };
                map.insert(name.to_string(), args);
                map.extend(kwargs);
            }
            CallStyle::Normalized => {
                map.insert("op".to_string(), Value::String(name.to_string()));
                if !args.is_empty() {
                    map.insert("args".to_string(), Value::Array(args));
                }
                if !kwargs.is_empty() {
                    map.insert("kwargs".to_string(), Value::Object(kwargs));
                }
            }
        }
        Value::Object(map)
    }
}

/// Collapses a one-item list to the item itself.
pub(crate) fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.pop().unwrap_or(Value::Null)
    } else {
        Value::Array(values)
    }
}

/// Renders a list whose items are all `{"literal": s}` as one
/// `{"literal": [s, ..]}`; any other list collapses as usual.
pub(crate) fn literal_list(values: Vec<Value>) -> Value {
    if values.len() > 1 && values.iter().all(|value| literal_text(value).is_some()) {
        let texts = values
            .iter()
            .filter_map(literal_text)
            .map(|text| Value::String(text.to_string()))
            .collect();
        return single("literal", Value::Array(texts));
    }
    collapse(values)
}

fn literal_text(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get("literal").and_then(Value::as_str),
        _ => None,
    }
}

/// Builds `{key: value}`.
pub(crate) fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Wraps text as a tagged literal.
pub(crate) fn literal(text: &str) -> Value {
    single("literal", Value::String(text.to_string()))
}

/// Renders a list of names with the collapsing rule.
pub(crate) fn names(names: &[String]) -> Value {
    collapse(names.iter().cloned().map(Value::String).collect())
}

/// Inserts `key: true` when `flag` is set.
pub(crate) fn insert_flag(map: &mut Map<String, Value>, key: &str, flag: bool) {
    if flag {
        map.insert(key.to_string(), Value::Bool(true));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_collapse() {
        assert_eq!(collapse(vec![json!("a")]), json!("a"));
        assert_eq!(collapse(vec![json!("a"), json!("b")]), json!(["a", "b"]));
        assert_eq!(collapse(Vec::new()), json!([]));
    }

    #[test]
    fn test_literal_list_merges_strings() {
        let merged = literal_list(vec![literal("JAN"), literal("FEB")]);
        assert_eq!(merged, json!({"literal": ["JAN", "FEB"]}));

        let mixed = literal_list(vec![literal("JAN"), json!(1)]);
        assert_eq!(mixed, json!([{"literal": "JAN"}, 1]));

        assert_eq!(literal_list(vec![literal("x")]), json!({"literal": "x"}));
    }

    #[test]
    fn test_nested_call_shapes() {
        let normalizer = Normalizer::new(CallStyle::Nested);
        assert_eq!(normalizer.call("seq4", Vec::new(), Map::new()), json!({"seq4": {}}));
        assert_eq!(
            normalizer.call("sum", vec![json!("x")], Map::new()),
            json!({"sum": "x"})
        );
        let mut kwargs = Map::new();
        kwargs.insert("rowcount".to_string(), json!(10));
        assert_eq!(
            normalizer.call("generator", Vec::new(), kwargs),
            json!({"generator": {}, "rowcount": 10})
        );
    }

    #[test]
    fn test_normalized_call_shapes() {
        let normalizer = Normalizer::new(CallStyle::Normalized);
        assert_eq!(normalizer.call("seq4", Vec::new(), Map::new()), json!({"op": "seq4"}));
        assert_eq!(
            normalizer.call("uniform", vec![json!(1), json!(10)], Map::new()),
            json!({"op": "uniform", "args": [1, 10]})
        );
        let mut kwargs = Map::new();
        kwargs.insert("rowcount".to_string(), json!(10));
        assert_eq!(
            normalizer.call("generator", Vec::new(), kwargs),
            json!({"op": "generator", "kwargs": {"rowcount": 10}})
        );
    }
}
