//! Composable schema rules.
//!
//! A schema is an immutable tree of [`Rule`] nodes, built once and then
//! checked against any number of documents. Checking a node that does not
//! structurally match stops descent into that node, but sibling keys and
//! array elements are still checked, so one pass reports every independent
//! violation.

use super::result::{PathedError, Violation};
use serde_json::{Map, Value};

/// JSON leaf types a rule can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    /// Integral number within `i64`
    Int,
    /// Any number
    Float,
    Str,
    Bool,
    /// Any object, contents unchecked
    Object,
    /// Any array, contents unchecked
    Array,
}

impl LeafType {
    pub fn name(self) -> &'static str {
        match self {
            LeafType::Int => "int",
            LeafType::Float => "float",
            LeafType::Str => "string",
            LeafType::Bool => "bool",
            LeafType::Object => "object",
            LeafType::Array => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            LeafType::Int => value.is_i64(),
            LeafType::Float => value.is_number(),
            LeafType::Str => value.is_string(),
            LeafType::Bool => value.is_boolean(),
            LeafType::Object => value.is_object(),
            LeafType::Array => value.is_array(),
        }
    }
}

/// A node of the schema tree
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be of a given JSON type
    Leaf(LeafType),
    /// Value must be one of a set of strings
    OneOf(Vec<String>),
    /// Value must be an object with the given fields
    Shape(Shape),
    /// Value must be an array whose every element matches
    ArrayOf(Box<Rule>),
}

/// Object rule
#[derive(Debug, Clone)]
pub struct Shape {
    fields: Vec<Field>,
    /// Reject keys not declared in `fields`
    closed: bool,
    /// Groups of keys of which at least one must be present
    any_of: Vec<Vec<String>>,
}

/// A keyed entry of a [`Shape`]
#[derive(Debug, Clone)]
pub struct Field {
    key: String,
    required: bool,
    rule: Rule,
}

/// A key that must be present and match `rule`
pub fn required(key: impl Into<String>, rule: Rule) -> Field {
    Field {
        key: key.into(),
        required: true,
        rule,
    }
}

/// A key that may be absent, but must match `rule` when present
pub fn optional(key: impl Into<String>, rule: Rule) -> Field {
    Field {
        key: key.into(),
        required: false,
        rule,
    }
}

pub fn typed(leaf: LeafType) -> Rule {
    Rule::Leaf(leaf)
}

pub fn one_of(allowed: &[&str]) -> Rule {
    Rule::OneOf(allowed.iter().map(|s| s.to_string()).collect())
}

/// Closed object: undeclared keys are violations
pub fn fixed_shape(fields: Vec<Field>) -> Rule {
    Rule::Shape(Shape {
        fields,
        closed: true,
        any_of: Vec::new(),
    })
}

/// Open object: undeclared keys are ignored
pub fn open_shape(fields: Vec<Field>) -> Rule {
    Rule::Shape(Shape {
        fields,
        closed: false,
        any_of: Vec::new(),
    })
}

pub fn array_of(element: Rule) -> Rule {
    Rule::ArrayOf(Box::new(element))
}

impl Rule {
    /// Require at least one of `keys` on an object rule
    ///
    /// Has no effect on non-object rules.
    pub fn with_any_of(mut self, keys: &[&str]) -> Rule {
        if let Rule::Shape(shape) = &mut self {
            shape.any_of.push(keys.iter().map(|k| k.to_string()).collect());
        }
        self
    }

    /// Indented, human-readable outline of the rule tree
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(0, &mut out);
        out
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        match self {
            Rule::Leaf(leaf) => out.push_str(leaf.name()),
            Rule::OneOf(allowed) => {
                out.push_str("one of ");
                out.push_str(&allowed.join(" | "));
            }
            Rule::ArrayOf(element) => {
                out.push_str("array of ");
                element.describe_into(depth, out);
            }
            Rule::Shape(shape) => {
                out.push_str(if shape.closed {
                    "object (closed)"
                } else {
                    "object (open)"
                });
                let pad = "  ".repeat(depth + 1);
                for field in &shape.fields {
                    out.push('\n');
                    out.push_str(&pad);
                    out.push_str(&field.key);
                    if !field.required {
                        out.push('?');
                    }
                    out.push_str(": ");
                    field.rule.describe_into(depth + 1, out);
                }
                for keys in &shape.any_of {
                    out.push('\n');
                    out.push_str(&pad);
                    out.push_str(&format!("(one of {} required)", keys.join(" | ")));
                }
            }
        }
    }

    /// Check `value` at `path`, appending every violation to `out`
    pub fn check(&self, value: &Value, path: &str, out: &mut Vec<PathedError>) {
        match self {
            Rule::Leaf(leaf) => {
                if !leaf.matches(value) {
                    out.push(wrong_type(path, leaf.name(), value));
                }
            }
            Rule::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => {}
                Some(s) => out.push(PathedError::new(
                    path,
                    Violation::NotAllowed {
                        value: s.to_string(),
                        allowed: allowed.clone(),
                    },
                )),
                None => out.push(wrong_type(path, LeafType::Str.name(), value)),
            },
            Rule::Shape(shape) => match value.as_object() {
                Some(map) => shape.check(map, path, out),
                None => out.push(wrong_type(path, LeafType::Object.name(), value)),
            },
            Rule::ArrayOf(element) => match value.as_array() {
                Some(items) => {
                    for (index, item) in items.iter().enumerate() {
                        element.check(item, &index_path(path, index), out);
                    }
                }
                None => out.push(wrong_type(path, LeafType::Array.name(), value)),
            },
        }
    }
}

impl Shape {
    fn check(&self, map: &Map<String, Value>, path: &str, out: &mut Vec<PathedError>) {
        for field in &self.fields {
            let child = key_path(path, &field.key);
            match map.get(&field.key) {
                Some(value) => field.rule.check(value, &child, out),
                None if field.required => out.push(PathedError::new(child, Violation::MissingKey)),
                None => {}
            }
        }

        for keys in &self.any_of {
            if !keys.iter().any(|k| map.contains_key(k)) {
                out.push(PathedError::new(
                    path,
                    Violation::MissingAnyOf { keys: keys.clone() },
                ));
            }
        }

        if self.closed {
            for key in map.keys() {
                if !self.fields.iter().any(|f| &f.key == key) {
                    out.push(PathedError::new(key_path(path, key), Violation::UnexpectedKey));
                }
            }
        }
    }
}

fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn wrong_type(path: &str, expected: &str, value: &Value) -> PathedError {
    PathedError::new(
        path,
        Violation::WrongType {
            expected: expected.to_string(),
            got: json_type_name(value).to_string(),
        },
    )
}

/// Human name of a JSON value's type
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(n) if !n.is_i64() => "int beyond i64",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(rule: &Rule, value: Value) -> Vec<PathedError> {
        let mut out = Vec::new();
        rule.check(&value, "", &mut out);
        out
    }

    #[test]
    fn test_leaf_types() {
        assert!(run(&typed(LeafType::Int), json!(3)).is_empty());
        assert!(run(&typed(LeafType::Float), json!(3)).is_empty());
        assert!(run(&typed(LeafType::Float), json!(3.5)).is_empty());
        assert_eq!(run(&typed(LeafType::Int), json!(3.5)).len(), 1);
        assert_eq!(run(&typed(LeafType::Float), json!("3.5")).len(), 1);
    }

    #[test]
    fn test_int_covers_signed_range_only() {
        assert!(run(&typed(LeafType::Int), json!(-1)).is_empty());
        assert!(run(&typed(LeafType::Int), json!(i64::MAX)).is_empty());

        let errs = run(&typed(LeafType::Int), json!(u64::MAX));
        assert_eq!(
            errs,
            vec![PathedError::new(
                "",
                Violation::WrongType {
                    expected: "int".to_string(),
                    got: "int beyond i64".to_string(),
                }
            )]
        );
    }

    #[test]
    fn test_one_of() {
        let rule = one_of(&["LBStatsfile"]);
        assert!(run(&rule, json!("LBStatsfile")).is_empty());

        let errs = run(&rule, json!("LBStats"));
        assert_eq!(
            errs[0].violation,
            Violation::NotAllowed {
                value: "LBStats".to_string(),
                allowed: vec!["LBStatsfile".to_string()],
            }
        );
        assert!(matches!(run(&rule, json!(1))[0].violation, Violation::WrongType { .. }));
    }

    #[test]
    fn test_fixed_shape_missing_vs_extra() {
        let rule = fixed_shape(vec![
            required("a", typed(LeafType::Int)),
            optional("b", typed(LeafType::Int)),
        ]);

        let missing = run(&rule, json!({"b": 1}));
        assert_eq!(missing, vec![PathedError::new("a", Violation::MissingKey)]);

        let extra = run(&rule, json!({"a": 1, "c": 2}));
        assert_eq!(extra, vec![PathedError::new("c", Violation::UnexpectedKey)]);
    }

    #[test]
    fn test_open_shape_ignores_extra() {
        let rule = open_shape(vec![required("a", typed(LeafType::Int))]);
        assert!(run(&rule, json!({"a": 1, "zzz": [1, 2]})).is_empty());
    }

    #[test]
    fn test_any_of() {
        let rule = open_shape(vec![
            optional("id", typed(LeafType::Int)),
            optional("seq_id", typed(LeafType::Int)),
        ])
        .with_any_of(&["id", "seq_id"]);

        assert!(run(&rule, json!({"seq_id": 4})).is_empty());
        let errs = run(&rule, json!({"home": 0}));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "");
    }

    #[test]
    fn test_subtree_short_circuits_but_siblings_continue() {
        let inner = fixed_shape(vec![required("x", typed(LeafType::Int))]);
        let rule = fixed_shape(vec![required("left", inner.clone()), required("right", inner)]);

        // `left` is the wrong type: one error for it, no descent into it,
        // and `right` is still checked
        let errs = run(&rule, json!({"left": "nope", "right": {}}));
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].path, "left");
        assert_eq!(errs[1], PathedError::new("right.x", Violation::MissingKey));
    }

    #[test]
    fn test_array_paths() {
        let rule = array_of(fixed_shape(vec![required("id", typed(LeafType::Int))]));
        let errs = run(&rule, json!([{"id": 0}, {"id": "one"}, {}]));
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].to_string(), "[1].id: expected int, got string");
        assert_eq!(errs[1], PathedError::new("[2].id", Violation::MissingKey));
    }

    #[test]
    fn test_describe_outline() {
        let rule = fixed_shape(vec![
            required("id", typed(LeafType::Int)),
            optional("tags", array_of(typed(LeafType::Str))),
            optional(
                "entity",
                open_shape(vec![optional("seq_id", typed(LeafType::Int))])
                    .with_any_of(&["id", "seq_id"]),
            ),
        ]);

        let expected = "object (closed)\n  id: int\n  tags?: array of string\n  entity?: object (open)\n    seq_id?: int\n    (one of id | seq_id required)";
        assert_eq!(rule.describe(), expected);
    }
}
