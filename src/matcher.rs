//! Recursive matching of values against descriptors.
//!
//! Matching is pure: it reads the value and the descriptor, and on failure
//! returns the trail to the first offending sub-value instead of a bare
//! boolean. Recursion depth is bounded by descriptor nesting.
use std::fmt;

use thiserror::Error;

use crate::descriptor::Descriptor;
use crate::diagnostic::describe_value;
use crate::value::Value;

// -------------------------------- Paths ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Field/index chain from the root value to a sub-value, rendered `[2].x[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self { Self::default() }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn segments(&self) -> &[Segment] { &self.0 }

    fn push(&mut self, segment: Segment) { self.0.push(segment); }

    fn pop(&mut self) { self.0.pop(); }

    fn truncate(&mut self, depth: usize) { self.0.truncate(depth); }

    fn depth(&self) -> usize { self.0.len() }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    /// Build from textual segments; all-digit segments become indices.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path(
            iter.into_iter()
                .map(Into::into)
                .map(|s: String| match s.parse::<usize>() {
                    Ok(i) => Segment::Index(i),
                    Err(_) => Segment::Field(s),
                })
                .collect(),
        )
    }
}

// ------------------------------- Results ---------------------------------- //

/// Where matching failed, what was expected there and what was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value{path}: expected {expected}, received {actual}")]
pub struct Mismatch {
    pub path: Path,
    pub expected: String,
    pub actual: String,
}

pub type MatchResult = Result<(), Mismatch>;

// ------------------------------- Matching --------------------------------- //

static UNDEFINED: Value = Value::Undefined;

pub fn matches(value: &Value, descriptor: &Descriptor) -> MatchResult {
    let mut path = Path::root();
    check(value, descriptor, &mut path)
}

fn check(value: &Value, descriptor: &Descriptor, path: &mut Path) -> MatchResult {
    match descriptor {
        Descriptor::Primitive(p) => {
            if p.admits(value) { Ok(()) } else { Err(mismatch(path, descriptor, value)) }
        }
        Descriptor::ClassInstance(class) => match value {
            Value::Instance(instance) if instance.class().is_a(class) => Ok(()),
            _ => Err(mismatch(path, descriptor, value)),
        },
        Descriptor::ArrayOf(element) => {
            let Value::Array(items) = value else {
                return Err(mismatch(path, descriptor, value));
            };
            for (i, item) in items.iter().enumerate() {
                path.push(Segment::Index(i));
                check(item, element, path)?;
                path.pop();
            }
            Ok(())
        }
        Descriptor::OneOf(literals) => match value {
            Value::String(s) if literals.iter().any(|lit| lit == s) => Ok(()),
            _ => Err(mismatch(path, descriptor, value)),
        },
        Descriptor::Optional(inner) => {
            if value.is_nullish() { Ok(()) } else { check(value, inner, path) }
        }
        Descriptor::ShapeOf(fields) => {
            if !matches!(value, Value::Object(_) | Value::Instance(_)) {
                return Err(mismatch(path, descriptor, value));
            }
            for (name, field_descriptor) in fields {
                // absent fields read as undefined
                let field = value.field(name).unwrap_or(&UNDEFINED);
                path.push(Segment::Field(name.clone()));
                check(field, field_descriptor, path)?;
                path.pop();
            }
            Ok(())
        }
        Descriptor::UnionOf(alternatives) => {
            let depth = path.depth();
            for alternative in alternatives {
                if check(value, alternative, path).is_ok() {
                    return Ok(());
                }
                path.truncate(depth);
            }
            Err(mismatch(path, descriptor, value))
        }
    }
}

fn mismatch(path: &Path, expected: &Descriptor, actual: &Value) -> Mismatch {
    Mismatch {
        path: path.clone(),
        expected: expected.to_string(),
        actual: describe_value(actual),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        Primitive, any, array_of, boolean, function, instance_of, null, number, object, one_of,
        optional, shape_of, string, symbol, undefined, union_of,
    };
    use crate::value::ClassRef;
    use proptest::prelude::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn path_of(result: MatchResult) -> String {
        result.expect_err("expected a mismatch").path.to_string()
    }

    #[test]
    fn any_matches_everything() {
        for value in [Value::Undefined, Value::Null, v(json!(1)), v(json!({"a": []})), Value::symbol("s")] {
            assert!(matches(&value, &any()).is_ok());
        }
    }

    #[test]
    fn null_and_undefined_are_distinct_sentinels() {
        assert!(matches(&Value::Null, &null()).is_ok());
        assert!(matches(&Value::Undefined, &null()).is_err());
        assert!(matches(&Value::Undefined, &undefined()).is_ok());
        assert!(matches(&Value::Null, &undefined()).is_err());
    }

    #[test]
    fn null_is_not_an_object() {
        assert!(matches(&Value::Null, &object()).is_err());
        assert!(matches(&v(json!({})), &object()).is_ok());
        assert!(matches(&v(json!([1, 2])), &object()).is_ok());
    }

    #[test]
    fn primitives_use_runtime_kind() {
        assert!(matches(&v(json!(true)), &boolean()).is_ok());
        assert!(matches(&v(json!("true")), &boolean()).is_err());
        assert!(matches(&v(json!(1.5)), &number()).is_ok());
        assert!(matches(&Value::symbol("id"), &symbol()).is_ok());
        assert!(matches(&Value::function("onClick"), &function()).is_ok());
        assert!(matches(&Value::function("onClick"), &object()).is_err());
    }

    #[test]
    fn class_instances_include_subclasses() {
        let shape = ClassRef::new("Shape");
        let circle = shape.extend("Circle");
        let c = circle.instantiate([("r", Value::from(1.0))]);
        assert!(matches(&c, &instance_of(&shape)).is_ok());
        assert!(matches(&c, &instance_of(&circle)).is_ok());
        let s = shape.instantiate::<_, String>([]);
        assert!(matches(&s, &instance_of(&circle)).is_err());
        assert!(matches(&Value::Null, &instance_of(&shape)).is_err());
        assert!(matches(&v(json!({"r": 1})), &instance_of(&shape)).is_err());
    }

    #[test]
    fn one_of_accepts_members_only() {
        let colors = one_of(["red", "blue", "yellow"]);
        assert!(matches(&v(json!("red")), &colors).is_ok());
        assert!(matches(&v(json!("green")), &colors).is_err());
        let m = matches(&v(json!(42)), &colors).unwrap_err();
        assert_eq!(m.expected, "one of 'red','blue','yellow'");
        assert_eq!(m.actual, "number 42");
    }

    #[test]
    fn arrays_report_the_failing_index() {
        let d = array_of(string());
        assert!(matches(&v(json!([])), &d).is_ok());
        assert!(matches(&v(json!(["a", "b"])), &d).is_ok());
        assert_eq!(path_of(matches(&v(json!(["a", 1, 2])), &d)), "[1]");
        let m = matches(&v(json!("a")), &d).unwrap_err();
        assert!(m.path.is_root());
    }

    #[test]
    fn shapes_are_structural() {
        let d = shape_of([("id", string())]);
        assert!(matches(&v(json!({"id": "x"})), &d).is_ok());
        assert!(matches(&v(json!({"id": "x", "extra": 1})), &d).is_ok());
        let m = matches(&v(json!({})), &d).unwrap_err();
        assert_eq!(m.path.to_string(), ".id");
        assert_eq!(m.actual, "undefined");
        assert!(matches(&Value::Null, &d).is_err());
        assert!(matches(&v(json!("id")), &d).is_err());
    }

    #[test]
    fn shapes_report_first_failing_field_in_declaration_order() {
        let d = shape_of([("b", number()), ("a", number())]);
        assert_eq!(path_of(matches(&v(json!({"a": "x", "b": "y"})), &d)), ".b");
    }

    #[test]
    fn optional_shape_fields_may_be_absent() {
        let d = shape_of([("id", string()), ("label", optional(string()))]);
        assert!(matches(&v(json!({"id": "x"})), &d).is_ok());
        assert_eq!(path_of(matches(&v(json!({"id": "x", "label": 3})), &d)), ".label");
    }

    #[test]
    fn shapes_match_instance_fields() {
        let point = ClassRef::new("Point");
        let p = point.instantiate([("x", Value::from(1.0)), ("y", Value::from(2.0))]);
        assert!(matches(&p, &shape_of([("x", number()), ("y", number())])).is_ok());
    }

    #[test]
    fn unions_try_alternatives_in_order() {
        let d = union_of([number(), string()]);
        assert!(matches(&v(json!(1)), &d).is_ok());
        assert!(matches(&v(json!("1")), &d).is_ok());
        let m = matches(&v(json!(true)), &d).unwrap_err();
        assert!(m.expected.contains("number") && m.expected.contains("string"));
        assert!(m.path.is_root());
    }

    #[test]
    fn union_failures_report_the_union_location() {
        let d = shape_of([("v", union_of([array_of(number()), string()]))]);
        let m = matches(&v(json!({"v": [1, "x"]})), &d).unwrap_err();
        assert_eq!(m.path.to_string(), ".v");
        assert_eq!(m.expected, "union of (array of (number), string)");
    }

    #[test]
    fn empty_union_matches_nothing() {
        for value in [Value::Undefined, Value::Null, v(json!(0)), v(json!({}))] {
            assert!(matches(&value, &union_of([])).is_err());
        }
    }

    #[test]
    fn deep_mismatch_reports_full_path() {
        let d = array_of(shape_of([("x", array_of(one_of(["a", "b"])))]));
        let value = v(json!([
            {"x": ["a"]},
            {"x": []},
            {"x": ["c", "a"]},
        ]));
        let m = matches(&value, &d).unwrap_err();
        assert_eq!(m.path.to_string(), "[2].x[0]");
        assert_eq!(m.path, ["2", "x", "0"].into_iter().collect::<Path>());
        assert_eq!(m.expected, "one of 'a','b'");
        assert_eq!(m.to_string(), "value[2].x[0]: expected one of 'a','b', received string \"c\"");
    }

    // ---- properties ---- //

    fn descriptor_strategy() -> impl Strategy<Value = Descriptor> {
        let leaf = prop_oneof![
            proptest::sample::select(Primitive::ALL.to_vec()).prop_map(Descriptor::Primitive),
            prop::collection::vec("[a-c]{1,2}", 0..4).prop_map(Descriptor::OneOf),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(|d| array_of(d)),
                inner.clone().prop_map(|d| optional(d)),
                prop::collection::vec(inner.clone(), 0..4).prop_map(Descriptor::UnionOf),
                prop::collection::vec(("[a-c]", inner), 0..4).prop_map(shape_of),
            ]
        })
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Undefined),
            Just(Value::Null),
            proptest::arbitrary::any::<bool>().prop_map(Value::Bool),
            (-100i32..100).prop_map(|n| Value::Number(n as f64)),
            "[a-c]{1,2}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-c]", inner), 0..4).prop_map(Value::object),
            ]
        })
    }

    proptest! {
        #[test]
        fn optional_always_accepts_nullish(d in descriptor_strategy()) {
            prop_assert!(matches(&Value::Null, &optional(d.clone())).is_ok());
            prop_assert!(matches(&Value::Undefined, &optional(d)).is_ok());
        }

        #[test]
        fn empty_arrays_match_any_array_of(d in descriptor_strategy()) {
            prop_assert!(matches(&Value::Array(vec![]), &array_of(d)).is_ok());
        }

        #[test]
        fn matching_is_deterministic(value in value_strategy(), d in descriptor_strategy()) {
            prop_assert_eq!(matches(&value, &d), matches(&value, &d));
        }

        #[test]
        fn one_of_is_membership(lits in prop::collection::vec("[a-c]{1,2}", 1..4), s in "[a-c]{1,2}") {
            let expected = lits.contains(&s);
            prop_assert_eq!(matches(&Value::String(s), &one_of(lits)).is_ok(), expected);
        }
    }
}
