//! Human-readable messages for mismatches and argument-set problems.
//!
//! Values are summarized, not dumped: strings are truncated and arrays or
//! objects show only their first few entries.
use crate::matcher::Mismatch;
use crate::value::Value;

// ------------------------------- Policy ----------------------------------- //

const MAX_STRING_CHARS: usize = 40;
const MAX_PREVIEW_ITEMS: usize = 3;

// ------------------------------- Values ----------------------------------- //

/// Runtime kind of `value` plus a short literal rendering.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {}", number_literal(*n)),
        Value::String(s) => format!("string {}", quoted(s)),
        Value::Symbol(s) => format!("symbol {s}"),
        Value::Function(f) => match &f.name {
            Some(name) => format!("function {name}"),
            None => "anonymous function".to_string(),
        },
        Value::Array(items) => format!("array of length {} {}", items.len(), preview(value)),
        Value::Object(_) => format!("object {}", preview(value)),
        Value::Instance(instance) => format!("instance of {}", instance.class().name()),
    }
}

/// Shallow literal rendering; nested containers collapse to `[...]`/`{...}`.
fn preview(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let mut parts: Vec<String> = items.iter().take(MAX_PREVIEW_ITEMS).map(literal).collect();
            if items.len() > MAX_PREVIEW_ITEMS { parts.push("...".to_string()); }
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let mut parts: Vec<String> = map
                .iter()
                .take(MAX_PREVIEW_ITEMS)
                .map(|(k, v)| format!("{k}: {}", literal(v)))
                .collect();
            if map.len() > MAX_PREVIEW_ITEMS { parts.push("...".to_string()); }
            format!("{{{}}}", parts.join(", "))
        }
        other => literal(other),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_literal(*n),
        Value::String(s) => quoted(s),
        Value::Symbol(s) => s.to_string(),
        Value::Function(_) => "function".to_string(),
        Value::Array(_) => "[...]".to_string(),
        Value::Object(_) => "{...}".to_string(),
        Value::Instance(instance) => format!("<{}>", instance.class().name()),
    }
}

fn number_literal(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Escaped, double-quoted; truncation happens before escaping.
fn quoted(s: &str) -> String {
    if s.chars().count() > MAX_STRING_CHARS {
        let head: String = s.chars().take(MAX_STRING_CHARS).collect();
        format!("{:?}", format!("{head}..."))
    } else {
        format!("{s:?}")
    }
}

// ------------------------------ Messages ---------------------------------- //

/// `Owner#property.path: expected <descriptor>, but received <value>`.
pub fn mismatch_message(owner: &str, property: &str, mismatch: &Mismatch) -> String {
    format!(
        "{owner}#{property}{}: expected {}, but received {}",
        mismatch.path, mismatch.expected, mismatch.actual
    )
}

pub fn unexpected_message(owner: &str, names: &[String]) -> String {
    let noun = if names.len() == 1 { "argument" } else { "arguments" };
    format!("{owner} received unexpected {noun}: {}", list(names))
}

pub fn missing_message(owner: &str, names: &[String]) -> String {
    let noun = if names.len() == 1 { "argument" } else { "arguments" };
    format!("{owner} is missing required {noun}: {}", list(names))
}

fn list(names: &[String]) -> String {
    names.iter().map(|n| format!("`{n}`")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{array_of, one_of, shape_of};
    use crate::matcher::matches;
    use crate::value::ClassRef;
    use serde_json::json;

    fn describe(json: serde_json::Value) -> String {
        describe_value(&Value::from(json))
    }

    #[test]
    fn primitives_show_their_literal() {
        assert_eq!(describe(json!(42)), "number 42");
        assert_eq!(describe(json!(1.5)), "number 1.5");
        assert_eq!(describe(json!(true)), "boolean true");
        assert_eq!(describe(json!("hi")), "string \"hi\"");
        assert_eq!(describe(json!(null)), "null");
        assert_eq!(describe_value(&Value::Undefined), "undefined");
        assert_eq!(describe_value(&Value::Number(f64::NAN)), "number NaN");
        assert_eq!(describe_value(&Value::symbol("key")), "symbol Symbol(key)");
        assert_eq!(describe_value(&Value::function("save")), "function save");
    }

    #[test]
    fn long_strings_are_truncated() {
        let long = "x".repeat(100);
        let out = describe(json!(long));
        assert_eq!(out, format!("string \"{}...\"", "x".repeat(MAX_STRING_CHARS)));
    }

    #[test]
    fn quotes_inside_strings_are_escaped() {
        assert_eq!(describe(json!("a\"b")), r#"string "a\"b""#);
        assert_eq!(describe(json!("back\\slash")), r#"string "back\\slash""#);
        assert_eq!(describe(json!({"k": "x\"y"})), r#"object {k: "x\"y"}"#);
    }

    #[test]
    fn containers_are_summarized() {
        assert_eq!(describe(json!([1, "a", [2], {"b": 3}, 5])), "array of length 5 [1, \"a\", [...], ...]");
        assert_eq!(describe(json!([])), "array of length 0 []");
        assert_eq!(describe(json!({"a": 1, "b": {"c": 2}})), "object {a: 1, b: {...}}");
        assert_eq!(describe(json!({"a": 1, "b": 2, "c": 3, "d": 4})), "object {a: 1, b: 2, c: 3, ...}");
        let widget = ClassRef::new("Widget");
        assert_eq!(describe_value(&widget.instantiate::<_, String>([])), "instance of Widget");
    }

    #[test]
    fn mismatch_messages_name_owner_path_and_types() {
        let d = array_of(shape_of([("color", one_of(["red", "blue", "yellow"]))]));
        let m = matches(&Value::from(json!([{"color": "red"}, {"color": "green"}])), &d).unwrap_err();
        assert_eq!(
            mismatch_message("Palette", "swatches", &m),
            "Palette#swatches[1].color: expected one of 'red','blue','yellow', but received string \"green\""
        );
    }

    #[test]
    fn root_mismatches_read_as_value() {
        let m = matches(&Value::from(json!(7)), &array_of(one_of(["a"]))).unwrap_err();
        assert_eq!(m.to_string(), "value: expected array of (one of 'a'), received number 7");
        assert_eq!(
            mismatch_message("List", "items", &m),
            "List#items: expected array of (one of 'a'), but received number 7"
        );
    }

    #[test]
    fn argument_messages_list_every_name() {
        let names = vec!["foo".to_string(), "bar".to_string()];
        assert_eq!(unexpected_message("Card", &names), "Card received unexpected arguments: `foo`, `bar`");
        assert_eq!(missing_message("Card", &names[..1]), "Card is missing required argument: `foo`");
    }
}
