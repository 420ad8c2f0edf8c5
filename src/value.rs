//! Dynamic runtime values that descriptors are matched against.
//!
//! The model mirrors a loosely typed host runtime: besides the JSON kinds it
//! knows `undefined`, symbols, functions and class instances. Plain objects
//! keep their insertion order so diagnostics list keys the way they were
//! written.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

// ------------------------------- Kinds ------------------------------------ //

/// Intrinsic runtime classification of a value.
///
/// Arrays, plain objects and class instances are all `Object`. `null` is
/// deliberately its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Function,
    Object,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Symbol => "symbol",
            Kind::Function => "function",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ------------------------------- Classes ---------------------------------- //

#[derive(Debug)]
struct Class {
    name: String,
    parent: Option<ClassRef>,
}

/// Shared handle to a class. Two handles are equal only when they point at
/// the same class definition.
#[derive(Clone)]
pub struct ClassRef(Arc<Class>);

impl ClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(Class { name: name.into(), parent: None }))
    }

    /// Declare a subclass of `self`.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self(Arc::new(Class { name: name.into(), parent: Some(self.clone()) }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.0.parent.as_ref()
    }

    /// `true` if `self` is `other` or inherits from it.
    pub fn is_a(&self, other: &ClassRef) -> bool {
        let mut cursor = Some(self);
        while let Some(class) = cursor {
            if class == other {
                return true;
            }
            cursor = class.parent();
        }
        false
    }

    /// Create an instance of this class with the given own fields.
    pub fn instantiate<I, K>(&self, fields: I) -> Value
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Instance(Instance {
            class: self.clone(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: ClassRef,
    fields: IndexMap<String, Value>,
}

impl Instance {
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}

// ------------------------------ Opaque kinds ------------------------------ //

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub description: Option<String>,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(d) => write!(f, "Symbol({d})"),
            None => f.write_str("Symbol()"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: Option<String>,
}

// -------------------------------- Value ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Function),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Instance(Instance),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Symbol(_) => Kind::Symbol,
            Value::Function(_) => Kind::Function,
            Value::Array(_) | Value::Object(_) | Value::Instance(_) => Kind::Object,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Own field lookup on objects and instances. Other kinds have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(name),
            Value::Instance(instance) => instance.fields.get(name),
            _ => None,
        }
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Symbol { description: Some(description.into()) })
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Function { name: Some(name.into()) })
    }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            Json::Object(m) => Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<Vec<Value>> for Value {
    fn from(xs: Vec<Value>) -> Self { Value::Array(xs) }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_is_not_an_object() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::from(json!({})).kind(), Kind::Object);
        assert_eq!(Value::from(json!([])).kind(), Kind::Object);
    }

    #[test]
    fn subclass_instances_are_instances_of_parent() {
        let base = ClassRef::new("Base");
        let derived = base.extend("Derived");
        let unrelated = ClassRef::new("Base");
        assert!(derived.is_a(&base));
        assert!(derived.is_a(&derived));
        assert!(!base.is_a(&derived));
        // same name, different definition
        assert!(!derived.is_a(&unrelated));
    }

    #[test]
    fn json_objects_keep_key_order() {
        let v = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let Value::Object(map) = v else { panic!("expected object") };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn instance_fields_are_visible() {
        let point = ClassRef::new("Point");
        let p = point.instantiate([("x", Value::from(1.0))]);
        assert_eq!(p.field("x"), Some(&Value::Number(1.0)));
        assert_eq!(p.field("y"), None);
        assert_eq!(p.kind(), Kind::Object);
    }
}
