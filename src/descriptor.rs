//! Type descriptor algebra.
//!
//! A [`Descriptor`] is immutable data describing which runtime values are
//! acceptable. Descriptors compose arbitrarily deep and never look at a value
//! while being built; matching lives in [`crate::matcher`].
pub mod alias;
pub mod dsl;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::DescriptorError;
use crate::value::{ClassRef, Kind, Value};

pub use alias::{action, classic_action, element, node};

// ------------------------------ Primitives -------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Any,
    Boolean,
    Null,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Function,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Any,
        Primitive::Boolean,
        Primitive::Null,
        Primitive::Number,
        Primitive::Object,
        Primitive::String,
        Primitive::Symbol,
        Primitive::Undefined,
        Primitive::Function,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Any => "any",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Number => "number",
            Primitive::Object => "object",
            Primitive::String => "string",
            Primitive::Symbol => "symbol",
            Primitive::Undefined => "undefined",
            Primitive::Function => "function",
        }
    }

    /// Runtime kind this primitive stands for; `None` for `any`.
    pub fn kind(self) -> Option<Kind> {
        match self {
            Primitive::Any => None,
            Primitive::Boolean => Some(Kind::Boolean),
            Primitive::Null => Some(Kind::Null),
            Primitive::Number => Some(Kind::Number),
            Primitive::Object => Some(Kind::Object),
            Primitive::String => Some(Kind::String),
            Primitive::Symbol => Some(Kind::Symbol),
            Primitive::Undefined => Some(Kind::Undefined),
            Primitive::Function => Some(Kind::Function),
        }
    }

    pub fn admits(self, value: &Value) -> bool {
        match self.kind() {
            None => true,
            Some(kind) => value.kind() == kind,
        }
    }
}

impl FromStr for Primitive {
    type Err = DescriptorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| DescriptorError::UnknownPrimitive(name.to_string()))
    }
}

// ------------------------------ Descriptor -------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(Primitive),
    ClassInstance(ClassRef),
    ArrayOf(Box<Descriptor>),
    OneOf(Vec<String>),
    Optional(Box<Descriptor>),
    /// Declaration order is kept; it decides which failing field is reported.
    ShapeOf(IndexMap<String, Descriptor>),
    UnionOf(Vec<Descriptor>),
}

impl From<Primitive> for Descriptor {
    fn from(p: Primitive) -> Self { Descriptor::Primitive(p) }
}

impl From<ClassRef> for Descriptor {
    fn from(class: ClassRef) -> Self { Descriptor::ClassInstance(class) }
}

impl From<&ClassRef> for Descriptor {
    fn from(class: &ClassRef) -> Self { Descriptor::ClassInstance(class.clone()) }
}

impl TryFrom<&str> for Descriptor {
    type Error = DescriptorError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        primitive(name)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Primitive(p) => f.write_str(p.name()),
            Descriptor::ClassInstance(class) => write!(f, "instance of {}", class.name()),
            Descriptor::ArrayOf(inner) => write!(f, "array of ({inner})"),
            Descriptor::OneOf(lits) => {
                f.write_str("one of ")?;
                for (i, lit) in lits.iter().enumerate() {
                    if i > 0 { f.write_str(",")?; }
                    write!(f, "'{lit}'")?;
                }
                Ok(())
            }
            Descriptor::Optional(inner) => write!(f, "optional ({inner})"),
            Descriptor::ShapeOf(fields) => {
                f.write_str("shape of {")?;
                for (i, (name, d)) in fields.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{name}: {d}")?;
                }
                f.write_str("}")
            }
            Descriptor::UnionOf(alts) => {
                f.write_str("union of (")?;
                for (i, d) in alts.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{d}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// ------------------------------ Constructors ------------------------------ //

/// Bare-string form: look a primitive up by name.
pub fn primitive(name: &str) -> Result<Descriptor, DescriptorError> {
    name.parse::<Primitive>().map(Descriptor::Primitive)
}

pub fn any() -> Descriptor { Primitive::Any.into() }
pub fn boolean() -> Descriptor { Primitive::Boolean.into() }
pub fn null() -> Descriptor { Primitive::Null.into() }
pub fn number() -> Descriptor { Primitive::Number.into() }
pub fn object() -> Descriptor { Primitive::Object.into() }
pub fn string() -> Descriptor { Primitive::String.into() }
pub fn symbol() -> Descriptor { Primitive::Symbol.into() }
pub fn undefined() -> Descriptor { Primitive::Undefined.into() }
pub fn function() -> Descriptor { Primitive::Function.into() }

pub fn instance_of(class: &ClassRef) -> Descriptor {
    Descriptor::ClassInstance(class.clone())
}

pub fn array_of(element: impl Into<Descriptor>) -> Descriptor {
    Descriptor::ArrayOf(Box::new(element.into()))
}

pub fn one_of<I, S>(literals: I) -> Descriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Descriptor::OneOf(literals.into_iter().map(Into::into).collect())
}

pub fn optional(inner: impl Into<Descriptor>) -> Descriptor {
    Descriptor::Optional(Box::new(inner.into()))
}

/// Fields keep declaration order. A repeated name keeps its first position
/// but takes the last descriptor given for it.
pub fn shape_of<I, K>(fields: I) -> Descriptor
where
    I: IntoIterator<Item = (K, Descriptor)>,
    K: Into<String>,
{
    Descriptor::ShapeOf(fields.into_iter().map(|(k, d)| (k.into(), d)).collect())
}

/// An empty union matches nothing.
pub fn union_of<I>(alternatives: I) -> Descriptor
where
    I: IntoIterator<Item = Descriptor>,
{
    Descriptor::UnionOf(alternatives.into_iter().collect())
}

// ------------------------------- Tests ------------------------------------ //
