//! Declarative (JSON) form of descriptors and signatures.
//!
//! ```json
//! {"arrayOf": {"shapeOf": {"tags": {"arrayOf": {"oneOf": ["a", "b"]}}}}}
//! ```
//!
//! A bare string names a primitive or an alias (`Action`, `ClassicAction`,
//! `Element`, `Node`). Every other form is a single-key object. Problems are
//! reported with the location of the offending node.
use indexmap::IndexMap;
use serde_json::Value as Json;

use super::{Descriptor, alias, primitive};
use crate::error::DescriptorError;
use crate::signature::Signature;
use crate::value::ClassRef;

/// Classes that `{"instanceOf": name}` may refer to.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassRef>,
}

impl ClassRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, class: ClassRef) -> &mut Self {
        self.classes.insert(class.name().to_string(), class);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }
}

pub fn parse_descriptor(json: &Json, classes: &ClassRegistry) -> Result<Descriptor, DescriptorError> {
    parse_at(json, classes, "$")
}

fn parse_at(json: &Json, classes: &ClassRegistry, at: &str) -> Result<Descriptor, DescriptorError> {
    match json {
        Json::String(name) => match alias::by_name(name) {
            Some(d) => Ok(d),
            None => primitive(name),
        },
        Json::Object(form) if form.len() == 1 => {
            let Some((key, body)) = form.iter().next() else {
                return Err(malformed(at, "empty descriptor object"));
            };
            let here = format!("{at}.{key}");
            match key.as_str() {
                "arrayOf" => Ok(super::array_of(parse_at(body, classes, &here)?)),
                "optional" => Ok(super::optional(parse_at(body, classes, &here)?)),
                "oneOf" => {
                    let items = expect_array(body, &here)?;
                    let mut lits = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        match item {
                            Json::String(s) => lits.push(s.clone()),
                            other => {
                                return Err(DescriptorError::NonStringLiteral {
                                    at: format!("{here}[{i}]"),
                                    found: other.to_string(),
                                });
                            }
                        }
                    }
                    Ok(Descriptor::OneOf(lits))
                }
                "unionOf" => {
                    let items = expect_array(body, &here)?;
                    let alts = items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| parse_at(item, classes, &format!("{here}[{i}]")))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Descriptor::UnionOf(alts))
                }
                "shapeOf" => {
                    let Json::Object(fields) = body else {
                        return Err(malformed(&here, "shapeOf expects an object of field descriptors"));
                    };
                    let mut out = IndexMap::with_capacity(fields.len());
                    for (name, field) in fields {
                        let d = parse_at(field, classes, &format!("{here}.{name}"))?;
                        out.insert(name.clone(), d);
                    }
                    Ok(Descriptor::ShapeOf(out))
                }
                "instanceOf" => {
                    let Json::String(name) = body else {
                        return Err(malformed(&here, "instanceOf expects a class name"));
                    };
                    classes
                        .get(name)
                        .map(Descriptor::from)
                        .ok_or_else(|| DescriptorError::UnknownClass { at: here.clone(), name: name.clone() })
                }
                other => Err(malformed(at, &format!("unknown descriptor form `{other}`"))),
            }
        }
        Json::Object(_) => Err(malformed(at, "descriptor objects must have exactly one key")),
        other => Err(malformed(at, &format!("expected a descriptor, found {other}"))),
    }
}

/// Read `{"owner": .., "arguments": {name: descriptor}, "required": [names]}`.
pub fn parse_signature(json: &Json, classes: &ClassRegistry) -> Result<Signature, DescriptorError> {
    let Json::Object(doc) = json else {
        return Err(malformed("$", "a signature must be an object"));
    };
    let owner = match doc.get("owner") {
        Some(Json::String(s)) => s.clone(),
        Some(_) => return Err(malformed("$.owner", "owner must be a string")),
        None => return Err(malformed("$", "a signature needs an `owner`")),
    };

    let required = match doc.get("required") {
        None => Vec::new(),
        Some(body) => expect_array(body, "$.required")?
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::String(s) => Ok(s.as_str()),
                _ => Err(malformed(&format!("$.required[{i}]"), "required names must be strings")),
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut builder = Signature::builder(owner);
    match doc.get("arguments") {
        None => {}
        Some(Json::Object(arguments)) => {
            for (name, body) in arguments {
                let d = parse_at(body, classes, &format!("$.arguments.{name}"))?;
                builder = if required.contains(&name.as_str()) {
                    builder.required(name.clone(), d)
                } else {
                    builder.argument(name.clone(), d)
                };
            }
        }
        Some(_) => return Err(malformed("$.arguments", "arguments must be an object")),
    }
    if let Some(name) = required.iter().find(|name| !builder.declares(name)) {
        return Err(malformed("$.required", &format!("`{name}` is required but not declared")));
    }
    Ok(builder.build())
}

fn expect_array<'a>(json: &'a Json, at: &str) -> Result<&'a Vec<Json>, DescriptorError> {
    match json {
        Json::Array(items) => Ok(items),
        _ => Err(malformed(at, "expected an array")),
    }
}

fn malformed(at: &str, reason: &str) -> DescriptorError {
    DescriptorError::Malformed { at: at.to_string(), reason: reason.to_string() }
}
