//! Per-owner argument declarations.
//!
//! A [`Signature`] is the table a component definition builds once: argument
//! name to descriptor, plus which arguments are required. The host's
//! property-observation layer calls [`Signature::assign`] on every value
//! change and [`Signature::receive`] on every full argument set.
use indexmap::IndexMap;

use crate::args::{check_missing, check_unexpected};
use crate::config::{self, Config, Enforcement};
use crate::descriptor::Descriptor;
use crate::error::ValidationError;
use crate::matcher::matches;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub descriptor: Descriptor,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    owner: String,
    arguments: IndexMap<String, Argument>,
}

#[derive(Debug)]
pub struct SignatureBuilder {
    owner: String,
    arguments: IndexMap<String, Argument>,
}

impl SignatureBuilder {
    pub fn argument(self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.declare(name.into(), descriptor.into(), false)
    }

    pub fn required(self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.declare(name.into(), descriptor.into(), true)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub fn build(self) -> Signature {
        Signature { owner: self.owner, arguments: self.arguments }
    }

    // redeclaring a name replaces the earlier declaration
    fn declare(mut self, name: String, descriptor: Descriptor, required: bool) -> Self {
        self.arguments.insert(name, Argument { descriptor, required });
        self
    }
}

impl Signature {
    pub fn builder(owner: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder { owner: owner.into(), arguments: IndexMap::new() }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }

    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.arguments.keys().map(String::as_str)
    }

    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .filter(|(_, arg)| arg.required)
            .map(|(name, _)| name.as_str())
    }

    /// Type-check one property value. Undeclared names are not this check's
    /// concern and always pass.
    pub fn check_value(&self, name: &str, value: &Value) -> Result<(), ValidationError> {
        let Some(argument) = self.arguments.get(name) else {
            return Ok(());
        };
        matches(value, &argument.descriptor).map_err(|mismatch| ValidationError::Mismatch {
            owner: self.owner.clone(),
            property: name.to_string(),
            mismatch,
        })
    }

    /// Every problem with a full argument set: unexpected names, missing
    /// required names, then type mismatches in declaration order.
    pub fn check_arguments(&self, supplied: &IndexMap<String, Value>, config: &Config) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let supplied_names = || supplied.keys().map(String::as_str);

        let skip_unexpected = self.arguments.is_empty() && config.ignore_components_without_validations;
        if !skip_unexpected {
            let unexpected = check_unexpected(supplied_names(), self.declared(), &config.argument_whitelist);
            if !unexpected.is_empty() {
                errors.push(ValidationError::UnexpectedArguments {
                    owner: self.owner.clone(),
                    names: unexpected.into_iter().collect(),
                });
            }
        }

        let missing = check_missing(supplied_names(), self.required());
        if !missing.is_empty() {
            errors.push(ValidationError::MissingArguments {
                owner: self.owner.clone(),
                names: missing.into_iter().collect(),
            });
        }

        for name in self.declared() {
            if let Some(value) = supplied.get(name) {
                if let Err(error) = self.check_value(name, value) {
                    errors.push(error);
                }
            }
        }
        errors
    }

    /// Property-change hook, governed by the installed config.
    pub fn assign(&self, name: &str, value: &Value) -> Result<(), ValidationError> {
        let config = config::global();
        if config.enforcement == Enforcement::Off {
            return Ok(());
        }
        let errors = self.check_value(name, value).err().into_iter().collect();
        self.enforce(errors, config.enforcement)
    }

    /// Argument-set hook, governed by the installed config.
    pub fn receive(&self, supplied: &IndexMap<String, Value>) -> Result<(), ValidationError> {
        let config = config::global();
        if config.enforcement == Enforcement::Off {
            return Ok(());
        }
        let errors = self.check_arguments(supplied, config);
        self.enforce(errors, config.enforcement)
    }

    fn enforce(&self, errors: Vec<ValidationError>, enforcement: Enforcement) -> Result<(), ValidationError> {
        match enforcement {
            Enforcement::Raise => match errors.into_iter().next() {
                Some(error) => Err(error),
                None => Ok(()),
            },
            Enforcement::Log => {
                for error in &errors {
                    tracing::warn!(owner = %self.owner, "{error}");
                }
                Ok(())
            }
            Enforcement::Off => Ok(()),
        }
    }
}
