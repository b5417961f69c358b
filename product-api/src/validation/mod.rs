//! Declarative request validation.
//!
//! A [`RuleSet`] is an ordered list of checks, each bound to one field of the
//! request body or path. Every rule runs on every request; failures are
//! collected in declaration order and never short-circuit later rules.

pub mod checks;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

pub use checks::Check;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

/// Ordered error collection for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.msg.as_str()).collect();
        write!(f, "{}", messages.join(", "))
    }
}

/// The parts of a request that rules can look at.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    pub params: HashMap<String, String>,
    pub body: Value,
}

impl RequestInput {
    fn field(&self, location: Location, name: &str) -> Option<Value> {
        match location {
            Location::Params => self.params.get(name).cloned().map(Value::String),
            Location::Body => self.body.get(name).cloned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub location: Location,
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(self, field: &'static str, check: Check, message: &'static str) -> Self {
        self.rule(Location::Params, field, check, message)
    }

    pub fn body(self, field: &'static str, check: Check, message: &'static str) -> Self {
        self.rule(Location::Body, field, check, message)
    }

    fn rule(mut self, location: Location, field: &'static str, check: Check, message: &'static str) -> Self {
        self.rules.push(Rule { location, field, check, message });
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn validate(&self, input: &RequestInput) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for rule in &self.rules {
            let value = input.field(rule.location, rule.field);
            if !(rule.check)(value.as_ref()) {
                errors.push(FieldError {
                    kind: "field",
                    value,
                    msg: rule.message.to_string(),
                    path: rule.field.to_string(),
                    location: rule.location,
                });
            }
        }

        errors
    }
}
