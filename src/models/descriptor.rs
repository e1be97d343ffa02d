//! Entity descriptors: per-kind field metadata shared by forms and gateways.

use chrono::{Datelike, Local};
use serde_json::{Map, Value};

use super::Kind;
use crate::error::{AppError, AppResult};

/// Value type of a descriptor field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Year,
}

/// Value a field takes in a freshly created draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Empty text, or zero for numeric fields
    Empty,
    Text(&'static str),
    Integer(i32),
    CurrentYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON property name
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            field_type: FieldType::Text,
            required: false,
            min: None,
            max: None,
            default: FieldDefault::Empty,
        }
    }

    pub const fn integer(name: &'static str, label: &'static str, min: i32) -> Self {
        Self {
            name,
            label,
            field_type: FieldType::Integer,
            required: false,
            min: Some(min),
            max: None,
            default: FieldDefault::Empty,
        }
    }

    /// Year fields default to the current calendar year
    pub const fn year(name: &'static str, label: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            label,
            field_type: FieldType::Year,
            required: false,
            min: Some(min),
            max: Some(max),
            default: FieldDefault::CurrentYear,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.field_type, FieldType::Integer | FieldType::Year)
    }

    /// Hard-coded create-mode value
    pub fn default_value(&self) -> Value {
        match (self.default, self.field_type) {
            (FieldDefault::Text(text), _) => Value::from(text),
            (FieldDefault::Integer(n), _) => Value::from(n),
            (FieldDefault::CurrentYear, _) => Value::from(Local::now().year()),
            (FieldDefault::Empty, FieldType::Text) => Value::from(""),
            (FieldDefault::Empty, _) => Value::from(0),
        }
    }

    /// Convert raw user input into the JSON value stored for this field
    pub fn parse_input(&self, raw: &str) -> AppResult<Value> {
        if !self.is_numeric() {
            return Ok(Value::from(raw));
        }
        raw.trim()
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| AppError::Validation(format!("{} must be a whole number", self.label)))
    }

    /// Presence and range checks for one field value
    pub fn check(&self, value: Option<&Value>) -> AppResult<()> {
        if !self.is_numeric() {
            let blank = value
                .and_then(Value::as_str)
                .map_or(true, |s| s.trim().is_empty());
            if self.required && blank {
                return Err(AppError::Validation(format!("{} is required", self.label)));
            }
            return Ok(());
        }

        let number = match value.and_then(Value::as_i64) {
            Some(n) => n,
            None if self.required => {
                return Err(AppError::Validation(format!("{} is required", self.label)))
            }
            None => return Ok(()),
        };
        if let Some(min) = self.min {
            if number < i64::from(min) {
                return Err(AppError::Validation(format!(
                    "{} must be at least {}",
                    self.label, min
                )));
            }
        }
        if let Some(max) = self.max {
            if number > i64::from(max) {
                return Err(AppError::Validation(format!(
                    "{} must be at most {}",
                    self.label, max
                )));
            }
        }
        Ok(())
    }
}

/// Exact-value lookup served under its own path, e.g. `/magazines/numero/{n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSearch {
    pub field: &'static str,
    pub segment: &'static str,
}

/// Static description of one resource kind
#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: Kind,
    /// Endpoint base path, e.g. `/books`
    pub endpoint: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    /// One-line description shown on the home listing
    pub summary: &'static str,
    pub fields: &'static [FieldSpec],
    /// Fields accepted by the search endpoint, in query order
    pub search_fields: &'static [&'static str],
    /// Query key of `{endpoint}/buscar/{field}`; `None` sends the field name
    pub single_search_key: Option<&'static str>,
    pub path_searches: &'static [PathSearch],
    /// Whether the remote store serves `GET {endpoint}/template`
    pub has_template: bool,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_searchable(&self, name: &str) -> bool {
        self.search_fields.contains(&name)
    }

    /// Query key carrying the value of a single-field search on `field`
    pub fn single_search_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.single_search_key.unwrap_or(field)
    }

    pub fn path_search(&self, field: &str) -> Option<&'static PathSearch> {
        self.path_searches.iter().find(|p| p.field == field)
    }

    pub fn path_search_by_segment(&self, segment: &str) -> Option<&'static PathSearch> {
        self.path_searches.iter().find(|p| p.segment == segment)
    }

    /// Field map used to seed a new-record draft
    pub fn default_values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default_value()))
            .collect()
    }

    /// Run every field check in declaration order, stopping at the first failure
    pub fn validate(&self, values: &Map<String, Value>) -> AppResult<()> {
        for field in self.fields {
            field.check(values.get(field.name))?;
        }
        Ok(())
    }

    /// Keep only the properties this kind declares
    pub fn retain_declared(&self, values: Map<String, Value>) -> Map<String, Value> {
        values
            .into_iter()
            .filter(|(name, _)| self.field(name).is_some())
            .collect()
    }
}
