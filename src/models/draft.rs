//! In-progress record state owned by a record form

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::{Entity, RecordId};
use crate::error::{AppError, AppResult};

/// A full entity value plus the set of fields the user has edited
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord<E: Entity> {
    value: E,
    dirty: BTreeSet<&'static str>,
}

impl<E: Entity> DraftRecord<E> {
    /// Seed a new-record draft from the descriptor's hard-coded defaults
    pub fn from_defaults() -> AppResult<Self> {
        let value = E::from_fields(E::DESCRIPTOR.default_values())?;
        Ok(Self::from_record(value))
    }

    pub fn from_record(value: E) -> Self {
        Self {
            value,
            dirty: BTreeSet::new(),
        }
    }

    pub fn value(&self) -> &E {
        &self.value
    }

    pub fn into_value(self) -> E {
        self.value
    }

    pub fn id(&self) -> Option<RecordId> {
        self.value.id()
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    pub fn is_modified(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Current value of one field
    pub fn get(&self, field: &str) -> AppResult<Option<Value>> {
        Ok(self.value.to_fields()?.remove(field))
    }

    /// Write exactly one declared field from raw user input
    pub fn set_field(&mut self, field: &str, raw: &str) -> AppResult<()> {
        let spec = E::DESCRIPTOR.field(field).ok_or_else(|| {
            AppError::Validation(format!(
                "{} has no field named '{}'",
                E::DESCRIPTOR.singular,
                field
            ))
        })?;
        let parsed = spec.parse_input(raw)?;

        let mut fields = self.value.to_fields()?;
        fields.insert(spec.name.to_string(), parsed);
        self.value = E::from_fields(fields)?;
        self.dirty.insert(spec.name);
        Ok(())
    }

    /// Shallow-merge server defaults over the draft.
    ///
    /// Undeclared properties and fields the user already edited are skipped.
    /// Returns the names of the fields that were overwritten. On a type
    /// mismatch the draft is left untouched.
    pub fn merge_template(&mut self, template: &Map<String, Value>) -> AppResult<Vec<&'static str>> {
        let mut fields = self.value.to_fields()?;
        let mut applied = Vec::new();
        for (name, value) in template {
            let Some(spec) = E::DESCRIPTOR.field(name) else {
                continue;
            };
            if self.dirty.contains(spec.name) {
                continue;
            }
            fields.insert(spec.name.to_string(), value.clone());
            applied.push(spec.name);
        }
        self.value = E::from_fields(fields)?;
        Ok(applied)
    }

    /// Local presence and range checks
    pub fn validate(&self) -> AppResult<()> {
        E::DESCRIPTOR.validate(&self.value.to_fields()?)
    }
}
