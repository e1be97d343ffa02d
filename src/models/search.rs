//! Search parameters for the list view

use indexmap::IndexMap;

use super::EntityDescriptor;

/// User-entered filters keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    values: IndexMap<String, String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Outgoing query pairs: searchable fields only, blank values dropped,
    /// ordered as the descriptor lists them.
    pub fn to_query(&self, descriptor: &EntityDescriptor) -> Vec<(String, String)> {
        descriptor
            .search_fields
            .iter()
            .filter_map(|field| {
                let value = self.values.get(*field)?.trim();
                (!value.is_empty()).then(|| (field.to_string(), value.to_string()))
            })
            .collect()
    }

    pub fn is_blank_for(&self, descriptor: &EntityDescriptor) -> bool {
        self.to_query(descriptor).is_empty()
    }
}
