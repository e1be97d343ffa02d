//! Data models for the catalog

pub mod book;
pub mod descriptor;
pub mod draft;
pub mod dvd;
pub mod magazine;
pub mod search;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use book::Book;
pub use descriptor::{EntityDescriptor, FieldDefault, FieldSpec, FieldType, PathSearch};
pub use draft::DraftRecord;
pub use dvd::Dvd;
pub use magazine::Magazine;
pub use search::SearchParams;

/// Identity assigned by the remote store
pub type RecordId = i64;

/// Resource kinds managed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Book,
    Magazine,
    Dvd,
}

impl Kind {
    pub fn all() -> [Kind; 3] {
        [Kind::Book, Kind::Magazine, Kind::Dvd]
    }

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            Kind::Book => &book::BOOK,
            Kind::Magazine => &magazine::MAGAZINE,
            Kind::Dvd => &dvd::DVD,
        }
    }

    /// Path segment, e.g. `books`
    pub fn segment(self) -> &'static str {
        self.descriptor().endpoint.trim_start_matches('/')
    }

    pub fn from_segment(segment: &str) -> Option<Kind> {
        Kind::all().into_iter().find(|k| k.segment() == segment)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().plural)
    }
}

/// A typed catalog record whose JSON shape is declared by its descriptor.
///
/// Serialization must emit exactly the descriptor's fields plus `id` once
/// persisted.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    const DESCRIPTOR: &'static EntityDescriptor;

    fn id(&self) -> Option<RecordId>;

    /// Property map of this record
    fn to_fields(&self) -> AppResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Internal(format!(
                "{} serialized to non-object {}",
                Self::DESCRIPTOR.singular,
                other
            ))),
        }
    }

    fn from_fields(fields: Map<String, Value>) -> AppResult<Self> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}
