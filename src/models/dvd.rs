//! DVD model

use serde::{Deserialize, Serialize};

use super::{
    descriptor::{EntityDescriptor, FieldDefault, FieldSpec},
    Entity, Kind, RecordId,
};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::text("author", "Author").required(),
    FieldSpec::text("director", "Director").required(),
    FieldSpec::text("genre", "Genre")
        .required()
        .with_default(FieldDefault::Text("Unclassified")),
    FieldSpec::integer("durationMinutes", "Duration (minutes)", 1).required(),
    FieldSpec::year("year", "Year", 1900, 2100).required(),
];

/// Only kind whose store serves a `template` endpoint
pub const DVD: EntityDescriptor = EntityDescriptor {
    kind: Kind::Dvd,
    endpoint: "/dvds",
    singular: "DVD",
    plural: "DVDs",
    summary: "Manage the library's DVD catalog.",
    fields: FIELDS,
    search_fields: &["genre", "director", "author"],
    single_search_key: None,
    path_searches: &[],
    has_template: true,
};

/// DVD record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dvd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub author: String,
    pub director: String,
    pub genre: String,
    pub duration_minutes: i32,
    pub year: i32,
}

impl Entity for Dvd {
    const DESCRIPTOR: &'static EntityDescriptor = &DVD;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
