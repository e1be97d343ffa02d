//! Book model

use serde::{Deserialize, Serialize};

use super::{
    descriptor::{EntityDescriptor, FieldSpec},
    Entity, Kind, RecordId,
};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::text("author", "Author").required(),
    FieldSpec::text("isbn", "ISBN").required(),
    FieldSpec::integer("pageCount", "Page count", 1).required(),
    FieldSpec::text("genre", "Genre").required(),
    FieldSpec::text("publisher", "Publisher").required(),
    FieldSpec::year("year", "Year", 1000, 2100).required(),
];

pub const BOOK: EntityDescriptor = EntityDescriptor {
    kind: Kind::Book,
    endpoint: "/books",
    singular: "book",
    plural: "books",
    summary: "Manage the library's book catalog.",
    fields: FIELDS,
    search_fields: &["title", "author"],
    single_search_key: Some("q"),
    path_searches: &[],
    has_template: false,
};

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub page_count: i32,
    pub genre: String,
    pub publisher: String,
    pub year: i32,
}

impl Entity for Book {
    const DESCRIPTOR: &'static EntityDescriptor = &BOOK;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
