//! Magazine model

use serde::{Deserialize, Serialize};

use super::{
    descriptor::{EntityDescriptor, FieldDefault, FieldSpec, PathSearch},
    Entity, Kind, RecordId,
};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::text("author", "Author").required(),
    FieldSpec::text("category", "Category")
        .required()
        .with_default(FieldDefault::Text("General")),
    FieldSpec::integer("issueNumber", "Issue number", 1)
        .required()
        .with_default(FieldDefault::Integer(1)),
    FieldSpec::text("publisher", "Publisher").required(),
    FieldSpec::year("year", "Year", 1900, 2100).required(),
];

pub const MAGAZINE: EntityDescriptor = EntityDescriptor {
    kind: Kind::Magazine,
    endpoint: "/magazines",
    singular: "magazine",
    plural: "magazines",
    summary: "Manage the library's magazine catalog.",
    fields: FIELDS,
    search_fields: &["category", "publisher", "author"],
    single_search_key: Some("q"),
    path_searches: &[PathSearch {
        field: "issueNumber",
        segment: "numero",
    }],
    has_template: false,
};

/// Magazine issue record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Magazine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub author: String,
    pub category: String,
    pub issue_number: i32,
    pub publisher: String,
    pub year: i32,
}

impl Entity for Magazine {
    const DESCRIPTOR: &'static EntityDescriptor = &MAGAZINE;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
