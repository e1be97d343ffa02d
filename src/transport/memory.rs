//! In-process store implementing the catalog REST contract.
//!
//! Used by the integration tests and handy for exercising views without a
//! running server. Every request is recorded so callers can assert on what
//! was (or was not) sent.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard},
};

use super::{ApiRequest, Method, Transport};
use crate::{
    error::{AppError, AppResult},
    models::{Kind, RecordId},
};

#[derive(Default)]
struct Collection {
    next_id: RecordId,
    records: BTreeMap<RecordId, Map<String, Value>>,
    template: Option<Map<String, Value>>,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Collection>,
    requests: Vec<ApiRequest>,
    failure: Option<(u16, String)>,
}

pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store serving every catalog kind
    pub fn new() -> Self {
        let mut state = StoreState::default();
        for kind in Kind::all() {
            state
                .collections
                .insert(kind.segment().to_string(), Collection::default());
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Serve `template` as `GET /{kind}/template`
    pub fn with_template(self, kind: Kind, template: Value) -> Self {
        if let Value::Object(map) = template {
            if let Some(collection) = self.lock().collections.get_mut(kind.segment()) {
                collection.template = Some(map);
            }
        }
        self
    }

    /// Insert a record directly, bypassing the request log. Returns its id.
    pub fn seed(&self, kind: Kind, record: Value) -> RecordId {
        let mut state = self.lock();
        let collection = state
            .collections
            .entry(kind.segment().to_string())
            .or_default();
        let Value::Object(fields) = record else {
            return 0;
        };
        insert_new(collection, fields).0
    }

    /// Make the next request fail with the given status
    pub fn fail_next(&self, status: u16, message: impl Into<String>) {
        self.lock().failure = Some((status, message.into()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A panic while holding the lock cannot leave collections half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MemoryStore {
    async fn send(&self, request: ApiRequest) -> AppResult<Option<Value>> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if let Some((status, message)) = state.failure.take() {
            return Err(error(status, &message));
        }

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let Some((&kind, rest)) = segments.split_first() else {
            return Err(error(404, "no such resource"));
        };
        let Some(collection) = state.collections.get_mut(kind) else {
            return Err(error(404, &format!("unknown resource '{}'", kind)));
        };

        match (request.method, rest) {
            (Method::Get, []) => Ok(Some(list(collection, &[]))),
            (Method::Post, []) => {
                let fields = object_body(&request)?;
                Ok(Some(insert_new(collection, fields).1))
            }
            (Method::Get, ["template"]) => collection
                .template
                .clone()
                .map(|t| Some(Value::Object(t)))
                .ok_or_else(|| error(404, &format!("no template for {}", kind))),
            (Method::Get, ["buscar"]) => Ok(Some(list(collection, &request.query))),
            (Method::Get, ["buscar", field]) => {
                let key = Kind::from_segment(kind)
                    .map_or(*field, |k| k.descriptor().single_search_key(field));
                let filters: Vec<(String, String)> = request
                    .query
                    .iter()
                    .filter(|(k, _)| k == key)
                    .map(|(_, v)| (field.to_string(), v.clone()))
                    .collect();
                Ok(Some(list(collection, &filters)))
            }
            (Method::Get, [segment, value]) => {
                let search = Kind::from_segment(kind)
                    .and_then(|k| k.descriptor().path_search_by_segment(segment))
                    .ok_or_else(|| error(404, &format!("no route for {}", request)))?;
                Ok(Some(exact(collection, search.field, value)))
            }
            (method, [id]) => {
                let id: RecordId = id
                    .parse()
                    .map_err(|_| error(404, &format!("no {} with id '{}'", kind, id)))?;
                match method {
                    Method::Get => collection
                        .records
                        .get(&id)
                        .map(|r| Some(Value::Object(r.clone())))
                        .ok_or_else(|| not_found(kind, id)),
                    Method::Put => {
                        if !collection.records.contains_key(&id) {
                            return Err(not_found(kind, id));
                        }
                        let mut fields = object_body(&request)?;
                        fields.insert("id".to_string(), Value::from(id));
                        collection.records.insert(id, fields.clone());
                        Ok(Some(Value::Object(fields)))
                    }
                    Method::Delete => collection
                        .records
                        .remove(&id)
                        .map(|_| None)
                        .ok_or_else(|| not_found(kind, id)),
                    Method::Post => Err(error(405, "method not allowed")),
                }
            }
            _ => Err(error(404, &format!("no route for {}", request))),
        }
    }
}

fn insert_new(collection: &mut Collection, mut fields: Map<String, Value>) -> (RecordId, Value) {
    collection.next_id += 1;
    let id = collection.next_id;
    fields.insert("id".to_string(), Value::from(id));
    collection.records.insert(id, fields.clone());
    (id, Value::Object(fields))
}

/// Records in id order; every filter must match as a case-insensitive substring
fn list(collection: &Collection, filters: &[(String, String)]) -> Value {
    let records = collection
        .records
        .values()
        .filter(|record| {
            filters.iter().all(|(field, needle)| {
                let haystack = match record.get(field) {
                    Some(Value::String(s)) => s.to_lowercase(),
                    Some(other) => other.to_string(),
                    None => return false,
                };
                haystack.contains(&needle.to_lowercase())
            })
        })
        .cloned()
        .map(Value::Object)
        .collect();
    Value::Array(records)
}

/// Records whose `field` equals `value` exactly, numbers compared by their text
fn exact(collection: &Collection, field: &str, value: &str) -> Value {
    let records = collection
        .records
        .values()
        .filter(|record| match record.get(field) {
            Some(Value::String(s)) => s == value,
            Some(other) => other.to_string() == value,
            None => false,
        })
        .cloned()
        .map(Value::Object)
        .collect();
    Value::Array(records)
}

fn object_body(request: &ApiRequest) -> AppResult<Map<String, Value>> {
    match &request.body {
        Some(Value::Object(map)) => {
            let mut map = map.clone();
            map.remove("id");
            Ok(map)
        }
        _ => Err(error(400, "request body must be a JSON object")),
    }
}

fn not_found(kind: &str, id: RecordId) -> AppError {
    error(404, &format!("no {} with id {}", kind, id))
}

fn error(status: u16, message: &str) -> AppError {
    AppError::from_status(status, &json!({ "message": message }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store
            .send(ApiRequest::post("/books", json!({"title": "Dune"})))
            .await
            .unwrap()
            .unwrap();
        let second = store
            .send(ApiRequest::post("/books", json!({"title": "Emma"})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store.send(ApiRequest::get("/dvds/42")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.send(ApiRequest::delete("/dvds/42")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let store = MemoryStore::new();
        store.seed(Kind::Magazine, json!({"title": "Nature", "category": "Science"}));
        store.seed(Kind::Magazine, json!({"title": "Vogue", "category": "Fashion"}));

        let found = store
            .send(
                ApiRequest::get("/magazines/buscar")
                    .with_query(vec![("category".into(), "science".into())]),
            )
            .await
            .unwrap()
            .unwrap();
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], json!("Nature"));
    }

    #[tokio::test]
    async fn test_single_field_search_reads_kind_key() {
        let store = MemoryStore::new();
        store.seed(Kind::Book, json!({"title": "Dune", "author": "Herbert"}));
        store.seed(Kind::Book, json!({"title": "Emma", "author": "Austen"}));
        store.seed(Kind::Dvd, json!({"title": "Alien", "director": "Ridley Scott"}));

        let books = store
            .send(
                ApiRequest::get("/books/buscar/title")
                    .with_query(vec![("q".into(), "dune".into())]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(books.as_array().unwrap().len(), 1);
        assert_eq!(books[0]["title"], json!("Dune"));

        let dvds = store
            .send(
                ApiRequest::get("/dvds/buscar/director")
                    .with_query(vec![("director".into(), "scott".into())]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dvds.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_issue_number_route_matches_exactly() {
        let store = MemoryStore::new();
        store.seed(Kind::Magazine, json!({"title": "Nature", "issueNumber": 42}));
        store.seed(Kind::Magazine, json!({"title": "Wired", "issueNumber": 420}));

        let found = store
            .send(ApiRequest::get("/magazines/numero/42"))
            .await
            .unwrap()
            .unwrap();
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], json!("Nature"));

        let err = store.send(ApiRequest::get("/books/numero/42")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_template_only_when_registered() {
        let store = MemoryStore::new().with_template(Kind::Dvd, json!({"genre": "Action"}));
        let template = store.send(ApiRequest::get("/dvds/template")).await.unwrap();
        assert_eq!(template, Some(json!({"genre": "Action"})));

        let err = store.send(ApiRequest::get("/books/template")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let store = MemoryStore::new();
        store.fail_next(500, "database unavailable");
        let err = store.send(ApiRequest::get("/books")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(store.send(ApiRequest::get("/books")).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_object_body_rejected() {
        let store = MemoryStore::new();
        let err = store
            .send(ApiRequest::post("/books", json!(["Dune"])))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
