//! Resource gateway: one generic REST client per entity kind

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{Entity, EntityDescriptor, RecordId, SearchParams},
    transport::{ApiRequest, Transport},
};

/// Translates descriptor + verb into a remote call.
///
/// Every call is issued at most once; nothing is retried or cached.
pub struct ResourceGateway<E: Entity> {
    transport: Arc<dyn Transport>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for ResourceGateway<E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for ResourceGateway<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceGateway")
            .field("endpoint", &E::DESCRIPTOR.endpoint)
            .finish()
    }
}

impl<E: Entity> ResourceGateway<E> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _entity: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        E::DESCRIPTOR
    }

    fn endpoint(&self) -> &'static str {
        E::DESCRIPTOR.endpoint
    }

    fn record_path(&self, id: RecordId) -> String {
        format!("{}/{}", self.endpoint(), id)
    }

    /// Fetch all persisted records of this kind
    pub async fn list(&self) -> AppResult<Vec<E>> {
        let body = self.transport.send(ApiRequest::get(self.endpoint())).await?;
        decode(body)
    }

    pub async fn get_by_id(&self, id: RecordId) -> AppResult<E> {
        let body = self.transport.send(ApiRequest::get(self.record_path(id))).await?;
        decode(body)
    }

    /// Persist a new record; the store assigns `id`
    pub async fn create(&self, draft: &E) -> AppResult<E> {
        let mut fields = draft.to_fields()?;
        fields.remove("id");
        let body = self
            .transport
            .send(ApiRequest::post(self.endpoint(), Value::Object(fields)))
            .await?;
        let created: E = decode(body)?;
        tracing::info!(
            "Created {} id={:?}",
            E::DESCRIPTOR.singular,
            created.id()
        );
        Ok(created)
    }

    /// Replace every field of a persisted record
    pub async fn update(&self, id: RecordId, draft: &E) -> AppResult<E> {
        let mut fields = draft.to_fields()?;
        fields.insert("id".to_string(), Value::from(id));
        let body = self
            .transport
            .send(ApiRequest::put(self.record_path(id), Value::Object(fields)))
            .await?;
        let updated = decode(body)?;
        tracing::info!("Updated {} id={}", E::DESCRIPTOR.singular, id);
        Ok(updated)
    }

    pub async fn delete(&self, id: RecordId) -> AppResult<()> {
        self.transport
            .send(ApiRequest::delete(self.record_path(id)))
            .await?;
        tracing::info!("Deleted {} id={}", E::DESCRIPTOR.singular, id);
        Ok(())
    }

    /// Server-side filter over the searchable fields.
    ///
    /// Blank and non-searchable parameters are dropped before the call; when
    /// nothing is left this is a plain `list()`.
    pub async fn search(&self, params: &SearchParams) -> AppResult<Vec<E>> {
        let query = params.to_query(E::DESCRIPTOR);
        if query.is_empty() {
            return self.list().await;
        }
        let request = ApiRequest::get(format!("{}/buscar", self.endpoint())).with_query(query);
        let body = self.transport.send(request).await?;
        decode(body)
    }

    /// Single-field search via `/{kind}/buscar/{field}`
    pub async fn search_by(&self, field: &str, value: &str) -> AppResult<Vec<E>> {
        if !E::DESCRIPTOR.is_searchable(field) {
            return Err(AppError::Validation(format!(
                "{} cannot be searched by '{}'",
                E::DESCRIPTOR.plural,
                field
            )));
        }
        let value = value.trim();
        if value.is_empty() {
            return self.list().await;
        }
        let key = E::DESCRIPTOR.single_search_key(field);
        let request = ApiRequest::get(format!("{}/buscar/{}", self.endpoint(), field))
            .with_query(vec![(key.to_string(), value.to_string())]);
        let body = self.transport.send(request).await?;
        decode(body)
    }

    /// Exact-value lookup under `{endpoint}/{segment}/{value}`, e.g. a
    /// magazine's issue number.
    ///
    /// The value goes through the field's input parsing first, so a
    /// non-numeric issue number fails locally.
    pub async fn search_by_path(&self, field: &str, value: &str) -> AppResult<Vec<E>> {
        let Some(search) = E::DESCRIPTOR.path_search(field) else {
            return Err(AppError::Validation(format!(
                "{} cannot be looked up by '{}'",
                E::DESCRIPTOR.plural,
                field
            )));
        };
        let value = value.trim();
        if value.is_empty() {
            return self.list().await;
        }
        let value = match E::DESCRIPTOR.field(field) {
            Some(spec) => spec.parse_input(value)?,
            None => Value::from(value),
        };
        let segment_value = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let request = ApiRequest::get(format!(
            "{}/{}/{}",
            self.endpoint(),
            search.segment,
            segment_value
        ));
        let body = self.transport.send(request).await?;
        decode(body)
    }

    /// Kind-specific defaults for a new draft, restricted to declared fields.
    ///
    /// Kinds without a template endpoint return `Ok(None)` without a call.
    pub async fn template(&self) -> AppResult<Option<Map<String, Value>>> {
        if !E::DESCRIPTOR.has_template {
            return Ok(None);
        }
        let body = self
            .transport
            .send(ApiRequest::get(format!("{}/template", self.endpoint())))
            .await?;
        let Some(body) = body else {
            return Ok(None);
        };
        let template: Map<String, Value> = serde_json::from_value(body)?;
        Ok(Some(E::DESCRIPTOR.retain_declared(template)))
    }
}

fn decode<T: DeserializeOwned>(body: Option<Value>) -> AppResult<T> {
    let body = body.ok_or_else(|| AppError::Transport("empty response body".to_string()))?;
    Ok(serde_json::from_value(body)?)
}
