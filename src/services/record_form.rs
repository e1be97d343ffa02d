//! Create/edit form state for one entity kind

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{DraftRecord, Entity, RecordId},
    services::{
        gateway::ResourceGateway,
        notification::Notification,
        routing::{Navigator, Route},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit(RecordId),
}

impl FormMode {
    pub fn from_id(id: Option<RecordId>) -> Self {
        id.map_or(FormMode::New, FormMode::Edit)
    }
}

pub struct RecordForm<E: Entity> {
    gateway: ResourceGateway<E>,
    mode: FormMode,
    draft: DraftRecord<E>,
    notification: Notification,
}

impl<E: Entity> RecordForm<E> {
    /// Form seeded with hard-coded defaults; `id` selects edit mode
    pub fn new(gateway: ResourceGateway<E>, id: Option<RecordId>) -> AppResult<Self> {
        Ok(Self {
            gateway,
            mode: FormMode::from_id(id),
            draft: DraftRecord::from_defaults()?,
            notification: Notification::default(),
        })
    }

    /// Form for a `New` or `Edit` route addressing this kind
    pub fn for_route(gateway: ResourceGateway<E>, route: &Route) -> AppResult<Self> {
        let kind = E::DESCRIPTOR.kind;
        match *route {
            Route::New(k) if k == kind => Self::new(gateway, None),
            Route::Edit(k, id) if k == kind => Self::new(gateway, Some(id)),
            _ => Err(AppError::Internal(format!(
                "route {} does not address a {} form",
                route, E::DESCRIPTOR.singular
            ))),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &DraftRecord<E> {
        &self.draft
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn dismiss_error(&mut self) {
        self.notification.dismiss();
    }

    /// Submit control is disabled while a call is pending
    pub fn can_submit(&self) -> bool {
        !self.notification.is_loading()
    }

    /// Edit mode loads the record; new mode overlays the kind's template
    pub async fn mount(&mut self) {
        match self.mode {
            FormMode::Edit(id) => self.load(id).await,
            FormMode::New => {
                if let Some(template) = self.fetch_template().await {
                    self.apply_template(&template);
                }
            }
        }
    }

    async fn load(&mut self, id: RecordId) {
        let action = format!("load the {}", E::DESCRIPTOR.singular);
        self.notification.start_loading();
        match self.gateway.get_by_id(id).await {
            Ok(record) => {
                self.draft = DraftRecord::from_record(record);
                self.notification.dismiss();
            }
            // Defaults stay in place so the form remains usable
            Err(e) => self.notification.fail(&action, &e),
        }
        self.notification.finish_loading();
    }

    /// Best-effort template fetch; any failure keeps the local defaults
    pub async fn fetch_template(&self) -> Option<Map<String, Value>> {
        match self.gateway.template().await {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(
                    "{} template unavailable, keeping defaults: {}",
                    E::DESCRIPTOR.singular,
                    e
                );
                None
            }
        }
    }

    /// Overlay a template that may arrive after the user started typing.
    ///
    /// Only fields the user has not edited are overwritten.
    pub fn apply_template(&mut self, template: &Map<String, Value>) -> Vec<&'static str> {
        match self.draft.merge_template(template) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::warn!("Ignoring malformed {} template: {}", E::DESCRIPTOR.singular, e);
                Vec::new()
            }
        }
    }

    /// Write one field from user input. Unparseable input is reported and
    /// leaves the draft unchanged.
    pub fn set_field(&mut self, field: &str, raw: &str) -> bool {
        match self.draft.set_field(field, raw) {
            Ok(()) => true,
            Err(e) => {
                self.notification.set_error(e.message());
                false
            }
        }
    }

    /// Validate locally, then create or update.
    ///
    /// On success navigates to the kind's list and returns the saved record.
    /// On failure the draft is kept intact for correction.
    pub async fn submit(&mut self, navigator: &dyn Navigator) -> Option<E> {
        if !self.can_submit() {
            return None;
        }
        if let Err(e) = self.draft.validate() {
            tracing::debug!("Rejected {} draft: {}", E::DESCRIPTOR.singular, e);
            self.notification.set_error(e.message());
            return None;
        }

        let action = format!("save the {}", E::DESCRIPTOR.singular);
        self.notification.start_loading();
        let result = match self.mode {
            FormMode::New => self.gateway.create(self.draft.value()).await,
            FormMode::Edit(id) => self.gateway.update(id, self.draft.value()).await,
        };
        self.notification.finish_loading();

        match result {
            Ok(saved) => {
                self.notification.dismiss();
                navigator.navigate(&Route::List(E::DESCRIPTOR.kind));
                Some(saved)
            }
            Err(e) => {
                self.notification.fail(&action, &e);
                None
            }
        }
    }
}
