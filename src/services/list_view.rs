//! List-and-search view state for one entity kind

use crate::{
    models::{Entity, RecordId, SearchParams},
    services::{gateway::ResourceGateway, notification::Notification},
};

/// What the table area should show
#[derive(Debug, PartialEq)]
pub enum ListDisplay<'a, E> {
    Loading,
    /// Explicit "no records" state; not an error
    Empty,
    Records(&'a [E]),
}

/// Owns the displayed record set, search filters and the delete dialog.
///
/// Records are replaced wholesale by every successful list or search; the
/// only local patch is dropping a record after a confirmed delete.
pub struct ListView<E: Entity> {
    gateway: ResourceGateway<E>,
    records: Vec<E>,
    search: SearchParams,
    notification: Notification,
    pending_delete: Option<RecordId>,
}

impl<E: Entity> ListView<E> {
    pub fn new(gateway: ResourceGateway<E>) -> Self {
        Self {
            gateway,
            records: Vec::new(),
            search: SearchParams::new(),
            notification: Notification::default(),
            pending_delete: None,
        }
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn dismiss_error(&mut self) {
        self.notification.dismiss();
    }

    /// Table interaction is suppressed while a call is pending.
    ///
    /// The async operations hold `&mut self` until they complete, so a caller
    /// that awaits them never sees the pending state. It persists only when
    /// an operation's future is dropped mid-call, and clears on the next fetch.
    pub fn is_interactive(&self) -> bool {
        !self.notification.is_loading()
    }

    pub fn display(&self) -> ListDisplay<'_, E> {
        if self.notification.is_loading() {
            ListDisplay::Loading
        } else if self.records.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Records(&self.records)
        }
    }

    /// Initial fetch
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        let action = format!("load {}", E::DESCRIPTOR.plural);
        self.notification.start_loading();
        let result = self.gateway.list().await;
        self.apply_fetch(&action, result);
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    pub fn set_search_param(&mut self, field: &str, value: &str) {
        self.search.set(field, value);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Run the current filters; all-blank filters list everything
    pub async fn submit_search(&mut self) {
        let action = format!("search {}", E::DESCRIPTOR.plural);
        self.notification.start_loading();
        let result = self.gateway.search(&self.search).await;
        self.apply_fetch(&action, result);
    }

    /// Single-field search. Fields with their own lookup path (a magazine's
    /// issue number) go there; the rest use `/{kind}/buscar/{field}`.
    pub async fn submit_field_search(&mut self, field: &str, value: &str) {
        let action = format!("search {}", E::DESCRIPTOR.plural);
        self.notification.start_loading();
        let result = if E::DESCRIPTOR.path_search(field).is_some() {
            self.gateway.search_by_path(field, value).await
        } else {
            self.gateway.search_by(field, value).await
        };
        self.apply_fetch(&action, result);
    }

    fn apply_fetch(&mut self, action: &str, result: crate::error::AppResult<Vec<E>>) {
        match result {
            Ok(records) => {
                tracing::debug!("Loaded {} {}", records.len(), E::DESCRIPTOR.plural);
                self.records = records;
                self.notification.dismiss();
            }
            // Stale records stay visible
            Err(e) => self.notification.fail(action, &e),
        }
        self.notification.finish_loading();
    }

    /// Open the confirmation dialog for a displayed record.
    ///
    /// Returns false when the record is not on screen or a call is pending.
    pub fn request_delete(&mut self, id: RecordId) -> bool {
        if !self.is_interactive() || !self.records.iter().any(|r| r.id() == Some(id)) {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Answer "yes" to the dialog. Returns true when a record was removed.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        let action = format!("delete the {}", E::DESCRIPTOR.singular);

        self.notification.start_loading();
        let result = self.gateway.delete(id).await;
        self.notification.finish_loading();

        match result {
            Ok(()) => {
                if let Some(pos) = self.records.iter().position(|r| r.id() == Some(id)) {
                    self.records.remove(pos);
                }
                true
            }
            Err(e) => {
                self.notification.fail(&action, &e);
                false
            }
        }
    }
}
