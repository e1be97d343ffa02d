//! Generic resource-management components

pub mod gateway;
pub mod list_view;
pub mod notification;
pub mod record_form;
pub mod routing;

use std::sync::Arc;

use crate::{
    models::{Book, Dvd, Magazine},
    transport::Transport,
};

pub use gateway::ResourceGateway;
pub use list_view::{ListDisplay, ListView};
pub use notification::Notification;
pub use record_form::{FormMode, RecordForm};
pub use routing::{History, Navigator, Route};

/// Container for the per-kind gateways, all sharing one transport.
///
/// There is no shared cache: each view or form built from these fetches on
/// mount and treats its copy as advisory.
#[derive(Clone)]
pub struct Catalog {
    pub books: ResourceGateway<Book>,
    pub magazines: ResourceGateway<Magazine>,
    pub dvds: ResourceGateway<Dvd>,
}

impl Catalog {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            books: ResourceGateway::new(transport.clone()),
            magazines: ResourceGateway::new(transport.clone()),
            dvds: ResourceGateway::new(transport),
        }
    }
}
