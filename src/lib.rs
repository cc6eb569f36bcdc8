use std::sync::Arc;

pub mod api;
pub mod config;
pub mod inference;
pub mod model;
pub mod store;

use inference::TextGenerator;
use store::MessageStore;

/// Shared state injected into every handler. The store and the generator
/// are owned here, not module globals, so tests build isolated instances.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MessageStore>,
    pub infer: Arc<dyn TextGenerator>,
}
