// src/state.rs
use std::sync::Arc;

use crate::config::CompletionSettings;
use crate::services::completion::{CompletionClient, GroqClient};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    pub fn from_settings(settings: CompletionSettings) -> Self {
        Self::new(Arc::new(GroqClient::new(settings)))
    }
}
