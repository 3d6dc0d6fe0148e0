pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

use policy::Policy;
use services::backend::BackendClient;
use std::sync::Arc;

/// Shared application state: the backend gateway plus the authorization
/// policy, passed explicitly to every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub policy: Policy,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>, policy: Policy) -> Self {
        Self { backend, policy }
    }
}
