pub mod controller;
pub mod decoder;
pub mod token_store;

pub use controller::{SessionController, SessionState};
pub use decoder::SessionUser;
pub use token_store::TokenStore;
