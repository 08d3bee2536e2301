//! Web layer: JSON API plus a minimal HTML surface.

mod dto;
mod routes;
mod state;
mod templates;
mod tokens;

pub use routes::{AppError, create_router};
pub use state::AppState;
pub use tokens::RequestTokens;
