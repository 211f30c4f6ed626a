//! HTTP adapters: routes, handlers, and DTOs for the analysis API.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::AppState;
pub use routes::api_routes;
