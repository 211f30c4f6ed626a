//! Axum router configuration for the analysis API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{analyze, capabilities, chat, examples, health, AppState};

/// Create the analysis API router.
///
/// # Routes
///
/// - `POST /analyze` - single-shot analysis
/// - `POST /chat` - multi-turn chat
/// - `GET /capabilities` - supported scenarios and live tool catalog
/// - `GET /examples` - static usage examples
/// - `GET /health` - component health probe
///
/// Suitable for mounting at `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/chat", post(chat))
        .route("/capabilities", get(capabilities))
        .route("/examples", get(examples))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_defined() {
        // Verifies the router can be constructed.
        let _router = api_routes();
    }
}
