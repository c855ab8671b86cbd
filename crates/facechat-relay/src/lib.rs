//! Facechat relay crate - axum HTTP server forwarding chat to inference.
//!
//! Exposes `POST /chat`, which forwards each message to the inference
//! backend exactly once and always answers with a `{ response }` envelope,
//! plus a `/health` route for operators.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::ApiError;
pub use handlers::FAILURE_SENTINEL;
pub use routes::{create_router, start_server};
pub use state::AppState;
pub use upstream::{InferenceClient, RelayError};
