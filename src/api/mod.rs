pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use metrics::Metrics;
pub use routes::create_router;
pub use state::AppState;
