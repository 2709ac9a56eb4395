//! HTTP gateway for the agent registry.
//!
//! Maps every registry operation onto a JSON route, guards the API with an
//! optional master key and owns the storage lifecycle of the running server.

pub mod agent_routes;
pub mod architecture_routes;
pub mod auth_middleware;
pub mod catalog_routes;
pub mod discover_routes;
pub mod error;
pub mod server;

pub use {
    auth_middleware::MasterKey,
    error::ApiError,
    server::{AppState, build_app, start_gateway},
};
