//! API Module
//!
//! HTTP handlers and routing for the feed REST API. This is the query layer
//! in front of the cached feed service.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
