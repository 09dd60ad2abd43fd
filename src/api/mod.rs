//! API Module
//!
//! HTTP handlers and routing for the order REST API.
//!
//! # Endpoints
//! - `POST /Create` - Cache an order
//! - `GET /GetOrder?orderId=` - Fetch a cached order
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
