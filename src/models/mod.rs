//! Request and Response models for the order API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod order;
pub mod responses;

// Re-export commonly used types
pub use order::{GetOrderQuery, Order};
pub use responses::HealthResponse;
