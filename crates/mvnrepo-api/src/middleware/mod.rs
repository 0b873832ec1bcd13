//! # Middleware
//!
//! Tower layers wrapped around every route.

pub mod server_header;
pub mod tracing_layer;
