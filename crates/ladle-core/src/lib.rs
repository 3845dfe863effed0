//! Shared web-service plumbing for the Ladle workspace.
//!
//! Health endpoints, request-id middleware, tracing bootstrap, the
//! gateway identity extractors, and the short-link codec.

pub mod health;
pub mod identity;
pub mod middleware;
pub mod shortlink;
pub mod tracing;
