//! HTTP plumbing shared by hackreg services.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
