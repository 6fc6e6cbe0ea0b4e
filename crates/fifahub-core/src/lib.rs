//! Cross-cutting plumbing shared by every FifaHub service: tracing setup,
//! health probes, request-id middleware, env config loading, serde helpers
//! and the in-process rate limiter.

pub mod config;
pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod serde;
pub mod tracing;
