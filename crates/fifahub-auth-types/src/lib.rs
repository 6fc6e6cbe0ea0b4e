//! Auth types shared across FifaHub services.
//!
//! Provides JWT validation, cookie builders, and the `IdentityHeaders` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
