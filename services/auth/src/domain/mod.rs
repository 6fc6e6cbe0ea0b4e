pub mod challenge;
pub mod repository;
pub mod totp;
pub mod types;
