pub mod profile;
pub mod repository;
pub mod scoring;
pub mod types;
