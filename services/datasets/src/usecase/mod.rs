pub mod downloads;
pub mod follow;
pub mod related;
pub mod trending;
