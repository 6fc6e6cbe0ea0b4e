pub mod datasets;
pub mod follow;
