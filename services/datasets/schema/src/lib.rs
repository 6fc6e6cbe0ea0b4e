pub mod authors;
pub mod communities;
pub mod dataset_communities;
pub mod datasets;
pub mod user_follow_authors;
pub mod user_follow_communities;
