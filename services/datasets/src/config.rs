use serde::Deserialize;

use fifahub_core::config::Config;

/// Datasets service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct DatasetsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `DATASETS_PORT`.
    #[serde(default = "default_datasets_port")]
    pub datasets_port: u16,
}

fn default_datasets_port() -> u16 {
    3114
}

impl Config for DatasetsConfig {}
