use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the cleaned catalog snapshot (JSON rows)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the flat ratings table (JSON rows)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Directory holding per-user profile records
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_ratings_path() -> String {
    "data/ratings.json".to_string()
}

fn default_user_data_dir() -> String {
    "data/users".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
