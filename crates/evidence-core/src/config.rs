use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub ingestion: IngestionSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_env("EVIDENCE")
    }

    /// Load configuration from environment with custom prefix
    pub fn load_from_env(prefix: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("database.url", "postgres://localhost/evidence")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("ingestion.chunk_size_chars", 4000)?
            .set_default("ingestion.overlap_chars", 400)?
            .set_default("ingestion.min_section_chars", 1000)?
            .set_default("ingestion.max_section_chars", 80_000)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from file with environment overrides
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("EVIDENCE").separator("__"));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

/// Database configuration for the Evidence Store backend
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_connections = min;
        self.max_connections = max;
        self
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

/// Tunables for the ingestion pipeline.
///
/// Component configs in the ingestion crate validate these at pipeline
/// construction.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionSettings {
    #[serde(default = "default_chunk_size_chars")]
    pub chunk_size_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
    #[serde(default = "default_min_section_chars")]
    pub min_section_chars: usize,
    #[serde(default = "default_max_section_chars")]
    pub max_section_chars: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            chunk_size_chars: default_chunk_size_chars(),
            overlap_chars: default_overlap_chars(),
            min_section_chars: default_min_section_chars(),
            max_section_chars: default_max_section_chars(),
        }
    }
}

fn default_chunk_size_chars() -> usize {
    4000
}

fn default_overlap_chars() -> usize {
    400
}

fn default_min_section_chars() -> usize {
    1000
}

fn default_max_section_chars() -> usize {
    80_000
}
