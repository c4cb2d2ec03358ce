use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default, skip_serializing)]
    pub database_url: String,
    #[serde(default, skip_serializing)]
    pub llm_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible base URL, e.g. https://api.groq.com/openai/v1
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            cors: CorsConfig {
                enabled: true,
                origins: vec!["*".to_string()],
            },
            database: DatabaseConfig { max_connections: 5 },
            llm: LlmConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: helpdesk_llm::agent::DEFAULT_MODEL.to_string(),
                temperature: helpdesk_llm::agent::DEFAULT_TEMPERATURE,
                max_tokens: helpdesk_llm::agent::DEFAULT_MAX_TOKENS,
            },
            rate_limit: RateLimitConfig {
                window_secs: 60,
                max_requests: 20,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            database_url: String::new(),
            llm_api_key: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from built-in defaults, TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. built-in defaults
    /// 2. config/default.toml
    /// 3. config/{ENV}.toml (if ENV is set)
    /// 4. HELPDESK_<SECTION>__<KEY> environment variables, e.g. HELPDESK_SERVER__PORT
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(ConfigLoader::try_from(&Config::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("HELPDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.database_url = std::env::var("DATABASE_URL").map_err(|_| {
            ConfigError::Message("DATABASE_URL environment variable is required".to_string())
        })?;
        cfg.llm_api_key = std::env::var("LLM_API_KEY").map_err(|_| {
            ConfigError::Message("LLM_API_KEY environment variable is required".to_string())
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .add_source(ConfigLoader::try_from(&Config::default())?)
            .add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }
}
