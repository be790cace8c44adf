use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, FromEnv};

// Import the database config from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Directory where uploaded product images are written
    pub image_dir: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let image_dir = env_or_default("IMAGE_DIR", "images");

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            image_dir,
        })
    }
}
