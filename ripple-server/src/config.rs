use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// Prefix for derived media keys; the media store resolves them.
    pub upload_root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub media: Media,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in ripple-server directory (for development)
        let dev_path = PathBuf::from("ripple-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        // 2. Defaults, then environment variables (highest priority)
        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "ripple.db")?
            .set_default("database.seed_demo_data", false)?
            .set_default("media.upload_root", "uploads")?;

        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(root) = std::env::var("MEDIA_ROOT") {
            builder = builder.set_override("media.upload_root", root)?;
        }
        if let Ok(seed) = std::env::var("SEED_DEMO_DATA") {
            let seed = seed == "1" || seed.eq_ignore_ascii_case("true");
            builder = builder.set_override("database.seed_demo_data", seed)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
