use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// Directory scanned for pending scan images awaiting assignment.
    pub upload_dir: PathBuf,
    /// Directory for profile pictures.
    pub avatar_dir: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("DEMS_JWT_SECRET")?;

        let host: IpAddr = env_or("DEMS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid DEMS_HOST: {e}"))?;

        let port: u16 = env_or("DEMS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid DEMS_PORT: {e}"))?;

        let upload_dir = PathBuf::from(env_or("DEMS_UPLOAD_DIR", "uploads/pending"));
        let avatar_dir = PathBuf::from(env_or("DEMS_AVATAR_DIR", "uploads/avatars"));

        let max_body_size: usize = env_or("DEMS_MAX_BODY_SIZE", "5242880")
            .parse()
            .map_err(|e| format!("Invalid DEMS_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("DEMS_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            upload_dir,
            avatar_dir,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
