use crate::errors::{StripError, StripResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> StripResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        // Default db_path is relative to executable directory
        let db_path = std::env::var("PANELFEED_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("panelfeed.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./panelfeed.db".to_string())
        });

        let http_timeout_secs = match std::env::var("PANELFEED_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                StripError::Config(format!(
                    "PANELFEED_HTTP_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    raw
                ))
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            db_path,
            http_timeout_secs,
        })
    }
}
