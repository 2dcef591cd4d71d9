use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the Gemini API, without trailing slash
    pub endpoint: String,
    /// Model used for generateContent calls
    pub model: String,
    /// Overall timeout for one upstream call, in seconds
    pub timeout_secs: u64,
    /// Language the subtitles are translated into
    pub target_language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:3000".to_string(),
            ],
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            timeout_secs: 90,
            target_language: "Hinglish (a mix of Hindi and English)".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full generateContent URL for the configured model
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| GatewayError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
