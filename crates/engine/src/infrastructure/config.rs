//! Engine configuration from environment variables.
//!
//! Supported variables (all optional):
//! - `OLLAMA_BASE_URL`, `OLLAMA_MODEL`: model endpoint
//! - `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`, `LLM_MAX_ATTEMPTS`, `LLM_TIMEOUT_SECS`: compiler tuning
//! - `DEFAULT_COMPANION_ID`: companion used when an action has no `assigned_to`
//! - `SERVER_HOST`, `SERVER_PORT` (or `PORT`): listen address
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origins, or `*`

use squadlink_domain::{CompanionId, DEFAULT_COMPANION_ID};

use super::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_attempts: u32,
    pub timeout_secs: u64,
    pub default_companion: CompanionId,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_companion: CompanionId::from(DEFAULT_COMPANION_ID),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Missing keys keep their defaults;
    /// unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let default_companion = match get("DEFAULT_COMPANION_ID").map(CompanionId::new) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "DEFAULT_COMPANION_ID is invalid, ignoring");
                defaults.default_companion
            }
            None => defaults.default_companion,
        };

        let max_attempts = parse_var(&get, "LLM_MAX_ATTEMPTS", defaults.max_attempts);
        let max_attempts = if max_attempts == 0 {
            tracing::warn!("LLM_MAX_ATTEMPTS must be at least 1, using 1");
            1
        } else {
            max_attempts
        };

        let server_port = get("SERVER_PORT").or_else(|| get("PORT"));

        Self {
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            ollama_model: get("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            temperature: parse_var(&get, "LLM_TEMPERATURE", defaults.temperature),
            max_tokens: parse_var(&get, "LLM_MAX_TOKENS", defaults.max_tokens),
            max_attempts,
            timeout_secs: parse_var(&get, "LLM_TIMEOUT_SECS", defaults.timeout_secs),
            default_companion,
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(server_port, "SERVER_PORT", defaults.server_port),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(get: impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    parse_or(get(key), key, default)
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match value {
        Some(val) => match val.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    key,
                    val = %val,
                    "Invalid value for environment variable, using default"
                );
                default
            }
        },
        None => default,
    }
}

/// Load `.env.local` then `.env` from the repo root, if present.
///
/// Values already in the environment win, so local overrides come first.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
