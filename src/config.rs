use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_filter: String,
    pub log_json: bool,
    pub workspace: Option<PathBuf>,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_endpoint: String,
    pub auth_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_json: false,
            workspace: None,
            ai_api_key: None,
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            auth_delay: Duration::ZERO,
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Builds the config from any key lookup; unset or unparseable values keep defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            log_filter: non_empty(get("EDUPRO_LOG")).unwrap_or(d.log_filter),
            log_json: get("EDUPRO_LOG_JSON")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(d.log_json),
            workspace: non_empty(get("EDUPRO_WORKSPACE")).map(PathBuf::from),
            ai_api_key: non_empty(get("EDUPRO_AI_API_KEY")).or_else(|| non_empty(get("API_KEY"))),
            ai_model: non_empty(get("EDUPRO_AI_MODEL")).unwrap_or(d.ai_model),
            ai_endpoint: non_empty(get("EDUPRO_AI_ENDPOINT"))
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(d.ai_endpoint),
            auth_delay: get("EDUPRO_AUTH_DELAY_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(d.auth_delay),
        }
    }
}
