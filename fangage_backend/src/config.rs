use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct FangageConfig {
    pub api_port: u16,
    /// Fixed artificial delay applied before login and post submission to
    /// simulate network latency. No retry or cancellation semantics.
    pub simulated_latency: Duration,
    pub caption: CaptionConfig,
}

impl FangageConfig {
    pub fn from_env() -> Self {
        let api_port = env::var("FANGAGE_API_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let simulated_latency = env::var("FANGAGE_SIMULATED_LATENCY_MS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1000));
        Self {
            api_port,
            simulated_latency,
            caption: CaptionConfig::from_env(),
        }
    }

    pub fn new(api_port: u16, simulated_latency: Duration, caption: CaptionConfig) -> Self {
        Self {
            api_port,
            simulated_latency,
            caption,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// When unset the caption call degrades to a deterministic mock string.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl CaptionConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("FANGAGE_GEMINI_API_KEY").ok().and_then(|raw| {
            if raw.trim().is_empty() {
                None
            } else {
                Some(raw)
            }
        });
        let model = env::var("FANGAGE_GEMINI_MODEL")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = env::var("FANGAGE_GEMINI_BASE_URL")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        Self {
            api_key,
            model,
            base_url,
        }
    }
}
