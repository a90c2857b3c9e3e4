use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub api: ApiConfig,
    pub listener: ListenerConfig,
}

impl Config {
    /// Build config for a named profile (empty string = default). When set
    /// (e.g. `PROD`), every key is first looked up as `{PROFILE}_{KEY}`,
    /// falling back to `{KEY}`. Call `load_dotenv()` first.
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            api: ApiConfig::from_env_profiled(p),
            listener: ListenerConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  api:       url={}, token={}",
            self.api.url.as_deref().unwrap_or("(none)"),
            if self.api.token.is_some() { "(set)" } else { "(none)" }
        );
        tracing::info!(
            "  listener:  addr={}, verbose={}",
            self.listener.bind_addr(),
            self.listener.verbose
        );
    }
}

// ── Sub-configs ───────────────────────────────────────────────

/// REST API endpoint and credentials used to look up problem details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_opt(p, "MONCONF_API_URL")
                .map(|u| u.trim_end_matches('/').to_string()),
            token: profiled_env_opt(p, "MONCONF_API_TOKEN"),
        }
    }
}

/// Problem-notification listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    /// Log every rejected request and full notification payloads.
    pub verbose: bool,
}

impl ListenerConfig {
    pub fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "LISTENER_HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "LISTENER_PORT", 8080),
            verbose: profiled_env_bool(p, "LISTENER_VERBOSE"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
