use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub vendor: VendorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VendorConfig {
    /// Vendor ERP endpoint, e.g. "https://host/API/api.php"
    pub base_url: String,
    pub username: String,
    pub password: String,

    /// Long-lived bearer token; when set, the login exchange is skipped
    #[serde(default)]
    pub preset_bearer_token: Option<String>,

    /// TLS certificate verification; disabling it requires an explicit opt-out
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Deliberately conservative vs. the vendor's nominal ~1-hour lifetime
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_hours: i64,
}

fn default_tls_verify() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_token_lifetime() -> i64 {
    3
}

/// Default configuration embedded in the binary
///
/// Credentials are intentionally empty: they must come from config.toml,
/// never from source code.
const DEFAULT_CONFIG: &str = r#"
[vendor]
base_url = "https://avantemedicals.com/API/api.php"
username = ""
password = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}
