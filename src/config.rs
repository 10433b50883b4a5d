use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that switches the deployment mode.
pub const DEPLOYMENT_ENV_VAR: &str = "WALLFEED_ENV";

/// Upper bound on session lifetime accepted from config (ten years).
const MAX_SESSION_HOURS: u64 = 24 * 365 * 10;

#[derive(Parser, Debug, Default)]
#[command(name = "wallfeed", about = "A small session-authenticated web feed")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Run in production mode (marks the session cookie Secure)
    #[arg(long)]
    pub production: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    /// Accounts created at startup.
    pub users: Vec<SeedUser>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub session_hours: u64,
    pub sweep_interval_secs: u64,
    pub bcrypt_cost: u32,
}

#[derive(Deserialize, Clone)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("profile_image", &self.profile_image)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            production: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "wallfeed_session".to_string(),
            session_hours: 24,
            sweep_interval_secs: 86_400,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::from_file(path)?
            }
            None => match Self::default_path() {
                Some(path) => Self::from_file(&path)?,
                None => Config::default(),
            },
        };

        config.apply_deployment_mode(std::env::var(DEPLOYMENT_ENV_VAR).ok().as_deref());

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if cli.production {
            config.server.production = true;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// `./wallfeed.toml`, then `<config dir>/wallfeed/config.toml`; the first
    /// one that exists.
    pub fn default_path() -> Option<PathBuf> {
        let local = PathBuf::from("wallfeed.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("wallfeed").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// `production` in the deployment env var turns production mode on. It
    /// never turns it off.
    pub fn apply_deployment_mode(&mut self, env_value: Option<&str>) {
        if env_value
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false)
        {
            self.server.production = true;
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.auth.session_hours.min(MAX_SESSION_HOURS) as i64)
    }

    pub fn session_max_age_secs(&self) -> u64 {
        self.auth.session_hours.min(MAX_SESSION_HOURS) * 3600
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.auth.sweep_interval_secs)
    }
}
