use serde;
use toml;

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ApplicationConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub tracking: TrackingConfig,
    pub storage: StorageConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
            source: error,
            path: path.clone(),
        })
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub address: std::net::SocketAddr,
    /// Served under `/static/` when set.
    pub static_dir: Option<std::path::PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: std::net::SocketAddr::from(([127, 0, 0, 1], 5000)),
            static_dir: None,
        }
    }
}

#[derive(serde::Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            username: String::from("username"),
            password: String::from("password"),
        }
    }
}

// keep the password out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    pub aircraft_seen_gap_seconds: u32,
}

impl TrackingConfig {
    #[must_use]
    pub fn aircraft_seen_gap(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(self.aircraft_seen_gap_seconds.into())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            aircraft_seen_gap_seconds: 30,
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// sqlx SQLite url, e.g. `sqlite://xplogd_web.db` or `sqlite::memory:`
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_url: String::from("sqlite://xplogd_web.db"),
        }
    }
}

pub mod errors {
    #[derive(Debug, thiserror::Error)]
    pub enum ApplicationConfigError {
        #[error("Failed to read config file '{}': {source}", path.display())]
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },

        #[error("Failed to parse config file '{}': {source}", path.display())]
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
    }
}
