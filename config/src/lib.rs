//! Startup configuration for jamctl.
//!
//! Configuration is resolved exactly once, at startup, into an immutable
//! [`Config`] that is passed down to every component; nothing below this
//! crate reads ambient environment state. Two sources feed the resolution,
//! environment over file:
//!
//! | Key | Environment | File (TOML) |
//! |-----|-------------|-------------|
//! | base URL | `JAM_URL` | `url` |
//! | auth token | `JAM_TOKEN` | `token` |
//! | root namespace | `JAM_NAMESPACE` | `namespace` |
//! | admin GUID | `JAM_ADMIN_GUID` | `admin_guid` |
//! | manifest path | `JAM_COLLECTIONS_PATH` | `collections_path` |
//! | bootstrap mode | - | `parallel` |
//!
//! The config file is looked up at an explicit path when given, then
//! `./jamctl.toml`, then `~/.jamctl/config.toml`. A missing file is fine as
//! long as the environment supplies every required value.
//!
//! Resolution itself is a pure function over the raw file contents and a
//! captured environment snapshot, so tests never mutate process state.

use jam_types::CollectionDef;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "jamctl.toml";
const DEFAULT_COLLECTIONS_PATH: &str = "collections.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid base URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("missing required configuration: {key}")]
    Missing { key: &'static str },
}

/// Raw file-shaped configuration. Every field is optional; requiredness is
/// decided at resolution, after environment overrides are applied.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    url: Option<String>,
    token: Option<String>,
    namespace: Option<String>,
    admin_guid: Option<String>,
    collections_path: Option<String>,
    parallel: Option<bool>,
}

/// Environment snapshot taken once at resolution time.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub admin_guid: Option<String>,
    pub collections_path: Option<String>,
}

impl EnvOverrides {
    /// Capture the `JAM_*` variables from the process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            url: std::env::var("JAM_URL").ok(),
            token: std::env::var("JAM_TOKEN").ok(),
            namespace: std::env::var("JAM_NAMESPACE").ok(),
            admin_guid: std::env::var("JAM_ADMIN_GUID").ok(),
            collections_path: std::env::var("JAM_COLLECTIONS_PATH").ok(),
        }
    }
}

/// Fully-resolved, immutable configuration.
///
/// Existence of a `Config` proves the base URL parsed and a token is
/// present. The namespace and admin GUID are only required for bootstrap
/// and stay optional until their accessors are called.
#[derive(Debug, Clone)]
pub struct Config {
    url: Url,
    token: String,
    namespace: Option<String>,
    admin_guid: Option<String>,
    collections_path: PathBuf,
    parallel: bool,
}

impl Config {
    /// Resolve configuration from the standard locations plus the captured
    /// environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let raw = match locate_file(explicit)? {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?
            }
            None => RawConfig::default(),
        };
        Self::from_sources(raw, EnvOverrides::capture())
    }

    /// Merge raw file values with the environment snapshot, environment
    /// winning, and validate what must be valid.
    pub fn from_sources(raw: RawConfig, env: EnvOverrides) -> Result<Self, ConfigError> {
        let url_text = env
            .url
            .or(raw.url)
            .ok_or(ConfigError::Missing { key: "url (JAM_URL)" })?;
        let url = Url::parse(&url_text).map_err(|source| ConfigError::InvalidUrl {
            value: url_text,
            source,
        })?;
        let token = env
            .token
            .or(raw.token)
            .ok_or(ConfigError::Missing { key: "token (JAM_TOKEN)" })?;
        let collections_path = env
            .collections_path
            .or(raw.collections_path)
            .map_or_else(|| PathBuf::from(DEFAULT_COLLECTIONS_PATH), PathBuf::from);

        Ok(Self {
            url,
            token,
            namespace: env.namespace.or(raw.namespace),
            admin_guid: env.admin_guid.or(raw.admin_guid),
            collections_path,
            parallel: raw.parallel.unwrap_or(false),
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The root namespace to bootstrap under.
    pub fn namespace(&self) -> Result<&str, ConfigError> {
        self.namespace.as_deref().ok_or(ConfigError::Missing {
            key: "namespace (JAM_NAMESPACE)",
        })
    }

    /// The admin GUID seeding the `user-osf-{guid}` permission entry.
    pub fn admin_guid(&self) -> Result<&str, ConfigError> {
        self.admin_guid.as_deref().ok_or(ConfigError::Missing {
            key: "admin_guid (JAM_ADMIN_GUID)",
        })
    }

    #[must_use]
    pub fn collections_path(&self) -> &Path {
        &self.collections_path
    }

    /// Whether bootstrap provisions manifest entries concurrently.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

fn locate_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        // An explicitly requested file must exist; silently ignoring a typo
        // would fall back to the environment and surprise the operator.
        if !path.exists() {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        return Ok(Some(local));
    }

    if let Some(home) = dirs::home_dir() {
        let fallback = home.join(".jamctl").join("config.toml");
        if fallback.exists() {
            return Ok(Some(fallback));
        }
    }

    Ok(None)
}

/// Load the bootstrap manifest: a JSON array of `{"id", "attrs"}` entries.
pub fn load_manifest(path: &Path) -> Result<Vec<CollectionDef>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, EnvOverrides, RawConfig, load_manifest};
    use std::io::Write;

    fn raw(toml_text: &str) -> RawConfig {
        toml::from_str(toml_text).expect("fixture TOML parses")
    }

    #[test]
    fn file_values_resolve() {
        let config = Config::from_sources(
            raw(r#"
                url = "https://jam.example.org"
                token = "file-token"
                namespace = "osf"
                admin_guid = "abc123"
                parallel = true
            "#),
            EnvOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.url().as_str(), "https://jam.example.org/");
        assert_eq!(config.token(), "file-token");
        assert_eq!(config.namespace().unwrap(), "osf");
        assert_eq!(config.admin_guid().unwrap(), "abc123");
        assert!(config.parallel());
    }

    #[test]
    fn environment_wins_over_file() {
        let env = EnvOverrides {
            url: Some("https://env.example.org".to_string()),
            token: Some("env-token".to_string()),
            ..Default::default()
        };
        let config = Config::from_sources(
            raw(r#"
                url = "https://file.example.org"
                token = "file-token"
            "#),
            env,
        )
        .unwrap();

        assert_eq!(config.url().host_str(), Some("env.example.org"));
        assert_eq!(config.token(), "env-token");
    }

    #[test]
    fn environment_alone_suffices() {
        let env = EnvOverrides {
            url: Some("https://env.example.org".to_string()),
            token: Some("env-token".to_string()),
            ..Default::default()
        };
        assert!(Config::from_sources(RawConfig::default(), env).is_ok());
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = Config::from_sources(raw(r#"token = "t""#), EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key } if key.contains("JAM_URL")));
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_sources(
            raw(r#"url = "https://jam.example.org""#),
            EnvOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key } if key.contains("JAM_TOKEN")));
    }

    #[test]
    fn invalid_url_is_an_error() {
        let err = Config::from_sources(
            raw(r#"
                url = "not a url"
                token = "t"
            "#),
            EnvOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn manifest_path_defaults() {
        let config = Config::from_sources(
            raw(r#"
                url = "https://jam.example.org"
                token = "t"
            "#),
            EnvOverrides::default(),
        )
        .unwrap();
        assert_eq!(
            config.collections_path(),
            std::path::Path::new("collections.json")
        );
        assert!(!config.parallel());
    }

    #[test]
    fn bootstrap_keys_are_only_required_when_asked_for() {
        let config = Config::from_sources(
            raw(r#"
                url = "https://jam.example.org"
                token = "t"
            "#),
            EnvOverrides::default(),
        )
        .unwrap();
        assert!(matches!(
            config.namespace().unwrap_err(),
            ConfigError::Missing { .. }
        ));
        assert!(matches!(
            config.admin_guid().unwrap_err(),
            ConfigError::Missing { .. }
        ));
    }

    #[test]
    fn loads_manifest_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "accounts", "attrs": {{"indexed": ["username"]}}}}, {{"id": "files"}}]"#
        )
        .unwrap();

        let manifest = load_manifest(file.path()).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[0].id, "accounts");
        assert!(manifest[1].attrs.is_empty());
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            load_manifest(file.path()).unwrap_err(),
            ConfigError::Manifest { .. }
        ));
    }

    #[test]
    fn missing_manifest_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
