//! Server settings.
//!
//! Settings are read from an optional TOML file and overridden by
//! environment variables, e.g. `LOGITRACK_CACHE__BACKEND=redis` or
//! `LOGITRACK_RECONCILE__INTERVAL_SECS=60`. Every field has a default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::cache::{CachePolicies, ExpirationPolicy, MemoryCacheConfig};
use crate::sync::ReconcileConfig;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "LOGITRACK_CONFIG";

/// Settings file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "logitrack.toml";

const ENV_PREFIX: &str = "LOGITRACK";

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub reconcile: ReconcileSettings,
    pub metrics: MetricsSettings,
}

/// Which cache backend to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process cache.
    #[default]
    Memory,
    /// Shared Redis cache.
    Redis,
    /// No cache.
    None,
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: BackendKind,
    pub redis_url: String,
    /// Capacity of the in-process cache.
    pub max_capacity: u64,
    pub collection: PolicySettings,
    pub entity: PolicySettings,
    pub query: PolicySettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = CachePolicies::default();
        Self {
            backend: BackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            max_capacity: MemoryCacheConfig::default().max_capacity,
            collection: defaults.collection.into(),
            entity: defaults.entity.into(),
            query: defaults.query.into(),
        }
    }
}

impl CacheSettings {
    /// Expiration policies per key class.
    pub fn policies(&self) -> CachePolicies {
        CachePolicies {
            collection: self.collection.policy(),
            entity: self.entity.policy(),
            query: self.query.policy(),
        }
    }

    /// In-process backend configuration.
    pub fn memory_config(&self) -> MemoryCacheConfig {
        MemoryCacheConfig {
            max_capacity: self.max_capacity,
        }
    }
}

/// One key class's expiration clocks, in seconds.
///
/// A class section that is present replaces the class defaults as a
/// whole: an omitted clock is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub sliding_secs: Option<u64>,
    pub absolute_secs: Option<u64>,
}

impl PolicySettings {
    /// Converts to an expiration policy.
    pub fn policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(
            self.absolute_secs.map(Duration::from_secs),
            self.sliding_secs.map(Duration::from_secs),
        )
    }
}

impl From<ExpirationPolicy> for PolicySettings {
    fn from(policy: ExpirationPolicy) -> Self {
        Self {
            sliding_secs: policy.sliding.map(|d| d.as_secs()),
            absolute_secs: policy.absolute_ttl.map(|d| d.as_secs()),
        }
    }
}

/// Reconciliation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcileSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub refresh_collections: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        let defaults = ReconcileConfig::default();
        Self {
            enabled: true,
            interval_secs: defaults.interval.as_secs(),
            refresh_collections: defaults.refresh_collections,
        }
    }
}

impl ReconcileSettings {
    /// Scheduler configuration.
    pub fn config(&self) -> ReconcileConfig {
        ReconcileConfig {
            interval: Duration::from_secs(self.interval_secs),
            refresh_collections: self.refresh_collections,
        }
    }
}

/// Metrics settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Address for the Prometheus endpoint; no exporter when absent.
    pub listen: Option<SocketAddr>,
}

impl Settings {
    /// Loads settings from the file named by `LOGITRACK_CONFIG` (or
    /// `logitrack.toml` if it exists) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Loads settings from `path` and the process environment.
    ///
    /// An explicit path must exist. Without one, `logitrack.toml` in the
    /// working directory is read if present.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        Self::build(Config::builder().add_source(file), environment())
    }

    /// Parses settings from a TOML string layered under `env`.
    pub fn from_toml(toml: &str, env: Environment) -> Result<Self, ConfigError> {
        let file = File::from_str(toml, config::FileFormat::Toml);
        Self::build(Config::builder().add_source(file), env)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile.interval_secs == 0 {
            return Err(ConfigError::Message(
                "reconcile.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.cache.backend == BackendKind::Redis && self.cache.redis_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "cache.redis_url is required for the redis backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment overrides: `LOGITRACK_<SECTION>__<FIELD>`.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("", env(&[])).unwrap();

        assert_eq!(settings.cache.backend, BackendKind::Memory);
        assert_eq!(settings.cache.max_capacity, 10_000);
        assert_eq!(settings.cache.policies(), CachePolicies::default());
        assert!(settings.reconcile.enabled);
        assert_eq!(settings.reconcile.config().interval, Duration::from_secs(600));
        assert!(settings.metrics.listen.is_none());
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [cache]
            backend = "redis"
            redis_url = "redis://cache:6379"

            [cache.collection]
            sliding_secs = 30

            [reconcile]
            interval_secs = 60
            refresh_collections = false

            [metrics]
            listen = "127.0.0.1:9100"
        "#;
        let settings = Settings::from_toml(toml, env(&[])).unwrap();

        assert_eq!(settings.cache.backend, BackendKind::Redis);
        assert_eq!(settings.cache.redis_url, "redis://cache:6379");
        assert_eq!(
            settings.cache.policies().collection,
            ExpirationPolicy::sliding(Duration::from_secs(30))
        );
        assert_eq!(
            settings.cache.policies().entity,
            CachePolicies::default().entity
        );
        assert_eq!(settings.reconcile.interval_secs, 60);
        assert!(!settings.reconcile.refresh_collections);
        assert_eq!(
            settings.metrics.listen,
            Some("127.0.0.1:9100".parse().unwrap())
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        let toml = "[reconcile]\ninterval_secs = 60\n";
        let settings = Settings::from_toml(
            toml,
            env(&[
                ("LOGITRACK_RECONCILE__INTERVAL_SECS", "15"),
                ("LOGITRACK_CACHE__BACKEND", "none"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.reconcile.interval_secs, 15);
        assert_eq!(settings.cache.backend, BackendKind::None);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Settings::from_toml("[reconcile]\ninterval_secs = 0\n", env(&[])).unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Settings::from_toml("[cache]\nbackend = \"memcached\"\n", env(&[])).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[cache]\nmax_capacity = 42").unwrap();

        let settings = Settings::load_from(Some(file.path())).unwrap();
        assert_eq!(settings.cache.max_capacity, 42);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(Settings::load_from(Some(&missing)).is_err());
    }
}
