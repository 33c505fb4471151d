//! Configuration loading for ferrous-ioc.
//!
//! Configuration values come from priority-ordered [`ConfigSource`]s behind a
//! [`ConfigProvider`]. The container itself needs a single setting, the scan
//! root, which [`load_scan_root`] reads from a properties file.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IocError, IocResult};

/// Properties key naming the module path to scan.
pub const SCAN_ROOT_KEY: &str = "scanPackage";

const CLASSPATH_PREFIX: &str = "classpath:";

/// Configuration provider
pub struct ConfigProvider {
    /// Configuration sources in priority order
    sources: Vec<Box<dyn ConfigSource>>,
    cache: RwLock<HashMap<String, ConfigValue>>,
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("sources", &self.sources)
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

/// A configuration value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Parses a raw text value, preferring integers, then floats, then booleans.
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            ConfigValue::Integer(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            ConfigValue::Float(f)
        } else if let Ok(b) = raw.parse::<bool>() {
            ConfigValue::Boolean(b)
        } else {
            ConfigValue::String(raw.to_string())
        }
    }

    /// Try to convert to string
    pub fn as_string(&self) -> IocResult<&str> {
        match self {
            ConfigValue::String(s) => Ok(s),
            other => Err(IocError::Config(format!("not a string: {:?}", other))),
        }
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> IocResult<i64> {
        match self {
            ConfigValue::Integer(i) => Ok(*i),
            other => Err(IocError::Config(format!("not an integer: {:?}", other))),
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> IocResult<bool> {
        match self {
            ConfigValue::Boolean(b) => Ok(*b),
            other => Err(IocError::Config(format!("not a boolean: {:?}", other))),
        }
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Get a configuration value by key
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// List all available keys
    fn keys(&self) -> Vec<String>;
}

/// Environment variable configuration source
///
/// Keys are upper-cased, dots become underscores, and an optional prefix is
/// prepended: with prefix `app`, `scanPackage` is read from `APP_SCANPACKAGE`.
#[derive(Debug, Default)]
pub struct EnvironmentConfigSource {
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn env_key(&self, key: &str) -> String {
        let key = key.replace('.', "_").to_uppercase();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key),
            None => key,
        }
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        env::var(self.env_key(key))
            .ok()
            .map(|value| ConfigValue::parse(&value))
    }

    fn keys(&self) -> Vec<String> {
        env::vars()
            .filter_map(|(key, _)| match &self.prefix {
                Some(prefix) => {
                    let prefix = format!("{}_", prefix.to_uppercase());
                    key.strip_prefix(&prefix).map(str::to_lowercase)
                }
                None => Some(key.to_lowercase()),
            })
            .collect()
    }
}

/// Properties file configuration source.
///
/// Lines are `key=value` or `key: value`; blank lines and lines starting with
/// `#` or `!` are ignored. Values are kept as text.
#[derive(Debug, Clone, Default)]
pub struct PropertiesConfigSource {
    entries: HashMap<String, String>,
}

impl PropertiesConfigSource {
    /// Parses properties text.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let split = line.find(|c: char| c == '=' || c == ':');
            let (key, value) = match split {
                Some(at) => (&line[..at], &line[at + 1..]),
                None => (line, ""),
            };
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { entries }
    }

    /// Reads and parses a properties file.
    pub fn from_file(path: impl AsRef<Path>) -> IocResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| IocError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSource for PropertiesConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.entries.get(key).cloned().map(ConfigValue::String)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// JSON file configuration source
#[cfg(feature = "config")]
#[derive(Debug)]
pub struct JsonConfigSource {
    file_path: PathBuf,
    config: RwLock<Option<HashMap<String, ConfigValue>>>,
}

#[cfg(feature = "config")]
impl JsonConfigSource {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            config: RwLock::new(None),
        }
    }

    /// Reload configuration from file
    pub fn reload(&self) -> IocResult<()> {
        let content = std::fs::read_to_string(&self.file_path).map_err(|e| {
            IocError::Config(format!("cannot read {}: {}", self.file_path.display(), e))
        })?;
        let parsed: HashMap<String, ConfigValue> = serde_json::from_str(&content)
            .map_err(|e| IocError::Config(format!("invalid JSON in {}: {}", self.file_path.display(), e)))?;
        *self.config.write() = Some(parsed);
        Ok(())
    }
}

#[cfg(feature = "config")]
impl ConfigSource for JsonConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        let loaded = self.config.read().is_some();
        if !loaded {
            self.reload().ok()?;
        }
        self.config.read().as_ref()?.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        let loaded = self.config.read().is_some();
        if !loaded && self.reload().is_err() {
            return Vec::new();
        }
        self.config
            .read()
            .as_ref()
            .map(|cfg| cfg.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ConfigProvider {
    /// Create a new configuration provider
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Add a configuration source (higher priority sources should be added first)
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Get a configuration value, checking sources in priority order
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        if let Some(value) = self.cache.read().get(key) {
            return Some(value.clone());
        }

        let value = self.sources.iter().find_map(|source| source.get(key))?;
        self.cache.write().insert(key.to_string(), value.clone());
        Some(value)
    }

    /// Get a string configuration value
    pub fn get_string(&self, key: &str) -> IocResult<String> {
        self.get(key)
            .ok_or_else(|| IocError::Config(format!("missing key `{}`", key)))?
            .as_string()
            .map(str::to_string)
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    pub fn get_i64(&self, key: &str) -> IocResult<i64> {
        self.get(key)
            .ok_or_else(|| IocError::Config(format!("missing key `{}`", key)))?
            .as_i64()
    }

    /// Clear the configuration cache (forces reload from sources)
    pub fn invalidate_cache(&self) {
        self.cache.write().clear();
    }

    /// Get all configuration keys from all sources
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.iter().flat_map(|s| s.keys()).collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        let mut provider = Self::new();
        provider.add_source(Box::new(EnvironmentConfigSource::new()));
        provider
    }
}

/// Resolves a configuration location to a file path, dropping a `classpath:` prefix.
pub fn location_path(location: &str) -> PathBuf {
    PathBuf::from(location.strip_prefix(CLASSPATH_PREFIX).unwrap_or(location).trim())
}

/// Reads the scan root from the properties file at the first of `locations`.
///
/// The `scanPackage` value may be dotted (`app.web`) or a module path
/// (`app::web`); it is returned as a module path.
///
/// ```rust,no_run
/// use ferrous_ioc::config::load_scan_root;
///
/// // application.properties: scanPackage=demo.app
/// let root = load_scan_root(&["classpath:application.properties"]).unwrap();
/// assert_eq!(root, "demo::app");
/// ```
pub fn load_scan_root(locations: &[&str]) -> IocResult<String> {
    let location = locations
        .first()
        .ok_or_else(|| IocError::Config("no configuration location given".to_string()))?;
    let path = location_path(location);
    debug!(path = %path.display(), "loading configuration");

    let mut provider = ConfigProvider::new();
    provider.add_source(Box::new(PropertiesConfigSource::from_file(&path)?));
    let root = provider.get_string(SCAN_ROOT_KEY)?;
    let root = root.trim();
    if root.is_empty() {
        return Err(IocError::Config(format!("`{}` is empty in {}", SCAN_ROOT_KEY, path.display())));
    }
    Ok(root.replace('.', "::"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn properties_parse_separators_and_comments() {
        let source = PropertiesConfigSource::parse(
            "# comment\n! also a comment\n\nscanPackage = demo.app\nname: ioc\nflag\n",
        );
        assert_eq!(source.len(), 3);
        assert_eq!(source.get("scanPackage"), Some(ConfigValue::String("demo.app".to_string())));
        assert_eq!(source.get("name"), Some(ConfigValue::String("ioc".to_string())));
        assert_eq!(source.get("flag"), Some(ConfigValue::String(String::new())));
        assert_eq!(source.get("comment"), None);
    }

    #[test]
    #[serial]
    fn test_environment_config_source() {
        env::set_var("IOC_TEST_KEY", "test_value");
        env::set_var("IOC_TEST_INT", "42");
        env::set_var("IOC_TEST_BOOL", "true");

        let source = EnvironmentConfigSource::new();
        assert_eq!(source.get("ioc.test.key"), Some(ConfigValue::String("test_value".to_string())));
        assert_eq!(source.get("ioc_test_int"), Some(ConfigValue::Integer(42)));
        assert_eq!(source.get("ioc_test_bool"), Some(ConfigValue::Boolean(true)));

        env::remove_var("IOC_TEST_KEY");
        env::remove_var("IOC_TEST_INT");
        env::remove_var("IOC_TEST_BOOL");
    }

    #[test]
    #[serial]
    fn test_environment_config_with_prefix() {
        env::set_var("MYAPP_SCANPACKAGE", "demo.app");

        let source = EnvironmentConfigSource::with_prefix("myapp");
        assert_eq!(source.get("scanPackage"), Some(ConfigValue::String("demo.app".to_string())));
        assert!(source.keys().contains(&"scanpackage".to_string()));

        env::remove_var("MYAPP_SCANPACKAGE");
    }

    #[test]
    fn provider_checks_sources_in_order_and_caches() {
        let mut provider = ConfigProvider::new();
        provider
            .add_source(Box::new(PropertiesConfigSource::parse("a=first")))
            .add_source(Box::new(PropertiesConfigSource::parse("a=second\nb=7")));

        assert_eq!(provider.get_string("a").unwrap(), "first");
        assert_eq!(provider.get_string("b").unwrap(), "7");
        assert!(provider.get_i64("b").is_err());
        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.all_keys(), ["a", "b"]);

        provider.invalidate_cache();
        assert_eq!(provider.get_string("a").unwrap(), "first");
    }

    #[test]
    fn value_conversions() {
        assert_eq!(ConfigValue::parse("42"), ConfigValue::Integer(42));
        assert_eq!(ConfigValue::parse("1.5"), ConfigValue::Float(1.5));
        assert_eq!(ConfigValue::parse("false"), ConfigValue::Boolean(false));
        assert_eq!(ConfigValue::parse("demo").as_string().unwrap(), "demo");
        assert!(ConfigValue::Integer(1).as_string().is_err());
        assert!(ConfigValue::Boolean(true).as_bool().unwrap());
    }

    #[test]
    fn scan_root_from_classpath_location() {
        let file = write_temp(".properties", "scanPackage=demo.app.web\n");
        let location = format!("classpath:{}", file.path().display());

        assert_eq!(load_scan_root(&[location.as_str()]).unwrap(), "demo::app::web");
    }

    #[test]
    fn scan_root_errors() {
        assert!(matches!(load_scan_root(&[]), Err(IocError::Config(_))));
        assert!(matches!(
            load_scan_root(&["classpath:/definitely/not/here.properties"]),
            Err(IocError::Config(_))
        ));

        let file = write_temp(".properties", "other=1\n");
        let location = file.path().display().to_string();
        match load_scan_root(&[location.as_str()]) {
            Err(IocError::Config(message)) => assert!(message.contains(SCAN_ROOT_KEY)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_source_reads_file() {
        let file = write_temp(".json", r#"{"scanPackage": "demo", "workers": 4}"#);
        let source = JsonConfigSource::new(file.path());
        assert_eq!(source.get("scanPackage"), Some(ConfigValue::String("demo".to_string())));
        assert_eq!(source.get("workers"), Some(ConfigValue::Integer(4)));
    }
}
