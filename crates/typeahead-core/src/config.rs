//! Configuration loader, search settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `TYPEAHEAD_*`
//! env vars (`__` separates nesting, e.g. `TYPEAHEAD_SEARCH__TOP_N=5`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Ranking and matching settings for one engine instance.
///
/// Values are applied as given; nothing here is range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_n: usize,
    pub match_weight: f64,
    pub popularity_weight: f64,
    pub enable_phonetic: bool,
    pub enable_fuzzy: bool,
    pub min_raw_score: f64,
    /// Consumed by the UI layer only.
    pub debounce_millis: u64,
    /// Result cache entries; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            match_weight: 0.6,
            popularity_weight: 0.4,
            enable_phonetic: true,
            enable_fuzzy: true,
            min_raw_score: 0.0,
            debounce_millis: 300,
            cache_capacity: 100,
        }
    }
}

/// Partial update for [`SearchConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub top_n: Option<usize>,
    pub match_weight: Option<f64>,
    pub popularity_weight: Option<f64>,
    pub enable_phonetic: Option<bool>,
    pub enable_fuzzy: Option<bool>,
    pub min_raw_score: Option<f64>,
    pub debounce_millis: Option<u64>,
    pub cache_capacity: Option<usize>,
}

impl SearchConfig {
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.top_n { self.top_n = v; }
        if let Some(v) = patch.match_weight { self.match_weight = v; }
        if let Some(v) = patch.popularity_weight { self.popularity_weight = v; }
        if let Some(v) = patch.enable_phonetic { self.enable_phonetic = v; }
        if let Some(v) = patch.enable_fuzzy { self.enable_fuzzy = v; }
        if let Some(v) = patch.min_raw_score { self.min_raw_score = v; }
        if let Some(v) = patch.debounce_millis { self.debounce_millis = v; }
        if let Some(v) = patch.cache_capacity { self.cache_capacity = v; }
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let base_dir = env::var("TYPEAHEAD_CONFIG_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));

        let mut figment = Figment::new().merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("TYPEAHEAD_").split("__"));
        tracing::debug!(env = %env_name, base = %base_dir.display(), "loading configuration");

        let config = Self { figment, base_dir };
        config.validate()?;
        Ok(config)
    }

    /// Wrap an already-assembled figment; relative paths resolve against `base_dir`.
    pub fn from_figment(figment: Figment, base_dir: impl Into<PathBuf>) -> Self {
        Self { figment, base_dir: base_dir.into() }
    }

    /// The `[search]` table, or defaults when the table is absent.
    pub fn search(&self) -> anyhow::Result<SearchConfig> {
        match self.figment.extract_inner::<SearchConfig>("search") {
            Ok(config) => Ok(config),
            Err(e) if e.missing() => Ok(SearchConfig::default()),
            Err(e) => Err(anyhow::anyhow!("Failed to get 'search': {}", e)),
        }
    }

    /// Optional path setting, expanded and resolved against the config directory.
    pub fn path(&self, key: &str) -> anyhow::Result<Option<PathBuf>> {
        match self.figment.extract_inner::<String>(key) {
            Ok(raw) => Ok(Some(resolve_with_base(&self.base_dir, raw))),
            Err(e) if e.missing() => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Failed to get '{}': {}", key, e)),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        // Only shape is checked: the engine accepts any values.
        self.search().map(|_| ())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
