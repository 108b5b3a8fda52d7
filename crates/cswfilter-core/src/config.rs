//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! The `filter` section is extracted into [`FilterSettings`]; relative input
//! paths are expanded and resolved with [`expand_path`] / [`resolve_with_base`].
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub const DEFAULT_ENDPOINT: &str = "getFilteredCSWRecords.do";

/// Settings for the record queries issued by search tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Path (or absolute URL) of the record query endpoint.
    pub endpoint: String,
    /// Base the endpoint is joined onto when rendering request URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Fail the submission instead of using the fallback title.
    pub strict_titles: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_string(), base_url: None, strict_titles: false }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Loads a single TOML file on top of the defaults, without env overlays.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config = Self { figment: Self::defaults().merge(Toml::file(path)) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn filter_settings(&self) -> anyhow::Result<FilterSettings> { self.get("filter") }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::default("filter", FilterSettings::default()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.filter_settings()?;
        if settings.endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig("filter.endpoint must not be empty".to_string()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
