//! Persistent configuration for the pybundle CLI
//!
//! Stored as TOML at `~/.config/pybundle/pybundle.toml` (or the path in
//! `PYBUNDLE_CONFIG`). Every key is optional; getters fall back to defaults.

pub mod tools;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub use tools::{resolve_tool, ToolError, CARGO_CANDIDATES, UV_CANDIDATES};

/// Default directory (relative to the working directory) that holds bundles
pub const DEFAULT_BUNDLE_DIR: &str = ".pybundler";

/// Wheel platform tag used for the packaged project artifact
pub const DEFAULT_PLATFORM_TAG: &str = "py3-none-any";

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PYBUNDLE_CONFIG";

const KEYS: &[&str] = &[
    "uv-path",
    "cargo-path",
    "bundle-dir",
    "platform-tag",
    "templates-dir",
];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<String>,
}

impl Config {
    pub fn path() -> PathBuf {
        // Honor explicit override via PYBUNDLE_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.unwrap_or_else(|| PathBuf::from("."))
            .join("pybundle")
            .join("pybundle.toml")
    }

    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Names of every supported key, in display order
    pub fn keys() -> &'static [&'static str] {
        KEYS
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "uv-path" => self.uv_path.clone(),
            "cargo-path" => self.cargo_path.clone(),
            "bundle-dir" => self.bundle_dir.clone(),
            "platform-tag" => self.platform_tag.clone(),
            "templates-dir" => self.templates_dir.clone(),
            _ => None,
        }
    }

    /// Set a key; returns `false` when the key is not recognized
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "uv-path" => &mut self.uv_path,
            "cargo-path" => &mut self.cargo_path,
            "bundle-dir" => &mut self.bundle_dir,
            "platform-tag" => &mut self.platform_tag,
            "templates-dir" => &mut self.templates_dir,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.values_iter().is_empty()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn get_bundle_dir(&self) -> PathBuf {
        PathBuf::from(self.bundle_dir.as_deref().unwrap_or(DEFAULT_BUNDLE_DIR))
    }

    pub fn get_platform_tag(&self) -> String {
        self.platform_tag
            .clone()
            .unwrap_or_else(|| DEFAULT_PLATFORM_TAG.to_string())
    }

    pub fn get_templates_dir(&self) -> Option<PathBuf> {
        self.templates_dir.as_ref().map(PathBuf::from)
    }

    /// Resolve the `uv` executable, caching the result for this process
    pub fn ensure_uv_path(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let path = resolve_tool(self.uv_path.as_deref(), UV_CANDIDATES)?;
        self.uv_path = Some(path.clone());
        Ok(path)
    }

    /// Resolve the `cargo` executable, caching the result for this process
    pub fn ensure_cargo_path(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let path = resolve_tool(self.cargo_path.as_deref(), CARGO_CANDIDATES)?;
        self.cargo_path = Some(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::default();
        assert!(config.is_empty());
    }

    #[test]
    fn test_config_set_get() {
        let mut config = Config::default();
        assert!(config.set("uv-path", "/opt/uv/bin/uv".to_string()));
        assert_eq!(config.get("uv-path"), Some("/opt/uv/bin/uv".to_string()));
        assert!(!config.is_empty());
    }

    #[test]
    fn test_config_unknown_key() {
        let mut config = Config::default();
        assert!(!config.set("unknown-key", "value".to_string()));
        assert_eq!(config.get("unknown-key"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.get_bundle_dir(), PathBuf::from(".pybundler"));
        assert_eq!(config.get_platform_tag(), "py3-none-any");
        assert!(config.get_templates_dir().is_none());
    }

    #[test]
    fn test_config_toml_uses_kebab_keys() {
        let mut config = Config::default();
        config.set("platform-tag", "cp312-cp312-linux_x86_64".to_string());
        config.set("bundle-dir", "dist".to_string());

        let Ok(text) = toml::to_string_pretty(&config) else {
            panic!("config should serialize");
        };
        assert!(text.contains("platform-tag = \"cp312-cp312-linux_x86_64\""));
        assert!(text.contains("bundle-dir = \"dist\""));

        let Ok(parsed) = toml::from_str::<Config>(&text) else {
            panic!("config should parse back");
        };
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_values_iter_order() {
        let mut config = Config::default();
        config.set("templates-dir", "/tmp/templates".to_string());
        config.set("uv-path", "uv".to_string());
        let keys: Vec<&str> = config.values_iter().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["uv-path", "templates-dir"]);
    }
}
