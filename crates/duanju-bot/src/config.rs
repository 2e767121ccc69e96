//! Plugin configuration
//!
//! Read from the `[DuanjuSpider]` table of a TOML file:
//!
//! ```toml
//! [DuanjuSpider]
//! enable = true
//! command = "短剧"
//! whitelist_groups = ["123456@chatroom"]
//! max_results = 10
//! base_urls = ["https://a80.35240.com/search.php"]
//! short_urls = ["A80.CC"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::error;

pub const DEFAULT_COMMAND: &str = "短剧";
pub const DEFAULT_MAX_RESULTS: usize = 10;

pub fn default_base_urls() -> Vec<String> {
    vec![
        "https://a80.35240.com/search.php".to_string(),
        "https://b.21410.com/search.php".to_string(),
    ]
}

pub fn default_short_urls() -> Vec<String> {
    ["A80.CC", "A20.CC", "E50.CC", "47C.CC"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "DuanjuSpider", default)]
    plugin: PluginConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Master switch (default: off)
    pub enable: bool,

    /// Trigger word; `<command> <keyword>` searches, `<command># <n>` looks up
    pub command: String,

    /// Group chats the plugin answers in
    pub whitelist_groups: Vec<String>,

    /// Entries shown (and cached) per search
    pub max_results: usize,

    /// Initial search endpoints, used when no endpoint file exists yet
    pub base_urls: Vec<String>,

    /// Seed short links for endpoint discovery
    pub short_urls: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enable: false,
            command: DEFAULT_COMMAND.to_string(),
            whitelist_groups: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            base_urls: default_base_urls(),
            short_urls: default_short_urls(),
        }
    }
}

impl PluginConfig {
    /// Parse the `[DuanjuSpider]` table from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(file.plugin)
    }

    /// Load from a file; any failure is logged and yields the disabled defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to read plugin config");
                return Self::default();
            }
        };

        match Self::from_toml_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to parse plugin config");
                Self::default()
            }
        }
    }

    pub fn is_whitelisted(&self, group_id: &str) -> bool {
        self.whitelist_groups.iter().any(|g| g == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PluginConfig::default();
        assert!(!config.enable);
        assert_eq!(config.command, "短剧");
        assert_eq!(config.max_results, 10);
        assert_eq!(config.base_urls.len(), 2);
        assert_eq!(config.short_urls, vec!["A80.CC", "A20.CC", "E50.CC", "47C.CC"]);
    }

    #[test]
    fn test_from_toml_full() {
        let raw = r#"
            [DuanjuSpider]
            enable = true
            command = "搜剧"
            whitelist_groups = ["123@chatroom"]
            max_results = 5
            base_urls = ["https://c.example.com/search.php"]
            short_urls = ["X1.CC"]
        "#;

        let config = PluginConfig::from_toml_str(raw).unwrap();
        assert!(config.enable);
        assert_eq!(config.command, "搜剧");
        assert!(config.is_whitelisted("123@chatroom"));
        assert!(!config.is_whitelisted("456@chatroom"));
        assert_eq!(config.max_results, 5);
        assert_eq!(config.base_urls, vec!["https://c.example.com/search.php"]);
        assert_eq!(config.short_urls, vec!["X1.CC"]);
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let raw = r#"
            [DuanjuSpider]
            enable = true
        "#;

        let config = PluginConfig::from_toml_str(raw).unwrap();
        assert!(config.enable);
        assert_eq!(config.command, DEFAULT_COMMAND);
        assert_eq!(config.base_urls, default_base_urls());
    }

    #[test]
    fn test_from_toml_missing_table() {
        let config = PluginConfig::from_toml_str("[Other]\nenable = true\n").unwrap();
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_disabled() {
        let dir = TempDir::new().unwrap();
        let config = PluginConfig::load(dir.path().join("config.toml"));
        assert!(!config.enable);
    }

    #[test]
    fn test_load_invalid_file_is_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[DuanjuSpider]\nenable = \"yes\"\n").unwrap();

        let config = PluginConfig::load(&path);
        assert_eq!(config, PluginConfig::default());
    }
}
