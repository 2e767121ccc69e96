//! Short-drama search chat plugin
//!
//! Adapts `duanju-core` to a chat bot: group members send
//! `短剧 <keyword>` to search and `短剧# <n>` to get the share link of the
//! n-th entry of their last search.
//!
//! # Usage
//!
//! ```ignore
//! let config = PluginConfig::load(data_dir.join("config.toml"));
//! let plugin = DuanjuPlugin::new(config, &data_dir)?;
//! plugin.init().await;
//!
//! // for every inbound text message
//! if plugin.handle_message(&msg, &sender).await == Dispatch::Consumed {
//!     return;
//! }
//! ```

use std::path::Path;
use std::time::Instant;

use duanju_core::{
    ClientConfig, DiscoveryReport, DuanjuScraper, ENDPOINTS_FILE, EndpointStore, ResultCache,
    merge_endpoints, resolve_short_links,
};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod command;
mod commands;
pub mod config;
pub mod message;

pub use command::{Command, CommandError, parse_command};
pub use commands::{format_detail, format_listing};
pub use config::PluginConfig;
pub use message::{ChatSender, Dispatch, InboundMessage};

/// Plugin state shared across message handlers
///
/// The endpoint store is written only at the end of [`init`](Self::init);
/// searches take a snapshot of its endpoints. The result cache is keyed by
/// requester, so concurrent users never see each other's entries.
pub struct DuanjuPlugin {
    config: PluginConfig,
    scraper: DuanjuScraper,
    store: RwLock<EndpointStore>,
    cache: Mutex<ResultCache>,
}

impl DuanjuPlugin {
    /// Create the plugin with default HTTP settings
    ///
    /// The endpoint list is loaded from `data_dir/search_urls.json`, or
    /// created there from the configured defaults.
    ///
    /// # Errors
    /// Returns error string if the HTTP client cannot be built
    pub fn new(config: PluginConfig, data_dir: &Path) -> Result<Self, String> {
        Self::with_client_config(config, data_dir, ClientConfig::default())
    }

    /// Create the plugin with custom HTTP settings
    pub fn with_client_config(
        config: PluginConfig,
        data_dir: &Path,
        client_config: ClientConfig,
    ) -> Result<Self, String> {
        let scraper = DuanjuScraper::with_config(client_config).map_err(|e| e.to_string())?;
        let store = EndpointStore::load(
            data_dir.join(ENDPOINTS_FILE),
            config.base_urls.clone(),
            config.short_urls.clone(),
        );

        Ok(Self {
            config,
            scraper,
            store: RwLock::new(store),
            cache: Mutex::new(ResultCache::default()),
        })
    }

    /// Discover current mirrors from the seed short links
    ///
    /// Run once after construction. Short links are resolved without
    /// holding the store; the write lock is taken only to merge and save,
    /// so searches arriving meanwhile use the stored endpoints.
    pub async fn init(&self) -> DiscoveryReport {
        let short_urls = self.store.read().await.short_urls().to_vec();
        let links = resolve_short_links(self.scraper.client(), &short_urls).await;

        let mut store = self.store.write().await;
        let report = merge_endpoints(&mut store, links);
        info!(
            endpoints = store.base_urls().len(),
            added = report.added.len(),
            "plugin initialized"
        );
        report
    }

    /// Handle one inbound message
    ///
    /// Disabled plugin, private chats, groups outside the whitelist and
    /// text without the trigger word are passed on untouched.
    pub async fn handle_message(&self, msg: &InboundMessage, sender: &dyn ChatSender) -> Dispatch {
        if !self.config.enable {
            return Dispatch::Pass;
        }

        self.cache.lock().await.purge_expired(Instant::now());

        if !msg.is_group_chat || !self.config.is_whitelisted(&msg.group_id) {
            return Dispatch::Pass;
        }

        let Some(parsed) = parse_command(&msg.text, &self.config.command) else {
            return Dispatch::Pass;
        };

        match parsed {
            Ok(Command::Search(keyword)) => commands::search(self, msg, sender, &keyword).await,
            Ok(Command::Detail(index)) => commands::detail(self, msg, sender, index).await,
            Err(err) => commands::reject(self, msg, sender, err).await,
        }

        Dispatch::Consumed
    }

    /// Snapshot of the current endpoint order
    pub async fn endpoints(&self) -> Vec<String> {
        self.store.read().await.base_urls().to_vec()
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub(crate) fn scraper(&self) -> &DuanjuScraper {
        &self.scraper
    }

    pub(crate) fn cache(&self) -> &Mutex<ResultCache> {
        &self.cache
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Does nothing if the host already installed a global subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline_config() -> PluginConfig {
        PluginConfig {
            enable: true,
            whitelist_groups: vec!["g1".to_string()],
            base_urls: vec!["https://c.example.com/search.php".to_string()],
            short_urls: Vec::new(),
            ..PluginConfig::default()
        }
    }

    #[test]
    fn test_plugin_creation_writes_endpoint_file() {
        let dir = TempDir::new().unwrap();
        let plugin = DuanjuPlugin::new(offline_config(), dir.path());
        assert!(plugin.is_ok());
        assert!(dir.path().join(ENDPOINTS_FILE).exists());
    }

    #[tokio::test]
    async fn test_init_without_short_links_keeps_endpoints() {
        let dir = TempDir::new().unwrap();
        let plugin = DuanjuPlugin::new(offline_config(), dir.path()).unwrap();

        let report = plugin.init().await;

        assert!(report.added.is_empty());
        assert_eq!(plugin.endpoints().await, vec!["https://c.example.com/search.php"]);
    }

    #[tokio::test]
    async fn test_endpoints_readable_while_short_links_resolve() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "https://d.example.com")
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = PluginConfig {
            short_urls: vec![server.uri()],
            ..offline_config()
        };
        let plugin = DuanjuPlugin::with_client_config(
            config,
            dir.path(),
            ClientConfig {
                redirect_timeout: Duration::from_secs(5),
                ..ClientConfig::default()
            },
        )
        .unwrap();

        let read_while_resolving = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let started = std::time::Instant::now();
            let endpoints = plugin.endpoints().await;
            (endpoints, started.elapsed())
        };
        let (report, (during, waited)) = tokio::join!(plugin.init(), read_while_resolving);

        assert_eq!(during, vec!["https://c.example.com/search.php"]);
        assert!(waited < Duration::from_millis(300), "waited {:?}", waited);
        assert_eq!(report.added, vec!["https://d.example.com/search.php"]);
        assert_eq!(
            plugin.endpoints().await,
            vec!["https://c.example.com/search.php", "https://d.example.com/search.php"]
        );

        let saved = EndpointStore::load(dir.path().join(ENDPOINTS_FILE), Vec::new(), Vec::new());
        assert_eq!(saved.base_urls().len(), 2);
    }
}
