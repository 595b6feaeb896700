//! Provider configuration storage
//!
//! Narrow key-value interface over per-provider records plus the single
//! "currently selected provider" name. The core depends only on the
//! [`SettingsStore`] trait; any concrete store can satisfy it.

use crate::error::Result;
use crate::provider::{default_providers, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for provider settings persistence
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, provider_name: &str) -> Result<Option<ProviderConfig>>;
    async fn put(&self, config: ProviderConfig) -> Result<()>;
    async fn get_selected(&self) -> Result<Option<String>>;
    async fn set_selected(&self, provider_name: &str) -> Result<()>;
}

/// Seed unseeded default provider records and ensure a selection exists.
///
/// Existing records are never overwritten; the first default becomes the
/// selection only when none is set.
pub async fn initialize_defaults(store: &dyn SettingsStore) -> Result<()> {
    for provider in default_providers() {
        if store.get(&provider.name).await?.is_none() {
            debug!(provider = %provider.name, "Seeding default provider record");
            store.put(provider).await?;
        }
    }
    if store.get_selected().await?.is_none() {
        if let Some(first) = default_providers().first() {
            store.set_selected(&first.name).await?;
        }
    }
    Ok(())
}

//
// ================= In-memory Store =================
//

/// In-memory settings store for development and tests
pub struct InMemorySettingsStore {
    providers: Arc<RwLock<HashMap<String, ProviderConfig>>>,
    selected: Arc<RwLock<Option<String>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            selected: Arc::new(RwLock::new(None)),
        }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, provider_name: &str) -> Result<Option<ProviderConfig>> {
        let providers = self.providers.read().await;
        Ok(providers.get(provider_name).cloned())
    }

    async fn put(&self, config: ProviderConfig) -> Result<()> {
        let mut providers = self.providers.write().await;
        providers.insert(config.name.clone(), config);
        Ok(())
    }

    async fn get_selected(&self) -> Result<Option<String>> {
        Ok(self.selected.read().await.clone())
    }

    async fn set_selected(&self, provider_name: &str) -> Result<()> {
        let mut selected = self.selected.write().await;
        *selected = Some(provider_name.to_string());
        Ok(())
    }
}

//
// ================= File-backed Store =================
//

/// On-disk shape: one record per provider keyed by name, plus the selection.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    providers: HashMap<String, ProviderConfig>,
    selected: Option<String>,
}

/// JSON-file-backed settings store, write-through on every mutation.
pub struct FileSettingsStore {
    path: PathBuf,
    state: RwLock<SettingsFile>,
}

impl FileSettingsStore {
    /// Open the store at `path`, loading existing records if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            SettingsFile::default()
        };
        debug!(?path, "Opened settings store");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn persist(&self, state: &SettingsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, provider_name: &str) -> Result<Option<ProviderConfig>> {
        let state = self.state.read().await;
        Ok(state.providers.get(provider_name).cloned())
    }

    async fn put(&self, config: ProviderConfig) -> Result<()> {
        let mut state = self.state.write().await;
        state.providers.insert(config.name.clone(), config);
        self.persist(&state)
    }

    async fn get_selected(&self) -> Result<Option<String>> {
        let state = self.state.read().await;
        Ok(state.selected.clone())
    }

    async fn set_selected(&self, provider_name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.selected = Some(provider_name.to_string());
        self.persist(&state)
    }
}
