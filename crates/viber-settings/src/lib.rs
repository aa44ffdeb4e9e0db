//! Persisted user settings (API key, model, provider) with change
//! notification.
//!
//! The store is an explicit object owned by the composition root and
//! injected where needed; components subscribe for changes instead of
//! reading ambient globals.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use viber_core::options::DEFAULT_MODEL;
use viber_provider::ProviderId;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The persisted settings themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub provider: ProviderId,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            provider: ProviderId::Anthropic,
        }
    }
}

/// Handle returned by [`SettingsStore::subscribe`]; pass it back to
/// [`SettingsStore::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

struct StoreState {
    settings: Settings,
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
}

/// Settings with `get` / `set_*` / `subscribe`, optionally persisted to a
/// JSON file. Every committed change notifies all subscribers.
pub struct SettingsStore {
    state: Mutex<StoreState>,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// In-memory store with defaults; nothing is persisted.
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(StoreState {
                settings: Settings::default(),
                listeners: BTreeMap::new(),
                next_id: 0,
            }),
            path: None,
        }
    }

    /// Open a store backed by the given file, reading it if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            Settings::default()
        };
        Ok(Self {
            state: Mutex::new(StoreState {
                settings,
                listeners: BTreeMap::new(),
                next_id: 0,
            }),
            path: Some(path),
        })
    }

    /// Open the store at the default per-user location.
    pub fn open_default() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(base.join("viber").join("settings.json"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self) -> Settings {
        self.state.lock().expect("settings lock").settings.clone()
    }

    pub fn set_api_key(&self, key: impl Into<String>) -> Result<(), SettingsError> {
        self.update(|s| s.api_key = key.into())
    }

    pub fn clear_api_key(&self) -> Result<(), SettingsError> {
        self.update(|s| s.api_key.clear())
    }

    pub fn set_model(&self, model: impl Into<String>) -> Result<(), SettingsError> {
        self.update(|s| s.model = model.into())
    }

    pub fn set_provider(&self, provider: ProviderId) -> Result<(), SettingsError> {
        self.update(|s| s.provider = provider)
    }

    /// Register a callback invoked after every committed change.
    pub fn subscribe(&self, listener: impl Fn(&Settings) + Send + Sync + 'static) -> SubscriptionId {
        let mut state = self.state.lock().expect("settings lock");
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, Arc::new(listener));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.state
            .lock()
            .expect("settings lock")
            .listeners
            .remove(&id.0);
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        let (settings, listeners) = {
            let mut state = self.state.lock().expect("settings lock");
            apply(&mut state.settings);
            (
                state.settings.clone(),
                state.listeners.values().cloned().collect::<Vec<_>>(),
            )
        };

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_string_pretty(&settings)?)?;
            debug!(path = %path.display(), "settings persisted");
        }

        // Listeners run outside the lock so a callback can read the store.
        for listener in listeners {
            listener(&settings);
        }
        Ok(())
    }
}
