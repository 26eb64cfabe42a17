use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::convert::{compute_duration, Conversion};
use crate::models::{Currency, Lang, Settings, Theme};

use super::store::{load_settings, save_settings, KeyValueStore};

/// Owns the current settings, persists every change and notifies subscribers.
pub struct SettingsController {
    store: Arc<dyn KeyValueStore>,
    tx: watch::Sender<Settings>,
}

impl SettingsController {
    /// Load settings from `store`, falling back to defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let settings = load_settings(store.as_ref());
        debug!(lang = settings.lang.code(), theme = settings.theme.code(), "Settings loaded");
        let (tx, _rx) = watch::channel(settings);
        Self { store, tx }
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Receive every settings change from now on
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Record a wage edit. The raw text is kept as typed.
    pub fn set_wage(&self, wage: impl Into<String>) {
        let wage = wage.into();
        self.update(|settings| {
            if settings.wage == wage {
                return false;
            }
            settings.wage = wage;
            true
        });
    }

    /// Save the settings dialog values.
    pub fn apply(&self, theme: Theme, lang: Lang, currency: Currency) {
        self.update(|settings| {
            let changed =
                settings.theme != theme || settings.lang != lang || settings.currency != currency;
            settings.theme = theme;
            settings.lang = lang;
            settings.currency = currency;
            changed
        });
    }

    /// Convert `price_text` using the stored wage.
    pub fn convert(&self, price_text: &str) -> Conversion {
        compute_duration(&self.tx.borrow().wage, price_text)
    }

    /// Apply `modify`, persist, and notify subscribers if it reported a change.
    fn update(&self, modify: impl FnOnce(&mut Settings) -> bool) {
        self.tx.send_if_modified(modify);
        let snapshot = self.settings();
        if let Err(e) = save_settings(self.store.as_ref(), &snapshot) {
            warn!(error = %e, "Failed to persist settings");
        }
    }
}
