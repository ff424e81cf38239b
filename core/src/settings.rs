//! Configuration store.
//!
//! Holds the active [`Settings`] snapshot behind a lock so the service
//! handle can read it from other tasks. `refresh` replaces the value
//! wholesale: a successful fetch installs the fetched row, anything else
//! (missing row, fetch error) installs the fixed defaults. There is never
//! a stale+partial mix.

use photowall_types::Settings;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::sources::SettingsSource;

#[derive(Debug, Default)]
pub struct SettingsStore {
    current: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest settings snapshot.
    pub async fn current(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Fetch the settings row by id and replace the stored value.
    /// The push-notification path funnels into the same method, so
    /// duplicate notifications are harmless.
    pub async fn refresh<S: SettingsSource>(&self, source: &S, id: &str) -> Settings {
        let next = match source.fetch_one(id).await {
            Ok(Some(settings)) => {
                debug!(settings_id = id, "settings refreshed");
                settings
            }
            Ok(None) => {
                warn!(settings_id = id, "settings row missing, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %e, settings_id = id, "settings fetch failed, using defaults");
                Settings::default()
            }
        };
        *self.current.write().await = next.clone();
        next
    }
}
