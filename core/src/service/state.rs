//! State shared between the display service and its handles.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use crate::effects::EffectState;
use crate::settings::SettingsStore;
use crate::window::PhotoWindow;

/// Everything a reader outside the service task may need: the settings
/// snapshot, the photo window, the live effect state, and a couple of
/// status flags. Mutation happens only on the service task; handles get
/// read access.
pub struct SharedState {
    pub settings: SettingsStore,
    pub window: RwLock<PhotoWindow>,
    pub effects: Arc<Mutex<EffectState>>,
    /// Comment of the photo currently on screen, fed by slide-change
    /// notifications from the presentation surface.
    pub current_comment: RwLock<String>,
    /// True until the first photo fetch completes (success or failure).
    pub loading: AtomicBool,
    /// True while the push subscription is down and freshness relies on
    /// the poll fallback alone.
    pub degraded: AtomicBool,
}

impl SharedState {
    pub fn new(effects: Arc<Mutex<EffectState>>) -> Self {
        Self {
            settings: SettingsStore::new(),
            window: RwLock::new(PhotoWindow::new()),
            effects,
            current_comment: RwLock::new(String::new()),
            loading: AtomicBool::new(true),
            degraded: AtomicBool::new(false),
        }
    }
}
