//! Service handle.
//!
//! Cheap-to-clone front door for everything outside the service task:
//! the renderer, the CLI, and tests. Commands go through the service's
//! mpsc channel so all mutations keep their event-loop ordering; reads
//! come straight from [`SharedState`].

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;

use photowall_types::{FloatingItem, Photo, Settings};

use crate::presentation::PresentationSurface;
use crate::service::{ServiceCommand, SharedState};

/// Handle to communicate with the display service and query state.
#[derive(Clone)]
pub struct ServiceHandle {
    pub cmd_tx: mpsc::Sender<ServiceCommand>,
    pub shared: Arc<SharedState>,
}

impl ServiceHandle {
    /// Latest settings snapshot.
    pub async fn settings(&self) -> Settings {
        self.shared.settings.current().await
    }

    /// Current photo window contents, newest-first.
    pub async fn photos(&self) -> Vec<Photo> {
        self.shared.window.read().await.photos().to_vec()
    }

    pub async fn photo_count(&self) -> usize {
        self.shared.window.read().await.len()
    }

    /// Comment of the photo currently on screen.
    pub async fn current_comment(&self) -> String {
        self.shared.current_comment.read().await.clone()
    }

    /// True until the first photo fetch has completed.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// True while freshness relies on the poll fallback alone.
    pub fn is_degraded(&self) -> bool {
        self.shared.degraded.load(Ordering::SeqCst)
    }

    pub fn flash_visible(&self) -> bool {
        self.shared
            .effects
            .lock()
            .map(|s| s.flash_visible)
            .unwrap_or(false)
    }

    pub fn confetti_active(&self) -> bool {
        self.shared
            .effects
            .lock()
            .map(|s| s.confetti_active)
            .unwrap_or(false)
    }

    pub fn floating_items(&self) -> Vec<FloatingItem> {
        self.shared
            .effects
            .lock()
            .map(|s| s.floating_items.clone())
            .unwrap_or_default()
    }

    /// Attach the rendering surface once it exists. Until then the
    /// coordinator runs as a no-op and window mutations still apply.
    pub async fn attach_surface(
        &self,
        surface: Arc<dyn PresentationSurface>,
    ) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::AttachSurface(surface))
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn detach_surface(&self) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::DetachSurface)
            .await
            .map_err(|e| e.to_string())
    }

    /// Forward a slide-change notification from the surface; updates the
    /// current comment.
    pub async fn slide_changed(&self, index: usize) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::SlideChanged(index))
            .await
            .map_err(|e| e.to_string())
    }

    /// Request an out-of-band photo refresh.
    pub async fn refresh_photos(&self) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::RefreshPhotos)
            .await
            .map_err(|e| e.to_string())
    }

    /// Request an out-of-band settings refresh.
    pub async fn refresh_settings(&self) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::RefreshSettings)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.cmd_tx
            .send(ServiceCommand::Shutdown)
            .await
            .map_err(|e| e.to_string())
    }
}
