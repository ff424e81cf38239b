//! In-memory demo collaborators.
//!
//! Stand-ins for the remote store and the rendering carousel so the
//! service can run headless: a settings source serving a fixed row, a
//! photo source seeded with a few photos that can push inserts on a
//! timer, and a surface that logs every playback call. A real store
//! adapter implements the same source traits.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use photowall_core::{
    EffectUpdate, PhotoEvent, PhotoSource, PresentationSurface, SettingsEvent, SettingsSource,
    SourceError,
};
use photowall_types::{Photo, PhotoLimit, Settings};

// ─────────────────────────────────────────────────────────────────────────────
// Settings source
// ─────────────────────────────────────────────────────────────────────────────

/// Serves the default settings row and never changes it.
#[derive(Clone, Default)]
pub struct DemoSettingsSource;

impl SettingsSource for DemoSettingsSource {
    async fn fetch_one(&self, _id: &str) -> Result<Option<Settings>, SourceError> {
        Ok(Some(Settings::default()))
    }

    fn subscribe(&self) -> mpsc::Receiver<SettingsEvent> {
        // No change notifications; hold the sender open so the service
        // does not treat the quiet channel as dropped.
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            tx.closed().await;
        });
        rx
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Photo source
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct PhotoStore {
    photos: Mutex<Vec<Photo>>,
    subs: Mutex<Vec<mpsc::Sender<PhotoEvent>>>,
    next_id: AtomicI64,
}

/// In-memory approved-photo table with a push channel.
#[derive(Clone, Default)]
pub struct DemoPhotoSource {
    store: Arc<PhotoStore>,
}

impl DemoPhotoSource {
    /// Store pre-populated with a handful of approved photos.
    pub fn seeded(count: usize) -> Self {
        let source = Self::default();
        for _ in 0..count {
            source.insert_photo();
        }
        source
    }

    /// Add a newly "approved" photo and push it to subscribers.
    pub fn insert_photo(&self) -> Photo {
        let id = self.store.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let photo = Photo {
            id,
            created_at: Utc::now(),
            image_url: format!("demo/photo-{id}.jpg"),
            comment: Some(format!("Demo photo #{id}")),
            approved: true,
        };
        self.store.photos.lock().unwrap().insert(0, photo.clone());

        let subs = self.store.subs.lock().unwrap().clone();
        for tx in subs {
            let photo = photo.clone();
            tokio::spawn(async move {
                let _ = tx.send(PhotoEvent::Inserted(photo)).await;
            });
        }
        photo
    }
}

impl PhotoSource for DemoPhotoSource {
    async fn fetch_approved(&self, limit: PhotoLimit) -> Result<Vec<Photo>, SourceError> {
        let mut photos = self.store.photos.lock().unwrap().clone();
        photos.truncate(limit.fetch_rows());
        Ok(photos)
    }

    fn subscribe(&self) -> mpsc::Receiver<PhotoEvent> {
        let (tx, rx) = mpsc::channel(16);
        self.store.subs.lock().unwrap().push(tx);
        rx
    }
}

/// Push a fresh insert every `every`, exercising the live path.
pub async fn push_inserts(source: DemoPhotoSource, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let photo = source.insert_photo();
        info!(photo_id = photo.id, "demo push insert");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation surface
// ─────────────────────────────────────────────────────────────────────────────

/// Surface that logs every playback call. Autoplay starts out running,
/// matching a carousel that begins rotating as soon as it renders.
pub struct LoggingSurface {
    playing: AtomicBool,
}

impl LoggingSurface {
    pub fn new() -> Self {
        Self {
            playing: AtomicBool::new(true),
        }
    }
}

impl PresentationSurface for LoggingSurface {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
        info!("surface: autoplay stopped");
    }

    fn start(&self) {
        self.playing.store(true, Ordering::SeqCst);
        info!("surface: autoplay resumed");
    }

    fn go_to_slide(&self, index: usize, animate: bool) {
        info!(index, animate, "surface: jump to slide");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effect updates
// ─────────────────────────────────────────────────────────────────────────────

/// Drain effect transitions and log them, standing in for a renderer.
pub async fn log_effect_updates(mut rx: mpsc::Receiver<EffectUpdate>) {
    while let Some(update) = rx.recv().await {
        match update {
            EffectUpdate::FlashChanged(on) => debug!(on, "flash"),
            EffectUpdate::ConfettiChanged(on) => debug!(on, "confetti"),
            EffectUpdate::ItemSpawned(item) => {
                debug!(id = item.id, glyph = %item.glyph, "floating item spawned")
            }
            EffectUpdate::ItemExpired(id) => debug!(id, "floating item expired"),
        }
    }
}
