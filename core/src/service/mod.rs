//! Display service.
//!
//! One long-lived task owns all mutation: it merges the three photo
//! update sources (initial pull, 30 s poll fallback, live push events)
//! into the window, keeps the settings snapshot fresh, re-arms the
//! effect timers on every settings replacement, and runs the
//! pause/resume dance against the presentation surface. Handlers run to
//! completion between awaits, so window mutations are atomic with
//! respect to each other.

mod handler;
mod state;


pub use handler::ServiceHandle;
pub use state::SharedState;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use photowall_types::Photo;

use crate::effects::{EffectScheduler, EffectUpdate};
use crate::presentation::{PresentationCoordinator, PresentationSurface};
use crate::sources::{PhotoEvent, PhotoSource, SettingsEvent, SettingsSource};
use crate::window::MergeOutcome;

/// Cadence of the pull fallback while the push channel is healthy or not.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Commands accepted by the service task.
pub enum ServiceCommand {
    RefreshSettings,
    RefreshPhotos,
    SlideChanged(usize),
    AttachSurface(Arc<dyn PresentationSurface>),
    DetachSurface,
    Shutdown,
}

/// The display service. Construct with [`DisplayService::new`], then call
/// [`DisplayService::run`] on a task of its own and talk to it through
/// the returned [`ServiceHandle`].
pub struct DisplayService<S, P> {
    shared: Arc<SharedState>,
    settings_source: S,
    photo_source: P,
    settings_id: String,
    poll_interval: Duration,
    coordinator: PresentationCoordinator,
    effects: EffectScheduler,
    cmd_rx: Option<mpsc::Receiver<ServiceCommand>>,
}

impl<S: SettingsSource, P: PhotoSource> DisplayService<S, P> {
    pub fn new(
        settings_source: S,
        photo_source: P,
        settings_id: impl Into<String>,
        effect_tx: mpsc::Sender<EffectUpdate>,
    ) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let effects = EffectScheduler::new(effect_tx);
        let shared = Arc::new(SharedState::new(effects.state_handle()));
        let handle = ServiceHandle {
            cmd_tx,
            shared: Arc::clone(&shared),
        };
        let service = Self {
            shared,
            settings_source,
            photo_source,
            settings_id: settings_id.into(),
            poll_interval: POLL_INTERVAL,
            coordinator: PresentationCoordinator::new(),
            effects,
            cmd_rx: Some(cmd_rx),
        };
        (service, handle)
    }

    /// Override the poll fallback cadence (tests, demo mode).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run until shutdown. Settings are fetched first so the initial pull
    /// uses the configured limit; the poll ticker's immediate first tick
    /// doubles as the initial photo fetch.
    pub async fn run(mut self) {
        let Some(mut cmd_rx) = self.cmd_rx.take() else {
            return;
        };
        info!(settings_id = %self.settings_id, "display service starting");

        let mut settings_rx = self.settings_source.subscribe();
        let mut photo_rx = self.photo_source.subscribe();
        let mut settings_open = true;
        let mut photos_open = true;

        self.refresh_settings().await;

        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(ServiceCommand::RefreshSettings) => self.refresh_settings().await,
                    Some(ServiceCommand::RefreshPhotos) => self.refresh_photos().await,
                    Some(ServiceCommand::SlideChanged(index)) => self.update_comment(index).await,
                    Some(ServiceCommand::AttachSurface(surface)) => self.coordinator.attach(surface),
                    Some(ServiceCommand::DetachSurface) => self.coordinator.detach(),
                    Some(ServiceCommand::Shutdown) | None => break,
                },
                ev = photo_rx.recv(), if photos_open => match ev {
                    Some(PhotoEvent::Inserted(photo)) => self.handle_insert(photo).await,
                    Some(PhotoEvent::Deleted(id)) => self.handle_delete(id).await,
                    None => {
                        photos_open = false;
                        self.shared.degraded.store(true, Ordering::SeqCst);
                        warn!("photo subscription dropped, relying on poll fallback");
                    }
                },
                ev = settings_rx.recv(), if settings_open => match ev {
                    Some(SettingsEvent::Changed) => self.refresh_settings().await,
                    None => {
                        settings_open = false;
                        warn!("settings subscription dropped");
                    }
                },
                _ = poll.tick() => {
                    if !photos_open {
                        photo_rx = self.photo_source.subscribe();
                        photos_open = true;
                        self.shared.degraded.store(false, Ordering::SeqCst);
                        info!("photo subscription re-established");
                    }
                    if !settings_open {
                        settings_rx = self.settings_source.subscribe();
                        settings_open = true;
                        // Catch up on notifications missed while down
                        self.refresh_settings().await;
                    }
                    self.refresh_photos().await;
                }
            }
        }

        self.effects.shutdown();
        info!("display service stopped");
    }

    /// Replace the settings wholesale and propagate: every effect timer
    /// is rebuilt, and the window is refreshed since the limit may have
    /// changed.
    async fn refresh_settings(&mut self) {
        let settings = self
            .shared
            .settings
            .refresh(&self.settings_source, &self.settings_id)
            .await;
        self.effects.rearm(&settings);
        self.refresh_photos().await;
    }

    /// Pull path: fetch the full approved list and merge. A fetch failure
    /// leaves the window unchanged; already-displayed photos are never
    /// cleared by an outage.
    async fn refresh_photos(&mut self) {
        let limit = self.shared.settings.current().await.photos_limit;
        match self.photo_source.fetch_approved(limit).await {
            Ok(batch) => {
                // Only disturb playback when the merge will change something
                let has_new = self.shared.window.read().await.has_new(&batch);
                if has_new {
                    let resume = self.coordinator.pause_for_mutation();
                    let outcome = self.shared.window.write().await.merge_pull(batch, limit);
                    if let MergeOutcome::Prepended { added } = outcome {
                        debug!(added, "pull merged into window");
                    }
                    self.coordinator.schedule_resume(resume, false);
                }
            }
            Err(e) => warn!(error = %e, "photo fetch failed, window unchanged"),
        }
        self.shared.loading.store(false, Ordering::SeqCst);
    }

    /// Push insert: dedup up front so a duplicate event never touches
    /// playback, then prepend and force the surface back to slide 0.
    async fn handle_insert(&mut self, photo: Photo) {
        if self.shared.window.read().await.contains(photo.id) {
            debug!(photo_id = photo.id, "duplicate push insert ignored");
            return;
        }
        let limit = self.shared.settings.current().await.photos_limit;
        let photo_id = photo.id;

        let resume = self.coordinator.pause_for_mutation();
        self.shared.window.write().await.apply_insert(photo, limit);
        debug!(photo_id, "push insert merged");
        self.coordinator.schedule_resume(resume, true);
    }

    /// Push delete: removal only, so playback state is never touched.
    async fn handle_delete(&mut self, id: i64) {
        let outcome = self.shared.window.write().await.apply_delete(id);
        if outcome == MergeOutcome::Removed {
            debug!(photo_id = id, "push delete applied");
        }
    }

    /// Surface the comment of the photo at the slide index that just
    /// became visible.
    async fn update_comment(&self, index: usize) {
        let comment = self
            .shared
            .window
            .read()
            .await
            .get(index)
            .and_then(|p| p.comment.clone())
            .unwrap_or_default();
        *self.shared.current_comment.write().await = comment;
    }
}
