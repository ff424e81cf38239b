//! Presentation coordinator.
//!
//! Mediates between window mutations and the externally owned rotating
//! presentation surface. Mutating the slide deck while autoplay is running
//! makes the renderer jump, so the coordinator stops autoplay first,
//! lets the mutation land, waits a short settle delay for the surface to
//! react to the new data, and only then resumes. On a push insert it also
//! forces the surface back to slide 0 (no animation) so the new photo is
//! shown first.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

/// Settle delay before resuming autoplay after a window mutation.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Capability interface over the external rotating-presentation surface.
/// Injected so tests (and a not-yet-rendered display) can run against a
/// null or recording implementation.
pub trait PresentationSurface: Send + Sync {
    fn is_playing(&self) -> bool;
    fn stop(&self);
    fn start(&self);
    fn go_to_slide(&self, index: usize, animate: bool);
}

/// Wraps an optional surface handle. All methods are no-ops while no
/// surface is attached; window mutations proceed regardless.
#[derive(Clone, Default)]
pub struct PresentationCoordinator {
    surface: Option<Arc<dyn PresentationSurface>>,
}

impl PresentationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, surface: Arc<dyn PresentationSurface>) {
        self.surface = Some(surface);
    }

    pub fn detach(&mut self) {
        self.surface = None;
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Call before a merge that will add or reorder the front of the
    /// window. Stops autoplay if it is running and returns whether a
    /// resume is owed afterward.
    pub fn pause_for_mutation(&self) -> bool {
        match &self.surface {
            Some(surface) if surface.is_playing() => {
                debug!("pausing autoplay for window mutation");
                surface.stop();
                true
            }
            _ => false,
        }
    }

    /// Call after the mutation has been applied. Schedules the resume
    /// after [`SETTLE_DELAY`] rather than resuming synchronously.
    /// `reset_to_first` is set on push inserts: the surface is forced to
    /// slide 0 without animation before autoplay restarts.
    pub fn schedule_resume(&self, resume_owed: bool, reset_to_first: bool) {
        let Some(surface) = self.surface.clone() else {
            return;
        };
        if !resume_owed && !reset_to_first {
            return;
        }

        tokio::spawn(async move {
            tokio::time::sleep(SETTLE_DELAY).await;
            if reset_to_first {
                surface.go_to_slide(0, false);
            }
            if resume_owed {
                debug!("resuming autoplay after settle delay");
                surface.start();
            }
        });
    }
}
