//! Effect scheduler.
//!
//! Owns one repeating timer task per effect. `rearm` is strictly
//! cancel-all-then-re-create: intervals are never adjusted in place, so
//! config reloads cannot accumulate drift or leave two timers racing for
//! the same effect.
//!
//! Decay is handled by per-trigger tasks guarded with a generation
//! counter: a stale decay never clears a flag that a newer trigger has
//! re-raised, which gives confetti its re-extend (no queuing) semantics.
//! Floating items likewise carry their own independent removal timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, warn};

use photowall_types::{FloatingItem, Settings};

/// How long the flash overlay stays visible after a trigger.
pub const FLASH_DECAY: Duration = Duration::from_millis(200);
/// How long confetti stays active after the latest trigger.
pub const CONFETTI_DECAY: Duration = Duration::from_millis(5000);
/// Chance that an emoji tick actually spawns an item.
const EMOJI_SPAWN_CHANCE: f64 = 0.8;

/// Effect transition pushed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum EffectUpdate {
    FlashChanged(bool),
    ConfettiChanged(bool),
    ItemSpawned(FloatingItem),
    ItemExpired(u64),
}

/// Shared effect snapshot the renderer (and the service handle) reads.
#[derive(Debug, Default)]
pub struct EffectState {
    pub flash_visible: bool,
    pub confetti_active: bool,
    pub floating_items: Vec<FloatingItem>,
    flash_generation: u64,
    confetti_generation: u64,
}

pub struct EffectScheduler {
    state: Arc<Mutex<EffectState>>,
    update_tx: mpsc::Sender<EffectUpdate>,
    next_item_id: Arc<AtomicU64>,
    tasks: Vec<JoinHandle<()>>,
}

impl EffectScheduler {
    pub fn new(update_tx: mpsc::Sender<EffectUpdate>) -> Self {
        Self {
            state: Arc::new(Mutex::new(EffectState::default())),
            update_tx,
            next_item_id: Arc::new(AtomicU64::new(1)),
            tasks: Vec::new(),
        }
    }

    /// Shared handle to the effect snapshot.
    pub fn state_handle(&self) -> Arc<Mutex<EffectState>> {
        Arc::clone(&self.state)
    }

    /// Cancel every timer and re-create them from the given settings.
    /// Called whenever the settings value is replaced. In-flight decay
    /// and item-removal timers are left to run out; the generation guard
    /// keeps them from clobbering anything newer.
    pub fn rearm(&mut self, settings: &Settings) {
        self.shutdown();

        if settings.flash_enabled {
            if let Some(every) = timer_period(settings.flash_interval_ms, "flash") {
                self.tasks.push(spawn_flash(
                    Arc::clone(&self.state),
                    self.update_tx.clone(),
                    every,
                ));
            }
        }

        let glyphs = settings.glyphs();
        if settings.emojis_enabled && !glyphs.is_empty() {
            if let Some(every) = timer_period(settings.emoji_interval_ms, "emoji") {
                self.tasks.push(spawn_emoji(
                    Arc::clone(&self.state),
                    self.update_tx.clone(),
                    every,
                    glyphs,
                    Arc::clone(&self.next_item_id),
                ));
            }
        }

        if settings.confetti_enabled {
            if let Some(every) = timer_period(settings.confetti_interval_ms, "confetti") {
                self.tasks.push(spawn_confetti(
                    Arc::clone(&self.state),
                    self.update_tx.clone(),
                    every,
                ));
            }
        }

        debug!(
            timers = self.tasks.len(),
            flash_ms = settings.flash_interval_ms,
            emoji_ms = settings.emoji_interval_ms,
            confetti_ms = settings.confetti_interval_ms,
            "effect timers rearmed"
        );
    }

    /// Cancel all timer tasks.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Validate an interval from settings. A zero interval would make the
/// timer spin, so the effect is skipped instead.
fn timer_period(interval_ms: u64, effect: &str) -> Option<Duration> {
    if interval_ms == 0 {
        warn!(effect, "zero interval in settings, effect disabled");
        return None;
    }
    Some(Duration::from_millis(interval_ms))
}

fn spawn_flash(
    state: Arc<Mutex<EffectState>>,
    tx: mpsc::Sender<EffectUpdate>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the effect fires at t = every
        ticker.tick().await;
        loop {
            ticker.tick().await;
            fire_flash(&state, &tx).await;
        }
    })
}

async fn fire_flash(state: &Arc<Mutex<EffectState>>, tx: &mpsc::Sender<EffectUpdate>) {
    let generation = {
        let Ok(mut s) = state.lock() else { return };
        s.flash_visible = true;
        s.flash_generation += 1;
        s.flash_generation
    };
    let _ = tx.send(EffectUpdate::FlashChanged(true)).await;

    let state = Arc::clone(state);
    let tx = tx.clone();
    tokio::spawn(async move {
        sleep(FLASH_DECAY).await;
        let cleared = {
            let Ok(mut s) = state.lock() else { return };
            if s.flash_generation == generation && s.flash_visible {
                s.flash_visible = false;
                true
            } else {
                false
            }
        };
        if cleared {
            let _ = tx.send(EffectUpdate::FlashChanged(false)).await;
        }
    });
}

fn spawn_confetti(
    state: Arc<Mutex<EffectState>>,
    tx: mpsc::Sender<EffectUpdate>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            fire_confetti(&state, &tx).await;
        }
    })
}

async fn fire_confetti(state: &Arc<Mutex<EffectState>>, tx: &mpsc::Sender<EffectUpdate>) {
    let (generation, was_active) = {
        let Ok(mut s) = state.lock() else { return };
        let was_active = s.confetti_active;
        s.confetti_active = true;
        s.confetti_generation += 1;
        (s.confetti_generation, was_active)
    };
    // An overlapping trigger only extends visibility; no duplicate "on"
    if !was_active {
        let _ = tx.send(EffectUpdate::ConfettiChanged(true)).await;
    }

    let state = Arc::clone(state);
    let tx = tx.clone();
    tokio::spawn(async move {
        sleep(CONFETTI_DECAY).await;
        let cleared = {
            let Ok(mut s) = state.lock() else { return };
            if s.confetti_generation == generation && s.confetti_active {
                s.confetti_active = false;
                true
            } else {
                false
            }
        };
        if cleared {
            let _ = tx.send(EffectUpdate::ConfettiChanged(false)).await;
        }
    });
}

fn spawn_emoji(
    state: Arc<Mutex<EffectState>>,
    tx: mpsc::Sender<EffectUpdate>,
    every: Duration,
    glyphs: Vec<String>,
    next_id: Arc<AtomicU64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if rand::random::<f64>() < EMOJI_SPAWN_CHANCE {
                spawn_item(&state, &tx, &glyphs, &next_id).await;
            }
        }
    })
}

async fn spawn_item(
    state: &Arc<Mutex<EffectState>>,
    tx: &mpsc::Sender<EffectUpdate>,
    glyphs: &[String],
    next_id: &AtomicU64,
) {
    let item = {
        let mut rng = rand::thread_rng();
        FloatingItem {
            id: next_id.fetch_add(1, Ordering::Relaxed),
            glyph: glyphs[rng.gen_range(0..glyphs.len())].clone(),
            left_pct: rng.gen_range(0.0..100.0),
            duration_ms: rng.gen_range(2000..5000),
            size_rem: rng.gen_range(1.5..2.5),
        }
    };

    {
        let Ok(mut s) = state.lock() else { return };
        s.floating_items.push(item.clone());
    }
    let _ = tx.send(EffectUpdate::ItemSpawned(item.clone())).await;

    // Removal is timed by this item's own duration, independent of the
    // spawn cadence and of any scheduler rearm.
    let state = Arc::clone(state);
    let tx = tx.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(item.duration_ms)).await;
        let removed = {
            let Ok(mut s) = state.lock() else { return };
            let before = s.floating_items.len();
            s.floating_items.retain(|i| i.id != item.id);
            s.floating_items.len() != before
        };
        if removed {
            let _ = tx.send(EffectUpdate::ItemExpired(item.id)).await;
        }
    });
}
