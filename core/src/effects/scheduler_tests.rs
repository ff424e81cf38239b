//! Tests for the effect scheduler.
//!
//! All tests run with paused time; sleeping in the test body drives the
//! mock clock through the scheduler's timers deterministically.

use std::time::Duration;

use tokio::sync::mpsc;

use super::scheduler::{EffectScheduler, EffectUpdate};
use photowall_types::Settings;

/// Settings with every effect disabled, as a base to enable one at a time.
fn quiet_settings() -> Settings {
    Settings {
        flash_enabled: false,
        emojis_enabled: false,
        confetti_enabled: false,
        ..Settings::default()
    }
}

fn make_scheduler() -> (EffectScheduler, mpsc::Receiver<EffectUpdate>) {
    let (tx, rx) = mpsc::channel(256);
    (EffectScheduler::new(tx), rx)
}

/// Let `ms` of mock time elapse, running everything scheduled within it.
async fn run_for(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn drain(rx: &mut mpsc::Receiver<EffectUpdate>) -> Vec<EffectUpdate> {
    let mut updates = Vec::new();
    while let Ok(u) = rx.try_recv() {
        updates.push(u);
    }
    updates
}

fn flash_visible(scheduler: &EffectScheduler) -> bool {
    scheduler.state_handle().lock().unwrap().flash_visible
}

fn confetti_active(scheduler: &EffectScheduler) -> bool {
    scheduler.state_handle().lock().unwrap().confetti_active
}

// ─────────────────────────────────────────────────────────────────────────────
// Flash
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_flash_fires_at_interval_and_decays() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        flash_enabled: true,
        flash_interval_ms: 10_000,
        ..quiet_settings()
    });

    run_for(9_999).await;
    assert!(!flash_visible(&scheduler), "no flash before the interval");

    run_for(2).await; // t ≈ 10_001
    assert!(flash_visible(&scheduler), "flash visible at t = interval");
    assert_eq!(drain(&mut rx), vec![EffectUpdate::FlashChanged(true)]);

    run_for(200).await; // past the 200ms decay
    assert!(!flash_visible(&scheduler), "flash reset by t = 10_200");
    assert_eq!(drain(&mut rx), vec![EffectUpdate::FlashChanged(false)]);
}

#[tokio::test(start_paused = true)]
async fn test_flash_disabled_never_fires() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        flash_enabled: false,
        flash_interval_ms: 1_000,
        ..quiet_settings()
    });

    run_for(10_000).await;
    assert!(!flash_visible(&scheduler));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_cancels_old_flash_timer() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        flash_enabled: true,
        flash_interval_ms: 1_000,
        ..quiet_settings()
    });

    // Replace settings before the first tick; the old timer must be gone
    scheduler.rearm(&quiet_settings());
    run_for(5_000).await;
    assert!(!flash_visible(&scheduler));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_does_not_double_schedule() {
    let (mut scheduler, mut rx) = make_scheduler();
    let settings = Settings {
        flash_enabled: true,
        flash_interval_ms: 1_000,
        ..quiet_settings()
    };
    // Two back-to-back reloads of the same settings: one timer survives
    scheduler.rearm(&settings);
    scheduler.rearm(&settings);

    run_for(1_050).await;
    let on_count = drain(&mut rx)
        .iter()
        .filter(|u| **u == EffectUpdate::FlashChanged(true))
        .count();
    assert_eq!(on_count, 1, "exactly one flash trigger per interval");
}

// ─────────────────────────────────────────────────────────────────────────────
// Confetti
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_confetti_stays_active_for_decay_window() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        confetti_enabled: true,
        confetti_interval_ms: 30_000,
        ..quiet_settings()
    });

    run_for(30_001).await;
    assert!(confetti_active(&scheduler));
    assert_eq!(drain(&mut rx), vec![EffectUpdate::ConfettiChanged(true)]);

    run_for(4_998).await; // t ≈ 34_999
    assert!(confetti_active(&scheduler), "active through the decay window");

    run_for(3).await; // past t = 35_001
    assert!(!confetti_active(&scheduler));
    assert_eq!(drain(&mut rx), vec![EffectUpdate::ConfettiChanged(false)]);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_confetti_triggers_extend_visibility() {
    let (mut scheduler, mut rx) = make_scheduler();
    // Interval (2s) smaller than decay (5s): triggers overlap
    scheduler.rearm(&Settings {
        confetti_enabled: true,
        confetti_interval_ms: 2_000,
        ..quiet_settings()
    });

    run_for(4_001).await; // two triggers, at t=2000 and t=4000
    assert!(confetti_active(&scheduler));

    // Stop further triggers; only the two decay timers remain
    scheduler.rearm(&quiet_settings());

    run_for(2_998).await; // t ≈ 7_001: first trigger's decay has lapsed
    assert!(
        confetti_active(&scheduler),
        "stale decay must not clear a newer trigger"
    );

    run_for(2_100).await; // past t = 9_000 = second trigger + 5s
    assert!(!confetti_active(&scheduler));

    // Exactly one on and one off over the whole sequence — no queuing
    assert_eq!(
        drain(&mut rx),
        vec![
            EffectUpdate::ConfettiChanged(true),
            EffectUpdate::ConfettiChanged(false)
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Floating emoji
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_emoji_items_spawn_within_bounds_and_expire() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        emojis_enabled: true,
        emoji_interval_ms: 100,
        selected_emojis: "🎉,🎊".to_string(),
        ..quiet_settings()
    });

    // 0.8 spawn chance per tick: 50 ticks make a spawn all but certain
    run_for(5_001).await;
    let mut spawned = Vec::new();
    let mut expired = 0usize;
    for update in drain(&mut rx) {
        match update {
            EffectUpdate::ItemSpawned(item) => spawned.push(item),
            // Short-lived items can already expire inside this window
            EffectUpdate::ItemExpired(_) => expired += 1,
            other => panic!("unexpected update: {other:?}"),
        }
    }
    assert!(!spawned.is_empty(), "expected at least one item in 50 ticks");

    for item in &spawned {
        assert!(["🎉", "🎊"].contains(&item.glyph.as_str()));
        assert!((0.0..100.0).contains(&item.left_pct));
        assert!((2_000..5_000).contains(&item.duration_ms));
        assert!((1.5..2.5).contains(&item.size_rem));
    }

    // Every item's removal is timed by its own duration (< 5s), so after
    // stopping the spawner and waiting out the longest one, none remain.
    scheduler.rearm(&quiet_settings());
    run_for(5_001).await;
    assert!(
        scheduler
            .state_handle()
            .lock()
            .unwrap()
            .floating_items
            .is_empty()
    );
    expired += drain(&mut rx)
        .iter()
        .filter(|u| matches!(u, EffectUpdate::ItemExpired(_)))
        .count();
    assert_eq!(expired, spawned.len());
}

#[tokio::test(start_paused = true)]
async fn test_emoji_timer_skipped_when_glyph_list_is_empty() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        emojis_enabled: true,
        emoji_interval_ms: 100,
        selected_emojis: " , ,".to_string(),
        ..quiet_settings()
    });

    run_for(2_000).await;
    assert!(drain(&mut rx).is_empty());
    assert!(
        scheduler
            .state_handle()
            .lock()
            .unwrap()
            .floating_items
            .is_empty()
    );
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_disables_effect_instead_of_spinning() {
    let (mut scheduler, mut rx) = make_scheduler();
    scheduler.rearm(&Settings {
        flash_enabled: true,
        flash_interval_ms: 0,
        ..quiet_settings()
    });

    run_for(1_000).await;
    assert!(!flash_visible(&scheduler));
    assert!(drain(&mut rx).is_empty());
}
