//! Ambient visual effects.
//!
//! This module provides:
//! - **Scheduler**: three independent repeating timers (flash, floating
//!   emoji, confetti), each governed by its own interval and enable flag
//!   from the active settings
//! - **State**: the transient effect flags and live floating items the
//!   renderer reads
//! - **Updates**: an mpsc stream of effect transitions for push-style
//!   renderers
//!
//! All timers are torn down and rebuilt together whenever settings are
//! replaced, so a stale interval can never act on old configuration.

pub mod scheduler;

#[cfg(test)]
mod scheduler_tests;

pub use scheduler::{
    CONFETTI_DECAY, EffectScheduler, EffectState, EffectUpdate, FLASH_DECAY,
};
