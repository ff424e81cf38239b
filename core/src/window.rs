//! Photo window and reconciliation.
//!
//! The window is the single source of truth for what the carousel shows:
//! an ordered, newest-first, deduplicated sequence of approved photos,
//! bounded by the configured limit. Three merge operations reconcile the
//! update sources into it:
//!
//! - `merge_pull` — full-list fetch (initial load and poll fallback)
//! - `apply_insert` — live push insert
//! - `apply_delete` — live push delete
//!
//! Each returns a [`MergeOutcome`] so the caller knows whether the front
//! of the window changed and playback needs the pause/resume dance.

use photowall_types::{Photo, PhotoLimit};

/// What a merge did to the window. Only [`MergeOutcome::Prepended`]
/// disrupts an in-progress presentation; removals and no-ops must leave
/// playback untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing changed (no new ids, duplicate insert, or delete miss).
    Unchanged,
    /// New photos were added to the front. `added` counts the photos
    /// accepted before truncation.
    Prepended { added: usize },
    /// An entry was removed; ordering of the rest is preserved.
    Removed,
}

impl MergeOutcome {
    /// Whether this merge added or reordered the front of the window.
    pub fn disrupts_playback(&self) -> bool {
        matches!(self, MergeOutcome::Prepended { .. })
    }
}

/// Bounded, ordered, deduplicated collection of displayable photos.
///
/// Invariants: no two entries share an id; newest-first ordering; length
/// is at most the configured limit (unbounded for [`PhotoLimit::All`]).
/// Only the merge operations below mutate it.
#[derive(Debug, Clone, Default)]
pub struct PhotoWindow {
    photos: Vec<Photo>,
}

impl PhotoWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Photo at a slide index, front of the window being slide 0.
    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.photos.iter().any(|p| p.id == id)
    }

    /// Whether a pull batch would change the window. Lets the caller
    /// decide about pausing playback before committing the merge.
    pub fn has_new(&self, incoming: &[Photo]) -> bool {
        incoming.iter().any(|p| !self.contains(p.id))
    }

    /// Merge a full-list pull. Photos whose id is already present are
    /// discarded; if nothing is new the window is returned unchanged so
    /// downstream consumers see no disruption. Otherwise the new photos
    /// are prepended in their incoming (newest-first) order and the
    /// window is truncated to `limit`.
    pub fn merge_pull(&mut self, incoming: Vec<Photo>, limit: PhotoLimit) -> MergeOutcome {
        let mut fresh: Vec<Photo> = incoming
            .into_iter()
            .filter(|p| !self.contains(p.id))
            .collect();
        if fresh.is_empty() {
            return MergeOutcome::Unchanged;
        }

        let added = fresh.len();
        fresh.append(&mut self.photos);
        self.photos = fresh;
        if let Some(cap) = limit.cap() {
            self.photos.truncate(cap);
        }
        MergeOutcome::Prepended { added }
    }

    /// Merge a push insert. A duplicate id is ignored. Otherwise exactly
    /// this photo is prepended and the window truncated to `limit`; with
    /// `PhotoLimit::All` the cap is the pre-insert length, so the window
    /// does not grow on insert-driven merges (one new photo displaces the
    /// oldest). An empty window still admits its first insert.
    pub fn apply_insert(&mut self, photo: Photo, limit: PhotoLimit) -> MergeOutcome {
        if self.contains(photo.id) {
            return MergeOutcome::Unchanged;
        }

        let cap = limit.cap().unwrap_or_else(|| self.photos.len().max(1));
        self.photos.insert(0, photo);
        self.photos.truncate(cap);
        MergeOutcome::Prepended { added: 1 }
    }

    /// Merge a push delete: remove the entry with this id, if present.
    pub fn apply_delete(&mut self, id: i64) -> MergeOutcome {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        if self.photos.len() == before {
            MergeOutcome::Unchanged
        } else {
            MergeOutcome::Removed
        }
    }
}
