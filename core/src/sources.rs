//! Collaborator contracts for the remote store.
//!
//! The service consumes two external sources: a settings row fetched by a
//! fixed id, and the approved-photo table. Both offer a one-shot fetch
//! (the pull path) and a live event subscription (the push path).
//! Subscriptions are plain mpsc receivers; dropping the receiver is the
//! unsubscribe.

use photowall_types::{Photo, PhotoLimit, Settings};
use tokio::sync::mpsc;

/// Remote I/O failures. None of these are fatal: the service converts
/// every one into a logged no-op and keeps presenting last-known-good
/// state.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("settings fetch failed: {0}")]
    ConfigFetchFailed(String),
    #[error("photo fetch failed: {0}")]
    PhotoFetchFailed(String),
    #[error("push subscription dropped")]
    SubscriptionDropped,
}

/// Live change notification for the settings row. The payload is not
/// carried; receivers re-fetch through the normal refresh path, which
/// keeps delivery at-least-once and idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    Changed,
}

/// Live change event for the approved-photo table.
#[derive(Debug, Clone)]
pub enum PhotoEvent {
    /// A newly approved photo. Upstream filters to `approved == true`.
    Inserted(Photo),
    /// A photo was removed (or unapproved); identified by id.
    Deleted(i64),
}

/// Source of the settings row.
pub trait SettingsSource: Send + Sync + 'static {
    /// Fetch the settings row with the given id. `Ok(None)` means the row
    /// does not exist; callers fall back to defaults either way.
    fn fetch_one(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Settings>, SourceError>> + Send;

    /// Subscribe to change notifications. Each call opens a fresh channel.
    fn subscribe(&self) -> mpsc::Receiver<SettingsEvent>;
}

/// Source of approved photos.
pub trait PhotoSource: Send + Sync + 'static {
    /// Fetch approved photos, newest-first, at most `limit.fetch_rows()`.
    fn fetch_approved(
        &self,
        limit: PhotoLimit,
    ) -> impl Future<Output = Result<Vec<Photo>, SourceError>> + Send;

    /// Subscribe to insert/delete events. Each call opens a fresh channel,
    /// so the service can resubscribe after the channel drops.
    fn subscribe(&self) -> mpsc::Receiver<PhotoEvent>;
}
