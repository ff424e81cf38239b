//! Shared data types for the photowall display.
//!
//! These are the wire types exchanged with the remote store and the
//! renderer: approved photos, carousel settings, and the ephemeral
//! floating items spawned by the effect scheduler. Kept dependency-light
//! so both the core service and any front end can use them.

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How many rows a pull fetches when the limit is `All`.
/// The store is still queried with a finite page size.
pub const UNLIMITED_FETCH_ROWS: usize = 100;

// ─────────────────────────────────────────────────────────────────────────────
// Photo
// ─────────────────────────────────────────────────────────────────────────────

/// An approved photo row from the remote store. Identity is `id`;
/// rows are immutable once approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Opaque reference to the stored image (URL or storage key).
    pub image_url: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub approved: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Photo limit
// ─────────────────────────────────────────────────────────────────────────────

/// Window size limit. The store persists this as either a number or the
/// string `"all"` (numeric strings also appear in older rows), so serde
/// goes through a hand-written impl instead of a plain derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoLimit {
    /// No bound on the window ("show all").
    All,
    Max(usize),
}

impl PhotoLimit {
    /// Window cap, `None` when unbounded.
    pub fn cap(&self) -> Option<usize> {
        match self {
            PhotoLimit::All => None,
            PhotoLimit::Max(n) => Some(*n),
        }
    }

    /// Row count to request on a pull fetch.
    pub fn fetch_rows(&self) -> usize {
        self.cap().unwrap_or(UNLIMITED_FETCH_ROWS)
    }
}

impl Serialize for PhotoLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PhotoLimit::All => serializer.serialize_str("all"),
            PhotoLimit::Max(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for PhotoLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(PhotoLimit::Max(n as usize)),
            Raw::Text(s) if s.eq_ignore_ascii_case("all") => Ok(PhotoLimit::All),
            Raw::Text(s) => s
                .trim()
                .parse::<usize>()
                .map(PhotoLimit::Max)
                .map_err(|_| D::Error::custom(format!("invalid photo limit {s:?}"))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Carousel display settings, one process-wide row replaced wholesale on
/// every refresh. Field names match the remote store's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "slide_interval")]
    pub slide_interval_ms: u64,
    pub photos_limit: PhotoLimit,
    pub flash_enabled: bool,
    #[serde(rename = "flash_interval")]
    pub flash_interval_ms: u64,
    pub emojis_enabled: bool,
    #[serde(rename = "emoji_interval")]
    pub emoji_interval_ms: u64,
    /// Comma-separated glyph list as stored upstream; use [`Settings::glyphs`]
    /// for the parsed form.
    pub selected_emojis: String,
    pub confetti_enabled: bool,
    #[serde(rename = "confetti_interval")]
    pub confetti_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slide_interval_ms: 6000,
            photos_limit: PhotoLimit::Max(10),
            flash_enabled: true,
            flash_interval_ms: 10_000,
            emojis_enabled: true,
            emoji_interval_ms: 1000,
            selected_emojis: "❤️,🧡,💛,💚,💙,💜,🎉,🎊,🎈,🥳".to_string(),
            confetti_enabled: true,
            confetti_interval_ms: 30_000,
        }
    }
}

impl Settings {
    /// Parsed emoji list: split on commas, trimmed, empties dropped.
    pub fn glyphs(&self) -> Vec<String> {
        self.selected_emojis
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Floating item
// ─────────────────────────────────────────────────────────────────────────────

/// Ephemeral floating emoji spawned by the effect scheduler. Self-destructs
/// after `duration_ms`; each item's lifetime is independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingItem {
    pub id: u64,
    pub glyph: String,
    /// Horizontal spawn position in [0, 100) percent of viewport width.
    pub left_pct: f64,
    /// Float animation duration in [2000, 5000) ms.
    pub duration_ms: u64,
    /// Font size in [1.5, 2.5) rem.
    pub size_rem: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_limit_accepts_all_and_numbers() {
        assert_eq!(
            serde_json::from_str::<PhotoLimit>("\"all\"").unwrap(),
            PhotoLimit::All
        );
        assert_eq!(
            serde_json::from_str::<PhotoLimit>("\"ALL\"").unwrap(),
            PhotoLimit::All
        );
        assert_eq!(
            serde_json::from_str::<PhotoLimit>("25").unwrap(),
            PhotoLimit::Max(25)
        );
        // Older rows stored the number as text
        assert_eq!(
            serde_json::from_str::<PhotoLimit>("\"10\"").unwrap(),
            PhotoLimit::Max(10)
        );
        assert!(serde_json::from_str::<PhotoLimit>("\"lots\"").is_err());
    }

    #[test]
    fn test_photo_limit_round_trips() {
        assert_eq!(serde_json::to_string(&PhotoLimit::All).unwrap(), "\"all\"");
        assert_eq!(serde_json::to_string(&PhotoLimit::Max(10)).unwrap(), "10");
    }

    #[test]
    fn test_settings_defaults_match_upstream() {
        let s = Settings::default();
        assert_eq!(s.slide_interval_ms, 6000);
        assert_eq!(s.photos_limit, PhotoLimit::Max(10));
        assert!(s.flash_enabled);
        assert_eq!(s.flash_interval_ms, 10_000);
        assert!(s.emojis_enabled);
        assert_eq!(s.emoji_interval_ms, 1000);
        assert!(s.confetti_enabled);
        assert_eq!(s.confetti_interval_ms, 30_000);
        assert_eq!(s.glyphs().len(), 10);
    }

    #[test]
    fn test_settings_deserializes_store_row() {
        let row = r#"{
            "slide_interval": 4000,
            "photos_limit": "all",
            "flash_enabled": false,
            "flash_interval": 15000,
            "emojis_enabled": true,
            "emoji_interval": 800,
            "selected_emojis": "🎉, 🎊 ,,🥳",
            "confetti_enabled": false,
            "confetti_interval": 60000
        }"#;
        let s: Settings = serde_json::from_str(row).unwrap();
        assert_eq!(s.slide_interval_ms, 4000);
        assert_eq!(s.photos_limit, PhotoLimit::All);
        assert_eq!(s.glyphs(), vec!["🎉", "🎊", "🥳"]);
    }

    #[test]
    fn test_glyphs_empty_when_only_separators() {
        let s = Settings {
            selected_emojis: " , ,, ".to_string(),
            ..Settings::default()
        };
        assert!(s.glyphs().is_empty());
    }

    #[test]
    fn test_fetch_rows_caps_unbounded_pulls() {
        assert_eq!(PhotoLimit::Max(10).fetch_rows(), 10);
        assert_eq!(PhotoLimit::All.fetch_rows(), UNLIMITED_FETCH_ROWS);
    }
}
