use serde::{Deserialize, Serialize};

/// Tracks shorter than this are skipped by autoplay, both as search seeds
/// and in search results (too short to say anything about listening taste).
pub const MIN_AUTOPLAY_TRACK_MS: u64 = 90_000;

/// A playable audio item as reported by the track source.
///
/// The core never mutates a track; it only moves tracks between the
/// pending/history/fallback lists.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Track {
    /// Source-specific unique id (e.g. a YouTube video id)
    pub identifier: String,
    pub author: String,
    pub title: String,
    pub uri: String,
    /// Duration in milliseconds, 0 when unknown/unbounded
    pub length_ms: u64,
    /// True for indefinite-length sources (livestreams)
    pub is_stream: bool,
    /// Provider name, e.g. "youtube"
    pub source: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Track {
    /// Whether the track is long enough to seed or fill the autoplay buffer
    pub fn autoplay_eligible(&self) -> bool {
        !self.is_stream && self.length_ms >= MIN_AUTOPLAY_TRACK_MS
    }
}

/// Governs what `Queue::advance` does once the current track finishes.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Consume the queue linearly
    #[default]
    Off,

    /// Repeat the current track indefinitely
    Song,

    /// Cycle the full play history back into the queue once it drains
    Playlist,
}

impl LoopMode {
    /// Parses user-facing mode names ("off" / "song" / "playlist")
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Some(LoopMode::Off),
            "song" => Some(LoopMode::Song),
            "playlist" => Some(LoopMode::Playlist),
            _ => None,
        }
    }
}

/// Formats a track length as m:ss or h:mm:ss for queue listings.
pub fn format_length(length_ms: u64) -> String {
    let secs = length_ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
