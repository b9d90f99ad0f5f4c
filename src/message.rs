use crate::track::Track;

/// Rich message content for chat surfaces that support embeds
#[derive(Clone, Debug)]
pub enum RichContent {
    /// Playback started on a new track
    NowPlaying { track: Track },

    /// Track added to the queue
    TrackEnqueued { track: Track, position: usize },

    /// Queue exhausted, session is about to end
    QueueEnded,

    /// Autoplay search produced nothing usable
    AutoplayFailed { detail: String },

    /// Snapshot of now playing + upcoming tracks
    QueueListing {
        now_playing: Option<Track>,
        upcoming: Vec<Track>,
    },

    /// Playback stopped and session torn down
    Stopped,

    /// Generic playback error
    Error { message: String },
}

/// Platform-agnostic notification. Delivery is fire-and-forget; the chat
/// layer swallows its own failures.
#[derive(Clone, Debug)]
pub enum MessageAction {
    Send {
        /// Plain text fallback
        text: String,
        /// Optional rich content for platforms with embeds
        rich: Option<RichContent>,
    },
}

impl MessageAction {
    pub fn say(text: impl Into<String>) -> Self {
        MessageAction::Send {
            text: text.into(),
            rich: None,
        }
    }

    pub fn rich(text: impl Into<String>, rich: RichContent) -> Self {
        MessageAction::Send {
            text: text.into(),
            rich: Some(rich),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        MessageAction::Send {
            text: msg.clone(),
            rich: Some(RichContent::Error { message: msg }),
        }
    }
}
