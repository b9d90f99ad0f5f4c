//! Test infrastructure for tunebot integration tests.
//!
//! Provides mock tracks, a scriptable search source and event collection
//! helpers for testing the player without a real node.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tunebot::engine::EngineAction;
use tunebot::event::{Event, Subscriber};
use tunebot::message::{MessageAction, RichContent};
use tunebot::source::{SearchError, SearchSource};
use tunebot::track::Track;

/// Creates a mock track, long enough to be autoplay-eligible.
pub fn mock_track(id: &str) -> Track {
    mock_track_with_length(id, 180_000)
}

/// Creates a mock track with a custom length.
pub fn mock_track_with_length(id: &str, length_ms: u64) -> Track {
    Track {
        identifier: id.to_string(),
        author: format!("Artist {id}"),
        title: format!("Track {id}"),
        uri: format!("https://youtu.be/{id}"),
        length_ms,
        is_stream: false,
        source: "youtube".to_string(),
    }
}

/// Creates a mock livestream track.
pub fn mock_stream(id: &str) -> Track {
    let mut track = mock_track_with_length(id, 0);
    track.is_stream = true;
    track
}

/// Scriptable search source: returns queued responses in order and records
/// every query it receives. Once the script runs out it returns empty
/// result lists.
pub struct MockSearch {
    responses: Mutex<VecDeque<Result<Vec<Track>, SearchError>>>,
    queries: Mutex<Vec<String>>,
    /// Delay applied to every search, for exercising in-flight behavior
    pub delay: Duration,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_responses(
        responses: impl IntoIterator<Item = Result<Vec<Track>, SearchError>>,
    ) -> Self {
        let mock = Self::new();
        mock.responses.lock().unwrap().extend(responses);
        mock
    }

    pub fn push_response(&self, response: Result<Vec<Track>, SearchError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchSource for MockSearch {
    async fn search(&self, query: &str) -> Result<Vec<Track>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(vec![]))
    }
}

/// Collects all events from a subscriber within a timeout period.
/// Returns events in the order they were received.
pub async fn collect_events(subscriber: &mut Subscriber, timeout: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match subscriber.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) => {
                if tokio::time::Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(TryRecvError::Lagged(n)) => {
                eprintln!("Warning: subscriber lagged, missed {n} events");
            }
            Err(TryRecvError::Closed) => break,
        }
    }

    events
}

/// Waits for a specific type of event within a timeout.
pub async fn wait_for_event<F>(
    subscriber: &mut Subscriber,
    timeout: Duration,
    matches: F,
) -> Option<Event>
where
    F: Fn(&Event) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match subscriber.try_recv() {
            Ok(event) if matches(&event) => return Some(event),
            Ok(_) => continue,
            Err(TryRecvError::Empty) => {
                if tokio::time::Instant::now() >= deadline {
                    return None;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Closed) => return None,
        }
    }
}

/// Filters engine events.
pub fn filter_engine_events(events: &[Event]) -> Vec<&EngineAction> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Engine(action) => Some(action),
            _ => None,
        })
        .collect()
}

/// Filters message (notification) events.
pub fn filter_message_events(events: &[Event]) -> Vec<&MessageAction> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Message(action) => Some(action),
            _ => None,
        })
        .collect()
}

/// Tracks the engine was told to play, in order.
pub fn played_tracks(events: &[Event]) -> Vec<Track> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Engine(EngineAction::Play { track, .. }) => Some(track.clone()),
            _ => None,
        })
        .collect()
}

/// Number of disconnects the engine received.
pub fn disconnect_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Engine(EngineAction::Disconnect { .. })))
        .count()
}

/// Checks if any notification carries the given rich content variant.
pub fn has_queue_ended(events: &[Event]) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::Message(MessageAction::Send {
                rich: Some(RichContent::QueueEnded),
                ..
            })
        )
    })
}

/// Extracts autoplay failure diagnostics from notifications.
pub fn autoplay_failures(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Message(MessageAction::Send {
                rich: Some(RichContent::AutoplayFailed { detail }),
                ..
            }) => Some(detail.clone()),
            _ => None,
        })
        .collect()
}
