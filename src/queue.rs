use crate::bounded::BoundedDeque;
use crate::track::{LoopMode, Track};
use rand::Rng;
use std::collections::VecDeque;

/// How many finished tracks we remember for rewind and playlist recycling
pub const HISTORY_CAPACITY: usize = 45;

/// How many autoplay search results we buffer before searching again
pub const FALLBACK_CAPACITY: usize = 25;

/// Per-session playlist state: what played, what is playing, what is queued.
///
/// Pure data and transition logic. Starting/stopping actual playback is the
/// player's job; the queue only tracks identity. Every operation is total,
/// an empty queue is a valid state and never an error.
pub struct Queue {
    current: Option<Track>,
    pending: VecDeque<Track>,
    history: BoundedDeque<Track>,
    fallback: BoundedDeque<Track>,
    pub loop_mode: LoopMode,
    /// Recycle history into pending on exhaustion even outside Playlist mode
    pub keep_connected: bool,
    pub shuffle: bool,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            current: None,
            pending: VecDeque::new(),
            history: BoundedDeque::new(HISTORY_CAPACITY),
            fallback: BoundedDeque::new(FALLBACK_CAPACITY),
            loop_mode: LoopMode::Off,
            keep_connected: false,
            shuffle: false,
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Snapshot of the pending list, for queue listings
    pub fn upcoming(&self) -> Vec<Track> {
        self.pending.iter().cloned().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }

    /// Most-recent-first view of the play history, for autoplay seeding
    pub fn history_newest_first(&self) -> impl Iterator<Item = &Track> {
        self.history.iter().rev()
    }

    /// Buffered autoplay results, oldest first
    pub fn fallback_iter(&self) -> impl Iterator<Item = &Track> {
        self.fallback.iter()
    }

    /// Picks the next track to play, or `None` if nothing is left.
    ///
    /// In `Song` loop mode this is a no-op returning the unchanged current
    /// track; the same track is considered to restart. Otherwise the
    /// finished track moves to the history tail, history is recycled into
    /// pending when playlist-looping (or keep-connected) finds the pending
    /// list empty, and the replacement comes from pending first, then from
    /// the autoplay fallback buffer.
    pub fn advance(&mut self) -> Option<Track> {
        if self.loop_mode == LoopMode::Song {
            return self.current.clone();
        }

        if let Some(finished) = self.current.take() {
            self.history.push_back(finished);
        }

        let recycle = self.loop_mode == LoopMode::Playlist || self.keep_connected;
        if recycle && self.pending.is_empty() {
            self.pending.extend(self.history.drain());
        }

        if !self.pending.is_empty() {
            let track = if self.shuffle {
                let index = rand::rng().random_range(0..self.pending.len());
                self.pending.remove(index)
            } else {
                self.pending.pop_front()
            };
            self.current = track;
            return self.current.clone();
        }

        if let Some(track) = self.fallback.pop_front() {
            self.current = Some(track);
        }

        self.current.clone()
    }

    /// Steps back to the most recently finished track, or `None` if the
    /// history is empty. The interrupted current track is put at the front
    /// of pending so it plays again right after.
    pub fn rewind(&mut self) -> Option<Track> {
        if self.history.is_empty() {
            return None;
        }

        if let Some(interrupted) = self.current.take() {
            self.pending.push_front(interrupted);
        }

        self.current = self.history.pop_back();
        self.current.clone()
    }

    /// Appends a track to pending. When playlist-looping with an empty
    /// pending list the track goes to the front instead, so a fresh loop
    /// doesn't need a full cycle before it plays.
    pub fn enqueue(&mut self, track: Track) {
        if self.loop_mode == LoopMode::Playlist && self.pending.is_empty() {
            self.pending.push_front(track);
        } else {
            self.pending.push_back(track);
        }
    }

    /// Empties the pending list only; history, fallback, the current track
    /// and mode flags are untouched.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drops every track the queue holds. Used on session teardown.
    pub fn reset(&mut self) {
        self.current = None;
        self.pending.clear();
        self.history.clear();
        self.fallback.clear();
    }

    /// Promotes the front of the fallback buffer to the current track.
    pub fn pop_fallback(&mut self) -> Option<Track> {
        let track = self.fallback.pop_front()?;
        if let Some(finished) = self.current.take() {
            self.history.push_back(finished);
        }
        self.current = Some(track.clone());
        Some(track)
    }

    /// Appends autoplay search results, respecting the fallback capacity.
    pub fn buffer_fallback<I: IntoIterator<Item = Track>>(&mut self, tracks: I) {
        self.fallback.extend(tracks);
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
