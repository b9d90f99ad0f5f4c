use crate::engine::EngineAction;
use crate::event::{Event, EventBus};
use crate::message::{MessageAction, RichContent};
use crate::query::{quoted_author_query, QueryRegistry};
use crate::queue::Queue;
use crate::source::{SearchError, SearchSource};
use crate::track::{format_length, LoopMode, Track};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Most seed tracks considered per autoplay search
pub const MAX_SEED_CANDIDATES: usize = 5;

#[derive(Clone, Debug)]
pub enum PlayerAction {
    /// Add a track at the end of the queue
    Enqueue { track: Track },

    /// The engine reached the end of the current track
    TrackFinished,

    /// Skip to the next track
    Next,

    /// Go back to the previous track
    Prev,

    Pause,

    Resume,

    /// Stop playback, drop all queue state and disconnect
    Stop,

    /// Remove all pending tracks (history and current are untouched)
    ClearQueue,

    /// Report now playing + upcoming tracks
    ListQueue,

    SetLoop { mode: LoopMode },

    SetShuffle { enabled: bool },

    SetAutoplay { enabled: bool },

    SetKeepConnected { enabled: bool },

    /// Tear down the voice session
    Disconnect,
}

/// Drives one voice session's [`Queue`]: picks what plays next, refills the
/// queue from a similarity search when autoplay is enabled, and tells the
/// external engine and chat surface what happened.
///
/// All operations for a session run on a single task (see [`init`]), so no
/// two queue mutations ever interleave. The atomic flag additionally keeps
/// autoplay searches single-flight.
pub struct Player {
    bus: EventBus,
    pub queue: Queue,
    session_id: u64,
    pub autoplay_enabled: bool,
    paused: bool,
    connected: bool,
    search: Arc<dyn SearchSource>,
    queries: QueryRegistry,
    search_in_flight: Arc<AtomicBool>,
}

impl Player {
    pub fn new(bus: EventBus, search: Arc<dyn SearchSource>, session_id: u64) -> Self {
        Self {
            bus,
            queue: Queue::new(),
            session_id,
            autoplay_enabled: false,
            paused: false,
            connected: true,
            search,
            queries: QueryRegistry::with_defaults(),
            search_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub async fn enqueue(&mut self, track: Track) {
        if !self.connected {
            debug!("Ignoring enqueue, session {} is disconnected", self.session_id);
            return;
        }

        self.queue.enqueue(track.clone());
        let position = self.queue.pending_len();

        info!(
            "Enqueued track: {} - {} ({}), queue size: {}",
            track.author, track.title, track.identifier, position
        );

        self.bus.notify(MessageAction::rich(
            format!("Added {} - {} to the queue", track.author, track.title),
            RichContent::TrackEnqueued { track, position },
        ));

        if self.queue.current().is_none() {
            self.play_next().await;
        }
    }

    /// Advances the queue and starts the chosen track. When the queue is
    /// exhausted, either refills it via autoplay or ends the session.
    pub async fn play_next(&mut self) {
        if !self.connected {
            return;
        }

        let track = match self.queue.advance() {
            Some(track) => track,
            None if self.autoplay_enabled => {
                let refilled = self.refill_autoplay().await;

                // The session may have been torn down while the search was
                // in flight; a stale result must not restart playback.
                if !self.connected {
                    return;
                }

                match refilled {
                    Some(track) => track,
                    None => {
                        self.bus.notify(MessageAction::rich(
                            "Playback queue ended.",
                            RichContent::QueueEnded,
                        ));
                        self.disconnect();
                        return;
                    }
                }
            }
            None => {
                info!("Playback queue ended for session {}", self.session_id);
                self.bus.notify(MessageAction::rich(
                    "Playback queue ended.",
                    RichContent::QueueEnded,
                ));
                self.disconnect();
                return;
            }
        };

        self.play(track);
    }

    /// Rewinds to the most recently played track. Returns false when the
    /// history is empty; the queue is untouched and the chat surface gets
    /// an error in that case.
    pub async fn play_previous(&mut self) -> bool {
        if !self.connected {
            return false;
        }

        match self.queue.rewind() {
            Some(track) => {
                self.play(track);
                true
            }
            None => {
                debug!("No previous track in history");
                self.bus
                    .notify(MessageAction::error("There is no previous track."));
                false
            }
        }
    }

    /// Pops the autoplay buffer, searching the track source for tracks
    /// similar to the recent play history when the buffer is empty.
    ///
    /// At most one search per session runs at a time; a call that finds a
    /// search already in flight returns without starting another. On total
    /// search failure the chat surface gets a diagnostic and the caller is
    /// expected to disconnect. The next call starts a fresh attempt.
    pub async fn refill_autoplay(&mut self) -> Option<Track> {
        if let Some(track) = self.queue.pop_fallback() {
            return Some(track);
        }

        let seeds = self.seed_candidates();
        if seeds.is_empty() {
            debug!("No usable autoplay seeds, giving up without searching");
            return None;
        }

        if self
            .search_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Autoplay search already in flight, skipping");
            return None;
        }

        let outcome = self.search_similar(&seeds).await;
        self.search_in_flight.store(false, Ordering::Release);

        match outcome {
            Ok((results, producer)) => {
                let kept = filter_results(results, &seeds, &producer);
                debug!(
                    "Autoplay search for seed {} produced {} usable tracks",
                    producer.identifier,
                    kept.len()
                );
                self.queue.buffer_fallback(kept);
                self.queue.pop_fallback()
            }
            Err(detail) => {
                error!("Autoplay search failed for session {}: {detail}", self.session_id);
                self.bus.notify(MessageAction::rich(
                    format!("Could not fetch autoplay tracks: {detail}"),
                    RichContent::AutoplayFailed { detail },
                ));
                None
            }
        }
    }

    /// Recently played tracks eligible to seed a similarity search,
    /// newest first, capped at [`MAX_SEED_CANDIDATES`]
    fn seed_candidates(&self) -> Vec<Track> {
        self.queue
            .history_newest_first()
            .chain(self.queue.fallback_iter())
            .filter(|track| track.autoplay_eligible())
            .take(MAX_SEED_CANDIDATES)
            .cloned()
            .collect()
    }

    /// Runs the per-seed search loop. Returns the raw result list together
    /// with the seed that produced it, or a human-readable diagnostic when
    /// every seed failed.
    async fn search_similar(&self, seeds: &[Track]) -> Result<(Vec<Track>, Track), String> {
        let mut secondary: Vec<Track> = Vec::new();
        let mut secondary_seed: Option<Track> = None;
        let mut last_error: Option<SearchError> = None;

        for seed in seeds {
            let query = self.queries.build(seed);
            debug!("Autoplay query for seed {}: {query}", seed.identifier);

            match self.search.search(&query).await {
                Ok(tracks) => {
                    if !tracks.is_empty() {
                        return Ok((tracks, seed.clone()));
                    }
                    // An empty response still ends seed iteration; any
                    // captured author-search results get used below.
                    break;
                }
                Err(SearchError::MixUnavailable(msg)) => {
                    debug!("Mix lookup unsupported for seed {}: {msg}", seed.identifier);

                    match self.search.search(&quoted_author_query(seed)).await {
                        Ok(tracks) => {
                            secondary = tracks;
                            secondary_seed = Some(seed.clone());
                        }
                        Err(e) => last_error = Some(e),
                    }
                }
                Err(e) => {
                    warn!("Autoplay search error for seed {}: {e}", seed.identifier);
                    last_error = Some(e);
                }
            }
        }

        if !secondary.is_empty() {
            if let Some(seed) = secondary_seed {
                secondary.reverse();
                return Ok((secondary, seed));
            }
        }

        match last_error {
            Some(e) => Err(e.to_string()),
            None => Err("no results".to_string()),
        }
    }

    fn play(&mut self, track: Track) {
        info!(
            "Playing track: {} - {} ({})",
            track.author, track.title, track.identifier
        );

        self.paused = false;
        self.bus.send(Event::Engine(EngineAction::Play {
            track: track.clone(),
            replace: true,
        }));
        self.bus.notify(MessageAction::rich(
            format!("Now playing: {} - {}", track.author, track.title),
            RichContent::NowPlaying { track },
        ));
    }

    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        info!("Playback paused for session {}", self.session_id);
        self.paused = true;
        self.bus.send(Event::Engine(EngineAction::Pause));
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        info!("Playback resumed for session {}", self.session_id);
        self.paused = false;
        self.bus.send(Event::Engine(EngineAction::Resume));
    }

    /// Stops the engine, drops all queue state and tears down the session
    pub fn stop(&mut self) {
        self.queue.reset();
        self.bus.send(Event::Engine(EngineAction::Stop));
        self.bus.notify(MessageAction::rich(
            "Playback stopped.",
            RichContent::Stopped,
        ));
        self.disconnect();
    }

    pub fn clear_queue(&mut self) {
        let removed = self.queue.pending_len();
        self.queue.clear();
        info!("Cleared {removed} pending tracks");
        self.bus
            .notify(MessageAction::say(format!("Removed {removed} queued tracks.")));
    }

    /// Non-mutating snapshot of now playing + upcoming, for chat display
    pub fn list_queue(&self) {
        let now_playing = self.queue.current().cloned();
        let upcoming = self.queue.upcoming();

        let text = match &now_playing {
            Some(track) => format!(
                "Now playing: {} - {} [{}], {} queued",
                track.author,
                track.title,
                format_length(track.length_ms),
                upcoming.len()
            ),
            None => "Nothing is playing.".to_string(),
        };

        self.bus.notify(MessageAction::rich(
            text,
            RichContent::QueueListing {
                now_playing,
                upcoming,
            },
        ));
    }

    pub fn set_loop(&mut self, mode: LoopMode) {
        info!("Loop mode set to {mode:?} for session {}", self.session_id);
        self.queue.loop_mode = mode;
        self.bus
            .notify(MessageAction::say(format!("Loop mode: {mode:?}")));
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        info!("Shuffle set to {enabled} for session {}", self.session_id);
        self.queue.shuffle = enabled;
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        info!("Autoplay set to {enabled} for session {}", self.session_id);
        self.autoplay_enabled = enabled;
    }

    pub fn set_keep_connected(&mut self, enabled: bool) {
        info!(
            "Keep-connected set to {enabled} for session {}",
            self.session_id
        );
        self.queue.keep_connected = enabled;
    }

    /// Idempotent session teardown. The queue holds no identity beyond the
    /// session, so its contents are dropped with it.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }

        info!("Player disconnected from session {}", self.session_id);
        self.connected = false;
        self.queue.reset();
        self.bus.send(Event::Engine(EngineAction::Disconnect {
            session_id: self.session_id,
        }));
    }
}

/// Post-filters raw autoplay search results: no duplicates of any seed's
/// uri, nothing autoplay-ineligible (streams, short tracks), and never the
/// seed that produced the search.
fn filter_results(results: Vec<Track>, seeds: &[Track], producer: &Track) -> Vec<Track> {
    results
        .into_iter()
        .filter(|track| {
            !seeds
                .iter()
                .any(|seed| !seed.uri.is_empty() && track.uri.starts_with(&seed.uri))
        })
        .filter(|track| track.autoplay_eligible())
        .filter(|track| producer.identifier.is_empty() || track.identifier != producer.identifier)
        .collect()
}

/// Type alias for shared player state
pub type SharedPlayer = Arc<RwLock<Player>>;

pub fn init(bus: &EventBus, search: Arc<dyn SearchSource>, session_id: u64) -> SharedPlayer {
    let player = Arc::new(RwLock::new(Player::new(bus.clone(), search, session_id)));

    handle_incoming_event_loop(bus.clone(), player.clone());

    player
}

fn handle_incoming_event_loop(bus: EventBus, player: SharedPlayer) {
    tokio::spawn(async move {
        let mut bus_rx = bus.subscribe();

        loop {
            let event = bus_rx.recv().await;

            if let Event::Player(action) = event {
                // Handled inline rather than spawned: all operations for a
                // session must complete fully before the next one begins.
                handle_incoming_event(action, &player).await;
            }
        }
    });
}

async fn handle_incoming_event(action: PlayerAction, player: &SharedPlayer) {
    let mut player = player.write().await;
    match action {
        PlayerAction::Enqueue { track } => player.enqueue(track).await,
        PlayerAction::TrackFinished => {
            debug!("End of track signal received, advancing");
            player.play_next().await;
        }
        PlayerAction::Next => player.play_next().await,
        PlayerAction::Prev => {
            player.play_previous().await;
        }
        PlayerAction::Pause => player.pause(),
        PlayerAction::Resume => player.resume(),
        PlayerAction::Stop => player.stop(),
        PlayerAction::ClearQueue => player.clear_queue(),
        PlayerAction::ListQueue => player.list_queue(),
        PlayerAction::SetLoop { mode } => player.set_loop(mode),
        PlayerAction::SetShuffle { enabled } => player.set_shuffle(enabled),
        PlayerAction::SetAutoplay { enabled } => player.set_autoplay(enabled),
        PlayerAction::SetKeepConnected { enabled } => player.set_keep_connected(enabled),
        PlayerAction::Disconnect => player.disconnect(),
    }
}
