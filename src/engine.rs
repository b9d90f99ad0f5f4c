//! Playback-engine boundary.
//!
//! The player drives an external audio engine (a Lavalink-style node owns
//! decoding and streaming) by publishing these actions on the bus. For
//! local runs without a node, [`start`] consumes them and logs.

use crate::event::{Event, EventBus};
use crate::track::Track;

#[derive(Clone, Debug)]
pub enum EngineAction {
    /// Start playing a track, replacing whatever is loaded
    Play { track: Track, replace: bool },

    Pause,

    Resume,

    /// Stop playback without tearing down the session
    Stop,

    /// Tear down the voice session. Idempotent, safe when already gone.
    Disconnect { session_id: u64 },
}

/// Logging consumer for running without a real audio engine attached
pub fn start(bus: &EventBus) {
    let bus = bus.clone();
    tokio::spawn(async move {
        let mut rx = bus.subscribe();
        loop {
            if let Event::Engine(action) = rx.recv().await {
                match action {
                    EngineAction::Play { track, replace } => {
                        info!(
                            "Engine: play {} - {} ({}) replace={replace}",
                            track.author, track.title, track.uri
                        );
                    }
                    EngineAction::Pause => info!("Engine: pause"),
                    EngineAction::Resume => info!("Engine: resume"),
                    EngineAction::Stop => info!("Engine: stop"),
                    EngineAction::Disconnect { session_id } => {
                        info!("Engine: disconnect session {session_id}");
                    }
                }
            }
        }
    });
}
