//! Line-based command input for driving a session from a terminal.
//!
//! This stands in for a chat-platform command surface during local runs.

use crate::event::{Event, EventBus};
use crate::player::PlayerAction;
use crate::source::SearchSource;
use crate::track::LoopMode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP_TEXT: &str = r#"
Commands:
  play <query>       search and enqueue the first match
  next               skip to the next track
  prev               go back to the previous track
  pause / resume     pause or resume playback
  queue              list now playing + upcoming
  clear              remove all pending tracks
  loop <off|song|playlist>
  shuffle <on|off>
  autoplay <on|off>
  keep <on|off>      keep-connected toggle
  stop               stop playback and disconnect
"#;

pub fn start(bus: &EventBus, search: Arc<dyn SearchSource>) {
    let bus = bus.clone();
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (command, rest) = match line.split_once(' ') {
                Some((command, rest)) => (command, rest.trim()),
                None => (line, ""),
            };

            match command {
                "play" if !rest.is_empty() => {
                    match search.search(rest).await {
                        Ok(tracks) => match tracks.into_iter().next() {
                            Some(track) => {
                                bus.send(Event::Player(PlayerAction::Enqueue { track }));
                            }
                            None => println!("No results for {rest:?}"),
                        },
                        Err(e) => error!("Search failed: {e}"),
                    }
                }
                "play" => println!("Usage: play <query>"),
                "next" => bus.send(Event::Player(PlayerAction::Next)),
                "prev" => bus.send(Event::Player(PlayerAction::Prev)),
                "pause" => bus.send(Event::Player(PlayerAction::Pause)),
                "resume" => bus.send(Event::Player(PlayerAction::Resume)),
                "queue" => bus.send(Event::Player(PlayerAction::ListQueue)),
                "clear" => bus.send(Event::Player(PlayerAction::ClearQueue)),
                "stop" => bus.send(Event::Player(PlayerAction::Stop)),
                "loop" => match LoopMode::parse(rest) {
                    Some(mode) => bus.send(Event::Player(PlayerAction::SetLoop { mode })),
                    None => println!("Usage: loop <off|song|playlist>"),
                },
                "shuffle" => match parse_toggle(rest) {
                    Some(enabled) => {
                        bus.send(Event::Player(PlayerAction::SetShuffle { enabled }))
                    }
                    None => println!("Usage: shuffle <on|off>"),
                },
                "autoplay" => match parse_toggle(rest) {
                    Some(enabled) => {
                        bus.send(Event::Player(PlayerAction::SetAutoplay { enabled }))
                    }
                    None => println!("Usage: autoplay <on|off>"),
                },
                "keep" => match parse_toggle(rest) {
                    Some(enabled) => {
                        bus.send(Event::Player(PlayerAction::SetKeepConnected { enabled }))
                    }
                    None => println!("Usage: keep <on|off>"),
                },
                "help" => println!("{HELP_TEXT}"),
                _ => println!("Unknown command {command:?}, try \"help\""),
            }
        }
    });
}

fn parse_toggle(s: &str) -> Option<bool> {
    match s {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}
