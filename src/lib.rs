//! tunebot library crate
//!
//! Playback queue and autoplay engine for a music bot. This module exposes
//! internal types for integration testing. The main binary is in main.rs.

#[macro_use]
extern crate log;

pub mod bounded;
pub mod config;
pub mod engine;
pub mod event;
pub mod message;
pub mod player;
pub mod query;
pub mod queue;
pub mod source;
pub mod stdin;
pub mod track;
