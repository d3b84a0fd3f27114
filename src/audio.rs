//! Audio command channel
//!
//! The core never touches an audio API. It queues `AudioCommand`s that the
//! host's music player drains and executes; a host without audio can simply
//! drop them.

use serde::{Deserialize, Serialize};

/// Music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    /// Menu and game-over music
    Intro,
    /// In-game music
    Gameplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCommand {
    /// Start looping a track, replacing whatever is playing
    PlayTrack(Track),
    /// Silence music entirely
    Stop,
    SetMuted(bool),
}

/// Outgoing audio queue
#[derive(Debug, Clone, Default)]
pub struct AudioChannel {
    queue: Vec<AudioCommand>,
    current: Option<Track>,
    muted: bool,
}

impl AudioChannel {
    pub fn new(muted: bool) -> Self {
        Self {
            queue: vec![AudioCommand::SetMuted(muted)],
            current: None,
            muted,
        }
    }

    /// Request a track; no-op if it is already playing
    pub fn play(&mut self, track: Track) {
        if self.current == Some(track) {
            return;
        }
        log::debug!("Music -> {track:?}");
        self.current = Some(track);
        self.queue.push(AudioCommand::PlayTrack(track));
    }

    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            self.queue.push(AudioCommand::Stop);
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.queue.push(AudioCommand::SetMuted(muted));
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn current(&self) -> Option<Track> {
        self.current
    }

    /// Take every queued command, oldest first
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.queue)
    }
}
