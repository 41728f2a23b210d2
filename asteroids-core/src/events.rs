//! Audio events
//!
//! The simulation never plays sound itself. It queues cues for the host to
//! drain between ticks.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Fire,
    /// An asteroid broke apart.
    ExplosionSmall,
    /// The ship, saucer or missile was destroyed.
    ExplosionLarge,
    Warp,
    SaucerLoopStart,
    SaucerLoopStop,
    ThrusterLoopStart,
    ThrusterLoopStop,
    MissileLoopStart,
    MissileLoopStop,
}

impl AudioCue {
    /// Loop stops are always delivered so a muted host can silence clips
    /// that were started before muting.
    pub fn is_stop(self) -> bool {
        matches!(
            self,
            Self::SaucerLoopStop | Self::ThrusterLoopStop | Self::MissileLoopStop
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::ExplosionSmall => "explosion_small",
            Self::ExplosionLarge => "explosion_large",
            Self::Warp => "warp",
            Self::SaucerLoopStart => "saucer_loop_start",
            Self::SaucerLoopStop => "saucer_loop_stop",
            Self::ThrusterLoopStart => "thruster_loop_start",
            Self::ThrusterLoopStop => "thruster_loop_stop",
            Self::MissileLoopStart => "missile_loop_start",
            Self::MissileLoopStop => "missile_loop_stop",
        }
    }
}

/// A cue stamped with the tick it was raised on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub tick: u32,
    pub cue: AudioCue,
}

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, tick: u32, cue: AudioCue) {
        self.events.push(GameEvent { tick, cue });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}
