pub mod asteroid;
pub mod constants;
pub mod debris;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod pool;
pub mod rng;
pub mod saucer;
pub mod ship;
pub mod sim;
pub mod sprite;

pub use error::{ConfigError, RuleCode};
pub use events::{AudioCue, GameEvent};
pub use geometry::FieldSize;
pub use input::{Command, Control};
pub use rng::{RandomSource, SeededRng, SequenceRng};
pub use sim::{
    replay, replay_strict, replay_with_checkpoints, Game, ReplayCheckpoint, ReplayResult,
    TickViolation, TimedCommand, WorldSnapshot,
};
