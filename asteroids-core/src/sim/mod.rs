use serde::{Deserialize, Serialize};

use crate::error::RuleCode;
use crate::geometry::{FieldSize, Point, Polygon};
use crate::input::Command;

mod game;

pub use game::Game;

/// Audio asset loading as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingProgress {
    pub loaded: u32,
    pub total: u32,
}

impl LoadingProgress {
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// A command scheduled before the given host tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub tick: u32,
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub frame_count: u32,
    pub final_score: u32,
    pub high_score: u32,
    pub ships_left: i32,
    pub playing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayCheckpoint {
    pub frame_count: u32,
    pub score: u32,
    pub ships_left: i32,
    pub asteroids_left: i32,
    pub asteroid_speed: f64,
    pub bullets: usize,
    pub debris: usize,
    pub saucer_active: bool,
    pub missile_active: bool,
    pub ship_active: bool,
    pub ship_x: f64,
    pub ship_y: f64,
    pub ship_angle: f64,
    pub ship_hyper_counter: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickViolation {
    pub frame_count: u32,
    pub rule: RuleCode,
}

impl std::fmt::Display for TickViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule violation at frame {}: {}", self.frame_count, self.rule)
    }
}

impl std::error::Error for TickViolation {}

/// One drawable entity as the presentation layer sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub angle: f64,
    pub polygon: Polygon,
    pub intensity: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub field: FieldSize,
    pub score: u32,
    pub high_score: u32,
    pub ships_left: i32,
    pub playing: bool,
    pub paused: bool,
    pub muted: bool,
    pub detail: bool,
    pub loading: LoadingProgress,
    pub asteroids_left: i32,
    pub asteroid_speed: f64,
    pub ship: Option<BodySnapshot>,
    pub ship_hyper_counter: i32,
    pub forward_flame: Option<Polygon>,
    pub reverse_flame: Option<Polygon>,
    pub bullets: Vec<BodySnapshot>,
    pub asteroids: Vec<BodySnapshot>,
    pub saucer: Option<BodySnapshot>,
    pub missile: Option<BodySnapshot>,
    pub debris: Vec<BodySnapshot>,
    pub stars: Vec<Point>,
}

/// Stable ordering: by tick, keeping submission order within a tick.
fn sorted_commands(commands: &[TimedCommand]) -> Vec<TimedCommand> {
    let mut sorted = commands.to_vec();
    sorted.sort_by_key(|entry| entry.tick);
    sorted
}

fn apply_due<R: crate::rng::RandomSource>(
    game: &mut Game<R>,
    commands: &[TimedCommand],
    cursor: &mut usize,
    tick: u32,
) {
    while let Some(entry) = commands.get(*cursor) {
        if entry.tick > tick {
            break;
        }
        game.apply(entry.command);
        *cursor += 1;
    }
}

pub fn replay(field: FieldSize, seed: u32, commands: &[TimedCommand], ticks: u32) -> ReplayResult {
    let mut game = Game::new(field, seed);
    let commands = sorted_commands(commands);
    let mut cursor = 0;

    for tick in 0..ticks {
        apply_due(&mut game, &commands, &mut cursor, tick);
        game.step();
    }

    game.result()
}

pub fn replay_strict(
    field: FieldSize,
    seed: u32,
    commands: &[TimedCommand],
    ticks: u32,
) -> Result<ReplayResult, TickViolation> {
    let mut game = Game::new(field, seed);
    game.validate_invariants().map_err(|rule| TickViolation {
        frame_count: game.frame_count(),
        rule,
    })?;

    let commands = sorted_commands(commands);
    let mut cursor = 0;
    for tick in 0..ticks {
        apply_due(&mut game, &commands, &mut cursor, tick);
        game.step_checked()?;
    }

    Ok(game.result())
}

pub fn replay_with_checkpoints(
    field: FieldSize,
    seed: u32,
    commands: &[TimedCommand],
    ticks: u32,
    interval: u32,
) -> Vec<ReplayCheckpoint> {
    let interval = interval.max(1);
    let mut game = Game::new(field, seed);
    let commands = sorted_commands(commands);
    let mut cursor = 0;
    let mut checkpoints = Vec::with_capacity((ticks / interval) as usize + 2);
    checkpoints.push(game.checkpoint());

    for tick in 0..ticks {
        apply_due(&mut game, &commands, &mut cursor, tick);
        game.step();
        if (tick + 1) % interval == 0 {
            checkpoints.push(game.checkpoint());
        }
    }

    if ticks % interval != 0 {
        checkpoints.push(game.checkpoint());
    }

    checkpoints
}
