use crate::pilot::{create_pilot, Pilot};
use anyhow::{anyhow, Context, Result};
use asteroids_core::constants::FRAME_DELAY_MS;
use asteroids_core::sim::{replay_strict, ReplayResult, WorldSnapshot};
use asteroids_core::{AudioCue, Command, FieldSize, Game, TimedCommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub pilot: String,
    pub seed: u32,
    pub field: FieldSize,
    pub max_ticks: u32,
    /// Check invariants after every tick and re-verify the recorded script.
    pub strict: bool,
    /// Pace ticks at the wall-clock frame rate instead of running flat out.
    pub realtime: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub pilot_id: String,
    pub seed: u32,
    pub field_width: i32,
    pub field_height: i32,
    pub max_ticks: u32,
    pub ticks: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub high_score: u32,
    pub final_ships_left: i32,
    pub final_rng_state: u32,
    pub game_over: bool,
    pub command_count: u32,
    pub fire_commands: u32,
    pub hyperspace_commands: u32,
    pub small_explosions: u32,
    pub large_explosions: u32,
}

/// A recorded run: enough to replay it exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunScript {
    pub seed: u32,
    pub field: FieldSize,
    pub ticks: u32,
    pub commands: Vec<TimedCommand>,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub script: RunScript,
    pub snapshot: WorldSnapshot,
}

pub fn run_pilot(config: &RunConfig) -> Result<RunArtifact> {
    let mut pilot =
        create_pilot(&config.pilot).ok_or_else(|| anyhow!("unknown pilot '{}'", config.pilot))?;
    run_pilot_instance(pilot.as_mut(), config)
}

pub fn run_pilot_instance(pilot: &mut dyn Pilot, config: &RunConfig) -> Result<RunArtifact> {
    if config.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    pilot.reset(config.seed);
    let mut game = Game::new(config.field, config.seed);
    game.validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let frame_delay = Duration::from_millis(FRAME_DELAY_MS);
    let mut deadline = Instant::now() + frame_delay;
    let mut commands = Vec::new();
    let mut counters = CueCounters::default();
    let mut session_started = false;
    let mut ticks = 0;

    while ticks < config.max_ticks {
        let snapshot = game.snapshot();
        if session_started && !snapshot.playing {
            break;
        }

        for command in pilot.next_commands(&snapshot) {
            game.apply(command);
            commands.push(TimedCommand {
                tick: ticks,
                command,
            });
        }
        if !session_started && game.is_playing() {
            session_started = true;
            tracing::debug!(tick = ticks, seed = config.seed, "session started");
        }

        if config.strict {
            game.step_checked()
                .with_context(|| format!("pilot {} seed {:#x}", pilot.id(), config.seed))?;
        } else {
            game.step();
        }
        ticks += 1;

        for event in game.drain_events() {
            counters.record(event.cue);
            tracing::trace!(tick = event.tick, cue = event.cue.as_str(), "audio cue");
        }

        if config.realtime {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            deadline += frame_delay;
        }
    }

    let result = game.result();
    tracing::debug!(
        pilot = pilot.id(),
        seed = config.seed,
        ticks,
        score = result.final_score,
        ships_left = result.ships_left,
        "run finished"
    );

    let script = RunScript {
        seed: config.seed,
        field: config.field,
        ticks,
        commands,
    };
    if config.strict {
        verify_script(&script, &result)?;
    }

    let count = |wanted: Command| script.commands.iter().filter(|c| c.command == wanted).count() as u32;
    let metrics = RunMetrics {
        pilot_id: pilot.id().to_string(),
        seed: config.seed,
        field_width: config.field.width(),
        field_height: config.field.height(),
        max_ticks: config.max_ticks,
        ticks,
        frame_count: result.frame_count,
        final_score: result.final_score,
        high_score: result.high_score,
        final_ships_left: result.ships_left,
        final_rng_state: game.rng_state(),
        game_over: session_started && !result.playing,
        command_count: script.commands.len() as u32,
        fire_commands: count(Command::Fire),
        hyperspace_commands: count(Command::Hyperspace),
        small_explosions: counters.small,
        large_explosions: counters.large,
    };

    Ok(RunArtifact {
        metrics,
        snapshot: game.snapshot(),
        script,
    })
}

/// Replays `script` under invariant checks and requires the same outcome.
pub fn verify_script(script: &RunScript, expected: &ReplayResult) -> Result<()> {
    let replayed = replay_strict(script.field, script.seed, &script.commands, script.ticks)
        .map_err(|violation| anyhow!("recorded script failed strict replay: {violation}"))?;
    if replayed != *expected {
        return Err(anyhow!(
            "replay diverged: expected {expected:?}, got {replayed:?}"
        ));
    }
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(value).context("failed to serialize json")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}

pub fn read_script(path: &Path) -> Result<RunScript> {
    let data =
        fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("invalid run script {}", path.display()))
}

#[derive(Clone, Copy, Debug, Default)]
struct CueCounters {
    small: u32,
    large: u32,
}

impl CueCounters {
    fn record(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::ExplosionSmall => self.small += 1,
            AudioCue::ExplosionLarge => self.large += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pilot: &str, seed: u32, max_ticks: u32) -> RunConfig {
        RunConfig {
            pilot: pilot.to_string(),
            seed,
            field: FieldSize::default(),
            max_ticks,
            strict: true,
            realtime: false,
        }
    }

    #[test]
    fn zero_ticks_is_rejected() {
        assert!(run_pilot(&config("idle", 1, 0)).is_err());
    }

    #[test]
    fn unknown_pilot_is_rejected() {
        let err = run_pilot(&config("ghost", 1, 10)).expect_err("unknown pilot");
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn strict_run_records_a_replayable_script() {
        let artifact = run_pilot(&config("spinner", 0xA57E_0001, 1_500)).expect("run succeeds");
        let metrics = &artifact.metrics;
        assert!(metrics.ticks > 0 && metrics.ticks <= 1_500);
        assert!(metrics.fire_commands > 0);
        assert_eq!(artifact.script.commands[0].command, Command::StartSession);
        assert_eq!(artifact.snapshot.score, metrics.final_score);
    }

    #[test]
    fn same_seed_same_metrics() {
        let a = run_pilot(&config("hunter", 42, 2_000)).expect("run");
        let b = run_pilot(&config("hunter", 42, 2_000)).expect("run");
        assert_eq!(a.script, b.script);
        assert_eq!(a.metrics.final_score, b.metrics.final_score);
        assert_eq!(a.metrics.final_rng_state, b.metrics.final_rng_state);
    }

    #[test]
    fn diverging_result_fails_verification() {
        let artifact = run_pilot(&config("spinner", 7, 800)).expect("run");
        let script = &artifact.script;
        let honest = asteroids_core::replay(script.field, script.seed, &script.commands, script.ticks);
        verify_script(script, &honest).expect("honest result verifies");

        let inflated = ReplayResult {
            final_score: honest.final_score + 10,
            ..honest
        };
        assert!(verify_script(script, &inflated).is_err());
    }
}
