use anyhow::{anyhow, Context, Result};
use asteroids_core::{replay_strict, replay_with_checkpoints, FieldSize};
use autopilot::benchmark::{resolve_pilots, run_benchmark, BenchmarkConfig, Objective};
use autopilot::pilot::{create_pilot, describe_pilots, pilot_ids};
use autopilot::runner::{read_script, run_pilot, write_json, RunConfig};
use autopilot::util::{parse_field, parse_seed, resolve_seeds, seed_to_hex, timestamp_suffix};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autopilot")]
#[command(about = "Deterministic asteroids runs driven by scripted pilots")]
struct Cli {
    /// Playfield as WIDTHxHEIGHT
    #[arg(long, global = true)]
    field: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available pilots
    ListPilots,
    /// Fly one pilot on one seed and record the command script
    Run {
        #[arg(long)]
        pilot: String,
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 18_000)]
        max_ticks: u32,
        /// Validate invariants every tick and re-verify the script afterwards
        #[arg(long)]
        strict: bool,
        /// Pace the run at the game's frame rate
        #[arg(long)]
        realtime: bool,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write the final world snapshot as JSON
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },
    /// Replay a recorded script under invariant checks
    Replay {
        #[arg(long)]
        input: PathBuf,
        /// Print a checkpoint every N ticks
        #[arg(long)]
        checkpoint_every: Option<u32>,
    },
    /// Run a multi-seed benchmark across one or more pilots
    Benchmark {
        #[arg(long)]
        pilots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 18_000)]
        max_ticks: u32,
        #[arg(long, value_enum, default_value_t = CliObjective::Score)]
        objective: CliObjective,
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Score,
    Survival,
    Hybrid,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Score => Objective::Score,
            CliObjective::Survival => Objective::Survival,
            CliObjective::Hybrid => Objective::Hybrid,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { field, command } = Cli::parse();
    let field = match field.as_deref() {
        Some(raw) => parse_field(raw)?,
        None => FieldSize::default(),
    };

    match command {
        Commands::ListPilots => {
            for (id, description) in describe_pilots() {
                println!("{id:12} {description}");
            }
        }
        Commands::Run {
            pilot,
            seed,
            max_ticks,
            strict,
            realtime,
            output,
            snapshot_out,
        } => {
            if create_pilot(&pilot).is_none() {
                let available = pilot_ids().join(", ");
                return Err(anyhow!("unknown pilot '{pilot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let artifact = run_pilot(&RunConfig {
                pilot: pilot.clone(),
                seed,
                field,
                max_ticks,
                strict,
                realtime,
            })?;
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "runs/{}-{}-score{}-ticks{}.json",
                    pilot,
                    seed_to_hex(seed).replace("0x", "seed"),
                    artifact.metrics.final_score,
                    artifact.metrics.ticks
                ))
            });
            write_json(&output_path, &artifact.script)?;
            if let Some(path) = snapshot_out {
                write_json(&path, &artifact.snapshot)?;
                println!("snapshot={}", path.display());
            }

            let metrics = &artifact.metrics;
            println!("pilot={}", metrics.pilot_id);
            println!("seed={}", seed_to_hex(seed));
            println!("field={}x{}", metrics.field_width, metrics.field_height);
            println!("ticks={}", metrics.ticks);
            println!("frames={}", metrics.frame_count);
            println!("score={}", metrics.final_score);
            println!("high_score={}", metrics.high_score);
            println!("ships_left={}", metrics.final_ships_left);
            println!("game_over={}", metrics.game_over);
            println!("rng={:#010x}", metrics.final_rng_state);
            println!("commands={}", metrics.command_count);
            println!("output={}", output_path.display());
        }
        Commands::Replay {
            input,
            checkpoint_every,
        } => {
            let script = read_script(&input)?;
            let result = replay_strict(script.field, script.seed, &script.commands, script.ticks)
                .with_context(|| format!("replay of {} failed", input.display()))?;
            println!("input={}", input.display());
            println!("seed={}", seed_to_hex(script.seed));
            println!("ticks={}", script.ticks);
            println!("frames={}", result.frame_count);
            println!("score={}", result.final_score);
            println!("high_score={}", result.high_score);
            println!("ships_left={}", result.ships_left);
            println!("playing={}", result.playing);

            if let Some(interval) = checkpoint_every {
                if interval == 0 {
                    return Err(anyhow!("--checkpoint-every must be >= 1"));
                }
                let checkpoints = replay_with_checkpoints(
                    script.field,
                    script.seed,
                    &script.commands,
                    script.ticks,
                    interval,
                );
                for cp in checkpoints {
                    println!(
                        "  frame={} score={} ships={} asteroids={} speed={:.1} ship=({:.1},{:.1})",
                        cp.frame_count,
                        cp.score,
                        cp.ships_left,
                        cp.asteroids_left,
                        cp.asteroid_speed,
                        cp.ship_x,
                        cp.ship_y,
                    );
                }
            }
        }
        Commands::Benchmark {
            pilots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            objective,
            strict,
            out_dir,
            save_top,
            jobs,
        } => {
            let pilots = resolve_pilots(pilots.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let objective: Objective = objective.into();
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "benchmarks/{}-{}",
                    objective.as_str(),
                    timestamp_suffix()
                ))
            });

            let report = run_benchmark(BenchmarkConfig {
                pilots,
                seeds,
                field,
                max_ticks,
                objective,
                strict,
                out_dir: out_dir.clone(),
                save_top,
                jobs,
            })?;

            println!("objective={}", objective.as_str());
            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("pilot rankings:");
            for (idx, pilot) in report.pilot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  objective={:.2} avg_score={:.1} avg_frames={:.1} avg_fire={:.1} survival={:.0}%",
                    idx + 1,
                    pilot.pilot_id,
                    pilot.objective_value,
                    pilot.avg_score,
                    pilot.avg_frames,
                    pilot.avg_fire_commands,
                    pilot.survival_rate * 100.0,
                );
            }
            for script in &report.saved_scripts {
                println!(
                    "  [#{:02}] {} {} score={} frames={} {}",
                    script.rank,
                    script.pilot_id,
                    script.seed_hex,
                    script.score,
                    script.frames,
                    script.path,
                );
            }
        }
    }

    Ok(())
}
