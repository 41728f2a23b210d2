use crate::pilot::pilot_ids;
use crate::runner::{run_pilot, write_json, RunConfig, RunMetrics, RunScript};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use asteroids_core::FieldSize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Score,
    Survival,
    Hybrid,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let score = f64::from(metrics.final_score);
        let frames = f64::from(metrics.frame_count);
        let ships = f64::from(metrics.final_ships_left.max(0));
        match self {
            Self::Score => score + frames * 0.08 + ships * 120.0,
            Self::Survival => frames + ships * 850.0 + score * 0.15,
            Self::Hybrid => score * 0.75 + frames * 0.55 + ships * 260.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Survival => "survival",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub field: FieldSize,
    pub max_ticks: u32,
    pub objective: Objective,
    pub strict: bool,
    pub out_dir: PathBuf,
    /// Number of best runs, by objective, whose scripts are saved.
    pub save_top: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub pilot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub ticks: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_ships_left: i32,
    pub game_over: bool,
    pub objective_value: f64,
    pub command_count: u32,
    pub fire_commands: u32,
    pub hyperspace_commands: u32,
    pub small_explosions: u32,
    pub large_explosions: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PilotAggregate {
    pub pilot_id: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub max_frames: u32,
    pub avg_ships_left: f64,
    pub min_ships_left: i32,
    pub survival_rate: f64,
    pub objective_value: f64,
    pub avg_fire_commands: f64,
    pub avg_hyperspace_commands: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedScriptRecord {
    pub rank: usize,
    pub pilot_id: String,
    pub seed_hex: String,
    pub score: u32,
    pub frames: u32,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub field_width: i32,
    pub field_height: i32,
    pub max_ticks: u32,
    pub jobs: Option<usize>,
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub pilot_rankings: Vec<PilotAggregate>,
    pub runs: Vec<RunRecord>,
    pub saved_scripts: Vec<SavedScriptRecord>,
}

struct InternalRun {
    metrics: RunMetrics,
    objective_value: f64,
    script: RunScript,
}

pub fn resolve_pilots(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(pilot_ids().iter().map(|id| (*id).to_string()).collect());
    };
    let pilots: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if pilots.is_empty() {
        return Err(anyhow!("--pilots resolved to empty list"));
    }
    if let Some(unknown) = pilots
        .iter()
        .find(|id| !pilot_ids().iter().any(|known| known == id))
    {
        return Err(anyhow!("unknown pilot '{unknown}'"));
    }
    Ok(pilots)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.pilots.is_empty() {
        return Err(anyhow!("benchmark requires at least one pilot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .pilots
        .iter()
        .flat_map(|pilot| config.seeds.iter().map(move |seed| (pilot.clone(), *seed)))
        .collect();
    tracing::info!(
        runs = run_jobs.len(),
        objective = config.objective.as_str(),
        "starting benchmark"
    );

    let run_one = |(pilot, seed): &(String, u32)| -> Result<InternalRun> {
        let run = RunConfig {
            pilot: pilot.clone(),
            seed: *seed,
            field: config.field,
            max_ticks: config.max_ticks,
            strict: config.strict,
            realtime: false,
        };
        let artifact = run_pilot(&run)
            .with_context(|| format!("benchmark run failed for pilot={pilot} seed={seed:#x}"))?;
        Ok(InternalRun {
            objective_value: config.objective.run_value(&artifact.metrics),
            metrics: artifact.metrics,
            script: artifact.script,
        })
    };

    let run_results: Vec<Result<InternalRun>> = match config.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("failed to build rayon threadpool")?;
            pool.install(|| run_jobs.par_iter().map(run_one).collect())
        }
        None => run_jobs.par_iter().map(run_one).collect(),
    };
    let runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;

    let rankings = rank_pilots(&runs, config.max_ticks);

    let mut run_records: Vec<RunRecord> = runs.iter().map(run_record).collect();
    run_records.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.final_score.cmp(&a.final_score))
            .then_with(|| b.frame_count.cmp(&a.frame_count))
    });

    let saved_scripts = save_top_scripts(&config.out_dir, &runs, config.save_top)?;

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        field_width: config.field.width(),
        field_height: config.field.height(),
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        pilots: config.pilots,
        seeds: config.seeds,
        run_count: run_records.len(),
        pilot_rankings: rankings,
        runs: run_records,
        saved_scripts,
    };
    write_json(&config.out_dir.join("summary.json"), &report)?;

    Ok(report)
}

fn run_record(run: &InternalRun) -> RunRecord {
    let m = &run.metrics;
    RunRecord {
        pilot_id: m.pilot_id.clone(),
        seed: m.seed,
        seed_hex: seed_to_hex(m.seed),
        ticks: m.ticks,
        frame_count: m.frame_count,
        final_score: m.final_score,
        final_ships_left: m.final_ships_left,
        game_over: m.game_over,
        objective_value: run.objective_value,
        command_count: m.command_count,
        fire_commands: m.fire_commands,
        hyperspace_commands: m.hyperspace_commands,
        small_explosions: m.small_explosions,
        large_explosions: m.large_explosions,
    }
}

fn rank_pilots(runs: &[InternalRun], max_ticks: u32) -> Vec<PilotAggregate> {
    let mut grouped: BTreeMap<&str, Vec<&InternalRun>> = BTreeMap::new();
    for run in runs {
        grouped.entry(&run.metrics.pilot_id).or_default().push(run);
    }

    let mut rankings: Vec<PilotAggregate> = grouped
        .into_iter()
        .map(|(pilot_id, pilot_runs)| {
            let n = pilot_runs.len() as f64;
            let avg = |value: fn(&InternalRun) -> f64| {
                pilot_runs.iter().map(|run| value(run)).sum::<f64>() / n
            };
            let survived = pilot_runs
                .iter()
                .filter(|run| !run.metrics.game_over && run.metrics.ticks >= max_ticks)
                .count();
            PilotAggregate {
                pilot_id: pilot_id.to_string(),
                runs: pilot_runs.len(),
                avg_score: avg(|run| f64::from(run.metrics.final_score)),
                max_score: pilot_runs
                    .iter()
                    .map(|run| run.metrics.final_score)
                    .max()
                    .unwrap_or_default(),
                avg_frames: avg(|run| f64::from(run.metrics.frame_count)),
                max_frames: pilot_runs
                    .iter()
                    .map(|run| run.metrics.frame_count)
                    .max()
                    .unwrap_or_default(),
                avg_ships_left: avg(|run| f64::from(run.metrics.final_ships_left)),
                min_ships_left: pilot_runs
                    .iter()
                    .map(|run| run.metrics.final_ships_left)
                    .min()
                    .unwrap_or_default(),
                survival_rate: survived as f64 / n,
                objective_value: avg(|run| run.objective_value),
                avg_fire_commands: avg(|run| f64::from(run.metrics.fire_commands)),
                avg_hyperspace_commands: avg(|run| f64::from(run.metrics.hyperspace_commands)),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| b.avg_frames.total_cmp(&a.avg_frames))
    });
    rankings
}

fn save_top_scripts(
    out_dir: &Path,
    runs: &[InternalRun],
    count: usize,
) -> Result<Vec<SavedScriptRecord>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut order: Vec<&InternalRun> = runs.iter().collect();
    order.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.metrics.final_score.cmp(&a.metrics.final_score))
    });

    let save_dir = out_dir.join("top-scripts");
    let mut saved = Vec::new();
    for (idx, run) in order.into_iter().take(count).enumerate() {
        let rank = idx + 1;
        let path = save_dir.join(format!(
            "rank{rank:02}-{}-seed{:08x}-score{}.json",
            run.metrics.pilot_id, run.metrics.seed, run.metrics.final_score
        ));
        write_json(&path, &run.script)?;
        saved.push(SavedScriptRecord {
            rank,
            pilot_id: run.metrics.pilot_id.clone(),
            seed_hex: seed_to_hex(run.metrics.seed),
            score: run.metrics.final_score,
            frames: run.metrics.frame_count,
            path: path.to_string_lossy().into_owned(),
        });
    }
    Ok(saved)
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "pilot_id,seed_hex,seed,ticks,frame_count,final_score,final_ships_left,game_over,objective_value,command_count,fire_commands,hyperspace_commands,small_explosions,large_explosions\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            row.pilot_id,
            row.seed_hex,
            row.seed,
            row.ticks,
            row.frame_count,
            row.final_score,
            row.final_ships_left,
            row.game_over,
            row.objective_value,
            row.command_count,
            row.fire_commands,
            row.hyperspace_commands,
            row.small_explosions,
            row.large_explosions
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[PilotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,pilot_id,runs,avg_score,max_score,avg_frames,max_frames,avg_ships_left,min_ships_left,survival_rate,objective_value,avg_fire_commands,avg_hyperspace_commands\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{},{:.2},{},{:.4},{:.4},{:.2},{:.2}\n",
            idx + 1,
            row.pilot_id,
            row.runs,
            row.avg_score,
            row.max_score,
            row.avg_frames,
            row.max_frames,
            row.avg_ships_left,
            row.min_ships_left,
            row.survival_rate,
            row.objective_value,
            row.avg_fire_commands,
            row.avg_hyperspace_commands
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pilot_list_is_every_pilot() {
        assert_eq!(resolve_pilots(None).unwrap().len(), pilot_ids().len());
        assert_eq!(
            resolve_pilots(Some(" hunter, ,idle")).unwrap(),
            vec!["hunter".to_string(), "idle".to_string()]
        );
        assert!(resolve_pilots(Some(",")).is_err());
        assert!(resolve_pilots(Some("hunter,ghost")).is_err());
    }

    #[test]
    fn objectives_reward_what_they_name() {
        let base = RunMetrics {
            pilot_id: "idle".into(),
            seed: 1,
            field_width: 1200,
            field_height: 800,
            max_ticks: 100,
            ticks: 100,
            frame_count: 100,
            final_score: 1_000,
            high_score: 1_000,
            final_ships_left: 2,
            final_rng_state: 0,
            game_over: false,
            command_count: 0,
            fire_commands: 0,
            hyperspace_commands: 0,
            small_explosions: 0,
            large_explosions: 0,
        };
        let scorer = RunMetrics {
            final_score: 2_000,
            ..base.clone()
        };
        let survivor = RunMetrics {
            frame_count: 2_000,
            ..base.clone()
        };
        assert!(Objective::Score.run_value(&scorer) > Objective::Score.run_value(&survivor));
        assert!(Objective::Survival.run_value(&survivor) > Objective::Survival.run_value(&scorer));
        assert_eq!(Objective::Hybrid.as_str(), "hybrid");
    }
}
