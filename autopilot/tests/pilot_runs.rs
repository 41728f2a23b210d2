use anyhow::Result;
use asteroids_core::{replay, FieldSize};
use autopilot::benchmark::{run_benchmark, BenchmarkConfig, Objective};
use autopilot::pilot::pilot_ids;
use autopilot::runner::{read_script, run_pilot, write_json, RunConfig};

fn strict_run(pilot: &str, seed: u32, max_ticks: u32) -> RunConfig {
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
fn all_pilots_survive_strict_runs_on_multiple_seeds() -> Result<()> {
    let seeds = [0xDEAD_BEEF, 0xC0FF_EE11, 0x1234_5678];
    for seed in seeds {
        for pilot in pilot_ids() {
            let artifact = run_pilot(&strict_run(pilot, seed, 1_200))?;
            assert!(artifact.metrics.ticks > 0, "pilot={pilot} seed={seed:#x}");
            assert_eq!(artifact.metrics.pilot_id, *pilot);
            assert_eq!(
                artifact.metrics.final_score, artifact.snapshot.score,
                "pilot={pilot} seed={seed:#x}"
            );
        }
    }
    Ok(())
}

#[test]
fn saved_script_replays_to_the_same_result() -> Result<()> {
    let artifact = run_pilot(&strict_run("hunter", 0xC0FF_EE11, 3_000))?;
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested").join("hunter.json");
    write_json(&path, &artifact.script)?;

    let script = read_script(&path)?;
    assert_eq!(script, artifact.script);

    let result = replay(script.field, script.seed, &script.commands, script.ticks);
    assert_eq!(result.final_score, artifact.metrics.final_score);
    assert_eq!(result.frame_count, artifact.metrics.frame_count);
    assert_eq!(result.ships_left, artifact.metrics.final_ships_left);
    Ok(())
}

#[test]
fn script_with_invalid_field_is_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("huge.json");
    std::fs::write(
        &path,
        r#"{"seed":1,"field":{"width":2000000001,"height":2000000001},"ticks":10,"commands":[]}"#,
    )?;

    let err = read_script(&path).expect_err("oversized field");
    assert!(format!("{err:#}").contains("field"), "{err:#}");
    Ok(())
}

#[test]
fn runs_on_a_small_field() -> Result<()> {
    let mut config = strict_run("spinner", 9, 2_000);
    config.field = FieldSize::new(320, 240)?;
    let artifact = run_pilot(&config)?;
    assert_eq!(artifact.metrics.field_width, 320);
    assert_eq!(artifact.snapshot.field, config.field);
    Ok(())
}

#[test]
fn benchmark_smoke_outputs_expected_metadata() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let report = run_benchmark(BenchmarkConfig {
        pilots: vec!["spinner".to_string(), "hunter".to_string()],
        seeds: vec![0xDEAD_BEEF, 0xC0FF_EE11],
        field: FieldSize::default(),
        max_ticks: 900,
        objective: Objective::Hybrid,
        strict: false,
        out_dir: tmp.path().to_path_buf(),
        save_top: 1,
        jobs: Some(2),
    })?;

    assert_eq!(report.run_count, 4);
    assert_eq!(report.pilot_rankings.len(), 2);
    assert_eq!(report.saved_scripts.len(), 1);
    assert!(tmp.path().join("summary.json").exists());
    assert!(tmp.path().join("runs.csv").exists());
    assert!(tmp.path().join("rankings.csv").exists());

    let saved = read_script(std::path::Path::new(&report.saved_scripts[0].path))?;
    assert!(report.seeds.contains(&saved.seed));

    let runs_csv = std::fs::read_to_string(tmp.path().join("runs.csv"))?;
    assert_eq!(runs_csv.lines().count(), 5);
    assert!(runs_csv.starts_with("pilot_id,seed_hex"));

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.path().join("summary.json"))?)?;
    assert_eq!(summary["objective"], "hybrid");
    assert_eq!(summary["run_count"], 4);
    Ok(())
}

#[test]
fn benchmark_rejects_zero_jobs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = run_benchmark(BenchmarkConfig {
        pilots: vec!["idle".to_string()],
        seeds: vec![1],
        field: FieldSize::default(),
        max_ticks: 10,
        objective: Objective::Score,
        strict: false,
        out_dir: tmp.path().to_path_buf(),
        save_top: 0,
        jobs: Some(0),
    })
    .expect_err("zero jobs");
    assert!(err.to_string().contains("--jobs"));
}
