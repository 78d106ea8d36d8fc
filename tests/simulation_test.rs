use std::process::{Command, Output};

use city_sim::persistence::{FileLevelStore, LevelStore};
use city_sim::simulation::MaskKind;

fn city_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_city_sim"))
        .args(args)
        .env("RUST_LOG", "warn,city_sim=info")
        .output()
        .expect("Failed to execute city_sim")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = city_sim(&["simulate", "--demo", "--ticks", "120", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = city_sim(&["simulate", "--demo", "--ticks", "30", "--seed", "3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in [
        "Ticks run: 30",
        "Cars:",
        "Pedestrians: 50",
        "Cars blocked on last tick:",
        "Routing decisions:",
    ] {
        assert!(stderr.contains(line), "Missing '{}' statistic. stderr: {}", line, stderr);
    }
}

/// The ASCII map is printed to stdout
#[test]
fn test_map_is_printed() {
    let output = city_sim(&["simulate", "--demo", "--ticks", "5", "--seed", "1"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== City Map (tick 0) ==="));
    assert!(stdout.contains("=== City Map (tick 5) ==="));
    assert!(stdout.contains('>'), "ring road missing from map:\n{}", stdout);
}

#[test]
fn test_missing_level_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let output = city_sim(&["simulate", "--level", missing.to_str().unwrap(), "--ticks", "1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--demo"), "stderr: {}", stderr);
}

/// new -> paint -> inspect -> simulate against one file
#[test]
fn test_level_file_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city").join("data.json");
    let level = path.to_str().unwrap();

    let output = city_sim(&["new", "--out", level, "--width", "12", "--height", "8"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // A rightward drag along row 3 tags a one-way road
    let output = city_sim(&[
        "paint", "--level", level, "--tool", "drivable", "--at", "1,3", "--at", "10,3",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stored = FileLevelStore::new(&path).load().unwrap();
    for x in 1..=10 {
        assert_eq!(stored.mask_at(MaskKind::Drivable, x, 3), 2, "cell ({}, 3)", x);
    }
    assert_eq!(stored.mask_at(MaskKind::Drivable, 0, 3), 0);

    let output = city_sim(&["inspect", "--level", level]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Size: 12x8 tiles"), "{}", stdout);
    assert!(stdout.contains("Drivable cells: 10"), "{}", stdout);

    let output = city_sim(&["simulate", "--level", level, "--ticks", "50", "--seed", "9"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_snapshot_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("frame.png");
    let output = city_sim(&[
        "simulate",
        "--demo",
        "--ticks",
        "10",
        "--seed",
        "2",
        "--debug-overlay",
        "--snapshot",
        png.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
