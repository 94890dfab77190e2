use std::process::Command;

fn arkadien(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_arkadien"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the arkadien binary")
}

#[test]
fn single_wave_run_reports_summary() {
    let output = arkadien(&["--waves", "1", "--towers", "melee@-13,-9", "water-wind@-7,-7"]);
    assert!(output.status.success(), "run failed: {output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("outcome: stopped after the requested waves"), "{stdout}");
    assert!(stdout.contains("waves cleared: 1 of 1"), "{stdout}");
    assert!(stdout.contains("waves reached: 1"), "{stdout}");
    assert!(stdout.contains("towers: 2"), "{stdout}");
}

#[test]
fn tick_limit_stops_the_run() {
    let output = arkadien(&["--max-ticks", "10"]);
    assert!(output.status.success(), "run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("outcome: tick limit reached"), "{stdout}");
    assert!(stdout.contains("waves cleared: 0 of 10"), "{stdout}");
    assert!(stdout.contains("waves reached: 1"), "{stdout}");
}

#[test]
fn malformed_tower_flag_is_rejected() {
    let output = arkadien(&["--towers", "laser@1,2"]);
    assert!(!output.status.success());
}

#[test]
fn missing_config_file_is_reported() {
    let output = arkadien(&["--config", "/nonexistent/arkadien.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading configuration"), "{stderr}");
}

#[test]
fn config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("arkadien-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "tick_rate = 30\nwaypoints = [[-4.0, 0.0, 0.0], [4.0, 0.0, 0.0]]\n",
    )
    .expect("write config");

    let output = arkadien(&["--config", path.to_str().expect("utf-8 path"), "--waves", "1"]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success(), "run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lives: 15"), "{stdout}");
}
