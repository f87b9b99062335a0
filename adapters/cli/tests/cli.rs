use std::{fs, path::PathBuf, process::Command};

fn snake_survival() -> Command {
    Command::new(env!("CARGO_BIN_EXE_snake-survival"))
}

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "snake-survival-{name}-{}.toml",
        std::process::id()
    ));
    fs::write(&path, contents).expect("temp dir is writable");
    path
}

#[test]
fn headless_run_prints_summary() {
    let output = snake_survival()
        .args(["--seconds", "5", "--seed", "11"])
        .output()
        .expect("failed to launch snake-survival");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Snake Survival."));
    assert!(stdout.contains("-- frame"));
    assert!(stdout.contains("audio cues: move"));
}

#[test]
fn json_output_is_deterministic() {
    let run = || {
        snake_survival()
            .args(["--seconds", "8", "--seed", "3", "--json"])
            .output()
            .expect("failed to launch snake-survival")
    };
    let first = run();
    let second = run();

    assert!(first.status.success(), "{first:?}");
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("\"snapshot\""));
    assert!(stdout.contains("\"enemy_spawn_progress\""));
}

#[test]
fn config_file_is_applied() {
    let path = temp_config("grid", "[grid]\nwidth = 11\nheight = 7\n");
    let output = snake_survival()
        .arg("--config")
        .arg(&path)
        .args(["--seconds", "0", "--json"])
        .output()
        .expect("failed to launch snake-survival");
    let _ = fs::remove_file(&path);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"grid_width\": 11"));
    assert!(stdout.contains("\"grid_height\": 7"));
}

#[test]
fn invalid_config_is_rejected() {
    let path = temp_config("invalid", "[enemies]\nhit_points = 0\n");
    let output = snake_survival()
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to launch snake-survival");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hit point"), "{stderr}");
}
