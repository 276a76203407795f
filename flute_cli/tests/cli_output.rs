use std::{env, fs, process::Command};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

#[test]
fn songs_lists_builtin_catalog() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let output = Command::new(exe).arg("songs").output().unwrap();
    assert!(output.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("0: C Major Scale (80 bpm, 15 notes)\n"));
    assert!(stdout.contains("1: Simple Flute Melody (90 bpm, 22 notes)\n"));
}

#[test]
fn fingering_prints_label_and_held_elements() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let output = Command::new(exe).args(["fingering", "C2"]).output().unwrap();
    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(stdout, "C2 - C (High C)\n(nothing held)\n");

    let output = Command::new(exe)
        .args(["fingering", "C2", "--fingering"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(stdout, "C2 - C (High C)\nlh1 rh4\n");

    let output = Command::new(exe).args(["fingering", "G"]).output().unwrap();
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(stdout, "G - G\nA S D\n");
}

#[test]
fn fingering_unknown_pitch_fails() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let output = Command::new(exe).args(["fingering", "Q#"]).output().unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: no Keys requirement for pitch Q#"));
}

#[test]
fn simulate_autoplay_plays_every_note() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let output = Command::new(exe)
        .args(["simulate", "--autoplay", "--fps", "30"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.starts_with("Simulation: C Major Scale (15 notes, autoplay mode, Keys table)\n"));
    assert!(stdout.contains("[menu -> playing]\n"));
    assert!(stdout.contains("  sound C (261.63 Hz)\n"));
    assert!(stdout.contains("[playing -> game over]\n"));
    assert!(stdout.contains("| C    | auto\n"));
    assert!(stdout.contains("Score: 0 | Max combo: 0 | Hits: 0 | Misses: 0 | Played: 15 |"));
}

#[test]
fn simulate_script_hits_first_note_then_quits() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let script = env::temp_dir().join(format!(
        "flute_cli_simulate_script_{}.json",
        std::process::id()
    ));
    fs::write(
        &script,
        r#"[
            {"at": 0.0, "action": "press", "element": "A"},
            {"at": 0.0, "action": "press", "element": "S"},
            {"at": 0.0, "action": "press", "element": "D"},
            {"at": 0.0, "action": "press", "element": "F"},
            {"at": 0.0, "action": "press", "element": "G"},
            {"at": 0.0, "action": "press", "element": "H"},
            {"at": 0.0, "action": "press", "element": "J"},
            {"at": 0.5, "action": "quit"}
        ]"#,
    )
    .unwrap();

    let output = Command::new(exe)
        .args(["simulate", "--script", script.to_str().unwrap()])
        .output()
        .unwrap();
    let _ = fs::remove_file(&script);
    assert!(output.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Simulation: C Major Scale (15 notes, player mode, Keys table)\n"));
    assert!(stdout.contains("   0.000 | C    | hit ("));
    assert!(stdout.contains("[playing -> menu]\n"));
    assert!(stdout.contains("Session ended before completion"));
}

#[test]
fn simulate_missing_song_file_is_an_error() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let missing = env::temp_dir().join(format!(
        "flute_cli_missing_song_{}.json",
        std::process::id()
    ));
    let _ = fs::remove_file(&missing);

    let output = Command::new(exe)
        .args(["simulate", "--song", missing.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to load song: "));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn simulate_rejects_invalid_song() {
    let exe = env!("CARGO_BIN_EXE_flute");

    let song = env::temp_dir().join(format!(
        "flute_cli_invalid_song_{}.json",
        std::process::id()
    ));
    fs::write(
        &song,
        r#"{"title": "Broken", "tempo": 0, "notes": [{"note": "C", "time": 0, "duration": 1}]}"#,
    )
    .unwrap();

    let output = Command::new(exe)
        .args(["simulate", "--song", song.to_str().unwrap()])
        .output()
        .unwrap();
    let _ = fs::remove_file(&song);
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to load song: "));
}
