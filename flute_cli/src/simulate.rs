use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use flute_core::chart::{catalog, loader};
use flute_core::config::{PlayMode, TrainerConfig};
use flute_core::driver::{FrameDriver, InputScript};
use flute_core::error::PresentationError;
use flute_core::gameplay::judge::Judgment;
use flute_core::presentation::Presentation;
use flute_core::session::{GameState, Session};
use song_schema::{InputMode, RequirementTable};

pub struct Options {
    pub song: Option<PathBuf>,
    pub builtin: Option<usize>,
    pub script: Option<PathBuf>,
    pub table: Option<PathBuf>,
    pub autoplay: bool,
    pub fingering: bool,
    pub fps: u32,
}

/// Prints lifecycle changes and sounded notes as they happen.
struct TerminalPresentation;

impl Presentation for TerminalPresentation {
    fn note_due(&mut self, pitch: &str) -> Result<(), PresentationError> {
        match catalog::pitch_frequency(pitch) {
            Some(hz) => println!("  sound {pitch} ({hz:.2} Hz)"),
            None => println!("  sound {pitch}"),
        }
        Ok(())
    }

    fn state_changed(&mut self, from: GameState, to: GameState) -> Result<(), PresentationError> {
        println!("[{from} -> {to}]");
        Ok(())
    }
}

pub fn run_simulation(mut config: TrainerConfig, options: Options) -> anyhow::Result<()> {
    if options.fps == 0 {
        bail!("--fps must be > 0");
    }
    if options.autoplay {
        config.play_mode = PlayMode::AutoPlay;
    }
    if options.fingering {
        config.input_mode = InputMode::Fingering;
    }

    let mut session = Session::new(config).context("invalid config")?;

    if let Some(path) = &options.table {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read table: {}", path.display()))?;
        let table: RequirementTable = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse table json: {}", path.display()))?;
        session = session.with_table(table);
    }

    match &options.song {
        Some(path) => {
            let song = loader::load_song_from_path(path)
                .with_context(|| format!("failed to load song: {}", path.display()))?;
            session.select_song(song)?;
        }
        None => session.select_builtin(options.builtin.unwrap_or(0))?,
    }

    let script = match &options.script {
        Some(path) => InputScript::load(path)
            .with_context(|| format!("failed to load script: {}", path.display()))?,
        None => InputScript::default(),
    };

    let mode = match session.config().play_mode {
        PlayMode::Player => "player",
        PlayMode::AutoPlay => "autoplay",
    };
    println!(
        "Simulation: {} ({} notes, {} mode, {:?} table)",
        session.song().title,
        session.song().notes.len(),
        mode,
        session.table().mode
    );

    session.set_presentation(Box::new(TerminalPresentation));
    let outcome = FrameDriver::new(options.fps).run(&mut session, &script)?;
    session.take_presentation();

    let pitches: Vec<String> = session
        .song()
        .notes
        .iter()
        .map(|n| n.pitch.clone())
        .collect();

    println!("Time(s)  | Note | Result");
    println!("---------|------|------------------");
    for timed in &outcome.judgments {
        let result = &timed.result;
        let delta_ms = result.delta * 1000.0;
        let text = match result.judgment {
            Judgment::Hit => format!("hit ({delta_ms:+.0} ms)"),
            Judgment::Miss => "miss".to_string(),
            Judgment::AutoPlayed => "auto".to_string(),
        };
        let pitch = pitches.get(result.note_index).map_or("?", String::as_str);
        println!("{:8.3} | {:<4} | {}", timed.song_time, pitch, text);
    }

    match &outcome.summary {
        Some(summary) => println!(
            "Score: {} | Max combo: {} | Hits: {} | Misses: {} | Played: {} | Beats: {}",
            summary.score.score,
            summary.score.max_combo,
            summary.hit,
            summary.missed,
            summary.played,
            outcome.beats
        ),
        None => println!("Session ended before completion ({} frames).", outcome.frames),
    }

    Ok(())
}
