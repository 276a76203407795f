mod simulate;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flute_core::chart::catalog;
use flute_core::config::TrainerConfig;
use flute_core::session::Session;
use song_schema::InputMode;

#[derive(Debug, Parser)]
#[command(name = "flute")]
#[command(about = "Headless flute rhythm trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in songs
    Songs,
    /// Play a song through the frame loop and print every judgment
    Simulate {
        /// Song JSON file; defaults to a built-in song
        #[arg(long)]
        song: Option<PathBuf>,
        /// Index of the built-in song (see `flute songs`)
        #[arg(long)]
        builtin: Option<usize>,
        /// JSON list of timed presses, releases, pauses and resumes
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Requirement table JSON replacing the built-in one
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(long)]
        autoplay: bool,
        /// Judge full flute fingerings instead of the seven-key mapping
        #[arg(long)]
        fingering: bool,
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Show what to hold for a pitch
    Fingering {
        pitch: String,
        #[arg(long)]
        fingering: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Songs => {
            for (index, song) in catalog::builtin_songs().iter().enumerate() {
                println!(
                    "{index}: {} ({} bpm, {} notes)",
                    song.title,
                    song.tempo,
                    song.notes.len()
                );
            }
        }
        Command::Simulate {
            song,
            builtin,
            script,
            config,
            table,
            autoplay,
            fingering,
            fps,
        } => {
            let config = match config {
                Some(path) => TrainerConfig::load(&path)
                    .with_context(|| format!("failed to load config: {}", path.display()))?,
                None => TrainerConfig::default(),
            };
            let options = simulate::Options {
                song,
                builtin,
                script,
                table,
                autoplay,
                fingering,
                fps,
            };
            simulate::run_simulation(config, options)?;
        }
        Command::Fingering { pitch, fingering } => {
            let config = TrainerConfig {
                input_mode: input_mode(fingering),
                ..TrainerConfig::default()
            };
            let mut session = Session::new(config).context("invalid default config")?;
            session.enter_explore()?;
            let selection = session.select_note(&pitch)?;

            let Some(required) = selection.required else {
                bail!("no {:?} requirement for pitch {pitch}", input_mode(fingering));
            };
            match selection.label {
                Some(label) => println!("{pitch} - {label}"),
                None => println!("{pitch}"),
            }
            if required.is_empty() {
                println!("(nothing held)");
            } else {
                let elements: Vec<String> = required.iter().map(ToString::to_string).collect();
                println!("{}", elements.join(" "));
            }
            session.exit_explore()?;
        }
    }

    Ok(())
}

fn input_mode(fingering: bool) -> InputMode {
    if fingering {
        InputMode::Fingering
    } else {
        InputMode::Keys
    }
}
