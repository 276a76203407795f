use std::fmt;

use crossbeam_channel::Sender;
use song_schema::{Requirement, RequirementTable, Song};

use crate::chart::{catalog, loader::validate_song, Chart};
use crate::config::{PlayMode, TrainerConfig};
use crate::error::{ConfigError, PresentationError, TransitionError};
use crate::gameplay::judge::{Judgment, JudgeMachine, JudgmentResult, ScoreState};
use crate::gameplay::scheduler::Scheduler;
use crate::input::events::InputEvent;
use crate::input::{ActiveInputSet, InputQueue};
use crate::presentation::{FrameSnapshot, NoteView, Presentation};
use crate::time::beat::BeatTrack;
use crate::time::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
    FingeringExplore,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "game over",
            GameState::FingeringExplore => "fingering explore",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    SelectSong,
    Start,
    Pause,
    Resume,
    Quit,
    EnterExplore,
    ExitExplore,
    SelectNote,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::SelectSong => "select a song",
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Quit => "quit",
            Command::EnterExplore => "enter fingering explore",
            Command::ExitExplore => "exit fingering explore",
            Command::SelectNote => "select a note",
        };
        f.write_str(name)
    }
}

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub song_time: f64,
    pub judgments: Vec<JudgmentResult>,
    pub beats: Vec<u64>,
    pub preview: Option<usize>,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub title: String,
    pub score: ScoreState,
    pub notes: usize,
    pub hit: usize,
    pub missed: usize,
    pub played: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FingeringSelection {
    pub pitch: String,
    pub label: Option<&'static str>,
    /// `None` when the active table has no entry for the pitch.
    pub required: Option<Requirement>,
}

struct PlaySession {
    chart: Chart,
    judge: JudgeMachine,
    beats: BeatTrack,
    preview: Option<usize>,
}

/// Owns the clock, scheduler and judge for the lifetime of the trainer and
/// drives them through the menu / play / pause / game-over lifecycle.
pub struct Session {
    config: TrainerConfig,
    scheduler: Scheduler,
    table: RequirementTable,
    song: Song,
    state: GameState,
    clock: Clock,
    play: Option<PlaySession>,
    input: InputQueue,
    active: ActiveInputSet,
    selected_note: Option<String>,
    presentation: Option<Box<dyn Presentation>>,
}

impl Session {
    /// Starts in the menu with the first built-in song selected and the
    /// requirement table matching `config.input_mode`.
    pub fn new(config: TrainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = catalog::requirement_table(config.input_mode);
        let song = catalog::c_major_scale();
        Ok(Self {
            scheduler: Scheduler::new(config.scheduler()),
            config,
            table,
            song,
            state: GameState::Menu,
            clock: Clock::new(),
            play: None,
            input: InputQueue::new(),
            active: ActiveInputSet::new(),
            selected_note: None,
            presentation: None,
        })
    }

    /// Replaces the requirement table; takes effect at the next `start`.
    pub fn with_table(mut self, table: RequirementTable) -> Self {
        self.table = table;
        self
    }

    pub fn set_presentation(&mut self, presentation: Box<dyn Presentation>) {
        self.presentation = Some(presentation);
    }

    pub fn take_presentation(&mut self) -> Option<Box<dyn Presentation>> {
        self.presentation.take()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn table(&self) -> &RequirementTable {
        &self.table
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn song_time(&self) -> f64 {
        self.clock.song_time()
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.play.as_ref().map(|p| &p.chart)
    }

    pub fn score(&self) -> ScoreState {
        self.play.as_ref().map(|p| p.judge.score()).unwrap_or_default()
    }

    pub fn active_input(&self) -> &ActiveInputSet {
        &self.active
    }

    /// Sender for input adapters; events are applied at the next tick.
    pub fn input_sender(&self) -> Sender<InputEvent> {
        self.input.sender()
    }

    pub fn push_input(&self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn select_song(&mut self, song: Song) -> Result<(), TransitionError> {
        self.require(&[GameState::Menu, GameState::GameOver], Command::SelectSong)?;
        validate_song(&song)?;
        log::info!("selected song {:?}", song.title);
        self.song = song;
        Ok(())
    }

    pub fn select_builtin(&mut self, index: usize) -> Result<(), TransitionError> {
        let song = catalog::builtin_songs()
            .into_iter()
            .nth(index)
            .ok_or(TransitionError::UnknownSong(index))?;
        self.select_song(song)
    }

    /// Begins a fresh play session: new run-states, cleared score.
    pub fn start(&mut self, now: f64) -> Result<(), TransitionError> {
        self.require(&[GameState::Menu, GameState::GameOver], Command::Start)?;

        self.input.drain_into(&mut self.active);
        let chart = Chart::build(&self.song, &self.table);
        self.play = Some(PlaySession {
            chart,
            judge: JudgeMachine::new(self.config.scoring()),
            beats: BeatTrack::new(self.song.tempo),
            preview: None,
        });
        self.clock.start(now);
        log::info!(
            "starting {:?} ({} notes, {:?} mode)",
            self.song.title,
            self.song.notes.len(),
            self.config.play_mode
        );
        self.transition(GameState::Playing);
        Ok(())
    }

    pub fn pause(&mut self, now: f64) -> Result<(), TransitionError> {
        self.require(&[GameState::Playing], Command::Pause)?;
        self.clock.pause(now);
        self.transition(GameState::Paused);
        Ok(())
    }

    pub fn resume(&mut self, now: f64) -> Result<(), TransitionError> {
        self.require(&[GameState::Paused], Command::Resume)?;
        self.clock.resume(now);
        self.transition(GameState::Playing);
        Ok(())
    }

    /// Abandons the current session, drops held input and returns to the menu.
    pub fn quit(&mut self) -> Result<(), TransitionError> {
        self.require(
            &[GameState::Playing, GameState::Paused, GameState::GameOver],
            Command::Quit,
        )?;
        self.play = None;
        // Presses queued or held in the abandoned run do not carry over.
        self.input.drain_into(&mut self.active);
        self.active.clear();
        notify(&mut self.presentation, |p| p.clear_preview());
        self.transition(GameState::Menu);
        Ok(())
    }

    pub fn enter_explore(&mut self) -> Result<(), TransitionError> {
        self.require(&[GameState::Menu], Command::EnterExplore)?;
        self.transition(GameState::FingeringExplore);
        Ok(())
    }

    pub fn exit_explore(&mut self) -> Result<(), TransitionError> {
        self.require(&[GameState::FingeringExplore], Command::ExitExplore)?;
        self.clear_selection();
        self.transition(GameState::Menu);
        Ok(())
    }

    pub fn select_note(&mut self, pitch: &str) -> Result<FingeringSelection, TransitionError> {
        self.require(&[GameState::FingeringExplore], Command::SelectNote)?;

        let required = self.table.requirement(pitch).cloned();
        match &required {
            Some(required) => {
                notify(&mut self.presentation, |p| p.show_preview(pitch, required));
            }
            None => log::warn!("no {:?} requirement for pitch {:?}", self.table.mode, pitch),
        }
        self.selected_note = Some(pitch.to_string());

        Ok(FingeringSelection {
            pitch: pitch.to_string(),
            label: catalog::staff_label(pitch),
            required,
        })
    }

    pub fn selected_note(&self) -> Option<&str> {
        self.selected_note.as_deref()
    }

    pub fn clear_selection(&mut self) {
        if self.selected_note.take().is_some() {
            notify(&mut self.presentation, |p| p.clear_preview());
        }
    }

    /// Runs one frame of the simulation. Returns `None` unless playing.
    pub fn tick(&mut self, now: f64) -> Option<TickReport> {
        if self.state != GameState::Playing {
            return None;
        }
        let play = self.play.as_mut()?;

        self.input.drain_into(&mut self.active);
        let song_time = self.clock.tick(now);
        let mode = self.config.play_mode;

        let beats = play.beats.advance(song_time);
        for &beat in &beats {
            log::trace!("beat {beat} at {song_time:.3}s");
            notify(&mut self.presentation, |p| p.beat(beat));
        }

        let update = self
            .scheduler
            .update(&mut play.chart.notes, song_time, mode);
        let mut judgments = Vec::new();

        for &index in &update.newly_played {
            let note = &play.chart.notes[index];
            log::debug!("auto-played {} (note {})", note.pitch(), index);
            notify(&mut self.presentation, |p| p.note_due(note.pitch()));
            notify(&mut self.presentation, |p| p.hit_feedback(note.pitch(), &note.required));
            judgments.push(JudgmentResult {
                note_index: index,
                judgment: Judgment::AutoPlayed,
                delta: song_time - note.start_time(),
            });
        }

        judgments.extend(
            play.judge
                .register_misses(&play.chart.notes, &update.newly_missed, song_time),
        );

        if mode == PlayMode::Player {
            if let Some(hit) =
                play.judge
                    .evaluate(self.active.held(), &mut play.chart.notes, &update.due, song_time)
            {
                let note = &play.chart.notes[hit.note_index];
                notify(&mut self.presentation, |p| p.note_due(note.pitch()));
                notify(&mut self.presentation, |p| p.hit_feedback(note.pitch(), &note.required));
                judgments.push(hit);
            }
        }

        if update.preview != play.preview {
            play.preview = update.preview;
            match update.preview {
                Some(index) => {
                    let note = &play.chart.notes[index];
                    notify(&mut self.presentation, |p| p.show_preview(note.pitch(), &note.required));
                }
                None => notify(&mut self.presentation, |p| p.clear_preview()),
            }
        }

        if self.presentation.is_some() {
            let frame = snapshot(&self.scheduler, self.state, song_time, play, &self.active);
            notify(&mut self.presentation, |p| p.render(&frame));
        }

        let game_over = play.chart.all_resolved()
            && song_time > play.chart.last_start_time() + self.config.end_grace;
        if game_over {
            let score = play.judge.score();
            log::info!(
                "song {:?} complete: score={} max_combo={} hits={} misses={}",
                play.chart.title,
                score.score,
                score.max_combo,
                score.hits,
                score.misses
            );
            self.transition(GameState::GameOver);
        }

        Some(TickReport {
            song_time,
            judgments,
            beats,
            preview: update.preview,
            game_over,
        })
    }

    /// Plain data view of the current frame for hosts without a port.
    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        let play = self.play.as_ref()?;
        Some(snapshot(
            &self.scheduler,
            self.state,
            self.clock.song_time(),
            play,
            &self.active,
        ))
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let play = self.play.as_ref()?;
        Some(SessionSummary {
            title: play.chart.title.clone(),
            score: play.judge.score(),
            notes: play.chart.len(),
            hit: play.chart.count_hit(),
            missed: play.chart.count_missed(),
            played: play.chart.count_played(),
        })
    }

    fn require(&self, allowed: &[GameState], command: Command) -> Result<(), TransitionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TransitionError::Illegal {
                state: self.state,
                command,
            })
        }
    }

    fn transition(&mut self, to: GameState) {
        let from = self.state;
        self.state = to;
        log::info!("state {from} -> {to}");
        notify(&mut self.presentation, |p| p.state_changed(from, to));
    }
}

fn snapshot(
    scheduler: &Scheduler,
    state: GameState,
    song_time: f64,
    play: &PlaySession,
    active: &ActiveInputSet,
) -> FrameSnapshot {
    let notes = play
        .chart
        .notes
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.is_judged() && scheduler.is_visible(n.position))
        .map(|(index, n)| NoteView {
            index,
            pitch: n.pitch().to_string(),
            color: catalog::note_color(n.pitch()),
            position: n.position,
            required: n.required.clone(),
            played: n.played,
        })
        .collect();

    FrameSnapshot {
        state,
        song_time,
        score: play.judge.score(),
        held: active.snapshot(),
        notes,
    }
}

fn notify<F>(presentation: &mut Option<Box<dyn Presentation>>, f: F)
where
    F: FnOnce(&mut dyn Presentation) -> Result<(), PresentationError>,
{
    if let Some(p) = presentation.as_deref_mut() {
        if let Err(err) = f(p) {
            log::warn!("presentation failed: {err}");
        }
    }
}
