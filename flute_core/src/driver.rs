//! Headless frame loop: one tick per frame on a virtual wall clock, with
//! scripted input and commands applied between frames.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use song_schema::ControlElement;

use crate::error::{LoadError, TransitionError};
use crate::gameplay::judge::JudgmentResult;
use crate::input::events::InputEvent;
use crate::session::{GameState, Session, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Press { element: ControlElement },
    Release { element: ControlElement },
    Pause,
    Resume,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Wall-clock seconds since the driver started the session.
    pub at: f64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
}

impl InputScript {
    /// Sorts `events` by time. Every `at` must be finite and non-negative.
    pub fn new(mut events: Vec<ScriptEvent>) -> Result<Self, LoadError> {
        if let Some((index, event)) = events
            .iter()
            .enumerate()
            .find(|(_, e)| !e.at.is_finite() || e.at < 0.0)
        {
            return Err(LoadError::ScriptTime {
                index,
                at: event.at,
            });
        }
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { events })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let events: Vec<ScriptEvent> = serde_json::from_str(json)?;
        Self::new(events)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    pub fn last_time(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.at)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedJudgment {
    pub song_time: f64,
    pub result: JudgmentResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub final_state: GameState,
    pub frames: u64,
    pub wall_time: f64,
    pub judgments: Vec<TimedJudgment>,
    pub beats: u64,
    pub summary: Option<SessionSummary>,
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    frame_step: f64,
    /// Stop after this much wall time even if the song has not ended.
    time_limit: Option<f64>,
}

impl FrameDriver {
    pub fn new(fps: u32) -> Self {
        assert!(fps > 0, "fps must be positive");
        Self {
            frame_step: 1.0 / f64::from(fps),
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn frame_step(&self) -> f64 {
        self.frame_step
    }

    /// Starts `session` at wall time 0 and runs frames until game over, quit,
    /// or the time limit.
    pub fn run(&self, session: &mut Session, script: &InputScript) -> Result<RunOutcome, TransitionError> {
        session.start(0.0)?;

        let song_end = session.song().last_start_time().unwrap_or(0.0) + session.config().end_grace;
        let limit = self
            .time_limit
            .unwrap_or(song_end + script.last_time() + 1.0);

        let mut pending = script.events().iter().peekable();
        let mut judgments = Vec::new();
        let mut beats = 0;
        let mut frames: u64 = 0;
        let mut wall_time: f64;
        // The clock rejects times before its last tick.
        let mut last_tick = 0.0_f64;

        loop {
            wall_time = frames as f64 * self.frame_step;
            if wall_time > limit {
                log::warn!("frame driver stopped at time limit {limit:.3}s");
                break;
            }

            let mut quit = false;
            while let Some(event) = pending.next_if(|e| e.at <= wall_time) {
                let at = event.at.max(last_tick);
                match event.action {
                    ScriptAction::Press { element } => {
                        session.push_input(InputEvent::activated(at, element))
                    }
                    ScriptAction::Release { element } => {
                        session.push_input(InputEvent::deactivated(at, element))
                    }
                    ScriptAction::Pause => session.pause(at)?,
                    ScriptAction::Resume => session.resume(at)?,
                    ScriptAction::Quit => {
                        session.quit()?;
                        quit = true;
                    }
                }
            }
            if quit {
                break;
            }

            frames += 1;
            last_tick = wall_time;
            if let Some(report) = session.tick(wall_time) {
                beats += report.beats.len() as u64;
                judgments.extend(report.judgments.into_iter().map(|result| TimedJudgment {
                    song_time: report.song_time,
                    result,
                }));
                if report.game_over {
                    break;
                }
            }
        }

        Ok(RunOutcome {
            final_state: session.state(),
            frames,
            wall_time,
            judgments,
            beats,
            summary: session.summary(),
        })
    }
}
