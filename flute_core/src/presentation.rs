//! Port through which the session notifies renderers, audio engines and
//! fingering displays.
//!
//! Every method has a no-op default, so an adapter implements only what it
//! can show. A session without any adapter (`None`) simulates and scores
//! exactly the same way. Errors returned here are logged by the session and
//! never stop the simulation.

use song_schema::Requirement;

use crate::error::PresentationError;
use crate::gameplay::judge::ScoreState;
use crate::session::GameState;

/// Read-only view of one visible, unresolved note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteView {
    pub index: usize,
    pub pitch: String,
    pub color: &'static str,
    pub position: f64,
    pub required: Requirement,
    pub played: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub state: GameState,
    pub song_time: f64,
    pub score: ScoreState,
    /// Elements held when the frame was taken, for key highlighting.
    pub held: Requirement,
    pub notes: Vec<NoteView>,
}

pub trait Presentation {
    fn render(&mut self, _frame: &FrameSnapshot) -> Result<(), PresentationError> {
        Ok(())
    }

    /// A note sounds: hit by the player or auto-played.
    fn note_due(&mut self, _pitch: &str) -> Result<(), PresentationError> {
        Ok(())
    }

    fn beat(&mut self, _index: u64) -> Result<(), PresentationError> {
        Ok(())
    }

    fn show_preview(&mut self, _pitch: &str, _required: &Requirement) -> Result<(), PresentationError> {
        Ok(())
    }

    fn clear_preview(&mut self) -> Result<(), PresentationError> {
        Ok(())
    }

    fn hit_feedback(&mut self, _pitch: &str, _required: &Requirement) -> Result<(), PresentationError> {
        Ok(())
    }

    fn state_changed(&mut self, _from: GameState, _to: GameState) -> Result<(), PresentationError> {
        Ok(())
    }
}
