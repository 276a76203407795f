pub mod catalog;
pub mod loader;

use song_schema::{NoteDefinition, Requirement, RequirementTable, Song};

/// Live per-session state of one note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRun {
    pub definition: NoteDefinition,
    pub required: Requirement,
    /// Spatial coordinate along the track; `NEG_INFINITY` until first scheduled.
    pub position: f64,
    pub hit: bool,
    pub missed: bool,
    pub played: bool,
}

impl NoteRun {
    pub fn new(definition: NoteDefinition, required: Requirement) -> Self {
        Self {
            definition,
            required,
            position: f64::NEG_INFINITY,
            hit: false,
            missed: false,
            played: false,
        }
    }

    pub fn pitch(&self) -> &str {
        &self.definition.pitch
    }

    pub fn start_time(&self) -> f64 {
        self.definition.start_time
    }

    /// Hit or missed. Such notes are frozen and no longer scheduled.
    pub fn is_judged(&self) -> bool {
        self.hit || self.missed
    }

    pub fn is_resolved(&self) -> bool {
        self.hit || self.missed || self.played
    }

    /// Returns whether the note changed state.
    pub fn mark_hit(&mut self) -> bool {
        if self.is_judged() {
            return false;
        }
        self.hit = true;
        true
    }

    pub fn mark_missed(&mut self) -> bool {
        if self.is_judged() {
            return false;
        }
        self.missed = true;
        true
    }

    pub fn mark_played(&mut self) -> bool {
        if self.played {
            return false;
        }
        self.played = true;
        true
    }
}

/// The run-state collection for one play session.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub tempo: f64,
    pub notes: Vec<NoteRun>,
}

impl Chart {
    /// Builds fresh run-states. Pitches absent from `table` become
    /// zero-requirement notes.
    pub fn build(song: &Song, table: &RequirementTable) -> Self {
        let notes = song
            .notes
            .iter()
            .map(|definition| {
                let required = match table.requirement(&definition.pitch) {
                    Some(required) => required.clone(),
                    None => {
                        log::warn!(
                            "no {:?} requirement for pitch {:?} in {:?}; treating it as zero-requirement",
                            table.mode,
                            definition.pitch,
                            song.title
                        );
                        Requirement::new()
                    }
                };
                NoteRun::new(definition.clone(), required)
            })
            .collect::<Vec<_>>();

        log::debug!("built {} notes for song {:?}", notes.len(), song.title);

        Self {
            title: song.title.clone(),
            tempo: song.tempo,
            notes,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn last_start_time(&self) -> f64 {
        self.notes.last().map_or(0.0, NoteRun::start_time)
    }

    pub fn all_resolved(&self) -> bool {
        self.notes.iter().all(NoteRun::is_resolved)
    }

    pub fn count_hit(&self) -> usize {
        self.notes.iter().filter(|n| n.hit).count()
    }

    pub fn count_missed(&self) -> usize {
        self.notes.iter().filter(|n| n.missed).count()
    }

    pub fn count_played(&self) -> usize {
        self.notes.iter().filter(|n| n.played).count()
    }
}
