use song_schema::Requirement;

use crate::chart::NoteRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Judgment {
    Hit,
    Miss,
    /// Sounded by position alone, without judging input.
    AutoPlayed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub note_index: usize,
    pub judgment: Judgment,
    /// `song_time - start_time`; positive when late.
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub base_points: u32,
    pub combo_cap: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 100,
            combo_cap: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub hits: u32,
    pub misses: u32,
}

/// Exact-set match. An empty requirement or an empty input never matches.
pub fn matches(required: &Requirement, active: &Requirement) -> bool {
    !active.is_empty() && required.len() == active.len() && required.iter().all(|e| active.contains(e))
}

#[derive(Debug, Clone, Default)]
pub struct JudgeMachine {
    rules: ScoringRules,
    score: ScoreState,
}

impl JudgeMachine {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            score: ScoreState::default(),
        }
    }

    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = ScoreState::default();
    }

    /// Marks at most one due note as hit: the earliest one whose requirement
    /// equals `active`.
    ///
    /// `due` must be in start-time order, as produced by the scheduler.
    pub fn evaluate(
        &mut self,
        active: &Requirement,
        notes: &mut [NoteRun],
        due: &[usize],
        song_time: f64,
    ) -> Option<JudgmentResult> {
        if active.is_empty() {
            return None;
        }

        let note_index = due.iter().copied().find(|&i| {
            let note = &notes[i];
            !note.is_judged() && !note.played && matches(&note.required, active)
        })?;

        let note = &mut notes[note_index];
        note.mark_hit();
        self.apply_hit();

        let delta = song_time - note.start_time();
        log::debug!(
            "hit {} (note {}) delta={:+.3}s combo={} score={}",
            note.pitch(),
            note_index,
            delta,
            self.score.combo,
            self.score.score
        );

        Some(JudgmentResult {
            note_index,
            judgment: Judgment::Hit,
            delta,
        })
    }

    /// Scores notes the scheduler just marked missed.
    pub fn register_misses(
        &mut self,
        notes: &[NoteRun],
        newly_missed: &[usize],
        song_time: f64,
    ) -> Vec<JudgmentResult> {
        newly_missed
            .iter()
            .map(|&note_index| {
                let note = &notes[note_index];
                debug_assert!(note.missed);
                self.apply_miss();
                log::debug!("miss {} (note {})", note.pitch(), note_index);
                JudgmentResult {
                    note_index,
                    judgment: Judgment::Miss,
                    delta: song_time - note.start_time(),
                }
            })
            .collect()
    }

    fn apply_hit(&mut self) {
        let score = &mut self.score;
        score.combo += 1;
        score.max_combo = score.max_combo.max(score.combo);
        score.hits += 1;
        score.score += u64::from(self.rules.base_points) * u64::from(score.combo.min(self.rules.combo_cap));
    }

    fn apply_miss(&mut self) {
        self.score.combo = 0;
        self.score.misses += 1;
    }
}
