use crate::chart::NoteRun;
use crate::config::PlayMode;

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub target_position: f64,
    /// Track units per second.
    pub scroll_speed: f64,
    pub hit_window: f64,
    pub miss_tolerance: f64,
    pub preview_seconds: f64,
    pub autoplay_epsilon: f64,
    pub visible_top: f64,
    pub visible_bottom: f64,
}

/// Note indices that changed zone during one update, each in start-time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerReport {
    pub due: Vec<usize>,
    pub newly_missed: Vec<usize>,
    pub newly_played: Vec<usize>,
    pub preview: Option<usize>,
}

/// Positions notes along the track from song time alone.
///
/// Positions grow toward the target: a note `t` seconds away sits at
/// `target - t * speed`. Nothing is integrated between ticks, so a
/// recomputation from the same song time always yields the same layout.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn position_at(&self, start_time: f64, song_time: f64) -> f64 {
        self.config.target_position + self.offset_from_target(start_time, song_time)
    }

    /// Signed distance past the target; negative while approaching.
    fn offset_from_target(&self, start_time: f64, song_time: f64) -> f64 {
        (song_time - start_time) * self.config.scroll_speed
    }

    /// Spatial distance covered in `seconds`.
    pub fn travel_distance(&self, seconds: f64) -> f64 {
        seconds * self.config.scroll_speed
    }

    pub fn is_visible(&self, position: f64) -> bool {
        position > self.config.visible_top && position < self.config.visible_bottom
    }

    pub fn is_due(&self, start_time: f64, song_time: f64) -> bool {
        self.offset_from_target(start_time, song_time).abs()
            <= self.travel_distance(self.config.hit_window)
    }

    pub fn update(&self, notes: &mut [NoteRun], song_time: f64, mode: PlayMode) -> SchedulerReport {
        let mut report = SchedulerReport::default();
        let hit_span = self.travel_distance(self.config.hit_window);
        let miss_span = self.travel_distance(self.config.miss_tolerance);

        for (index, note) in notes.iter_mut().enumerate() {
            if note.is_judged() {
                continue;
            }

            let offset = self.offset_from_target(note.start_time(), song_time);
            note.position = self.config.target_position + offset;

            let autoplays = mode == PlayMode::AutoPlay || note.required.is_empty();
            if autoplays && !note.played && offset >= -self.config.autoplay_epsilon {
                note.mark_played();
                report.newly_played.push(index);
            }
            if note.played {
                continue;
            }

            if offset > miss_span {
                note.mark_missed();
                report.newly_missed.push(index);
            } else if offset.abs() <= hit_span {
                report.due.push(index);
            } else if report.preview.is_none() {
                let until_target = note.start_time() - song_time;
                if until_target > 0.0 && until_target <= self.config.preview_seconds {
                    report.preview = Some(index);
                }
            }
        }

        report
    }
}
