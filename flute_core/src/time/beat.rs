/// Metronome schedule keyed off song time.
///
/// Beat `k` falls at `k * interval`. Each call to `advance` returns the
/// beats crossed since the previous call, so a long frame emits every
/// skipped beat and a paused session (no ticks) emits none.
#[derive(Debug, Clone)]
pub struct BeatTrack {
    interval: f64,
    next_beat: u64,
}

impl BeatTrack {
    /// `tempo` is in beats per minute and must be positive.
    pub fn new(tempo: f64) -> Self {
        assert!(tempo > 0.0, "tempo must be positive, got {tempo}");
        Self {
            interval: 60.0 / tempo,
            next_beat: 0,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn beat_time(&self, index: u64) -> f64 {
        index as f64 * self.interval
    }

    pub fn advance(&mut self, song_time: f64) -> Vec<u64> {
        let mut beats = Vec::new();
        while self.beat_time(self.next_beat) <= song_time {
            beats.push(self.next_beat);
            self.next_beat += 1;
        }
        beats
    }
}
