/// Maps host wall-clock seconds to song seconds, excluding paused spans.
///
/// Song time is `now - origin - paused_total`. It is evaluated relative to
/// the last resume point so the value at the resume instant is bit-exact
/// with the value frozen at pause.
///
/// Misuse (ticking before `start`, wall time running backwards, pausing
/// twice) panics instead of clamping, so notes are never judged against a
/// corrupted timeline.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    started: bool,
    anchor_wall_time: f64,
    anchor_song_time: f64,
    pause_started: Option<f64>,
    paused_total: f64,
    last_wall_time: f64,
    song_time: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: f64) {
        *self = Self {
            started: true,
            anchor_wall_time: now,
            last_wall_time: now,
            ..Self::default()
        };
    }

    pub fn tick(&mut self, now: f64) -> f64 {
        assert!(self.started, "clock ticked before start");
        self.observe_wall_time(now);

        if self.pause_started.is_some() {
            return self.song_time;
        }

        let song_time = self.anchor_song_time + (now - self.anchor_wall_time);
        assert!(
            song_time >= self.song_time,
            "song time went backwards: {} -> {}",
            self.song_time,
            song_time
        );
        self.song_time = song_time;
        song_time
    }

    pub fn pause(&mut self, now: f64) {
        assert!(self.started, "clock paused before start");
        assert!(self.pause_started.is_none(), "clock paused twice");
        // Freeze at the exact pause instant, not the last frame.
        self.tick(now);
        self.pause_started = Some(now);
    }

    pub fn resume(&mut self, now: f64) {
        let pause_started = self
            .pause_started
            .take()
            .expect("clock resumed while running");
        self.observe_wall_time(now);
        self.paused_total += now - pause_started;
        self.anchor_wall_time = now;
        self.anchor_song_time = self.song_time;
    }

    /// Song time as of the last `tick`, `pause` or `start`.
    pub fn song_time(&self) -> f64 {
        self.song_time
    }

    pub fn is_running(&self) -> bool {
        self.started && self.pause_started.is_none()
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    pub fn paused_total(&self) -> f64 {
        self.paused_total
    }

    fn observe_wall_time(&mut self, now: f64) {
        assert!(
            now >= self.last_wall_time,
            "wall time went backwards: {} -> {}",
            self.last_wall_time,
            now
        );
        self.last_wall_time = now;
    }
}
