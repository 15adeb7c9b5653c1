use std::time::{Duration, Instant};

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// Centisecond stopwatch driven by the caller's clock.
///
/// Every operation takes `now` so the event loop decides when time moves.
/// Elapsed time is published rounded to two decimals; `accumulated` keeps
/// the frozen value across a stop so a later `start` resumes from it.
#[derive(Clone, Debug)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    accumulated: Duration,
    elapsed_centis: u64,
    sample_interval: Duration,
    last_sample: Option<Instant>,
}

impl Stopwatch {
    pub fn new(sample_interval: Duration) -> Self {
        Self {
            started_at: None,
            accumulated: Duration::ZERO,
            elapsed_centis: 0,
            sample_interval: sample_interval.max(Duration::from_millis(1)),
            last_sample: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_centis as f64 / 100.0
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated.as_millis() as u64
    }

    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.started_at = Some(now);
        self.sample(now);
    }

    /// Recompute elapsed time. No-op when idle.
    pub fn sample(&mut self, now: Instant) -> f64 {
        if let Some(started_at) = self.started_at {
            let raw = self.accumulated + now.saturating_duration_since(started_at);
            let centis = round_to_centis(raw);
            // Out-of-order instants must not move the display backwards.
            self.elapsed_centis = self.elapsed_centis.max(centis);
            self.last_sample = Some(now);
        }
        self.elapsed_secs()
    }

    /// Freeze and return the elapsed value at `now`. A display sample taken
    /// after `now` does not count.
    pub fn stop(&mut self, now: Instant) -> f64 {
        let Some(started_at) = self.started_at else {
            return self.elapsed_secs();
        };
        let raw = self.accumulated + now.saturating_duration_since(started_at);
        self.elapsed_centis = round_to_centis(raw);
        self.started_at = None;
        self.last_sample = None;
        self.accumulated = Duration::from_millis(self.elapsed_centis * 10);
        self.elapsed_secs()
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.last_sample = None;
        self.accumulated = Duration::ZERO;
        self.elapsed_centis = 0;
    }

    pub fn reset_and_start(&mut self, now: Instant, auto_start: bool) {
        self.reset();
        if auto_start {
            self.start(now);
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.stop(now);
        } else {
            self.start(now);
        }
    }

    /// When the next display sample is due. `None` while idle.
    pub fn next_sample_due(&self) -> Option<Instant> {
        self.last_sample.map(|at| at + self.sample_interval)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

fn round_to_centis(d: Duration) -> u64 {
    let ms = d.as_millis() as u64;
    (ms + 5) / 10
}
