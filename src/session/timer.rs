use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::hold::{HoldController, TimerPhase, Transition};
use crate::engine::scramble::{Scramble, ScrambleGenerator};
use crate::engine::stats::SessionTimes;
use crate::engine::stopwatch::Stopwatch;
use crate::session::solve::SolveRecord;

/// One timing session: hold controller, stopwatch, current scramble and the
/// times recorded so far.
pub struct TimerSession {
    controller: HoldController,
    stopwatch: Stopwatch,
    generator: ScrambleGenerator,
    scramble: Scramble,
    times: SessionTimes,
    puzzle_type: String,
    rng: SmallRng,
}

impl TimerSession {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn with_rng(config: &Config, mut rng: SmallRng) -> Self {
        let generator = ScrambleGenerator::new(config.scramble_length);
        let scramble = generator.generate(&mut rng);
        Self {
            controller: HoldController::new(config.hold_duration()),
            stopwatch: Stopwatch::new(config.sample_interval()),
            generator,
            scramble,
            times: SessionTimes::default(),
            puzzle_type: config.puzzle_type.clone(),
            rng,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.controller.phase()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs()
    }

    pub fn scramble(&self) -> &Scramble {
        &self.scramble
    }

    pub fn times(&self) -> &SessionTimes {
        &self.times
    }

    pub fn hold_duration(&self) -> Duration {
        self.controller.hold_duration()
    }

    pub fn hold_progress(&self, now: Instant) -> f64 {
        self.controller.hold_progress(now)
    }

    pub fn begin_hold(&mut self, now: Instant) -> Transition {
        let transition = self.controller.begin_hold(now);
        if transition != Transition::Ignored {
            tracing::debug!(?transition, "hold began");
        }
        transition
    }

    /// Release. Returns the finished solve when this release stopped one.
    pub fn end_hold(&mut self, now: Instant) -> Option<SolveRecord> {
        match self.controller.end_hold(now) {
            Transition::Started => {
                self.stopwatch.reset_and_start(now, true);
                tracing::debug!("solve started");
                None
            }
            Transition::Finished => Some(self.finish_solve(now)),
            Transition::Cancelled => {
                tracing::debug!("hold released before ready");
                None
            }
            _ => None,
        }
    }

    /// Deliver due deadlines: the ready transition and the display sample.
    pub fn tick(&mut self, now: Instant) -> Transition {
        self.tick_held(now, now)
    }

    /// Like [`tick`](Self::tick), but the hold only counts as far as
    /// `held_until`, the last instant it is known to have been down.
    pub fn tick_held(&mut self, held_until: Instant, now: Instant) -> Transition {
        let transition = self.controller.poll(held_until.min(now));
        if transition == Transition::Ready {
            tracing::debug!("timer armed");
        }
        if self.stopwatch.is_running() {
            self.stopwatch.sample(now);
        }
        transition
    }

    /// Earliest instant the event loop has to wake for. `None` while idle.
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.controller.ready_deadline(), self.stopwatch.next_sample_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn next_sample_due(&self) -> Option<Instant> {
        self.stopwatch.next_sample_due()
    }

    pub fn new_scramble(&mut self) {
        self.scramble = self.generator.generate(&mut self.rng);
    }

    pub fn clear_times(&mut self) {
        self.times.clear();
    }

    pub fn set_hold_duration(&mut self, hold_duration: Duration) {
        self.controller.set_hold_duration(hold_duration);
    }

    /// Applies from the next generated scramble.
    pub fn set_scramble_length(&mut self, length: usize) {
        self.generator.set_length(length);
    }

    fn finish_solve(&mut self, now: Instant) -> SolveRecord {
        let time = self.stopwatch.stop(now);
        self.times.push(time);
        let record = SolveRecord::new(&self.puzzle_type, &self.scramble.to_string(), time);
        self.new_scramble();
        tracing::info!(time, scramble = %record.scramble, "solve completed");
        record
    }
}
