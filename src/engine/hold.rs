use std::time::{Duration, Instant};

pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Holding,
    Ready,
    Running,
}

impl TimerPhase {
    pub fn label(self) -> &'static str {
        match self {
            TimerPhase::Idle | TimerPhase::Holding => "HOLD TO GET READY",
            TimerPhase::Ready => "READY - RELEASE TO START",
            TimerPhase::Running => "SOLVING...",
        }
    }
}

/// What a hold event did to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    /// Idle -> Holding.
    Armed,
    /// Holding -> Ready.
    Ready,
    /// Holding -> Idle, released too early.
    Cancelled,
    /// Ready -> Running. The caller resets and starts the stopwatch.
    Started,
    /// Running -> Idle. The caller stops the stopwatch and records the solve.
    Finished,
}

/// Hold-to-ready state machine.
///
/// A press arms a single deadline at `hold_duration` after the press; the
/// event loop calls [`HoldController::poll`] once it passes. Releasing
/// before the deadline cancels it.
#[derive(Clone, Debug)]
pub struct HoldController {
    phase: TimerPhase,
    hold_started_at: Option<Instant>,
    hold_duration: Duration,
}

impl HoldController {
    pub fn new(hold_duration: Duration) -> Self {
        Self {
            phase: TimerPhase::Idle,
            hold_started_at: None,
            hold_duration,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    /// Takes effect on the next press; an in-flight hold keeps its deadline.
    pub fn set_hold_duration(&mut self, hold_duration: Duration) {
        self.hold_duration = hold_duration;
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.phase, TimerPhase::Holding | TimerPhase::Ready)
    }

    pub fn begin_hold(&mut self, now: Instant) -> Transition {
        match self.phase {
            TimerPhase::Running | TimerPhase::Holding | TimerPhase::Ready => Transition::Ignored,
            TimerPhase::Idle => {
                self.phase = TimerPhase::Holding;
                self.hold_started_at = Some(now);
                if self.hold_duration.is_zero() {
                    return self.poll(now);
                }
                Transition::Armed
            }
        }
    }

    /// Fire the ready deadline if it has passed.
    pub fn poll(&mut self, now: Instant) -> Transition {
        match self.ready_deadline() {
            Some(deadline) if now >= deadline => {
                self.phase = TimerPhase::Ready;
                self.hold_started_at = None;
                Transition::Ready
            }
            _ => Transition::Ignored,
        }
    }

    pub fn end_hold(&mut self, now: Instant) -> Transition {
        // A deadline that already passed counts even if the tick that
        // would have delivered it has not run yet.
        self.poll(now);

        match self.phase {
            TimerPhase::Idle => Transition::Ignored,
            TimerPhase::Running => {
                self.phase = TimerPhase::Idle;
                Transition::Finished
            }
            TimerPhase::Holding => {
                self.phase = TimerPhase::Idle;
                self.hold_started_at = None;
                Transition::Cancelled
            }
            TimerPhase::Ready => {
                self.phase = TimerPhase::Running;
                Transition::Started
            }
        }
    }

    pub fn ready_deadline(&self) -> Option<Instant> {
        match (self.phase, self.hold_started_at) {
            (TimerPhase::Holding, Some(started)) => Some(started + self.hold_duration),
            _ => None,
        }
    }

    /// Fraction of the hold completed, for the progress bar.
    pub fn hold_progress(&self, now: Instant) -> f64 {
        match (self.phase, self.hold_started_at) {
            (TimerPhase::Ready, _) => 1.0,
            (TimerPhase::Holding, Some(started)) => {
                if self.hold_duration.is_zero() {
                    return 1.0;
                }
                let held = now.saturating_duration_since(started).as_secs_f64();
                (held / self.hold_duration.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

impl Default for HoldController {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_DURATION)
    }
}
