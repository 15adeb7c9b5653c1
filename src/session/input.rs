use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

pub const DEFAULT_RELEASE_FALLBACK: Duration = Duration::from_millis(650);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldSignal {
    Begin,
    End,
}

/// Turns space-bar and left-mouse events into begin/end hold signals.
///
/// Terminals without keyboard enhancement never report key releases; they
/// only send repeated presses while the key is down. In that mode a release
/// is inferred once no press has arrived for `release_fallback`, and it is
/// dated at the last press seen, not at the moment it is inferred.
pub struct HoldInput {
    release_events: bool,
    release_fallback: Duration,
    key_down: bool,
    last_key_press: Option<Instant>,
    mouse_down: bool,
}

impl HoldInput {
    pub fn new(release_events: bool, release_fallback: Duration) -> Self {
        Self {
            release_events,
            release_fallback,
            key_down: false,
            last_key_press: None,
            mouse_down: false,
        }
    }

    /// Whether the terminal reports key releases.
    pub fn release_events(&self) -> bool {
        self.release_events
    }

    /// A hold key is down and its release will have to be inferred.
    pub fn is_inferring(&self) -> bool {
        !self.release_events && self.key_down
    }

    /// Latest instant the hold is known to still be down. While inferring
    /// that is the last press; otherwise `now`.
    pub fn held_until(&self, now: Instant) -> Instant {
        match self.last_key_press {
            Some(at) if self.is_inferring() => at.min(now),
            _ => now,
        }
    }

    pub fn is_hold_key(key: &KeyEvent) -> bool {
        key.code == KeyCode::Char(' ')
    }

    pub fn on_key(&mut self, key: &KeyEvent, now: Instant) -> Option<HoldSignal> {
        if !Self::is_hold_key(key) {
            return None;
        }

        if self.release_events {
            return match key.kind {
                KeyEventKind::Press if !self.key_down => {
                    self.key_down = true;
                    Some(HoldSignal::Begin)
                }
                KeyEventKind::Release if self.key_down => {
                    self.key_down = false;
                    Some(HoldSignal::End)
                }
                _ => None,
            };
        }

        if key.kind == KeyEventKind::Release {
            return None;
        }
        self.last_key_press = Some(now);
        if self.key_down {
            return None;
        }
        self.key_down = true;
        Some(HoldSignal::Begin)
    }

    pub fn on_mouse(&mut self, mouse: &MouseEvent) -> Option<HoldSignal> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if !self.mouse_down => {
                self.mouse_down = true;
                Some(HoldSignal::Begin)
            }
            MouseEventKind::Up(MouseButton::Left) if self.mouse_down => {
                self.mouse_down = false;
                Some(HoldSignal::End)
            }
            _ => None,
        }
    }

    /// Infer a key release when the terminal cannot report one. The release
    /// is dated at the last press: auto-repeat keeps that within one repeat
    /// interval of the real release.
    pub fn poll(&mut self, now: Instant) -> Option<(HoldSignal, Instant)> {
        match (self.deadline(), self.last_key_press) {
            (Some(deadline), Some(released_at)) if now >= deadline => {
                self.key_down = false;
                self.last_key_press = None;
                Some((HoldSignal::End, released_at))
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        if self.release_events || !self.key_down {
            return None;
        }
        self.last_key_press.map(|at| at + self.release_fallback)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn space(kind: KeyEventKind) -> KeyEvent {
        key(KeyCode::Char(' '), kind)
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_press_release_with_enhancement() {
        let t0 = Instant::now();
        let mut input = HoldInput::new(true, DEFAULT_RELEASE_FALLBACK);
        assert_eq!(input.on_key(&space(KeyEventKind::Press), t0), Some(HoldSignal::Begin));
        assert_eq!(input.on_key(&space(KeyEventKind::Repeat), t0), None);
        assert_eq!(input.on_key(&space(KeyEventKind::Press), t0), None);
        assert_eq!(input.on_key(&space(KeyEventKind::Release), t0), Some(HoldSignal::End));
        assert!(input.deadline().is_none());
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut input = HoldInput::new(true, DEFAULT_RELEASE_FALLBACK);
        let ev = key(KeyCode::Char('n'), KeyEventKind::Press);
        assert_eq!(input.on_key(&ev, Instant::now()), None);
    }

    #[test]
    fn test_release_inferred_without_enhancement() {
        let t0 = Instant::now();
        let fallback = Duration::from_millis(650);
        let mut input = HoldInput::new(false, fallback);
        assert_eq!(input.on_key(&space(KeyEventKind::Press), t0), Some(HoldSignal::Begin));

        // Auto-repeat keeps the hold alive.
        let repeat_at = t0 + Duration::from_millis(500);
        assert_eq!(input.on_key(&space(KeyEventKind::Press), repeat_at), None);
        assert_eq!(input.deadline(), Some(repeat_at + fallback));
        assert_eq!(input.poll(repeat_at + Duration::from_millis(100)), None);
        assert!(input.is_inferring());
        assert_eq!(input.held_until(repeat_at + Duration::from_millis(100)), repeat_at);

        assert_eq!(
            input.poll(repeat_at + fallback),
            Some((HoldSignal::End, repeat_at))
        );
        assert!(input.deadline().is_none());
        assert!(!input.is_inferring());
    }

    #[test]
    fn test_inferred_release_is_dated_at_last_press() {
        let t0 = Instant::now();
        let mut input = HoldInput::new(false, DEFAULT_RELEASE_FALLBACK);
        input.on_key(&space(KeyEventKind::Press), t0);
        let late = t0 + Duration::from_secs(2);
        assert_eq!(input.poll(late), Some((HoldSignal::End, t0)));
        assert_eq!(input.poll(late), None);
    }

    #[test]
    fn test_held_until_is_now_with_enhancement() {
        let t0 = Instant::now();
        let mut input = HoldInput::new(true, DEFAULT_RELEASE_FALLBACK);
        input.on_key(&space(KeyEventKind::Press), t0);
        let later = t0 + Duration::from_millis(800);
        assert!(!input.is_inferring());
        assert_eq!(input.held_until(later), later);
    }

    #[test]
    fn test_mouse_button_maps_to_hold() {
        let mut input = HoldInput::new(true, DEFAULT_RELEASE_FALLBACK);
        assert_eq!(
            input.on_mouse(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(HoldSignal::Begin)
        );
        assert_eq!(
            input.on_mouse(&mouse(MouseEventKind::Down(MouseButton::Right))),
            None
        );
        assert_eq!(
            input.on_mouse(&mouse(MouseEventKind::Up(MouseButton::Left))),
            Some(HoldSignal::End)
        );
        assert_eq!(
            input.on_mouse(&mouse(MouseEventKind::Up(MouseButton::Left))),
            None
        );
    }
}
