use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

use crate::sync::worker::SyncEvent;

/// Input events carry the instant they were read off the terminal, so time
/// spent drawing does not shift hold and stop instants.
pub enum AppEvent {
    Key(KeyEvent, Instant),
    Mouse(MouseEvent, Instant),
    Sync(SyncEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

/// Funnels terminal input and background results into one channel so the
/// UI thread handles them strictly in arrival order.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if !event::poll(poll_rate).unwrap_or(false) {
                    continue;
                }
                let read = event::read();
                let at = Instant::now();
                let forwarded = match read {
                    Ok(Event::Key(key)) => input_tx.send(AppEvent::Key(key, at)),
                    Ok(Event::Mouse(mouse)) => input_tx.send(AppEvent::Mouse(mouse, at)),
                    Ok(Event::Resize(w, h)) => input_tx.send(AppEvent::Resize(w, h)),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for background workers posting results back to the UI.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    /// Wait for the next event, or return `Tick` once `deadline` passes.
    pub fn next_until(&self, deadline: Instant) -> anyhow::Result<AppEvent> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(event),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(AppEvent::Tick),
            Err(e) => Err(e.into()),
        }
    }
}
