use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, MouseEvent};

use crate::auth::AuthContext;
use crate::config::{Config, MAX_HOLD_DURATION_MS, MAX_SCRAMBLE_LENGTH, MIN_SCRAMBLE_LENGTH};
use crate::engine::hold::TimerPhase;
use crate::engine::stats::StatsSummary;
use crate::session::input::{HoldInput, HoldSignal};
use crate::session::solve::SolveRecord;
use crate::session::timer::TimerSession;
use crate::store::json_store::JsonStore;
use crate::sync::worker::{SyncEvent, SyncJob, SyncWorker};
use crate::sync::{Credentials, Registration, SyncError};
use crate::ui::components::stats_panel::StatsSource;
use crate::ui::form::Form;
use crate::ui::theme::Theme;

/// How long the loop may sleep when nothing is scheduled.
pub const IDLE_TICK: Duration = Duration::from_millis(250);

const HOLD_STEP_MS: u64 = 100;
pub const SETTINGS_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Timer,
    Login,
    Register,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub timer: TimerSession,
    pub auth: AuthContext,
    pub remote_stats: Option<StatsSummary>,
    pub show_stats: bool,
    pub login_form: Form,
    pub register_form: Form,
    pub settings_selected: usize,
    pub input: HoldInput,
    pub should_quit: bool,
    sync: Option<SyncWorker>,
}

impl App {
    /// `release_events` tells the input layer whether the terminal reports
    /// key releases.
    pub fn new(config: Config, store: Option<JsonStore>, release_events: bool) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        Self {
            screen: AppScreen::Timer,
            timer: TimerSession::new(&config),
            auth: AuthContext::init(store),
            input: HoldInput::new(release_events, config.release_fallback()),
            remote_stats: None,
            show_stats: false,
            login_form: Form::login(),
            register_form: Form::register(),
            settings_selected: 0,
            should_quit: false,
            sync: None,
            theme,
            config,
        }
    }

    /// Hand the app its background worker and pull stats for a restored login.
    pub fn attach_sync(&mut self, worker: SyncWorker) {
        self.sync = Some(worker);
        self.refresh_stats();
    }

    pub fn is_sync_attached(&self) -> bool {
        self.sync.is_some()
    }

    /// Feed a hold-key event stamped at `now`.
    pub fn on_hold_key(&mut self, key: &KeyEvent, now: Instant) {
        if let Some(signal) = self.input.on_key(key, now) {
            self.handle_hold_signal(signal, now);
        }
    }

    pub fn on_hold_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        if let Some(signal) = self.input.on_mouse(mouse) {
            self.handle_hold_signal(signal, now);
        }
    }

    pub fn handle_hold_signal(&mut self, signal: HoldSignal, now: Instant) {
        match signal {
            // Without release events the stop release would only be seen
            // after the fallback delay, so the press stops the solve.
            HoldSignal::Begin
                if !self.input.release_events() && self.timer.phase() == TimerPhase::Running =>
            {
                self.finish_hold(now);
            }
            HoldSignal::Begin => {
                self.timer.begin_hold(now);
            }
            HoldSignal::End => self.finish_hold(now),
        }
    }

    fn finish_hold(&mut self, now: Instant) {
        if let Some(record) = self.timer.end_hold(now) {
            self.upload_solve(record);
        }
    }

    /// Run whatever came due: inferred key releases, the ready deadline and
    /// the display sample.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some((signal, at)) = self.input.poll(now) {
            self.handle_hold_signal(signal, at);
        }
        let held_until = self.input.held_until(now);
        self.timer.tick_held(held_until, now);
    }

    /// When the event loop has to wake up next if no input arrives. While a
    /// key hold is being inferred the ready transition waits for the next
    /// repeated press, so its deadline is not a wakeup.
    pub fn next_wakeup(&self, now: Instant) -> Instant {
        let timer = if self.input.is_inferring() {
            self.timer.next_sample_due()
        } else {
            self.timer.next_wakeup()
        };
        [timer, self.input.deadline()]
            .into_iter()
            .flatten()
            .fold(now + IDLE_TICK, Instant::min)
    }

    pub fn can_quit(&self) -> bool {
        self.timer.phase() == TimerPhase::Idle
    }

    /// Remote summary when the backend has provided one, else this run's.
    pub fn stats_view(&self) -> (StatsSummary, StatsSource) {
        match self.remote_stats {
            Some(summary) => (summary, StatsSource::AllTime),
            None => (self.timer.times().summary(), StatsSource::Session),
        }
    }

    pub fn user_display_name(&self) -> Option<&str> {
        self.auth.user().and_then(|u| u.display_name())
    }

    fn upload_solve(&mut self, record: SolveRecord) {
        let Some(token) = self.auth.token() else {
            return;
        };
        let job = SyncJob::AppendLogs {
            token: token.to_string(),
            records: vec![record],
        };
        if let Some(ref worker) = self.sync {
            if !worker.submit(job) {
                tracing::warn!("sync worker is gone, solve not uploaded");
            }
        }
    }

    pub fn refresh_stats(&mut self) {
        if let (Some(token), Some(worker)) = (self.auth.token(), self.sync.as_ref()) {
            worker.submit(SyncJob::FetchStats {
                token: token.to_string(),
            });
        }
    }

    pub fn submit_login(&mut self) {
        let values = self.login_form.values();
        let job = SyncJob::Login(Credentials {
            username: values[0].clone(),
            password: values[1].clone(),
        });
        if !self.submit_job(job) {
            self.login_form
                .finish(SyncError::Disabled.user_message(), false);
        }
    }

    pub fn submit_register(&mut self) {
        let values = self.register_form.values();
        let job = SyncJob::Register(Registration {
            name: values[0].clone(),
            username: values[1].clone(),
            password: values[2].clone(),
        });
        if !self.submit_job(job) {
            self.register_form
                .finish(SyncError::Disabled.user_message(), false);
        }
    }

    fn submit_job(&self, job: SyncJob) -> bool {
        self.sync.as_ref().is_some_and(|w| w.submit(job))
    }

    pub fn handle_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::LoginFinished(response) => {
                self.login_form
                    .finish(response.message_or_empty(), response.success);
                let data = match response.data {
                    Some(data) if response.success => data,
                    _ => return,
                };
                let name = data.user.display_name().unwrap_or_default().to_string();
                if let Err(e) = self.auth.login(data.token, data.user) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
                tracing::info!(user = %name, "logged in");
                self.login_form.reset();
                self.refresh_stats();
                self.screen = AppScreen::Timer;
            }
            SyncEvent::RegisterFinished(response) => {
                self.register_form
                    .finish(response.message_or_empty(), response.success);
            }
            SyncEvent::StatsRefreshed(summary) => {
                if self.auth.is_authenticated() {
                    self.remote_stats = Some(summary);
                }
            }
            SyncEvent::StatsUnavailable(_) => {}
        }
    }

    pub fn logout(&mut self) {
        if !self.auth.is_authenticated() {
            return;
        }
        if let Err(e) = self.auth.logout() {
            tracing::warn!(error = %e, "failed to clear saved session");
        }
        self.remote_stats = None;
        tracing::info!("logged out");
    }

    pub fn new_scramble(&mut self) {
        if self.can_quit() {
            self.timer.new_scramble();
        }
    }

    pub fn clear_times(&mut self) {
        if self.can_quit() && !self.timer.times().is_empty() {
            self.timer.clear_times();
        }
    }

    pub fn go_to_timer(&mut self) {
        self.screen = AppScreen::Timer;
    }

    pub fn go_to_login(&mut self) {
        if !self.login_form.pending {
            self.login_form.reset();
        }
        self.screen = AppScreen::Login;
    }

    pub fn go_to_register(&mut self) {
        if !self.register_form.pending {
            self.register_form.reset();
        }
        self.screen = AppScreen::Register;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.hold_duration_ms =
                    (self.config.hold_duration_ms + HOLD_STEP_MS).min(MAX_HOLD_DURATION_MS);
                self.timer.set_hold_duration(self.config.hold_duration());
            }
            1 => {
                self.config.scramble_length =
                    (self.config.scramble_length + 1).min(MAX_SCRAMBLE_LENGTH);
                self.timer.set_scramble_length(self.config.scramble_length);
            }
            2 => self.cycle_theme(true),
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => {
                self.config.hold_duration_ms =
                    self.config.hold_duration_ms.saturating_sub(HOLD_STEP_MS);
                self.timer.set_hold_duration(self.config.hold_duration());
            }
            1 => {
                self.config.scramble_length = self
                    .config
                    .scramble_length
                    .saturating_sub(1)
                    .max(MIN_SCRAMBLE_LENGTH);
                self.timer.set_scramble_length(self.config.scramble_length);
            }
            2 => self.cycle_theme(false),
            _ => {}
        }
    }

    fn cycle_theme(&mut self, forward: bool) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let next = match themes.iter().position(|t| *t == self.config.theme) {
            Some(idx) if forward => (idx + 1) % themes.len(),
            Some(idx) => (idx + themes.len() - 1) % themes.len(),
            None => 0,
        };
        self.config.theme = themes[next].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
        }
    }

    /// Persist settings and leave the settings screen.
    pub fn save_settings(&mut self) {
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to save config");
        }
        self.screen = AppScreen::Timer;
    }
}
