mod app;
mod auth;
mod config;
mod engine;
mod event;
mod logging;
mod session;
mod store;
mod sync;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, MouseEvent, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen, SETTINGS_COUNT};
use config::Config;
use engine::hold::TimerPhase;
use event::{AppEvent, EventHandler};
use session::input::HoldInput;
use store::json_store::JsonStore;
use sync::client::ApiClient;
use sync::worker::SyncWorker;
use ui::components::auth_form::AuthForm;
use ui::components::recent_times::RecentTimes;
use ui::components::scramble_panel::ScramblePanel;
use ui::components::stats_panel::StatsPanel;
use ui::components::timer_display::TimerDisplay;
use ui::form::FormAction;
use ui::layout::{AppLayout, pack_hint_lines};

#[derive(Parser)]
#[command(name = "cubetimer", version, about = "Terminal speedcubing timer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Hold duration before the timer arms, in milliseconds")]
    hold: Option<u64>,

    #[arg(short, long, help = "Number of moves per scramble")]
    length: Option<usize>,

    #[arg(long, help = "Backend base URL")]
    api_url: Option<String>,

    #[arg(long, help = "Do not contact the backend")]
    offline: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(hold) = cli.hold {
        config.hold_duration_ms = hold;
    }
    if let Some(length) = cli.length {
        config.scramble_length = length;
    }
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if cli.offline {
        config.sync_enabled = false;
    }
    config.validate();

    // A missing log file is not worth refusing to start over.
    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("logging disabled: {e}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "config unreadable, using defaults");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Key releases are only reported with keyboard enhancement.
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false)
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
    tracing::debug!(keyboard_enhanced, "terminal input configured");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(20));
    let mut app = App::new(config, JsonStore::new().ok(), keyboard_enhanced);

    if app.config.sync_enabled {
        match ApiClient::new(&app.config.api_base_url, app.config.request_timeout()) {
            Ok(client) => {
                let tx = events.sender();
                let worker = SyncWorker::spawn(client, move |event| {
                    let _ = tx.send(AppEvent::Sync(event));
                });
                app.attach_sync(worker);
            }
            Err(e) => tracing::warn!(error = %e, "sync disabled"),
        }
    }

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    tracing::info!("shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let deadline = app.next_wakeup(Instant::now());
        match events.next_until(deadline)? {
            AppEvent::Key(key, at) => handle_key(app, key, at),
            AppEvent::Mouse(mouse, at) => handle_mouse(app, mouse, at),
            AppEvent::Sync(event) => app.handle_sync_event(event),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if app.screen != AppScreen::Timer {
        return;
    }
    app.on_hold_mouse(&mouse, now);
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.screen == AppScreen::Timer && HoldInput::is_hold_key(&key) {
        app.on_hold_key(&key, now);
        return;
    }

    // Releases and repeats only matter for the hold key
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.screen {
        AppScreen::Timer => handle_timer_key(app, key),
        AppScreen::Login => handle_login_key(app, key),
        AppScreen::Register => handle_register_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_timer_key(app: &mut App, key: KeyEvent) {
    if !app.can_quit() {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('n') => app.new_scramble(),
        KeyCode::Char('x') => app.clear_times(),
        KeyCode::Char('t') => app.show_stats = !app.show_stats,
        KeyCode::Char('l') => app.go_to_login(),
        KeyCode::Char('r') => app.go_to_register(),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Char('c') => app.go_to_settings(),
        _ => {}
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match app.login_form.handle(key) {
        FormAction::Submit => app.submit_login(),
        FormAction::Cancel => app.go_to_timer(),
        FormAction::Continue => {}
    }
}

fn handle_register_key(app: &mut App, key: KeyEvent) {
    match app.register_form.handle(key) {
        FormAction::Submit => app.submit_register(),
        FormAction::Cancel => app.go_to_timer(),
        FormAction::Continue => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.save_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_COUNT {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Timer => render_timer(frame, app),
        AppScreen::Login => render_form(frame, app, &app.login_form),
        AppScreen::Register => render_form(frame, app, &app.register_form),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let account = match app.user_display_name() {
        Some(name) => format!(" | Logged in as {name}"),
        None if app.is_sync_attached() => " | Not logged in".to_string(),
        None => " | Offline".to_string(),
    };
    let info = format!(
        " {} solves | hold {:.1}s{account}",
        app.timer.times().len(),
        app.timer.hold_duration().as_secs_f64(),
    );

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " cubetimer ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_timer(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let now = Instant::now();

    let scramble = app.timer.scramble();
    let sizing = AppLayout::new(area, 3, app.show_stats);
    let scramble_height = ScramblePanel::height_for(scramble, sizing.scramble.width);
    let layout = AppLayout::new(area, scramble_height, app.show_stats);

    render_header(frame, app, layout.header);

    let phase = app.timer.phase();
    let display = TimerDisplay::new(app.timer.elapsed_secs(), phase, app.theme)
        .hold(app.timer.hold_progress(now), app.timer.hold_duration())
        .big_digits(layout.tier.big_digits(area.height));
    frame.render_widget(display, layout.timer);
    frame.render_widget(ScramblePanel::new(scramble, app.theme), layout.scramble);

    if let Some(stats_area) = layout.stats {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(StatsPanel::HEIGHT), Constraint::Min(3)])
            .split(stats_area);

        let (summary, source) = app.stats_view();
        frame.render_widget(StatsPanel::new(summary, source, app.theme), split[0]);

        let times = app.timer.times();
        let recent = times.recent(app.config.recent_limit);
        frame.render_widget(RecentTimes::new(&recent, times.best(), app.theme), split[1]);
    }

    let mut hints: Vec<&str> = Vec::new();
    if phase == TimerPhase::Idle {
        hints.push("[n] New scramble");
        if !app.timer.times().is_empty() {
            hints.push("[x] Clear times");
        }
        if !layout.tier.show_sidebar() {
            hints.push("[t] Stats");
        }
        if app.auth.is_authenticated() {
            hints.push("[o] Log out");
        } else {
            hints.push("[l] Log in");
            hints.push("[r] Sign up");
        }
        hints.push("[c] Settings");
        hints.push("[q] Quit");
    } else {
        hints.push("Release to stop");
    }
    let footer_text = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_form(frame: &mut ratatui::Frame, app: &App, form: &ui::form::Form) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(50, 60, area);
    let widget = AuthForm::new(form, app.theme).logged_in_as(app.user_display_name());
    frame.render_widget(widget, centered);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 60, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: [(&str, String); SETTINGS_COUNT] = [
        (
            "Hold Duration",
            format!("{:.1}s", app.config.hold_duration().as_secs_f64()),
        ),
        ("Scramble Length", format!("{} moves", app.config.scramble_length)),
        ("Theme", app.config.theme.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change",
        Style::default().fg(colors.text_muted()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = if is_selected {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let value_style = Style::default().fg(if is_selected {
            colors.warning()
        } else {
            colors.text_muted()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Left/Right] Change value",
        Style::default().fg(colors.accent()),
    )))
    .render(layout[3], frame.buffer_mut());
}
