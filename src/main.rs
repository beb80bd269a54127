use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    Event as TermEvent, KeyCode, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;

use airtime::collab::{Clock, SystemClock};
use airtime::config::Config;
use airtime::daylist::DayListController;
use airtime::demo::{DigitBuffer, Lineup, ProviderReply, SyntheticSource};
use airtime::error::GuideError;
use airtime::grid::{DrawOptions, GridController};
use airtime::keys::{Key, KeyInput};
use airtime::programme::ServiceId;
use airtime::ui::{DayListView, GridView, map_key, render_day_list, render_grid};
use airtime::Result;

/// Messages from the blocking input reader into the event loop.
enum AppMsg {
    Input(KeyInput),
    ToggleFocus,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    Grid,
    DayList,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Config::load()?;
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &config).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
) -> Result<()> {
    let clock = SystemClock;
    let now = clock.now_ms();
    let tuning = config.tuning();

    let services: Vec<(ServiceId, String)> = [
        "BBC One", "BBC Two", "ITV1", "Channel 4", "Channel 5", "Sky Arts", "Film4", "Dave",
        "E4", "More4", "Yesterday", "Drama",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| (ServiceId(i as u32 + 1), (*name).to_string()))
    .collect();
    let mut lineup = Lineup::new(services, 6);
    let mut digits = DigitBuffer::default();

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ProviderReply>();
    let mut programme_source = SyntheticSource::new(reply_tx.clone(), now);
    let mut bounds_source = programme_source.clone();
    let mut day_source = programme_source.clone();

    let mut grid = GridController::new(tuning.clone());
    let mut grid_view = GridView::new(terminal.size()?.width.saturating_sub(12));
    grid_view.set_channel_names(lineup.names());
    grid.initialise(now, &lineup);
    grid.draw_grid(now, DrawOptions::default(), &mut programme_source, &mut grid_view);

    let mut daylist = DayListController::new(tuning);
    let mut list_view = DayListView::new();
    let mut list_service = lineup.selected_service();
    daylist.initialise(list_service, now);
    daylist.set_preview(true);
    daylist.load_day_data(false, false, now, &mut day_source);

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<AppMsg>();
    let release_events = matches!(supports_keyboard_enhancement(), Ok(true));
    std::thread::spawn(move || read_input(&msg_tx, release_events));

    let mut focus = Focus::Grid;
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            Some(msg) = msg_rx.recv() => {
                let now = clock.now_ms();
                match msg {
                    AppMsg::Quit => break,
                    AppMsg::ToggleFocus => {
                        focus = match focus {
                            Focus::Grid => Focus::DayList,
                            Focus::DayList => Focus::Grid,
                        };
                        daylist.set_preview(focus == Focus::Grid);
                        daylist.update_control_buttons(now, &mut list_view);
                    }
                    AppMsg::Input(input) => {
                        let handled = match focus {
                            Focus::Grid => grid.handle_key(
                                input,
                                now,
                                &mut lineup,
                                &mut digits,
                                &mut programme_source,
                                &mut grid_view,
                            ),
                            Focus::DayList => daylist.handle_key(
                                input,
                                now,
                                &mut lineup,
                                &mut day_source,
                                &mut list_view,
                            ),
                        };
                        if !handled.consumed() && input.key == Key::Back {
                            break;
                        }
                        if let Some(number) = digits.take_committed() {
                            if lineup.select_number(number) {
                                info!(number, "direct channel entry");
                                grid.focus_on_now_event(
                                    now,
                                    &mut lineup,
                                    &mut programme_source,
                                    &mut grid_view,
                                );
                            }
                        }
                        if lineup.selected_service() != list_service {
                            list_service = lineup.selected_service();
                            daylist.initialise(list_service, now);
                            daylist.set_preview(focus == Focus::Grid);
                            daylist.load_day_data(false, false, now, &mut day_source);
                        }
                    }
                }
            }
            Some(reply) = reply_rx.recv() => {
                let now = clock.now_ms();
                match reply {
                    ProviderReply::Grid(batch) => {
                        grid.on_window_data(batch, now, &mut lineup, &mut grid_view);
                    }
                    ProviderReply::Day(batch) => {
                        daylist.on_day_data(batch, now, &mut list_view);
                    }
                    ProviderReply::Bounds(update) => {
                        daylist.on_bounds(update);
                        grid.on_bounds(update, now, &mut grid_view);
                    }
                }
            }
            _ = ticker.tick() => {
                let now = clock.now_ms();
                grid.poll_timers(now, &mut programme_source, &mut bounds_source, &mut grid_view);
                daylist.poll_timers(now, &mut day_source);
            }
        }

        grid_view.set_window(grid.window());
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(f.area());
            render_grid(f, &grid_view, chunks[0]);
            render_day_list(f, &list_view, chunks[1]);
        })?;
    }
    Ok(())
}

/// Blocking input reader. When the terminal cannot report key releases, a
/// release is synthesized after every navigational press so the deferred
/// fetch-on-release path still runs.
fn read_input(tx: &mpsc::UnboundedSender<AppMsg>, release_events: bool) {
    loop {
        let event = match crossterm::event::read() {
            Ok(event) => event,
            Err(_) => return,
        };
        let TermEvent::Key(key) = event else {
            continue;
        };
        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Char('q') => {
                    let _ = tx.send(AppMsg::Quit);
                    return;
                }
                KeyCode::Tab => {
                    let _ = tx.send(AppMsg::ToggleFocus);
                    continue;
                }
                _ => {}
            }
        }
        let Some(input) = map_key(&key) else {
            continue;
        };
        if tx.send(AppMsg::Input(input)).is_err() {
            return;
        }
        if !release_events && !input.repeat {
            if let Some(release) = input.key.release_counterpart() {
                let _ = tx.send(AppMsg::Input(KeyInput::press(release)));
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if matches!(supports_keyboard_enhancement(), Ok(true)) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Terminal::new(CrosstermBackend::new(stdout)).map_err(GuideError::Terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    if matches!(supports_keyboard_enhancement(), Ok(true)) {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the guide.
fn init_tracing() {
    let path = std::env::temp_dir().join("airtime.log");
    if let Ok(file) = std::fs::File::create(path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}
