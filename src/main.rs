mod board;
mod config;
mod error;
mod notify;
mod scheduler;
mod storage;
mod task;
mod ui;

use board::TodoBoard;
use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::DesktopNotifier;
use ratatui::{backend::CrosstermBackend, Terminal};
use scheduler::{ReminderScheduler, SystemClock};
use std::io;
use std::path::Path;
use storage::{JsonFileStorage, MemoryStorage, Storage};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let data_dir = storage::data_dir();
    let _log_guard = data_dir.as_deref().and_then(init_logging);

    let config = data_dir.as_deref().map(Config::load).unwrap_or_default();

    let storage: Box<dyn Storage> = match &data_dir {
        Some(dir) => Box::new(JsonFileStorage::new(dir)),
        None => {
            warn!("no data directory available, tasks will not survive exit");
            Box::new(MemoryStorage::new())
        }
    };
    let mut board = TodoBoard::new(storage);
    board.restore();

    let mut scheduler = ReminderScheduler::new(
        Box::new(DesktopNotifier::new()),
        Box::new(SystemClock),
        config.reminder_interval_minutes,
    );
    scheduler.start(board.has_pending());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ui::App::new(board, scheduler, config, data_dir);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

/// File logging in the data directory; a TUI owns the terminal, so stderr is
/// not an option. Returns the guard keeping the background writer alive.
fn init_logging(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "todor.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
