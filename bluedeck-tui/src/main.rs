/*!
 * BLUEDECK Bluetooth Quick Access Panel
 * Paired devices at a glance, one keypress from connected
 * Onyx Digital Intelligence Development LLC
 */

use anyhow::Result;
use bluedeck_core::{DaemonClient, MANUAL_REFRESH_DELAY};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::time::{interval, Duration, Instant};

mod app;
mod ui;

use app::App;
use ui::render_ui;

#[derive(Parser)]
#[command(name = "bluedeck")]
#[command(about = "BLUEDECK Bluetooth Quick Access Panel")]
struct Cli {
    /// Daemon socket path
    #[arg(short, long, default_value = "/run/bluedeck/bluedeck.sock")]
    socket: String,

    /// Delay before a manual refresh shows its result, in milliseconds
    #[arg(long, default_value_t = MANUAL_REFRESH_DELAY.as_millis() as u64)]
    refresh_delay_ms: u64,

    /// Refresh in the background every N seconds (0 disables polling)
    #[arg(long, default_value_t = 10)]
    poll_secs: u64,

    /// Log file (defaults to bluedeck.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to a file so the terminal stays clean
    let log_level = if cli.debug { "debug" } else { "info" };
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("bluedeck.log"));
    tracing_subscriber::fmt()
        .with_env_filter(format!("bluedeck_tui={log_level},bluedeck_core={log_level}"))
        .with_writer(Mutex::new(std::fs::File::create(&log_path)?))
        .with_ansi(false)
        .init();

    tracing::info!("BLUEDECK panel starting, daemon socket: {}", cli.socket);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize app
    let client = DaemonClient::new(&cli.socket);
    let mut app = App::new(client, Duration::from_millis(cli.refresh_delay_ms));

    let result = run_panel(&mut terminal, &mut app, cli.poll_secs).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_panel(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<DaemonClient>,
    poll_secs: u64,
) -> Result<()> {
    let poll_every = (poll_secs > 0).then(|| Duration::from_secs(poll_secs));
    let mut last_poll = Instant::now();

    // Create ticker for UI updates
    let mut ticker = interval(Duration::from_millis(100));
    let mut dirty = true;

    loop {
        // Handle events
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_device(),
                    KeyCode::Down | KeyCode::Char('j') => app.next_device(),
                    KeyCode::Enter => app.toggle_connection(),
                    KeyCode::Char('f') => app.forget_device(),
                    KeyCode::Char('r') => {
                        app.refresh();
                        last_poll = Instant::now();
                    }
                    _ => {}
                }
                dirty = true;
            }
        }

        if let Some(every) = poll_every {
            if last_poll.elapsed() >= every {
                app.poll();
                last_poll = Instant::now();
                dirty = true;
            }
        }

        ticker.tick().await;
        dirty |= app.drain_actions();
        app.tick();

        // Only repaint when something changed or the spinner is turning
        if dirty || app.store.state().loading {
            terminal.draw(|f| render_ui(f, app))?;
            dirty = false;
        }
    }
}
