//! SkratchPad: a small terminal editor for Python scripts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p skratchpad -- [--theme dark|light] [--no-highlight] [--log PATH] [FILE]
//! ```
//!
//! # Keys
//!
//! - F1 / Ctrl+N: new file (asks for confirmation)
//! - F2 / Ctrl+O: open a file
//! - F3 / Ctrl+S: save (asks for a path the first time)
//! - F4 / Ctrl+T: toggle syntax highlighting
//! - Ctrl+Q: quit
//! - Arrows, Home/End, Ctrl+Home/End, PageUp/PageDown: move the cursor
//!
//! The bar buttons can also be clicked with the mouse.

mod app;
mod config;
mod dialog;
mod theme;
mod ui;

use anyhow::Context;
use app::App;
use config::{CliAction, USAGE};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::File,
    io::{self, Stdout, stdout},
    path::Path,
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};
use theme::Theme;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<ExitCode> {
    let config = match config::parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Ok(CliAction::Version) => {
            println!("skratchpad {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    info!(?config, "skratchpad starting");

    let mut app = App::new(Theme::from_name(config.theme), config.highlighting)
        .context("failed to build the Python highlighter")?;
    if let Some(path) = &config.file {
        app.open_startup_file(path);
    }

    let mut terminal = setup_terminal().context("failed to initialize the terminal")?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal).context("failed to restore the terminal")?;

    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
    }
    result?;
    info!("skratchpad exiting");
    Ok(ExitCode::SUCCESS)
}

/// Send tracing output to `path`. The terminal belongs to the UI, so nothing goes to stderr.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()
}

fn run_app(terminal: &mut Tui, app: &mut App) -> anyhow::Result<()> {
    let mut title = String::new();
    loop {
        let window_title = app.shell().window_title();
        if window_title != title {
            execute!(terminal.backend_mut(), SetTitle(&window_title))?;
            title = window_title;
        }

        terminal.draw(|f| ui::render(app, f))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                // Redrawn on the next iteration.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
