use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;

mod app;
mod config;
mod format;
mod ipc;
mod persistence;
mod task;
mod ui;

use app::{App, AppMode};
use persistence::Persistence;

fn main() -> Result<()> {
    init_logging();

    // Load or create app
    let config = config::load_config()?;
    let app = match Persistence::load()? {
        Some(mut app) => {
            app.config = config;
            app
        }
        None => App::new(config),
    };
    let state = Arc::new(Mutex::new(app));

    // The IPC server gets its own runtime thread; the TUI loop stays synchronous
    let ipc_state = state.clone();
    std::thread::spawn(move || match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => {
            if let Err(e) = runtime.block_on(ipc::server::start(ipc_state)) {
                error!("IPC server stopped: {e}");
            }
        }
        Err(e) => error!("could not build IPC runtime: {e}"),
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, state.clone());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    let app = lock(&state)?;
    Persistence::save(&app)?;

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, state: Arc<Mutex<App>>) -> Result<()> {
    let mut last_save = std::time::Instant::now();

    loop {
        {
            let mut app = lock(&state)?;
            // the recurring tick that refreshes the elapsed-time snapshot
            app.on_tick(Local::now().timestamp_millis());
            terminal.draw(|f| ui::draw(f, &app))?;

            if app.should_quit {
                return Ok(());
            }

            // Auto-save every 5 seconds
            if last_save.elapsed().as_secs() > 5 {
                Persistence::save(&app)?;
                last_save = std::time::Instant::now();
            }
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let now = Local::now().timestamp_millis();
                    let mut app = lock(&state)?;
                    match app.mode {
                        AppMode::Normal => match key.code {
                            KeyCode::Char('q') => {
                                app.should_quit = true;
                            }
                            KeyCode::Char('s') => app.open_name_input(),
                            KeyCode::Char(' ') => {
                                if let Err(e) = app.toggle_pause(now) {
                                    tracing::debug!(error = %e, "pause/resume ignored");
                                }
                            }
                            KeyCode::Char('r') => app.open_rename_input(),
                            KeyCode::Char('c') => match app.complete_task(now) {
                                Ok(done) => app.notify_completion(&done),
                                Err(e) => tracing::debug!(error = %e, "complete ignored"),
                            },
                            KeyCode::Char('?') => app.mode = AppMode::ShowHelp,
                            _ => {}
                        },
                        AppMode::NamingTask | AppMode::RenamingTask => match key.code {
                            KeyCode::Esc => app.cancel_input(),
                            KeyCode::Enter => app.handle_char('\n', now),
                            KeyCode::Backspace => app.handle_backspace(),
                            KeyCode::Char(c) => app.handle_char(c, now),
                            _ => {}
                        },
                        AppMode::ShowHelp => match key.code {
                            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => {
                                app.mode = AppMode::Normal;
                            }
                            _ => {}
                        },
                    }
                }
            }
        }
    }
}

fn lock(state: &Arc<Mutex<App>>) -> Result<MutexGuard<'_, App>> {
    state
        .lock()
        .map_err(|_| anyhow::anyhow!("app state lock poisoned"))
}

/// Logs go to a file under the data dir; the terminal belongs to the TUI.
fn init_logging() {
    let Some(proj_dirs) = directories::ProjectDirs::from("com", "pabloagn", "tempo") else {
        return;
    };
    let dir = proj_dirs.data_dir();
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }
    if let Ok(file) = std::fs::File::create(dir.join("tempo.log")) {
        tracing_subscriber::fmt()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
}
