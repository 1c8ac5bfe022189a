use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use telecue_core::{AppConfig, Script};
use telecue_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    widgets::{PrompterWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig, config_path: PathBuf, file: &Path) -> Result<()> {
    let script = load_script(file)?;
    info!(
        script = %script.title(),
        source = ?script.source(),
        chars = script.text().len(),
        "Starting prompter"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();

    // Key release reports drive hold-to-repeat; without them every OS
    // repeat becomes a single nudge
    let release_events = supports_keyboard_enhancement().unwrap_or(false);
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableFocusChange,
        SetTitle(format!("telecue - {}", script.title()))
    )?;
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }
    info!(release_events, "Terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, script);
    app.release_events = release_events;

    let result = main_loop(&mut terminal, &mut app);

    // Restore terminal
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;

    // Keep speed, direction and display tweaks for the next session
    if let Err(e) = app.settings().save_to(&config_path) {
        warn!("Failed to save settings: {}", e);
    }

    Ok(())
}

fn main_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let event_handler = EventHandler::new(app.config.ui.frame_interval());
    let started = Instant::now();

    loop {
        // Run due frames and timers
        app.tick(started.elapsed());

        if app.take_redraw() {
            terminal.draw(|frame| {
                let (prompter, status) = App::split(frame.area());
                PrompterWidget::render(frame, prompter, app);
                StatusBarWidget::render(frame, status, app);
            })?;
        }

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => app.handle_key(key, started.elapsed()),
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::FocusLost => app.on_focus_lost(),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Read the script file, `-` reads standard input
fn load_script(file: &Path) -> Result<Script> {
    if file == Path::new("-") {
        return Script::from_reader(io::stdin().lock()).context("Failed to read script from stdin");
    }
    Script::load(file).with_context(|| format!("Failed to read script {}", file.display()))
}
