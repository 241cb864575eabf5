use std::env;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioPlayer;
use crate::catalog;
use crate::error::Result;
use crate::player::Player;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<()> {
    let settings = settings::load_settings();

    match logging::init_logging(&settings.log) {
        Ok(path) => tracing::info!(log = %path.display(), "vitrola starting"),
        Err(e) => eprintln!("vitrola: logging disabled: {e}"),
    }

    let source = startup::catalog_source(env::args().nth(1), &settings.catalog);
    let catalog = catalog::load(&source, &settings.catalog)?;
    tracing::info!(source = %source.display(), tracks = catalog.len(), "catalog loaded");

    let audio_player = AudioPlayer::new(&settings.audio)?;
    let mut player = Player::new(catalog, audio_player, startup::player_options(&settings));
    player.set_volume(settings.audio.initial_volume);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(player.state().current_track_index);
    let run_result = event_loop::run(&mut terminal, &settings, &mut player, &mut state);

    player.shutdown();
    player
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(%e, "event loop failed");
    }
    run_result
}
