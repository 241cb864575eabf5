use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioPlayer;
use crate::config;
use crate::error::Result;
use crate::player::{MediaElement, Player};
use crate::ui::{self, Control, Regions, percent_at};

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Playlist row under keyboard focus.
    pub cursor: usize,
    /// Mouse targets of the last drawn frame.
    pub regions: Regions,
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Pointer is over the volume icon or its flyout.
    hovering_volume: bool,
    /// Left button went down on the volume slider and is still held.
    dragging_volume: bool,
}

impl EventLoopState {
    pub fn new(cursor: usize) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }
}

/// Main terminal event loop: forwards media notifications to the player,
/// draws, and dispatches input. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut Player<AudioPlayer>,
    state: &mut EventLoopState,
) -> Result<()> {
    loop {
        let events = player.media().pending_events();
        for event in events {
            player.handle_media_event(event);
        }
        player.tick(Instant::now());

        terminal.draw(|f| {
            state.regions = ui::draw(f, player, state.cursor, &settings.ui, &settings.controls);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, &settings.controls, player, state, Instant::now()) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, &settings.controls, player, state, Instant::now());
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Move the cursor onto the playing track.
fn follow_current<M: MediaElement>(player: &Player<M>, state: &mut EventLoopState) {
    state.cursor = player.state().current_track_index;
}

/// Reveal the flyout after a key-driven volume change. With the pointer
/// already on it, it stays until the pointer leaves.
fn show_volume<M: MediaElement>(player: &mut Player<M>, state: &EventLoopState, now: Instant) {
    if state.hovering_volume {
        player.volume_pointer_enter();
    } else {
        player.flash_volume(now);
    }
}

/// Handle a key press. Returns `true` when the user asked to quit.
pub fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    controls: &config::ControlsSettings,
    player: &mut Player<M>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    let last = player.catalog().len() - 1;
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle_play(),
        KeyCode::Char('l') => {
            player.next();
            follow_current(player, state);
        }
        KeyCode::Char('h') => {
            player.previous();
            follow_current(player, state);
        }
        KeyCode::Char('L') => player.seek_forward(),
        KeyCode::Char('H') => player.seek_backward(),
        KeyCode::Char('j') | KeyCode::Down => state.cursor = (state.cursor + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => state.cursor = state.cursor.saturating_sub(1),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                state.cursor = 0;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => state.cursor = last,
        KeyCode::Enter => {
            player.select_track(state.cursor);
        }
        KeyCode::Char('m') => {
            player.toggle_mute();
            show_volume(player, state, now);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.adjust_volume(controls.volume_step);
            show_volume(player, state, now);
        }
        KeyCode::Char('-') => {
            player.adjust_volume(-controls.volume_step);
            show_volume(player, state, now);
        }
        _ => {}
    }

    false
}

fn activate<M: MediaElement>(control: Control, player: &mut Player<M>, state: &mut EventLoopState) {
    match control {
        Control::Previous => {
            player.previous();
            follow_current(player, state);
        }
        Control::Rewind => player.seek_backward(),
        Control::PlayPause => player.toggle_play(),
        Control::Forward => player.seek_forward(),
        Control::Next => {
            player.next();
            follow_current(player, state);
        }
        Control::Volume => player.toggle_mute(),
    }
}

/// Handle a mouse event against the regions of the last drawn frame.
pub fn handle_mouse_event<M: MediaElement>(
    mouse: MouseEvent,
    controls: &config::ControlsSettings,
    player: &mut Player<M>,
    state: &mut EventLoopState,
    now: Instant,
) {
    let (column, row) = (mouse.column, mouse.row);

    // Hover over the icon or the flyout keeps the flyout open.
    let over_volume = state.regions.over_volume(column, row);
    if over_volume && !state.hovering_volume {
        player.volume_pointer_enter();
    } else if !over_volume && state.hovering_volume && !state.dragging_volume {
        player.volume_pointer_leave(now);
    }
    state.hovering_volume = over_volume;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(slider) = state.regions.volume_slider
                && state.regions.on_volume_slider(column, row)
            {
                state.dragging_volume = true;
                player.set_volume((percent_at(slider, column) / 100.0) as f32);
            } else if state.regions.on_seek_bar(column, row) {
                player.seek_pointer_down();
                player.seek_drag(percent_at(state.regions.seek_bar, column));
            } else if let Some(control) = state.regions.control_at(column, row) {
                activate(control, player, state);
            } else if let Some(index) = state.regions.track_at(column, row) {
                state.cursor = index;
                player.select_track(index);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.dragging_volume {
                if let Some(slider) = state.regions.volume_slider {
                    player.set_volume((percent_at(slider, column) / 100.0) as f32);
                }
            } else if player.state().is_seeking() {
                player.seek_drag(percent_at(state.regions.seek_bar, column));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.dragging_volume {
                state.dragging_volume = false;
                if !over_volume {
                    player.volume_pointer_leave(now);
                }
            } else if player.state().is_seeking() {
                player.seek_pointer_up(percent_at(state.regions.seek_bar, column));
            }
        }
        MouseEventKind::ScrollUp if over_volume => player.adjust_volume(controls.volume_step),
        MouseEventKind::ScrollDown if over_volume => player.adjust_volume(-controls.volume_step),
        MouseEventKind::ScrollUp => state.cursor = state.cursor.saturating_sub(1),
        MouseEventKind::ScrollDown => {
            state.cursor = (state.cursor + 1).min(player.catalog().len() - 1);
        }
        _ => {}
    }
}
