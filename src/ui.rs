//! UI rendering helpers for the terminal user interface.
//!
//! [`draw`] renders the player with `ratatui` and reports where the clickable
//! parts ended up, so mouse events can be mapped back onto player actions.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{ControlsSettings, UiSettings};
use crate::player::{MediaElement, Player};

const SEEK_COLOR: Color = Color::Rgb(0x1a, 0x54, 0xd4);
const VOLUME_COLOR: Color = Color::Rgb(0xbe, 0x29, 0x29);
const FLYOUT_WIDTH: u16 = 24;
const FLYOUT_HEIGHT: u16 = 3;
/// Each playlist entry takes two rows: title, then artist.
const ROWS_PER_TRACK: u16 = 2;

const KEY_HELP: [(&str, &str); 9] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("m", "mute"),
    ("+/-", "volume"),
    ("click/drag", "seek & buttons"),
    ("q", "quit"),
];

/// Clickable transport controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Rewind,
    PlayPause,
    Forward,
    Next,
    Volume,
}

/// Screen areas of the last rendered frame that react to the mouse.
#[derive(Debug, Clone, Default)]
pub struct Regions {
    /// Visible playlist rows, with the catalog index each one shows.
    pub tracks: Vec<(usize, Rect)>,
    pub seek_bar: Rect,
    pub controls: Vec<(Control, Rect)>,
    /// The whole volume flyout, when shown.
    pub flyout: Option<Rect>,
    pub volume_slider: Option<Rect>,
}

impl Regions {
    pub fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        let pos = Position::new(column, row);
        self.controls
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(control, _)| *control)
    }

    pub fn track_at(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.tracks
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(index, _)| *index)
    }

    pub fn on_seek_bar(&self, column: u16, row: u16) -> bool {
        self.seek_bar.contains(Position::new(column, row))
    }

    pub fn on_volume_slider(&self, column: u16, row: u16) -> bool {
        self.volume_slider
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Over the volume icon or its flyout; both count as one hover target.
    pub fn over_volume(&self, column: u16, row: u16) -> bool {
        self.control_at(column, row) == Some(Control::Volume)
            || self
                .flyout
                .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

/// Percentage along `area` at `column`; the first cell is 0 and the last 100.
pub fn percent_at(area: Rect, column: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let last = area.width - 1;
    let offset = column.saturating_sub(area.x).min(last);
    f64::from(offset) / f64::from(last) * 100.0
}

/// Format a `Duration` as `M:SS`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render the key help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    let mut parts: Vec<String> = KEY_HELP
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect();
    parts.insert(2, format!("[H/L] seek -/+{}s", seek_seconds));
    parts.join(" | ")
}

/// A horizontal bar of `width` cells filled up to `percent`.
fn bar_line(percent: f64, width: u16, color: Color) -> Line<'static> {
    let width = usize::from(width);
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(color)),
        Span::styled("─".repeat(width - filled), Style::default().fg(Color::DarkGray)),
    ])
}

/// First visible entry of a window of `height` entries kept centered on `cursor`.
fn window_start(total: usize, height: usize, cursor: usize) -> usize {
    if total <= height || height == 0 {
        return 0;
    }
    let half = height / 2;
    let start = cursor.saturating_sub(half);
    start.min(total - height)
}

fn volume_label(muted: bool, volume: f32) -> String {
    if muted {
        "vol muted".to_string()
    } else {
        format!("vol {:>3}%", (volume * 100.0).round() as u32)
    }
}

/// Lay the transport buttons out left to right from `area.x`, one cell apart.
fn layout_controls(area: Rect, labels: &[(Control, String)]) -> Vec<(Control, Rect)> {
    let mut x = area.x;
    let right = area.x + area.width;
    let mut out = Vec::with_capacity(labels.len());
    for (control, label) in labels {
        let width = (label.chars().count() as u16).min(right.saturating_sub(x));
        out.push((*control, Rect::new(x, area.y, width, 1)));
        x = (x + width + 1).min(right);
    }
    out
}

fn draw_playlist<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    player: &Player<M>,
    cursor: usize,
    title: &str,
) -> Vec<(usize, Rect)> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title.trim()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tracks = player.catalog().tracks();
    let playing = player.state().current_track_index;
    let height = usize::from(inner.height / ROWS_PER_TRACK);
    let start = window_start(tracks.len(), height, cursor);
    let end = (start + height).min(tracks.len());

    // Only build items for the visible window.
    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let index = start + offset;
            let mut title_style = Style::default().add_modifier(Modifier::BOLD);
            if index == playing {
                title_style = title_style.fg(SEEK_COLOR);
            }
            let artist = track.artist.as_deref().unwrap_or("Unknown artist");
            ListItem::new(Text::from(vec![
                Line::styled(track.title.clone(), title_style),
                Line::styled(artist.to_string(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if cursor >= start && cursor < end {
        state.select(Some(cursor - start));
    }
    frame.render_stateful_widget(list, inner, &mut state);

    (start..end)
        .enumerate()
        .map(|(row, index)| {
            let y = inner.y + row as u16 * ROWS_PER_TRACK;
            (index, Rect::new(inner.x, y, inner.width, ROWS_PER_TRACK))
        })
        .collect()
}

/// Popup above the volume `button` with the slider; returns the popup and slider areas.
/// The border dims while the flyout is about to hide.
fn draw_volume_flyout(frame: &mut Frame, button: Rect, percent: f64, fading: bool) -> (Rect, Rect) {
    let screen = frame.area();
    let width = FLYOUT_WIDTH.min(screen.width);
    let x = button.x.min(screen.right().saturating_sub(width));
    let y = button.y.saturating_sub(FLYOUT_HEIGHT);
    let popup = Rect::new(x, y, width, FLYOUT_HEIGHT.min(button.y));

    let border = if fading { Color::DarkGray } else { Color::Reset };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {:.0}% ", percent))
        .title_alignment(Alignment::Center);
    let slider = block.inner(popup);

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    frame.render_widget(
        Paragraph::new(bar_line(percent, slider.width, VOLUME_COLOR)),
        slider,
    );
    (popup, slider)
}

/// Render the entire UI into `frame`, returning the mouse targets.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    player: &Player<M>,
    cursor: usize,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> Regions {
    let mut regions = Regions::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vitrola ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    regions.tracks = draw_playlist(frame, body[0], player, cursor, &ui_settings.playlist_title);

    // Now-playing card
    let state = player.state();
    let track = player.current_track();
    let card = Block::bordered()
        .padding(Padding::horizontal(1))
        .title(" now playing ");
    let card_inner = card.inner(body[1]);
    frame.render_widget(card, body[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(card_inner);

    let cover = match &track.cover {
        Some(path) => format!("cover: {}", path.display()),
        None => "cover: none".to_string(),
    };
    frame.render_widget(Paragraph::new(cover).dark_gray(), rows[0]);
    frame.render_widget(Paragraph::new(track.title.as_str()).bold(), rows[2]);
    frame.render_widget(
        Paragraph::new(track.artist.as_deref().unwrap_or("Unknown artist")).gray(),
        rows[3],
    );

    // Seek bar and times
    regions.seek_bar = rows[5];
    frame.render_widget(
        Paragraph::new(bar_line(state.progress, rows[5].width, SEEK_COLOR)),
        rows[5],
    );
    let total = state
        .known_duration()
        .map_or_else(|| "-:--".to_string(), format_time);
    frame.render_widget(Paragraph::new(format_time(state.current_time)), rows[6]);
    frame.render_widget(
        Paragraph::new(total).alignment(Alignment::Right),
        rows[6],
    );

    // Transport row
    let labels = [
        (Control::Previous, "[|<]".to_string()),
        (
            Control::Rewind,
            format!("[-{}s]", controls_settings.seek_seconds),
        ),
        (
            Control::PlayPause,
            if state.is_playing { "[|| pause]" } else { "[> play]" }.to_string(),
        ),
        (
            Control::Forward,
            format!("[+{}s]", controls_settings.seek_seconds),
        ),
        (Control::Next, "[>|]".to_string()),
        (
            Control::Volume,
            format!("[{}]", volume_label(state.shows_muted(), state.volume)),
        ),
    ];
    regions.controls = layout_controls(rows[8], &labels);
    for ((_, label), (_, area)) in labels.iter().zip(&regions.controls) {
        frame.render_widget(Paragraph::new(label.as_str()), *area);
    }

    // Footer
    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    // Volume flyout, drawn last so it sits on top of the card.
    if player.is_volume_visible()
        && let Some(button) = regions
            .controls
            .iter()
            .find(|(c, _)| *c == Control::Volume)
            .map(|(_, area)| *area)
    {
        let percent = if state.shows_muted() {
            0.0
        } else {
            f64::from(state.volume) * 100.0
        };
        let (popup, slider) = draw_volume_flyout(frame, button, percent, player.volume_hide_pending());
        regions.flyout = Some(popup);
        regions.volume_slider = Some(slider);
    }

    regions
}
