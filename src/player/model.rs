//! The player: transport, seek reconciliation, volume and catalog selection.

use std::time::{Duration, Instant};

use crate::catalog::{Catalog, Track};

use super::flyout::Flyout;
use super::media::{LoadId, MediaElement, MediaEvent, MediaEventKind};
use super::state::{DEFAULT_VOLUME, PlayerState, SeekState, clamp_percent, percent_of, position_at};

/// Tunables that come from settings.
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    /// Step for `seek_backward` / `seek_forward`, in seconds.
    pub seek_seconds: u64,
    /// Flyout linger time after the pointer leaves.
    pub volume_hide_delay: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            seek_seconds: 10,
            volume_hide_delay: Duration::from_millis(300),
        }
    }
}

pub struct Player<M: MediaElement> {
    catalog: Catalog,
    media: M,
    state: PlayerState,
    flyout: Flyout,
    options: PlayerOptions,
    /// Load whose notifications we currently accept.
    subscription: Option<LoadId>,
}

impl<M: MediaElement> Player<M> {
    /// Create a paused player with the first track of `catalog` loaded.
    pub fn new(catalog: Catalog, media: M, options: PlayerOptions) -> Self {
        let mut player = Self {
            catalog,
            media,
            state: PlayerState::default(),
            flyout: Flyout::new(options.volume_hide_delay),
            options,
            subscription: None,
        };
        player.media.set_volume(player.state.volume);
        player.load_current();
        player
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> &Track {
        // `current_track_index` only ever holds indices produced by the catalog.
        &self.catalog.tracks()[self.state.current_track_index]
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn is_volume_visible(&self) -> bool {
        self.flyout.is_visible()
    }

    pub fn volume_hide_pending(&self) -> bool {
        self.flyout.hide_pending()
    }

    // ---- transport ----

    pub fn toggle_play(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        if self.state.is_seeking() {
            // Pointer-up decides whether to resume.
            return;
        }
        if self.state.is_playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    pub fn next(&mut self) {
        let index = self.catalog.next_index(self.state.current_track_index);
        self.change_track(index);
    }

    pub fn previous(&mut self) {
        let index = self.catalog.previous_index(self.state.current_track_index);
        self.change_track(index);
    }

    pub fn seek_backward(&mut self) {
        self.media.seek_by(-(self.options.seek_seconds as i64));
    }

    pub fn seek_forward(&mut self) {
        self.media.seek_by(self.options.seek_seconds as i64);
    }

    // ---- catalog selection ----

    /// Play the track at `index`. Returns false when `index` is out of range.
    pub fn select_track(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }
        if index == self.state.current_track_index {
            if !self.state.is_playing {
                self.toggle_play();
            }
            return true;
        }
        self.change_track(index);
        true
    }

    fn change_track(&mut self, index: usize) {
        self.state.current_track_index = index;
        self.state.is_playing = true;
        self.load_current();
    }

    /// (Re)load the current track and subscribe to its notifications.
    fn load_current(&mut self) {
        let track = &self.catalog.tracks()[self.state.current_track_index];
        tracing::info!(index = self.state.current_track_index, title = %track.title, "loading track");

        let load = self.media.load(&track.source);
        self.subscription = Some(load);

        self.state.seek = SeekState::Idle;
        self.state.current_time = Duration::ZERO;
        self.state.progress = 0.0;
        self.state.duration = None;

        if self.state.is_playing {
            self.media.play();
        }
    }

    // ---- media notifications ----

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.subscription != Some(event.load) {
            tracing::trace!(?event, "dropping notification from a stale load");
            return;
        }

        match event.kind {
            MediaEventKind::MetadataReady { duration } => {
                tracing::debug!(?duration, "metadata ready");
                self.state.duration = Some(duration);
            }
            MediaEventKind::TimeUpdate { position } => {
                if self.state.is_seeking() {
                    return;
                }
                self.state.current_time = position;
                self.state.progress = percent_of(position, self.state.known_duration());
            }
            MediaEventKind::Ended => {
                tracing::debug!("track ended, advancing");
                self.next();
            }
        }
    }

    // ---- seek bar ----

    pub fn seek_pointer_down(&mut self) {
        if self.state.is_seeking() {
            return;
        }
        self.state.seek = SeekState::Dragging;
        self.media.pause();
    }

    /// Display-only update while dragging; playback position stays put.
    pub fn seek_drag(&mut self, percent: f64) {
        if !self.state.is_seeking() {
            return;
        }
        let percent = clamp_percent(percent);
        self.state.progress = percent;
        if let Some(position) = position_at(percent, self.state.known_duration()) {
            self.state.current_time = position;
        }
    }

    pub fn seek_pointer_up(&mut self, percent: f64) {
        if !self.state.is_seeking() {
            return;
        }
        let percent = clamp_percent(percent);
        match position_at(percent, self.state.known_duration()) {
            Some(target) => {
                tracing::debug!(?target, "seek released");
                self.media.seek_to(target);
                self.state.current_time = target;
                self.state.progress = percent;
            }
            // Nothing to seek into; fall back to what playback last reported.
            None => {
                self.state.progress =
                    percent_of(self.state.current_time, self.state.known_duration());
            }
        }
        self.state.seek = SeekState::Idle;

        if self.state.is_playing {
            self.media.play();
        }
    }

    // ---- volume ----

    /// Set the volume, clamped to `[0, 1]`. Any positive value unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.apply_volume(volume);
        if volume > 0.0 {
            self.state.is_muted = false;
        }
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Restore when muted or silent, otherwise remember the volume and go silent.
    pub fn toggle_mute(&mut self) {
        if self.state.shows_muted() {
            self.state.is_muted = false;
            self.apply_volume(self.state.last_volume.unwrap_or(DEFAULT_VOLUME));
        } else {
            self.state.last_volume = Some(self.state.volume);
            self.state.is_muted = true;
            self.apply_volume(0.0);
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        self.state.volume = volume;
        self.media.set_volume(volume);
    }

    // ---- volume flyout ----

    pub fn volume_pointer_enter(&mut self) {
        self.flyout.pointer_enter();
    }

    pub fn volume_pointer_leave(&mut self, now: Instant) {
        self.flyout.pointer_leave(now);
    }

    /// Show the flyout briefly, as if the pointer passed over it.
    pub fn flash_volume(&mut self, now: Instant) {
        self.flyout.pointer_enter();
        self.flyout.pointer_leave(now);
    }

    /// Advance timers. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.flyout.tick(now)
    }

    /// Release timers and subscriptions and silence the backend.
    pub fn shutdown(&mut self) {
        self.flyout.cancel();
        self.subscription = None;
        self.media.pause();
    }
}
