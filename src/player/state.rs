use std::time::Duration;

/// Volume restored by unmute when no pre-mute volume was ever recorded.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Whether the seek bar follows playback or the pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SeekState {
    /// Position follows playback.
    #[default]
    Idle,
    /// Position follows the pointer; playback position is frozen.
    Dragging,
}

/// Everything the view renders. Mutated only through [`super::Player`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub current_track_index: usize,
    pub is_playing: bool,
    pub volume: f32,
    pub last_volume: Option<f32>,
    pub is_muted: bool,
    /// Percent of the track played, in `[0, 100]`.
    pub progress: f64,
    pub current_time: Duration,
    /// `None` until the backend reports metadata for the current load.
    pub duration: Option<Duration>,
    pub seek: SeekState,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track_index: 0,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            last_volume: None,
            is_muted: false,
            progress: 0.0,
            current_time: Duration::ZERO,
            duration: None,
            seek: SeekState::Idle,
        }
    }
}

impl PlayerState {
    pub fn is_seeking(&self) -> bool {
        self.seek == SeekState::Dragging
    }

    /// Muted and silent look the same.
    pub fn shows_muted(&self) -> bool {
        self.is_muted || self.volume == 0.0
    }

    /// The duration, if it is known and usable as a divisor.
    pub fn known_duration(&self) -> Option<Duration> {
        self.duration.filter(|d| !d.is_zero())
    }
}

/// `position` as a percentage of `duration`, or 0 when the duration is unknown.
pub fn percent_of(position: Duration, duration: Option<Duration>) -> f64 {
    match duration.filter(|d| !d.is_zero()) {
        Some(d) => (position.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0),
        None => 0.0,
    }
}

/// The position `percent` of the way through `duration`.
pub fn position_at(percent: f64, duration: Option<Duration>) -> Option<Duration> {
    let d = duration.filter(|d| !d.is_zero())?;
    Some(d.mul_f64(clamp_percent(percent) / 100.0))
}

/// Clamp into `[0, 100]`; NaN becomes 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
