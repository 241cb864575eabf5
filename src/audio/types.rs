//! Audio-related small types.
//!
//! Commands sent to the audio thread and the position arithmetic it uses.

use std::path::PathBuf;
use std::time::Duration;

use crate::player::LoadId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source; starts paused at zero.
    Load { id: LoadId, path: PathBuf },
    /// Resume (or start) playback.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Jump to an absolute position.
    SeekTo(Duration),
    /// Jump by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Set the output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Clamp `position` into the playable range of a source of length `duration`.
pub(crate) fn clamp_position(position: Duration, duration: Option<Duration>) -> Duration {
    match duration {
        Some(d) => position.min(d),
        None => position,
    }
}

/// `current` moved by `delta_secs`, never before zero nor past the end.
pub(crate) fn offset_position(
    current: Duration,
    delta_secs: i64,
    duration: Option<Duration>,
) -> Duration {
    let delta = Duration::from_secs(delta_secs.unsigned_abs());
    let moved = if delta_secs < 0 {
        current.saturating_sub(delta)
    } else {
        current.saturating_add(delta)
    };
    clamp_position(moved, duration)
}
