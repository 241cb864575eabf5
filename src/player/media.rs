//! The seam between the player and whatever produces sound.

use std::path::Path;
use std::time::Duration;

/// Identifies one load of a media source. Notifications carry the id of the
/// load they belong to, so the player can drop those from a previous track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct LoadId(pub u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Fires once per load, as soon as the duration is known.
    MetadataReady { duration: Duration },
    /// Periodic position report while playing, and after seeks/pauses.
    TimeUpdate { position: Duration },
    /// Playback reached the end of the source.
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub load: LoadId,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(load: LoadId, kind: MediaEventKind) -> Self {
        Self { load, kind }
    }
}

/// Playback primitive driven by the player.
///
/// Implementations report back asynchronously through [`MediaEvent`]s; none of
/// these calls wait for the backend.
pub trait MediaElement {
    /// Replace the current source. Starts paused at position zero.
    fn load(&mut self, source: &Path) -> LoadId;
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to an absolute position; the backend clamps it to the source length.
    fn seek_to(&mut self, position: Duration);
    /// Jump relative to the current position; the backend clamps the result.
    fn seek_by(&mut self, delta_secs: i64);
    fn set_volume(&mut self, volume: f32);
}
