//! Recording `MediaElement` for tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::media::{LoadId, MediaElement, MediaEvent, MediaEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(PathBuf),
    Play,
    Pause,
    SeekTo(Duration),
    SeekBy(i64),
    SetVolume(f32),
}

#[derive(Debug, Default)]
pub struct FakeMedia {
    pub calls: Vec<MediaCall>,
    pub last_load: LoadId,
}

impl FakeMedia {
    pub fn take_calls(&mut self) -> Vec<MediaCall> {
        std::mem::take(&mut self.calls)
    }

    /// A notification for the most recent load.
    pub fn event(&self, kind: MediaEventKind) -> MediaEvent {
        MediaEvent::new(self.last_load, kind)
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, source: &Path) -> LoadId {
        self.last_load = self.last_load.next();
        self.calls.push(MediaCall::Load(source.to_path_buf()));
        self.last_load
    }

    fn play(&mut self) {
        self.calls.push(MediaCall::Play);
    }

    fn pause(&mut self) {
        self.calls.push(MediaCall::Pause);
    }

    fn seek_to(&mut self, position: Duration) {
        self.calls.push(MediaCall::SeekTo(position));
    }

    fn seek_by(&mut self, delta_secs: i64) {
        self.calls.push(MediaCall::SeekBy(delta_secs));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(MediaCall::SetVolume(volume));
    }
}
