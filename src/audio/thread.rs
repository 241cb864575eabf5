use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;
use crate::error::Error;
use crate::player::{LoadId, MediaEvent, MediaEventKind};

use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, clamp_position, offset_position};

/// The source currently loaded into the deck.
struct Loaded {
    id: LoadId,
    path: PathBuf,
    duration: Option<Duration>,
    /// `None` when the file could not be opened or decoded.
    sink: Option<Sink>,
}

/// State owned by the audio thread.
struct Deck {
    stream: OutputStream,
    events: Sender<MediaEvent>,
    current: Option<Loaded>,
    volume: f32,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Deck {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn emit(&self, kind: MediaEventKind) {
        if let Some(loaded) = &self.current {
            // The receiver only disappears during shutdown.
            let _ = self.events.send(MediaEvent::new(loaded.id, kind));
        }
    }

    fn build_sink(&self, path: &Path, start_at: Duration) -> Option<Sink> {
        match create_sink_at(&self.stream, path, start_at, self.volume) {
            Ok(sink) => Some(sink),
            Err(err) => {
                tracing::warn!(%err, "media unavailable");
                None
            }
        }
    }

    fn load(&mut self, id: LoadId, path: PathBuf) {
        if let Some(old) = self.current.take().and_then(|l| l.sink) {
            old.stop();
        }

        let duration = probe_duration(&path);
        let sink = self.build_sink(&path, Duration::ZERO);
        tracing::debug!(path = %path.display(), ?duration, playable = sink.is_some(), "loaded");

        self.current = Some(Loaded {
            id,
            path,
            duration,
            sink,
        });
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        if let Some(duration) = duration {
            self.emit(MediaEventKind::MetadataReady { duration });
        }
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        let Some(loaded) = &self.current else {
            return;
        };
        // Playing a drained source starts it over.
        let drained = loaded.sink.as_ref().is_some_and(Sink::empty);
        if drained {
            let sink = self.build_sink(&loaded.path, Duration::ZERO);
            self.accumulated = Duration::ZERO;
            if let Some(loaded) = self.current.as_mut() {
                loaded.sink = sink;
            }
        }

        if let Some(sink) = self.current.as_ref().and_then(|l| l.sink.as_ref()) {
            sink.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(sink) = self.current.as_ref().and_then(|l| l.sink.as_ref()) {
            sink.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
        self.emit(MediaEventKind::TimeUpdate {
            position: self.position(),
        });
    }

    fn position(&self) -> Duration {
        clamp_position(
            self.elapsed(),
            self.current.as_ref().and_then(|l| l.duration),
        )
    }

    fn seek_to(&mut self, target: Duration) {
        // Scrubbing: rebuild the current sink and skip into the file.
        let Some(loaded) = &self.current else {
            return;
        };
        if loaded.sink.is_none() {
            return;
        }
        let target = clamp_position(target, loaded.duration);
        let sink = self.build_sink(&loaded.path, target);

        if let Some(old) = self.current.as_mut().and_then(|l| l.sink.take()) {
            old.stop();
        }

        if let Some(new_sink) = &sink {
            if self.paused {
                self.started_at = None;
            } else {
                new_sink.play();
                self.started_at = Some(Instant::now());
            }
        }
        if let Some(loaded) = self.current.as_mut() {
            loaded.sink = sink;
        }
        self.accumulated = target;
        self.emit(MediaEventKind::TimeUpdate { position: target });
    }

    fn seek_by(&mut self, delta_secs: i64) {
        let duration = self.current.as_ref().and_then(|l| l.duration);
        let target = offset_position(self.elapsed(), delta_secs, duration);
        self.seek_to(target);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.current.as_ref().and_then(|l| l.sink.as_ref()) {
            sink.set_volume(volume);
        }
    }

    /// Periodic check: report position, or the end of the track.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = self.current.as_ref().and_then(|l| l.sink.as_ref()) else {
            return;
        };
        if sink.empty() {
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
            self.emit(MediaEventKind::Ended);
        } else {
            self.emit(MediaEventKind::TimeUpdate {
                position: self.position(),
            });
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.current.take().and_then(|l| l.sink) {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(&sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Spawn the audio thread. The output stream is opened on that thread; the
/// outcome is reported through `ready` before any command is processed.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    ready: Sender<Result<(), Error>>,
    settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                let _ = ready.send(Err(Error::AudioOutput(err.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut deck = Deck {
            stream,
            events,
            current: None,
            volume: settings.initial_volume,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
        };
        let tick = Duration::from_millis(settings.time_update_ms.max(1));

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { id, path } => deck.load(id, path),
                    AudioCmd::Play => deck.play(),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::SeekTo(target) => deck.seek_to(target),
                    AudioCmd::SeekBy(secs) => deck.seek_by(secs),
                    AudioCmd::SetVolume(volume) => deck.set_volume(volume),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread stopped");
    })
}
