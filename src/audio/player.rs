use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::Error;
use crate::player::{LoadId, MediaElement, MediaEvent};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// Handle to the audio thread; the player's media backend.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    last_load: LoadId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Start the audio thread and wait until it has an output device.
    pub fn new(settings: &AudioSettings) -> Result<Self, Error> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events) = mpsc::channel::<MediaEvent>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), Error>>();

        let audio_handle = spawn_audio_thread(rx, events_tx, ready_tx, settings.clone());
        ready_rx
            .recv()
            .map_err(|_| Error::AudioOutput("audio thread exited during startup".to_string()))??;

        Ok(Self {
            tx,
            events,
            last_load: LoadId::default(),
            join: Mutex::new(Some(audio_handle)),
        })
    }

    /// Notifications queued since the last call.
    pub fn pending_events(&self) -> Vec<MediaEvent> {
        self.events.try_iter().collect()
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(err) = self.tx.send(cmd) {
            tracing::warn!(cmd = ?err.0, "audio thread is gone");
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaElement for AudioPlayer {
    fn load(&mut self, source: &Path) -> LoadId {
        self.last_load = self.last_load.next();
        self.send(AudioCmd::Load {
            id: self.last_load,
            path: source.to_path_buf(),
        });
        self.last_load
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek_to(&mut self, position: Duration) {
        self.send(AudioCmd::SeekTo(position));
    }

    fn seek_by(&mut self, delta_secs: i64) {
        self.send(AudioCmd::SeekBy(delta_secs));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }
}
