//! Utilities for creating `rodio` sinks from track sources.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::Error;

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, Error> {
    let file = File::open(path).map_err(|source| Error::MediaOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| Error::MediaDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, Error> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Length of the file at `path`: container metadata first, then the decoder.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let from_tags = lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero());

    from_tags.or_else(|| {
        open_decoder(path)
            .ok()
            .and_then(|decoder| decoder.total_duration())
            .filter(|d| !d.is_zero())
    })
}
