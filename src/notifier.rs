//! Alert playback through the default audio output

use anyhow::{Context, Result};
use log::debug;
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, Sink, Source};
use screenwatch_core::Notifier;
use std::io::Cursor;
use std::path::Path;

type AlertSound = Buffered<Decoder<Cursor<Vec<u8>>>>;

/// Read position over a preloaded sound.
///
/// `take` hands out the sound from the current position and leaves the
/// head at the end; only `rewind` makes it playable again.
#[derive(Debug, Clone)]
struct Playhead<S: Clone> {
    sound: S,
    cursor: Option<S>,
}

impl<S: Clone> Playhead<S> {
    fn new(sound: S) -> Self {
        Self {
            cursor: Some(sound.clone()),
            sound,
        }
    }

    fn take(&mut self) -> Option<S> {
        self.cursor.take()
    }

    fn rewind(&mut self) {
        self.cursor = Some(self.sound.clone());
    }
}

/// Owns the output device and the decoded alert sound.
///
/// Not `Send`: it lives on the scan thread, which serialises every alert.
/// The sink holds at most one source, so a new alert restarts the sound
/// instead of queueing behind the previous one.
pub struct SoundNotifier {
    _stream: OutputStream,
    sink: Sink,
    head: Playhead<AlertSound>,
}

impl SoundNotifier {
    /// Decode `path` once and open the default output device
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read alert sound: {:?}", path))?;
        let sound = Decoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode alert sound: {:?}", path))?
            .buffered();

        let (stream, handle) =
            OutputStream::try_default().context("Failed to create audio output stream")?;
        let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;

        Ok(Self {
            _stream: stream,
            sink,
            head: Playhead::new(sound),
        })
    }
}

impl Notifier for SoundNotifier {
    fn play(&mut self) -> Result<()> {
        let Some(source) = self.head.take() else {
            debug!("Alert sound is at its end; nothing to play until rewound");
            return Ok(());
        };

        self.sink.clear();
        self.sink.append(source);
        self.sink.play();
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.head.rewind();
        Ok(())
    }
}
