use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

use crate::director::SoundCue;

type Sound = Buffered<Decoder<BufReader<File>>>;

const SHOOT_VOLUME: f32 = 0.3;
const BOOM_VOLUME: f32 = 0.25;
/// Pitch shift for the life-lost boom, in cents
const BOOM_DETUNE_CENTS: f32 = -1000.0;

/// Audio manager for playing sound effects
pub struct AudioManager {
    /// Kept alive for as long as sounds should play; None when muted
    output: Option<(OutputStream, OutputStreamHandle)>,
    shoot: Option<Sound>,
    boom: Option<Sound>,
}

impl AudioManager {
    /// Opens the default output device and pre-loads the effects from `asset_dir`.
    /// A missing effect file only silences that effect.
    pub fn new(asset_dir: &Path) -> color_eyre::Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            output: Some((stream, stream_handle)),
            shoot: load_sound(&asset_dir.join("shoot.wav")),
            boom: load_sound(&asset_dir.join("explode.wav")),
        })
    }

    pub fn muted() -> Self {
        Self {
            output: None,
            shoot: None,
            boom: None,
        }
    }

    /// Falls back to a muted manager when no output device is available
    pub fn open_or_mute(asset_dir: &Path, mute: bool) -> Self {
        if mute {
            return Self::muted();
        }
        Self::new(asset_dir).unwrap_or_else(|err| {
            warn!("failed to initialize audio, continuing without sound: {err}");
            Self::muted()
        })
    }

    pub fn is_muted(&self) -> bool {
        self.output.is_none()
    }

    pub fn play(&self, cue: SoundCue) {
        match cue {
            SoundCue::Shoot => self.play_sound(self.shoot.as_ref(), SHOOT_VOLUME, 1.0),
            SoundCue::Boom => self.play_sound(self.boom.as_ref(), BOOM_VOLUME, 1.0),
            SoundCue::BoomDetuned => self.play_sound(
                self.boom.as_ref(),
                BOOM_VOLUME,
                detune_speed(BOOM_DETUNE_CENTS),
            ),
        }
    }

    fn play_sound(&self, sound: Option<&Sound>, volume: f32, speed: f32) {
        let (Some((_, stream_handle)), Some(sound)) = (&self.output, sound) else {
            return;
        };
        // Playback errors are not worth interrupting the game for
        if let Ok(sink) = Sink::try_new(stream_handle) {
            sink.set_volume(volume);
            // Cloning the buffered source only clones references
            sink.append(sound.clone().speed(speed));
            sink.detach();
        }
    }
}

fn load_sound(path: &Path) -> Option<Sound> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), "sound effect unavailable: {err}");
            return None;
        }
    };
    match Decoder::new(BufReader::new(file)) {
        Ok(source) => Some(source.buffered()),
        Err(err) => {
            warn!(path = %path.display(), "sound effect could not be decoded: {err}");
            None
        }
    }
}

/// Playback speed that shifts pitch by `cents`
pub fn detune_speed(cents: f32) -> f32 {
    2f32.powf(cents / 1200.0)
}
