use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::AudioConfig;

/// Fire-and-forget sound effects used by the game
pub trait SoundEffects {
    fn play_gun_sound(&self);
}

/// Plays nothing. Used when muted and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl SoundEffects for Silence {
    fn play_gun_sound(&self) {}
}

type Clip = Buffered<Decoder<BufReader<File>>>;

/// Audio manager for the gun sound and looping background music
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    /// Pre-loaded gun sound (None if loading failed)
    gun_sound: Option<Clip>,
    gun_volume: f32,
    /// Keeps the music playing while the manager lives
    music: Option<Sink>,
}

impl AudioManager {
    /// Open the default output device and pre-load the gun sound.
    pub fn new(config: &AudioConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        let gun_sound = match load_clip(&config.gun_sound) {
            Ok(clip) => Some(clip),
            Err(err) => {
                log::warn!("gun sound {} unavailable: {err}", config.gun_sound.display());
                None
            }
        };

        Ok(Self {
            _stream: stream,
            stream_handle,
            gun_sound,
            gun_volume: config.gun_volume,
            music: None,
        })
    }

    /// Start looping background music. Failures are logged and ignored.
    pub fn play_music(&mut self, path: &Path, volume: f32) {
        let started = File::open(path)
            .map_err(|err| err.to_string())
            .and_then(|file| Decoder::new(BufReader::new(file)).map_err(|err| err.to_string()))
            .and_then(|source| {
                let sink = Sink::try_new(&self.stream_handle).map_err(|err| err.to_string())?;
                sink.set_volume(volume);
                sink.append(source.repeat_infinite());
                Ok(sink)
            });

        match started {
            Ok(sink) => self.music = Some(sink),
            Err(err) => log::warn!("background music {} unavailable: {err}", path.display()),
        }
    }
}

impl SoundEffects for AudioManager {
    fn play_gun_sound(&self) {
        // Only play if the sound was successfully loaded
        if let Some(gun_sound) = &self.gun_sound {
            // Ignore errors for sound playback - don't want to crash the game
            if let Ok(sink) = Sink::try_new(&self.stream_handle) {
                sink.set_volume(self.gun_volume);
                sink.append(gun_sound.clone());
                sink.detach();
            }
        }
    }
}

fn load_clip(path: &Path) -> Result<Clip, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;
    Ok(source.buffered())
}

/// Build the sound backend for a config. Falls back to [`Silence`] when muted
/// or when no output device can be opened.
pub fn open(config: &AudioConfig) -> Box<dyn SoundEffects> {
    if config.muted {
        log::info!("audio muted");
        return Box::new(Silence);
    }

    match AudioManager::new(config) {
        Ok(mut manager) => {
            manager.play_music(&config.music, config.music_volume);
            Box::new(manager)
        }
        Err(err) => {
            log::warn!("failed to initialize audio, continuing without sound: {err}");
            Box::new(Silence)
        }
    }
}
