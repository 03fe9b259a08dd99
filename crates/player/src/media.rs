use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::command::Effect;

/// The external media player. Decoding and output live behind this trait.
pub trait MediaPlayer: Send {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn seek(&mut self, position_ms: u64) -> Result<()>;
}

/// Accepts every instruction and only logs it.
#[derive(Debug, Default)]
pub struct NullPlayer {
    loaded: Option<PathBuf>,
}

impl NullPlayer {
    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }
}

impl MediaPlayer for NullPlayer {
    fn load(&mut self, path: &Path) -> Result<()> {
        debug!(?path, "null player load");
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        debug!("null player play");
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        debug!("null player pause");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("null player stop");
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<()> {
        debug!(position_ms, "null player seek");
        Ok(())
    }
}

/// Resolves track filenames against the music directory and forwards player instructions.
/// A new `Play` simply replaces whatever was loaded before.
pub struct MediaBridge<P> {
    player: P,
    music_dir: PathBuf,
}

impl<P: MediaPlayer> MediaBridge<P> {
    pub fn new(player: P, music_dir: impl Into<PathBuf>) -> Self {
        Self {
            player,
            music_dir: music_dir.into(),
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn apply(&mut self, effects: &[Effect]) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Play(track) => {
                    self.player.load(&self.music_dir.join(&track.filename))?;
                    self.player.play()?;
                }
                Effect::Stop => self.player.stop()?,
                Effect::Seek(ms) => self.player.seek(*ms)?,
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musiquest_domain::Track;

    #[test]
    fn bridge_loads_track_path() {
        let mut bridge = MediaBridge::new(NullPlayer::default(), "/music");
        bridge
            .apply(&[Effect::Play(Track::new("song.wav", "Song")), Effect::PlaylistChanged])
            .unwrap();
        assert_eq!(bridge.player().loaded(), Some(Path::new("/music/song.wav")));
    }
}
