use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use musiquest_domain::{PlaylistOrder, RepeatMode};
use musiquest_game::GameConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub assets_dir: Option<PathBuf>,
    pub music_dir: Option<PathBuf>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub playlist_order: PlaylistOrder,
    pub game: GameConfig,
}

pub fn settings_path() -> Option<PathBuf> {
    let base = dirs::config_dir()?;
    Some(base.join("musiquest").join("settings.json"))
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read settings {:?}", path))?;
    Ok(serde_json::from_str(&data)?)
}

/// Settings from `path`, with defaults when the file is absent or unreadable and game
/// values that cannot be played replaced.
pub fn load_or_default(path: Option<&Path>) -> Settings {
    let mut settings = match path {
        Some(path) if path.exists() => load_settings(path).unwrap_or_else(|err| {
            warn!("using default settings: {err:#}");
            Settings::default()
        }),
        _ => Settings::default(),
    };
    settings.game = settings.game.sanitized();
    settings
}

pub fn save_settings(path: &Path, data: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("write settings {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            shuffle: true,
            repeat: RepeatMode::All,
            playlist_order: PlaylistOrder {
                filenames: vec!["b.wav".into(), "a.wav".into()],
            },
            ..Default::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "shuffle": true }"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert!(settings.shuffle);
        assert_eq!(settings.repeat, RepeatMode::Off);
        assert_eq!(settings.game.cursor.box_size, 50);
    }

    #[test]
    fn corrupt_or_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_or_default(Some(&path)), Settings::default());
        assert_eq!(
            load_or_default(Some(&dir.path().join("absent.json"))),
            Settings::default()
        );
        assert_eq!(load_or_default(None), Settings::default());
    }

    #[test]
    fn unplayable_game_values_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "shuffle": true, "game": { "detector": { "width": 440, "height": 350, "threshold": 30, "min_area": 100 }, "cursor": { "box_size": 0, "step": 0 }, "lyric_batch": 0 } }"#,
        )
        .unwrap();
        let settings = load_or_default(Some(&path));
        assert!(settings.shuffle);
        assert_eq!(settings.game, GameConfig::default());
    }
}
