use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use musiquest_domain::{DomainError, PlaybackState, Playlist, RepeatMode, Track};

use crate::command::{Command, Effect, PlayerEvent};
use crate::position::PositionReporter;

/// Owns the playlist and the playback state machine. Presentation code observes it through
/// the [`Effect`]s returned by [`dispatch`](Self::dispatch) and never holds its own copy of
/// the track order.
pub struct PlaylistController {
    playlist: Playlist,
    state: PlaybackState,
    rng: StdRng,
}

impl PlaylistController {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic shuffle order, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            playlist: Playlist::default(),
            state: PlaybackState::new(),
            rng,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_index.and_then(|idx| self.playlist.get(idx))
    }

    /// Replaces the playlist. Nothing is selected afterwards.
    #[instrument(skip(self, tracks), fields(count = tracks.len()))]
    pub fn load(&mut self, tracks: Vec<Track>) -> Result<(), DomainError> {
        self.playlist = Playlist::new(tracks)?;
        self.state.reset_media();
        info!("playlist loaded");
        Ok(())
    }

    /// Makes `index` the current track and returns it so the caller can start playback.
    pub fn select_track(&mut self, index: usize) -> Result<Track, DomainError> {
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or(DomainError::InvalidIndex {
                index,
                len: self.playlist.len(),
            })?;
        self.state.current_index = Some(index);
        self.state.position_ms = 0;
        self.state.duration_ms = track.duration_ms.unwrap_or(0);
        debug!(index, filename = %track.filename, "track selected");
        Ok(track)
    }

    /// Advances one track, wrapping at the end. With shuffle on, any track may come next,
    /// including the current one.
    pub fn next(&mut self) -> Result<Track, DomainError> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(DomainError::EmptyPlaylist);
        }
        let index = if self.state.shuffle {
            self.rng.random_range(0..len)
        } else {
            match self.state.current_index {
                Some(idx) => (idx + 1) % len,
                None => 0,
            }
        };
        self.select_track(index)
    }

    /// Steps back one track, wrapping at the start. Without a current track this lands on
    /// the last one.
    pub fn previous(&mut self) -> Result<Track, DomainError> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(DomainError::EmptyPlaylist);
        }
        let index = if self.state.shuffle {
            self.rng.random_range(0..len)
        } else {
            match self.state.current_index {
                Some(idx) => (idx + len - 1) % len,
                None => len - 1,
            }
        };
        self.select_track(index)
    }

    /// Reorders the playlist by filename. The current selection follows its track.
    /// On error nothing changes.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), DomainError> {
        let current = self.current_track().map(|t| t.filename.clone());
        if let Err(err) = self.playlist.reorder(order) {
            warn!(%err, "rejected playlist reorder, keeping previous order");
            return Err(err);
        }
        self.state.current_index = current.and_then(|name| self.playlist.position_of(&name));
        Ok(())
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.shuffle = !self.state.shuffle;
        self.state.shuffle
    }

    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.state.repeat = self.state.repeat.cycle();
        self.state.repeat
    }

    /// Restores saved preferences without touching the selection.
    pub fn set_modes(&mut self, shuffle: bool, repeat: RepeatMode) {
        self.state.shuffle = shuffle;
        self.state.repeat = repeat;
    }

    /// Decides what follows the end of the current track. `Some` is the track to play,
    /// `None` means playback stops.
    pub fn on_track_ended(&mut self) -> Result<Option<Track>, DomainError> {
        let Some(current) = self.state.current_index else {
            return Ok(None);
        };
        let len = self.playlist.len();
        match self.state.repeat {
            RepeatMode::One => self.select_track(current).map(Some),
            RepeatMode::All => self.next().map(Some),
            RepeatMode::Off if current + 1 < len => self.next().map(Some),
            RepeatMode::Off => {
                self.state.position_ms = self.state.duration_ms;
                Ok(None)
            }
        }
    }

    pub fn update_position(&mut self, position_ms: u64) {
        self.state.position_ms = position_ms;
    }

    pub fn update_duration(&mut self, duration_ms: u64) {
        self.state.duration_ms = duration_ms;
    }

    /// Applies one command and reports what must happen next.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Effect>, DomainError> {
        let effects = match command {
            Command::Load(tracks) => {
                self.load(tracks)?;
                vec![
                    Effect::Stop,
                    Effect::PlaylistChanged,
                    Effect::SelectionChanged(None),
                    self.progress(),
                ]
            }
            Command::Select(index) => {
                let track = self.select_track(index)?;
                self.play_effects(track)
            }
            Command::Next => {
                let track = self.next()?;
                self.play_effects(track)
            }
            Command::Previous => {
                let track = self.previous()?;
                self.play_effects(track)
            }
            Command::Reorder(order) => {
                self.reorder(order.as_slice())?;
                vec![
                    Effect::PlaylistChanged,
                    Effect::SelectionChanged(self.state.current_index),
                ]
            }
            Command::ToggleShuffle => {
                self.toggle_shuffle();
                vec![self.modes()]
            }
            Command::ToggleRepeat => {
                self.toggle_repeat();
                vec![self.modes()]
            }
            Command::Seek(position_ms) => {
                if self.state.current_index.is_none() {
                    return Ok(Vec::new());
                }
                let target = if self.state.duration_ms > 0 {
                    position_ms.min(self.state.duration_ms)
                } else {
                    position_ms
                };
                self.update_position(target);
                vec![Effect::Seek(target), self.progress()]
            }
            Command::Player(PlayerEvent::PositionChanged(ms)) => {
                self.update_position(ms);
                vec![self.progress()]
            }
            Command::Player(PlayerEvent::DurationChanged(ms)) => {
                self.update_duration(ms);
                vec![self.progress()]
            }
            Command::Player(PlayerEvent::EndOfMedia) => match self.on_track_ended()? {
                Some(track) => self.play_effects(track),
                None => vec![Effect::Stop, self.progress()],
            },
        };
        Ok(effects)
    }

    fn play_effects(&self, track: Track) -> Vec<Effect> {
        vec![
            Effect::Play(track),
            Effect::SelectionChanged(self.state.current_index),
            self.progress(),
        ]
    }

    fn modes(&self) -> Effect {
        Effect::ModesChanged {
            shuffle: self.state.shuffle,
            repeat: self.state.repeat,
        }
    }

    fn progress(&self) -> Effect {
        Effect::Progress(PositionReporter::report(&self.state))
    }
}

impl Default for PlaylistController {
    fn default() -> Self {
        Self::new()
    }
}
