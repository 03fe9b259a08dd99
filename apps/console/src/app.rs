use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use musiquest_domain::{DomainError, PlaylistOrder, Track};
use musiquest_game::{FileStages, GameConfig, GamePhase, GameSession, SelectionOutcome};
use musiquest_library::{AssetLayout, TrackScanner};
use musiquest_player::{
    Command, Effect, MediaBridge, NullPlayer, PlaylistController, SharedController,
};

use crate::input::{GameInput, Input, HELP};
use crate::settings::Settings;

/// What happened after one line of input.
pub enum Step {
    Continue(Vec<String>),
    Quit(Vec<String>),
}

pub struct App {
    controller: SharedController,
    bridge: MediaBridge<NullPlayer>,
    layout: AssetLayout,
    game_config: GameConfig,
    game: Option<(String, GameSession<FileStages>)>,
}

impl App {
    pub fn new(layout: AssetLayout, music_dir: PathBuf, settings: &Settings) -> Result<Self> {
        let tracks = TrackScanner::new().scan(&music_dir)?;
        let mut controller = PlaylistController::new();
        controller.load(tracks)?;
        if !settings.playlist_order.filenames.is_empty() {
            let order = settings.playlist_order.clone();
            let mut playlist = controller.playlist().clone();
            match order.apply(&mut playlist) {
                Ok(()) => controller.reorder(playlist.filenames().as_slice())?,
                Err(err) => warn!(%err, "ignoring saved playlist order"),
            }
        }
        controller.set_modes(settings.shuffle, settings.repeat);
        info!(tracks = controller.playlist().len(), "library ready");

        Ok(Self {
            controller: SharedController::new(controller),
            bridge: MediaBridge::new(NullPlayer::default(), music_dir),
            layout,
            game_config: settings.game,
            game: None,
        })
    }

    /// Playback preferences and order to persist on exit.
    pub fn export_settings(&self, settings: &mut Settings) {
        self.controller.with(|controller| {
            settings.shuffle = controller.state().shuffle;
            settings.repeat = controller.state().repeat;
            settings.playlist_order = PlaylistOrder::of(controller.playlist());
        });
    }

    pub fn playlist_lines(&self) -> Vec<String> {
        self.controller.with(|controller| {
            let current = controller.state().current_index;
            controller
                .playlist()
                .tracks()
                .iter()
                .enumerate()
                .map(|(idx, track)| {
                    let marker = if Some(idx) == current { '>' } else { ' ' };
                    format!("{marker} {:>2}. {} [{}]", idx + 1, track.title, track.filename)
                })
                .collect()
        })
    }

    pub fn handle(&mut self, input: Input) -> Step {
        let lines = match input {
            Input::Quit => return Step::Quit(vec!["Bye.".to_string()]),
            Input::Help => HELP.lines().map(str::to_string).collect(),
            Input::List => {
                let lines = self.playlist_lines();
                if lines.is_empty() {
                    vec!["The playlist is empty.".to_string()]
                } else {
                    lines
                }
            }
            Input::Status => self.status_lines(),
            Input::Playback(command) => self.playback(command),
            Input::Game(game_input) => self.game(game_input),
        };
        Step::Continue(lines)
    }

    fn playback(&mut self, command: Command) -> Vec<String> {
        let effects = match self.controller.dispatch(command) {
            Ok(effects) => effects,
            Err(DomainError::EmptyPlaylist) => return vec!["Nothing to play.".to_string()],
            Err(err) => return vec![format!("error: {err}")],
        };
        if let Err(err) = self.bridge.apply(&effects) {
            warn!("player rejected instruction: {err:#}");
        }

        let mut lines = Vec::new();
        for effect in &effects {
            match effect {
                Effect::Play(track) => {
                    lines.push(format!("Now playing: {}", track.title));
                    lines.extend(self.begin_game(track));
                }
                Effect::Stop => lines.push("Stopped.".to_string()),
                Effect::Seek(_) | Effect::SelectionChanged(_) => {}
                Effect::PlaylistChanged => lines.extend(self.playlist_lines()),
                Effect::ModesChanged { shuffle, repeat } => lines.push(format!(
                    "Shuffle {} | {}",
                    if *shuffle { "On" } else { "Off" },
                    repeat.label()
                )),
                Effect::Progress(report) => lines.push(report.label.clone()),
            }
        }
        lines
    }

    /// A newly played track gets a fresh game keyed by its title; replaying the same track
    /// keeps the game going.
    fn begin_game(&mut self, track: &Track) -> Vec<String> {
        if matches!(&self.game, Some((title, _)) if *title == track.title) {
            return Vec::new();
        }
        let pairs = match self.layout.image_pairs() {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!("image pairs unavailable: {err:#}");
                Vec::new()
            }
        };
        let lyrics = self.layout.lyrics().load(&track.title);
        let stages = FileStages::new(pairs, self.game_config.detector);
        let mut session = GameSession::new(stages, lyrics, self.game_config);
        session.start();

        let mut lines = Vec::new();
        if session.stage().is_none() {
            lines.push("No picture pairs to play with.".to_string());
        } else {
            lines.push(
                "Move the box with up/down/left/right and `check` to guess.".to_string(),
            );
        }
        lines.push(score_line(session.score()));
        self.game = Some((track.title.clone(), session));
        lines
    }

    fn game(&mut self, input: GameInput) -> Vec<String> {
        if input == GameInput::Start {
            let current = self.controller.with(|c| c.current_track().cloned());
            return match current {
                Some(track) => {
                    self.game = None;
                    self.begin_game(&track)
                }
                None => vec!["Pick a track first.".to_string()],
            };
        }
        let Some((_, session)) = self.game.as_mut() else {
            return vec!["Play a track to start the game.".to_string()];
        };
        match input {
            GameInput::Start => Vec::new(),
            GameInput::Move(direction) => {
                session.move_cursor(direction);
                let r = session.cursor().rect();
                vec![format!("Box at ({}, {})-({}, {})", r.x1, r.y1, r.x2, r.y2)]
            }
            GameInput::Check => match session.check_selection() {
                SelectionOutcome::Ignored => vec!["The game is not running.".to_string()],
                SelectionOutcome::Incorrect => vec!["Wrong!".to_string()],
                SelectionOutcome::Correct {
                    revealed,
                    score,
                    next_stage,
                } => {
                    let mut lines = vec!["Correct!".to_string()];
                    lines.extend(revealed.into_iter().map(|l| format!("  + {l}")));
                    lines.push(score_line(score));
                    if let Some(number) = next_stage {
                        lines.push(format!("Stage {number}"));
                    }
                    lines
                }
                SelectionOutcome::SessionComplete { revealed, score } => {
                    let mut lines = vec!["Correct!".to_string()];
                    lines.extend(revealed.into_iter().map(|l| format!("  + {l}")));
                    lines.push(score_line(score));
                    lines.push("Every lyric line is unlocked!".to_string());
                    lines
                }
                SelectionOutcome::OutOfStages { revealed, score } => {
                    let mut lines = vec!["Correct!".to_string()];
                    lines.extend(revealed.into_iter().map(|l| format!("  + {l}")));
                    lines.push(score_line(score));
                    lines.push("No more pictures to play, the game is over.".to_string());
                    lines
                }
            },
            GameInput::Unlock => {
                let revealed = session.unlock_all();
                let mut lines: Vec<String> =
                    revealed.into_iter().map(|l| format!("  + {l}")).collect();
                lines.push(score_line(session.score()));
                lines.push("All lyrics unlocked.".to_string());
                lines
            }
        }
    }

    fn status_lines(&self) -> Vec<String> {
        let mut lines = self.controller.with(|controller| {
            let state = controller.state();
            let now = controller
                .current_track()
                .map(|t| t.title.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![
                format!("Track: {now}"),
                musiquest_player::PositionReporter::report(state).label,
                format!(
                    "Shuffle {} | {}",
                    if state.shuffle { "On" } else { "Off" },
                    state.repeat.label()
                ),
            ]
        });
        match &self.game {
            Some((title, session)) => {
                let phase = match session.phase() {
                    GamePhase::Idle => "waiting",
                    GamePhase::Active => "running",
                    GamePhase::Complete => "complete",
                };
                lines.push(format!("Game for {title}: {phase}"));
                lines.push(score_line(session.score()));
                let shown = session.progress().revealed();
                lines.extend(shown.earlier.iter().map(|l| format!("    {l}")));
                lines.extend(shown.latest.iter().map(|l| format!("  * {l}")));
            }
            None => lines.push("Game: not started".to_string()),
        }
        lines
    }
}

fn score_line((score, total): (usize, usize)) -> String {
    format!("Score: {score} / {total}")
}
