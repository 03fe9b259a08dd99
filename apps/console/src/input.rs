use anyhow::{anyhow, bail, Result};

use musiquest_game::Direction;
use musiquest_player::{Command, PlayerEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum GameInput {
    Start,
    Move(Direction),
    Check,
    Unlock,
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Playback(Command),
    Game(GameInput),
    List,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
list                 show the playlist
play N               play track N (1-based)
next | prev          step through the playlist
shuffle | repeat     toggle shuffle, cycle repeat mode
order F1 F2 ...      reorder the playlist by filename
seek MS              jump to a position
tick MS              player reports a position
duration MS          player reports the track length
end                  player reports the end of the track
start                start the game for the current track
up|down|left|right   move the selection box
check                test the selection
unlock               reveal every lyric line
status               show playback and game state
quit                 leave";

pub fn parse(line: &str) -> Result<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let input = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => Input::List,
        "play" | "p" => {
            let number = number_arg(&rest, "track number")?;
            if number == 0 {
                bail!("tracks are numbered from 1");
            }
            Input::Playback(Command::Select(number as usize - 1))
        }
        "next" | "n" => Input::Playback(Command::Next),
        "prev" | "previous" => Input::Playback(Command::Previous),
        "shuffle" | "s" => Input::Playback(Command::ToggleShuffle),
        "repeat" | "r" => Input::Playback(Command::ToggleRepeat),
        "order" => {
            if rest.is_empty() {
                bail!("order needs the filenames in their new order");
            }
            Input::Playback(Command::Reorder(
                rest.iter().map(|name| name.to_string()).collect(),
            ))
        }
        "seek" => Input::Playback(Command::Seek(number_arg(&rest, "position")?)),
        "tick" => Input::Playback(Command::Player(PlayerEvent::PositionChanged(
            number_arg(&rest, "position")?,
        ))),
        "duration" => Input::Playback(Command::Player(PlayerEvent::DurationChanged(
            number_arg(&rest, "duration")?,
        ))),
        "end" => Input::Playback(Command::Player(PlayerEvent::EndOfMedia)),
        "start" => Input::Game(GameInput::Start),
        "up" | "w" => Input::Game(GameInput::Move(Direction::Up)),
        "down" => Input::Game(GameInput::Move(Direction::Down)),
        "left" | "a" => Input::Game(GameInput::Move(Direction::Left)),
        "right" | "d" => Input::Game(GameInput::Move(Direction::Right)),
        "check" | "enter" | "space" => Input::Game(GameInput::Check),
        "unlock" => Input::Game(GameInput::Unlock),
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => bail!("unknown command {other:?}, try `help`"),
    };
    Ok(Some(input))
}

fn number_arg(rest: &[&str], what: &str) -> Result<u64> {
    let raw = rest.first().ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow!("{what} must be a whole number, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playback_commands() {
        assert_eq!(
            parse("play 2").unwrap(),
            Some(Input::Playback(Command::Select(1)))
        );
        assert_eq!(parse("  NEXT ").unwrap(), Some(Input::Playback(Command::Next)));
        assert_eq!(
            parse("order b.wav a.wav").unwrap(),
            Some(Input::Playback(Command::Reorder(vec![
                "b.wav".into(),
                "a.wav".into()
            ])))
        );
        assert_eq!(
            parse("end").unwrap(),
            Some(Input::Playback(Command::Player(PlayerEvent::EndOfMedia)))
        );
    }

    #[test]
    fn parses_game_commands() {
        assert_eq!(
            parse("left").unwrap(),
            Some(Input::Game(GameInput::Move(Direction::Left)))
        );
        assert_eq!(parse("space").unwrap(), Some(Input::Game(GameInput::Check)));
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("play").is_err());
        assert!(parse("play 0").is_err());
        assert!(parse("seek soon").is_err());
        assert!(parse("order").is_err());
        assert!(parse("dance").is_err());
    }
}
