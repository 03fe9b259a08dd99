use std::sync::{Arc, Mutex, MutexGuard};

use musiquest_domain::DomainError;

use crate::command::{Command, Effect, PlayerEvent};
use crate::controller::PlaylistController;

/// Cloneable handle so player callbacks arriving on another thread go through the same
/// dispatch path as UI input.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<PlaylistController>>,
}

impl SharedController {
    pub fn new(controller: PlaylistController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn dispatch(&self, command: Command) -> Result<Vec<Effect>, DomainError> {
        self.lock().dispatch(command)
    }

    pub fn player_event(&self, event: PlayerEvent) -> Result<Vec<Effect>, DomainError> {
        self.dispatch(Command::Player(event))
    }

    /// Runs `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaylistController) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, PlaylistController> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musiquest_domain::Track;
    use std::thread;

    #[test]
    fn callbacks_from_another_thread() {
        let shared = SharedController::new(PlaylistController::with_seed(3));
        shared
            .dispatch(Command::Load(vec![
                Track::new("a.wav", "A"),
                Track::new("b.wav", "B"),
            ]))
            .unwrap();
        shared.dispatch(Command::Select(0)).unwrap();

        let remote = shared.clone();
        thread::spawn(move || {
            remote.player_event(PlayerEvent::DurationChanged(3_000)).unwrap();
            remote.player_event(PlayerEvent::EndOfMedia).unwrap();
        })
        .join()
        .unwrap();

        shared.with(|controller| {
            assert_eq!(controller.state().current_index, Some(1));
        });
    }
}
