/// Command debouncing.
///
/// A gesture held in front of the camera produces the same command on every
/// frame. Only changes are passed on.
use crate::command::Command;

/// Per-session gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureState {
    /// Command decided on the most recent hand frame.
    pub current: Command,
    /// Last command accepted as a change. `None` until the first frame.
    pub previous: Option<Command>,
}

impl GestureState {
    pub const fn new() -> Self {
        Self {
            current: Command::None,
            previous: None,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new()
    }
}

/// Suppresses repeats of an unchanged command.
///
/// `Command::None` is compared like any other value: leaving a gesture for
/// "no gesture" is a change.
#[derive(Debug, Clone, Default)]
pub struct CommandDebouncer {
    state: GestureState,
}

impl CommandDebouncer {
    pub const fn new() -> Self {
        Self {
            state: GestureState::new(),
        }
    }

    /// Record this frame's command. Returns it if it differs from the last
    /// accepted one.
    pub fn accept(&mut self, cmd: Command) -> Option<Command> {
        self.state.current = cmd;
        if self.state.previous == Some(cmd) {
            return None;
        }
        self.state.previous = Some(cmd);
        Some(cmd)
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Forget the last command so the next one is always accepted.
    pub fn reset(&mut self) {
        self.state = GestureState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_command_is_accepted() {
        let mut d = CommandDebouncer::new();
        assert_eq!(d.accept(Command::BedroomLightOn), Some(Command::BedroomLightOn));
    }

    #[test]
    fn first_none_is_a_change() {
        let mut d = CommandDebouncer::new();
        assert_eq!(d.accept(Command::None), Some(Command::None));
        assert_eq!(d.accept(Command::None), None);
    }

    #[test]
    fn repeat_is_suppressed() {
        let mut d = CommandDebouncer::new();
        assert!(d.accept(Command::GarageDoorOpen).is_some());
        assert_eq!(d.accept(Command::GarageDoorOpen), None);
        assert_eq!(d.accept(Command::GarageDoorOpen), None);
    }

    #[test]
    fn alternating_commands_always_pass() {
        let mut d = CommandDebouncer::new();
        for i in 0..6 {
            let cmd = if i % 2 == 0 {
                Command::GarageLightOn
            } else {
                Command::GarageLightOff
            };
            assert_eq!(d.accept(cmd), Some(cmd), "frame {i}");
        }
    }

    #[test]
    fn return_to_none_is_a_change() {
        let mut d = CommandDebouncer::new();
        d.accept(Command::BedroomLightOff);
        assert_eq!(d.accept(Command::None), Some(Command::None));
        assert_eq!(d.accept(Command::BedroomLightOff), Some(Command::BedroomLightOff));
    }

    #[test]
    fn state_tracks_current_and_previous() {
        let mut d = CommandDebouncer::new();
        assert_eq!(*d.state(), GestureState::new());
        d.accept(Command::GarageDoorClose);
        d.accept(Command::GarageDoorClose);
        assert_eq!(
            *d.state(),
            GestureState {
                current: Command::GarageDoorClose,
                previous: Some(Command::GarageDoorClose),
            }
        );
    }

    #[test]
    fn reset_rearms_dispatch() {
        let mut d = CommandDebouncer::new();
        d.accept(Command::GarageLightOn);
        d.reset();
        assert_eq!(d.accept(Command::GarageLightOn), Some(Command::GarageLightOn));
    }
}
