/// Smart-home commands produced by the gesture matcher.
///
/// On the wire each actionable command is a three-character code: a device
/// prefix followed by `1` (on/open) or `0` (off/close).
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    BedroomLightOn,
    BedroomLightOff,
    GarageLightOn,
    GarageLightOff,
    GarageDoorOpen,
    GarageDoorClose,
    /// No actionable gesture this frame.
    None,
}

impl Command {
    /// Every actionable command, in rule table order.
    pub const ACTIONABLE: [Command; 6] = [
        Command::BedroomLightOn,
        Command::BedroomLightOff,
        Command::GarageLightOn,
        Command::GarageLightOff,
        Command::GarageDoorOpen,
        Command::GarageDoorClose,
    ];

    /// Wire code for transport. `Command::None` has no code and is never sent.
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Command::BedroomLightOn => Some("BL1"),
            Command::BedroomLightOff => Some("BL0"),
            Command::GarageLightOn => Some("GL1"),
            Command::GarageLightOff => Some("GL0"),
            Command::GarageDoorOpen => Some("GD1"),
            Command::GarageDoorClose => Some("GD0"),
            Command::None => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::BedroomLightOn => "bedroom light on",
            Command::BedroomLightOff => "bedroom light off",
            Command::GarageLightOn => "garage light on",
            Command::GarageLightOff => "garage light off",
            Command::GarageDoorOpen => "garage door open",
            Command::GarageDoorClose => "garage door close",
            Command::None => "none",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a payload is not one of the known command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCode;

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown command code")
    }
}

/// Decodes a payload received on the command topic.
impl FromStr for Command {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Command::ACTIONABLE
            .into_iter()
            .find(|cmd| cmd.code() == Some(code))
            .ok_or(UnknownCode)
    }
}
