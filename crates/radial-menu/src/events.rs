use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Commands accepted on the control socket, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Toggle,
    Enable,
    Disable,
    /// `None` flips the current state.
    Smart(Option<bool>),
    Preset(String),
    Uninstall,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Expected 'on' or 'off', got '{0}'")]
    BadSwitch(String),
    #[error("Missing preset name")]
    MissingPreset,
}

impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "toggle" => Ok(Self::Toggle),
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            "uninstall" => Ok(Self::Uninstall),
            "smart" => match rest.to_ascii_lowercase().as_str() {
                "" => Ok(Self::Smart(None)),
                "on" => Ok(Self::Smart(Some(true))),
                "off" => Ok(Self::Smart(Some(false))),
                _ => Err(CommandParseError::BadSwitch(rest.to_string())),
            },
            "preset" if rest.is_empty() => Err(CommandParseError::MissingPreset),
            "preset" => Ok(Self::Preset(rest.to_string())),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => write!(f, "toggle"),
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
            Self::Smart(None) => write!(f, "smart"),
            Self::Smart(Some(true)) => write!(f, "smart on"),
            Self::Smart(Some(false)) => write!(f, "smart off"),
            Self::Preset(name) => write!(f, "preset {name}"),
            Self::Uninstall => write!(f, "uninstall"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Control(ControlCommand),
    DocumentChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("toggle", ControlCommand::Toggle),
            ("  ENABLE ", ControlCommand::Enable),
            ("smart", ControlCommand::Smart(None)),
            ("smart On", ControlCommand::Smart(Some(true))),
            ("smart off", ControlCommand::Smart(Some(false))),
            ("preset My Anim", ControlCommand::Preset("My Anim".to_string())),
            ("uninstall", ControlCommand::Uninstall),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<ControlCommand>().unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<ControlCommand>(), Err(CommandParseError::Empty));
        assert_eq!("preset".parse::<ControlCommand>(), Err(CommandParseError::MissingPreset));
        assert_eq!(
            "smart maybe".parse::<ControlCommand>(),
            Err(CommandParseError::BadSwitch("maybe".to_string()))
        );
        assert!(matches!("show".parse::<ControlCommand>(), Err(CommandParseError::Unknown(_))));
    }

    #[test]
    fn test_display_round_trips() {
        for cmd in [
            ControlCommand::Smart(Some(false)),
            ControlCommand::Preset("FX".to_string()),
            ControlCommand::Disable,
        ] {
            assert_eq!(cmd.to_string().parse::<ControlCommand>().unwrap(), cmd);
        }
    }
}
