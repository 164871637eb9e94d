//! Commands sent to the module on the AT channel.

use crate::codec::AtCodec;

/// AT commands used by the session, plus a raw passthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtCommand {
    /// Plain attention (`AT`).
    Attention,

    /// Switch command echo off (`ATE`).
    EchoOff,

    /// Switch command echo on (`ATE1`).
    EchoOn,

    /// Product identification (`ATI`).
    Identify,

    /// Select RTS/CTS flow control for data mode (`AT\Q3`).
    ExtendedResultMode,

    /// Configure the OBEX quoting mode (`AT^SQWE=<mode>`).
    ///
    /// Mode 0 arms the switch, mode 3 enters OBEX data mode.
    ObexQuoting {
        /// Mode number.
        mode: u8,
    },

    /// Send a raw command string.
    Raw {
        /// The raw command text, without terminator.
        command: String,
    },
}

impl AtCommand {
    /// Encode the command as bytes to send (including the `\r` terminator).
    pub fn encode(&self) -> Vec<u8> {
        AtCodec::encode_command(&self.to_command_string())
    }

    /// Get the command string without the terminator.
    pub fn to_command_string(&self) -> String {
        match self {
            AtCommand::Attention => "AT".to_string(),
            AtCommand::EchoOff => "ATE".to_string(),
            AtCommand::EchoOn => "ATE1".to_string(),
            AtCommand::Identify => "ATI".to_string(),
            AtCommand::ExtendedResultMode => "AT\\Q3".to_string(),
            AtCommand::ObexQuoting { mode } => format!("AT^SQWE={}", mode),
            AtCommand::Raw { command } => command.clone(),
        }
    }

    /// The three probes that switch the module into OBEX mode, in order.
    pub fn obex_switch_sequence() -> [AtCommand; 3] {
        [
            AtCommand::ExtendedResultMode,
            AtCommand::ObexQuoting { mode: 0 },
            AtCommand::ObexQuoting { mode: 3 },
        ]
    }

    /// Whether a shell line should be passed through as an AT command.
    pub fn is_at_line(line: &str) -> bool {
        line.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("AT"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_simple() {
        assert_eq!(AtCommand::Attention.encode(), b"AT\r");
        assert_eq!(AtCommand::EchoOff.encode(), b"ATE\r");
        assert_eq!(AtCommand::EchoOn.encode(), b"ATE1\r");
        assert_eq!(AtCommand::Identify.encode(), b"ATI\r");
    }

    #[test]
    fn test_obex_switch_sequence() {
        let encoded: Vec<Vec<u8>> = AtCommand::obex_switch_sequence()
            .iter()
            .map(AtCommand::encode)
            .collect();
        assert_eq!(
            encoded,
            vec![b"AT\\Q3\r".to_vec(), b"AT^SQWE=0\r".to_vec(), b"AT^SQWE=3\r".to_vec()]
        );
    }

    #[test]
    fn test_raw() {
        let cmd = AtCommand::Raw {
            command: "AT^SCFG?".to_string(),
        };
        assert_eq!(cmd.encode(), b"AT^SCFG?\r");
    }

    #[test]
    fn test_is_at_line() {
        assert!(AtCommand::is_at_line("AT+CSQ"));
        assert!(AtCommand::is_at_line("at^scfg?"));
        assert!(!AtCommand::is_at_line("ls"));
        assert!(!AtCommand::is_at_line("a"));
    }
}
