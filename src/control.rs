//! Control channel: mpsc bridge feeding operator commands to the headless loop.
//!
//! Stdin lines and the Ctrl-C handler both post [`ControlCommand`]s here.

use std::sync::mpsc;

use crate::player::Navigation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Navigate(Navigation),
    /// Re-read the script file from disk.
    Reload,
    /// Print the current position.
    Status,
    Quit,
}

/// Parse one line of operator input. Unknown input yields `None`.
pub fn parse_command(input: &str) -> Option<ControlCommand> {
    let cmd = match input.trim().to_ascii_lowercase().as_str() {
        "n" | "next" | ">" | ">>" => ControlCommand::Navigate(Navigation::Advance),
        "p" | "prev" | "back" | "<" | "<<" => ControlCommand::Navigate(Navigation::Retreat),
        "0" | "r" | "reset" => ControlCommand::Navigate(Navigation::Reset),
        "l" | "load" | "reload" => ControlCommand::Reload,
        "s" | "status" => ControlCommand::Status,
        "q" | "quit" | "exit" => ControlCommand::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Sender half. Clone this for the stdin thread and the signal handler.
pub type ControlSender = mpsc::Sender<ControlCommand>;

/// Receiver half, held by the headless loop.
pub struct ControlReceiver {
    rx: mpsc::Receiver<ControlCommand>,
}

impl ControlReceiver {
    /// Block until the next command. `None` once every sender is gone.
    pub fn recv(&self) -> Option<ControlCommand> {
        self.rx.recv().ok()
    }

    /// Non-blocking poll for the next command.
    pub fn poll(&self) -> Option<ControlCommand> {
        self.rx.try_recv().ok()
    }
}

/// Create a new control channel pair.
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, ControlReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_navigation_words() {
        assert_eq!(
            parse_command("next"),
            Some(ControlCommand::Navigate(Navigation::Advance))
        );
        assert_eq!(
            parse_command("  P "),
            Some(ControlCommand::Navigate(Navigation::Retreat))
        );
        assert_eq!(
            parse_command("0"),
            Some(ControlCommand::Navigate(Navigation::Reset))
        );
    }

    #[test]
    fn parse_other_commands() {
        assert_eq!(parse_command("reload"), Some(ControlCommand::Reload));
        assert_eq!(parse_command("status"), Some(ControlCommand::Status));
        assert_eq!(parse_command("QUIT"), Some(ControlCommand::Quit));
        assert_eq!(parse_command("dance"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn send_and_receive() {
        let (tx, rx) = control_channel();
        tx.send(ControlCommand::Status).unwrap();
        assert_eq!(rx.poll(), Some(ControlCommand::Status));
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn multiple_senders() {
        let (tx, rx) = control_channel();
        let tx2 = tx.clone();
        tx.send(ControlCommand::Reload).unwrap();
        tx2.send(ControlCommand::Quit).unwrap();
        assert_eq!(rx.recv(), Some(ControlCommand::Reload));
        assert_eq!(rx.recv(), Some(ControlCommand::Quit));
    }

    #[test]
    fn recv_none_after_senders_dropped() {
        let (tx, rx) = control_channel();
        drop(tx);
        assert_eq!(rx.recv(), None);
    }
}
