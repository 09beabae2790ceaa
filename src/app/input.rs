//! Input collaborator: a single-slot command channel fed from stdin.

use crate::app::shutdown::ShutdownManager;
use serpens_data::Command;
use std::io::BufRead;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Latest-command mailbox.
///
/// A newer command overwrites an unread older one; the simulation thread
/// takes at most one per tick and never blocks on it.
#[derive(Clone, Debug, Default)]
pub struct CommandSlot {
    slot: Arc<Mutex<Command>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, command: Command) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = command;
    }

    /// Removes and returns the pending command, leaving [`Command::None`].
    pub fn take(&self) -> Command {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *slot)
    }
}

/// Feeds key presses from `reader` into `slot` until end of input or `q`.
///
/// Every character of every line counts as a key press.
pub fn feed_keys<R: BufRead>(reader: R, slot: &CommandSlot, shutdown: &ShutdownManager) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        for key in line.chars() {
            if key.eq_ignore_ascii_case(&'q') {
                shutdown.request_shutdown();
                return;
            }
            let command = Command::from_key(key);
            if !command.is_none() {
                tracing::debug!(?command, "Key command");
                slot.send(command);
            }
        }
        if shutdown.is_shutdown_requested() {
            return;
        }
    }
}

/// Reads stdin on a background thread.
///
/// The thread blocks on stdin, so it is detached rather than joined.
pub fn spawn_stdin_reader(slot: CommandSlot, shutdown: ShutdownManager) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        feed_keys(stdin.lock(), &slot, &shutdown);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_latest_command_wins() {
        let slot = CommandSlot::new();
        slot.send(Command::Pause);
        slot.send(Command::ShowStats);
        assert_eq!(slot.take(), Command::ShowStats);
        assert_eq!(slot.take(), Command::None);
    }

    #[test]
    fn test_feed_keys_maps_and_quits() {
        let slot = CommandSlot::new();
        let shutdown = ShutdownManager::new();
        feed_keys(Cursor::new("xa\nQ\nb\n"), &slot, &shutdown);
        assert!(shutdown.is_shutdown_requested());
        assert_eq!(slot.take(), Command::Pause);
    }

    #[test]
    fn test_feed_keys_space_toggles() {
        let slot = CommandSlot::new();
        let shutdown = ShutdownManager::new();
        feed_keys(Cursor::new(" \n"), &slot, &shutdown);
        assert!(!shutdown.is_shutdown_requested());
        assert_eq!(slot.take(), Command::ToggleSingleMode);
    }
}
