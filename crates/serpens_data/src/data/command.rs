use serde::{Deserialize, Serialize};

/// Discrete control signal delivered by the input collaborator.
///
/// At most one command is consumed per simulation tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Command {
    #[default]
    None,
    Pause,
    Resume,
    ToggleSingleMode,
    ShowStats,
    HideStats,
}

impl Command {
    /// Maps a key press to a command.
    ///
    /// Space toggles single-agent mode; `A`/`B` pause and resume; `C`/`D`
    /// show and hide statistics. Unknown keys map to [`Command::None`].
    #[must_use]
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_uppercase() {
            ' ' => Self::ToggleSingleMode,
            'A' => Self::Pause,
            'B' => Self::Resume,
            'C' => Self::ShowStats,
            'D' => Self::HideStats,
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}
