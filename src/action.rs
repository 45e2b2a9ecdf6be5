use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::ContainerCreateOptions;

/// High-level actions that can be triggered by key bindings or emitted by components.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Action {
    Resize(u16, u16),
    Quit,
    Error(String),
    /// Close the active dialog without producing anything
    DialogClose,
    /// User confirmed the container create dialog
    ContainerCreate(Box<ContainerCreateOptions>),

    // Navigation and editing keys, resolved through the keybinding config
    Escape,
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Delete,
    GoToFirst,
    GoToLast,
    ToggleSpace,
    Paste,
    ToggleInstructions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::DialogClose.to_string(), "DialogClose");
        let create = Action::ContainerCreate(Box::default());
        assert_eq!(create.to_string(), "ContainerCreate");
    }

    #[test]
    fn test_action_deserialize_from_binding_value() {
        let action: Action = json5::from_str("\"ToggleInstructions\"").unwrap();
        assert_eq!(action, Action::ToggleInstructions);
    }
}
