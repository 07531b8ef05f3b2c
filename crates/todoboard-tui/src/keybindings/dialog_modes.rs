use super::{Keybinding, KeybindingContext, KeybindingProvider};
use crate::prompt::PromptKind;

fn line_editing() -> Vec<Keybinding> {
    vec![
        Keybinding::input("Backspace/Del", "", "Delete character"),
        Keybinding::input("←/→", "", "Move cursor"),
        Keybinding::input("Home/End", "", "Jump to start/end"),
    ]
}

pub struct PromptProvider {
    kind: PromptKind,
}

impl PromptProvider {
    pub fn new(kind: PromptKind) -> Self {
        Self { kind }
    }
}

impl KeybindingProvider for PromptProvider {
    fn get_context(&self) -> KeybindingContext {
        let mut bindings = vec![
            Keybinding::input("Enter", "confirm", "Confirm"),
            Keybinding::input("Esc", "cancel", "Cancel"),
        ];
        bindings.extend(line_editing());
        KeybindingContext::new(self.kind.title(), bindings)
    }
}

pub struct FilterDialogProvider;

impl KeybindingProvider for FilterDialogProvider {
    fn get_context(&self) -> KeybindingContext {
        KeybindingContext::new(
            "Filters",
            vec![
                Keybinding::input("j/k", "move", "Move between rows"),
                Keybinding::input("Space", "toggle", "Toggle project or cycle due date"),
                Keybinding::input("a", "all", "Show all projects"),
                Keybinding::input("Esc", "close", "Close filters"),
            ],
        )
    }
}

pub struct CredentialGateProvider;

impl KeybindingProvider for CredentialGateProvider {
    fn get_context(&self) -> KeybindingContext {
        let mut bindings = vec![
            Keybinding::input("Enter", "save", "Save the API key"),
            Keybinding::input("Esc", "quit", "Quit"),
        ];
        bindings.extend(line_editing());
        KeybindingContext::new("API Key", bindings)
    }
}

pub struct HelpProvider;

impl KeybindingProvider for HelpProvider {
    fn get_context(&self) -> KeybindingContext {
        KeybindingContext::new(
            "Help",
            vec![Keybinding::input("Esc/?", "close", "Close help")],
        )
    }
}
