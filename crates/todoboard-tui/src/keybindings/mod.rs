pub mod board;
pub mod dialog_modes;
pub mod registry;

pub use registry::{BindingScope, KeybindingRegistry};

use crate::command::Command;

#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: String,
    /// Footer hint; empty for bindings listed only in the help overlay.
    pub short_description: String,
    pub description: String,
    pub command: Option<Command>,
}

impl Keybinding {
    pub fn new(
        key: impl Into<String>,
        short_description: impl Into<String>,
        description: impl Into<String>,
        command: Command,
    ) -> Self {
        Self {
            key: key.into(),
            short_description: short_description.into(),
            description: description.into(),
            command: Some(command),
        }
    }

    /// A binding handled by a popup rather than the command interpreter.
    pub fn input(
        key: impl Into<String>,
        short_description: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            short_description: short_description.into(),
            description: description.into(),
            command: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeybindingContext {
    pub name: String,
    pub bindings: Vec<Keybinding>,
}

impl KeybindingContext {
    pub fn new(name: impl Into<String>, bindings: Vec<Keybinding>) -> Self {
        Self {
            name: name.into(),
            bindings,
        }
    }

    /// `key: hint` pairs for the footer.
    pub fn footer_hints(&self) -> Vec<(&str, &str)> {
        self.bindings
            .iter()
            .filter(|b| !b.short_description.is_empty())
            .map(|b| (b.key.as_str(), b.short_description.as_str()))
            .collect()
    }
}

pub trait KeybindingProvider {
    fn get_context(&self) -> KeybindingContext;
}
