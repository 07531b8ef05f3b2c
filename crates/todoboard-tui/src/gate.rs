use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todoboard_core::TextInput;

use crate::prompt::edit_line;

/// What the credential form wants the app to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    None,
    Submit(String),
    Quit,
}

/// Entry form shown until an API key is stored.
#[derive(Debug, Default)]
pub struct CredentialGate {
    input: TextInput,
    error: Option<String>,
}

impl CredentialGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> GateAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return GateAction::Quit;
        }
        match key.code {
            KeyCode::Esc => GateAction::Quit,
            KeyCode::Enter => {
                let key = self.input.as_str().trim().to_string();
                if key.is_empty() {
                    self.error = Some("The key must not be blank".to_string());
                    GateAction::None
                } else {
                    self.error = None;
                    GateAction::Submit(key)
                }
            }
            code => {
                edit_line(&mut self.input, code);
                GateAction::None
            }
        }
    }
}
