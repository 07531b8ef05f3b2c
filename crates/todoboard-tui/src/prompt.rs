use crossterm::event::{KeyCode, KeyEvent};
use todoboard_core::TextInput;

/// What a prompt popup is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    NewTask,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Search => "Search",
            PromptKind::NewTask => "New Task",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PromptKind::Search => "Enter text:",
            PromptKind::NewTask => "Enter content for new task (content|due):",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    /// Enter; the text may be empty.
    Submitted(String),
    /// Esc; no value at all.
    Cancelled,
}

/// Modal single-line text prompt.
#[derive(Debug)]
pub struct Prompt {
    kind: PromptKind,
    input: TextInput,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: TextInput::new(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => PromptOutcome::Submitted(self.input.take()),
            code => {
                edit_line(&mut self.input, code);
                PromptOutcome::Pending
            }
        }
    }
}

/// Apply a line-editing key to `input`. Returns false for keys that do not
/// edit text.
pub fn edit_line(input: &mut TextInput, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(prompt: &mut Prompt, code: KeyCode) -> PromptOutcome {
        prompt.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_submit_returns_text() {
        let mut prompt = Prompt::new(PromptKind::Search);
        for c in "milk".chars() {
            press(&mut prompt, KeyCode::Char(c));
        }
        press(&mut prompt, KeyCode::Left);
        press(&mut prompt, KeyCode::Backspace);
        assert_eq!(
            press(&mut prompt, KeyCode::Enter),
            PromptOutcome::Submitted("mik".to_string())
        );
    }

    #[test]
    fn test_empty_submit_is_not_cancel() {
        let mut prompt = Prompt::new(PromptKind::NewTask);
        assert_eq!(
            press(&mut prompt, KeyCode::Enter),
            PromptOutcome::Submitted(String::new())
        );
        assert_eq!(press(&mut prompt, KeyCode::Esc), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_non_edit_keys_are_ignored() {
        let mut input = TextInput::new();
        assert!(!edit_line(&mut input, KeyCode::Tab));
        assert!(edit_line(&mut input, KeyCode::Char('a')));
        assert_eq!(input.as_str(), "a");
    }
}
