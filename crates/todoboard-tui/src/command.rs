use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Board action bound to a key or chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Search,
    Escape,
    CreateTask,
    DeleteTask,
    CloseTask,
    NextMatch,
    PrevMatch,
    ScrollTop,
    ScrollBottom,
    PageDown,
    PageUp,
    HalfPageDown,
    HalfPageUp,
    OpenDetail,
    HistoryBack,
    HistoryForward,
    SelectNext,
    SelectPrev,
    FollowLink,
    OpenUrl,
    Filter,
    GoTaskList,
    GoRoot,
    Refetch,
    Help,
    Quit,
}

/// Translates key presses into [`Command`]s.
///
/// Chords are detected with a two-slot buffer holding the previous and the
/// current key. Each board view owns its own interpreter.
#[derive(Debug, Default)]
pub struct CommandInterpreter {
    chord: [Option<KeyCode>; 2],
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.chord = [None, None];
    }

    /// The key waiting for a second chord key, if any.
    pub fn pending(&self) -> Option<KeyCode> {
        self.chord[1]
    }

    pub fn interpret(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        self.chord = [self.chord[1], Some(key.code)];

        if let [Some(KeyCode::Char('g')), Some(second)] = self.chord {
            let chord = match second {
                KeyCode::Char('g') => Some(Command::ScrollTop),
                KeyCode::Char('d') => Some(Command::OpenDetail),
                KeyCode::Char('t') => Some(Command::GoTaskList),
                KeyCode::Char('h') => Some(Command::GoRoot),
                _ => None,
            };
            if chord.is_some() {
                self.reset();
                return chord;
            }
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => Some(Command::PageDown),
            KeyCode::Char('u') if ctrl => Some(Command::PageUp),
            KeyCode::Char('c') if ctrl => Some(Command::Quit),
            _ if ctrl => None,
            KeyCode::Char('h') | KeyCode::Left => Some(Command::MoveLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Command::MoveRight),
            KeyCode::Char('/') => Some(Command::Search),
            KeyCode::Esc => Some(Command::Escape),
            KeyCode::Char('o') => Some(Command::CreateTask),
            KeyCode::Char('x') => Some(Command::DeleteTask),
            KeyCode::Char('c') => Some(Command::CloseTask),
            KeyCode::Char('n') => Some(Command::NextMatch),
            KeyCode::Char('N') => Some(Command::PrevMatch),
            KeyCode::Char('G') => Some(Command::ScrollBottom),
            KeyCode::Char('j') => Some(Command::HalfPageDown),
            KeyCode::Char('k') => Some(Command::HalfPageUp),
            KeyCode::Char('H') => Some(Command::HistoryBack),
            KeyCode::Char('L') => Some(Command::HistoryForward),
            KeyCode::Tab => Some(Command::SelectNext),
            KeyCode::BackTab => Some(Command::SelectPrev),
            KeyCode::Enter => Some(Command::FollowLink),
            KeyCode::Char('O') => Some(Command::OpenUrl),
            KeyCode::Char('f') => Some(Command::Filter),
            KeyCode::Char('r') => Some(Command::Refetch),
            KeyCode::Char('?') => Some(Command::Help),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}
