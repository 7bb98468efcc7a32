//! Key bindings mapped to editing commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Enter,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            shift: false,
            ctrl: false,
        }
    }

    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    IndentMore,
    IndentLess,
    InsertNewline,
    DeleteCharBackward,
    DeleteCharForward,
    CursorCharLeft,
    CursorCharRight,
    Undo,
}

impl Command {
    /// Commands that edit the document are refused by a read-only view.
    pub fn edits(self) -> bool {
        !matches!(self, Self::CursorCharLeft | Self::CursorCharRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: Key,
    pub run: Command,
}

pub fn indent_with_tab() -> Vec<KeyBinding> {
    vec![
        KeyBinding {
            key: Key::new(KeyCode::Tab),
            run: Command::IndentMore,
        },
        KeyBinding {
            key: Key::new(KeyCode::Tab).with_shift(),
            run: Command::IndentLess,
        },
    ]
}

pub fn standard_keymap() -> Vec<KeyBinding> {
    vec![
        KeyBinding {
            key: Key::new(KeyCode::Enter),
            run: Command::InsertNewline,
        },
        KeyBinding {
            key: Key::new(KeyCode::Backspace),
            run: Command::DeleteCharBackward,
        },
        KeyBinding {
            key: Key::new(KeyCode::Delete),
            run: Command::DeleteCharForward,
        },
        KeyBinding {
            key: Key::new(KeyCode::ArrowLeft),
            run: Command::CursorCharLeft,
        },
        KeyBinding {
            key: Key::new(KeyCode::ArrowRight),
            run: Command::CursorCharRight,
        },
        KeyBinding {
            key: Key::new(KeyCode::Char('z')).with_ctrl(),
            run: Command::Undo,
        },
    ]
}
