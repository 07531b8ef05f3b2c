use ratatui::style::Color;

pub const FOCUSED_BORDER: Color = Color::Cyan;
pub const UNFOCUSED_BORDER: Color = Color::White;
pub const SELECTED_BG: Color = Color::Blue;

pub const NORMAL_TEXT: Color = Color::White;
pub const LABEL_TEXT: Color = Color::DarkGray;
pub const HIGHLIGHT_TEXT: Color = Color::Yellow;
pub const LINK_TEXT: Color = Color::LightCyan;

pub const COLUMN_UNSET: Color = Color::Gray;
pub const COLUMN_TODO: Color = Color::White;
pub const COLUMN_BLOCKED: Color = Color::Red;
pub const COLUMN_IN_PROGRESS: Color = Color::Yellow;
pub const COLUMN_DONE: Color = Color::Green;

pub const DUE_OVERDUE: Color = Color::LightRed;
pub const DUE_TODAY: Color = Color::LightGreen;

pub const POPUP_BG: Color = Color::Black;
pub const ERROR_COLOR: Color = Color::Red;
