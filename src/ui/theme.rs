//! Color palette for the chat screen.

use ratatui::style::Color;

pub const COLOR_USER: Color = Color::Cyan;
pub const COLOR_AGENT: Color = Color::Green;
pub const COLOR_DIM: Color = Color::DarkGray;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_STATUS: Color = Color::Yellow;
pub const COLOR_BORDER: Color = Color::DarkGray;
pub const COLOR_TOOL: Color = Color::Magenta;
