//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Category, Priority};

/// Status bar background.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Focused field border and high priority rows.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Errors and destructive actions.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Help popup background.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Work => Color::Blue,
        Category::Personal => Color::Green,
        Category::Urgent => Color::Red,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => GOLD,
        Priority::Medium => Color::White,
        Priority::Low => Color::Gray,
    }
}
