//! Nordic Frost color theme definitions.
//!
//! Colors used by the interactive picker, based on the Nord palette.

use ratatui::style::Color;

/// Lightest polar night shade.
pub const NORD_POLAR_NIGHT_4: Color = Color::Rgb(76, 86, 106);
/// Primary snow storm shade.
pub const NORD_SNOW_STORM_1: Color = Color::Rgb(216, 222, 233);
/// Frost accent 2 - cyan (primary accent).
pub const NORD_FROST_2: Color = Color::Rgb(136, 192, 208);

// === Semantic Color Aliases ===

/// Primary text color.
pub const TEXT_PRIMARY: Color = NORD_SNOW_STORM_1;
/// Secondary/muted text color.
pub const TEXT_SECONDARY: Color = NORD_POLAR_NIGHT_4;
/// Primary accent color.
pub const ACCENT_PRIMARY: Color = NORD_FROST_2;

// === UI Element Colors ===

/// Focused element border color.
pub const BORDER_FOCUSED: Color = NORD_FROST_2;
/// Selected row background color.
pub const ROW_SELECTED_BG: Color = Color::Rgb(40, 40, 40);
/// Selected row text color.
pub const ROW_SELECTED_FG: Color = NORD_FROST_2;
