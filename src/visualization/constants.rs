//! Visual constants for the topic graph.

use bevy::prelude::*;

// =============================================================================
// Node Colors
// =============================================================================

/// Resting node color (Silver).
pub const COLOR_NODE_DEFAULT: Color = Color::srgb(0.753, 0.753, 0.753); // #C0C0C0
/// Hovered node, dark palette (Cyan).
pub const COLOR_HOVER_DARK: Color = Color::srgb(0.0, 1.0, 1.0); // #00FFFF
/// Hovered node, light palette (Purple).
pub const COLOR_HOVER_LIGHT: Color = Color::srgb(0.557, 0.267, 0.678); // #8E44AD
/// Neighbor of hovered node, dark palette (Magenta).
pub const COLOR_ADJACENT_DARK: Color = Color::srgb(1.0, 0.0, 1.0); // #FF00FF
/// Neighbor of hovered node, light palette (Blue).
pub const COLOR_ADJACENT_LIGHT: Color = Color::srgb(0.204, 0.596, 0.859); // #3498DB

// =============================================================================
// Edge / Scene Colors
// =============================================================================

/// Edge line color (Magenta).
pub const COLOR_EDGE: Color = Color::srgba(1.0, 0.0, 1.0, 0.7);
/// Dark background.
pub const COLOR_BACKGROUND_DARK: Color = Color::srgb(0.051, 0.051, 0.118); // #0D0D1E
/// Light background.
pub const COLOR_BACKGROUND_LIGHT: Color = Color::srgb(0.961, 0.961, 0.961); // #F5F5F5
/// Label / tooltip text on dark background.
pub const COLOR_TEXT_DARK: Color = Color::srgb(0.969, 0.98, 0.988); // #F7FAFC
/// Label / tooltip text on light background.
pub const COLOR_TEXT_LIGHT: Color = Color::srgb(0.102, 0.125, 0.173); // #1A202C
/// Tooltip box, dark palette (Gray 800).
pub const COLOR_TOOLTIP_DARK: Color = Color::srgb(0.122, 0.161, 0.216); // #1F2937
/// Tooltip box, light palette.
pub const COLOR_TOOLTIP_LIGHT: Color = Color::WHITE;

// =============================================================================
// Geometry
// =============================================================================

/// Edge cylinder radius.
pub const EDGE_RADIUS: f32 = 0.03;
/// Glow shell radius relative to the node sphere.
pub const GLOW_SHELL_SCALE: f32 = 1.35;
/// Label offset above the node center, in node radii.
pub const LABEL_OFFSET: f32 = 2.4;
/// Linear fog range (start, end).
pub const FOG_RANGE: (f32, f32) = (10.0, 50.0);

// =============================================================================
// Helpers
// =============================================================================

pub fn background_color(dark_mode: bool) -> Color {
    if dark_mode {
        COLOR_BACKGROUND_DARK
    } else {
        COLOR_BACKGROUND_LIGHT
    }
}

pub fn text_color(dark_mode: bool) -> Color {
    if dark_mode {
        COLOR_TEXT_DARK
    } else {
        COLOR_TEXT_LIGHT
    }
}

/// Tooltip (background, text). Text matches the label color of the palette.
pub fn tooltip_palette(dark_mode: bool) -> (Color, Color) {
    let background = if dark_mode {
        COLOR_TOOLTIP_DARK
    } else {
        COLOR_TOOLTIP_LIGHT
    };
    (background, text_color(dark_mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_palette_follows_scene_palette() {
        assert_eq!(
            tooltip_palette(true),
            (COLOR_TOOLTIP_DARK, COLOR_TEXT_DARK)
        );
        assert_eq!(
            tooltip_palette(false),
            (COLOR_TOOLTIP_LIGHT, COLOR_TEXT_LIGHT)
        );
    }
}
