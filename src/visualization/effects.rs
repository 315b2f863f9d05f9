//! Glow and pulse parameters derived from highlight state.
//!
//! Every value here is a pure function of a highlight state and the scene
//! clock, which the frame loop passes in explicitly.

use bevy::prelude::*;

use super::constants::{
    COLOR_ADJACENT_DARK, COLOR_ADJACENT_LIGHT, COLOR_HOVER_DARK, COLOR_HOVER_LIGHT,
};
use super::graph::HighlightState;

/// Base glow for a highlighted node or edge.
pub const ACTIVE_GLOW: f32 = 1.6;
/// Relative size of the sinusoidal pulse on top of the base glow.
pub const PULSE_AMPLITUDE: f32 = 0.35;
/// Pulse angular speed (radians per second).
pub const PULSE_RATE: f32 = 4.0;

/// Monotonic scene time in seconds, advanced once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneClock(pub f32);

impl SceneClock {
    pub fn advance(&mut self, dt: f32) {
        self.0 += dt.max(0.0);
    }

    pub fn seconds(self) -> f32 {
        self.0
    }
}

fn base_glow(state: HighlightState) -> f32 {
    match state {
        HighlightState::Default => 0.0,
        HighlightState::Hovered | HighlightState::Adjacent => ACTIVE_GLOW,
    }
}

fn pulse(clock: SceneClock) -> f32 {
    1.0 + PULSE_AMPLITUDE * (clock.seconds() * PULSE_RATE).sin()
}

/// Emissive strength for a node. Idle nodes never glow.
pub fn node_glow(state: HighlightState, clock: SceneClock) -> f32 {
    base_glow(state) * pulse(clock)
}

/// Emissive strength for an edge; the pulse runs a quarter period behind
/// the nodes so connectors shimmer against their endpoints.
pub fn edge_glow(state: HighlightState, clock: SceneClock) -> f32 {
    let shifted = SceneClock(clock.seconds() - std::f32::consts::FRAC_PI_2 / PULSE_RATE);
    base_glow(state) * pulse(shifted)
}

/// Surface color for a node in the given state.
pub fn node_color(state: HighlightState, base: Color, dark_mode: bool) -> Color {
    match (state, dark_mode) {
        (HighlightState::Default, _) => base,
        (HighlightState::Hovered, true) => COLOR_HOVER_DARK,
        (HighlightState::Hovered, false) => COLOR_HOVER_LIGHT,
        (HighlightState::Adjacent, true) => COLOR_ADJACENT_DARK,
        (HighlightState::Adjacent, false) => COLOR_ADJACENT_LIGHT,
    }
}

/// Scale a color into an emissive term.
pub fn emissive(color: Color, intensity: f32) -> LinearRgba {
    let c = color.to_linear();
    LinearRgba::rgb(c.red * intensity, c.green * intensity, c.blue * intensity)
}
