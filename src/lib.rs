//! # E-Paper Weather Core Library
//!
//! This library turns typed weather, indoor-sensor and device-status records into
//! pixel primitives for a 7.5" 800x480 e-paper panel. It is designed for a
//! battery-powered controller that wakes briefly, renders one frame and sleeps.
//!
//! ## Design Philosophy
//!
//! ### One-way data flow
//! Input records → panel renderers (text, icon, chart and alert helpers) → pixel
//! primitives → hardware driver. Inputs are never mutated: every string transform
//! (for instance title-casing an alert event) returns a new value.
//!
//! ### Paged refresh
//! Panels hold no state between pages. The [`sequencer::PageSequencer`] redraws the
//! whole frame once per hardware page until the driver reports no pages remain,
//! then hibernates and powers the panel down.
//!
//! ### Never fail mid-pass
//! Missing icons resolve through a fallback table, text that does not fit is wrapped,
//! truncated with an ellipsis or clipped, NaN sensor readings render as a dash
//! placeholder, and driver faults are logged instead of propagated. The only
//! caller-visible failure surface is the dedicated error screen.
//!
//! ## Module Map
//! - [`target`]: margin-aware [`target::RenderTarget`] owned for one pass
//! - [`text_layout`]: measurement, aligned draw, greedy wrap/truncate
//! - [`icons`] / [`conditions`]: semantic icon codes, bitmap resolution, selection rules
//! - [`chart`]: outlook chart auto-scaler
//! - [`alerts`]: dedup/filter/cap logic for the alerts panel
//! - [`panels`]: one renderer per display region
//! - [`sequencer`]: paged refresh state machine and wake-cycle entry point

use serde::{Deserialize, Serialize};

// Module declarations
pub mod air_quality;
pub mod alerts;
pub mod canvas;
pub mod chart;
pub mod conditions;
pub mod config;
pub mod driver;
pub mod epd7in5;
pub mod fallback;
pub mod fonts;
pub mod framebuffer;
pub mod icons;
pub mod locale;
pub mod model;
pub mod panels;
pub mod preview;
pub mod sequencer;
pub mod target;
pub mod text_layout;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use framebuffer::Color;
pub use model::RenderInputs;
pub use sequencer::PageSequencer;

/// Fixed offsets between logical (panel) coordinates and physical pixels.
///
/// The bezel of the target frame covers the outermost pixels, so every primitive
/// is shifted by `x` and `y` before it reaches the driver. The effective drawing
/// area shrinks by twice the margin on each axis.
///
/// # Example
/// ```
/// use weather_epd_lib::Margins;
///
/// let margins = Margins { x: 20, y: 12 };
/// assert_eq!(margins.to_physical(0, 0), (20, 12));
/// assert_eq!(margins.effective_size(800, 480), (760, 456));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    /// Horizontal offset applied to every x coordinate
    pub x: i32,
    /// Vertical offset applied to every y coordinate
    pub y: i32,
}

impl Margins {
    /// Translate a logical coordinate into a physical one.
    pub fn to_physical(&self, x: i32, y: i32) -> (i32, i32) {
        (x + self.x, y + self.y)
    }

    /// Translate a physical coordinate back into logical space.
    pub fn to_logical(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.x, y - self.y)
    }

    /// Width and height left for panels on a panel of the given physical size.
    pub fn effective_size(&self, width: u32, height: u32) -> (i32, i32) {
        (width as i32 - 2 * self.x, height as i32 - 2 * self.y)
    }
}

/// Horizontal anchoring of a single line of text relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at x
    Left,
    /// Text is centred on x
    Center,
    /// Text ends at x
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_round_trip_is_identity() {
        let margins = Margins { x: 20, y: 12 };
        let (px, py) = margins.to_physical(350, 410);
        assert_eq!((px, py), (370, 422));
        assert_eq!(margins.to_logical(px, py), (350, 410));
    }

    #[test]
    fn test_zero_margins_leave_panel_size() {
        let margins = Margins { x: 0, y: 0 };
        assert_eq!(margins.effective_size(800, 480), (800, 480));
    }
}
