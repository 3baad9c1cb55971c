//! # Panel Renderers
//!
//! One module per display region. Every renderer is a plain function of the
//! render target, the validated inputs and a [`PanelContext`]; none keeps state
//! between calls, so the sequencer can invoke the whole set once per hardware page.
//!
//! Renderers always set the font and text colour they need before drawing. The
//! driver's font/colour cursor is shared mutable state and a previous panel may
//! have left anything in it.
//!
//! Coordinates are logical (margins already removed). The default 800x480 panel
//! with 20/12 margins yields a 760x456 drawing area:
//!
//! ```text
//! +--------------+------------------------+--------------+
//! | icon 196     | alerts                 |  city / date |
//! |  temp  feels | forecast x5                           |
//! |--------------+---------------------------------------|
//! | metric rows  | outlook chart                         |
//! |              |                       status bar      |
//! +--------------+---------------------------------------+
//! ```

pub mod alerts;
pub mod current;
pub mod error_screen;
pub mod forecast;
pub mod header;
pub mod outlook;
pub mod status_bar;

pub use error_screen::ErrorKind;

use crate::config::{AccentColor, Config};
use crate::driver::DisplayDriver;
use crate::framebuffer::Color;
use crate::icons::{self, IconCode, IconSize};
use crate::target::RenderTarget;
use crate::units::DisplayUnits;

/// Configuration resolved once per render pass and shared by all panels.
#[derive(Clone, Debug)]
pub struct PanelContext<'a> {
    pub config: &'a Config,
    pub units: DisplayUnits,
    /// Ink used for highlights
    pub accent: Color,
}

impl<'a> PanelContext<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            units: DisplayUnits::from(&config.units),
            accent: match config.display.accent {
                AccentColor::Black => Color::Black,
                AccentColor::Red => Color::Accent,
            },
        }
    }
}

/// Resolve an icon and blit it with its top-left corner at logical `(x, y)`.
pub(crate) fn draw_icon<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    x: i32,
    y: i32,
    code: IconCode,
    size: IconSize,
    color: Color,
) {
    let bitmap = icons::resolve(code, size);
    target.draw_bitmap(x, y, &bitmap, color);
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::fallback;
    use crate::model::RenderInputs;
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// Synthetic inputs for 14 March 2024 (a Thursday) at `hour`:00.
    pub fn inputs(hour: u32) -> RenderInputs {
        fallback::synthetic(at(hour, 0), 24).unwrap()
    }
}
