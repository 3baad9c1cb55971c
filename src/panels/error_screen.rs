//! Full-screen error: a large icon above one or two lines of text.
//!
//! Drawn instead of the weather panels when the data collaborators fail before
//! a render pass can start.

use super::{draw_icon, PanelContext};
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::{IconCode, IconSize};
use crate::target::RenderTarget;
use crate::text_layout::{draw_aligned, draw_wrapped};
use crate::Alignment;
use serde::{Deserialize, Serialize};

const ICON: i32 = 196;
const LINE_SPACING: i32 = 55;

/// What went wrong before rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    LowBattery,
    Wifi,
    TimeSync,
    Api,
}

impl ErrorKind {
    pub fn icon(self) -> IconCode {
        match self {
            ErrorKind::LowBattery => IconCode::BatteryAlert,
            ErrorKind::Wifi => IconCode::WifiX,
            ErrorKind::TimeSync => IconCode::Time4,
            ErrorKind::Api => IconCode::CloudDown,
        }
    }

    /// Message shown when the caller has nothing more specific.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::LowBattery => "Low Battery",
            ErrorKind::Wifi => "WiFi Connection Failed",
            ErrorKind::TimeSync => "Time Synchronization Failed",
            ErrorKind::Api => "API Error",
        }
    }
}

/// Draw the error screen.
///
/// With a `detail` line both lines are drawn as given; a lone `message` is
/// wrapped onto at most two lines.
pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    kind: ErrorKind,
    message: &str,
    detail: Option<&str>,
    ctx: &PanelContext,
) {
    let width = target.effective_width();
    let height = target.effective_height();
    let center_x = width / 2;
    let text_y = height / 2 + ICON / 2 + 21;

    target.set_font(Font::Size26);
    target.set_text_color(Color::Black);
    match detail.filter(|d| !d.is_empty()) {
        Some(detail) => {
            draw_aligned(target, center_x, text_y, message, Alignment::Center);
            draw_aligned(target, center_x, text_y + LINE_SPACING, detail, Alignment::Center);
        }
        None => {
            let max_width = (width - 200).max(0) as u32;
            draw_wrapped(
                target,
                center_x,
                text_y,
                message,
                Alignment::Center,
                max_width,
                2,
                LINE_SPACING,
            );
        }
    }

    let icon_y = height / 2 - ICON / 2 - 21;
    draw_icon(target, center_x - ICON / 2, icon_y, kind.icon(), IconSize::S196, ctx.accent);
}
