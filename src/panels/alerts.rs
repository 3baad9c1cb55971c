//! # Alerts Panel
//!
//! Fills the gap between the current-conditions icon and the header. A single
//! alert gets a 48 px hazard icon and up to two lines of text; two or more are
//! shown compactly, one line each with a 32 px icon. Anything past
//! [`MAX_SHOWN`] is dropped without a "more" marker.

use super::header::{date_text, CITY_FONT, DATE_FONT};
use super::{draw_icon, PanelContext};
use crate::alerts::{AlertSelector, MAX_SHOWN};
use crate::conditions::alert_icon;
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::IconSize;
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::{draw_aligned, draw_wrapped, title_case};
use crate::Alignment;
use log::{debug, warn};

const LEFT: i32 = 196;

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let config = &ctx.config.alerts;
    if !config.enabled || inputs.alerts.is_empty() {
        return;
    }
    let selected = match AlertSelector::from_config(config).select(&inputs.alerts) {
        Ok(selected) => selected,
        Err(e) => {
            warn!("Skipping alerts panel: {}", e);
            return;
        }
    };
    debug!("{} of {} alerts survive selection", selected.len(), inputs.alerts.len());
    if selected.is_empty() {
        return;
    }

    // room left of the header text
    target.set_font(CITY_FONT);
    let city_w = target.measure(&ctx.config.location.city).0 as i32;
    target.set_font(DATE_FONT);
    let date_w = target.measure(&date_text(inputs, ctx)).0 as i32;
    let max_width = target.effective_width() - 2 - city_w.max(date_w) - (LEFT + 4) - 8;

    target.set_text_color(Color::Black);
    if let [alert] = selected.as_slice() {
        let max_width = (max_width - 48).max(0) as u32;
        draw_icon(target, LEFT, 8, alert_icon(&alert.event), IconSize::S48, ctx.accent);
        let event = title_case(&alert.event);
        let x = LEFT + 48 + 4;

        target.set_font(Font::Size14);
        if target.measure(&event).0 <= max_width {
            draw_aligned(target, x, 24 + 8 - 12 + 20 + 1, &event, Alignment::Left);
            return;
        }
        target.set_font(Font::Size12);
        if target.measure(&event).0 <= max_width {
            draw_aligned(target, x, 24 + 8 - 12 + 17 + 1, &event, Alignment::Left);
        } else {
            let y = 24 + 8 - 12 + 17 - 11;
            draw_wrapped(target, x, y, &event, Alignment::Left, max_width, 2, 23);
        }
        return;
    }

    let max_width = (max_width - 32).max(0) as u32;
    target.set_font(Font::Size12);
    for (i, alert) in selected.iter().take(MAX_SHOWN).enumerate() {
        let y = 32 * i as i32;
        draw_icon(target, LEFT, y, alert_icon(&alert.event), IconSize::S32, ctx.accent);
        let event = title_case(&alert.event);
        let x = LEFT + 32 + 3;
        draw_wrapped(target, x, 5 + 17 + y, &event, Alignment::Left, max_width, 1, 0);
    }
}
