//! Five-day forecast strip: weekday, icon, high | low and a precipitation total per cell.

use super::{draw_icon, PanelContext};
use crate::conditions::Conditions;
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::IconSize;
use crate::locale::weekday_abbrev;
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::draw_aligned;
use crate::Alignment;
use chrono::Datelike;

const FIRST_CELL_X: i32 = 398 - 17;
const CELL_PITCH: i32 = 82;
const ICON_Y: i32 = 98 + 34 - 32 - 6;
const WEEKDAY_Y: i32 = 84;
const TEMPS_Y: i32 = 176;
const PRECIP_Y: i32 = 192;

/// Precipitation label for a daily liquid-equivalent total.
///
/// Nothing for a dry day, `"<1mm"` for trace amounts that would round to zero.
pub fn precip_label(total_mm: f32) -> String {
    if total_mm <= 0.0 || total_mm.is_nan() {
        String::new()
    } else if total_mm < 0.5 {
        "<1mm".to_string()
    } else {
        format!("{}mm", total_mm.round() as u32)
    }
}

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let temperature = ctx.units.temperature;
    target.set_text_color(Color::Black);

    let mut weekday = inputs.now.weekday();
    for (i, day) in inputs.daily.iter().enumerate() {
        let x = FIRST_CELL_X + CELL_PITCH * i as i32;
        let icon = Conditions::daily(day).icon();
        draw_icon(target, x, ICON_Y, icon, IconSize::S64, Color::Black);

        target.set_font(Font::Size11);
        draw_aligned(target, x + 31 - 2, WEEKDAY_Y, weekday_abbrev(weekday), Alignment::Center);
        weekday = weekday.succ();

        target.set_font(Font::Size8);
        draw_aligned(target, x + 31, TEMPS_Y, "|", Alignment::Center);
        let high = temperature.format_degrees(day.temp_max);
        let low = temperature.format_degrees(day.temp_min);
        draw_aligned(target, x + 31 - 4, TEMPS_Y, &high, Alignment::Right);
        draw_aligned(target, x + 31 + 5, TEMPS_Y, &low, Alignment::Left);

        let precip = precip_label(day.total_precip_mm());
        if !precip.is_empty() {
            target.set_font(Font::Size6);
            draw_aligned(target, x + 31, PRECIP_Y, &precip, Alignment::Center);
        }
    }
}
