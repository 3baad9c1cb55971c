//! # Outlook Chart
//!
//! Hourly temperature curve over a dotted precipitation fill. The temperature
//! axis sits on the left in the accent colour; the precipitation axis, when
//! there is any precipitation at all, sits on the right and narrows the plot.
//! Axis bounds come from [`crate::chart`].

use super::PanelContext;
use crate::chart::{PrecipAxis, TempAxis, TICK_INTERVALS};
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::locale::strftime;
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::draw_aligned;
use crate::units::{HourlyPrecipUnit, Quantity};
use crate::Alignment;
use log::debug;

const X0: i32 = 350;
const Y0: i32 = 216;
/// Room below the x axis for ticks and hour labels.
const BOTTOM_GAP: i32 = 46;
/// Room right of the plot when the precipitation axis is hidden.
const RIGHT_GAP_PROBABILITY: i32 = 23;
const RIGHT_GAP_AMOUNT: i32 = 24;
/// Room taken by the precipitation labels.
const PRECIP_LABELS_WIDTH: i32 = 23;
const MAX_X_TICKS: usize = 8;

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let hourly = &inputs.hourly;
    if hourly.is_empty() {
        return;
    }
    let temperature = ctx.units.temperature;
    let precip_unit = ctx.units.hourly_precip;

    let temps: Vec<f32> = hourly.iter().map(|h| temperature.convert(h.temp)).collect();
    let precip: Vec<f32> = hourly
        .iter()
        .map(|h| match precip_unit {
            HourlyPrecipUnit::Probability => h.pop,
            HourlyPrecipUnit::Amount => h.precip_mm(),
        })
        .collect();
    let temp_axis = TempAxis::fit(&temps);
    let precip_axis = PrecipAxis::fit(&precip, precip_unit);
    debug!("Outlook axes: {:?}, {:?}", temp_axis, precip_axis);

    let y1 = target.effective_height() - BOTTOM_GAP;
    let mut x1 = target.effective_width()
        - match precip_unit {
            HourlyPrecipUnit::Probability => RIGHT_GAP_PROBABILITY,
            HourlyPrecipUnit::Amount => RIGHT_GAP_AMOUNT,
        };
    if precip_axis.is_shown() {
        x1 -= PRECIP_LABELS_WIDTH;
    }

    target.draw_line(X0, y1, x1, y1, Color::Black);
    target.draw_line(X0, y1 - 1, x1, y1 - 1, Color::Black);
    draw_gridlines(
        target,
        &temp_axis,
        &precip_axis,
        (x1, y1),
        temperature.degree_suffix(),
        ctx.accent,
    );

    let samples = hourly.len();
    let hour_interval = samples.div_ceil(MAX_X_TICKS);
    let x_interval = (x1 - X0 - 1) as f32 / samples as f32;
    let y_px_per_unit = (y1 - Y0) as f32 / (temp_axis.max - temp_axis.min) as f32;

    let point = |i: usize| {
        let x = (X0 as f32 + i as f32 * x_interval + 0.5 * x_interval).round() as i32;
        let y = (y1 as f32 - y_px_per_unit * (temps[i] - temp_axis.min as f32)).round() as i32;
        (x, y)
    };

    target.set_font(Font::Size8);
    target.set_text_color(Color::Black);
    for i in 0..samples {
        if i > 0 {
            let (xa, ya) = point(i - 1);
            let (xb, yb) = point(i);
            target.draw_line(xa, ya, xb, yb, ctx.accent);
            target.draw_line(xa, ya + 1, xb, yb + 1, ctx.accent);
            target.draw_line(xa - 1, ya, xb - 1, yb, ctx.accent);
        }

        if precip_axis.is_shown() && precip[i].is_finite() {
            let bar_x0 = (X0 as f32 + 1.0 + i as f32 * x_interval).round() as i32;
            let bar_x1 = (X0 as f32 + 1.0 + (i + 1) as f32 * x_interval).round() as i32;
            let px_per_precip = (y1 - Y0) as f32 / precip_axis.bound();
            let top = (y1 as f32 - px_per_precip * precip_axis.plotted(precip[i])).round() as i32;
            fill_dotted(target, bar_x0, bar_x1, top, y1);
        }

        if i % hour_interval == 0 {
            let x_tick = (X0 as f32 + i as f32 * x_interval) as i32;
            target.draw_line(x_tick, y1 + 1, x_tick, y1 + 4, Color::Black);
            target.draw_line(x_tick + 1, y1 + 1, x_tick + 1, y1 + 4, Color::Black);
            let label = strftime(&hourly[i].time, &ctx.config.format.hour);
            draw_aligned(target, x_tick, y1 + 1 + 12 + 4 + 3, &label, Alignment::Center);
        }
    }
}

/// Axis labels on both sides and a dotted line for every interval but the last.
fn draw_gridlines<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    temp_axis: &TempAxis,
    precip_axis: &PrecipAxis,
    (x1, y1): (i32, i32),
    degree_suffix: &str,
    accent: Color,
) {
    let y_interval = (y1 - Y0) as f32 / TICK_INTERVALS as f32;
    for i in 0..=TICK_INTERVALS {
        let y_tick = (Y0 as f32 + i as f32 * y_interval) as i32;

        target.set_font(Font::Size8);
        target.set_text_color(accent);
        let label = format!("{}{}", temp_axis.tick_value(i), degree_suffix);
        draw_aligned(target, X0 - 8, y_tick + 4, &label, Alignment::Right);

        if precip_axis.is_shown() {
            let (value, unit) = precip_axis.tick_label(i);
            target.set_text_color(Color::Black);
            draw_aligned(target, x1 + 8, y_tick + 4, &value, Alignment::Left);
            target.set_font(Font::Size5);
            let x = target.cursor_x();
            draw_aligned(target, x, y_tick + 4, unit, Alignment::Left);
        }

        if i < TICK_INTERVALS {
            let y = y_tick + y_tick % 2;
            for x in (X0..=x1 + 1).step_by(3) {
                target.draw_pixel(x, y, Color::Black);
            }
        }
    }
}

/// Every other pixel on every other row between `top` and the x axis at `y1`.
fn fill_dotted<D: DisplayDriver>(target: &mut RenderTarget<D>, x0: i32, x1: i32, top: i32, y1: i32) {
    let mut y = y1 - 1;
    while y > top {
        let mut x = x0 + x0 % 2;
        while x < x1 {
            target.draw_pixel(x, y, Color::Black);
            x += 2;
        }
        y -= 2;
    }
}
