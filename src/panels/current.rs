//! # Current Conditions
//!
//! Left-hand column: a large condition icon with the temperature and feels-like
//! line next to it, then rows of metric cells in two columns. The first three
//! rows are fixed (sunrise | sunset, wind | humidity, UV | pressure); the
//! configured [`MetricsLayout`] adds air quality | visibility and/or indoor
//! temperature | indoor humidity.

use super::{draw_icon, PanelContext};
use crate::air_quality::{aqi, aqi_description, aqi_label, uv_description};
use crate::conditions::{wind_arrow, Conditions};
use crate::config::MetricsLayout;
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::{IconCode, IconSize};
use crate::locale::{self, strftime, TXT_UNAVAILABLE};
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::{draw_aligned, draw_wrapped};
use crate::units::Quantity;
use crate::Alignment;

const TEMP_X: i32 = 196 + 162 / 2;
const TEMP_Y: i32 = 98 + 69 / 2 - 1;
const FEELS_LIKE_X: i32 = TEMP_X + 20;
const FEELS_LIKE_Y: i32 = 98 + 63;
const UNIT_Y: i32 = 84;

const LOWER_Y: i32 = 196 - 9;
const ROW_PITCH: i32 = 48 + 8;
const RIGHT_COLUMN: i32 = 170;
const DESCRIPTOR_SPACING: i32 = 8;

/// One metric cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Metric {
    Sunrise,
    Sunset,
    Wind,
    Humidity,
    UvIndex,
    Pressure,
    AirQuality,
    Visibility,
    IndoorTemperature,
    IndoorHumidity,
}

impl Metric {
    fn icon(self) -> IconCode {
        match self {
            Metric::Sunrise => IconCode::Sunrise,
            Metric::Sunset => IconCode::Sunset,
            Metric::Wind => IconCode::StrongWind,
            Metric::Humidity => IconCode::Humidity,
            Metric::UvIndex => IconCode::DaySunny,
            Metric::Pressure => IconCode::Barometer,
            Metric::AirQuality => IconCode::AirFilter,
            Metric::Visibility => IconCode::Visibility,
            Metric::IndoorTemperature => IconCode::HouseThermometer,
            Metric::IndoorHumidity => IconCode::HouseHumidity,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Metric::Sunrise => locale::TXT_SUNRISE,
            Metric::Sunset => locale::TXT_SUNSET,
            Metric::Wind => locale::TXT_WIND,
            Metric::Humidity => locale::TXT_HUMIDITY,
            Metric::UvIndex => locale::TXT_UV_INDEX,
            Metric::Pressure => locale::TXT_PRESSURE,
            Metric::AirQuality => locale::TXT_AIR_QUALITY,
            Metric::Visibility => locale::TXT_VISIBILITY,
            Metric::IndoorTemperature => locale::TXT_INDOOR_TEMPERATURE,
            Metric::IndoorHumidity => locale::TXT_INDOOR_HUMIDITY,
        }
    }
}

fn rows(layout: MetricsLayout) -> Vec<[Metric; 2]> {
    let mut rows = vec![
        [Metric::Sunrise, Metric::Sunset],
        [Metric::Wind, Metric::Humidity],
        [Metric::UvIndex, Metric::Pressure],
    ];
    let air = [Metric::AirQuality, Metric::Visibility];
    let indoor = [Metric::IndoorTemperature, Metric::IndoorHumidity];
    match layout {
        MetricsLayout::AirQuality => rows.push(air),
        MetricsLayout::Indoor => rows.push(indoor),
        MetricsLayout::Both => rows.extend([air, indoor]),
    }
    rows
}

/// Icon for the current conditions, day or night by time of day.
pub fn condition_icon(inputs: &RenderInputs) -> IconCode {
    Conditions::current(&inputs.current, inputs.now).icon()
}

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    target.set_text_color(Color::Black);
    draw_icon(target, 0, 0, condition_icon(inputs), IconSize::S196, Color::Black);
    draw_headline(target, inputs, ctx);

    for (r, row) in rows(ctx.config.current.metrics).iter().enumerate() {
        let y = LOWER_Y + ROW_PITCH * r as i32;
        for (&metric, x) in row.iter().zip([0, RIGHT_COLUMN]) {
            draw_icon(target, x, y, metric.icon(), IconSize::S48, Color::Black);
            target.set_font(Font::Size7);
            draw_aligned(target, x + 48, y + 10, metric.label(), Alignment::Left);
            draw_value(target, metric, x + 48, y, inputs, ctx);
        }
    }
}

fn draw_headline<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let temperature = ctx.units.temperature;
    target.set_font(Font::Size48);
    draw_aligned(
        target,
        TEMP_X,
        TEMP_Y,
        &temperature.format(inputs.current.temp),
        Alignment::Center,
    );
    target.set_font(Font::Size14);
    let x = target.cursor_x();
    draw_aligned(target, x, UNIT_Y, temperature.unit_label(), Alignment::Left);

    target.set_font(Font::Size12);
    let feels_like = format!(
        "{} {}",
        locale::TXT_FEELS_LIKE,
        temperature.format_degrees(inputs.current.feels_like)
    );
    draw_aligned(target, FEELS_LIKE_X, FEELS_LIKE_Y, &feels_like, Alignment::Center);
}

/// Value (and unit or descriptor) of one cell; `x` is the text column, `y` the row top.
fn draw_value<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    metric: Metric,
    x: i32,
    y: i32,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let current = &inputs.current;
    let units = &ctx.units;
    let value_y = y + 17 / 2 + 48 / 2;

    let (value, suffix) = match metric {
        Metric::Sunrise => (strftime(&current.sunrise, &ctx.config.format.time), String::new()),
        Metric::Sunset => (strftime(&current.sunset, &ctx.config.format.time), String::new()),
        Metric::Wind => {
            let wind = &ctx.config.wind;
            let suffix = format!(" {}", units.speed.unit_label());
            if wind.arrow {
                let arrow = wind_arrow(current.wind_deg, wind.precision);
                draw_icon(target, x, y + 12, arrow, IconSize::S24, Color::Black);
                let speed = units.speed.format(current.wind_speed);
                target.set_font(Font::Size12);
                draw_aligned(target, x + 24, value_y, &speed, Alignment::Left);
                draw_suffix(target, value_y, &suffix);
                return;
            }
            (
                units.speed.format(current.wind_speed),
                format!("{} {}", suffix, wind.precision.label(current.wind_deg)),
            )
        }
        Metric::Humidity => (current.humidity.to_string(), "%".to_string()),
        Metric::UvIndex => {
            let uvi = current.uvi.max(0.0).round() as u32;
            target.set_font(Font::Size12);
            draw_aligned(target, x, value_y, &uvi.to_string(), Alignment::Left);
            draw_descriptor(target, value_y, uv_description(uvi));
            return;
        }
        Metric::Pressure => (
            units.pressure.format(current.pressure),
            format!(" {}", units.pressure.unit_label()),
        ),
        Metric::AirQuality => {
            let index = aqi(&inputs.air_quality);
            target.set_font(Font::Size12);
            draw_aligned(target, x, value_y, &aqi_label(index), Alignment::Left);
            draw_descriptor(target, value_y, aqi_description(index));
            return;
        }
        Metric::Visibility => (
            units.distance.format(current.visibility),
            format!(" {}", units.distance.unit_label()),
        ),
        Metric::IndoorTemperature => {
            let kelvin = inputs.indoor.temperature;
            let value = if kelvin.is_nan() {
                TXT_UNAVAILABLE.to_string()
            } else {
                units.temperature.format_indoor(kelvin)
            };
            (value, units.temperature.degree_suffix().to_string())
        }
        Metric::IndoorHumidity => {
            let humidity = inputs.indoor.humidity;
            let value = if humidity.is_nan() {
                TXT_UNAVAILABLE.to_string()
            } else {
                (humidity.round() as i32).to_string()
            };
            (value, "%".to_string())
        }
    };

    target.set_font(Font::Size12);
    draw_aligned(target, x, value_y, &value, Alignment::Left);
    if !suffix.is_empty() {
        draw_suffix(target, value_y, &suffix);
    }
}

/// Unit text in the small font, right after the value just printed.
fn draw_suffix<D: DisplayDriver>(target: &mut RenderTarget<D>, y: i32, suffix: &str) {
    target.set_font(Font::Size8);
    let x = target.cursor_x();
    draw_aligned(target, x, y, suffix, Alignment::Left);
}

/// Category text after a value, shrunk and then wrapped to end before the right column.
fn draw_descriptor<D: DisplayDriver>(target: &mut RenderTarget<D>, y: i32, text: &str) {
    let x = target.cursor_x() + DESCRIPTOR_SPACING;
    let max_width = (RIGHT_COLUMN - x).max(0) as u32;

    for font in [Font::Size7, Font::Size5] {
        target.set_font(font);
        if target.measure(text).0 <= max_width {
            draw_aligned(target, x, y, text, Alignment::Left);
            return;
        }
    }
    draw_wrapped(target, x, y - 10, text, Alignment::Left, max_width, 2, 10);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{MemoryPanel, PagedCanvas};
    use crate::config::Config;
    use crate::panels::fixtures;
    use crate::testing::{Call, RecordingDriver};
    use crate::Margins;

    fn render(config: &Config, inputs: &RenderInputs) -> RecordingDriver {
        let ctx = PanelContext::new(config);
        let mut target =
            RenderTarget::acquire(RecordingDriver::new(), config.display.margins(), 800, 480);
        draw(&mut target, inputs, &ctx);
        target.release()
    }

    #[test]
    fn test_day_and_night_icon_from_sun_times() {
        let mut inputs = fixtures::inputs(7);
        inputs.current.temp = 283.15;
        inputs.current.condition_id = 800;
        inputs.current.clouds = 0;
        inputs.current.wind_speed = 2.0;
        inputs.current.wind_gust = None;
        inputs.current.sunrise = fixtures::at(6, 0);
        inputs.current.sunset = fixtures::at(18, 0);
        assert_eq!(condition_icon(&inputs), IconCode::DaySunny);

        inputs.now = fixtures::at(19, 0);
        assert_eq!(condition_icon(&inputs), IconCode::NightClear);
    }

    #[test]
    fn test_day_and_night_frames_differ() {
        let config = Config::default();
        let ctx = PanelContext::new(&config);
        let mut inputs = fixtures::inputs(7);
        inputs.current.condition_id = 800;
        inputs.current.clouds = 0;
        inputs.current.wind_speed = 2.0;
        inputs.current.wind_gust = None;

        let mut frames = Vec::new();
        for hour in [7, 19] {
            inputs.now = fixtures::at(hour, 0);
            let canvas = PagedCanvas::new(MemoryPanel::new(800, 480), 480, false);
            let mut target = RenderTarget::acquire(canvas, Margins { x: 20, y: 12 }, 800, 480);
            target.begin_pass();
            draw(&mut target, &inputs, &ctx);
            target.flip_page();
            frames.push(target.release().into_panel());
        }
        assert_ne!(frames[0].frame().black_buffer(), frames[1].frame().black_buffer());
    }

    #[test]
    fn test_temperature_converted_at_draw_time() {
        let mut config = Config::default();
        let mut inputs = fixtures::inputs(12);
        inputs.current.temp = 283.15;
        inputs.current.feels_like = 281.15;

        config.units.temperature = crate::units::TemperatureUnit::Celsius;
        let driver = render(&config, &inputs);
        assert!(driver.find_print("10").is_some());
        assert!(driver.find_print("\u{B0}C").is_some());
        assert!(driver.find_print("Feels Like 8\u{B0}").is_some());

        config.units.temperature = crate::units::TemperatureUnit::Fahrenheit;
        let driver = render(&config, &inputs);
        assert!(driver.find_print("50").is_some());
        assert!(driver.find_print("Feels Like 46\u{B0}").is_some());
    }

    #[test]
    fn test_nan_indoor_reading_is_placeholder() {
        let mut config = Config::default();
        config.current.metrics = MetricsLayout::Indoor;
        let mut inputs = fixtures::inputs(12);
        inputs.indoor.temperature = f32::NAN;
        inputs.indoor.humidity = f32::NAN;

        let driver = render(&config, &inputs);
        let dashes = driver.texts().iter().filter(|t| **t == TXT_UNAVAILABLE).count();
        assert_eq!(dashes, 2);
        assert!(!driver.texts().iter().any(|t| t.contains("NaN")));
    }

    #[test]
    fn test_indoor_reading_formats() {
        let mut config = Config::default();
        config.current.metrics = MetricsLayout::Indoor;
        config.units.temperature = crate::units::TemperatureUnit::Celsius;
        let mut inputs = fixtures::inputs(12);
        inputs.indoor.temperature = 294.55;
        inputs.indoor.humidity = 41.6;

        let driver = render(&config, &inputs);
        assert!(driver.find_print("21.4").is_some());
        assert!(driver.find_print("42").is_some());
    }

    #[test]
    fn test_layout_selects_rows() {
        let mut config = Config::default();
        let inputs = fixtures::inputs(12);
        let icons = |driver: &RecordingDriver| {
            driver
                .bitmaps()
                .iter()
                .filter(|c| matches!(c, Call::Bitmap { size: 48, .. }))
                .count()
        };

        config.current.metrics = MetricsLayout::Both;
        assert_eq!(icons(&render(&config, &inputs)), 10);
        config.current.metrics = MetricsLayout::AirQuality;
        let driver = render(&config, &inputs);
        assert_eq!(icons(&driver), 8);
        assert!(driver.find_print(locale::TXT_AIR_QUALITY).is_some());
        assert!(driver.find_print(locale::TXT_INDOOR_TEMPERATURE).is_none());
    }

    #[test]
    fn test_rows_are_offset_by_margins() {
        let config = Config::default();
        let driver = render(&config, &fixtures::inputs(12));
        // sunset label sits in the right column of the first row
        assert!(matches!(
            driver.find_print(locale::TXT_SUNSET),
            Some(Call::Print { x: 238, y: 209, font: Font::Size7, .. })
        ));
    }

    #[test]
    fn test_wind_without_arrow_appends_compass_point() {
        let mut config = Config::default();
        config.wind.arrow = false;
        config.units.speed = crate::units::SpeedUnit::MetersPerSecond;
        let mut inputs = fixtures::inputs(12);
        inputs.current.wind_deg = 92;

        let driver = render(&config, &inputs);
        assert!(driver.find_print(" m/s E").is_some());
        assert!(!driver.bitmaps().iter().any(|c| matches!(c, Call::Bitmap { size: 24, .. })));
    }
}
