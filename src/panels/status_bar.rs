//! # Status Bar
//!
//! Bottom-right row of device health segments, packed from the right edge
//! leftwards: battery, signal, last refresh, status message. Each enabled
//! segment draws its text right-aligned at the cursor, then its icon to the
//! left, and moves the cursor past both.
//!
//! Nothing stops the segments from running past the left edge of the drawing
//! area; the overflow is only logged.

use super::{draw_icon, PanelContext};
use crate::air_quality::{battery_percent, signal_description};
use crate::conditions::{battery_icon, wifi_icon};
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::{IconCode, IconSize};
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::draw_aligned;
use crate::Alignment;
use log::debug;

const SPACING: i32 = 2;
/// Weaker signals are drawn in the accent colour.
const WEAK_SIGNAL_DBM: i32 = -70;

/// Right-to-left packing cursor.
struct Packer<'t, D: DisplayDriver> {
    target: &'t mut RenderTarget<D>,
    pos: i32,
    baseline: i32,
}

impl<D: DisplayDriver> Packer<'_, D> {
    /// Draw `text` right-aligned at the cursor and move past it plus `gap`.
    fn text(&mut self, text: &str, color: Color, gap: i32) {
        self.target.set_text_color(color);
        draw_aligned(self.target, self.pos, self.baseline - 2, text, Alignment::Right);
        self.pos -= self.target.measure(text).0 as i32 + gap;
    }

    /// Draw an icon whose right edge sits at the cursor.
    fn icon(&mut self, code: IconCode, size: IconSize, rise: i32, color: Color) {
        draw_icon(self.target, self.pos, self.baseline - rise, code, size, color);
    }
}

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let config = &ctx.config.status_bar;
    let battery = &ctx.config.battery;
    let device = &inputs.device;

    target.set_font(Font::Size6);
    let mut bar = Packer {
        pos: target.effective_width() - 2,
        baseline: target.effective_height() - 1,
        target,
    };

    if config.battery {
        let percent = battery_percent(device.battery_mv, battery.min_mv, battery.max_mv);
        let color = if device.battery_mv < battery.warn_mv {
            ctx.accent
        } else {
            Color::Black
        };
        if config.battery_percentage || config.battery_voltage {
            let mut text = String::new();
            if config.battery_percentage {
                text.push_str(&format!("{}%", percent));
            }
            if config.battery_voltage {
                let volts = (device.battery_mv as f32 / 10.0).round() / 100.0;
                text.push_str(&format!(" ({:.2}v)", volts));
            }
            bar.text(&text, color, 1);
        }
        bar.pos -= 24;
        bar.icon(battery_icon(percent), IconSize::S24, 17, color);
        bar.pos -= SPACING + 9;
    }

    if config.signal {
        let color = if device.rssi >= WEAK_SIGNAL_DBM {
            Color::Black
        } else {
            ctx.accent
        };
        if config.signal_strength || config.signal_rssi {
            let mut text = String::new();
            if config.signal_strength {
                text.push_str(signal_description(device.rssi));
            }
            if config.signal_rssi && device.rssi != 0 {
                text.push_str(&format!(" ({}dBm)", device.rssi));
            }
            bar.text(&text, color, 1);
        }
        bar.pos -= 18;
        bar.icon(wifi_icon(device.rssi), IconSize::S16, 13, color);
        bar.pos -= SPACING + 8;
    }

    if config.refresh {
        bar.text(&device.refreshed, Color::Black, 25);
        bar.icon(IconCode::Refresh, IconSize::S32, 21, Color::Black);
        bar.pos -= SPACING;
    }

    if config.status {
        if let Some(status) = device.status.as_deref().filter(|s| !s.is_empty()) {
            bar.text(status, ctx.accent, 24);
            bar.icon(IconCode::Error, IconSize::S24, 18, ctx.accent);
        }
    }

    if bar.pos < 0 {
        debug!("Status bar overflows the left edge by {} px", -bar.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccentColor, Config};
    use crate::panels::fixtures;
    use crate::testing::{Call, RecordingDriver};

    fn render(config: &Config, inputs: &RenderInputs) -> RecordingDriver {
        let ctx = PanelContext::new(config);
        let mut target =
            RenderTarget::acquire(RecordingDriver::new(), config.display.margins(), 800, 480);
        draw(&mut target, inputs, &ctx);
        target.release()
    }

    fn width(text: &str) -> i32 {
        Font::Size6.measure(text).0 as i32
    }

    #[test]
    fn test_segments_pack_right_to_left() {
        let mut config = Config::default();
        config.status_bar.battery_percentage = true;
        config.status_bar.battery_voltage = false;
        config.status_bar.signal_strength = true;
        config.status_bar.signal_rssi = false;
        let mut inputs = fixtures::inputs(12);
        inputs.device.battery_mv = 4200;
        inputs.device.rssi = -55;
        inputs.device.refreshed = "12:00".to_string();
        inputs.device.status = None;

        let driver = render(&config, &inputs);
        let right = 20 + 758;
        let battery_x = right - width("100%");
        assert!(matches!(
            driver.find_print("100%"),
            Some(Call::Print { x, y: 465, .. }) if *x == battery_x
        ));

        let mut pos = 758 - width("100%") - 1 - 24;
        assert!(driver.calls.contains(&Call::Bitmap {
            x: 20 + pos,
            y: 12 + 455 - 17,
            size: 24,
            color: Color::Black,
        }));
        pos -= SPACING + 9;
        assert!(matches!(
            driver.find_print("Good"),
            Some(Call::Print { x, .. }) if *x == 20 + pos - width("Good")
        ));
        pos -= width("Good") + 1 + 18;
        pos -= SPACING + 8;
        assert!(matches!(
            driver.find_print("12:00"),
            Some(Call::Print { x, .. }) if *x == 20 + pos - width("12:00")
        ));
        assert_eq!(driver.bitmaps().len(), 3);
    }

    #[test]
    fn test_disabled_segments_are_skipped() {
        let mut config = Config::default();
        config.status_bar.battery = false;
        config.status_bar.signal = false;
        let mut inputs = fixtures::inputs(12);
        inputs.device.refreshed = "09:41".to_string();
        inputs.device.status = None;

        let driver = render(&config, &inputs);
        assert_eq!(driver.texts(), vec!["09:41"]);
        assert!(matches!(
            driver.find_print("09:41"),
            Some(Call::Print { x, .. }) if *x == 778 - width("09:41")
        ));
    }

    #[test]
    fn test_low_battery_and_weak_signal_use_accent() {
        let mut config = Config::default();
        config.display.accent = AccentColor::Red;
        config.status_bar.signal_rssi = true;
        let mut inputs = fixtures::inputs(12);
        inputs.device.battery_mv = 3300;
        inputs.device.rssi = -82;
        inputs.device.status = Some("Sensor offline".to_string());

        let driver = render(&config, &inputs);
        let accent_icons = driver
            .bitmaps()
            .iter()
            .filter(|c| matches!(c, Call::Bitmap { color: Color::Accent, .. }))
            .count();
        // battery, signal and the status error icon
        assert_eq!(accent_icons, 3);
        assert!(matches!(
            driver.find_print("Weak (-82dBm)"),
            Some(Call::Print { color: Color::Accent, .. })
        ));
        assert!(matches!(
            driver.find_print("Sensor offline"),
            Some(Call::Print { color: Color::Accent, .. })
        ));
    }

    #[test]
    fn test_battery_voltage_text() {
        let mut config = Config::default();
        config.status_bar.battery_percentage = false;
        config.status_bar.battery_voltage = true;
        let mut inputs = fixtures::inputs(12);
        inputs.device.battery_mv = 3987;

        let driver = render(&config, &inputs);
        assert!(driver.find_print(" (3.99v)").is_some());
    }

    #[test]
    fn test_overflow_is_not_clipped() {
        let config = Config::default();
        let mut inputs = fixtures::inputs(12);
        inputs.device.status = Some("x".repeat(200));

        let driver = render(&config, &inputs);
        let status = "x".repeat(200);
        assert!(matches!(
            driver.find_print(&status),
            Some(Call::Print { x, .. }) if *x < 0
        ));
    }
}
