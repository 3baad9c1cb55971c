//! City and date, right-aligned in the top-right corner.

use super::PanelContext;
use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::locale::strftime;
use crate::model::RenderInputs;
use crate::target::RenderTarget;
use crate::text_layout::draw_aligned;
use crate::Alignment;

pub const CITY_FONT: Font = Font::Size16;
pub const DATE_FONT: Font = Font::Size12;

const CITY_Y: i32 = 23;
const DATE_Y: i32 = 30 + 4 + 17;

/// The header date in the configured pattern.
pub fn date_text(inputs: &RenderInputs, ctx: &PanelContext) -> String {
    strftime(&inputs.now, &ctx.config.format.date)
}

pub fn draw<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    inputs: &RenderInputs,
    ctx: &PanelContext,
) {
    let right = target.effective_width() - 2;

    target.set_font(CITY_FONT);
    target.set_text_color(ctx.accent);
    draw_aligned(target, right, CITY_Y, &ctx.config.location.city, Alignment::Right);

    target.set_font(DATE_FONT);
    target.set_text_color(Color::Black);
    draw_aligned(target, right, DATE_Y, &date_text(inputs, ctx), Alignment::Right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccentColor, Config};
    use crate::panels::fixtures;
    use crate::testing::{Call, RecordingDriver};

    #[test]
    fn test_city_and_date_right_aligned() {
        let mut config = Config::default();
        config.location.city = "Reykjavik".to_string();
        config.format.date = "%A, %B %-d".to_string();
        config.display.accent = AccentColor::Red;
        let ctx = PanelContext::new(&config);
        let mut target =
            RenderTarget::acquire(RecordingDriver::new(), config.display.margins(), 800, 480);
        draw(&mut target, &fixtures::inputs(9), &ctx);
        let driver = target.release();

        let city_w = CITY_FONT.measure("Reykjavik").0 as i32;
        assert_eq!(
            driver.find_print("Reykjavik"),
            Some(&Call::Print {
                text: "Reykjavik".to_string(),
                x: 778 - city_w,
                y: 35,
                font: CITY_FONT,
                color: Color::Accent,
            })
        );
        assert!(matches!(
            driver.find_print("Thursday, March 14"),
            Some(Call::Print { y: 63, color: Color::Black, .. })
        ));
    }
}
