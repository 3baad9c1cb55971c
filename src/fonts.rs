//! # Font Ladder
//!
//! The layout is specified in point sizes of a proportional sans face. On this
//! panel each size maps to an ISO-8859-1 monospace bitmap font from
//! embedded-graphics (so the degree sign is available), optionally scaled up by an
//! integer factor for the large temperature and error-screen text.
//!
//! Monospace faces make measurement exact and cheap: a string's width is
//! `chars * advance - spacing`, scaled. That is the same number the rasteriser
//! produces, which the wrap algorithm relies on.

use embedded_graphics::{
    mono_font::{
        iso_8859_1::{
            FONT_10X20, FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X12, FONT_7X14, FONT_8X13, FONT_9X15,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use std::convert::Infallible;

/// Font sizes used by the panels, named after their nominal point size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Size5,
    Size6,
    Size7,
    Size8,
    Size11,
    Size12,
    Size14,
    Size16,
    Size26,
    /// Large current-temperature digits
    Size48,
}

impl Font {
    /// Bitmap face and integer scale factor.
    fn face(self) -> (&'static MonoFont<'static>, u32) {
        match self {
            Font::Size5 => (&FONT_4X6, 1),
            Font::Size6 => (&FONT_5X8, 1),
            Font::Size7 => (&FONT_6X10, 1),
            Font::Size8 => (&FONT_6X12, 1),
            Font::Size11 => (&FONT_7X14, 1),
            Font::Size12 => (&FONT_8X13, 1),
            Font::Size14 => (&FONT_9X15, 1),
            Font::Size16 => (&FONT_9X18_BOLD, 1),
            Font::Size26 => (&FONT_10X20, 2),
            Font::Size48 => (&FONT_10X20, 3),
        }
    }

    /// Horizontal distance the cursor moves per character.
    pub fn advance(self) -> u32 {
        let (face, scale) = self.face();
        (face.character_size.width + face.character_spacing) * scale
    }

    /// Line height in pixels.
    pub fn height(self) -> u32 {
        let (face, scale) = self.face();
        face.character_size.height * scale
    }

    /// Exact bounding box `(width, height)` of a single line of text.
    ///
    /// Empty text measures zero wide.
    pub fn measure(self, text: &str) -> (u32, u32) {
        let (face, scale) = self.face();
        let count = text.chars().count() as u32;
        if count == 0 {
            return (0, self.height());
        }
        let width = count * (face.character_size.width + face.character_spacing)
            - face.character_spacing;
        (width * scale, self.height())
    }

    /// Rasterise `text` with its baseline at `origin`, calling `plot` for every ink pixel.
    pub fn rasterize<F: FnMut(i32, i32)>(self, text: &str, origin: (i32, i32), plot: F) {
        let (face, scale) = self.face();
        let mut sink = GlyphSink {
            origin,
            scale: scale as i32,
            plot,
        };
        let style = MonoTextStyle::new(face, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Alphabetic).draw(&mut sink);
    }
}

/// Draw target that forwards glyph pixels, scaled and translated, to a closure.
struct GlyphSink<F> {
    origin: (i32, i32),
    scale: i32,
    plot: F,
}

impl<F> OriginDimensions for GlyphSink<F> {
    fn size(&self) -> Size {
        Size::new(0x4000, 0x4000)
    }
}

impl<F: FnMut(i32, i32)> DrawTarget for GlyphSink<F> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color != BinaryColor::On {
                continue;
            }
            let x0 = self.origin.0 + point.x * self.scale;
            let y0 = self.origin.1 + point.y * self.scale;
            for dy in 0..self.scale {
                for dx in 0..self.scale {
                    (self.plot)(x0 + dx, y0 + dy);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_matches_advance() {
        assert_eq!(Font::Size12.measure("Sunrise"), (56, 13));
        assert_eq!(Font::Size48.measure("21"), (60, 60));
        assert_eq!(Font::Size6.measure(""), (0, 8));
    }

    #[test]
    fn test_degree_sign_is_one_glyph() {
        assert_eq!(Font::Size8.measure("21\u{B0}").0, 3 * Font::Size8.advance());
    }

    #[test]
    fn test_rasterized_ink_stays_within_measured_box() {
        let text = "Hi";
        let (w, h) = Font::Size26.measure(text);
        let mut pixels = Vec::new();
        Font::Size26.rasterize(text, (100, 50), |x, y| pixels.push((x, y)));
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            assert!(x >= 100 && x < 100 + w as i32, "x={} outside", x);
            assert!(y > 50 - h as i32 && y <= 50 + h as i32, "y={} outside", y);
        }
    }

    #[test]
    fn test_scale_two_is_four_times_base() {
        let mut base = 0;
        let (face, _) = Font::Size26.face();
        let style = MonoTextStyle::new(face, BinaryColor::On);
        let mut sink = GlyphSink {
            origin: (0, 0),
            scale: 1,
            plot: |_, _| base += 1,
        };
        let _ = Text::with_baseline("8", Point::zero(), style, Baseline::Alphabetic).draw(&mut sink);
        let mut scaled = 0;
        Font::Size26.rasterize("8", (0, 0), |_, _| scaled += 1);
        assert_eq!(scaled, base * 4);
    }
}
