//! # Display Driver Contract
//!
//! The primitive surface the renderers draw through. Coordinates here are
//! physical pixels; margin handling lives one level up in
//! [`crate::target::RenderTarget`].
//!
//! Implementations keep a text cursor: [`DisplayDriver::set_cursor`] places the
//! baseline origin of the next [`DisplayDriver::print`], and printing advances the
//! cursor by the printed width. Panels read the cursor back to append unit
//! suffixes in a smaller font right after a value.
//!
//! Methods do not return errors. A driver that hits a bus fault logs it and keeps
//! accepting primitives, so a render pass always runs to completion.

use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::Bitmap;

pub trait DisplayDriver {
    /// Wake the controller and run its init sequence.
    fn init(&mut self);

    /// Fill the whole frame with white.
    fn clear_screen(&mut self);

    /// Start (or restart) a pass covering the full frame.
    fn set_full_window(&mut self);

    fn set_font(&mut self, font: Font);

    fn font(&self) -> Font;

    fn set_text_color(&mut self, color: Color);

    /// Bounding box of `text` in the current font.
    fn text_bounds(&self, text: &str) -> (u32, u32) {
        self.font().measure(text)
    }

    fn set_cursor(&mut self, x: i32, y: i32);

    fn cursor(&self) -> (i32, i32);

    /// Draw `text` at the cursor and advance the cursor past it.
    fn print(&mut self, text: &str);

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Blit an inverted bitmap: cleared bits are drawn in `color`, set bits are skipped.
    fn draw_inverted_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color);

    /// Flush the current page. Returns `true` while more pages remain.
    fn next_page(&mut self) -> bool;

    /// Put the controller into deep sleep.
    fn hibernate(&mut self);

    /// Cut panel power.
    fn power_off(&mut self);
}
