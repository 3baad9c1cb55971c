//! # Render Target
//!
//! A [`RenderTarget`] owns the display driver for exactly one render cycle. It is
//! created by [`RenderTarget::acquire`], which initialises and clears the panel,
//! and consumed by [`RenderTarget::release`], which hibernates and powers it off.
//! Because `release` takes `self`, nothing can draw after the panel is down.
//!
//! Every coordinate passed in is logical: `(0, 0)` is the top-left of the
//! effective drawing area and the margins are added before the call reaches the
//! driver.

use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::Bitmap;
use crate::Margins;
use log::debug;

pub struct RenderTarget<D: DisplayDriver> {
    driver: D,
    margins: Margins,
    width: i32,
    height: i32,
}

impl<D: DisplayDriver> RenderTarget<D> {
    /// Take ownership of the driver for one cycle: init, then clear.
    pub fn acquire(mut driver: D, margins: Margins, width: u32, height: u32) -> Self {
        debug!("Acquiring display {}x{} with margins {:?}", width, height, margins);
        driver.init();
        driver.clear_screen();
        let (width, height) = margins.effective_size(width, height);
        Self {
            driver,
            margins,
            width,
            height,
        }
    }

    /// End the cycle: hibernate, power off and hand the driver back.
    pub fn release(mut self) -> D {
        self.driver.hibernate();
        self.driver.power_off();
        debug!("Display released");
        self.driver
    }

    /// Width of the logical drawing area.
    pub fn effective_width(&self) -> i32 {
        self.width
    }

    /// Height of the logical drawing area.
    pub fn effective_height(&self) -> i32 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Start a pass over the full frame.
    pub fn begin_pass(&mut self) {
        self.driver.set_full_window();
    }

    /// Flush the current page; `true` while more pages remain.
    pub fn flip_page(&mut self) -> bool {
        self.driver.next_page()
    }

    pub fn set_font(&mut self, font: Font) {
        self.driver.set_font(font);
    }

    pub fn font(&self) -> Font {
        self.driver.font()
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.driver.set_text_color(color);
    }

    /// Bounding box of `text` in the current font.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        self.driver.text_bounds(text)
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        let (px, py) = self.margins.to_physical(x, y);
        self.driver.set_cursor(px, py);
    }

    /// Logical x of the text cursor, i.e. just after the last printed text.
    pub fn cursor_x(&self) -> i32 {
        self.driver.cursor().0 - self.margins.x
    }

    /// Print at the current cursor.
    pub fn print(&mut self, text: &str) {
        self.driver.print(text);
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (px, py) = self.margins.to_physical(x, y);
        self.driver.draw_pixel(px, py, color);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (px0, py0) = self.margins.to_physical(x0, y0);
        let (px1, py1) = self.margins.to_physical(x1, y1);
        self.driver.draw_line(px0, py0, px1, py1, color);
    }

    pub fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        let (px, py) = self.margins.to_physical(x, y);
        self.driver.draw_inverted_bitmap(px, py, bitmap, color);
    }
}
