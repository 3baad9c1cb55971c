//! # Paged Canvas
//!
//! [`PagedCanvas`] implements [`DisplayDriver`] on top of any [`PanelInterface`]
//! using a band buffer of `page_height` rows instead of a full frame. Every pass
//! of the render loop draws the whole layout; only pixels falling in the current
//! band land in the buffer. [`DisplayDriver::next_page`] ships the band to the
//! panel and moves on, refreshing once the last band is written.
//!
//! With `page_height` equal to the panel height there is exactly one page.
//!
//! Panel faults are logged and latched: after the first one the canvas stops
//! talking to the panel and reports no further pages, so the render loop ends.

use crate::driver::DisplayDriver;
use crate::epd7in5::EpdError;
use crate::fonts::Font;
use crate::framebuffer::{Color, DisplayBuffer};
use crate::icons::Bitmap;
use embedded_graphics::{prelude::*, primitives::Line};
use log::{debug, error};

/// Row-oriented access to a physical (or simulated) panel.
pub trait PanelInterface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn power_on(&mut self) -> Result<(), EpdError>;
    /// Blank the panel RAM.
    fn clear(&mut self) -> Result<(), EpdError>;
    /// Write a band of rows starting at `first_row`.
    fn write_rows(&mut self, first_row: u32, rows: &DisplayBuffer) -> Result<(), EpdError>;
    /// Show what has been written.
    fn refresh(&mut self) -> Result<(), EpdError>;
    fn hibernate(&mut self) -> Result<(), EpdError>;
    fn power_off(&mut self) -> Result<(), EpdError>;
}

/// In-memory panel holding a full frame. Used for previews and tests.
#[derive(Debug)]
pub struct MemoryPanel {
    frame: DisplayBuffer,
    refreshes: u32,
    powered: bool,
}

impl MemoryPanel {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: DisplayBuffer::new(width, height),
            refreshes: 0,
            powered: false,
        }
    }

    pub fn frame(&self) -> &DisplayBuffer {
        &self.frame
    }

    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }
}

impl PanelInterface for MemoryPanel {
    fn width(&self) -> u32 {
        self.frame.width()
    }

    fn height(&self) -> u32 {
        self.frame.height()
    }

    fn power_on(&mut self) -> Result<(), EpdError> {
        self.powered = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), EpdError> {
        self.frame.clear(Color::White);
        Ok(())
    }

    fn write_rows(&mut self, first_row: u32, rows: &DisplayBuffer) -> Result<(), EpdError> {
        if first_row + rows.height() > self.frame.height() {
            return Err(EpdError::Window {
                first_row,
                rows: rows.height(),
                height: self.frame.height(),
            });
        }
        self.frame.copy_rows_from(first_row, rows);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), EpdError> {
        self.refreshes += 1;
        Ok(())
    }

    fn hibernate(&mut self) -> Result<(), EpdError> {
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), EpdError> {
        self.powered = false;
        Ok(())
    }
}

/// Paged [`DisplayDriver`] over a panel.
pub struct PagedCanvas<P> {
    panel: P,
    page: DisplayBuffer,
    page_height: u32,
    first_row: u32,
    font: Font,
    color: Color,
    cursor: (i32, i32),
    accent_plane: bool,
    fault: bool,
}

impl<P: PanelInterface> PagedCanvas<P> {
    /// Wrap a panel; `page_height` is clamped to `1..=panel height`.
    ///
    /// Without an accent plane, accent pixels are drawn black.
    pub fn new(panel: P, page_height: u32, accent_plane: bool) -> Self {
        let page_height = page_height.clamp(1, panel.height().max(1));
        let page = DisplayBuffer::new(panel.width(), page_height);
        Self {
            panel,
            page,
            page_height,
            first_row: 0,
            font: Font::Size12,
            color: Color::Black,
            cursor: (0, 0),
            accent_plane,
            fault: false,
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn into_panel(self) -> P {
        self.panel
    }

    /// Number of pages one full frame takes.
    pub fn page_count(&self) -> u32 {
        self.panel.height().div_ceil(self.page_height)
    }

    /// Whether a panel operation has failed this cycle.
    pub fn has_fault(&self) -> bool {
        self.fault
    }

    fn check(&mut self, op: &str, result: Result<(), EpdError>) {
        if let Err(e) = result {
            error!("Display {} failed: {}", op, e);
            self.fault = true;
        }
    }

    fn ink(&self, color: Color) -> Color {
        match color {
            Color::Accent if !self.accent_plane => Color::Black,
            other => other,
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        let row = y - self.first_row as i32;
        if row >= 0 && (row as u32) < self.page_height {
            let color = self.ink(color);
            self.page.set_pixel(x, row, color);
        }
    }

    /// Rows of the current band actually inside the panel.
    fn band_rows(&self) -> u32 {
        self.page_height
            .min(self.panel.height().saturating_sub(self.first_row))
    }
}

impl<P: PanelInterface> DisplayDriver for PagedCanvas<P> {
    fn init(&mut self) {
        self.fault = false;
        let result = self.panel.power_on();
        self.check("init", result);
    }

    fn clear_screen(&mut self) {
        if self.fault {
            return;
        }
        let result = self.panel.clear();
        self.check("clear", result);
    }

    fn set_full_window(&mut self) {
        self.first_row = 0;
        self.page.clear(Color::White);
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn font(&self) -> Font {
        self.font
    }

    fn set_text_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    fn print(&mut self, text: &str) {
        let color = self.color;
        let mut ink = Vec::new();
        self.font.rasterize(text, self.cursor, |x, y| ink.push((x, y)));
        for (x, y) in ink {
            self.plot(x, y, color);
        }
        let advance = self.font.advance() * text.chars().count() as u32;
        self.cursor.0 += advance as i32;
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.plot(x, y, color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        for point in Line::new(Point::new(x0, y0), Point::new(x1, y1)).points() {
            self.plot(point.x, point.y, color);
        }
    }

    fn draw_inverted_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        for by in 0..bitmap.height() as i32 {
            let row = y + by - self.first_row as i32;
            if row < 0 || row as u32 >= self.page_height {
                continue;
            }
            for bx in 0..bitmap.width() as i32 {
                if bitmap.is_ink(bx, by) {
                    self.plot(x + bx, y + by, color);
                }
            }
        }
    }

    fn next_page(&mut self) -> bool {
        if self.fault {
            return false;
        }
        let rows = self.band_rows();
        let result = if rows == self.page_height {
            self.panel.write_rows(self.first_row, &self.page)
        } else {
            // last band of a panel whose height is not a multiple of the page
            let mut tail = DisplayBuffer::new(self.page.width(), rows);
            tail.copy_rows_from(0, &self.page);
            self.panel.write_rows(self.first_row, &tail)
        };
        self.check("page write", result);
        if self.fault {
            return false;
        }
        debug!("Wrote page rows {}..{}", self.first_row, self.first_row + rows);

        self.first_row += self.page_height;
        if self.first_row >= self.panel.height() {
            let result = self.panel.refresh();
            self.check("refresh", result);
            return false;
        }
        self.page.clear(Color::White);
        true
    }

    fn hibernate(&mut self) {
        let result = self.panel.hibernate();
        self.check("hibernate", result);
    }

    fn power_off(&mut self) {
        let result = self.panel.power_off();
        self.check("power off", result);
    }
}
