//! Recording driver for renderer tests.

use crate::driver::DisplayDriver;
use crate::fonts::Font;
use crate::framebuffer::Color;
use crate::icons::Bitmap;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Init,
    Clear,
    FullWindow,
    Font(Font),
    TextColor(Color),
    Cursor(i32, i32),
    Print {
        text: String,
        x: i32,
        y: i32,
        font: Font,
        color: Color,
    },
    Pixel(i32, i32, Color),
    Line(i32, i32, i32, i32, Color),
    Bitmap {
        x: i32,
        y: i32,
        size: u32,
        color: Color,
    },
    NextPage,
    Hibernate,
    PowerOff,
}

/// Driver that records every primitive instead of drawing it.
pub struct RecordingDriver {
    pub calls: Vec<Call>,
    /// Answers for successive `next_page` calls; `false` once exhausted.
    pub pages: VecDeque<bool>,
    font: Font,
    color: Color,
    cursor: (i32, i32),
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::with_pages(&[])
    }

    pub fn with_pages(pages: &[bool]) -> Self {
        Self {
            calls: Vec::new(),
            pages: pages.iter().copied().collect(),
            font: Font::Size12,
            color: Color::Black,
            cursor: (0, 0),
        }
    }

    /// Printed strings in call order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Print { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The print call for `text`, if any.
    pub fn find_print(&self, needle: &str) -> Option<&Call> {
        self.calls
            .iter()
            .find(|c| matches!(c, Call::Print { text, .. } if text == needle))
    }

    pub fn bitmaps(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Bitmap { .. }))
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl DisplayDriver for RecordingDriver {
    fn init(&mut self) {
        self.calls.push(Call::Init);
    }

    fn clear_screen(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn set_full_window(&mut self) {
        self.calls.push(Call::FullWindow);
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
        self.calls.push(Call::Font(font));
    }

    fn font(&self) -> Font {
        self.font
    }

    fn set_text_color(&mut self, color: Color) {
        self.color = color;
        self.calls.push(Call::TextColor(color));
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
        self.calls.push(Call::Cursor(x, y));
    }

    fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    fn print(&mut self, text: &str) {
        self.calls.push(Call::Print {
            text: text.to_string(),
            x: self.cursor.0,
            y: self.cursor.1,
            font: self.font,
            color: self.color,
        });
        self.cursor.0 += (self.font.advance() * text.chars().count() as u32) as i32;
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.calls.push(Call::Pixel(x, y, color));
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.calls.push(Call::Line(x0, y0, x1, y1, color));
    }

    fn draw_inverted_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap, color: Color) {
        self.calls.push(Call::Bitmap {
            x,
            y,
            size: bitmap.width(),
            color,
        });
    }

    fn next_page(&mut self) -> bool {
        self.calls.push(Call::NextPage);
        self.pages.pop_front().unwrap_or(false)
    }

    fn hibernate(&mut self) {
        self.calls.push(Call::Hibernate);
    }

    fn power_off(&mut self) {
        self.calls.push(Call::PowerOff);
    }
}
