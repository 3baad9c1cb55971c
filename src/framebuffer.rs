//! Two-plane 1-bpp frame buffer (black + accent) in controller row order.

use serde::{Deserialize, Serialize};

/// Pixel colours available on the panel.
///
/// `Accent` lands on the second colour plane of three-colour panels and is folded
/// into black on black/white panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
    Accent,
}

/// Rows of pixel data for both colour planes.
///
/// Each row has `width.div_ceil(8)` bytes, MSB = leftmost pixel. In the black plane
/// a set bit is white (the controller's native polarity); in the accent plane a set
/// bit is accent.
#[derive(Clone, Debug)]
pub struct DisplayBuffer {
    width: u32,
    height: u32,
    black_buffer: Vec<u8>,
    accent_buffer: Vec<u8>,
}

impl DisplayBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let buffer_size = (width.div_ceil(8) * height) as usize;
        Self {
            width,
            height,
            black_buffer: vec![0xFF; buffer_size], // White by default
            accent_buffer: vec![0x00; buffer_size], // No accent by default
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    pub fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.black_buffer.fill(0xFF);
                self.accent_buffer.fill(0x00);
            }
            Color::Black => {
                self.black_buffer.fill(0x00);
                self.accent_buffer.fill(0x00);
            }
            Color::Accent => {
                self.black_buffer.fill(0xFF);
                self.accent_buffer.fill(0xFF);
            }
        }
    }

    pub fn black_buffer(&self) -> &[u8] {
        &self.black_buffer
    }

    pub fn accent_buffer(&self) -> &[u8] {
        &self.accent_buffer
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let index = y as usize * self.bytes_per_row() + x as usize / 8;
        Some((index, 0x80 >> (x % 8)))
    }

    /// Set one pixel; coordinates outside the buffer are clipped silently.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        match color {
            Color::White => {
                self.black_buffer[index] |= mask;
                self.accent_buffer[index] &= !mask;
            }
            Color::Black => {
                self.black_buffer[index] &= !mask;
                self.accent_buffer[index] &= !mask;
            }
            Color::Accent => {
                self.black_buffer[index] |= mask;
                self.accent_buffer[index] |= mask;
            }
        }
    }

    /// Colour of one pixel; outside the buffer reads as white.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        match self.locate(x, y) {
            Some((index, mask)) if self.accent_buffer[index] & mask != 0 => Color::Accent,
            Some((index, mask)) if self.black_buffer[index] & mask == 0 => Color::Black,
            _ => Color::White,
        }
    }

    /// Copy another buffer's rows into this one starting at `first_row`.
    ///
    /// Both buffers must share a width; rows past the end are dropped.
    pub fn copy_rows_from(&mut self, first_row: u32, rows: &DisplayBuffer) {
        if rows.width != self.width || first_row >= self.height {
            return;
        }
        let stride = self.bytes_per_row();
        let count = rows.height.min(self.height - first_row) as usize;
        let start = first_row as usize * stride;
        let len = count * stride;
        self.black_buffer[start..start + len].copy_from_slice(&rows.black_buffer[..len]);
        self.accent_buffer[start..start + len].copy_from_slice(&rows.accent_buffer[..len]);
    }

    /// Number of non-white pixels as `(black, accent)`.
    pub fn ink_counts(&self) -> (u32, u32) {
        let black = self.black_buffer.iter().map(|&b| b.count_zeros()).sum::<u32>();
        let accent = self.accent_buffer.iter().map(|&b| b.count_ones()).sum::<u32>();
        (black, accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_white() {
        let buffer = DisplayBuffer::new(10, 2);
        assert_eq!(buffer.bytes_per_row(), 2);
        assert_eq!(buffer.black_buffer().len(), 4);
        assert_eq!(buffer.ink_counts(), (0, 0));
        assert_eq!(buffer.pixel(3, 1), Color::White);
    }

    #[test]
    fn test_set_pixel_planes() {
        let mut buffer = DisplayBuffer::new(16, 4);
        buffer.set_pixel(0, 0, Color::Black);
        buffer.set_pixel(9, 1, Color::Accent);
        assert_eq!(buffer.black_buffer()[0], 0x7F);
        assert_eq!(buffer.accent_buffer()[3], 0x40);
        assert_eq!(buffer.pixel(0, 0), Color::Black);
        assert_eq!(buffer.pixel(9, 1), Color::Accent);

        buffer.set_pixel(9, 1, Color::White);
        assert_eq!(buffer.pixel(9, 1), Color::White);
        assert_eq!(buffer.ink_counts(), (1, 0));
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut buffer = DisplayBuffer::new(8, 8);
        buffer.set_pixel(-1, 0, Color::Black);
        buffer.set_pixel(8, 0, Color::Black);
        buffer.set_pixel(0, 8, Color::Black);
        assert_eq!(buffer.ink_counts(), (0, 0));
    }

    #[test]
    fn test_copy_rows_into_frame() {
        let mut frame = DisplayBuffer::new(8, 6);
        let mut page = DisplayBuffer::new(8, 4);
        page.set_pixel(2, 0, Color::Black);
        page.set_pixel(2, 3, Color::Black);
        frame.copy_rows_from(4, &page);
        assert_eq!(frame.pixel(2, 4), Color::Black);
        // row 3 of the page falls past the frame
        assert_eq!(frame.ink_counts(), (1, 0));
    }
}
