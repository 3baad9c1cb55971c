//! # Frame Preview
//!
//! Development-mode output for a frame rendered into a [`MemoryPanel`](crate::canvas::MemoryPanel):
//!
//! - [`ascii`] downsamples the frame into a character grid for the terminal
//! - [`write_pbm`] writes a binary PBM (P4) image any viewer can open
//!
//! Both fold the accent plane into ink; the ASCII grid marks accent-heavy
//! cells with their own character so highlights stay visible.

use crate::framebuffer::{Color, DisplayBuffer};
use std::io::{self, Write};

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: u32 = 2;

/// Render `frame` as `columns` characters per line.
///
/// Each character covers a block of pixels: `' '` no ink, `'.'` light ink,
/// `'#'` mostly black, `'*'` mostly accent.
pub fn ascii(frame: &DisplayBuffer, columns: u32) -> String {
    let block_w = frame.width().div_ceil(columns.max(1)).max(1);
    let block_h = block_w * CELL_ASPECT;
    let rows = frame.height().div_ceil(block_h);
    let columns = frame.width().div_ceil(block_w);

    let mut out = String::with_capacity(((columns + 1) * rows) as usize);
    for row in 0..rows {
        for column in 0..columns {
            out.push(cell(frame, column * block_w, row * block_h, block_w, block_h));
        }
        out.push('\n');
    }
    out
}

fn cell(frame: &DisplayBuffer, x0: u32, y0: u32, w: u32, h: u32) -> char {
    let (mut black, mut accent) = (0u32, 0u32);
    for y in y0..(y0 + h).min(frame.height()) {
        for x in x0..(x0 + w).min(frame.width()) {
            match frame.pixel(x as i32, y as i32) {
                Color::Black => black += 1,
                Color::Accent => accent += 1,
                Color::White => {}
            }
        }
    }
    let ink = black + accent;
    if ink == 0 {
        ' '
    } else if ink * 4 < w * h {
        '.'
    } else if accent > black {
        '*'
    } else {
        '#'
    }
}

/// Write `frame` as a binary PBM. Black and accent pixels are both ink.
pub fn write_pbm<W: Write>(frame: &DisplayBuffer, mut out: W) -> io::Result<()> {
    write!(out, "P4\n{} {}\n", frame.width(), frame.height())?;
    let stride = frame.bytes_per_row();
    if stride == 0 {
        return out.flush();
    }
    let rows = frame
        .black_buffer()
        .chunks(stride)
        .zip(frame.accent_buffer().chunks(stride));
    let mut line = vec![0u8; stride];
    for (black, accent) in rows {
        // PBM ink is a set bit, the black plane stores white as set
        for ((byte, &b), &a) in line.iter_mut().zip(black).zip(accent) {
            *byte = !b | a;
        }
        out.write_all(&line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_is_all_spaces() {
        let frame = DisplayBuffer::new(80, 40);
        let text = ascii(&frame, 40);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.len() == 40 && l.trim().is_empty()));
    }

    #[test]
    fn test_ink_density_characters() {
        let mut frame = DisplayBuffer::new(8, 8);
        // left 4x8 block solid black, right block a single accent pixel
        for y in 0..8 {
            for x in 0..4 {
                frame.set_pixel(x, y, Color::Black);
            }
        }
        frame.set_pixel(6, 1, Color::Accent);
        assert_eq!(ascii(&frame, 2), "#.\n");

        for y in 0..8 {
            for x in 4..8 {
                frame.set_pixel(x, y, Color::Accent);
            }
        }
        assert_eq!(ascii(&frame, 2), "#*\n");
    }

    #[test]
    fn test_pbm_header_and_polarity() {
        let mut frame = DisplayBuffer::new(10, 2);
        frame.set_pixel(0, 0, Color::Black);
        frame.set_pixel(9, 1, Color::Accent);

        let mut out = Vec::new();
        write_pbm(&frame, &mut out).unwrap();
        let header = b"P4\n10 2\n";
        assert_eq!(&out[..header.len()], header);
        let body = &out[header.len()..];
        assert_eq!(body.len(), 4);
        assert_eq!(body[0], 0x80);
        assert_eq!(body[1] & 0xC0, 0x00);
        assert_eq!(body[2], 0x00);
        assert_eq!(body[3] & 0xC0, 0x40);
    }

    #[test]
    fn test_zero_width_frame_writes_header_only() {
        let frame = DisplayBuffer::new(0, 5);
        let mut out = Vec::new();
        write_pbm(&frame, &mut out).unwrap();
        assert_eq!(out, b"P4\n0 5\n");
    }
}
