//! # Text Layout
//!
//! Aligned single-line text and greedy multi-line wrapping.
//!
//! ## Wrapping
//! [`wrap_lines`] is pure: it takes a measuring function instead of a driver so it
//! can be exercised without one. Lines are filled greedily:
//!
//! - a line that fits is emitted as is
//! - otherwise it breaks at the last space (dropped) or hyphen (kept) that leaves a
//!   fitting line
//! - a word with no usable break point is hard-broken at the longest fitting prefix,
//!   at least one character long
//! - the last allowed line keeps the whole remainder when it fits; otherwise it is
//!   shortened word by word, then character by character, and ends in `"..."`
//!
//! Every emitted line measures at most `max_width`, except a single character
//! wider than `max_width` on its own.

use crate::driver::DisplayDriver;
use crate::target::RenderTarget;
use crate::Alignment;

const ELLIPSIS: &str = "...";

/// Byte offset just past each char, in order.
fn char_ends(text: &str) -> impl DoubleEndedIterator<Item = usize> + '_ {
    text.char_indices().map(|(i, c)| i + c.len_utf8())
}

/// Split `text` into at most `max_lines` lines no wider than `max_width`.
///
/// # Example
/// ```
/// use weather_epd_lib::text_layout::wrap_lines;
///
/// let lines = wrap_lines("Severe thunderstorm warning", 12, 3, |s| s.len() as u32);
/// assert_eq!(lines, vec!["Severe", "thunderstorm", "warning"]);
/// ```
pub fn wrap_lines<F>(text: &str, max_width: u32, max_lines: usize, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut remaining = text;
    while lines.len() < max_lines {
        if measure(remaining) <= max_width {
            lines.push(remaining.to_string());
            break;
        }
        if lines.len() + 1 == max_lines {
            lines.push(truncate_with_ellipsis(remaining, max_width, &measure));
            break;
        }
        let (line, rest) = break_line(remaining, max_width, &measure);
        lines.push(line.to_string());
        remaining = rest.trim_start();
        if remaining.is_empty() {
            break;
        }
    }
    lines
}

/// First line and the rest of a text that does not fit on one line.
fn break_line<'a, F>(text: &'a str, max_width: u32, measure: &F) -> (&'a str, &'a str)
where
    F: Fn(&str) -> u32,
{
    let soft_break = text.char_indices().rev().find_map(|(i, c)| {
        let (line, rest) = match c {
            ' ' => (text[..i].trim_end(), &text[i + 1..]),
            '-' => (&text[..i + 1], &text[i + 1..]),
            _ => return None,
        };
        (!line.is_empty() && measure(line) <= max_width).then_some((line, rest))
    });
    if let Some(split) = soft_break {
        return split;
    }
    let end = char_ends(text)
        .take_while(|&end| measure(&text[..end]) <= max_width)
        .last()
        .or_else(|| char_ends(text).next())
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

/// Shorten `text` until it fits with a trailing ellipsis.
fn truncate_with_ellipsis<F>(text: &str, max_width: u32, measure: &F) -> String
where
    F: Fn(&str) -> u32,
{
    let fits = |head: &str| measure(&format!("{}{}", head, ELLIPSIS)) <= max_width;

    let at_word = text
        .char_indices()
        .rev()
        .filter(|&(_, c)| c == ' ')
        .map(|(i, _)| text[..i].trim_end())
        .find(|head| !head.is_empty() && fits(head));
    if let Some(head) = at_word {
        return format!("{}{}", head, ELLIPSIS);
    }

    let at_char = char_ends(text)
        .rev()
        .map(|end| text[..end].trim_end())
        .find(|head| fits(head));
    if let Some(head) = at_char {
        return format!("{}{}", head, ELLIPSIS);
    }

    char_ends(ELLIPSIS)
        .rev()
        .map(|end| &ELLIPSIS[..end])
        .find(|dots| measure(dots) <= max_width)
        .unwrap_or("")
        .to_string()
}

/// Capitalise the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace();
    }
    out
}

/// Draw one line anchored at logical `(x, y)` (baseline) in the current font.
pub fn draw_aligned<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    x: i32,
    y: i32,
    text: &str,
    align: Alignment,
) {
    let width = target.measure(text).0 as i32;
    let x = match align {
        Alignment::Left => x,
        Alignment::Center => x - width / 2,
        Alignment::Right => x - width,
    };
    target.set_cursor(x, y);
    target.print(text);
}

/// Wrap `text` to `max_width` and draw line `i` at `y + i * line_spacing`.
///
/// Returns the number of lines drawn.
#[allow(clippy::too_many_arguments)]
pub fn draw_wrapped<D: DisplayDriver>(
    target: &mut RenderTarget<D>,
    x: i32,
    y: i32,
    text: &str,
    align: Alignment,
    max_width: u32,
    max_lines: usize,
    line_spacing: i32,
) -> usize {
    let lines = wrap_lines(text, max_width, max_lines, |s| target.measure(s).0);
    for (i, line) in lines.iter().enumerate() {
        draw_aligned(target, x, y + i as i32 * line_spacing, line, align);
    }
    lines.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::Font;
    use crate::testing::{Call, RecordingDriver};
    use crate::Margins;

    fn chars(s: &str) -> u32 {
        s.chars().count() as u32
    }

    #[test]
    fn test_text_that_fits_is_one_line() {
        assert_eq!(wrap_lines("Flood Watch", 20, 2, chars), vec!["Flood Watch"]);
        assert_eq!(wrap_lines("", 20, 2, chars), vec![""]);
    }

    #[test]
    fn test_lines_respect_width_and_count() {
        let text = "Heat advisory in effect from noon until eight in the evening";
        for max_width in [6, 10, 17, 30] {
            for max_lines in 1..4 {
                let lines = wrap_lines(text, max_width, max_lines, chars);
                assert!(lines.len() <= max_lines);
                assert!(!lines.is_empty());
                for line in &lines {
                    assert!(chars(line) <= max_width, "{:?} wider than {}", line, max_width);
                }
                let last = lines.last().map(String::as_str).unwrap_or_default();
                assert!(
                    last.ends_with(ELLIPSIS) || text.ends_with(last),
                    "{:?} is neither truncated nor the tail",
                    last
                );
            }
        }
    }

    #[test]
    fn test_multibyte_text_breaks_on_char_boundaries() {
        assert_eq!(
            wrap_lines("Straßenüberflutung", 6, 2, chars),
            vec!["Straße", "nüb..."]
        );
        assert_eq!(wrap_lines("Überschwemmung", 8, 1, chars), vec!["Übers..."]);
    }

    #[test]
    fn test_breaks_on_space_and_keeps_hyphen() {
        assert_eq!(
            wrap_lines("Special marine-warning", 15, 2, chars),
            vec!["Special marine-", "warning"]
        );
        assert_eq!(
            wrap_lines("Wind Advisory", 8, 2, chars),
            vec!["Wind", "Advisory"]
        );
    }

    #[test]
    fn test_last_line_gets_ellipsis() {
        let lines = wrap_lines("Coastal flood warning remains in effect", 12, 2, chars);
        assert_eq!(lines[0], "Coastal");
        assert!(lines[1].ends_with("..."));
        assert!(chars(&lines[1]) <= 12);
        assert_eq!(
            wrap_lines("Winter storm warning", 12, 1, chars),
            vec!["Winter..."]
        );
    }

    #[test]
    fn test_long_word_is_hard_broken() {
        assert_eq!(
            wrap_lines("Supercalifragilistic", 8, 3, chars),
            vec!["Supercal", "ifragili", "stic"]
        );
    }

    #[test]
    fn test_narrow_width_never_loops() {
        // nothing fits: every line still advances by one character
        let lines = wrap_lines("abc", 0, 5, chars);
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(wrap_lines("abcdef", 2, 1, chars), vec![".."]);
    }

    #[test]
    fn test_title_case_returns_new_string() {
        let event = String::from("SEVERE thunderstorm WARNING");
        assert_eq!(title_case(&event), "Severe Thunderstorm Warning");
        assert_eq!(event, "SEVERE thunderstorm WARNING");
    }

    #[test]
    fn test_draw_aligned_anchors() {
        let mut target =
            RenderTarget::acquire(RecordingDriver::new(), Margins { x: 20, y: 12 }, 800, 480);
        target.set_font(Font::Size8);
        let w = Font::Size8.measure("10\u{B0}").0 as i32;
        draw_aligned(&mut target, 100, 50, "10\u{B0}", Alignment::Right);
        draw_aligned(&mut target, 100, 60, "10\u{B0}", Alignment::Center);
        draw_aligned(&mut target, 100, 70, "10\u{B0}", Alignment::Left);
        let driver = target.release();
        assert!(driver.calls.contains(&Call::Cursor(120 - w, 62)));
        assert!(driver.calls.contains(&Call::Cursor(120 - w / 2, 72)));
        assert!(driver.calls.contains(&Call::Cursor(120, 82)));
    }

    #[test]
    fn test_draw_wrapped_spaces_lines() {
        let mut target =
            RenderTarget::acquire(RecordingDriver::new(), Margins { x: 0, y: 0 }, 800, 480);
        target.set_font(Font::Size12);
        let max_width = Font::Size12.measure("Tornado").0;
        let drawn = draw_wrapped(
            &mut target,
            10,
            26,
            "Tornado Warning",
            Alignment::Left,
            max_width,
            2,
            23,
        );
        assert_eq!(drawn, 2);
        let driver = target.release();
        assert!(matches!(driver.find_print("Tornado"), Some(Call::Print { y: 26, .. })));
        assert!(matches!(driver.find_print("Warning"), Some(Call::Print { y: 49, .. })));
    }
}
