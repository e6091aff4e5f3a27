//! Procedural vector-stroke text.
//!
//! Turns a string into line segments using a compact per-glyph stroke
//! table (derived from the gly-type font): one 8-bit mask selecting outer
//! box strokes and one selecting inner strokes, decoded with integer
//! geometry scaled by the glyph size. No textures, no kerning, no
//! wrapping — just lines, which fold straight into the line batches.
//!
//! Digits and uppercase use the full glyph box; a handful of lowercase
//! glyphs without ascenders or descenders collapse to the narrow half box.
//! Glyphs whose inner mask is the reserved value `0x80` use a separate
//! "rounded" stroke set decoded from the outer mask alone.

/// One stroke: a pair of integer endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: [i32; 2],
    pub end: [i32; 2],
}

fn seg(x1: i32, y1: i32, x2: i32, y2: i32) -> Segment {
    Segment {
        start: [x1, y1],
        end: [x2, y2],
    }
}

/// Inner-mask value reserving a glyph for the rounded stroke set.
const ROUNDED_GLYPH: u8 = 0x80;

/// First supported code point (space).
const FIRST_GLYPH: u32 = 0x20;

#[rustfmt::skip]
const SEGMENTS_OUTER: [u8; 95] = [
    0x00, 0x28, 0x81, 0x13, 0xbb, 0x42, 0x33, 0x80, 0x12, 0x21, 0x00, 0x09,
    0x20, 0x00, 0x80, 0x00, 0x7e, 0x30, 0x76, 0x3e, 0x8c, 0xb9, 0xf9, 0x0f,
    0xff, 0xbf, 0xc0, 0x60, 0x00, 0x03, 0x00, 0x00, 0xf7, 0xcf, 0xf9, 0xf3,
    0xe1, 0xf3, 0xc3, 0xfb, 0xcc, 0x33, 0x7c, 0xc0, 0xf0, 0xcf, 0xcc, 0xff,
    0xc7, 0x8f, 0xc7, 0xbb, 0x03, 0xfc, 0x84, 0xfc, 0x00, 0x84, 0x33, 0xe1,
    0x00, 0x1e, 0x00, 0x30, 0x00, 0x70, 0xe0, 0xf1, 0x1c, 0xe1, 0xc1, 0xe1,
    0xc0, 0xc0, 0x60, 0xc0, 0xe0, 0xc9, 0xc1, 0xe1, 0xc1, 0x0e, 0xc0, 0xa1,
    0x03, 0xe0, 0x04, 0xe4, 0x00, 0x00, 0x16, 0x33, 0x00, 0x33, 0x85,
];

#[rustfmt::skip]
const SEGMENTS_INNER: [u8; 95] = [
    0x00, 0x80, 0x00, 0x80, 0x07, 0x80, 0x4a, 0x00, 0xc8, 0xb0, 0x7b, 0x80,
    0x80, 0x03, 0x80, 0x50, 0x88, 0x8c, 0x03, 0x03, 0x03, 0x03, 0x03, 0x00,
    0x03, 0x03, 0x80, 0x80, 0xc8, 0x80, 0x48, 0x9e, 0x06, 0x03, 0x07, 0x00,
    0xb0, 0x03, 0x03, 0x02, 0x03, 0x04, 0x00, 0x31, 0x00, 0x04, 0x28, 0x00,
    0x03, 0x03, 0x23, 0x03, 0x04, 0x00, 0xe0, 0x04, 0x78, 0x07, 0x50, 0x00,
    0x28, 0x00, 0x98, 0x00, 0x08, 0x0d, 0x05, 0x00, 0x06, 0x01, 0x01, 0xa2,
    0x05, 0x00, 0x04, 0x8d, 0x00, 0x94, 0x04, 0x04, 0x05, 0x06, 0x88, 0xc0,
    0x04, 0x04, 0xa4, 0xa4, 0x78, 0x58, 0xa0, 0x49, 0x04, 0x32, 0x06,
];

/// Stroke selector for one glyph.
enum GlyphStrokes {
    /// Outer + inner box masks.
    Boxed { outer: u8, inner: u8 },
    /// Rounded stroke set, selected by the reserved inner mask.
    Rounded { outer: u8 },
}

fn glyph_strokes(ch: char) -> Option<GlyphStrokes> {
    let index = (ch as u32).checked_sub(FIRST_GLYPH)? as usize;
    let outer = *SEGMENTS_OUTER.get(index)?;
    let inner = *SEGMENTS_INNER.get(index)?;
    Some(if inner == ROUNDED_GLYPH {
        GlyphStrokes::Rounded { outer }
    } else {
        GlyphStrokes::Boxed { outer, inner }
    })
}

/// Tessellate `text` into line segments.
///
/// The glyph box is `size - 1` units tall; the cursor advances `size + 2`
/// per rendered glyph. Code points outside the supported range are skipped
/// without advancing the cursor. All segments of glyph *i* precede those of
/// glyph *i + 1*.
///
/// Callers validate `size >= 3`; smaller sizes degenerate.
pub fn render_text(text: &str, x: i32, y: i32, size: i32) -> Vec<Segment> {
    debug_assert!(size >= 3, "glyph size below minimum");
    let mut segments = Vec::new();
    let sm1 = size - 1;
    let sd4 = size / 4;
    let sne1 = !size & 1;
    let mut x1 = x;
    let y1 = y;
    let y2 = y1 + sm1 / 2;
    let y3 = y1 + sm1;
    for ch in text.chars() {
        let Some(strokes) = glyph_strokes(ch) else {
            continue;
        };
        let x2 = x1 + sm1 / 2;
        let x3 = x1 + sm1;
        match strokes {
            GlyphStrokes::Rounded { outer } => {
                rounded_strokes(outer, (x1, x2, x3), (y1, y2, y3), sd4, sne1, &mut segments);
            }
            GlyphStrokes::Boxed { outer, inner } => {
                // Lowercase without ascenders or descenders collapses to
                // the narrow half box.
                let (x2, x3) = if ch.is_ascii_lowercase() && outer & 0xe1 == 0 && inner & 0x49 == 0
                {
                    (x1, x2)
                } else {
                    (x2, x3)
                };
                boxed_strokes(outer, inner, (x1, x2, x3), (y1, y2, y3), &mut segments);
            }
        }
        x1 += size + 2;
    }
    segments
}

fn boxed_strokes(
    outer: u8,
    inner: u8,
    (x1, x2, x3): (i32, i32, i32),
    (y1, y2, y3): (i32, i32, i32),
    out: &mut Vec<Segment>,
) {
    for bit in 0..8 {
        if outer & (1 << bit) == 0 {
            continue;
        }
        out.push(match bit {
            0 => seg(x1, y1, x2, y1),
            1 => seg(x2, y1, x3, y1),
            2 => seg(x3, y1, x3, y2),
            3 => seg(x3, y2, x3, y3),
            4 => seg(x2, y3, x3, y3),
            5 => seg(x1, y3, x2, y3),
            6 => seg(x1, y2, x1, y3),
            _ => seg(x1, y1, x1, y2),
        });
    }
    // High bit flips the diagonal strokes.
    let flipped = inner & 0x80 != 0;
    for bit in 0..7 {
        if inner & (1 << bit) == 0 {
            continue;
        }
        out.push(match bit {
            0 => seg(x1, y2, x2, y2),
            1 => seg(x2, y2, x3, y2),
            2 => {
                if inner & 0x03 != 0 {
                    // Half stem: toward whichever edge the outer top covers.
                    let y_end = if outer & 0x03 != 0 { y1 } else { y3 };
                    seg(x2, y2, x2, y_end)
                } else {
                    seg(x2, y1, x2, y3)
                }
            }
            3 => {
                if flipped {
                    seg(x1, y2, x2, y1)
                } else {
                    seg(x1, y1, x2, y2)
                }
            }
            4 => {
                if flipped {
                    seg(x2, y1, x3, y2)
                } else {
                    seg(x2, y2, x3, y1)
                }
            }
            5 => {
                if flipped {
                    seg(x2, y3, x3, y2)
                } else {
                    seg(x2, y2, x3, y3)
                }
            }
            _ => {
                if flipped {
                    seg(x1, y2, x2, y3)
                } else {
                    seg(x1, y3, x2, y2)
                }
            }
        });
    }
}

fn rounded_strokes(
    outer: u8,
    (x1, x2, x3): (i32, i32, i32),
    (y1, y2, y3): (i32, i32, i32),
    sd4: i32,
    sne1: i32,
    out: &mut Vec<Segment>,
) {
    let xl = x2 - sd4;
    let xr = x2 + sd4 + sne1;
    let yu = y2 - sd4 + sne1;
    let yl = y2 + sd4;
    for bit in 0..8 {
        if outer & (1 << bit) == 0 {
            continue;
        }
        match bit {
            0 => out.push(seg(x1, yu, x3, yu)),
            1 => out.push(seg(x1, yl, x3, yl)),
            2 => out.push(seg(x2, y2, x2, y3)),
            3 => out.push(seg(x2, y1, x2, yl)),
            4 => {
                out.push(seg(xl, y1, xl, y3));
                out.push(seg(xr, y1, xr, y3));
            }
            5 => out.push(seg(xl, y3, xr, yl)),
            6 => {
                out.push(seg(xr, yu, xr, y1));
                out.push(seg(xl, yu, xl, y1));
                out.push(seg(xl, yu, xr, yu));
                out.push(seg(xl, y1, xr, y1));
            }
            _ => {
                out.push(seg(xl, yl, xr, yl));
                out.push(seg(xl, yl, xl, y3));
                out.push(seg(xr, yl, xr, y3));
                out.push(seg(xl, y3, xr, y3));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_produces_no_segments() {
        assert!(render_text("", 5, 7, 10).is_empty());
    }

    #[test]
    fn test_capital_a_golden_segments() {
        // 'A': outer mask 0xCF (both top halves, right side, both left
        // verticals), inner mask 0x03 (full crossbar).
        let segments = render_text("A", 0, 0, 10);
        assert_eq!(
            segments,
            vec![
                seg(0, 0, 4, 0),
                seg(4, 0, 9, 0),
                seg(9, 0, 9, 4),
                seg(9, 4, 9, 9),
                seg(0, 4, 0, 9),
                seg(0, 0, 0, 4),
                seg(0, 4, 4, 4),
                seg(4, 4, 9, 4),
            ]
        );
    }

    #[test]
    fn test_exclamation_uses_rounded_strokes() {
        // '!' selects the rounded set: a stem and a dot stroke.
        let segments = render_text("!", 0, 0, 9);
        // size 9: x2 = 4, sd4 = 2, sne1 = 0, y2 = 4.
        assert_eq!(segments, vec![seg(4, 0, 4, 6), seg(2, 8, 6, 6)]);
    }

    #[test]
    fn test_space_renders_nothing_but_advances() {
        let with_space = render_text("A A", 0, 0, 10);
        let without = render_text("A", 0, 0, 10);
        assert_eq!(with_space.len(), without.len() * 2);
        // Second 'A' sits two advances (2 × 12) to the right.
        assert_eq!(with_space[8].start, [24, 0]);
    }

    #[test]
    fn test_unsupported_character_skipped_without_advance() {
        let with_control = render_text("A\tB", 0, 0, 10);
        let adjacent = render_text("AB", 0, 0, 10);
        assert_eq!(with_control, adjacent);
    }

    #[test]
    fn test_segments_deterministic() {
        let first = render_text("Hello, World! 42", 3, -5, 12);
        let second = render_text("Hello, World! 42", 3, -5, 12);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_lowercase_narrow_box() {
        // 'v' qualifies for the narrow box: its strokes stay within x1..x2.
        let segments = render_text("v", 0, 0, 10);
        assert!(!segments.is_empty());
        for segment in &segments {
            assert!(segment.start[0] <= 4 && segment.end[0] <= 4);
        }
    }

    #[test]
    fn test_glyph_order_preserved() {
        let segments = render_text("AB", 0, 0, 10);
        let a_count = render_text("A", 0, 0, 10).len();
        // All 'A' strokes first, then all 'B' strokes shifted by one advance.
        assert!(segments[..a_count].iter().all(|s| s.start[0] <= 9));
        assert!(segments[a_count..].iter().all(|s| s.start[0] >= 12));
    }
}
