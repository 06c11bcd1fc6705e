//! Single-line text drawing.
//!
//! Text is never wrapped or reflowed. Glyphs advance by the face's natural
//! advance widths, and the top of the line (the ascender) sits at the given
//! position. Glyphs falling outside the canvas are clipped.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use glam::IVec2;

use crate::{
    font::{Face, ResolvedFont},
    Canvas, Color,
};

/// Cell size of the built-in bitmap face, in font units.
const BUILTIN_CELL: u32 = 8;

fn builtin_scale(size: f32) -> u32 {
    ((size / BUILTIN_CELL as f32).floor() as u32).max(1)
}

fn builtin_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn drawable(c: &char) -> bool {
    !c.is_control()
}

/// Measures the advance width of `text` in pixels.
pub fn measure(text: &str, font: &ResolvedFont) -> f32 {
    match font.face() {
        Face::Outline(face) => text
            .chars()
            .filter(drawable)
            .map(|c| face.metrics(c, font.size()).advance_width)
            .sum(),
        Face::Builtin => {
            let advance = BUILTIN_CELL * builtin_scale(font.size());
            (text.chars().filter(drawable).count() as u32 * advance) as f32
        }
    }
}

/// Height of one line from ascender to descender, in pixels.
pub fn line_height(font: &ResolvedFont) -> f32 {
    match font.face() {
        Face::Outline(face) => face
            .horizontal_line_metrics(font.size())
            .map(|metrics| metrics.ascent - metrics.descent)
            .unwrap_or_else(|| font.size()),
        Face::Builtin => (BUILTIN_CELL * builtin_scale(font.size())) as f32,
    }
}

/// Draws `text` with its top-left corner at `position`.
pub fn draw_text(
    canvas: &mut Canvas,
    position: IVec2,
    text: &str,
    font: &ResolvedFont,
    color: Color,
) {
    match font.face() {
        Face::Outline(face) => draw_outline(canvas, position, text, face, font.size(), color),
        Face::Builtin => draw_builtin(canvas, position, text, font.size(), color),
    }
}

fn draw_outline(
    canvas: &mut Canvas,
    position: IVec2,
    text: &str,
    face: &fontdue::Font,
    size: f32,
    color: Color,
) {
    let ascent = face
        .horizontal_line_metrics(size)
        .map(|metrics| metrics.ascent)
        .unwrap_or(size);
    let baseline = position.y as f32 + ascent;
    let mut pen = position.x as f32;

    for c in text.chars().filter(drawable) {
        let (metrics, coverage) = face.rasterize(c, size);
        let left = (pen + metrics.xmin as f32).round() as i32;
        let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;

        for (i, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let (gx, gy) = ((i % metrics.width) as i32, (i / metrics.width) as i32);
            canvas.blend_pixel(left + gx, top + gy, color, alpha);
        }

        pen += metrics.advance_width;
    }
}

fn draw_builtin(canvas: &mut Canvas, position: IVec2, text: &str, size: f32, color: Color) {
    let scale = builtin_scale(size) as i32;
    let advance = BUILTIN_CELL as i32 * scale;

    for (n, c) in text.chars().filter(drawable).enumerate() {
        let origin = position + IVec2::new(n as i32 * advance, 0);
        for (row, bits) in builtin_glyph(c).iter().enumerate() {
            for column in 0..BUILTIN_CELL as i32 {
                if bits & (1 << column) == 0 {
                    continue;
                }
                let cell = origin + IVec2::new(column * scale, row as i32 * scale);
                canvas.fill_rect(cell, cell + IVec2::splat(scale - 1), color);
            }
        }
    }
}
