use image::RgbImage;

use crate::{
    font::{FontRef, Fonts, ResolvedFont},
    instruction::DrawInstruction,
    text, Canvas,
};

/// Executes draw instructions against a canvas.
///
/// The renderer knows nothing about card layouts; it paints whatever
/// sequence it is handed, in order.
pub struct Renderer {
    fonts: Fonts,
}

impl Renderer {
    pub fn new(fonts: Fonts) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut Fonts {
        &mut self.fonts
    }

    /// Resolves a font the same way text instructions do.
    pub fn resolve_font(&mut self, font: &FontRef) -> ResolvedFont {
        self.fonts.resolve(font)
    }

    /// Paints every instruction onto `canvas` in sequence, then flattens the
    /// result to an opaque RGB bitmap.
    pub fn render<'a>(
        &mut self,
        mut canvas: Canvas,
        instructions: impl IntoIterator<Item = &'a DrawInstruction>,
    ) -> RgbImage {
        for (i, instruction) in instructions.into_iter().enumerate() {
            log::trace!("Executing instruction {} ({})", i, instruction.kind());
            self.execute(&mut canvas, instruction);
        }
        canvas.flatten()
    }

    fn execute(&mut self, canvas: &mut Canvas, instruction: &DrawInstruction) {
        match instruction {
            DrawInstruction::Rectangle {
                top_left,
                bottom_right,
                fill,
            } => canvas.fill_rect(*top_left, *bottom_right, *fill),
            DrawInstruction::Image {
                bitmap,
                position,
                own_alpha,
            } => canvas.paste(bitmap, *position, *own_alpha),
            DrawInstruction::Text {
                position,
                text,
                font,
                color,
            } => {
                let font = self.fonts.resolve(font);
                text::draw_text(canvas, *position, text, &font, *color);
            }
            DrawInstruction::Line {
                start,
                end,
                color,
                width,
            } => canvas.draw_line(*start, *end, *color, *width),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use image::{Rgb, Rgba, RgbaImage};

    use super::*;
    use crate::{instruction::Instructions, Color};

    const NAVY: Color = Color::rgb(11, 84, 129);

    fn renderer() -> Renderer {
        Renderer::new(Fonts::new())
    }

    fn blank(width: u32, height: u32) -> Canvas {
        Canvas::new(width, height, Color::WHITE).unwrap()
    }

    #[test]
    fn later_instructions_paint_over_earlier_ones() {
        let red = Color::rgb(200, 0, 0);
        let blue = Color::rgb(0, 0, 200);
        let mut instructions = Instructions::new();
        instructions
            .rectangle(ivec2(0, 0), ivec2(60, 60), red)
            .rectangle(ivec2(40, 40), ivec2(99, 99), blue);

        let out = renderer().render(blank(100, 100), &instructions);

        assert_eq!(*out.get_pixel(50, 50), Rgb([0, 0, 200]));
        assert_eq!(*out.get_pixel(10, 10), Rgb([200, 0, 0]));
        assert_eq!(*out.get_pixel(90, 90), Rgb([0, 0, 200]));
    }

    #[test]
    fn header_with_title() {
        let title = FontRef::new("Arial", 36.0).bold();
        let mut instructions = Instructions::new();
        instructions
            .rectangle(ivec2(0, 0), ivec2(1000, 140), NAVY)
            .text(ivec2(300, 25), "Acme College", &title, Color::WHITE);

        let out = renderer().render(blank(1000, 600), &instructions);

        assert_eq!(*out.get_pixel(10, 10), Rgb([11, 84, 129]));
        let inked = (300..600)
            .flat_map(|x| (25..70).map(move |y| (x, y)))
            .any(|(x, y)| *out.get_pixel(x, y) != Rgb([11, 84, 129]));
        assert!(inked, "title glyphs missing near (300, 25)");
        assert_eq!(*out.get_pixel(10, 300), Rgb([255, 255, 255]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let font = FontRef::new("Arial", 22.0);
        let mut photo = RgbaImage::from_pixel(30, 40, Rgba([90, 60, 30, 255]));
        photo.put_pixel(0, 0, Rgba([0, 0, 0, 0]));

        let mut instructions = Instructions::new();
        instructions
            .rectangle(ivec2(0, 0), ivec2(199, 20), NAVY)
            .image(photo, ivec2(10, 30))
            .text(ivec2(50, 40), "Roll No.: FGTCLB2983", &font, Color::BLACK)
            .line(ivec2(5, 20), ivec2(195, 20), Color::rgb(88, 152, 62), 6);

        let first = renderer().render(blank(200, 100), &instructions);
        let second = renderer().render(blank(200, 100), &instructions);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn output_is_always_opaque() {
        let mut instructions = Instructions::new();
        instructions
            .opaque_image(
                RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])),
                ivec2(0, 0),
            )
            .rectangle(ivec2(10, 0), ivec2(19, 9), Color::rgba(0, 0, 0, 100));

        let canvas = Canvas::new(20, 10, Color::TRANSPARENT).unwrap();
        let out = renderer().render(canvas, &instructions);

        // RgbImage carries no alpha channel at all.
        assert_eq!(out.as_raw().len(), 20 * 10 * 3);
        assert_eq!(*out.get_pixel(5, 5), Rgb([255, 255, 255]));
        // Black at alpha 100 over white.
        assert_eq!(*out.get_pixel(15, 5), Rgb([155, 155, 155]));
    }

    #[test]
    fn empty_instruction_list_flattens_canvas() {
        let out = renderer().render(blank(3, 3), &Instructions::new());
        assert!(out.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }
}
