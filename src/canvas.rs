use glam::{ivec2, uvec2, vec2, IVec2, UVec2, Vec2};
use image::{
    imageops::{self, FilterType},
    Rgb, RgbImage, Rgba, RgbaImage,
};

use crate::{
    error::{Error, Result},
    Color,
};

/// The pixel buffer for one side of a card.
///
/// Every pixel is unpremultiplied RGBA. A canvas is owned by a single
/// render pass and consumed by [`Canvas::flatten`] at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Creates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvas { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, background.into()),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> UVec2 {
        uvec2(self.width(), self.height())
    }

    /// Gets the color at a pixel.
    ///
    /// # Panics
    /// Panics if the pixel lies outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        (*self.pixels.get_pixel(x, y)).into()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Blends `color` over one pixel, scaled by `coverage`.
    ///
    /// Pixels outside the canvas are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if !self.contains(x, y) {
            return;
        }
        let pixel = self.pixels.get_pixel_mut(x as u32, y as u32);
        *pixel = blend(*pixel, color, coverage);
    }

    /// Fills the rectangle spanned by two corners, both inclusive.
    ///
    /// The rectangle is clipped to the canvas.
    pub fn fill_rect(&mut self, top_left: IVec2, bottom_right: IVec2, color: Color) {
        let min = top_left.min(bottom_right).max(IVec2::ZERO);
        let max = top_left
            .max(bottom_right)
            .min(ivec2(self.width() as i32 - 1, self.height() as i32 - 1));
        if min.x > max.x || min.y > max.y {
            return;
        }

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let pixel = self.pixels.get_pixel_mut(x as u32, y as u32);
                *pixel = blend(*pixel, color, u8::MAX);
            }
        }
    }

    /// Pastes a bitmap with its top-left corner at `position`.
    ///
    /// With `own_alpha`, the bitmap's alpha channel masks the paste.
    /// Otherwise its pixels replace the canvas pixels outright.
    pub fn paste(&mut self, bitmap: &RgbaImage, position: IVec2, own_alpha: bool) {
        for (x, y, source) in bitmap.enumerate_pixels() {
            let (cx, cy) = (position.x + x as i32, position.y + y as i32);
            if !self.contains(cx, cy) {
                continue;
            }
            let target = self.pixels.get_pixel_mut(cx as u32, cy as u32);
            *target = if own_alpha {
                blend(*target, (*source).into(), u8::MAX)
            } else {
                *source
            };
        }
    }

    /// Draws a straight line `width` pixels thick with butt caps.
    ///
    /// Only the part of the line's bounding box that overlaps the canvas
    /// is visited.
    pub fn draw_line(&mut self, start: IVec2, end: IVec2, color: Color, width: u32) {
        let half = width.max(1) as f32 / 2.0;
        let (a, b) = (start.as_vec2(), end.as_vec2());
        let direction = b - a;
        let length_squared = direction.length_squared();

        let reach = half.ceil() as i64 + 1;
        let clip = |from: i32, to: i32, limit: u32| {
            let low = (from.min(to) as i64 - reach).max(0);
            let high = (from.max(to) as i64 + reach).min(limit as i64 - 1);
            (low <= high).then(|| (low as i32, high as i32))
        };
        let (x0, x1) = match clip(start.x, end.x, self.width()) {
            Some(range) => range,
            None => return,
        };
        let (y0, y1) = match clip(start.y, end.y, self.height()) {
            Some(range) => range,
            None => return,
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = vec2(x as f32 + 0.5, y as f32 + 0.5);
                if covers(center, a, direction, length_squared, half) {
                    let pixel = self.pixels.get_pixel_mut(x as u32, y as u32);
                    *pixel = blend(*pixel, color, u8::MAX);
                }
            }
        }
    }

    /// Blends a layer over the whole canvas using the layer's own alpha.
    pub fn composite(&mut self, layer: &Layer) {
        self.paste(&layer.pixels, IVec2::ZERO, true);
    }

    /// Drops the alpha channel, compositing translucent pixels over white.
    pub fn flatten(self) -> RgbImage {
        let (width, height) = self.pixels.dimensions();
        RgbImage::from_fn(width, height, |x, y| {
            let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
            Rgb([mix(r, u8::MAX, a), mix(g, u8::MAX, a), mix(b, u8::MAX, a)])
        })
    }
}

/// A translucent bitmap stretched to the size of a canvas.
#[derive(Debug, Clone)]
pub struct Layer {
    pixels: RgbaImage,
}

impl Layer {
    /// Stretches `bitmap` to `size` and sets every pixel's alpha to `alpha`.
    pub fn stretched(bitmap: &RgbaImage, size: UVec2, alpha: u8) -> Self {
        let mut pixels = if bitmap.dimensions() == (size.x, size.y) {
            bitmap.clone()
        } else {
            imageops::resize(bitmap, size.x, size.y, FilterType::CatmullRom)
        };
        pixels.pixels_mut().for_each(|pixel| pixel.0[3] = alpha);
        Self { pixels }
    }
}

/// Blends a background image over the canvas at a uniform opacity.
///
/// The background is stretched to exactly cover the canvas. Without a
/// background the canvas is returned as is.
pub fn composite_background(
    mut canvas: Canvas,
    background: Option<&RgbaImage>,
    alpha: u8,
) -> Canvas {
    if let Some(background) = background {
        let layer = Layer::stretched(background, canvas.size(), alpha);
        canvas.composite(&layer);
    }
    canvas
}

fn covers(point: Vec2, start: Vec2, direction: Vec2, length_squared: f32, half: f32) -> bool {
    let offset = point - start;
    if length_squared == 0.0 {
        let offset = offset.abs();
        return offset.x <= half && offset.y <= half;
    }
    let t = offset.dot(direction) / length_squared;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }
    offset.perp_dot(direction).abs() <= half * length_squared.sqrt()
}

/// `src` over `dst` for one channel at opacity `alpha`, rounded.
fn mix(src: u8, dst: u8, alpha: u8) -> u8 {
    let (src, dst, alpha) = (src as u32, dst as u32, alpha as u32);
    ((src * alpha + dst * (255 - alpha) + 127) / 255) as u8
}

/// Unpremultiplied source-over. Weights are kept in units of 1/255^2
/// until the final division.
fn blend(dst: Rgba<u8>, src: Color, coverage: u8) -> Rgba<u8> {
    let src_alpha = (src.alpha() as u32 * coverage as u32 + 127) / 255;
    if src_alpha == 0 {
        return dst;
    }
    let Rgba([r, g, b, a]) = dst;
    let src_weight = src_alpha * 255;
    let dst_weight = a as u32 * (255 - src_alpha);
    let total = src_weight + dst_weight;

    let channel = |src: u8, dst: u8| {
        ((src as u32 * src_weight + dst as u32 * dst_weight + total / 2) / total) as u8
    };
    Rgba([
        channel(src.red(), r),
        channel(src.green(), g),
        channel(src.blue(), b),
        ((total + 127) / 255) as u8,
    ])
}
