//! Bitmap helpers: decoding assets, fitting them into boxes, and writing
//! finished cards to disk.

use std::{fs, io::Cursor, path::Path};

use glam::{uvec2, UVec2};
use image::{
    imageops::{self, FilterType},
    ImageFormat, RgbImage, RgbaImage,
};

use crate::error::{Error, Result};

/// Decodes an image file into RGBA.
///
/// Unreadable or undecodable files are fatal for the render call.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| Error::AssetLoad {
        path: path.to_owned(),
        source,
    })?;
    log::debug!(
        "Loaded '{}' ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.into_rgba8())
}

/// Loads an image and fits it into a `max_width` x `max_height` box.
pub fn load_fitted(path: &Path, max_width: u32, max_height: u32) -> Result<RgbaImage> {
    let image = load_image(path)?;
    Ok(resize_keeping_aspect(&image, max_width, max_height))
}

/// Computes the size of a `width` x `height` bitmap shrunk so that
/// neither side exceeds the box. Never grows.
///
/// Sides never shrink below one pixel, so a box with a zero side yields a
/// 1px side there rather than an empty bitmap.
pub fn fitted_size(width: u32, height: u32, max_width: u32, max_height: u32) -> UVec2 {
    if width <= max_width && height <= max_height {
        return uvec2(width, height);
    }
    scaled_size(width, height, max_width, max_height)
}

fn scaled_size(width: u32, height: u32, max_width: u32, max_height: u32) -> UVec2 {
    let scale = f64::min(
        max_width as f64 / width.max(1) as f64,
        max_height as f64 / height.max(1) as f64,
    );
    let scaled = |side: u32, max: u32| ((side as f64 * scale).round() as u32).clamp(1, max.max(1));
    uvec2(scaled(width, max_width), scaled(height, max_height))
}

/// Shrinks a bitmap to fit the box while preserving its aspect ratio,
/// using Lanczos resampling.
///
/// Bitmaps that already fit are returned unchanged; this never upscales.
/// See [`fitted_size`] for the one-pixel floor.
pub fn resize_keeping_aspect(bitmap: &RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let size = fitted_size(bitmap.width(), bitmap.height(), max_width, max_height);
    if size == uvec2(bitmap.width(), bitmap.height()) {
        return bitmap.clone();
    }
    imageops::resize(bitmap, size.x, size.y, FilterType::Lanczos3)
}

/// Scales a machine-readable symbol up or down so it fills as much of the
/// box as its aspect ratio allows.
///
/// Nearest-neighbour sampling keeps module edges sharp. Like
/// [`fitted_size`], sides never drop below one pixel.
pub fn scale_to_fit(bitmap: &RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let size = scaled_size(bitmap.width(), bitmap.height(), max_width, max_height);
    if size == uvec2(bitmap.width(), bitmap.height()) {
        return bitmap.clone();
    }
    imageops::resize(bitmap, size.x, size.y, FilterType::Nearest)
}

/// Writes an opaque bitmap to `path`.
///
/// The format follows the file extension, defaulting to PNG. The file is
/// encoded in memory, written next to the destination, then renamed over
/// it, so a partially written card is never visible under `path`.
pub fn save(bitmap: &RgbImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    let mut encoded = Cursor::new(Vec::new());
    bitmap
        .write_to(&mut encoded, format)
        .map_err(|source| Error::Encode {
            path: path.to_owned(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{}.partial", file_name));

    let write_error = |source| Error::Write {
        path: path.to_owned(),
        source,
    };
    fs::write(&staging, encoded.into_inner()).map_err(write_error)?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(write_error(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{Rgb, Rgba};

    use super::*;

    #[test]
    fn zero_sized_box_floors_at_one_pixel() {
        assert_eq!(fitted_size(400, 200, 0, 100), uvec2(1, 1));
        assert_eq!(fitted_size(400, 200, 100, 0), uvec2(1, 1));
        assert_eq!(fitted_size(1000, 10, 100, 100), uvec2(100, 1));

        let bitmap = RgbaImage::from_pixel(40, 20, Rgba([9, 9, 9, 255]));
        assert_eq!(resize_keeping_aspect(&bitmap, 0, 0).dimensions(), (1, 1));
        assert_eq!(scale_to_fit(&bitmap, 0, 50).dimensions(), (1, 1));
    }

    #[test]
    fn bitmaps_that_fit_are_untouched() {
        let bitmap = RgbaImage::from_fn(30, 20, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let resized = resize_keeping_aspect(&bitmap, 220, 120);
        assert_eq!(resized, bitmap);
    }

    #[test]
    fn resize_respects_box_and_aspect() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..200 {
            let (width, height) = (rng.u32(40..2000), rng.u32(40..2000));
            let (max_width, max_height) = (rng.u32(40..600), rng.u32(40..600));

            let size = fitted_size(width, height, max_width, max_height);
            assert!(size.x <= max_width, "{:?} wider than {}", size, max_width);
            assert!(size.y <= max_height, "{:?} taller than {}", size, max_height);

            let aspect = width as f64 / height as f64;
            let fitted_aspect = size.x as f64 / size.y as f64;
            let tolerance = (1.0 + aspect) / size.y as f64;
            assert!(
                (fitted_aspect - aspect).abs() <= tolerance,
                "{}x{} -> {:?}",
                width,
                height,
                size
            );

            if width <= max_width && height <= max_height {
                assert_eq!(size, uvec2(width, height));
            }
        }
    }

    #[test]
    fn resize_produces_fitted_pixels() {
        let bitmap = RgbaImage::from_pixel(1000, 500, Rgba([10, 20, 30, 255]));
        let resized = resize_keeping_aspect(&bitmap, 250, 300);
        assert_eq!(resized.dimensions(), (250, 125));
    }

    #[test]
    fn symbols_scale_up() {
        let symbol = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let scaled = scale_to_fit(&symbol, 200, 200);
        assert_eq!(scaled.dimensions(), (200, 200));

        let bars = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 0, 255]));
        assert_eq!(scale_to_fit(&bars, 400, 100).dimensions(), (300, 100));
        assert_eq!(scale_to_fit(&bars, 600, 400).dimensions(), (600, 200));
    }

    #[test]
    fn missing_assets_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("photo.png")).unwrap_err();
        assert!(matches!(err, Error::AssetLoad { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        let card = RgbImage::from_pixel(8, 4, Rgb([11, 84, 129]));

        save(&card, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(*loaded.get_pixel(3, 2), Rgba([11, 84, 129, 255]));
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn unwritable_destination_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("card.png");
        let card = RgbImage::new(2, 2);
        assert!(matches!(save(&card, &path), Err(Error::Write { .. })));
    }
}
