//! Machine-readable symbols: QR codes and Code 128 barcodes.
//!
//! Symbol generation is allowed to fail. Callers are expected to log the
//! [`SymbolError`] and carry on without the symbol.

use barcoders::sym::code128::Code128;
use glam::ivec2;
use image::RgbaImage;
use qrcode::QrCode;

use crate::{font::ResolvedFont, text, Canvas, Color};

/// Code 128 character set B prefix understood by `barcoders`.
const CODE128_SET_B: char = '\u{0181}';

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolError {
    #[error("{symbology} payload is empty")]
    Empty { symbology: &'static str },

    #[error("{symbology} cannot encode {character:?} in payload {payload:?}")]
    Unencodable {
        symbology: &'static str,
        payload: String,
        character: char,
    },

    #[error("{symbology} encoder rejected payload {payload:?}: {reason}")]
    Encoder {
        symbology: &'static str,
        payload: String,
        reason: String,
    },
}

impl SymbolError {
    pub fn symbology(&self) -> &'static str {
        match self {
            SymbolError::Empty { symbology }
            | SymbolError::Unencodable { symbology, .. }
            | SymbolError::Encoder { symbology, .. } => symbology,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            SymbolError::Empty { .. } => "",
            SymbolError::Unencodable { payload, .. } | SymbolError::Encoder { payload, .. } => {
                payload
            }
        }
    }
}

/// Encodes a string payload into a scannable bitmap.
pub trait SymbolGenerator {
    /// Human-readable name of the symbology, used in logs and errors.
    fn symbology(&self) -> &'static str;

    fn generate(&self, payload: &str) -> Result<RgbaImage, SymbolError>;
}

/// QR code generator.
#[derive(Debug, Clone)]
pub struct QrSymbol {
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
    pub dark: Color,
    pub light: Color,
}

impl Default for QrSymbol {
    fn default() -> Self {
        Self {
            box_size: 4,
            border: 2,
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }
}

impl SymbolGenerator for QrSymbol {
    fn symbology(&self) -> &'static str {
        "QR"
    }

    fn generate(&self, payload: &str) -> Result<RgbaImage, SymbolError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| SymbolError::Encoder {
            symbology: self.symbology(),
            payload: payload.to_owned(),
            reason: e.to_string(),
        })?;

        let modules = code.width() as u32;
        let colors = code.to_colors();
        let box_size = self.box_size.max(1);
        let side = (modules + 2 * self.border) * box_size;

        Ok(RgbaImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / box_size, y / box_size);
            let inside = self.border..self.border + modules;
            let dark = inside.contains(&mx)
                && inside.contains(&my)
                && colors[((my - self.border) * modules + (mx - self.border)) as usize]
                    == qrcode::Color::Dark;
            let color = if dark { self.dark } else { self.light };
            color.into()
        }))
    }
}

/// Code 128 barcode generator with the payload printed beneath the bars.
#[derive(Clone)]
pub struct Code128Symbol {
    /// Font for the human-readable line.
    pub label_font: ResolvedFont,
    /// Pixels per module.
    pub module_width: u32,
    pub bar_height: u32,
    /// Quiet zone on each side, in modules.
    pub quiet_zone: u32,
    /// Space between bars and label, and below the label.
    pub label_gap: u32,
}

impl Code128Symbol {
    pub fn new(label_font: ResolvedFont) -> Self {
        Self {
            label_font,
            module_width: 3,
            bar_height: 70,
            quiet_zone: 10,
            label_gap: 6,
        }
    }

    fn modules(&self, payload: &str) -> Result<Vec<u8>, SymbolError> {
        if payload.is_empty() {
            return Err(SymbolError::Empty {
                symbology: self.symbology(),
            });
        }
        if let Some(character) = payload.chars().find(|&c| !matches!(c, ' '..='~')) {
            return Err(SymbolError::Unencodable {
                symbology: self.symbology(),
                payload: payload.to_owned(),
                character,
            });
        }

        let code = Code128::new(format!("{}{}", CODE128_SET_B, payload)).map_err(|e| {
            SymbolError::Encoder {
                symbology: self.symbology(),
                payload: payload.to_owned(),
                reason: format!("{:?}", e),
            }
        })?;
        Ok(code.encode())
    }
}

impl SymbolGenerator for Code128Symbol {
    fn symbology(&self) -> &'static str {
        "Code 128"
    }

    fn generate(&self, payload: &str) -> Result<RgbaImage, SymbolError> {
        let modules = self.modules(payload)?;

        let module_width = self.module_width.max(1);
        let width = (modules.len() as u32 + 2 * self.quiet_zone) * module_width;
        let label_height = text::line_height(&self.label_font).ceil() as u32;
        let height = self.bar_height + 2 * self.label_gap + label_height;

        let mut canvas =
            Canvas::new(width, height, Color::WHITE).map_err(|e| SymbolError::Encoder {
                symbology: self.symbology(),
                payload: payload.to_owned(),
                reason: e.to_string(),
            })?;

        let left = (self.quiet_zone * module_width) as i32;
        for (i, &bar) in modules.iter().enumerate() {
            if bar != 1 {
                continue;
            }
            let x = left + (i as u32 * module_width) as i32;
            canvas.fill_rect(
                ivec2(x, 0),
                ivec2(x + module_width as i32 - 1, self.bar_height as i32 - 1),
                Color::BLACK,
            );
        }

        let label_width = text::measure(payload, &self.label_font);
        let label_x = ((width as f32 - label_width) / 2.0).round() as i32;
        let label_y = (self.bar_height + self.label_gap) as i32;
        text::draw_text(
            &mut canvas,
            ivec2(label_x, label_y),
            payload,
            &self.label_font,
            Color::BLACK,
        );

        Ok(canvas.pixels().clone())
    }
}

/// The generators used by card layouts.
pub struct Symbols {
    pub qr: Box<dyn SymbolGenerator>,
    pub barcode: Box<dyn SymbolGenerator>,
}

impl Symbols {
    pub fn new(
        qr: impl SymbolGenerator + 'static,
        barcode: impl SymbolGenerator + 'static,
    ) -> Self {
        Self {
            qr: Box::new(qr),
            barcode: Box::new(barcode),
        }
    }

    /// A QR generator with box size 4 and border 2, and a Code 128
    /// generator labelled in `label_font`.
    pub fn standard(label_font: ResolvedFont) -> Self {
        Self::new(QrSymbol::default(), Code128Symbol::new(label_font))
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn barcode() -> Code128Symbol {
        Code128Symbol::new(ResolvedFont::builtin(24.0))
    }

    #[test]
    fn qr_has_quiet_zone_and_finder() {
        let qr = QrSymbol::default();
        let bitmap = qr.generate("FGTCLB2983 | Edward Norton").unwrap();

        assert_eq!(bitmap.width(), bitmap.height());
        assert_eq!(bitmap.width() % 4, 0);
        // Border is light, the finder pattern's corner module is dark.
        assert_eq!(*bitmap.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*bitmap.get_pixel(8, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*bitmap.get_pixel(11, 11), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn qr_rejects_oversized_payloads() {
        let payload = "x".repeat(4000);
        let err = QrSymbol::default().generate(&payload).unwrap_err();
        assert_eq!(err.symbology(), "QR");
        assert!(matches!(err, SymbolError::Encoder { .. }));
    }

    #[test]
    fn barcode_bars_and_label() {
        let symbol = barcode();
        let bitmap = symbol.generate("FGTCLB2983").unwrap();

        // 11 modules each for start, ten characters and checksum, 13 for stop.
        let modules = 11 * 12 + 13;
        assert_eq!(bitmap.width(), (modules + 20) * 3);

        let quiet = 10 * 3;
        assert_eq!(*bitmap.get_pixel(quiet - 1, 10), Rgba([255, 255, 255, 255]));
        // Every Code 128 symbol starts with a bar.
        assert_eq!(*bitmap.get_pixel(quiet, 10), Rgba([0, 0, 0, 255]));

        let label_row = (70 + 6)..bitmap.height();
        let inked = label_row
            .flat_map(|y| (0..bitmap.width()).map(move |x| (x, y)))
            .any(|(x, y)| *bitmap.get_pixel(x, y) == Rgba([0, 0, 0, 255]));
        assert!(inked, "label missing under the bars");
    }

    #[test]
    fn barcode_rejects_characters_outside_the_set() {
        let err = barcode().generate("FGTCLB\u{e9}").unwrap_err();
        assert_eq!(
            err,
            SymbolError::Unencodable {
                symbology: "Code 128",
                payload: "FGTCLB\u{e9}".to_owned(),
                character: '\u{e9}',
            }
        );
        assert_eq!(err.payload(), "FGTCLB\u{e9}");
    }

    #[test]
    fn barcode_rejects_empty_payload() {
        assert!(matches!(
            barcode().generate(""),
            Err(SymbolError::Empty { .. })
        ));
    }
}
