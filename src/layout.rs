//! Card layouts: the front and back of an identification card expressed as
//! draw instruction sequences.
//!
//! Everything here is data. Coordinates, colors and fonts come from an
//! immutable [`CardTheme`]; the text comes from [`CardData`].

mod back;
mod front;

use std::{path::Path, sync::Arc};

use glam::{ivec2, uvec2, IVec2, UVec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{
    bitmap,
    config::AssetPaths,
    error::Result,
    font::FontRef,
    instruction::Instructions,
    symbol::{SymbolError, SymbolGenerator},
    Color,
};

pub use back::back;
pub use front::front;

/// Width and height of a bounding box, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

impl BoxSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Colors, dimensions and fonts shared by both sides of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTheme {
    pub width: u32,
    pub height: u32,
    pub header_height: i32,
    pub separator_height: i32,
    pub padding: i32,

    pub background: Color,
    pub header: Color,
    pub separator: Color,
    pub header_text: Color,
    pub label: Color,
    pub value: Color,
    pub signature_caption: Color,
    pub body: Color,
    pub footer: Color,
    pub stripe: Color,

    pub title_font: FontRef,
    pub subtitle_font: FontRef,
    pub detail_font: FontRef,
    pub caption_font: FontRef,
    pub body_font: FontRef,
    pub back_footer_font: FontRef,
    pub barcode_label_font: FontRef,

    /// Top of the logo; its left edge is `padding`.
    pub logo_top: i32,
    pub logo_box: BoxSize,
    pub header_text_x: i32,
    pub title_y: i32,
    pub subtitle_y: i32,

    pub photo_box: BoxSize,
    pub signature_box: BoxSize,
    pub details_x: i32,
    /// Horizontal distance from a detail label to its value.
    pub value_offset: i32,
    pub detail_line_height: i32,

    /// Top-left of the back text block.
    pub body_origin: (i32, i32),
    pub body_line_height: i32,

    pub qr_size: u32,
    /// Gap between the QR code and the right edge.
    pub qr_right_margin: i32,
    pub qr_top: i32,
    pub barcode_box: BoxSize,
    pub barcode_origin: (i32, i32),

    pub footer_x: i32,
    /// Distance from the bottom edge to the top of the footer line.
    pub footer_rise: i32,
    pub stripe_inset: i32,
    pub stripe_width: u32,
}

impl Default for CardTheme {
    fn default() -> Self {
        let regular = |size| FontRef::new("Arial", size);
        Self {
            width: 1000,
            height: 600,
            header_height: 140,
            separator_height: 40,
            padding: 40,

            background: Color::WHITE,
            header: Color::rgb(11, 84, 129),
            separator: Color::rgb(232, 240, 232),
            header_text: Color::WHITE,
            label: Color::BLACK,
            value: Color::rgb(40, 100, 40),
            signature_caption: Color::rgb(60, 60, 60),
            body: Color::rgb(10, 10, 10),
            footer: Color::rgb(80, 80, 80),
            stripe: Color::rgb(88, 152, 62),

            title_font: regular(36.0).bold(),
            subtitle_font: regular(18.0),
            detail_font: regular(22.0),
            caption_font: regular(16.0),
            body_font: regular(20.0),
            back_footer_font: regular(14.0),
            barcode_label_font: regular(24.0),

            logo_top: 10,
            logo_box: BoxSize::new(220, 120),
            header_text_x: 300,
            title_y: 25,
            subtitle_y: 75,

            photo_box: BoxSize::new(250, 300),
            signature_box: BoxSize::new(200, 80),
            details_x: 350,
            value_offset: 250,
            detail_line_height: 38,

            body_origin: (50, 200),
            body_line_height: 30,

            qr_size: 200,
            qr_right_margin: 50,
            qr_top: 200,
            barcode_box: BoxSize::new(400, 100),
            barcode_origin: (580, 420),

            footer_x: 20,
            footer_rise: 30,
            stripe_inset: 20,
            stripe_width: 6,
        }
    }
}

impl CardTheme {
    pub fn size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    /// Bottom edge of the separator band.
    pub fn band_bottom(&self) -> i32 {
        self.header_height + self.separator_height
    }

    fn footer_origin(&self) -> IVec2 {
        ivec2(self.footer_x, self.height as i32 - self.footer_rise)
    }
}

/// The issuing institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub toll_free: String,
    pub website: String,
    /// Line under the name on the front.
    pub front_tagline: String,
    /// Line under the name on the back.
    pub back_tagline: String,
}

impl Default for Institution {
    fn default() -> Self {
        Self {
            name: "Maharana Pratap Engineering College".to_owned(),
            address: "Kothi, Mandhana, Kanpur, Uttar Pradesh".to_owned(),
            contact: "+91-8081210087 / +91-8953400862".to_owned(),
            toll_free: "1800-123-456".to_owned(),
            website: "www.mpgi.edu.in".to_owned(),
            front_tagline: "Founded: 1999".to_owned(),
            back_tagline: "Affiliated to AKTU".to_owned(),
        }
    }
}

/// The card holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    /// Roll number; also the barcode payload.
    pub id: String,
    pub program: String,
    pub date_of_birth: String,
    pub valid_through: String,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            name: "Edward Norton".to_owned(),
            id: "FGTCLB2983".to_owned(),
            program: "B.Tech - Computer Science".to_owned(),
            date_of_birth: "28-Feb-2000".to_owned(),
            valid_through: "31-May-2026".to_owned(),
        }
    }
}

/// Everything printed on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardData {
    pub institution: Institution,
    pub person: Person,
    pub emergency_contact: String,
    /// Printed under "Rules & Instructions:" on the back.
    pub rules: Vec<String>,
}

impl Default for CardData {
    fn default() -> Self {
        Self {
            institution: Institution::default(),
            person: Person::default(),
            emergency_contact: "Emergency Contact: +91-8081210087".to_owned(),
            rules: [
                "- This card is the property of MPGI and must be returned upon request.",
                "- Any misuse or alteration is punishable under institute policy.",
                "- Carry this card always while on campus.",
                "- If found, please return to the college office.",
            ]
            .iter()
            .map(|rule| rule.to_string())
            .collect(),
        }
    }
}

impl CardData {
    /// Payload of the QR code on the back.
    pub fn qr_payload(&self) -> String {
        format!("{} | {}", self.person.id, self.person.name)
    }
}

/// Decoded images, already fitted to their boxes.
#[derive(Debug, Clone)]
pub struct CardAssets {
    pub logo: Arc<RgbaImage>,
    pub photo: Arc<RgbaImage>,
    pub signature: Arc<RgbaImage>,
}

impl CardAssets {
    /// Decodes and fits the logo, photo and signature.
    ///
    /// Any missing or corrupt asset aborts with [`crate::Error::AssetLoad`].
    pub fn load(paths: &AssetPaths, theme: &CardTheme) -> Result<Self> {
        let load = |path: &Path, size: BoxSize| -> Result<Arc<RgbaImage>> {
            Ok(Arc::new(bitmap::load_fitted(path, size.width, size.height)?))
        };
        Ok(Self {
            logo: load(&paths.logo, theme.logo_box)?,
            photo: load(&paths.photo, theme.photo_box)?,
            signature: load(&paths.signature, theme.signature_box)?,
        })
    }

    /// Fits already-decoded images to the theme's boxes.
    pub fn fitted(
        logo: &RgbaImage,
        photo: &RgbaImage,
        signature: &RgbaImage,
        theme: &CardTheme,
    ) -> Self {
        let fit = |image: &RgbaImage, size: BoxSize| {
            Arc::new(bitmap::resize_keeping_aspect(image, size.width, size.height))
        };
        Self {
            logo: fit(logo, theme.logo_box),
            photo: fit(photo, theme.photo_box),
            signature: fit(signature, theme.signature_box),
        }
    }
}

/// One side of a card, ready to render.
#[derive(Debug, Clone)]
pub struct Layout {
    pub size: UVec2,
    pub background: Color,
    pub instructions: Instructions,
    /// Symbols that could not be generated and were left off the card.
    pub omitted: Vec<SymbolError>,
}

impl Layout {
    fn new(theme: &CardTheme) -> Self {
        Self {
            size: theme.size(),
            background: theme.background,
            instructions: Instructions::new(),
            omitted: Vec::new(),
        }
    }

    /// Header band, separator band, logo, institution name and a tagline.
    fn header(&mut self, theme: &CardTheme, data: &CardData, assets: &CardAssets, tagline: &str) {
        let width = theme.width as i32;
        self.instructions
            .rectangle(ivec2(0, 0), ivec2(width, theme.header_height), theme.header)
            .rectangle(
                ivec2(0, theme.header_height),
                ivec2(width, theme.band_bottom()),
                theme.separator,
            )
            .image(Arc::clone(&assets.logo), ivec2(theme.padding, theme.logo_top))
            .text(
                ivec2(theme.header_text_x, theme.title_y),
                &data.institution.name,
                &theme.title_font,
                theme.header_text,
            )
            .text(
                ivec2(theme.header_text_x, theme.subtitle_y),
                tagline,
                &theme.subtitle_font,
                theme.header_text,
            );
    }

    /// Generates a symbol and queues it, fitted to `slot`, at `position`.
    ///
    /// A failing generator is logged and the symbol is left out.
    fn symbol(
        &mut self,
        generator: &dyn SymbolGenerator,
        payload: &str,
        slot: BoxSize,
        position: IVec2,
    ) {
        match generator.generate(payload) {
            Ok(symbol) => {
                let symbol = bitmap::scale_to_fit(&symbol, slot.width, slot.height);
                self.instructions.opaque_image(symbol, position);
            }
            Err(e) => {
                log::error!("Leaving {} off the card: {}", generator.symbology(), e);
                self.omitted.push(e);
            }
        }
    }
}
