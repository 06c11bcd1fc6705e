//! Font queries and resolution.
//!
//! Fonts are looked up through `fontdb` and rasterized by `fontdue`.
//! Resolution never fails: a query with no matching face falls back to the
//! generic sans-serif family, then to a built-in bitmap face.

use std::{io, path::Path, sync::Arc};

use ahash::AHashMap;
use fontdb::{Database, Family, Stretch, Style, ID};
use serde::{Deserialize, Serialize};

/// A font weight, indicating how dark it appears.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl From<Weight> for fontdb::Weight {
    fn from(w: Weight) -> Self {
        use fontdb::Weight as W;
        match w {
            Weight::Thin => W::THIN,
            Weight::ExtraLight => W::EXTRA_LIGHT,
            Weight::Light => W::LIGHT,
            Weight::Normal => W::NORMAL,
            Weight::Medium => W::MEDIUM,
            Weight::SemiBold => W::SEMIBOLD,
            Weight::Bold => W::BOLD,
            Weight::ExtraBold => W::EXTRA_BOLD,
            Weight::Black => W::BLACK,
        }
    }
}

/// Identifies the font a piece of text is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRef {
    pub family: String,
    /// Pixel size (em height).
    pub size: f32,
    #[serde(default)]
    pub weight: Weight,
}

impl FontRef {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: Weight::Normal,
        }
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn bold(self) -> Self {
        self.weight(Weight::Bold)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to parse font data: {0}")]
pub struct MalformedFont(&'static str);

#[derive(Debug, thiserror::Error)]
#[error("no font satisfied the query {0:?}")]
pub struct MissingFont(FontRef);

/// Where glyphs come from.
#[derive(Clone)]
pub enum Face {
    Outline(Arc<fontdue::Font>),
    /// The 8x8 bitmap face compiled into the crate.
    Builtin,
}

/// A face paired with the size it is drawn at.
#[derive(Clone)]
pub struct ResolvedFont {
    face: Face,
    size: f32,
}

impl ResolvedFont {
    pub fn outline(font: Arc<fontdue::Font>, size: f32) -> Self {
        Self {
            face: Face::Outline(font),
            size,
        }
    }

    pub fn builtin(size: f32) -> Self {
        Self {
            face: Face::Builtin,
            size,
        }
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Face::Builtin)
    }
}

/// The fonts available to a renderer.
#[derive(Default)]
pub struct Fonts {
    db: Database,
    faces: AHashMap<ID, Arc<fontdue::Font>>,
}

impl Fonts {
    /// Creates an empty store. Every query resolves to the built-in face
    /// until fonts are loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_fonts() -> Self {
        let mut fonts = Self::new();
        fonts.load_system_fonts();
        fonts
    }

    pub fn load_system_fonts(&mut self) {
        self.db.load_system_fonts();
        log::debug!("{} system font faces available", self.db.len());
    }

    pub fn load_font_file(&mut self, path: &Path) -> io::Result<()> {
        self.db.load_font_file(path)
    }

    pub fn load_fonts_dir(&mut self, dir: &Path) {
        self.db.load_fonts_dir(dir);
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Sets the family used when a query's own family is missing.
    pub fn set_sans_serif_family(&mut self, family: impl Into<String>) {
        self.db.set_sans_serif_family(family);
    }

    /// Finds the face closest to `font`, trying the generic sans-serif
    /// family after the requested one.
    pub fn query(&self, font: &FontRef) -> Result<ID, MissingFont> {
        let families = [Family::Name(&font.family), Family::SansSerif];
        let query = fontdb::Query {
            families: &families,
            weight: font.weight.into(),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        self.db.query(&query).ok_or_else(|| MissingFont(font.clone()))
    }

    fn face(&mut self, id: ID) -> Result<Arc<fontdue::Font>, MalformedFont> {
        if let Some(face) = self.faces.get(&id) {
            return Ok(Arc::clone(face));
        }

        let face = self
            .db
            .with_face_data(id, |data, index| {
                fontdue::Font::from_bytes(
                    data,
                    fontdue::FontSettings {
                        collection_index: index,
                        ..Default::default()
                    },
                )
            })
            .ok_or(MalformedFont("face data unavailable"))?
            .map_err(MalformedFont)?;

        let name = self
            .db
            .face(id)
            .and_then(|info| info.families.first())
            .map(|(family, _)| family.as_str())
            .unwrap_or("<unnamed>");
        log::info!("Loaded font '{}'", name);

        let face = Arc::new(face);
        self.faces.insert(id, Arc::clone(&face));
        Ok(face)
    }

    /// Resolves a font reference to something that can draw glyphs.
    ///
    /// Failures are logged and degrade to the built-in face.
    pub fn resolve(&mut self, font: &FontRef) -> ResolvedFont {
        let face = self
            .query(font)
            .map_err(|e| e.to_string())
            .and_then(|id| self.face(id).map_err(|e| e.to_string()));

        match face {
            Ok(face) => ResolvedFont::outline(face, font.size),
            Err(e) => {
                log::warn!("{}; falling back to the built-in face", e);
                ResolvedFont::builtin(font.size)
            }
        }
    }
}
