//! The JSON configuration for a card run.
//!
//! Every field has a default, so an empty object (or no file at all)
//! produces the reference card.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    layout::{CardData, CardTheme},
};

/// Where the logo, photo and signature are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub logo: PathBuf,
    pub photo: PathBuf,
    pub signature: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            logo: "logo.png".into(),
            photo: "photo.png".into(),
            signature: "signature.png".into(),
        }
    }
}

/// Background and output settings for one side of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideConfig {
    /// Stretched over the whole side. `None` leaves the plain background.
    #[serde(default)]
    pub background: Option<PathBuf>,
    /// Background opacity in percent.
    #[serde(default = "SideConfig::default_opacity")]
    pub opacity: f32,
    pub output: PathBuf,
}

impl SideConfig {
    fn default_opacity() -> f32 {
        50.0
    }

    fn front() -> Self {
        Self {
            background: Some("front_bg.png".into()),
            opacity: 50.0 * 100.0 / 255.0,
            output: "ID_front.png".into(),
        }
    }

    fn back() -> Self {
        Self {
            background: Some("back_bg.png".into()),
            opacity: 100.0 * 100.0 / 255.0,
            output: "ID_back.png".into(),
        }
    }

    /// The background opacity as an 8-bit alpha.
    pub fn alpha(&self) -> u8 {
        let opacity = if self.opacity.is_nan() {
            0.0
        } else {
            self.opacity.clamp(0.0, 100.0)
        };
        (opacity * 255.0 / 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font files registered before anything else.
    pub files: Vec<PathBuf>,
    /// Directories scanned for fonts.
    pub dirs: Vec<PathBuf>,
    /// Whether to consult the fonts installed on the system.
    pub system: bool,
    /// Family used when a requested family is not installed.
    pub sans_serif_family: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            dirs: Vec::new(),
            system: true,
            sans_serif_family: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub card: CardData,
    pub assets: AssetPaths,
    pub front: SideConfig,
    pub back: SideConfig,
    pub fonts: FontConfig,
    pub theme: CardTheme,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            card: CardData::default(),
            assets: AssetPaths::default(),
            front: SideConfig::front(),
            back: SideConfig::back(),
            fonts: FontConfig::default(),
            theme: CardTheme::default(),
        }
    }
}

impl CardConfig {
    /// Reads a config file. Relative paths inside it are taken relative to
    /// the directory containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_owned(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        log::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Joins every relative path onto `base`.
    pub fn rebase(&mut self, base: &Path) {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        join(&mut self.assets.logo);
        join(&mut self.assets.photo);
        join(&mut self.assets.signature);
        for side in [&mut self.front, &mut self.back] {
            if let Some(background) = &mut side.background {
                join(background);
            }
            join(&mut side.output);
        }
        self.fonts.files.iter_mut().for_each(join);
        self.fonts.dirs.iter_mut().for_each(join);
    }
}
