//! Issuing cards: assets in, two bitmaps out.

use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use image::{RgbImage, RgbaImage};

use crate::{
    bitmap,
    canvas::composite_background,
    config::{CardConfig, FontConfig, SideConfig},
    error::Result,
    font::Fonts,
    layout::{self, CardAssets, Layout},
    symbol::{SymbolError, Symbols},
    Canvas, Renderer,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Front => f.write_str("front"),
            Side::Back => f.write_str("back"),
        }
    }
}

/// A rendered side, with the symbols that had to be left off.
pub struct RenderedSide {
    pub bitmap: RgbImage,
    pub omitted: Vec<SymbolError>,
}

/// The files written by [`CardPress::issue`].
#[derive(Debug)]
pub struct Issued {
    pub front: PathBuf,
    pub back: PathBuf,
    pub omitted: Vec<SymbolError>,
}

/// Renders both sides of a card from a [`CardConfig`].
pub struct CardPress {
    config: CardConfig,
    renderer: Renderer,
    symbols: Symbols,
}

impl CardPress {
    pub fn new(config: CardConfig) -> Self {
        let mut renderer = Renderer::new(load_fonts(&config.fonts));
        let label_font = renderer.resolve_font(&config.theme.barcode_label_font);
        Self {
            config,
            renderer,
            symbols: Symbols::standard(label_font),
        }
    }

    /// Uses custom symbol generators instead of the standard ones.
    pub fn with_symbols(config: CardConfig, symbols: Symbols) -> Self {
        Self {
            renderer: Renderer::new(load_fonts(&config.fonts)),
            config,
            symbols,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn load_assets(&self) -> Result<CardAssets> {
        CardAssets::load(&self.config.assets, &self.config.theme)
    }

    pub fn layout(&self, side: Side, assets: &CardAssets) -> Layout {
        let config = &self.config;
        match side {
            Side::Front => layout::front(&config.card, assets, &config.theme),
            Side::Back => layout::back(&config.card, assets, &config.theme, &self.symbols),
        }
    }

    fn side_config(&self, side: Side) -> &SideConfig {
        match side {
            Side::Front => &self.config.front,
            Side::Back => &self.config.back,
        }
    }

    /// Lays out, backs and paints one side.
    ///
    /// A configured background that cannot be loaded is fatal.
    pub fn render_side(&mut self, side: Side, assets: &CardAssets) -> Result<RenderedSide> {
        let layout = self.layout(side, assets);
        let side_config = self.side_config(side);
        let alpha = side_config.alpha();
        let background: Option<RgbaImage> = side_config
            .background
            .as_deref()
            .map(bitmap::load_image)
            .transpose()?;

        let canvas = Canvas::new(layout.size.x, layout.size.y, layout.background)?;
        let canvas = composite_background(canvas, background.as_ref(), alpha);

        log::debug!(
            "Rendering {} side ({} instructions)",
            side,
            layout.instructions.len()
        );
        let bitmap = self.renderer.render(canvas, &layout.instructions);
        Ok(RenderedSide {
            bitmap,
            omitted: layout.omitted,
        })
    }

    /// Renders and writes the front, then the back.
    pub fn issue(&mut self) -> Result<Issued> {
        let assets = self.load_assets()?;
        let mut omitted = Vec::new();
        let front = self.write_side(Side::Front, &assets, &mut omitted)?;
        let back = self.write_side(Side::Back, &assets, &mut omitted)?;
        Ok(Issued {
            front,
            back,
            omitted,
        })
    }

    fn write_side(
        &mut self,
        side: Side,
        assets: &CardAssets,
        omitted: &mut Vec<SymbolError>,
    ) -> Result<PathBuf> {
        let rendered = self.render_side(side, assets)?;
        let output = self.side_config(side).output.clone();
        bitmap::save(&rendered.bitmap, &output)?;
        log::info!("ID card {} saved at: {}", side, output.display());
        omitted.extend(rendered.omitted);
        Ok(output)
    }
}

fn load_fonts(config: &FontConfig) -> Fonts {
    let mut fonts = Fonts::new();
    for file in &config.files {
        if let Err(e) = fonts.load_font_file(file) {
            log::warn!("Failed to load font file '{}': {}", file.display(), e);
        }
    }
    for dir in &config.dirs {
        fonts.load_fonts_dir(dir);
    }
    if config.system {
        fonts.load_system_fonts();
    }
    if let Some(family) = &config.sans_serif_family {
        fonts.set_sans_serif_family(family.as_str());
    }
    fonts
}
