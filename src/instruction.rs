use std::{slice, sync::Arc};

use glam::IVec2;
use image::RgbaImage;

use crate::{font::FontRef, Color};

/// One atomic paint operation.
///
/// A render pass consumes an ordered sequence of instructions; later
/// instructions paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    /// Fills the rectangle spanned by two inclusive corners.
    Rectangle {
        top_left: IVec2,
        bottom_right: IVec2,
        fill: Color,
    },
    /// Pastes a bitmap with its top-left corner at `position`.
    ///
    /// With `own_alpha` the bitmap's alpha channel masks the paste;
    /// otherwise the bitmap replaces what is underneath.
    Image {
        bitmap: Arc<RgbaImage>,
        position: IVec2,
        own_alpha: bool,
    },
    /// Draws a single line of text with its top-left corner at `position`.
    Text {
        position: IVec2,
        text: String,
        font: FontRef,
        color: Color,
    },
    /// Strokes a straight line.
    Line {
        start: IVec2,
        end: IVec2,
        color: Color,
        width: u32,
    },
}

impl DrawInstruction {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawInstruction::Rectangle { .. } => "rectangle",
            DrawInstruction::Image { .. } => "image",
            DrawInstruction::Text { .. } => "text",
            DrawInstruction::Line { .. } => "line",
        }
    }
}

/// A buffer of `DrawInstruction`s, built up in paint order.
#[derive(Debug, Clone, Default)]
pub struct Instructions {
    instructions: Vec<DrawInstruction>,
}

impl Instructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: DrawInstruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn rectangle(&mut self, top_left: IVec2, bottom_right: IVec2, fill: Color) -> &mut Self {
        self.push(DrawInstruction::Rectangle {
            top_left,
            bottom_right,
            fill,
        })
    }

    /// Queues a paste masked by the bitmap's own alpha.
    pub fn image(&mut self, bitmap: impl Into<Arc<RgbaImage>>, position: IVec2) -> &mut Self {
        self.push(DrawInstruction::Image {
            bitmap: bitmap.into(),
            position,
            own_alpha: true,
        })
    }

    /// Queues a paste that replaces the pixels underneath.
    pub fn opaque_image(
        &mut self,
        bitmap: impl Into<Arc<RgbaImage>>,
        position: IVec2,
    ) -> &mut Self {
        self.push(DrawInstruction::Image {
            bitmap: bitmap.into(),
            position,
            own_alpha: false,
        })
    }

    pub fn text(
        &mut self,
        position: IVec2,
        text: impl Into<String>,
        font: &FontRef,
        color: Color,
    ) -> &mut Self {
        self.push(DrawInstruction::Text {
            position,
            text: text.into(),
            font: font.clone(),
            color,
        })
    }

    pub fn line(&mut self, start: IVec2, end: IVec2, color: Color, width: u32) -> &mut Self {
        self.push(DrawInstruction::Line {
            start,
            end,
            color,
            width,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<DrawInstruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    pub fn into_vec(self) -> Vec<DrawInstruction> {
        self.instructions
    }
}

impl<'a> IntoIterator for &'a Instructions {
    type Item = &'a DrawInstruction;
    type IntoIter = slice::Iter<'a, DrawInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
