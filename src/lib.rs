//! A software renderer for identification cards.
//!
//! A card side is described as an ordered list of [`DrawInstruction`]s
//! (rectangles, images, text and lines) that a [`Renderer`] paints onto a
//! [`Canvas`]. The [`layout`] module turns a [`CardData`] record into the
//! instructions for the front and back, and [`CardPress`] ties layouts,
//! backgrounds and output files together.

pub mod bitmap;
pub mod canvas;
pub mod card;
mod color;
pub mod config;
mod error;
pub mod font;
pub mod instruction;
pub mod layout;
mod renderer;
pub mod symbol;
pub mod text;

pub use bitmap::resize_keeping_aspect;
pub use canvas::{composite_background, Canvas};
pub use card::{CardPress, Issued, Side};
pub use color::{Color, InvalidColor};
pub use config::CardConfig;
pub use error::{Error, Result};
pub use font::{FontRef, Fonts, Weight};
pub use instruction::{DrawInstruction, Instructions};
pub use layout::{CardData, CardTheme, Layout};
pub use renderer::Renderer;
pub use symbol::{SymbolError, SymbolGenerator};
