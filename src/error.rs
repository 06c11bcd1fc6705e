//! Errors that abort a render call.
//!
//! Font resolution and symbol generation failures are not listed here;
//! they are recovered where they happen (see [`crate::font::MissingFont`]
//! and [`crate::symbol::SymbolError`]).

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A logo, photo, signature or background could not be read or decoded.
    #[error("failed to load image asset '{path}'")]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The finished bitmap could not be encoded in the output format.
    #[error("failed to encode '{path}'")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output file could not be written.
    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read config file '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}
