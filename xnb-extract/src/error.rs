//! Error types for conversion jobs

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the conversion of a single file
#[derive(Debug, Error)]
pub enum XnbError {
    /// The byte cursor was asked for more bytes than remain
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// A length prefix decoded to a negative value
    #[error("negative length {len} at offset {offset:#x}")]
    NegativeLength { offset: usize, len: i32 },

    /// A tBIN property carried a type tag outside 0..=3
    #[error("unknown property tag {tag} at offset {offset:#x}")]
    UnknownPropertyTag { offset: usize, tag: u8 },

    /// A recorded asset path does not address a node of the loaded tree
    #[error("asset path '{path}' does not resolve against the document")]
    PathResolution { path: String },

    /// A `Texture2D` payload is missing one of the fields moved to a sidecar
    #[error("texture at '{path}': {reason}")]
    MalformedTexture { path: String, reason: String },

    /// The pixel buffer does not hold width × height RGBA pixels
    #[error("pixel buffer for {width}x{height} image is {len} bytes (expected {expected})")]
    PixelBufferSize {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },

    /// The text is valid JSON but not a valid document
    #[error("invalid document text: {0}")]
    InvalidText(String),

    /// A sidecar referenced by the document does not exist
    #[error("missing sidecar {}", path.display())]
    MissingSidecar { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl XnbError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, XnbError>;
