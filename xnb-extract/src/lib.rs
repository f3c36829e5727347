//! xnb-extract: editable text + sidecar files for decoded XNB content
//!
//! This crate turns a decoded XNB content tree into an indented, type-tagged
//! text document and back. Two kinds of binary payload are factored out of the
//! text into standalone sidecar files so they can be edited with ordinary tools:
//!
//! - **Textures**: every `Texture2D` node loses its `data`/`width`/`height`
//!   fields, which are written to a PNG next to the text document.
//! - **Tilemaps**: a tBIN segment (magic `tBIN10`) is moved into a `.tbin`
//!   sidecar. Its header is transcoded so tileset image sources point at the
//!   `.png` files an editor expects; every other byte passes through untouched.
//!
//! The reverse direction reads the sidecars and reinjects the payloads at the
//! paths recorded in the text.
//!
//! # Usage
//!
//! ```ignore
//! use xnb_extract::{convert, ConvertOptions, JsonContainer, PngCodec};
//!
//! let opts = ConvertOptions::default();
//! convert::unpack_file("Maps/Farm.xnbj".as_ref(), "out/Farm.json".as_ref(), &JsonContainer, &PngCodec, &opts)?;
//! convert::pack_file("out/Farm.json".as_ref(), "Maps/Farm.xnbj".as_ref(), &JsonContainer, &PngCodec, &opts)?;
//! ```

pub mod codec;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod document;
pub mod error;
pub mod extract;
pub mod inject;
pub mod path;
pub mod sidecar;
pub mod tbin;
pub mod value;
pub mod writer;

pub use codec::{ContainerCodec, JsonContainer};
pub use config::ConvertOptions;
pub use cursor::{ByteCursor, read_i32_le};
pub use document::{Document, ImagePlaceholder};
pub use error::{Result, XnbError};
pub use extract::extract_assets;
pub use inject::reinject_assets;
pub use path::{AssetPath, PathStep};
pub use sidecar::{ImageCodec, PngCodec, RawImage, Sidecar, SidecarDir, SidecarKey, SidecarSource};
pub use tbin::{TilemapHeader, TranscodedTilemap, is_tilemap, restore_tilemap, transcode_tilemap};
pub use value::{Fields, TypeTag, Value, is_tagged};
pub use writer::ByteWriter;

// =============================================================================
// Constants
// =============================================================================

/// tBIN tilemap segment magic
pub const TBIN_MAGIC: &[u8; 6] = b"tBIN10";

/// Suffix appended to every tileset image source in an extracted tilemap
pub const TILESHEET_IMAGE_SUFFIX: &str = ".png";

/// Field holding the embedded payload of a content node
pub const DATA_FIELD: &str = "data";

/// Field that replaces an extracted tilemap segment in the tree
pub const TILESHEET_NAMES_FIELD: &str = "tileSheetImageNames";

/// Texture payload fields moved into image sidecars
pub const WIDTH_FIELD: &str = "width";
pub const HEIGHT_FIELD: &str = "height";

/// Extension of the tilemap sidecar
pub const TBIN_EXT: &str = "tbin";

/// Extension of image sidecars
pub const PNG_EXT: &str = "png";

/// Default extension of the text document
pub const TEXT_EXT: &str = "json";
