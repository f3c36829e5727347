//! tBIN tilemap header transcoder
//!
//! Walks the header of a tBIN segment field by field, copying every byte to
//! the output in lock-step. The one field rewritten is each tileset's image
//! source. Everything after the last tileset's property block is opaque and
//! copied verbatim.
//!
//! # Header layout
//!
//! All integers are little-endian `i32`. A *string* is an `i32` byte length
//! followed by that many bytes.
//!
//! ```text
//! magic            6 bytes  "tBIN10"
//! map id           string
//! map description  string
//! map properties   properties
//! tileset count    i32
//! per tileset:
//!   id             string
//!   description    string
//!   image source   string   <- rewritten
//!   size/margin/spacing     32 bytes, opaque
//!   properties     properties
//! rest             opaque
//!
//! properties: i32 count, then per property
//!   key            string
//!   tag            u8       0 bool, 1 i32, 2 f32, 3 string
//!   value          1, 4, 4 bytes or string
//! ```


use crate::cursor::{ByteCursor, read_i32_le};
use crate::error::{Result, XnbError};
use crate::writer::ByteWriter;
use crate::{TBIN_MAGIC, TILESHEET_IMAGE_SUFFIX};

/// Size/margin/spacing block of a tileset (four 2×i32 pairs)
const TILESET_METRICS_SIZE: usize = 32;

/// Property value type tags
mod property_tag {
    pub const BOOL: u8 = 0;
    pub const INT: u8 = 1;
    pub const FLOAT: u8 = 2;
    pub const STRING: u8 = 3;
}

/// Structured view of a transcoded tilemap header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilemapHeader {
    /// Image source of each tileset as written to the output, in tileset order.
    ///
    /// Sources are decoded as UTF-8; a source that is not valid UTF-8 is
    /// kept one char per byte. The segment bytes are unaffected either way.
    pub tile_sheet_image_names: Vec<String>,
    /// Bytes following the last tileset's property block, never parsed
    pub trailing: Vec<u8>,
}

/// Output of a transcoding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedTilemap {
    /// The complete rewritten segment
    pub bytes: Vec<u8>,
    pub header: TilemapHeader,
}

/// Whether `bytes` starts with the tBIN magic
pub fn is_tilemap(bytes: &[u8]) -> bool {
    bytes.starts_with(TBIN_MAGIC)
}

/// Rewrite a segment for editing: every tileset image source gains `.png`.
pub fn transcode_tilemap(segment: &[u8]) -> Result<TranscodedTilemap> {
    Transcoder::new(segment).run(|source| format!("{source}{TILESHEET_IMAGE_SUFFIX}"))
}

/// Undo [`transcode_tilemap`]: strip `.png` from image sources that carry it.
pub fn restore_tilemap(segment: &[u8]) -> Result<TranscodedTilemap> {
    Transcoder::new(segment).run(|source| {
        source
            .strip_suffix(TILESHEET_IMAGE_SUFFIX)
            .unwrap_or(source)
            .to_string()
    })
}

/// Reinterpret a one-char-per-byte string as UTF-8 when its bytes allow it
fn display_name(latin1: String) -> String {
    let bytes: Vec<u8> = latin1.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).unwrap_or(latin1)
}

struct Transcoder<'a> {
    cursor: ByteCursor<'a>,
    out: ByteWriter,
}

impl<'a> Transcoder<'a> {
    fn new(segment: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(segment),
            out: ByteWriter::with_capacity(segment.len() + 64),
        }
    }

    fn run(mut self, rewrite: impl Fn(&str) -> String) -> Result<TranscodedTilemap> {
        self.copy(TBIN_MAGIC.len())?;

        // Map id, description, properties
        self.copy_string()?;
        self.copy_string()?;
        self.copy_properties()?;

        let tileset_count = self.copy_len()?;
        let mut names = Vec::with_capacity(tileset_count.min(256));
        for _ in 0..tileset_count {
            // Tileset id, description
            self.copy_string()?;
            self.copy_string()?;
            names.push(self.rewrite_string(&rewrite)?);
            self.copy(TILESET_METRICS_SIZE)?;
            self.copy_properties()?;
        }

        let trailing = self.cursor.consume_rest();
        self.out.concat(trailing);

        Ok(TranscodedTilemap {
            bytes: self.out.into_bytes(),
            header: TilemapHeader {
                tile_sheet_image_names: names,
                trailing: trailing.to_vec(),
            },
        })
    }

    fn copy(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.cursor.consume(n)?;
        self.out.concat(bytes);
        Ok(bytes)
    }

    fn read_len(&mut self, write: bool) -> Result<usize> {
        let offset = self.cursor.position();
        let raw = self.cursor.consume_array::<4>()?;
        if write {
            self.out.concat(raw);
        }
        let len = read_i32_le(raw);
        usize::try_from(len).map_err(|_| XnbError::NegativeLength { offset, len })
    }

    /// Copy an `i32` length or count unchanged and return it
    fn copy_len(&mut self) -> Result<usize> {
        self.read_len(true)
    }

    fn copy_string(&mut self) -> Result<()> {
        let len = self.copy_len()?;
        self.copy(len)?;
        Ok(())
    }

    /// Replace a length-prefixed string, writing the new length
    fn rewrite_string(&mut self, rewrite: impl Fn(&str) -> String) -> Result<String> {
        let len = self.read_len(false)?;
        let raw = self.cursor.consume(len)?;
        // One char per byte so write_ascii reproduces the input exactly
        let source: String = raw.iter().map(|&b| char::from(b)).collect();
        let rewritten = rewrite(&source);
        self.out.write_i32_le(rewritten.chars().count() as i32);
        self.out.write_ascii(&rewritten);
        Ok(display_name(rewritten))
    }

    fn copy_properties(&mut self) -> Result<()> {
        let count = self.copy_len()?;
        for _ in 0..count {
            self.copy_string()?;
            let offset = self.cursor.position();
            let tag = self.copy(1)?[0];
            match tag {
                property_tag::BOOL => {
                    self.copy(1)?;
                }
                property_tag::INT | property_tag::FLOAT => {
                    self.copy(4)?;
                }
                property_tag::STRING => self.copy_string()?,
                tag => return Err(XnbError::UnknownPropertyTag { offset, tag }),
            }
        }
        Ok(())
    }
}
