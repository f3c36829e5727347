//! Container codec seam
//!
//! Decoding and encoding of the binary container itself (header, type reader
//! table, compression) happens outside this crate. Converters only need a
//! value tree in and a value tree out, so the container is reached through
//! [`ContainerCodec`].

use crate::error::{Result, XnbError};
use crate::value::{Value, parse, stringify};

/// Reads and writes a container file as a value tree
pub trait ContainerCodec {
    /// File extension of containers this codec handles, without the dot
    fn extension(&self) -> &str;

    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    fn encode(&self, value: &Value) -> Result<Vec<u8>>;
}

/// Container stored as compact tagged text
///
/// Useful as the far side of a conversion when no binary container codec is
/// plugged in, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContainer;

impl JsonContainer {
    pub const EXTENSION: &'static str = "xnbj";
}

impl ContainerCodec for JsonContainer {
    fn extension(&self) -> &str {
        Self::EXTENSION
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| XnbError::InvalidText(format!("container is not UTF-8: {e}")))?;
        parse(text)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(stringify(value, 0)?.into_bytes())
    }
}
