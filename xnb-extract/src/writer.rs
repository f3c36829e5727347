//! Append-only byte buffer builder

/// Growable byte buffer written front to back.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for an output of roughly `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append bytes verbatim
    pub fn concat(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a little-endian `i32`
    pub fn write_i32_le(&mut self, n: i32) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    /// Append one byte per character, with no terminator or length prefix.
    ///
    /// Characters above U+00FF keep only their low byte.
    pub fn write_ascii(&mut self, text: &str) {
        self.buf.extend(text.chars().map(|c| c as u32 as u8));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
