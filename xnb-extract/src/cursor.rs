//! Sequential read head over an immutable byte slice

use crate::error::{Result, XnbError};

/// Read cursor over a byte slice.
///
/// `consume` and `consume_array` are the only ways to advance. Fixed-width
/// integers are decoded from the array `consume_array` returns with
/// [`read_i32_le`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Return the next `n` bytes and advance past them.
    pub fn consume(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(XnbError::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Return the next `N` bytes as an array and advance past them.
    pub fn consume_array<const N: usize>(&mut self) -> Result<&'a [u8; N]> {
        let eof = XnbError::UnexpectedEof {
            offset: self.pos,
            need: N,
            have: self.remaining(),
        };
        let (head, _) = self.data[self.pos..].split_first_chunk::<N>().ok_or(eof)?;
        self.pos += N;
        Ok(head)
    }

    /// Consume everything up to the end of the data.
    pub fn consume_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}

/// Decode a little-endian `i32`
pub fn read_i32_le(bytes: &[u8; 4]) -> i32 {
    i32::from_le_bytes(*bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_advances() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.consume(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.consume(3).unwrap(), &[3, 4, 5]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.consume(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_consume_past_end() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.consume(1).unwrap();

        let err = cursor.consume(3).unwrap_err();
        assert!(matches!(
            err,
            XnbError::UnexpectedEof {
                offset: 1,
                need: 3,
                have: 2
            }
        ));
        // A failed read leaves the offset where it was
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.consume(2).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_bounds_for_every_split() {
        let data: Vec<u8> = (0..8).collect();
        for offset in 0..=data.len() {
            for n in 0..=data.len() + 1 {
                let mut cursor = ByteCursor::new(&data);
                cursor.consume(offset).unwrap();
                let result = cursor.consume(n);
                if n <= data.len() - offset {
                    assert_eq!(result.unwrap(), &data[offset..offset + n]);
                    assert_eq!(cursor.position(), offset + n);
                } else {
                    assert!(matches!(result, Err(XnbError::UnexpectedEof { .. })));
                }
            }
        }
    }

    #[test]
    fn test_read_i32_le() {
        assert_eq!(read_i32_le(&[0x09, 0, 0, 0]), 9);
        assert_eq!(read_i32_le(&[0xFF, 0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(read_i32_le(&[0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
    }

    #[test]
    fn test_consume_array() {
        let data = [0x09u8, 0, 0, 0, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(read_i32_le(cursor.consume_array().unwrap()), 9);
        assert_eq!(cursor.position(), 4);

        let err = cursor.consume_array::<4>().unwrap_err();
        assert!(matches!(
            err,
            XnbError::UnexpectedEof {
                offset: 4,
                need: 4,
                have: 1
            }
        ));
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.consume_array::<1>().unwrap(), &[0xFF]);
    }

    #[test]
    fn test_consume_rest() {
        let data = [9u8, 8, 7];
        let mut cursor = ByteCursor::new(&data);
        cursor.consume(1).unwrap();
        assert_eq!(cursor.consume_rest(), &[8, 7]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.consume_rest(), &[] as &[u8]);
    }
}
