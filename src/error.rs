//! Errors returned while reading or editing a PNG chunk stream.

use std::fmt;
use std::result;
use thiserror::Error;

/// A four-byte chunk type, printed as text when it is printable ASCII.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ChunkType(pub [u8; 4]);

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            for &b in &self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{:02x}{:02x}{:02x}{:02x}",
                   self.0[0], self.0[1], self.0[2], self.0[3])
        }
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// Errors that can occur when splitting, editing or merging PNG chunks.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not start with the PNG signature.
    #[error("Not a PNG stream (missing or invalid signature)")]
    Format,

    /// A chunk's declared length runs past the end of the stream.
    #[error("Truncated PNG chunk at offset {offset} (needs {needed} bytes, {available} available)")]
    TruncatedChunk {
        /// Offset of the chunk's length field.
        offset: usize,
        /// Bytes the chunk claims to occupy, header and CRC included.
        needed: u64,
        /// Bytes left in the stream from `offset`.
        available: usize,
    },

    /// There is no `IEND` chunk to insert a new chunk in front of.
    #[error("PNG stream has no IEND chunk")]
    MissingTerminal,

    /// A chunk's data is too long to describe with a 32-bit length.
    #[error("PNG chunk data of {0} bytes does not fit a 32-bit length")]
    ChunkTooLarge(usize),

    /// A chunk's stored CRC does not match its contents.
    #[error("Invalid PNG CRC in {chunk_type} chunk (expected {expected:08x}, got {actual:08x})")]
    BadCrc {
        /// The type of the offending chunk.
        chunk_type: ChunkType,
        /// The CRC stored in the stream.
        expected: u32,
        /// The CRC computed over the chunk's type and data.
        actual: u32,
    },
}

/// Result type used throughout this crate.
pub type Result<T> = result::Result<T, Error>;

#[test]
fn chunk_type_display() {
    assert_eq!("eXIf", ChunkType(*b"eXIf").to_string());
    assert_eq!("00ff0a41", ChunkType([0x00, 0xFF, 0x0A, 0x41]).to_string());
}

#[test]
fn error_messages() {
    let err = Error::BadCrc {
        chunk_type: ChunkType(*b"IEND"),
        expected: 0x12345678,
        actual: 0xAE426082,
    };
    assert_eq!("Invalid PNG CRC in IEND chunk (expected 12345678, got ae426082)",
               err.to_string());

    let err = Error::TruncatedChunk { offset: 8, needed: 112, available: 12 };
    assert_eq!("Truncated PNG chunk at offset 8 (needs 112 bytes, 12 available)",
               err.to_string());
}
