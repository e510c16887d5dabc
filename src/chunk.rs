//! The in-memory form of a PNG chunk.

use std::borrow::Cow;

use crate::chunk_crc::chunk_crc;
use crate::consts::*;
use crate::error::{ChunkType, Error, Result};

/// A single chunk in a PNG stream.  The length field is never stored: it
/// is always the length of `data`, which is checked to fit in 32 bits when
/// the chunk is built.
///
/// Chunks read from a stream borrow their data from it, and keep whatever
/// CRC the stream contained.  Chunks built with `Chunk::new` own their data
/// and always carry a correct CRC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    chunk_type: [u8; 4],
    data: Cow<'a, [u8]>,
    crc: u32,
}

impl<'a> Chunk<'a> {
    /// Build a new chunk, computing its CRC from `chunk_type` and `data`.
    pub fn new<D>(chunk_type: [u8; 4], data: D) -> Result<Self>
        where D: Into<Cow<'a, [u8]>>
    {
        let data = data.into();
        let crc = chunk_crc(&chunk_type, &data);
        Chunk::with_crc(chunk_type, data, crc)
    }

    /// Build a chunk with a CRC taken as-is.  No check is made that `crc`
    /// matches the data; see `verify_crc`.
    pub fn with_crc<D>(chunk_type: [u8; 4], data: D, crc: u32) -> Result<Self>
        where D: Into<Cow<'a, [u8]>>
    {
        let data = data.into();
        if u32::try_from(data.len()).is_err() {
            return Err(Error::ChunkTooLarge(data.len()));
        }
        Ok(Chunk { chunk_type: chunk_type, data: data, crc: crc })
    }

    /// The four-byte chunk type, such as `b"IHDR"`.
    pub fn chunk_type(&self) -> &[u8; 4] { &self.chunk_type }

    /// The chunk's payload.
    pub fn data(&self) -> &[u8] { &self.data }

    /// The CRC carried by this chunk.
    pub fn crc(&self) -> u32 { self.crc }

    /// The value of the chunk's length field.
    pub fn length(&self) -> u32 {
        // Cannot truncate: checked in `with_crc`.
        self.data.len() as u32
    }

    /// Is this chunk of type `chunk_type`?
    pub fn is_type(&self, chunk_type: &[u8; 4]) -> bool {
        &self.chunk_type == chunk_type
    }

    /// Is this the `IEND` chunk that ends a PNG stream?
    pub fn is_terminal(&self) -> bool {
        self.is_type(&IEND)
    }

    /// Check the stored CRC against the chunk's type and data.
    pub fn verify_crc(&self) -> Result<()> {
        let actual = chunk_crc(&self.chunk_type, &self.data);
        if self.crc == actual {
            Ok(())
        } else {
            Err(Error::BadCrc {
                chunk_type: ChunkType(self.chunk_type),
                expected: self.crc,
                actual: actual,
            })
        }
    }

    /// Take the payload, dropping the rest of the chunk.
    pub fn into_data(self) -> Cow<'a, [u8]> {
        self.data
    }

    /// Copy any borrowed data so the chunk no longer refers to its source.
    pub fn into_owned(self) -> Chunk<'static> {
        Chunk {
            chunk_type: self.chunk_type,
            data: Cow::Owned(self.data.into_owned()),
            crc: self.crc,
        }
    }
}

#[test]
fn new_chunk_has_valid_crc() {
    let chunk = Chunk::new(IEND, &b""[..]).unwrap();
    assert_eq!(0, chunk.length());
    assert_eq!(0xAE426082, chunk.crc());
    assert!(chunk.is_terminal());
    chunk.verify_crc().unwrap();
}

#[test]
fn length_follows_data() {
    let chunk = Chunk::new(EXIF, vec![0x4Du8, 0x4D, 0x00, 0x2A]).unwrap();
    assert_eq!(4, chunk.length());
    assert_eq!(&[0x4D, 0x4D, 0x00, 0x2A], chunk.data());
    assert!(chunk.is_type(b"eXIf"));
    assert!(!chunk.is_terminal());
}

#[test]
fn stale_crc_is_kept_but_detected() {
    let chunk = Chunk::with_crc(*b"tEXt", &b"a\0b"[..], 0xDEADBEEF).unwrap();
    assert_eq!(0xDEADBEEF, chunk.crc());
    match chunk.verify_crc() {
        Err(Error::BadCrc { chunk_type, expected, actual }) => {
            assert_eq!(ChunkType(*b"tEXt"), chunk_type);
            assert_eq!(0xDEADBEEF, expected);
            assert_eq!(chunk_crc(b"tEXt", b"a\0b"), actual);
        }
        other => panic!("expected BadCrc, got {:?}", other),
    }
}

#[test]
fn into_owned_keeps_every_field() {
    let source = vec![1u8, 2, 3];
    let borrowed = Chunk::with_crc(*b"zzZz", &source[..], 7).unwrap();
    let owned: Chunk<'static> = borrowed.clone().into_owned();
    assert_eq!(borrowed, owned);
}
