//! Splitting a PNG stream into chunks.

use crate::chunk::Chunk;
use crate::consts::*;
use crate::error::{Error, Result};

/// Check that `bytes` starts with the PNG signature.
pub fn check_signature(bytes: &[u8]) -> Result<()> {
    if bytes.len() >= SIGNATURE.len() && bytes[..SIGNATURE.len()] == SIGNATURE {
        Ok(())
    } else {
        Err(Error::Format)
    }
}

/// Read a big-endian `u32` from the first four bytes of `bytes`.
fn be_u32(bytes: &[u8]) -> u32 {
    let mut word = [0; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_be_bytes(word)
}

/// Reads chunks one at a time from an in-memory PNG stream.  Chunk data
/// is borrowed from the stream, not copied.
pub struct ChunkReader<'a> {
    source: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkReader<'a> {
    /// Check the signature of `source` and position the reader at its
    /// first chunk.
    pub fn new(source: &'a [u8]) -> Result<Self> {
        check_signature(source)?;
        Ok(ChunkReader{source: source, pos: SIGNATURE.len(), done: false})
    }

    /// The offset of the next unread byte.
    pub fn offset(&self) -> usize { self.pos }

    fn remaining(&self) -> usize { self.source.len() - self.pos }

    /// Read in the next chunk.  Returns `Ok(None)` after the `IEND` chunk,
    /// or when fewer bytes remain than a chunk header needs.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'a>>> {
        if self.done {
            return Ok(None);
        }
        if self.remaining() < HEADER_SIZE {
            self.done = true;
            if self.remaining() > 0 {
                debug!("Ignoring {} bytes too short for a PNG chunk header",
                       self.remaining());
            }
            warn!("PNG stream ended without an IEND chunk");
            return Ok(None);
        }

        let start = self.pos;
        let header = &self.source[start..start + HEADER_SIZE];
        let length = be_u32(&header[..LENGTH_SIZE]);
        let mut chunk_type = [0; TYPE_SIZE];
        chunk_type.copy_from_slice(&header[LENGTH_SIZE..]);

        // Done in u64 so a length near u32::MAX cannot wrap on 32-bit
        // targets.
        let needed = HEADER_SIZE as u64 + length as u64 + CRC_SIZE as u64;
        if needed > self.remaining() as u64 {
            self.done = true;
            return Err(Error::TruncatedChunk {
                offset: start,
                needed: needed,
                available: self.remaining(),
            });
        }

        let data_start = start + HEADER_SIZE;
        let data_end = data_start + length as usize;
        let data = &self.source[data_start..data_end];
        let crc = be_u32(&self.source[data_end..data_end + CRC_SIZE]);
        self.pos = data_end + CRC_SIZE;

        let chunk = Chunk::with_crc(chunk_type, data, crc)?;
        trace!("Read PNG chunk {:?} of {} bytes at offset {}",
               String::from_utf8_lossy(&chunk_type), length, start);

        if chunk.is_terminal() {
            self.done = true;
            if self.remaining() > 0 {
                debug!("Ignoring {} bytes after IEND chunk", self.remaining());
            }
        }
        Ok(Some(chunk))
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Split a PNG stream into its chunks, up to and including `IEND`.  CRCs
/// are copied as-is and not checked.
pub fn split(bytes: &[u8]) -> Result<Vec<Chunk<'_>>> {
    ChunkReader::new(bytes)?.collect()
}

/// Like `split`, but fail if any chunk's CRC does not match its contents.
pub fn split_verified(bytes: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let chunks = split(bytes)?;
    for chunk in &chunks {
        if let Err(err) = chunk.verify_crc() {
            warn!("{}", err);
            return Err(err);
        }
    }
    Ok(chunks)
}

#[test]
fn signature_only() {
    use crate::test_helpers::*;

    assert!(split(&png_with(&[])).unwrap().is_empty());
}

#[test]
fn rejects_bad_signatures() {
    let mut not_png = SIGNATURE.to_vec();
    not_png[1] = b'p';
    for bytes in &[&b""[..], &SIGNATURE[..7], &not_png[..], &b"GIF89a\0\0\0\0"[..]] {
        match split(bytes) {
            Err(Error::Format) => {}
            other => panic!("expected Format error, got {:?}", other),
        }
    }
}

#[test]
fn lengths_are_big_endian() {
    assert_eq!(0x0102_0304, be_u32(&[0x01, 0x02, 0x03, 0x04, 0xFF]));
    assert_eq!(0xFFFF_FFFF, be_u32(&[0xFF; 4]));
}

#[test]
fn iend_only() {
    let mut bytes = SIGNATURE.to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 0, b'I', b'E', b'N', b'D',
                              0xAE, 0x42, 0x60, 0x82]);
    let chunks = split(&bytes).unwrap();
    assert_eq!(1, chunks.len());
    assert_eq!(b"IEND", chunks[0].chunk_type());
    assert_eq!(0, chunks[0].length());
    assert_eq!(0xAE426082, chunks[0].crc());
}

#[test]
fn splits_in_stream_order() {
    use crate::test_helpers::*;

    let png = minimal_png();
    let chunks = split(&png).unwrap();
    let types: Vec<&[u8; 4]> = chunks.iter().map(|c| c.chunk_type()).collect();
    assert_eq!(vec![b"IHDR", b"IDAT", b"IEND"], types);
    assert_eq!(13, chunks[0].length());
    assert_eq!(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0], chunks[0].data());
}

#[test]
fn stops_after_iend() {
    use crate::test_helpers::*;

    let mut bytes = minimal_png();
    bytes.extend(raw_chunk(b"tEXt", b"after\0the end"));
    bytes.extend_from_slice(b"junk");
    let chunks = split(&bytes).unwrap();
    assert_eq!(3, chunks.len());
    assert!(chunks[2].is_terminal());
}

#[test]
fn missing_iend_returns_what_was_read() {
    use crate::test_helpers::*;

    let mut bytes = png_with(&[(b"IHDR", &[0; 13]), (b"IDAT", &[1, 2, 3])]);
    // A few stray bytes, too short for another chunk header.
    bytes.extend_from_slice(&[0, 0, 0]);
    let chunks = split(&bytes).unwrap();
    assert_eq!(2, chunks.len());
    assert!(!chunks.iter().any(|c| c.is_terminal()));
}

#[test]
fn truncated_chunks_are_errors() {
    use crate::test_helpers::*;

    let full = minimal_png();
    let ihdr = SIGNATURE.len();
    let idat = ihdr + HEADER_SIZE + 13 + CRC_SIZE;
    // Every cut inside the IDAT chunk, past its header, must fail rather
    // than panic.
    for cut in idat + HEADER_SIZE..idat + HEADER_SIZE + 9 + CRC_SIZE {
        match split(&full[..cut]) {
            Err(Error::TruncatedChunk { offset, needed, available }) => {
                assert_eq!(idat, offset);
                assert_eq!((HEADER_SIZE + 9 + CRC_SIZE) as u64, needed);
                assert_eq!(cut - idat, available);
            }
            other => panic!("cut at {}: expected TruncatedChunk, got {:?}",
                            cut, other),
        }
    }
}

#[test]
fn huge_length_is_truncation() {
    let mut bytes = SIGNATURE.to_vec();
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
    bytes.extend_from_slice(b"IDAT");
    bytes.extend_from_slice(&[0; 8]);
    match split(&bytes) {
        Err(Error::TruncatedChunk { needed, available, .. }) => {
            assert_eq!(0xFFFF_FFFFu64 + 12, needed);
            assert_eq!(16, available);
        }
        other => panic!("expected TruncatedChunk, got {:?}", other),
    }
}

#[test]
fn reader_tracks_offset() {
    use crate::test_helpers::*;

    let bytes = minimal_png();
    let mut reader = ChunkReader::new(&bytes).unwrap();
    assert_eq!(SIGNATURE.len(), reader.offset());
    let ihdr = reader.next_chunk().unwrap().unwrap();
    assert_eq!(SIGNATURE.len() + ihdr.encoded_len(), reader.offset());
    assert_eq!(2, reader.count());
}

#[test]
fn reader_stops_after_error() {
    let mut bytes = SIGNATURE.to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 9]);
    bytes.extend_from_slice(b"IDAT");
    let mut reader = ChunkReader::new(&bytes).unwrap();
    assert!(reader.next_chunk().is_err());
    assert!(reader.next_chunk().unwrap().is_none());
}

#[test]
fn split_keeps_bad_crcs() {
    use crate::test_helpers::*;

    let mut bytes = minimal_png();
    // Corrupt the last byte of the IHDR CRC.
    let ihdr_crc_end = SIGNATURE.len() + HEADER_SIZE + 13 + CRC_SIZE;
    bytes[ihdr_crc_end - 1] ^= 0xFF;

    let chunks = split(&bytes).unwrap();
    assert!(chunks[0].verify_crc().is_err());
    assert!(chunks[1].verify_crc().is_ok());

    match split_verified(&bytes) {
        Err(Error::BadCrc { chunk_type, .. }) => {
            assert_eq!(crate::error::ChunkType(*b"IHDR"), chunk_type);
        }
        other => panic!("expected BadCrc, got {:?}", other),
    }
    assert_eq!(3, split_verified(&minimal_png()).unwrap().len());
}

#[cfg(all(test, feature = "unstable"))]
mod benches {
    use test::Bencher;

    use super::split;
    use crate::test_helpers::*;

    #[bench]
    fn split_speed(b: &mut Bencher) {
        let idat = repeat_data(b"0123456789abcdef", 4096);
        let chunks: Vec<(&[u8; 4], &[u8])> =
            (0..64).map(|_| (b"IDAT", &idat[..])).collect();
        let data = png_with(&chunks);
        b.bytes = data.len() as u64;
        b.iter(|| split(&data).unwrap().len());
    }
}
