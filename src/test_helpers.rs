//! Helper functions for our unit tests.

use quickcheck::{Arbitrary, Gen};

use crate::chunk::Chunk;
use crate::chunk_crc::chunk_crc;
use crate::consts::*;
use crate::read::split;
use crate::write::merge;

/// Encode one chunk by hand, with a correct CRC.
pub fn raw_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut result = vec!();
    result.extend_from_slice(&(data.len() as u32).to_be_bytes());
    result.extend_from_slice(chunk_type);
    result.extend_from_slice(data);
    result.extend_from_slice(&chunk_crc(chunk_type, data).to_be_bytes());
    result
}

/// Build a PNG stream from a signature and a list of chunks.
pub fn png_with(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut result = SIGNATURE.to_vec();
    for &(chunk_type, data) in chunks {
        result.extend(raw_chunk(chunk_type, data));
    }
    result
}

/// A 1x1 greyscale image.  The pixel data is not real zlib data, but
/// nothing here looks inside it.
pub fn minimal_png() -> Vec<u8> {
    png_with(&[
        (b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]),
        (b"IDAT", &[0x78, 0x9C, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01]),
        (b"IEND", &[]),
    ])
}

/// Repeat `data` `n` times.
pub fn repeat_data(data: &[u8], n: usize) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len() * n);
    for _ in 0..n { result.extend(data.iter().cloned()); }
    result
}

/// A random chunk list as found in a PNG stream: an optional `eXIf`
/// chunk somewhere among other ancillary chunks, ending in `IEND`.  Some
/// chunks carry a stale CRC, which must survive every edit untouched.
#[derive(Clone, Debug)]
pub struct ChunkList(pub Vec<Chunk<'static>>);

/// A chunk type made of ASCII letters that is neither `IEND` nor `eXIf`.
fn arbitrary_chunk_type(g: &mut Gen) -> [u8; 4] {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    loop {
        let mut chunk_type = [0; 4];
        for b in chunk_type.iter_mut() {
            *b = *g.choose(LETTERS).unwrap_or(&b'x');
        }
        if chunk_type != IEND && chunk_type != EXIF {
            return chunk_type;
        }
    }
}

fn arbitrary_chunk(g: &mut Gen, chunk_type: [u8; 4]) -> Chunk<'static> {
    let data = Vec::<u8>::arbitrary(g);
    if bool::arbitrary(g) {
        Chunk::new(chunk_type, data).unwrap()
    } else {
        Chunk::with_crc(chunk_type, data, u32::arbitrary(g)).unwrap()
    }
}

impl Arbitrary for ChunkList {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 8;
        let mut chunks: Vec<Chunk<'static>> = (0..count)
            .map(|_| {
                let chunk_type = arbitrary_chunk_type(g);
                arbitrary_chunk(g, chunk_type)
            })
            .collect();
        if bool::arbitrary(g) {
            let index = usize::arbitrary(g) % (chunks.len() + 1);
            chunks.insert(index, arbitrary_chunk(g, EXIF));
        }
        chunks.push(arbitrary_chunk(g, IEND));
        ChunkList(chunks)
    }
}

impl ChunkList {
    /// The stream these chunks make up.
    pub fn to_png(&self) -> Vec<u8> {
        merge(&self.0)
    }
}

/// The chunks of `bytes` other than `eXIf`, in order.
pub fn non_exif_chunks(bytes: &[u8]) -> Vec<Chunk<'_>> {
    split(bytes).unwrap().into_iter()
        .filter(|chunk| !chunk.is_type(&EXIF))
        .collect()
}
