//! Reassembling a PNG stream from its chunks.

use crate::chunk::Chunk;
use crate::consts::*;

// Serialization lives here rather than in `chunk` so that everything
// that knows the on-disk layout of a chunk sits next to `merge`.
impl<'a> Chunk<'a> {
    /// The number of bytes this chunk occupies in a stream.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.data().len() + CRC_SIZE
    }

    /// Append this chunk, as it appears in a stream, to `dest`.
    pub fn write_to(&self, dest: &mut Vec<u8>) {
        dest.extend_from_slice(&self.length().to_be_bytes());
        dest.extend_from_slice(self.chunk_type());
        dest.extend_from_slice(self.data());
        dest.extend_from_slice(&self.crc().to_be_bytes());
    }
}

/// Build a PNG stream from a signature followed by `chunks`, in order.
/// Lengths and CRCs are written exactly as the chunks carry them.
pub fn merge(chunks: &[Chunk]) -> Vec<u8> {
    let size = chunks.iter()
        .fold(SIGNATURE.len(), |size, chunk| size + chunk.encoded_len());
    let mut merged = Vec::with_capacity(size);
    merged.extend_from_slice(&SIGNATURE);
    for chunk in chunks {
        chunk.write_to(&mut merged);
    }
    merged
}

#[test]
fn merge_empty() {
    assert_eq!(SIGNATURE.to_vec(), merge(&[]));
}

#[test]
fn merge_writes_big_endian_fields() {
    let chunk = Chunk::with_crc(*b"eXIf", vec![0xAAu8; 0x0102], 0x01020304)
        .unwrap();
    let merged = merge(&[chunk.clone()]);
    assert_eq!(SIGNATURE.len() + chunk.encoded_len(), merged.len());
    assert_eq!(&[0x00, 0x00, 0x01, 0x02], &merged[8..12]);
    assert_eq!(b"eXIf", &merged[12..16]);
    assert_eq!(&[0x01, 0x02, 0x03, 0x04], &merged[merged.len() - 4..]);
}

#[test]
fn merge_matches_hand_encoding() {
    use crate::test_helpers::*;

    let chunks = vec![
        Chunk::new(*b"IHDR", vec![0u8; 13]).unwrap(),
        Chunk::new(*b"IEND", &b""[..]).unwrap(),
    ];
    assert_eq!(png_with(&[(b"IHDR", &[0; 13]), (b"IEND", &[])]),
               merge(&chunks));
}

#[test]
fn split_merge_round_trip() {
    use crate::read::split;
    use crate::test_helpers::*;

    // A stale CRC must survive the trip untouched.
    let chunks = vec![
        Chunk::new(*b"IHDR", vec![0u8; 13]).unwrap(),
        Chunk::with_crc(*b"tEXt", &b"Title\0x"[..], 0x0BADF00D).unwrap(),
        Chunk::new(*b"IDAT", repeat_data(b"pixels", 100)).unwrap(),
        Chunk::new(*b"IEND", &b""[..]).unwrap(),
    ];
    let merged = merge(&chunks);
    assert_eq!(chunks, split(&merged).unwrap());
    assert_eq!(merged, merge(&split(&merged).unwrap()));
}

#[cfg(test)]
#[quickcheck_macros::quickcheck]
fn qc_split_merge_round_trip(list: crate::test_helpers::ChunkList) -> bool {
    let merged = list.to_png();
    crate::read::split(&merged).unwrap() == list.0
}
