//! Reading, inserting and removing the `eXIf` chunk of a PNG stream.
//!
//! All three functions take a complete PNG stream and check its signature
//! before doing anything else.  Chunks other than `eXIf` are copied through
//! exactly as they were, in the same order.  The EXIF data itself is
//! treated as an opaque blob.

use crate::consts::*;
use crate::edit;
use crate::error::Result;
use crate::read::split;
use crate::write::merge;

/// Return the data of the `eXIf` chunk, or `None` if there isn't one.
pub fn get_metadata(bytes: &[u8]) -> Result<Option<Vec<u8>>> {
    let chunks = split(bytes)?;
    Ok(edit::find(&chunks, &EXIF).map(|chunk| chunk.data().to_vec()))
}

/// Return a copy of the PNG stream with its `eXIf` chunk set to `exif`.
/// An existing `eXIf` chunk is replaced where it stands; otherwise one is
/// added just before `IEND`.
pub fn insert_metadata(bytes: &[u8], exif: &[u8]) -> Result<Vec<u8>> {
    let mut chunks = split(bytes)?;
    edit::upsert(&mut chunks, EXIF, exif)?;
    Ok(merge(&chunks))
}

/// Return a copy of the PNG stream without its `eXIf` chunk.  A stream
/// with no `eXIf` chunk comes back unchanged (up to and including `IEND`).
pub fn remove_metadata(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut chunks = split(bytes)?;
    edit::delete(&mut chunks, &EXIF);
    Ok(merge(&chunks))
}

/// A big-endian TIFF header followed by an empty IFD, which is about the
/// smallest thing a reader will accept as EXIF data.
#[cfg(test)]
const TINY_EXIF: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
                           0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

#[cfg(test)]
fn count_exif(bytes: &[u8]) -> usize {
    split(bytes).unwrap().iter().filter(|chunk| chunk.is_type(&EXIF)).count()
}

#[test]
fn iend_only_has_no_metadata() {
    use crate::test_helpers::*;

    let png = png_with(&[(b"IEND", &[])]);
    assert_eq!(None, get_metadata(&png).unwrap());
    assert_eq!(png, remove_metadata(&png).unwrap());
}

#[test]
fn insert_then_get() {
    use crate::test_helpers::*;

    let png = minimal_png();
    let with_exif = insert_metadata(&png, TINY_EXIF).unwrap();
    assert_eq!(Some(TINY_EXIF.to_vec()), get_metadata(&with_exif).unwrap());
    assert_eq!(1, count_exif(&with_exif));

    // The new chunk is the second-to-last one, and valid.
    let chunks = crate::read::split_verified(&with_exif).unwrap();
    assert!(chunks[chunks.len() - 2].is_type(&EXIF));
    assert!(chunks[chunks.len() - 1].is_terminal());
}

#[test]
fn insert_empty_metadata() {
    use crate::test_helpers::*;

    let with_exif = insert_metadata(&minimal_png(), &[]).unwrap();
    assert_eq!(Some(vec![]), get_metadata(&with_exif).unwrap());
}

#[test]
fn insert_twice_replaces() {
    use crate::chunk_crc::chunk_crc;
    use crate::test_helpers::*;

    let png = png_with(&[
        (b"IHDR", &[0; 13]),
        (b"eXIf", b"old"),
        (b"IDAT", &[1, 2, 3]),
        (b"IEND", &[]),
    ]);
    let once = insert_metadata(&png, b"first").unwrap();
    let twice = insert_metadata(&once, b"second").unwrap();

    let chunks = split(&twice).unwrap();
    assert_eq!(4, chunks.len());
    assert_eq!(1, count_exif(&twice));
    // Still where the original eXIf chunk was.
    assert!(chunks[1].is_type(&EXIF));
    assert_eq!(b"second", chunks[1].data());
    assert_eq!(chunk_crc(&EXIF, b"second"), chunks[1].crc());
}

#[test]
fn checksum_is_big_endian() {
    use crate::chunk_crc::chunk_crc;
    use crate::test_helpers::*;

    let with_exif = insert_metadata(&png_with(&[(b"IEND", &[])]), TINY_EXIF)
        .unwrap();
    let crc_start = SIGNATURE.len() + HEADER_SIZE + TINY_EXIF.len();
    assert_eq!(&chunk_crc(&EXIF, TINY_EXIF).to_be_bytes()[..],
               &with_exif[crc_start..crc_start + CRC_SIZE]);
    assert_eq!(&[0, 0, 0, TINY_EXIF.len() as u8],
               &with_exif[SIGNATURE.len()..SIGNATURE.len() + LENGTH_SIZE]);
}

#[test]
fn other_chunks_untouched() {
    use crate::test_helpers::*;

    // A deliberately stale CRC on the tEXt chunk must survive both edits.
    let mut text = raw_chunk(b"tEXt", b"Comment\0hi");
    let last = text.len() - 1;
    text[last] ^= 0x55;

    let mut png = SIGNATURE.to_vec();
    png.extend(raw_chunk(b"IHDR", &[0; 13]));
    png.extend(text);
    png.extend(raw_chunk(b"IDAT", &[9; 40]));
    png.extend(raw_chunk(b"IEND", &[]));

    let inserted = insert_metadata(&png, TINY_EXIF).unwrap();
    let removed = remove_metadata(&inserted).unwrap();
    assert_eq!(png, removed);

    let before = split(&png).unwrap();
    let after: Vec<_> = split(&inserted).unwrap().into_iter()
        .filter(|chunk| !chunk.is_type(&EXIF))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn remove_is_idempotent() {
    use crate::test_helpers::*;

    let png = insert_metadata(&minimal_png(), TINY_EXIF).unwrap();
    let once = remove_metadata(&png).unwrap();
    let twice = remove_metadata(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(minimal_png(), once);
    assert_eq!(None, get_metadata(&once).unwrap());
}

#[test]
fn insert_without_iend_fails() {
    use crate::error::Error;
    use crate::test_helpers::*;

    let png = png_with(&[(b"IHDR", &[0; 13]), (b"IDAT", &[1])]);
    match insert_metadata(&png, TINY_EXIF) {
        Err(Error::MissingTerminal) => {}
        other => panic!("expected MissingTerminal, got {:?}", other),
    }
}

#[test]
fn not_png_is_rejected_everywhere() {
    use crate::error::Error;

    for bytes in &[&b""[..], &b"\x89PNG"[..], &b"\x89PNG\r\n\x1a\x0b\0\0\0\0IEND"[..]] {
        assert!(matches!(get_metadata(bytes), Err(Error::Format)));
        assert!(matches!(insert_metadata(bytes, TINY_EXIF), Err(Error::Format)));
        assert!(matches!(remove_metadata(bytes), Err(Error::Format)));
    }
}

#[test]
fn truncated_is_rejected_everywhere() {
    use crate::error::Error;
    use crate::test_helpers::*;

    let png = minimal_png();
    let cut = &png[..png.len() - 20];
    assert!(matches!(get_metadata(cut), Err(Error::TruncatedChunk { .. })));
    assert!(matches!(insert_metadata(cut, TINY_EXIF),
                     Err(Error::TruncatedChunk { .. })));
    assert!(matches!(remove_metadata(cut), Err(Error::TruncatedChunk { .. })));
}

#[cfg(test)]
use quickcheck_macros::quickcheck;

#[cfg(test)]
use crate::test_helpers::{ChunkList, non_exif_chunks};

#[cfg(test)]
#[quickcheck]
fn qc_insert_then_get(list: ChunkList, exif: Vec<u8>) -> bool {
    let png = list.to_png();
    let with_exif = insert_metadata(&png, &exif).unwrap();
    get_metadata(&with_exif).unwrap() == Some(exif) && count_exif(&with_exif) == 1
}

#[cfg(test)]
#[quickcheck]
fn qc_remove_is_idempotent(list: ChunkList) -> bool {
    let once = remove_metadata(&list.to_png()).unwrap();
    let twice = remove_metadata(&once).unwrap();
    once == twice && get_metadata(&once).unwrap().is_none()
}

#[cfg(test)]
#[quickcheck]
fn qc_insert_twice_replaces_in_place(list: ChunkList, first: Vec<u8>, second: Vec<u8>) -> bool {
    use crate::chunk_crc::chunk_crc;

    let once = insert_metadata(&list.to_png(), &first).unwrap();
    let twice = insert_metadata(&once, &second).unwrap();

    let before = split(&once).unwrap();
    let after = split(&twice).unwrap();
    let index = edit::position(&before, &EXIF);
    index.is_some() &&
        index == edit::position(&after, &EXIF) &&
        before.len() == after.len() &&
        count_exif(&twice) == 1 &&
        after[index.unwrap_or(0)].data() == &second[..] &&
        after[index.unwrap_or(0)].crc() == chunk_crc(&EXIF, &second)
}

#[cfg(test)]
#[quickcheck]
fn qc_other_chunks_untouched(list: ChunkList, exif: Vec<u8>) -> bool {
    let png = list.to_png();
    let inserted = insert_metadata(&png, &exif).unwrap();
    let removed = remove_metadata(&png).unwrap();
    let expected = non_exif_chunks(&png);
    non_exif_chunks(&inserted) == expected &&
        split(&removed).unwrap() == expected
}
