//! Finding, replacing and removing chunks by type.
//!
//! These functions work on a chunk list as returned by `read::split`, and
//! keep two properties of a well-formed list intact: the `IEND` chunk
//! stays last, and `upsert` never leaves two chunks of the type it writes.
//! The CRC of a chunk written by `upsert` always matches its contents.

use std::borrow::Cow;

use crate::chunk::Chunk;
use crate::error::{ChunkType, Error, Result};

/// The index of the first chunk of type `chunk_type`.
pub fn position(chunks: &[Chunk], chunk_type: &[u8; 4]) -> Option<usize> {
    chunks.iter().position(|chunk| chunk.is_type(chunk_type))
}

/// The first chunk of type `chunk_type`, if any.
pub fn find<'c, 'a>(chunks: &'c [Chunk<'a>], chunk_type: &[u8; 4]) ->
    Option<&'c Chunk<'a>>
{
    chunks.iter().find(|chunk| chunk.is_type(chunk_type))
}

/// Store `data` in a chunk of type `chunk_type`.  An existing chunk of
/// that type is replaced where it stands; otherwise the new chunk goes
/// just before `IEND`.  If there is no `IEND` to insert in front of, fails
/// with `Error::MissingTerminal` and leaves `chunks` as it was.
pub fn upsert<'a, D>(chunks: &mut Vec<Chunk<'a>>, chunk_type: [u8; 4], data: D) ->
    Result<()>
    where D: Into<Cow<'a, [u8]>>
{
    let chunk = Chunk::new(chunk_type, data)?;
    if let Some(index) = position(chunks, &chunk_type) {
        debug!("Replacing PNG {} chunk at index {}",
               ChunkType(chunk_type), index);
        chunks[index] = chunk;
        return Ok(());
    }

    match chunks.iter().position(|chunk| chunk.is_terminal()) {
        Some(index) => {
            debug!("Inserting PNG {} chunk at index {}",
                   ChunkType(chunk_type), index);
            chunks.insert(index, chunk);
            Ok(())
        }
        None => Err(Error::MissingTerminal),
    }
}

/// Remove the first chunk of type `chunk_type` and return it.  Does
/// nothing if there is no such chunk.
pub fn delete<'a>(chunks: &mut Vec<Chunk<'a>>, chunk_type: &[u8; 4]) ->
    Option<Chunk<'a>>
{
    match position(chunks, chunk_type) {
        Some(index) => {
            debug!("Removing PNG {} chunk at index {}",
                   ChunkType(*chunk_type), index);
            Some(chunks.remove(index))
        }
        None => {
            debug!("No PNG {} chunk to remove", ChunkType(*chunk_type));
            None
        }
    }
}

#[cfg(test)]
fn sample_chunks() -> Vec<Chunk<'static>> {
    vec![
        Chunk::new(*b"IHDR", vec![0u8; 13]).unwrap(),
        Chunk::new(*b"tEXt", &b"Author\0me"[..]).unwrap(),
        Chunk::new(*b"IDAT", &b"pixels"[..]).unwrap(),
        Chunk::new(*b"IEND", &b""[..]).unwrap(),
    ]
}

#[cfg(test)]
fn types(chunks: &[Chunk]) -> Vec<[u8; 4]> {
    chunks.iter().map(|chunk| *chunk.chunk_type()).collect()
}

#[test]
fn find_first_match() {
    let mut chunks = sample_chunks();
    chunks.insert(2, Chunk::new(*b"tEXt", &b"Title\0second"[..]).unwrap());

    assert_eq!(Some(1), position(&chunks, b"tEXt"));
    assert_eq!(b"Author\0me", find(&chunks, b"tEXt").unwrap().data());
    assert!(find(&chunks, b"eXIf").is_none());
    assert_eq!(None, position(&chunks, b"eXIf"));
}

#[test]
fn upsert_inserts_before_iend() {
    let mut chunks = sample_chunks();
    upsert(&mut chunks, *b"eXIf", &b"MM\0*"[..]).unwrap();
    assert_eq!(vec![*b"IHDR", *b"tEXt", *b"IDAT", *b"eXIf", *b"IEND"],
               types(&chunks));

    let exif = &chunks[3];
    assert_eq!(4, exif.length());
    exif.verify_crc().unwrap();
}

#[test]
fn upsert_replaces_in_place() {
    let mut chunks = sample_chunks();
    upsert(&mut chunks, *b"tEXt", &b"Author\0you"[..]).unwrap();
    assert_eq!(vec![*b"IHDR", *b"tEXt", *b"IDAT", *b"IEND"], types(&chunks));
    assert_eq!(b"Author\0you", chunks[1].data());
    chunks[1].verify_crc().unwrap();
}

#[test]
fn upsert_needs_iend() {
    let mut chunks = sample_chunks();
    chunks.pop();
    let before = chunks.clone();
    match upsert(&mut chunks, *b"eXIf", &b"II*\0"[..]) {
        Err(Error::MissingTerminal) => {}
        other => panic!("expected MissingTerminal, got {:?}", other),
    }
    assert_eq!(before, chunks);

    // Replacing does not need an IEND.
    upsert(&mut chunks, *b"IDAT", &b"more pixels"[..]).unwrap();
    assert_eq!(b"more pixels", chunks[2].data());
}

#[test]
fn delete_removes_first_match() {
    let mut chunks = sample_chunks();
    let removed = delete(&mut chunks, b"tEXt").unwrap();
    assert_eq!(b"Author\0me", removed.data());
    assert_eq!(vec![*b"IHDR", *b"IDAT", *b"IEND"], types(&chunks));
}

#[test]
fn delete_missing_is_noop() {
    let mut chunks = sample_chunks();
    assert!(delete(&mut chunks, b"eXIf").is_none());
    assert_eq!(sample_chunks(), chunks);
}
