//! A [PNG][png] stream is an 8-byte signature followed by a list of
//! chunks, each made of a length, a four-letter type, some data and a
//! CRC.  Since 2017 the format has had an [`eXIf` chunk][exif] for holding
//! raw EXIF data.  This library reads, inserts and removes that chunk,
//! and copies every other chunk through byte for byte.
//!
//! The three operations most callers need are `get_metadata`,
//! `insert_metadata` and `remove_metadata`.  They work on in-memory
//! buffers and never touch the filesystem.  The lower-level pieces they are
//! built from are public as well:
//!
//! - `read` checks the signature and splits a stream into `Chunk`s,
//! - `edit` finds, replaces and deletes chunks by type,
//! - `write` joins chunks back into a stream.
//!
//! ### A note about checksums
//!
//! Chunks read from a stream keep the CRC they were stored with, correct
//! or not, so that untouched chunks are written back exactly as they were
//! found.  Use `read::split_verified` or `Chunk::verify_crc` if you want
//! CRCs checked.  Chunks created by this library always get a correct CRC,
//! written big-endian like the rest of the chunk.
//!
//! ### Limitations
//!
//! - The EXIF data is not parsed or validated in any way.
//! - Bytes after the `IEND` chunk are silently dropped when a stream is
//!   rewritten.
//! - Chunk ordering rules, beyond keeping `IEND` last, are not enforced.
//!
//! [png]: https://www.w3.org/TR/png/
//! [exif]: https://www.w3.org/TR/png/#eXIf

#![cfg_attr(feature = "unstable", feature(test))]
#![warn(missing_docs)]

#[macro_use] extern crate log;
#[cfg(all(test, feature = "unstable"))] extern crate test;

mod consts;
#[cfg(test)] mod test_helpers;
mod chunk_crc;
pub mod chunk;
pub mod edit;
pub mod error;
pub mod exif;
pub mod read;
pub mod write;

pub use chunk::Chunk;
pub use chunk_crc::chunk_crc;
pub use consts::{EXIF, IEND, SIGNATURE};
pub use error::{Error, Result};
pub use exif::{get_metadata, insert_metadata, remove_metadata};
