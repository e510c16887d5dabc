/// Appears at the front of all PNG streams.
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// The size of a chunk's big-endian length field.
pub const LENGTH_SIZE: usize = 4;

/// The size of a chunk's type code.
pub const TYPE_SIZE: usize = 4;

/// The size of a chunk header (length followed by type).
pub const HEADER_SIZE: usize = LENGTH_SIZE + TYPE_SIZE;

/// The size of a chunk CRC.
pub const CRC_SIZE: usize = 4;

/// Marks the last chunk in a PNG stream.
pub const IEND: [u8; 4] = *b"IEND";

/// Holds raw EXIF data, starting with the TIFF byte-order mark.
pub const EXIF: [u8; 4] = *b"eXIf";
