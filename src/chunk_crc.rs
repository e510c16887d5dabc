use crc::{Crc, CRC_32_ISO_HDLC};

/// The CRC-32 variant used by PNG (and zlib).
const PNG_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

#[test]
fn plain_checksum() {
    // Check value from the CRC catalogue entry for CRC-32/ISO-HDLC.
    assert_eq!(0xCBF43926, PNG_CRC.checksum(b"123456789"));
    assert_eq!(0x00000000, PNG_CRC.checksum(&[]));
}

/// Compute the CRC stored after a PNG chunk.  It covers the chunk type
/// and the data, but not the length field.
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut digest = PNG_CRC.digest();
    digest.update(chunk_type);
    digest.update(data);
    digest.finalize()
}

#[test]
fn chunk_checksum() {
    // Every well-formed PNG ends with these bytes.
    assert_eq!(0xAE426082, chunk_crc(b"IEND", &[]));

    // Splitting type and data must not change the result.
    assert_eq!(PNG_CRC.checksum(b"tEXtComment\0hello"),
               chunk_crc(b"tEXt", b"Comment\0hello"));
}

#[cfg(all(test, feature = "unstable"))]
mod benches {
    use test::Bencher;
    use super::*;

    #[bench]
    fn crc_speed(b: &mut Bencher) {
        let input = [0; 1024];
        b.bytes = input.len() as u64;
        b.iter(|| chunk_crc(b"IDAT", &input));
    }
}
