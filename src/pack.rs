//! This module provides little-endian packing of archive record fields.
//!
//! It centralizes the knowledge that the container format stores every
//! numeric field least-significant byte first:
//!
//!   * 16-bit fields are serialized in 2 bytes.
//!   * 32-bit fields are serialized in 4 bytes.
//!   * 64-bit fields are serialized in 8 bytes: the low 32-bit word first,
//!     then the high word, each little-endian. The value can come from a
//!     native integer or from either `Count64` representation; the output
//!     is bit-identical in all three cases.

use bytes::{BufMut, BytesMut};

use crate::count::CountValue;

/// Length of a packed 16-bit field in bytes.
pub const U16_BYTE_LEN: usize = 2;

/// Length of a packed 32-bit field in bytes.
pub const U32_BYTE_LEN: usize = 4;

/// Length of a packed 64-bit field in bytes.
pub const U64_BYTE_LEN: usize = 8;

/// Returns the little-endian byte representation of a 16-bit field.
pub fn pack16(value: u16) -> [u8; U16_BYTE_LEN] {
    value.to_le_bytes()
}

/// Returns the little-endian byte representation of a 32-bit field.
pub fn pack32(value: u32) -> [u8; U32_BYTE_LEN] {
    value.to_le_bytes()
}

/// Returns the little-endian byte representation of a 64-bit field.
///
/// Accepts a native integer or a `Count64` in either representation.
pub fn pack64<V: Into<CountValue>>(value: V) -> [u8; U64_BYTE_LEN] {
    let (hi, lo) = value.into().words();
    let mut bytes = [0; U64_BYTE_LEN];
    bytes[..U32_BYTE_LEN].copy_from_slice(&pack32(lo));
    bytes[U32_BYTE_LEN..].copy_from_slice(&pack32(hi));
    bytes
}

/// A type for encoding record fields into a caller-owned buffer.
///
/// The buffer is grown as required. Packing has no failure modes, so every
/// method returns `self` for chaining.
pub struct RecordEncoder<'a> {
    inner: &'a mut BytesMut,
}

impl<'a> RecordEncoder<'a> {
    /// Wraps the given buffer for encoding fields into.
    pub fn new(inner: &'a mut BytesMut) -> Self {
        RecordEncoder { inner }
    }

    /// Appends a 16-bit field.
    pub fn encode_u16(&mut self, value: u16) -> &mut Self {
        self.inner.reserve(U16_BYTE_LEN);
        self.inner.put_u16_le(value);
        self
    }

    /// Appends a 32-bit field.
    pub fn encode_u32(&mut self, value: u32) -> &mut Self {
        self.inner.reserve(U32_BYTE_LEN);
        self.inner.put_u32_le(value);
        self
    }

    /// Appends a 64-bit field from a native integer or a `Count64`.
    pub fn encode_u64<V: Into<CountValue>>(&mut self, value: V) -> &mut Self {
        self.inner.extend_from_slice(&pack64(value));
        self
    }
}

/*=======*
 * TESTS *
 *=======*/

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::{pack16, pack32, pack64, RecordEncoder};
    use crate::count::Count64;

    // A few integers and their corresponding byte encodings.
    const U64_ENCODINGS: [(u64, [u8; 8]); 8] = [
        (0, [0, 0, 0, 0, 0, 0, 0, 0]),
        (1, [1, 0, 0, 0, 0, 0, 0, 0]),
        (256, [0, 1, 0, 0, 0, 0, 0, 0]),
        (u32::MAX as u64, [255, 255, 255, 255, 0, 0, 0, 0]),
        (1 << 32, [0, 0, 0, 0, 1, 0, 0, 0]),
        (
            0x0102_0304_0506_0708,
            [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01],
        ),
        (1 << 63, [0, 0, 0, 0, 0, 0, 0, 128]),
        (u64::MAX, [255, 255, 255, 255, 255, 255, 255, 255]),
    ];

    #[test]
    fn pack16_low_byte_first() {
        assert_eq!(pack16(0x1234), [0x34, 0x12]);
        assert_eq!(pack16(0), [0, 0]);
        assert_eq!(pack16(u16::MAX), [255, 255]);
    }

    #[test]
    fn pack32_low_byte_first() {
        assert_eq!(pack32(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(pack32(0), [0, 0, 0, 0]);
        assert_eq!(pack32(u32::MAX), [255, 255, 255, 255]);
    }

    #[test]
    fn pack64_integer() {
        for &(value, ref encoded_bytes) in &U64_ENCODINGS {
            assert_eq!(&pack64(value), encoded_bytes);
        }
    }

    #[test]
    fn pack64_either_representation() {
        for &(value, ref encoded_bytes) in &U64_ENCODINGS {
            assert_eq!(&pack64(Count64::split(value)), encoded_bytes);
            assert_eq!(&pack64(Count64::wide(value)), encoded_bytes);
        }
    }

    #[test]
    fn pack64_of_sum_matches_independent_encoding() {
        for &(a, b) in &[
            (0u64, 0u64),
            (1, 2),
            (u32::MAX as u64, 1),
            (0xDEAD_BEEF, 0xCAFE_F00D_0000),
            (u64::MAX - 1, 1),
        ] {
            let mut counter = Count64::split(a);
            counter.add(b);
            assert_eq!(pack64(counter), (a + b).to_le_bytes());

            let mut counter = Count64::wide(a);
            counter.add(b);
            assert_eq!(pack64(counter), (a + b).to_le_bytes());
        }
    }

    #[test]
    fn encoder_appends_fields() {
        let mut buffer = BytesMut::new();
        buffer.extend_from_slice(&[13]);

        let mut offset = Count64::new(0u64);
        offset.add(0x0102_0304_0506_0708u64);

        RecordEncoder::new(&mut buffer)
            .encode_u16(0x1234)
            .encode_u32(0x1234_5678)
            .encode_u64(offset);

        let mut expected_bytes = vec![13];
        expected_bytes.extend_from_slice(&pack16(0x1234));
        expected_bytes.extend_from_slice(&pack32(0x1234_5678));
        expected_bytes.extend_from_slice(&pack64(0x0102_0304_0506_0708u64));

        assert_eq!(&buffer[..], &expected_bytes[..]);
    }

    #[test]
    fn encoder_empty_writes_nothing() {
        let mut buffer = BytesMut::new();
        RecordEncoder::new(&mut buffer);
        assert!(buffer.is_empty());
    }
}
