//! Platform-independent 64-bit counters and little-endian packing for the
//! size, offset and count fields of ZIP64-style archive records.
//!
//! An archive writer builds a [`Count64`] per record, feeds it byte counts
//! as data is produced, then serializes it with [`pack64`] (or a
//! [`RecordEncoder`]) when emitting the record. The counter carries its
//! full 64-bit range even on hosts whose native word is 32 bits wide.

pub mod count;
pub mod pack;

pub use self::count::{ArgumentError, Count64, CountError, CountValue, Counter, Split64, Wide64};
pub use self::pack::{pack16, pack32, pack64, RecordEncoder};
pub use self::pack::{U16_BYTE_LEN, U32_BYTE_LEN, U64_BYTE_LEN};
