//! This module provides a platform-independent 64-bit unsigned counter.
//!
//! Archive writers track sizes and offsets that can exceed 4 GiB even on
//! hosts whose native word is only 32 bits wide. `Count64` hides that
//! difference: on 64-bit targets it is a plain native integer, on 32-bit
//! targets it is a (high, low) pair of 32-bit words with explicit carry
//! propagation. Both representations are observably identical through the
//! public contract.

use std::convert::{Infallible, TryFrom, TryInto};

use thiserror::Error;

/// Explains why a loosely-typed value is not a valid integer count.
#[derive(PartialEq, Error, Debug)]
pub enum ArgumentError {
    #[error("negative value: {0}")]
    Negative(i64),

    #[error("floating-point value: {0}")]
    Float(f64),

    #[error("not an integer: {0:?}")]
    NotAnInteger(String),
}

impl From<Infallible> for ArgumentError {
    fn from(error: Infallible) -> Self {
        match error {}
    }
}

/// Errors surfaced by the checked counter operations.
#[derive(PartialEq, Error, Debug)]
pub enum CountError {
    #[error("{op}() accepts only integer or Count64 values: {cause}")]
    InvalidArgument {
        /// The name of the operation that rejected the value.
        op: &'static str,

        /// Why the value was rejected.
        cause: ArgumentError,
    },
}

/// A value that can be given to the counter operations.
///
/// This is the whole universe of valid inputs to `set` and `add`: a native
/// unsigned integer or another counter. Anything else has to go through the
/// fallible conversions below and the `try_set`/`try_add` entry points.
#[derive(Debug, Clone, Copy)]
pub enum CountValue {
    Int(u64),
    Count(Count64),
}

impl CountValue {
    fn to_u64(self) -> u64 {
        match self {
            CountValue::Int(value) => value,
            CountValue::Count(count) => count.get(),
        }
    }

    pub(crate) fn words(self) -> (u32, u32) {
        match self {
            CountValue::Int(value) => split_words(value),
            CountValue::Count(count) => count.words(),
        }
    }
}

impl From<u64> for CountValue {
    fn from(value: u64) -> Self {
        CountValue::Int(value)
    }
}

impl From<u32> for CountValue {
    fn from(value: u32) -> Self {
        CountValue::Int(value as u64)
    }
}

impl From<u16> for CountValue {
    fn from(value: u16) -> Self {
        CountValue::Int(value as u64)
    }
}

impl From<usize> for CountValue {
    fn from(value: usize) -> Self {
        CountValue::Int(value as u64)
    }
}

impl From<Count64> for CountValue {
    fn from(count: Count64) -> Self {
        CountValue::Count(count)
    }
}

impl TryFrom<i64> for CountValue {
    type Error = ArgumentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u64::try_from(value) {
            Ok(value) => Ok(CountValue::Int(value)),
            Err(_) => Err(ArgumentError::Negative(value)),
        }
    }
}

impl TryFrom<f64> for CountValue {
    type Error = ArgumentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Err(ArgumentError::Float(value))
    }
}

impl TryFrom<&str> for CountValue {
    type Error = ArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Err(ArgumentError::NotAnInteger(value.to_string()))
    }
}

/// Splits a 64-bit value into its (high, low) 32-bit words.
fn split_words(value: u64) -> (u32, u32) {
    ((value >> 32) as u32, value as u32)
}

/// The capability contract shared by both counter representations.
pub trait Counter {
    /// Overwrites the logical value.
    fn set(&mut self, value: CountValue) -> &mut Self;

    /// Adds `value` to the logical value in place.
    ///
    /// Logical values past `u64::MAX` wrap; archive sizes never get there.
    fn add(&mut self, value: CountValue) -> &mut Self;

    /// Returns the logical value.
    fn get(&self) -> u64;

    /// Returns the raw (high, low) word pair.
    ///
    /// This is the packer's window into the representation. It is not part
    /// of the stable contract.
    fn words(&self) -> (u32, u32);
}

/// The composed representation: two 32-bit words.
///
/// Every operation touches only 32-bit quantities, so a 32-bit-native host
/// never has to emulate 64-bit arithmetic in the counting hot path. The low
/// word is unsigned throughout; overflow of an addition shows up as the
/// wrapped sum being smaller than the old low word, which is exactly what
/// `overflowing_add` reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Split64 {
    /// The upper 32 bits of the logical value.
    hi: u32,

    /// The lower 32 bits of the logical value.
    lo: u32,
}

impl Counter for Split64 {
    fn set(&mut self, value: CountValue) -> &mut Self {
        let (hi, lo) = value.words();
        self.hi = hi;
        self.lo = lo;
        self
    }

    fn add(&mut self, value: CountValue) -> &mut Self {
        let (hi, lo) = value.words();
        let (sum, carry) = self.lo.overflowing_add(lo);
        self.lo = sum;
        self.hi = self.hi.wrapping_add(carry as u32).wrapping_add(hi);
        self
    }

    fn get(&self) -> u64 {
        ((self.hi as u64) << 32) | self.lo as u64
    }

    fn words(&self) -> (u32, u32) {
        (self.hi, self.lo)
    }
}

/// The direct representation: one native 64-bit integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Wide64(u64);

impl Counter for Wide64 {
    fn set(&mut self, value: CountValue) -> &mut Self {
        self.0 = value.to_u64();
        self
    }

    fn add(&mut self, value: CountValue) -> &mut Self {
        self.0 = self.0.wrapping_add(value.to_u64());
        self
    }

    fn get(&self) -> u64 {
        self.0
    }

    fn words(&self) -> (u32, u32) {
        split_words(self.0)
    }
}

/// A 64-bit unsigned counter for sizes, offsets and record counts.
///
/// The representation is picked once at construction from the target's
/// pointer width and never re-checked. Both variants are always compiled,
/// so either can be exercised explicitly via `split()` and `wide()`.
#[derive(Debug, Clone, Copy)]
pub enum Count64 {
    Split(Split64),
    Wide(Wide64),
}

impl Count64 {
    /// Creates a counter in the representation native to this target.
    pub fn new<V: Into<CountValue>>(initial: V) -> Self {
        if cfg!(target_pointer_width = "64") {
            Count64::wide(initial)
        } else {
            Count64::split(initial)
        }
    }

    /// Creates a counter in the composed two-word representation.
    pub fn split<V: Into<CountValue>>(initial: V) -> Self {
        let mut counter = Split64::default();
        counter.set(initial.into());
        Count64::Split(counter)
    }

    /// Creates a counter in the direct native representation.
    pub fn wide<V: Into<CountValue>>(initial: V) -> Self {
        let mut counter = Wide64::default();
        counter.set(initial.into());
        Count64::Wide(counter)
    }

    /// Overwrites the logical value. Returns `self` for chaining.
    pub fn set<V: Into<CountValue>>(&mut self, value: V) -> &mut Self {
        let value = value.into();
        match self {
            Count64::Split(counter) => {
                counter.set(value);
            }
            Count64::Wide(counter) => {
                counter.set(value);
            }
        }
        self
    }

    /// Adds `value` to the logical value in place. Returns `self` for
    /// chaining.
    pub fn add<V: Into<CountValue>>(&mut self, value: V) -> &mut Self {
        let value = value.into();
        match self {
            Count64::Split(counter) => {
                counter.add(value);
            }
            Count64::Wide(counter) => {
                counter.add(value);
            }
        }
        self
    }

    /// Checked variant of `set` for loosely-typed inputs.
    ///
    /// The counter keeps its prior value when the conversion fails.
    pub fn try_set<V>(&mut self, value: V) -> Result<&mut Self, CountError>
    where
        V: TryInto<CountValue>,
        V::Error: Into<ArgumentError>,
    {
        match value.try_into() {
            Ok(value) => Ok(self.set(value)),
            Err(cause) => Err(CountError::InvalidArgument {
                op: "set",
                cause: cause.into(),
            }),
        }
    }

    /// Checked variant of `add` for loosely-typed inputs.
    ///
    /// The counter keeps its prior value when the conversion fails.
    pub fn try_add<V>(&mut self, value: V) -> Result<&mut Self, CountError>
    where
        V: TryInto<CountValue>,
        V::Error: Into<ArgumentError>,
    {
        match value.try_into() {
            Ok(value) => Ok(self.add(value)),
            Err(cause) => Err(CountError::InvalidArgument {
                op: "add",
                cause: cause.into(),
            }),
        }
    }

    /// Returns the logical value.
    pub fn get(&self) -> u64 {
        match self {
            Count64::Split(counter) => counter.get(),
            Count64::Wide(counter) => counter.get(),
        }
    }

    /// Returns the raw (high, low) word pair for the packer.
    ///
    /// Not part of the stable contract.
    pub fn words(&self) -> (u32, u32) {
        match self {
            Count64::Split(counter) => counter.words(),
            Count64::Wide(counter) => counter.words(),
        }
    }
}

impl Default for Count64 {
    fn default() -> Self {
        Count64::new(0u64)
    }
}

// Counters compare by logical value, so the two representations stay
// observably indistinguishable.
impl PartialEq for Count64 {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for Count64 {}

/*=======*
 * TESTS *
 *=======*/
