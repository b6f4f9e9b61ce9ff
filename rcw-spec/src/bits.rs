//! # Bit Algebra for RCW words
//!
//! An RCW is a single big-endian word of `size` bits. Bit positions are
//! numbered MSB-first, exactly as they are written in `.rcwi` files:
//!
//! ```text
//! position:  0 1 2 3 4 5 6 7 | 8 9 ...
//! byte:      [      0       ] [   1 ...
//! bit:       7 6 5 4 3 2 1 0   7 6 ...
//! ```
//!
//! A value assigned to `[begin:end]` has its least-significant bit at
//! position `end`, which is the same as shifting it left by
//! `(size - 1) - end` in a `size`-bit integer.
//!
//! Field values are [`BigUint`], so a field may be as wide as the word
//! itself.
//!
//! Every MSB-first/big-endian conversion in the workspace goes through
//! [`BitWord`].

use num_bigint::BigUint;

use crate::error::{RcwError, Result};
use crate::layout::BitField;

/// Fixed-width, bit-addressable RCW word
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitWord {
    width: usize,
    bytes: Vec<u8>,
}

impl BitWord {
    /// Create an all-zero word of `width` bits
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 || width % 8 != 0 {
            return Err(RcwError::InvalidSize(width.to_string()));
        }

        Ok(Self {
            width,
            bytes: vec![0; width / 8],
        })
    }

    /// Build a word from big-endian bytes.
    ///
    /// A shorter buffer is zero-extended on the left, the way a big integer
    /// parsed from the same bytes would be. Only the trailing `width / 8`
    /// bytes of a longer buffer are kept.
    pub fn from_bytes(width: usize, bytes: &[u8]) -> Result<Self> {
        let mut word = Self::new(width)?;
        let len = word.bytes.len();

        if bytes.len() >= len {
            word.bytes.copy_from_slice(&bytes[bytes.len() - len..]);
        } else {
            word.bytes[len - bytes.len()..].copy_from_slice(bytes);
        }

        Ok(word)
    }

    /// Pack a set of field values into a fresh word.
    ///
    /// Fields are OR-ed in; the layout is responsible for non-overlap.
    pub fn pack<'a, I>(width: usize, placements: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a BitField, &'a BigUint)>,
    {
        let mut word = Self::new(width)?;
        for (field, value) in placements {
            word.insert(field, value)?;
        }
        Ok(word)
    }

    /// Word width in bits
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Big-endian bytes, exactly `width / 8` of them
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Read a single bit (0 = MSB of the word)
    #[inline]
    pub fn bit(&self, pos: usize) -> bool {
        (self.bytes[pos / 8] >> (7 - pos % 8)) & 1 == 1
    }

    #[inline]
    fn set_bit(&mut self, pos: usize, on: bool) {
        let mask = 1u8 << (7 - pos % 8);
        if on {
            self.bytes[pos / 8] |= mask;
        } else {
            self.bytes[pos / 8] &= !mask;
        }
    }

    fn check_range(&self, field: &BitField) -> Result<()> {
        if field.end >= self.width {
            return Err(RcwError::FieldOutOfRange {
                name: field.name.clone(),
                end: field.end,
                size: self.width,
            });
        }
        Ok(())
    }

    /// OR `value` into the bits of `field`.
    ///
    /// Nothing is written when the value does not fit or the field lies
    /// outside the word.
    pub fn insert(&mut self, field: &BitField, value: &BigUint) -> Result<()> {
        self.check_range(field)?;

        let width = field.width();
        if value.bits() > width as u64 {
            return Err(RcwError::WidthOverflow {
                name: field.name.clone(),
                value: value.clone(),
                width,
            });
        }

        // Little-endian bytes: bit k of the value is bit k % 8 of byte k / 8
        for (i, byte) in value.to_bytes_le().into_iter().enumerate() {
            for j in 0..8usize {
                if (byte >> j) & 1 == 1 {
                    self.set_bit(field.end - (i * 8 + j), true);
                }
            }
        }
        Ok(())
    }

    /// Read the value stored in `field`
    pub fn extract(&self, field: &BitField) -> Result<BigUint> {
        self.check_range(field)?;

        let mut le = vec![0u8; (field.width() + 7) / 8];
        for k in (0..field.width()).filter(|&k| self.bit(field.end - k)) {
            le[k / 8] |= 1 << (k % 8);
        }
        Ok(BigUint::from_bytes_le(&le))
    }

    /// Clear every bit of `field`
    pub fn clear(&mut self, field: &BitField) -> Result<()> {
        self.check_range(field)?;

        for pos in field.begin..=field.end {
            self.set_bit(pos, false);
        }
        Ok(())
    }

    /// Positions of all set bits, MSB-first
    pub fn set_positions(&self) -> Vec<usize> {
        (0..self.width).filter(|&pos| self.bit(pos)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, begin: usize, end: usize) -> BitField {
        BitField::new(name, begin, end)
    }

    fn big(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn test_invalid_width() {
        assert!(BitWord::new(0).is_err());
        assert!(BitWord::new(12).is_err());
        assert!(BitWord::new(16).is_ok());
    }

    #[test]
    fn test_pack_nibbles() {
        let a = field("A", 0, 3);
        let b = field("B", 4, 7);
        let word = BitWord::pack(8, [(&a, &big(5)), (&b, &big(2))]).unwrap();
        assert_eq!(word.as_bytes(), &[0x52]);
    }

    #[test]
    fn test_insert_matches_shift() {
        // 0xABC at [4:15] of a 32-bit word == 0xABC << (31 - 15)
        let f = field("F", 4, 15);
        let mut word = BitWord::new(32).unwrap();
        word.insert(&f, &big(0xABC)).unwrap();
        assert_eq!(word.as_bytes(), &(0xABCu32 << 16).to_be_bytes());
    }

    #[test]
    fn test_insert_spanning_bytes() {
        let f = field("F", 6, 9);
        let mut word = BitWord::new(16).unwrap();
        word.insert(&f, &big(0b1111)).unwrap();
        assert_eq!(word.as_bytes(), &[0b0000_0011, 0b1100_0000]);
        assert_eq!(word.extract(&f).unwrap(), big(0b1111));
    }

    #[test]
    fn test_width_overflow() {
        let f = field("F", 0, 3);
        let mut word = BitWord::new(8).unwrap();
        let err = word.insert(&f, &big(16)).unwrap_err();
        assert_eq!(
            err,
            RcwError::WidthOverflow {
                name: "F".to_string(),
                value: big(16),
                width: 4
            }
        );
        assert!(word.is_zero());
    }

    #[test]
    fn test_full_64_bit_field() {
        let f = field("F", 0, 63);
        let mut word = BitWord::new(64).unwrap();
        word.insert(&f, &big(u64::MAX)).unwrap();
        assert_eq!(word.extract(&f).unwrap(), big(u64::MAX));
    }

    #[test]
    fn test_field_wider_than_64_bits() {
        // 100-bit field at [0:99] of a 128-bit word: its LSB is position 99
        let f = field("WIDE", 0, 99);
        let mut word = BitWord::new(128).unwrap();
        word.insert(&f, &big(1)).unwrap();
        assert_eq!(word.set_positions(), vec![99]);
        assert_eq!(word.as_bytes()[12], 0x10);
        assert_eq!(word.extract(&f).unwrap(), big(1));

        let top = BigUint::from(1u8) << 99u32;
        word.insert(&f, &top).unwrap();
        assert_eq!(word.set_positions(), vec![0, 99]);
        assert_eq!(word.extract(&f).unwrap(), top + 1u32);

        let too_big = BigUint::from(1u8) << 100u32;
        assert!(matches!(
            word.insert(&f, &too_big),
            Err(RcwError::WidthOverflow { width: 100, .. })
        ));
    }

    #[test]
    fn test_whole_word_field() {
        let f = field("ALL", 0, 255);
        let value = BigUint::from_bytes_be(&[0xA5; 32]);
        let mut word = BitWord::new(256).unwrap();
        word.insert(&f, &value).unwrap();
        assert_eq!(word.as_bytes(), &[0xA5; 32]);
        assert_eq!(word.extract(&f).unwrap(), value);
    }

    #[test]
    fn test_out_of_range() {
        let f = field("F", 6, 8);
        let mut word = BitWord::new(8).unwrap();
        assert!(matches!(
            word.insert(&f, &big(1)),
            Err(RcwError::FieldOutOfRange { end: 8, size: 8, .. })
        ));
        assert!(word.extract(&f).is_err());
    }

    #[test]
    fn test_clear_and_residual() {
        let mut word = BitWord::from_bytes(16, &[0xFF, 0x01]).unwrap();
        word.clear(&field("A", 0, 7)).unwrap();
        assert_eq!(word.set_positions(), vec![15]);
        word.clear(&field("B", 15, 15)).unwrap();
        assert!(word.is_zero());
    }

    #[test]
    fn test_from_bytes_short_buffer() {
        let word = BitWord::from_bytes(32, &[0x12, 0x34]).unwrap();
        assert_eq!(word.as_bytes(), &[0x00, 0x00, 0x12, 0x34]);
    }
}
