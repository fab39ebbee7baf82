//! 160-bit block arithmetic
//!
//! A [`Block`] is the unit of QuickXorHash state and of the final digest.
//! Byte index 0 is the least-significant byte: rotations carry bits from
//! index `i` into index `i + 1`, and the carry out of index 19 wraps into
//! index 0.

use std::ops::{BitXor, BitXorAssign};

/// Width of a block in bytes
pub const BLOCK_BYTES: usize = 20;

/// Width of a block in bits
pub const BLOCK_BITS: u32 = (BLOCK_BYTES * 8) as u32;

/// Fixed-width 160-bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block([u8; BLOCK_BYTES]);

impl Block {
    /// Block with every bit cleared
    pub const fn zero() -> Self {
        Self([0; BLOCK_BYTES])
    }

    /// Wrap raw bytes, index 0 least significant
    pub const fn from_bytes(bytes: [u8; BLOCK_BYTES]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; BLOCK_BYTES] {
        &self.0
    }

    /// Consume the block, returning its raw bytes
    pub fn into_bytes(self) -> [u8; BLOCK_BYTES] {
        self.0
    }

    /// Block whose least-significant byte is `byte`, all other bits zero
    pub fn from_byte_extend(byte: u8) -> Self {
        let mut block = Self::zero();
        block.0[0] = byte;
        block
    }

    /// Block holding `value` little-endian in its eight least-significant bytes
    pub fn from_length_extend(value: u64) -> Self {
        let mut block = Self::zero();
        block.0[..8].copy_from_slice(&value.to_le_bytes());
        block
    }

    /// Circular left rotation over all 160 bits.
    ///
    /// Shift amounts are reduced modulo 160, so whole-byte moves and
    /// full-width rotations behave like repeated single-bit rotations.
    pub fn rotate_left(&self, bits: u32) -> Self {
        let bits = bits % BLOCK_BITS;
        let byte_shift = (bits / 8) as usize;
        let bit_shift = bits % 8;

        let mut out = [0u8; BLOCK_BYTES];
        for (i, &byte) in self.0.iter().enumerate() {
            out[(i + byte_shift) % BLOCK_BYTES] = byte;
        }

        if bit_shift != 0 {
            let mut carry = out[BLOCK_BYTES - 1] >> (8 - bit_shift);
            for byte in out.iter_mut() {
                let next = *byte >> (8 - bit_shift);
                *byte = (*byte << bit_shift) | carry;
                carry = next;
            }
        }

        Self(out)
    }

    /// Block with byte order reversed (byte 0 <-> byte 19)
    pub fn reverse_bytes(&self) -> Self {
        let mut out = self.0;
        out.reverse();
        Self(out)
    }

    /// Byte-wise XOR of two blocks
    pub fn xor(&self, other: &Block) -> Self {
        let mut out = self.0;
        for (dest, src) in out.iter_mut().zip(other.0.iter()) {
            *dest ^= src;
        }
        Self(out)
    }

    /// True if every bit is clear
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl BitXor for Block {
    type Output = Block;

    fn bitxor(self, rhs: Block) -> Block {
        self.xor(&rhs)
    }
}

impl BitXorAssign for Block {
    fn bitxor_assign(&mut self, rhs: Block) {
        *self = self.xor(&rhs);
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; BLOCK_BYTES]> for Block {
    fn from(bytes: [u8; BLOCK_BYTES]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Block {
        let mut bytes = [0u8; BLOCK_BYTES];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        Block::from_bytes(bytes)
    }

    fn popcount(block: &Block) -> u32 {
        block.as_bytes().iter().map(|b| b.count_ones()).sum()
    }

    #[test]
    fn test_zero() {
        assert!(Block::zero().is_zero());
        assert_eq!(Block::zero(), Block::default());
    }

    #[test]
    fn test_rotate_single_bit_carries_to_next_byte() {
        let block = Block::from_byte_extend(0x80);
        let rotated = block.rotate_left(1);

        let mut expected = [0u8; BLOCK_BYTES];
        expected[1] = 0x01;
        assert_eq!(rotated.into_bytes(), expected);
    }

    #[test]
    fn test_rotate_wraps_last_byte_into_first() {
        let mut bytes = [0u8; BLOCK_BYTES];
        bytes[19] = 0xC0;
        let rotated = Block::from_bytes(bytes).rotate_left(2);

        let mut expected = [0u8; BLOCK_BYTES];
        expected[0] = 0x03;
        assert_eq!(rotated.into_bytes(), expected);
    }

    #[test]
    fn test_rotate_is_not_per_byte() {
        // 0xFF shifted by 4 straddles two bytes
        let rotated = Block::from_byte_extend(0xFF).rotate_left(4);
        assert_eq!(rotated.as_bytes()[0], 0xF0);
        assert_eq!(rotated.as_bytes()[1], 0x0F);
    }

    #[test]
    fn test_rotate_whole_bytes() {
        let block = Block::from_byte_extend(0xAB);
        let rotated = block.rotate_left(8 * 5);
        assert_eq!(rotated.as_bytes()[5], 0xAB);
        assert_eq!(popcount(&rotated), popcount(&block));

        let wrapped = block.rotate_left(8 * 19 + 8);
        assert_eq!(wrapped, block);
    }

    #[test]
    fn test_rotate_modulo_full_width() {
        let block = sample();
        assert_eq!(block.rotate_left(0), block);
        assert_eq!(block.rotate_left(BLOCK_BITS), block);
        assert_eq!(block.rotate_left(BLOCK_BITS + 13), block.rotate_left(13));
    }

    #[test]
    fn test_rotate_composes() {
        let block = sample();
        for (a, b) in [(1, 7), (3, 9), (5, 150), (77, 83)] {
            assert_eq!(
                block.rotate_left(a).rotate_left(b),
                block.rotate_left(a + b),
                "rotate {} then {}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_repeated_single_bit_rotation() {
        let block = sample();
        let mut stepped = block;
        for _ in 0..23 {
            stepped = stepped.rotate_left(1);
        }
        assert_eq!(stepped, block.rotate_left(23));
        assert_eq!(popcount(&stepped), popcount(&block));
    }

    #[test]
    fn test_reverse_bytes() {
        let block = sample();
        let reversed = block.reverse_bytes();
        assert_eq!(reversed.as_bytes()[0], block.as_bytes()[19]);
        assert_eq!(reversed.as_bytes()[19], block.as_bytes()[0]);
        assert_eq!(reversed.reverse_bytes(), block);
    }

    #[test]
    fn test_xor() {
        let a = sample();
        let b = sample().rotate_left(5);

        assert!(a.xor(&a).is_zero());
        assert_eq!(a.xor(&Block::zero()), a);
        assert_eq!(a ^ b, b ^ a);

        let mut c = a;
        c ^= b;
        c ^= b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_extend_constructors() {
        let byte = Block::from_byte_extend(0x5A);
        assert_eq!(byte.as_bytes()[0], 0x5A);
        assert!(byte.as_bytes()[1..].iter().all(|&b| b == 0));

        let length = Block::from_length_extend(0x0102_0304_0506_0708);
        assert_eq!(
            &length.as_bytes()[..8],
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
        assert!(length.as_bytes()[8..].iter().all(|&b| b == 0));
    }
}
