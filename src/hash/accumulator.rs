//! QuickXorHash accumulator
//!
//! Input is folded into a 160-byte buffer: the byte at stream position `p`
//! is XORed into buffer position `p % 160`. Finalization spreads the buffer
//! across eight 160-bit blocks, rotates block `k` left by `k` bits, XORs
//! them together, reverses byte order and mixes in the total length.

use super::block::{Block, BLOCK_BYTES};
use super::digest::Digest;
use std::io::{self, Read};

/// Number of working blocks the accumulator is spread across
const WORKING_BLOCKS: usize = 8;

/// Bytes folded per window (8 x 160 bits)
pub const WINDOW_BYTES: usize = BLOCK_BYTES * WORKING_BLOCKS;

/// Stride of the redistribution permutation
const SHIFT: usize = 11;

/// Default read size for [`hash_reader`]
pub const DEFAULT_READ_SIZE: usize = 64 * 1024;

/// Streaming QuickXorHash state
///
/// The result depends only on the bytes fed in and their total count, not
/// on how they were split across [`update`](Self::update) calls.
#[derive(Debug, Clone)]
pub struct QuickXorHasher {
    data: [u8; WINDOW_BYTES],
    position: usize,
    count: u64,
}

impl QuickXorHasher {
    /// Create an empty hasher
    pub fn new() -> Self {
        Self {
            data: [0; WINDOW_BYTES],
            position: 0,
            count: 0,
        }
    }

    /// Fold more input into the accumulator
    pub fn update(&mut self, mut input: &[u8]) {
        self.count = self.count.wrapping_add(input.len() as u64);

        while !input.is_empty() {
            let take = (WINDOW_BYTES - self.position).min(input.len());
            let window = &mut self.data[self.position..self.position + take];
            for (dest, src) in window.iter_mut().zip(&input[..take]) {
                *dest ^= src;
            }
            self.position = (self.position + take) % WINDOW_BYTES;
            input = &input[take..];
        }
    }

    /// Bytes consumed so far
    pub fn bytes_processed(&self) -> u64 {
        self.count
    }

    /// Clear all state for reuse
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Produce the digest, consuming the hasher
    pub fn finalize(self) -> Digest {
        let mut blocks = [[0u8; BLOCK_BYTES]; WORKING_BLOCKS];
        for (i, &byte) in self.data.iter().enumerate() {
            let m = (i * SHIFT) % WINDOW_BYTES;
            blocks[m % WORKING_BLOCKS][m / WORKING_BLOCKS] = byte;
        }

        let mut combined = Block::from_bytes(blocks[0]);
        for (k, bytes) in blocks.iter().enumerate().skip(1) {
            combined ^= Block::from_bytes(*bytes).rotate_left(k as u32);
        }

        Digest::from_block(combined.reverse_bytes() ^ length_block(self.count))
    }
}

impl Default for QuickXorHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for QuickXorHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Length block mixed into the reversed result.
///
/// The count lands big-endian in offsets 0..8, so the rendered digest
/// carries it little-endian in its last eight bytes.
fn length_block(count: u64) -> Block {
    Block::from_length_extend(count.swap_bytes())
}

/// Hash an in-memory slice
pub fn hash_slice(data: &[u8]) -> Digest {
    let mut hasher = QuickXorHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything `reader` yields until end of stream
pub fn hash_reader<R: Read>(reader: R) -> io::Result<Digest> {
    hash_reader_with_buffer(reader, DEFAULT_READ_SIZE).map(|(digest, _)| digest)
}

/// Hash a reader with a custom read size, returning the digest and byte count.
///
/// Any read error other than `Interrupted` aborts; no digest is produced
/// for a partially read stream.
pub fn hash_reader_with_buffer<R: Read>(
    mut reader: R,
    buffer_size: usize,
) -> io::Result<(Digest, u64)> {
    let mut hasher = QuickXorHasher::new();
    let mut buffer = vec![0u8; buffer_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
    }

    let count = hasher.bytes_processed();
    Ok((hasher.finalize(), count))
}
