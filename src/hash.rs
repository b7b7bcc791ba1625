//! Hashers used by this crate's hash-based containers.
//!
//! `derive-c` threads a `KEY_HASH` collaborator through every hash container
//! template; idiomatic Rust already has a collaborator shaped exactly like
//! that, `core::hash::BuildHasher`, so every map/set in
//! [`crate::collections`] is generic over one instead of hard-coding a
//! single hash function. This module supplies the two concrete hashers
//! `derive-c` ships: a MurmurHash3-based general-purpose hasher, and an
//! identity hasher for keys that are already well-distributed integers.

use core::hash::{BuildHasher, Hasher};

/// [MurmurHash3](https://github.com/aappleby/smhasher)'s 64-bit finalizer
/// (`fmix64`), applied to bytes fed to the hasher via its internal
/// accumulator. This is the default hasher for every map and set in this
/// crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MurmurHasher {
    state: u64,
}

const MURMUR_SEED: u64 = 0x9747_b28c;

impl MurmurHasher {
    /// Creates a hasher seeded the way `derive-c`'s `dc_murmur_hash_string`
    /// seeds its accumulator.
    pub fn new() -> Self {
        MurmurHasher { state: MURMUR_SEED }
    }

    #[inline]
    fn fmix64(mut k: u64) -> u64 {
        k ^= k >> 33;
        k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
        k ^= k >> 33;
        k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        k ^= k >> 33;
        k
    }
}

impl Hasher for MurmurHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // Fold the byte string into the accumulator eight bytes at a time,
        // finalizing each block with the same `fmix64` avalanche used for
        // whole 64-bit integer keys, then mixing the block hash into state.
        let mut chunks = bytes.chunks_exact(8);
        for chunk in &mut chunks {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            let block = u64::from_le_bytes(buf);
            self.state = Self::fmix64(self.state ^ Self::fmix64(block));
        }
        let rem = chunks.remainder();
        if !rem.is_empty() {
            let mut buf = [0u8; 8];
            buf[..rem.len()].copy_from_slice(rem);
            let tail = u64::from_le_bytes(buf) ^ (rem.len() as u64);
            self.state = Self::fmix64(self.state ^ Self::fmix64(tail));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.write_u64(i as u64);
    }
    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.write_u64(i as u64);
    }
    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.write_u64(i as u64);
    }
    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.state = Self::fmix64(self.state ^ Self::fmix64(i));
    }
    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }
    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// `BuildHasher` for [`MurmurHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MurmurBuildHasher;

impl BuildHasher for MurmurBuildHasher {
    type Hasher = MurmurHasher;

    #[inline]
    fn build_hasher(&self) -> MurmurHasher {
        MurmurHasher::new()
    }
}

/// A hasher that passes an already-hashed (or otherwise well-distributed)
/// integer key straight through, avalanching it with one `fmix64` round so
/// that poor bit-distribution in the low bits (e.g. sequential keys) still
/// spreads across a hash table's buckets.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHasher {
    state: u64,
}

impl Hasher for IdentityHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut buf = [0u8; 8];
        let n = bytes.len().min(8);
        buf[..n].copy_from_slice(&bytes[..n]);
        self.state = u64::from_le_bytes(buf);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.state = i;
    }
    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.state = i as u64;
    }

    #[inline]
    fn finish(&self) -> u64 {
        MurmurHasher::fmix64(self.state)
    }
}

/// `BuildHasher` for [`IdentityHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityBuildHasher;

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;

    #[inline]
    fn build_hasher(&self) -> IdentityHasher {
        IdentityHasher::default()
    }
}
