//! Board fingerprinting.
//!
//! Boards are hashed with the SDBM string hash, which is order sensitive and
//! cheap for the short byte strings a board is made of. Equality of the
//! full board remains authoritative; two boards with the same fingerprint
//! are still distinct states.
//!
//! The 32-bit SDBM value is spread over 64 bits before it reaches the hash
//! table, which takes its control bits from the top of the hash.

use std::hash::{BuildHasherDefault, Hasher};

/// Rolling SDBM hash: `hash = byte + (hash << 6) + (hash << 16) - hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdbmHasher {
    hash: u32,
}

/// Fibonacci hashing multiplier, `2^64 / phi` rounded to odd.
const SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

impl Hasher for SdbmHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash = u32::from(byte)
                .wrapping_add(self.hash << 6)
                .wrapping_add(self.hash << 16)
                .wrapping_sub(self.hash);
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.hash).wrapping_mul(SPREAD)
    }
}

pub type SdbmBuildHasher = BuildHasherDefault<SdbmHasher>;

/// Plain SDBM value of a raw tile sequence, before spreading.
#[cfg(test)]
fn fingerprint(tiles: &[u8]) -> u32 {
    let mut hasher = SdbmHasher::default();
    hasher.write(tiles);
    hasher.hash
}
