// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable item identifiers.

extern crate alloc;

use alloc::string::ToString;
use core::fmt;

use crate::label::Label;

/// Identifies a data item across recomputes.
///
/// `Label` identifiers survive reordering of the input array. `Index` identifiers are only
/// stable within one pass over the same input.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemId {
    /// Positional identifier (index into the input array).
    Index(usize),
    /// Label identifier (used when an explicit label order is configured).
    Label(Label),
}

impl ItemId {
    /// Feeds this identifier into a 64-bit FNV-1a hash.
    ///
    /// The hash is deterministic across runs and platforms, which keeps mark ids stable.
    pub fn fnv1a(&self, mut hash: u64) -> u64 {
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut feed = |bytes: &[u8]| {
            for b in bytes {
                hash ^= u64::from(*b);
                hash = hash.wrapping_mul(PRIME);
            }
        };
        match self {
            Self::Index(i) => {
                feed(b"i");
                feed(&(*i as u64).to_le_bytes());
            }
            Self::Label(l) => {
                feed(b"l");
                feed(l.to_string().as_bytes());
            }
        }
        hash
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Label(l) => write!(f, "{l}"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn hashes_distinguish_index_from_label() {
        let seed = 0xcbf2_9ce4_8422_2325;
        let a = ItemId::Index(1).fnv1a(seed);
        let b = ItemId::Label(Label::from("1")).fnv1a(seed);
        assert_ne!(a, b, "index 1 and label \"1\" must not collide");
        assert_eq!(a, ItemId::Index(1).fnv1a(seed));
    }
}
