//! Precomputed 256-entry lookup tables for per-byte decisions.
//!
//! Compiling calls the decision function exactly once for every byte value,
//! in ascending order, and never again. The function must therefore be
//! pure: a stateful predicate or map compiles without complaint, but the
//! table only captures whatever it answered during compilation.

use std::fmt;

lazy_static! {
    static ref ASCII_GRAPHIC: FilterTable =
        FilterTable::compile(|b: u8| b.is_ascii_graphic());
}

/// Decides whether a byte is retained by a filter.
pub trait BytePredicate {
    fn retain(&mut self, byte: u8) -> bool;
}

/// Replaces a byte with another byte.
pub trait ByteMap {
    fn map(&mut self, byte: u8) -> u8;
}

impl<F: FnMut(u8) -> bool> BytePredicate for F {
    fn retain(&mut self, byte: u8) -> bool {
        self(byte)
    }
}

impl<F: FnMut(u8) -> u8> ByteMap for F {
    fn map(&mut self, byte: u8) -> u8 {
        self(byte)
    }
}

/// Compiled form of a [`BytePredicate`].
#[derive(Clone, PartialEq, Eq)]
pub struct FilterTable {
    retained: [bool; 256],
}

impl FilterTable {
    pub fn compile(mut predicate: impl BytePredicate) -> Self {
        let mut retained = [false; 256];
        for (byte, slot) in retained.iter_mut().enumerate() {
            *slot = predicate.retain(byte as u8);
        }
        FilterTable { retained }
    }

    /// Retains printable ASCII and drops whitespace, control and non-ASCII
    /// bytes. Compiled once per process.
    pub fn ascii_graphic() -> Self {
        ASCII_GRAPHIC.clone()
    }

    #[inline]
    pub fn retains(&self, byte: u8) -> bool {
        self.retained[byte as usize]
    }

    /// Number of byte values the table retains.
    pub fn retained_count(&self) -> usize {
        self.retained.iter().filter(|r| **r).count()
    }
}

impl BytePredicate for FilterTable {
    #[inline]
    fn retain(&mut self, byte: u8) -> bool {
        self.retains(byte)
    }
}

impl fmt::Debug for FilterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTable")
            .field("retained", &self.retained_count())
            .finish()
    }
}

/// Compiled form of a [`ByteMap`].
#[derive(Clone, PartialEq, Eq)]
pub struct MapTable {
    mapping: [u8; 256],
}

impl MapTable {
    pub fn compile(mut map: impl ByteMap) -> Self {
        let mut mapping = [0u8; 256];
        for (byte, slot) in mapping.iter_mut().enumerate() {
            *slot = map.map(byte as u8);
        }
        MapTable { mapping }
    }

    #[inline]
    pub fn get(&self, byte: u8) -> u8 {
        self.mapping[byte as usize]
    }

    /// Whether every byte maps to itself.
    pub fn is_identity(&self) -> bool {
        self.mapping
            .iter()
            .enumerate()
            .all(|(byte, mapped)| byte as u8 == *mapped)
    }
}

impl ByteMap for MapTable {
    #[inline]
    fn map(&mut self, byte: u8) -> u8 {
        self.get(byte)
    }
}

impl fmt::Debug for MapTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapTable")
            .field("identity", &self.is_identity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn compile_visits_every_byte_once_in_order() {
        let mut seen = Vec::new();
        let table = FilterTable::compile(|b: u8| {
            seen.push(b);
            b % 2 == 0
        });
        assert_eq!(seen, (0..=255).collect::<Vec<u8>>());
        assert_eq!(table.retained_count(), 128);
    }

    #[test]
    fn stateful_map_is_frozen_at_compile_time() {
        let mut calls = 0u8;
        let mut table = MapTable::compile(|_: u8| {
            calls = calls.wrapping_add(1);
            calls
        });
        // Byte 0 was the first call; lookups never invoke the function again.
        assert_eq!(table.map(0), 1);
        assert_eq!(table.map(0), 1);
        assert_eq!(table.map(255), 0);
    }

    #[test]
    fn ascii_graphic_drops_whitespace() {
        let table = FilterTable::ascii_graphic();
        assert!(table.retains(b'a'));
        assert!(table.retains(b'~'));
        assert!(!table.retains(b' '));
        assert!(!table.retains(b'\n'));
        assert!(!table.retains(0x80));
        assert_eq!(table.retained_count(), 94);
    }

    #[test]
    fn identity_detection() {
        assert!(MapTable::compile(|b: u8| b).is_identity());
        let upper = MapTable::compile(|b: u8| b.to_ascii_uppercase());
        assert!(!upper.is_identity());
    }

    #[quickcheck]
    fn compiled_filter_matches_predicate(modulus: u8, offset: u8) -> bool {
        let modulus = modulus.max(1);
        let predicate = |b: u8| b.wrapping_add(offset) % modulus == 0;
        let mut table = FilterTable::compile(predicate);
        (0..=255u8).all(|b| table.retain(b) == predicate(b))
    }

    #[quickcheck]
    fn compiled_map_matches_function(xor: u8, rotate: u32) -> bool {
        let function = |b: u8| (b ^ xor).rotate_left(rotate % 8);
        let mut table = MapTable::compile(function);
        (0..=255u8).all(|b| table.map(b) == function(b))
    }
}
