// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Zero-copy access to little-endian `f32` arrays embedded in a byte blob.
//!
//! Model weights are read straight out of the blob, which carries no
//! alignment guarantee, so elements are decoded one at a time instead of
//! reinterpreting the bytes as `&[f32]`.

/// A borrowed array of little-endian `f32` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedF32<'a> {
    bytes: &'a [u8],
}

impl<'a> PackedF32<'a> {
    /// Wraps `bytes`, returning `None` if the length is not a multiple of 4.
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        Some(Self { bytes })
    }

    /// An empty array.
    pub fn empty() -> Self {
        Self { bytes: &[] }
    }

    /// Number of `f32` elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / 4
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns element `index`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        let start = index.checked_mul(4)?;
        let chunk = self.bytes.get(start..start + 4)?;
        Some(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    /// Returns the sub-array `[start, start + len)`, or `None` if out of bounds.
    pub fn slice(&self, start: usize, len: usize) -> Option<PackedF32<'a>> {
        let from = start.checked_mul(4)?;
        let to = from.checked_add(len.checked_mul(4)?)?;
        self.bytes.get(from..to).map(|bytes| PackedF32 { bytes })
    }

    /// Iterates over the decoded values.
    pub fn iter(&self) -> impl Iterator<Item = f32> + 'a {
        self.bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode() {
        let bytes = encode(&[1.0, -2.5, 3.25]);
        let p = PackedF32::new(&bytes).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.get(1), Some(-2.5));
        assert_eq!(p.get(3), None);
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![1.0, -2.5, 3.25]);
    }

    #[test]
    fn test_unaligned_source() {
        let mut bytes = vec![0xAAu8];
        bytes.extend(encode(&[7.0, 8.0]));
        let p = PackedF32::new(&bytes[1..]).unwrap();
        assert_eq!(p.get(0), Some(7.0));
        assert_eq!(p.get(1), Some(8.0));
    }

    #[test]
    fn test_rejects_partial_element() {
        assert!(PackedF32::new(&[0u8; 5]).is_none());
    }

    #[test]
    fn test_slice() {
        let bytes = encode(&[1.0, 2.0, 3.0, 4.0]);
        let p = PackedF32::new(&bytes).unwrap();
        let row = p.slice(2, 2).unwrap();
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert!(p.slice(3, 2).is_none());
        assert!(PackedF32::empty().is_empty());
    }
}
