//! Data Model
//!
//! Elements, sequences and the frames a run emits while sorting them.
//! An element owns its display color, so colors always travel with their
//! magnitude when the order changes.

pub mod generator;

pub use generator::{generate, generate_with, MAX_MAGNITUDE, MIN_MAGNITUDE};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SortError;

/// Opaque display color, rendered as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Deterministic color for a position, used when no RNG is involved
    pub fn for_index(index: usize) -> Self {
        // Spread hues with a multiplicative hash so neighbours differ
        let h = (index as u32).wrapping_mul(0x9E37_79B9);
        Self::rgb((h >> 24) as u8, (h >> 16) as u8, (h >> 8) as u8)
    }

    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let bytes = hex::decode(digits)
            .map_err(|e| SortError::Config(format!("invalid color '{}': {}", s, e)))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err(SortError::Config(format!("invalid color '{}': expected 6 hex digits", s))),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One bar of the animation: a magnitude and the color bound to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub magnitude: u32,
    pub color: Color,
}

impl Element {
    pub fn new(magnitude: u32, color: Color) -> Self {
        Self { magnitude, color }
    }
}

/// Fixed-length list of elements for one run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    elements: Vec<Element>,
}

impl Sequence {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Build a sequence from bare magnitudes, coloring by position
    pub fn from_magnitudes(magnitudes: &[u32]) -> Self {
        let elements = magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| Element::new(m, Color::for_index(i)))
            .collect();
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn magnitudes(&self) -> Vec<u32> {
        self.elements.iter().map(|e| e.magnitude).collect()
    }

    /// Ascending by magnitude
    pub fn is_sorted(&self) -> bool {
        is_sorted_by_magnitude(&self.elements)
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl From<Vec<Element>> for Sequence {
    fn from(elements: Vec<Element>) -> Self {
        Self::new(elements)
    }
}

impl From<Frame> for Sequence {
    fn from(frame: Frame) -> Self {
        Self::new(frame.elements)
    }
}

/// Immutable snapshot of the element order at one point of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    step: usize,
    elements: Vec<Element>,
}

impl Frame {
    pub(crate) fn new(step: usize, elements: Vec<Element>) -> Self {
        Self { step, elements }
    }

    /// 1-based position of this frame within its run
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn magnitudes(&self) -> Vec<u32> {
        self.elements.iter().map(|e| e.magnitude).collect()
    }

    pub fn is_sorted(&self) -> bool {
        is_sorted_by_magnitude(&self.elements)
    }

    /// True when both hold exactly the same elements, in any order
    pub fn is_permutation_of(&self, seq: &Sequence) -> bool {
        if self.elements.len() != seq.len() {
            return false;
        }
        let mut ours = self.elements.clone();
        let mut theirs = seq.elements().to_vec();
        let key = |e: &Element| (e.magnitude, e.color.r, e.color.g, e.color.b);
        ours.sort_by_key(key);
        theirs.sort_by_key(key);
        ours == theirs
    }
}

fn is_sorted_by_magnitude(elements: &[Element]) -> bool {
    elements.windows(2).all(|w| w[0].magnitude <= w[1].magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::rgb(0x0A, 0xFF, 0x3C);
        assert_eq!(color.to_string(), "#0AFF3C");
        assert_eq!("#0aff3c".parse::<Color>().unwrap(), color);
        assert!("#12345".parse::<Color>().is_err());
        assert!("#1234567z".parse::<Color>().is_err());
    }

    #[test]
    fn test_from_magnitudes_keeps_order() {
        let seq = Sequence::from_magnitudes(&[5, 3, 4, 1]);
        assert_eq!(seq.magnitudes(), vec![5, 3, 4, 1]);
        assert!(!seq.is_sorted());
        assert!(Sequence::from_magnitudes(&[1, 1, 2]).is_sorted());
    }

    #[test]
    fn test_permutation_tracks_colors() {
        let seq = Sequence::from_magnitudes(&[2, 2]);
        let swapped = Frame::new(1, vec![seq.elements()[1], seq.elements()[0]]);
        assert!(swapped.is_permutation_of(&seq));

        let forged = Frame::new(1, vec![seq.elements()[0], seq.elements()[0]]);
        assert!(!forged.is_permutation_of(&seq));
    }

    #[test]
    fn test_frame_serializes_hex_colors() {
        let frame = Frame::new(3, vec![Element::new(7, Color::rgb(1, 2, 3))]);
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r##"{"step":3,"elements":[{"magnitude":7,"color":"#010203"}]}"##);
    }
}
