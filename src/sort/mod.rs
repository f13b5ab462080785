//! Sort Algorithm Set
//!
//! Comparison sorts reshaped into step producers. Each sorter is an
//! explicit state machine behind `Iterator<Item = Frame>`: it only works
//! toward the next mutation when the consumer asks for it, and the frame it
//! returns is the array right after that mutation.

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::BubbleSort;
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SortError};
use crate::model::{Element, Frame, Sequence};

/// The selectable sorting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Bubble,
    Insertion,
    Selection,
    Merge,
    Quick,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Insertion,
        Algorithm::Selection,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    /// Selector name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Insertion => "insertion",
            Algorithm::Selection => "selection",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }

    /// Human readable label for selectors
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
        }
    }

    pub fn next(&self) -> Algorithm {
        let i = self.position();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Algorithm {
        let i = self.position();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|a| a == self).unwrap_or(0)
    }

    /// Start a run over `seq`. The sequence is moved into the run, so every
    /// run works on its own copy.
    pub fn run(&self, seq: Sequence) -> FrameStream {
        let tracker = Tracker::new(seq);
        let inner: Box<dyn Iterator<Item = Frame> + Send> = match self {
            Algorithm::Bubble => Box::new(BubbleSort::new(tracker)),
            Algorithm::Insertion => Box::new(InsertionSort::new(tracker)),
            Algorithm::Selection => Box::new(SelectionSort::new(tracker)),
            Algorithm::Merge => Box::new(MergeSort::new(tracker)),
            Algorithm::Quick => Box::new(QuickSort::new(tracker)),
        };
        FrameStream { algorithm: *self, inner }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| SortError::UnknownAlgorithm(s.to_string()))
    }
}

/// Look up an algorithm by name and start a run over `seq`
pub fn run(algorithm_name: &str, seq: Sequence) -> Result<FrameStream> {
    let algorithm: Algorithm = algorithm_name.parse()?;
    Ok(algorithm.run(seq))
}

/// Lazy, finite, single-use stream of frames for one run
pub struct FrameStream {
    algorithm: Algorithm,
    inner: Box<dyn Iterator<Item = Frame> + Send>,
}

impl FrameStream {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Iterator for FrameStream {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.inner.next()
    }
}

impl fmt::Debug for FrameStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameStream")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// The array a sorter mutates, plus the frame counter
pub(crate) struct Tracker {
    elements: Vec<Element>,
    emitted: usize,
}

impl Tracker {
    pub(crate) fn new(seq: Sequence) -> Self {
        Self { elements: seq.into_elements(), emitted: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Magnitude at `i`; comparisons only ever look at this
    pub(crate) fn at(&self, i: usize) -> u32 {
        self.elements[i].magnitude
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    pub(crate) fn snapshot(&mut self) -> Frame {
        self.emitted += 1;
        Frame::new(self.emitted, self.elements.clone())
    }
}
