//! Insertion sort: the key walks left by adjacent swaps, one frame per
//! step. A key that is already in place produces no frame.

use super::Tracker;
use crate::model::Frame;

pub struct InsertionSort {
    tracker: Tracker,
    /// Index of the key currently being inserted (outer loop)
    key: usize,
    /// Where that key sits right now
    pos: usize,
}

impl InsertionSort {
    pub(crate) fn new(tracker: Tracker) -> Self {
        Self { tracker, key: 0, pos: 0 }
    }
}

impl Iterator for InsertionSort {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            let pos = self.pos;
            if pos > 0 && self.tracker.at(pos - 1) > self.tracker.at(pos) {
                self.tracker.swap(pos - 1, pos);
                self.pos -= 1;
                return Some(self.tracker.snapshot());
            }

            self.key += 1;
            if self.key >= self.tracker.len() {
                return None;
            }
            self.pos = self.key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;

    fn trace(input: &[u32]) -> Vec<Vec<u32>> {
        InsertionSort::new(Tracker::new(Sequence::from_magnitudes(input)))
            .map(|f| f.magnitudes())
            .collect()
    }

    #[test]
    fn test_shift_frames() {
        assert_eq!(
            trace(&[3, 1, 2]),
            vec![vec![1, 3, 2], vec![1, 2, 3]]
        );
    }

    #[test]
    fn test_sorted_input_is_silent() {
        assert!(trace(&[1, 2, 2, 7]).is_empty());
    }

    #[test]
    fn test_exhausted_stream_stays_exhausted() {
        let mut sorter = InsertionSort::new(Tracker::new(Sequence::from_magnitudes(&[2, 1])));
        assert!(sorter.next().is_some());
        assert!(sorter.next().is_none());
        assert!(sorter.next().is_none());
    }
}
