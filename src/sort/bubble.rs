//! Bubble sort: one frame per adjacent swap.

use super::Tracker;
use crate::model::Frame;

pub struct BubbleSort {
    tracker: Tracker,
    /// Completed outer passes; the last `pass` slots are final
    pass: usize,
    /// Left index of the next adjacent pair to compare
    j: usize,
}

impl BubbleSort {
    pub(crate) fn new(tracker: Tracker) -> Self {
        Self { tracker, pass: 0, j: 0 }
    }
}

impl Iterator for BubbleSort {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let n = self.tracker.len();
        while self.pass < n {
            if self.j + 1 >= n - self.pass {
                self.pass += 1;
                self.j = 0;
                continue;
            }
            let j = self.j;
            self.j += 1;
            if self.tracker.at(j) > self.tracker.at(j + 1) {
                self.tracker.swap(j, j + 1);
                return Some(self.tracker.snapshot());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;

    fn trace(input: &[u32]) -> Vec<Vec<u32>> {
        BubbleSort::new(Tracker::new(Sequence::from_magnitudes(input)))
            .map(|f| f.magnitudes())
            .collect()
    }

    #[test]
    fn test_two_elements() {
        assert_eq!(trace(&[2, 1]), vec![vec![1, 2]]);
        assert!(trace(&[1, 2]).is_empty());
    }

    #[test]
    fn test_equal_neighbours_are_not_swapped() {
        assert!(trace(&[4, 4, 4]).is_empty());
        assert_eq!(trace(&[5, 4, 4]), vec![vec![4, 5, 4], vec![4, 4, 5]]);
    }
}
