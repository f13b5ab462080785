//! Top-down merge sort.
//!
//! The recursion is unrolled onto an explicit stack so the sorter can stop
//! after every merge. Ranges are inclusive, the left half is `lo..=mid`, and
//! the left subtree finishes (frames included) before the right one starts.
//! One frame is produced per merge whose range actually changed.

use super::Tracker;
use crate::model::Frame;

enum Task {
    Split { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

pub struct MergeSort {
    tracker: Tracker,
    stack: Vec<Task>,
}

impl MergeSort {
    pub(crate) fn new(tracker: Tracker) -> Self {
        let mut stack = Vec::new();
        if tracker.len() > 1 {
            stack.push(Task::Split { lo: 0, hi: tracker.len() - 1 });
        }
        Self { tracker, stack }
    }

    /// Merge `lo..=mid` with `mid+1..=hi`; returns whether anything moved
    fn merge(&mut self, lo: usize, mid: usize, hi: usize) -> bool {
        let slice = &mut self.tracker.elements_mut()[lo..=hi];
        let split = mid - lo + 1;
        let left = slice[..split].to_vec();
        let right = slice[split..].to_vec();

        let (mut i, mut j) = (0, 0);
        let mut changed = false;
        for slot in slice.iter_mut() {
            let take_left = j >= right.len()
                || (i < left.len() && left[i].magnitude <= right[j].magnitude);
            let next = if take_left {
                i += 1;
                left[i - 1]
            } else {
                j += 1;
                right[j - 1]
            };
            changed |= *slot != next;
            *slot = next;
        }
        changed
    }
}

impl Iterator for MergeSort {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Split { lo, hi } => {
                    if lo >= hi {
                        continue;
                    }
                    let mid = lo + (hi - lo) / 2;
                    self.stack.push(Task::Merge { lo, mid, hi });
                    self.stack.push(Task::Split { lo: mid + 1, hi });
                    self.stack.push(Task::Split { lo, hi: mid });
                }
                Task::Merge { lo, mid, hi } => {
                    if self.merge(lo, mid, hi) {
                        return Some(self.tracker.snapshot());
                    }
                }
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
        MergeSort::new(Tracker::new(Sequence::from_magnitudes(input)))
            .map(|f| f.magnitudes())
            .collect()
    }

    #[test]
    fn test_left_subtree_first() {
        assert_eq!(
            trace(&[4, 3, 2, 1]),
            vec![vec![3, 4, 2, 1], vec![3, 4, 1, 2], vec![1, 2, 3, 4]]
        );
    }

    #[test]
    fn test_unchanged_merges_are_silent() {
        assert!(trace(&[1, 2, 3, 4, 5]).is_empty());
        assert_eq!(trace(&[1, 2, 4, 3]), vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_equal_magnitudes_keep_left_first() {
        let seq = Sequence::from_magnitudes(&[2, 1, 2]);
        let first = seq.elements()[0].color;
        let frames: Vec<Frame> = MergeSort::new(Tracker::new(seq)).collect();
        let last = frames.last().unwrap();
        assert_eq!(last.magnitudes(), vec![1, 2, 2]);
        assert_eq!(last.elements()[1].color, first);
    }
}
