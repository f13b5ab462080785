//! Selection sort: one frame per swap that moves the minimum into place.

use super::Tracker;
use crate::model::Frame;

pub struct SelectionSort {
    tracker: Tracker,
    /// Next slot to fill
    i: usize,
}

impl SelectionSort {
    pub(crate) fn new(tracker: Tracker) -> Self {
        Self { tracker, i: 0 }
    }
}

impl Iterator for SelectionSort {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let n = self.tracker.len();
        while self.i + 1 < n {
            let i = self.i;
            self.i += 1;

            let mut min = i;
            for j in (i + 1)..n {
                if self.tracker.at(j) < self.tracker.at(min) {
                    min = j;
                }
            }
            if min != i {
                self.tracker.swap(i, min);
                return Some(self.tracker.snapshot());
            }
        }
        None
    }
}
