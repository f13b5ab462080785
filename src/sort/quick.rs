//! Quick sort with a Lomuto partition around the last element.
//!
//! A partition in progress is kept as explicit state so the sorter can stop
//! after each swap. Pending ranges live on a stack with the left range on
//! top, so left partitions are always finished first.

use super::Tracker;
use crate::model::Frame;

struct Partition {
    lo: usize,
    hi: usize,
    /// Next slot for an element smaller than the pivot
    store: usize,
    /// Scan cursor
    j: usize,
}

pub struct QuickSort {
    tracker: Tracker,
    pending: Vec<(usize, usize)>,
    active: Option<Partition>,
}

impl QuickSort {
    pub(crate) fn new(tracker: Tracker) -> Self {
        let mut pending = Vec::new();
        if tracker.len() > 1 {
            pending.push((0, tracker.len() - 1));
        }
        Self { tracker, pending, active: None }
    }

    /// Queue both sides of a finished partition, left on top
    fn split(&mut self, lo: usize, pivot: usize, hi: usize) {
        if pivot + 1 < hi {
            self.pending.push((pivot + 1, hi));
        }
        if pivot > lo + 1 {
            self.pending.push((lo, pivot - 1));
        }
    }
}

impl Iterator for QuickSort {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            let Some(part) = self.active.as_mut() else {
                let (lo, hi) = self.pending.pop()?;
                self.active = Some(Partition { lo, hi, store: lo, j: lo });
                continue;
            };

            let pivot = self.tracker.at(part.hi);
            if part.j < part.hi {
                let j = part.j;
                part.j += 1;
                if self.tracker.at(j) < pivot {
                    let store = part.store;
                    part.store += 1;
                    if store != j {
                        self.tracker.swap(store, j);
                        return Some(self.tracker.snapshot());
                    }
                }
                continue;
            }

            let Partition { lo, hi, store, .. } = *part;
            self.active = None;
            self.split(lo, store, hi);
            // An equal element already in the pivot slot is a valid split point
            if self.tracker.at(store) != pivot {
                self.tracker.swap(store, hi);
                return Some(self.tracker.snapshot());
            }
        }
    }
}
