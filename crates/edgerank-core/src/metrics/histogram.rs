//! Degree distribution over a [`DegreeTable`].
//!
//! The histogram is dense: it has one bucket for every degree from 0 to the
//! largest observed degree, and buckets no node falls into are kept with a
//! count of 0 rather than omitted. Every node lands in exactly one bucket,
//! so the counts sum to the table's node count.

use serde::Serialize;

use crate::graph::degree::DegreeTable;
use crate::graph::slot;

/// Node counts per out-degree, indexed by degree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DegreeHistogram {
    counts: Vec<u64>,
}

impl DegreeHistogram {
    /// Bucket every node of `degrees` by its out-degree.
    ///
    /// An empty table yields an empty histogram.
    #[must_use]
    pub fn build(degrees: &DegreeTable) -> Self {
        let Some(max_degree) = degrees.max_degree() else {
            return Self::default();
        };

        let mut counts = vec![0_u64; slot(max_degree) + 1];
        for &d in degrees.as_slice() {
            counts[slot(d)] += 1;
        }
        Self { counts }
    }

    /// Number of nodes with exactly degree `d` (0 beyond the max).
    #[must_use]
    pub fn count(&self, degree: u64) -> u64 {
        usize::try_from(degree)
            .ok()
            .and_then(|i| self.counts.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Dense counts, `counts()[d]` = nodes with degree `d`.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Largest degree with a bucket, `None` when empty.
    #[must_use]
    pub fn max_degree(&self) -> Option<u64> {
        self.counts.len().checked_sub(1).map(|d| d as u64)
    }

    /// Sum of all buckets (the node count of the source table).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(degree, count)` pairs for every bucket, zero counts included.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(d, &count)| (d as u64, count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
