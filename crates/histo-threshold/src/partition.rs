//! K-way optimal partition of a histogram (Liao, Chen and Chung, 2001)
//!
//! Maximizes `sum over classes of S^2 / P`, where `P` is the class count and
//! `S` its first moment in bin units. For two classes this is the Otsu
//! criterion.

use histo_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest histogram the partition search accepts
pub const MAX_PARTITION_BINS: usize = 8192;

/// Search strategy over cut positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionSearch {
    /// Backtracking over every cut combination, exponential in the class count
    Exhaustive,
    /// Memoized search over class prefixes, `O(K * bins^2)`
    #[default]
    Dynamic,
}

/// Cut positions of an optimal partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Last bin of each class except the top one, increasing
    pub cuts: Vec<usize>,
    /// Value of the maximized criterion
    pub objective: f64,
}

/// Segment sums `P[i][j]` and `S[i][j]` for any bin range
///
/// Both are answered from running sums, so `H[i][j] = S^2 / P` is available
/// for every `i <= j` without storing the full matrices.
#[derive(Debug, Clone)]
pub struct SegmentTable {
    count: Vec<f64>,
    moment: Vec<f64>,
}

impl SegmentTable {
    pub fn new(counts: &[u64]) -> Self {
        let mut count = Vec::with_capacity(counts.len() + 1);
        let mut moment = Vec::with_capacity(counts.len() + 1);
        count.push(0.0);
        moment.push(0.0);
        let (mut p, mut s) = (0.0, 0.0);
        for (k, &h) in counts.iter().enumerate() {
            p += h as f64;
            s += k as f64 * h as f64;
            count.push(p);
            moment.push(s);
        }
        Self { count, moment }
    }

    pub fn bins(&self) -> usize {
        self.count.len() - 1
    }

    /// `P[i][j]`, the count over bins `i..=j`
    pub fn count(&self, i: usize, j: usize) -> f64 {
        self.count[j + 1] - self.count[i]
    }

    /// `S[i][j]`, the first moment over bins `i..=j`
    pub fn moment(&self, i: usize, j: usize) -> f64 {
        self.moment[j + 1] - self.moment[i]
    }

    /// `H[i][j] = S^2 / P`, zero for an empty segment
    pub fn score(&self, i: usize, j: usize) -> f64 {
        let p = self.count(i, j);
        if p > 0.0 {
            let s = self.moment(i, j);
            s * s / p
        } else {
            0.0
        }
    }
}

/// Split the histogram into `classes` contiguous classes.
///
/// Cuts satisfy `0 < t1 < ... < t(K-1) < bins - 1`: the lowest class always
/// takes bin 0 and at least one more, every other class at least one bin.
/// Among equal objectives the later cut position is kept.
pub fn optimal_partition(counts: &[u64], classes: usize, search: PartitionSearch) -> Result<Partition> {
    let bins = counts.len();
    if classes < 2 {
        return Err(Error::InvalidParameter(format!(
            "number of classes must be at least 2, got {classes}"
        )));
    }
    if classes >= bins {
        return Err(Error::InvalidParameter(format!(
            "cannot split {bins} bins into {classes} classes, at most {} allowed",
            bins.saturating_sub(1)
        )));
    }
    if bins > MAX_PARTITION_BINS {
        return Err(Error::InvalidParameter(format!(
            "partition search supports at most {MAX_PARTITION_BINS} bins, got {bins}"
        )));
    }

    let table = SegmentTable::new(counts);
    let partition = match search {
        PartitionSearch::Exhaustive => {
            let (objective, cuts) = backtrack(&table, 0, classes - 1);
            Partition { cuts, objective }
        }
        PartitionSearch::Dynamic => dynamic(&table, classes),
    };
    Ok(partition)
}

/// Best split of bins `start..` with `remaining` cuts left to place
fn backtrack(table: &SegmentTable, start: usize, remaining: usize) -> (f64, Vec<usize>) {
    let last = table.bins() - 1;
    if remaining == 0 {
        return (table.score(start, last), Vec::new());
    }

    let mut best = f64::NEG_INFINITY;
    let mut best_cuts = Vec::new();
    // the first cut never sits on bin 0; leave one bin per class above it
    for t in start.max(1)..=last - remaining {
        let (tail, cuts) = backtrack(table, t + 1, remaining - 1);
        let total = table.score(start, t) + tail;
        if total >= best {
            best = total;
            best_cuts.clear();
            best_cuts.push(t);
            best_cuts.extend(cuts);
        }
    }
    (best, best_cuts)
}

fn dynamic(table: &SegmentTable, classes: usize) -> Partition {
    let bins = table.bins();

    // best[k][j]: optimum for bins 0..=j split into k + 1 classes
    let mut best = vec![vec![f64::NEG_INFINITY; bins]; classes];
    let mut choice = vec![vec![0usize; bins]; classes];
    for j in 0..bins {
        best[0][j] = table.score(0, j);
    }

    // cut k - 1 lies in k..j, so the first one is never bin 0
    for k in 1..classes {
        for j in (k + 1)..bins {
            let mut top = f64::NEG_INFINITY;
            let mut at = k;
            for t in k..j {
                let total = best[k - 1][t] + table.score(t + 1, j);
                if total >= top {
                    top = total;
                    at = t;
                }
            }
            best[k][j] = top;
            choice[k][j] = at;
        }
    }

    let mut cuts = Vec::with_capacity(classes - 1);
    let mut j = bins - 1;
    for k in (1..classes).rev() {
        j = choice[k][j];
        cuts.push(j);
    }
    cuts.reverse();

    Partition {
        cuts,
        objective: best[classes - 1][bins - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_table() {
        let table = SegmentTable::new(&[1, 2, 3, 4]);
        assert_eq!(table.bins(), 4);
        assert_relative_eq!(table.count(1, 2), 5.0);
        assert_relative_eq!(table.moment(1, 3), 2.0 + 6.0 + 12.0);
        assert_relative_eq!(table.score(3, 3), 144.0 / 4.0);
        assert_relative_eq!(SegmentTable::new(&[0, 0]).score(0, 1), 0.0);
    }

    #[test]
    fn test_three_spikes() {
        let counts = [0, 50, 0, 0, 0, 50, 0, 0, 0, 50, 0];
        for search in [PartitionSearch::Exhaustive, PartitionSearch::Dynamic] {
            let p = optimal_partition(&counts, 3, search).unwrap();
            assert_eq!(p.cuts.len(), 2);
            assert!((1..5).contains(&p.cuts[0]), "{:?}", p.cuts);
            assert!((5..9).contains(&p.cuts[1]), "{:?}", p.cuts);
        }
    }

    #[test]
    fn test_ties_keep_later_cut() {
        // any cut in 0..=3 separates the spikes
        let counts = [5, 0, 0, 0, 5];
        let exhaustive = optimal_partition(&counts, 2, PartitionSearch::Exhaustive).unwrap();
        let dynamic = optimal_partition(&counts, 2, PartitionSearch::Dynamic).unwrap();
        assert_eq!(exhaustive.cuts, vec![3]);
        assert_eq!(dynamic.cuts, vec![3]);
    }

    #[test]
    fn test_forced_cuts_skip_bin_zero() {
        // bins - 1 classes leave exactly one placement
        let counts = [3, 1, 4, 1, 5];
        for search in [PartitionSearch::Dynamic, PartitionSearch::Exhaustive] {
            let p = optimal_partition(&counts, 4, search).unwrap();
            assert_eq!(p.cuts, vec![1, 2, 3]);
            let expected = 1.0 / 4.0 + 64.0 / 4.0 + 9.0 + 400.0 / 5.0;
            assert_relative_eq!(p.objective, expected);
        }
    }

    #[test]
    fn test_spike_at_bin_zero_not_cut_off_alone() {
        let counts = [1000, 0, 0, 0, 50, 50];
        for search in [PartitionSearch::Dynamic, PartitionSearch::Exhaustive] {
            let p = optimal_partition(&counts, 2, search).unwrap();
            assert_eq!(p.cuts, vec![3]);
        }
    }

    #[test]
    fn test_invalid_class_counts() {
        let counts = [1, 2, 3];
        assert!(matches!(
            optimal_partition(&counts, 1, PartitionSearch::Dynamic),
            Err(Error::InvalidParameter(_))
        ));
        for search in [PartitionSearch::Dynamic, PartitionSearch::Exhaustive] {
            // one class per bin would need a cut on bin 0
            assert!(matches!(
                optimal_partition(&counts, 3, search),
                Err(Error::InvalidParameter(_))
            ));
            assert!(matches!(
                optimal_partition(&counts, 4, search),
                Err(Error::InvalidParameter(_))
            ));
        }
        let large = vec![1u64; MAX_PARTITION_BINS + 1];
        assert!(optimal_partition(&large, 2, PartitionSearch::Dynamic).is_err());
    }
}
