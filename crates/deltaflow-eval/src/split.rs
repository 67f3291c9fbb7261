//! Seeded shuffle train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::EvalError;

/// Train/test partitioner with a deterministic seeded shuffle.
///
/// Construct via [`TrainTestSplit::new`], then chain `with_seed` if desired.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    test_fraction: f64,
    seed: u64,
}

/// Row indices selected for each partition.
///
/// Both index lists refer to the same row numbering, so applying them to a
/// feature matrix and a target vector of equal length keeps the partitions
/// row-aligned by construction.
#[derive(Debug, Clone)]
pub struct SplitIndices {
    /// Row indices of the training partition.
    pub train: Vec<usize>,
    /// Row indices of the held-out test partition.
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Gather the rows of a row-major matrix at the given indices.
    #[must_use]
    pub fn gather_rows(indices: &[usize], matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        indices.iter().map(|&i| matrix[i].clone()).collect()
    }

    /// Gather the values of a vector at the given indices.
    #[must_use]
    pub fn gather(indices: &[usize], values: &[f64]) -> Vec<f64> {
        indices.iter().map(|&i| values[i]).collect()
    }
}

impl TrainTestSplit {
    /// Create a new partitioner holding out the given fraction of rows.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidTestFraction`] unless
    /// `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, EvalError> {
        if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
            return Err(EvalError::InvalidTestFraction {
                fraction: test_fraction,
            });
        }
        Ok(Self {
            test_fraction,
            seed: 42,
        })
    }

    /// Set the random seed for the shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the configured test fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Partition `n_rows` row indices into train and test sets.
    ///
    /// Shuffles `0..n_rows` with a seeded Fisher-Yates shuffle, then holds
    /// out `ceil(n_rows * test_fraction)` rows for test.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvalError::EmptyDataset`] | `n_rows` is zero |
    /// | [`EvalError::EmptyPartition`] | either partition would be empty |
    pub fn split(&self, n_rows: usize) -> Result<SplitIndices, EvalError> {
        if n_rows == 0 {
            return Err(EvalError::EmptyDataset);
        }

        let n_test = ((n_rows as f64) * self.test_fraction).ceil() as usize;
        if n_test == 0 || n_test >= n_rows {
            return Err(EvalError::EmptyPartition { n_rows, n_test });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut indices: Vec<usize> = (0..n_rows).collect();
        indices.shuffle(&mut rng);

        let test = indices[..n_test].to_vec();
        let train = indices[n_test..].to_vec();

        debug!(
            n_rows,
            n_train = train.len(),
            n_test = test.len(),
            "rows partitioned"
        );

        Ok(SplitIndices { train, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fraction_at_or_outside_bounds() {
        for fraction in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(
                TrainTestSplit::new(fraction).is_err(),
                "fraction {fraction} accepted"
            );
        }
    }

    #[test]
    fn accepts_interior_fractions() {
        assert!(TrainTestSplit::new(0.25).is_ok());
        assert!(TrainTestSplit::new(0.99).is_ok());
    }

    #[test]
    fn partitions_are_disjoint_and_cover_all_rows() {
        let split = TrainTestSplit::new(0.25).unwrap().with_seed(7);
        let indices = split.split(100).unwrap();

        let mut all: Vec<usize> = indices
            .train
            .iter()
            .chain(indices.test.iter())
            .copied()
            .collect();
        all.sort_unstable();
        let expected: Vec<usize> = (0..100).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_size_is_ceil_of_fraction() {
        let split = TrainTestSplit::new(0.25).unwrap();
        assert_eq!(split.split(1500).unwrap().test.len(), 375);
        // 0.25 * 10 = 2.5 → 3 held out.
        assert_eq!(split.split(10).unwrap().test.len(), 3);
    }

    #[test]
    fn same_seed_same_partition() {
        let a = TrainTestSplit::new(0.3).unwrap().with_seed(9).split(50).unwrap();
        let b = TrainTestSplit::new(0.3).unwrap().with_seed(9).split(50).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn different_seed_different_partition() {
        let a = TrainTestSplit::new(0.3).unwrap().with_seed(1).split(50).unwrap();
        let b = TrainTestSplit::new(0.3).unwrap().with_seed(2).split(50).unwrap();
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn zero_rows_rejected() {
        let err = TrainTestSplit::new(0.5).unwrap().split(0).unwrap_err();
        assert!(matches!(err, EvalError::EmptyDataset));
    }

    #[test]
    fn too_few_rows_for_both_partitions_rejected() {
        // ceil(1 * 0.5) = 1 would leave the training partition empty.
        let err = TrainTestSplit::new(0.5).unwrap().split(1).unwrap_err();
        assert!(matches!(err, EvalError::EmptyPartition { n_rows: 1, n_test: 1 }));
    }

    #[test]
    fn gather_keeps_rows_aligned() {
        let matrix = vec![vec![0.0, 10.0], vec![1.0, 11.0], vec![2.0, 12.0]];
        let values = vec![100.0, 101.0, 102.0];
        let indices = vec![2, 0];

        let rows = SplitIndices::gather_rows(&indices, &matrix);
        let gathered = SplitIndices::gather(&indices, &values);

        assert_eq!(rows, vec![vec![2.0, 12.0], vec![0.0, 10.0]]);
        assert_eq!(gathered, vec![102.0, 100.0]);
    }
}
