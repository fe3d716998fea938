//! Minority-class oversampling (SMOTE) for the training split.
//!
//! Synthetic minority samples are interpolated between a real sample and one
//! of its nearest minority neighbors, so the classifier sees a balanced
//! training set without duplicating rows verbatim.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// SMOTE oversampler. Seeded, so a fixed dataset yields a fixed resample.
pub struct Smote {
    neighbors: usize,
    seed: u64,
}

impl Smote {
    pub fn new(neighbors: usize, seed: u64) -> Self {
        Self { neighbors, seed }
    }

    /// Balance the two classes in place by synthesizing minority samples.
    ///
    /// Returns the number of synthetic rows added. Leaves the data untouched
    /// when the classes are already balanced or the minority class is too
    /// small to interpolate.
    pub fn balance(&self, features: &mut Vec<Vec<f32>>, labels: &mut Vec<u8>) -> usize {
        let positives = labels.iter().filter(|&&l| l == 1).count();
        let negatives = labels.len() - positives;

        let (minority_label, deficit) = match positives.cmp(&negatives) {
            std::cmp::Ordering::Less => (1u8, negatives - positives),
            std::cmp::Ordering::Greater => (0u8, positives - negatives),
            std::cmp::Ordering::Equal => return 0,
        };

        let minority: Vec<Vec<f32>> = features
            .iter()
            .zip(labels.iter())
            .filter(|(_, &l)| l == minority_label)
            .map(|(f, _)| f.clone())
            .collect();

        if minority.len() < 2 {
            warn!(
                samples = minority.len(),
                "Minority class too small to oversample, skipping"
            );
            return 0;
        }

        let k = self.neighbors.clamp(1, minority.len() - 1);
        let neighbor_table = nearest_neighbors(&minority, k);
        let mut rng = StdRng::seed_from_u64(self.seed);

        for _ in 0..deficit {
            let base = rng.gen_range(0..minority.len());
            let neighbor = neighbor_table[base][rng.gen_range(0..k)];
            let gap: f32 = rng.gen();

            let synthetic: Vec<f32> = minority[base]
                .iter()
                .zip(&minority[neighbor])
                .map(|(a, b)| a + gap * (b - a))
                .collect();

            features.push(synthetic);
            labels.push(minority_label);
        }

        info!(
            added = deficit,
            minority_label = minority_label,
            neighbors = k,
            "Balanced training classes with synthetic samples"
        );

        deficit
    }
}

/// For each sample, the indices of its `k` nearest same-class neighbors by
/// Euclidean distance (self excluded).
fn nearest_neighbors(samples: &[Vec<f32>], k: usize) -> Vec<Vec<usize>> {
    samples
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let mut candidates: Vec<(f32, usize)> = samples
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, b)| (squared_distance(a, b), j))
                .collect();
            candidates.sort_by(|x, y| x.0.total_cmp(&y.0));
            candidates.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imbalanced() -> (Vec<Vec<f32>>, Vec<u8>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            features.push(vec![i as f32, 0.0]);
            labels.push(0);
        }
        for i in 0..5 {
            features.push(vec![100.0 + i as f32, 50.0]);
            labels.push(1);
        }
        (features, labels)
    }

    #[test]
    fn test_balance_equalizes_counts() {
        let (mut features, mut labels) = imbalanced();
        let added = Smote::new(5, 42).balance(&mut features, &mut labels);

        assert_eq!(added, 15);
        let positives = labels.iter().filter(|&&l| l == 1).count();
        let negatives = labels.len() - positives;
        assert_eq!(positives, negatives);
        assert_eq!(features.len(), labels.len());
    }

    #[test]
    fn test_synthetic_samples_stay_in_minority_region() {
        let (mut features, mut labels) = imbalanced();
        Smote::new(5, 42).balance(&mut features, &mut labels);

        // Interpolation keeps every coordinate within the minority bounds.
        for (f, &l) in features.iter().zip(&labels) {
            if l == 1 {
                assert!((100.0..=104.0).contains(&f[0]), "x out of range: {}", f[0]);
                assert_eq!(f[1], 50.0);
            }
        }
    }

    #[test]
    fn test_balance_is_deterministic() {
        let (mut f1, mut l1) = imbalanced();
        let (mut f2, mut l2) = imbalanced();
        Smote::new(5, 9).balance(&mut f1, &mut l1);
        Smote::new(5, 9).balance(&mut f2, &mut l2);
        assert_eq!(f1, f2);
        assert_eq!(l1, l2);
    }

    #[test]
    fn test_tiny_minority_is_skipped() {
        let mut features = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]];
        let mut labels = vec![0, 0, 0, 1];
        let added = Smote::new(5, 42).balance(&mut features, &mut labels);
        assert_eq!(added, 0);
        assert_eq!(features.len(), 4);
    }

    #[test]
    fn test_balanced_input_untouched() {
        let mut features = vec![vec![0.0], vec![1.0]];
        let mut labels = vec![0, 1];
        assert_eq!(Smote::new(5, 42).balance(&mut features, &mut labels), 0);
        assert_eq!(features.len(), 2);
    }
}
