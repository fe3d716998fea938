//! Held-out evaluation: accuracy, per-class report, and confusion matrix.

use tracing::info;

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation summary over a held-out split.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub legitimate: ClassMetrics,
    pub fraud: ClassMetrics,
    /// Indexed `[actual][predicted]`.
    pub confusion: [[usize; 2]; 2],
}

impl EvaluationReport {
    /// Build the report from parallel actual/predicted label slices.
    pub fn from_predictions(actual: &[u8], predicted: &[u8]) -> Self {
        assert_eq!(
            actual.len(),
            predicted.len(),
            "actual and predicted lengths differ"
        );

        let mut confusion = [[0usize; 2]; 2];
        for (&a, &p) in actual.iter().zip(predicted) {
            confusion[usize::from(a == 1)][usize::from(p == 1)] += 1;
        }

        let correct = confusion[0][0] + confusion[1][1];
        let total = actual.len();
        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        Self {
            accuracy,
            legitimate: class_metrics(&confusion, 0),
            fraud: class_metrics(&confusion, 1),
            confusion,
        }
    }

    /// Log the report the way the training run prints it.
    pub fn log(&self) {
        info!(accuracy = format!("{:.4}", self.accuracy), "Evaluation accuracy");
        info!(
            precision = format!("{:.4}", self.legitimate.precision),
            recall = format!("{:.4}", self.legitimate.recall),
            f1 = format!("{:.4}", self.legitimate.f1),
            support = self.legitimate.support,
            "Class report: legitimate"
        );
        info!(
            precision = format!("{:.4}", self.fraud.precision),
            recall = format!("{:.4}", self.fraud.recall),
            f1 = format!("{:.4}", self.fraud.f1),
            support = self.fraud.support,
            "Class report: fraud"
        );
        info!(
            tn = self.confusion[0][0],
            fp = self.confusion[0][1],
            fn_ = self.confusion[1][0],
            tp = self.confusion[1][1],
            "Confusion matrix"
        );
    }
}

fn class_metrics(confusion: &[[usize; 2]; 2], class: usize) -> ClassMetrics {
    let tp = confusion[class][class];
    let fp = confusion[1 - class][class];
    let fn_ = confusion[class][1 - class];
    let support = confusion[class][0] + confusion[class][1];

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support,
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom > 0 {
        num as f64 / denom as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let labels = [0, 1, 0, 1, 1];
        let report = EvaluationReport::from_predictions(&labels, &labels);

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.fraud.precision, 1.0);
        assert_eq!(report.fraud.recall, 1.0);
        assert_eq!(report.fraud.f1, 1.0);
        assert_eq!(report.fraud.support, 3);
        assert_eq!(report.confusion, [[2, 0], [0, 3]]);
    }

    #[test]
    fn test_mixed_predictions() {
        let actual = [0, 0, 0, 0, 1, 1, 1, 1];
        let predicted = [0, 0, 0, 1, 1, 1, 0, 0];
        let report = EvaluationReport::from_predictions(&actual, &predicted);

        assert_eq!(report.accuracy, 5.0 / 8.0);
        assert_eq!(report.confusion, [[3, 1], [2, 2]]);
        // Fraud: tp=2, fp=1, fn=2.
        assert!((report.fraud.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.fraud.recall - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_class_yields_zero_metrics() {
        let actual = [0, 0, 0];
        let predicted = [0, 0, 0];
        let report = EvaluationReport::from_predictions(&actual, &predicted);

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.fraud.precision, 0.0);
        assert_eq!(report.fraud.recall, 0.0);
        assert_eq!(report.fraud.support, 0);
    }
}
