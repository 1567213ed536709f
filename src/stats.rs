/// Statistics aggregation for localization evaluation
///
/// This module provides the accumulator that survives the per-image loop:
/// running IOU, miss, and containment totals, overall and per class label.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{EvaluationRecord, CLASS_LABELS};

/// Running totals for one slice of the test set (overall, or one class).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTally {
    /// Number of ground-truth boxes scored.
    pub count: usize,

    /// Sum of IOU values, for the mean.
    pub iou_sum: f64,

    /// Number of zero-IOU results (absent or disjoint predictions).
    pub misses: usize,

    /// Number of predictions that fully covered their ground-truth box.
    pub contained: usize,
}

impl ScoreTally {
    /// Fold one evaluation record into the totals.
    pub fn record(&mut self, record: &EvaluationRecord) {
        self.count += 1;
        self.iou_sum += record.iou;
        if record.is_miss() {
            self.misses += 1;
        }
        if record.contained {
            self.contained += 1;
        }
    }

    /// Combine with another tally. Associative and commutative, so partial
    /// tallies from parallel workers can be merged in any order.
    pub fn merge(&mut self, other: &ScoreTally) {
        self.count += other.count;
        self.iou_sum += other.iou_sum;
        self.misses += other.misses;
        self.contained += other.contained;
    }

    /// Mean IOU over the recorded boxes, 0.0 when nothing was recorded.
    pub fn mean_iou(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.iou_sum / self.count as f64
        }
    }

    /// Fraction of zero-IOU results.
    pub fn miss_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.misses as f64 / self.count as f64
        }
    }

    /// Fraction of predictions fully covering their ground truth.
    pub fn containment_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.contained as f64 / self.count as f64
        }
    }
}

/// Aggregated evaluation results, overall and keyed by class label.
///
/// Per-class denominators are the number of ground-truth boxes carrying that
/// label, not the number of test images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Totals across every scored ground-truth box.
    pub overall: ScoreTally,

    /// Totals per class label.
    pub per_class: HashMap<String, ScoreTally>,
}

impl AggregateStats {
    /// Create a new `AggregateStats` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one evaluation record into the overall and per-class totals.
    pub fn record(&mut self, record: &EvaluationRecord) {
        self.overall.record(record);
        self.per_class
            .entry(record.label.clone())
            .or_default()
            .record(record);
    }

    /// Combine two aggregates into one.
    ///
    /// Associative and commutative, which makes it a valid reduction step
    /// for parallel per-image evaluation.
    pub fn merge(mut self, other: Self) -> Self {
        self.overall.merge(&other.overall);
        for (label, tally) in other.per_class {
            self.per_class.entry(label).or_default().merge(&tally);
        }
        self
    }

    /// Totals for one class label, if any box with that label was scored.
    pub fn class(&self, label: &str) -> Option<&ScoreTally> {
        self.per_class.get(label)
    }

    /// Class labels to report, in the fixed diagnostic order followed by any
    /// labels outside the known set.
    fn report_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = CLASS_LABELS
            .iter()
            .copied()
            .filter(|l| self.per_class.contains_key(*l))
            .collect();
        let mut extra: Vec<&str> = self
            .per_class
            .keys()
            .map(String::as_str)
            .filter(|l| !CLASS_LABELS.contains(l))
            .collect();
        extra.sort_unstable();
        labels.extend(extra);
        labels
    }

    /// Print a summary of the statistics to stdout
    ///
    /// Displays overall totals followed by one block per class.
    pub fn print_summary(&self) {
        println!("\n=== Localization Statistics ===");
        println!("Ground-truth boxes: {}", self.overall.count);
        println!("Mean IOU: {:.4}", self.overall.mean_iou());
        println!(
            "Zero-IOU misses: {} ({:.4})",
            self.overall.misses,
            self.overall.miss_fraction()
        );
        println!(
            "Contained: {} ({:.4})",
            self.overall.contained,
            self.overall.containment_fraction()
        );
        for label in self.report_labels() {
            let tally = &self.per_class[label];
            println!("{} total        {}", label, tally.count);
            println!("{} iou          {:.4}", label, tally.mean_iou());
            println!("{} contains     {:.4}", label, tally.containment_fraction());
        }
        println!("===============================\n");
    }

    /// Get a formatted one-line summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "AggregateStats {{ boxes: {}, mean_iou: {:.4}, misses: {}, contained: {}, classes: {} }}",
            self.overall.count,
            self.overall.mean_iou(),
            self.overall.misses,
            self.overall.contained,
            self.per_class.len()
        )
    }
}
