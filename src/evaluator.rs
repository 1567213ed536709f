//! Per-image evaluation orchestrator and batch driver.
//!
//! For each annotated test image: map the ground-truth box into the cropped
//! frame, extract one candidate region per activation map, keep the largest,
//! and score it. Images are independent, so the batch driver runs them on a
//! rayon pool and merges per-worker partial statistics.

use rayon::prelude::*;

use crate::frame::to_model_frame;
use crate::metrics::{calculate_iou, contains};
use crate::region::{extract_region, Region};
use crate::stats::AggregateStats;
use crate::types::{ActivationMap, ActivationSet, EvaluationRecord, GroundTruth};

/// Evaluate one annotated test image.
///
/// `maps` are the activation maps associated with the image, in their given
/// order. Maps carrying NaN are skipped with a warning; among the surviving
/// candidate regions the one with the strictly largest cell count wins, so on
/// a size tie the earliest map's region is kept. With no usable region the
/// image scores as a miss (no prediction, IOU 0, not contained).
///
/// This function is total: every failure mode degrades to a recorded miss,
/// and no error escapes into the batch loop.
pub fn evaluate_image(ground_truth: &GroundTruth, maps: &[ActivationMap]) -> EvaluationRecord {
    let mapped_gt = to_model_frame(&ground_truth.bbox, true);

    let mut best: Option<Region> = None;
    for map in maps {
        match extract_region(map) {
            Ok(Some(region)) => {
                if best.as_ref().map_or(true, |b| region.size > b.size) {
                    best = Some(region);
                }
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!(
                    "skipping activation map for image {} class {}: {}",
                    map.image_index,
                    map.label,
                    err
                );
            }
        }
    }

    match best {
        Some(region) => {
            let iou = calculate_iou(&region.bbox, &mapped_gt);
            let contained = contains(&region.bbox, &mapped_gt);
            EvaluationRecord {
                image_index: ground_truth.image_index,
                label: ground_truth.label.clone(),
                ground_truth: mapped_gt,
                predicted: Some(region.bbox),
                iou,
                contained,
            }
        }
        None => {
            log::warn!(
                "no usable activation maps for image {}",
                ground_truth.image_index
            );
            EvaluationRecord {
                image_index: ground_truth.image_index,
                label: ground_truth.label.clone(),
                ground_truth: mapped_gt,
                predicted: None,
                iou: 0.0,
                contained: false,
            }
        }
    }
}

/// Evaluate the whole test set and aggregate the results.
///
/// Images are processed in parallel; each worker folds its records into a
/// partial [`AggregateStats`], and the partials are merged at the end. The
/// merge is associative and commutative, so the scheduling order has no
/// observable effect on the result.
pub fn run_evaluation(ground_truths: &[GroundTruth], maps: &ActivationSet) -> AggregateStats {
    log::info!(
        "evaluating {} annotated images against {} activation maps",
        ground_truths.len(),
        maps.map_count()
    );

    let stats = ground_truths
        .par_iter()
        .fold(AggregateStats::new, |mut partial, ground_truth| {
            let record = evaluate_image(ground_truth, maps.for_image(ground_truth.image_index));
            partial.record(&record);
            partial
        })
        .reduce(AggregateStats::new, AggregateStats::merge);

    log::info!("evaluation finished: {}", stats.summary_string());
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use ndarray::Array2;

    /// A 224x224 map whose only activation is a full-intensity block.
    fn block_map(
        image_index: usize,
        label: &str,
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    ) -> ActivationMap {
        let mut pixels = Array2::<f32>::zeros((224, 224));
        for r in row..row + height {
            for c in col..col + width {
                pixels[[r, c]] = 1.0;
            }
        }
        ActivationMap::new(image_index, label, pixels)
    }

    fn nan_map(image_index: usize, label: &str) -> ActivationMap {
        let mut pixels = Array2::<f32>::zeros((224, 224));
        pixels[[0, 0]] = f32::NAN;
        ActivationMap::new(image_index, label, pixels)
    }

    #[test]
    fn test_exact_localization_scores_perfectly() {
        // Ground truth (100, 100, 200, 200) maps to (9, 9, 50, 50); the
        // activation block covers exactly those grid cells.
        let gt = GroundTruth::new(
            0,
            "Mass",
            BoundingBox::new(100.0, 100.0, 200.0, 200.0),
        );
        let maps = vec![block_map(0, "Mass", 9, 9, 50, 50)];

        let record = evaluate_image(&gt, &maps);
        assert_eq!(record.predicted, Some(BoundingBox::new(9.0, 9.0, 50.0, 50.0)));
        assert!((record.iou - 1.0).abs() < 1e-10);
        assert!(record.contained);
        assert!(!record.is_miss());
    }

    #[test]
    fn test_no_maps_is_a_miss() {
        let gt = GroundTruth::new(3, "Nodule", BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        let record = evaluate_image(&gt, &[]);

        assert_eq!(record.predicted, None);
        assert_eq!(record.iou, 0.0);
        assert!(!record.contained);
        assert!(record.is_miss());
        assert_eq!(record.label, "Nodule");
    }

    #[test]
    fn test_nan_maps_are_skipped_not_fatal() {
        let gt = GroundTruth::new(0, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        let maps = vec![nan_map(0, "Mass"), block_map(0, "Effusion", 9, 9, 50, 50)];

        let record = evaluate_image(&gt, &maps);
        assert_eq!(record.predicted, Some(BoundingBox::new(9.0, 9.0, 50.0, 50.0)));
        assert!((record.iou - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_all_maps_invalid_is_a_miss() {
        let gt = GroundTruth::new(0, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        let maps = vec![nan_map(0, "Mass"), nan_map(0, "Nodule")];

        let record = evaluate_image(&gt, &maps);
        assert_eq!(record.predicted, None);
        assert!(record.is_miss());
    }

    #[test]
    fn test_largest_region_across_maps_wins() {
        let gt = GroundTruth::new(0, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        // The second map's component is larger and should supply the box.
        let maps = vec![
            block_map(0, "Nodule", 20, 20, 10, 10),
            block_map(0, "Mass", 9, 9, 50, 50),
        ];

        let record = evaluate_image(&gt, &maps);
        assert_eq!(record.predicted, Some(BoundingBox::new(9.0, 9.0, 50.0, 50.0)));
    }

    #[test]
    fn test_size_tie_keeps_earlier_map() {
        let gt = GroundTruth::new(0, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0));
        let maps = vec![
            block_map(0, "Mass", 60, 60, 20, 20),
            block_map(0, "Nodule", 120, 120, 20, 20),
        ];

        let record = evaluate_image(&gt, &maps);
        assert_eq!(
            record.predicted,
            Some(BoundingBox::new(60.0, 60.0, 20.0, 20.0))
        );
    }

    #[test]
    fn test_run_evaluation_aggregates_per_class() {
        let ground_truths = vec![
            GroundTruth::new(0, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0)),
            GroundTruth::new(1, "Nodule", BoundingBox::new(400.0, 400.0, 100.0, 100.0)),
            GroundTruth::new(2, "Mass", BoundingBox::new(100.0, 100.0, 200.0, 200.0)),
        ];

        let mut maps = ActivationSet::new();
        // Image 0: perfect localization. Image 1: none. Image 2: disjoint.
        maps.insert(block_map(0, "Mass", 9, 9, 50, 50));
        maps.insert(block_map(2, "Mass", 150, 150, 30, 30));

        let stats = run_evaluation(&ground_truths, &maps);

        assert_eq!(stats.overall.count, 3);
        assert_eq!(stats.overall.misses, 2);
        assert_eq!(stats.overall.contained, 1);

        let mass = stats.class("Mass").unwrap();
        assert_eq!(mass.count, 2);
        assert!((mass.mean_iou() - 0.5).abs() < 1e-10);

        let nodule = stats.class("Nodule").unwrap();
        assert_eq!(nodule.count, 1);
        assert_eq!(nodule.misses, 1);
    }
}
