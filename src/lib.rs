//! # cam-eval
//!
//! A Rust library for scoring weakly-supervised localization from class
//! activation maps (Grad-CAM-style heatmaps) against human-annotated
//! bounding boxes.
//!
//! Given a per-class activation map for a test image, the library extracts a
//! single candidate bounding box (adaptive thresholding followed by
//! largest-connected-component selection) and scores it against the
//! ground-truth annotation with IOU and containment, aggregating per-class
//! and overall statistics.
//!
//! ## Features
//!
//! - Convert boxes between the native 1024x1024 annotation frame and the
//!   center-cropped 224x224 model-input frame, with crop clipping
//! - Calculate IoU (Intersection over Union) between bounding boxes
//! - Test whether a prediction fully contains its ground-truth box
//! - Extract the most salient contiguous region of an activation map
//!   (adaptive threshold, 4-connected components)
//! - Evaluate a whole test set in parallel and aggregate mean IOU, miss,
//!   and containment statistics per class
//!
//! ## Quick Start
//!
//! ```rust
//! use cam_eval::evaluator::run_evaluation;
//! use cam_eval::types::{ActivationMap, ActivationSet, BoundingBox, GroundTruth};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Ground truth in native 1024x1024 coordinates.
//! let ground_truths = vec![GroundTruth::new(
//!     0,
//!     "Mass",
//!     BoundingBox::new(100.0, 100.0, 200.0, 200.0),
//! )];
//!
//! // Activation maps come from the classifier's explainability pass.
//! let mut maps = ActivationSet::new();
//! maps.insert(ActivationMap::from_vec(0, "Mass", 224, 224, vec![0.0; 224 * 224])?);
//!
//! let stats = run_evaluation(&ground_truths, &maps);
//! println!("mean IOU: {:.4}", stats.overall.mean_iou());
//! stats.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Coordinate frames
//!
//! Annotations live in the raw 1024x1024 frame; the classifier input (and
//! every activation map) is a 224x224 crop of a 256x256 downscale. All
//! scoring happens in the cropped frame: the evaluator maps each ground-truth
//! box through [`frame::to_model_frame`] before comparing it to extracted
//! regions, truncating any portion that falls inside the removed 16-pixel
//! margin.

pub mod error;
pub mod types;
pub mod loader;
pub mod frame;
pub mod labeling;
pub mod region;
pub mod metrics;
pub mod stats;
pub mod evaluator;

// Re-export commonly used types and functions
pub use error::{CamEvalError, Result};
pub use types::{
    ActivationMap, ActivationSet, BoundingBox, EvaluationRecord, GroundTruth, CLASS_LABELS,
};
pub use evaluator::{evaluate_image, run_evaluation};
pub use frame::{to_model_frame, to_native_frame};
pub use loader::{load_ground_truth_csv, load_ground_truth_json};
pub use region::{extract_region, Region};
pub use stats::{AggregateStats, ScoreTally};
