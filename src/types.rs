//! Core data types for annotations, activation maps, and evaluation records.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CamEvalError, Result};

/// The eight diagnostic categories carried by the annotation table.
///
/// Per-class statistics are reported in this order.
pub const CLASS_LABELS: [&str; 8] = [
    "Atelectasis",
    "Cardiomegaly",
    "Effusion",
    "Infiltrate",
    "Mass",
    "Nodule",
    "Pneumonia",
    "Pneumothorax",
];

/// Side length of the native annotation frame in pixels.
pub const NATIVE_SIZE: usize = 1024;

/// Side length of the center-cropped model-input frame in pixels.
pub const CROP_SIZE: usize = 224;

/// Represents a bounding box in LTWH (Left-Top-Width-Height) format.
///
/// A box is only meaningful within one coordinate frame — either the native
/// 1024x1024 annotation frame or the cropped 224x224 model-input frame. Boxes
/// from different frames must be converted (see [`crate::frame`]) before they
/// can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the bounding box has positive extent in both dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A human-annotated ground-truth box in the native 1024x1024 frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Index of the test image this annotation belongs to.
    pub image_index: usize,
    /// Diagnostic category label, one of [`CLASS_LABELS`].
    pub label: String,
    /// Annotation box in native-frame coordinates.
    pub bbox: BoundingBox,
}

impl GroundTruth {
    /// Create a new ground-truth annotation.
    pub fn new(image_index: usize, label: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            image_index,
            label: label.into(),
            bbox,
        }
    }
}

/// A per-class activation-intensity map over the 224x224 model-input frame.
///
/// One map exists per (image, predicted class) pair whose classifier output
/// crossed the per-class detection threshold; producing the intensities is an
/// external concern. Maps may carry NaN no-data markers, in which case the
/// whole map is rejected by the extractor rather than partially used.
#[derive(Debug, Clone)]
pub struct ActivationMap {
    /// Index of the test image this map was computed for.
    pub image_index: usize,
    /// Predicted class the map explains.
    pub label: String,
    /// Intensity grid, indexed `[row, col]`.
    pub pixels: Array2<f32>,
}

impl ActivationMap {
    /// Create an activation map from an intensity grid.
    pub fn new(image_index: usize, label: impl Into<String>, pixels: Array2<f32>) -> Self {
        Self {
            image_index,
            label: label.into(),
            pixels,
        }
    }

    /// Create an activation map from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CamEvalError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(
        image_index: usize,
        label: impl Into<String>,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(CamEvalError::ShapeMismatch(format!(
                "expected {} values for a {}x{} map, got {}",
                expected,
                rows,
                cols,
                data.len()
            )));
        }
        let pixels = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| CamEvalError::ShapeMismatch(e.to_string()))?;
        Ok(Self::new(image_index, label, pixels))
    }

    /// True if any cell carries a NaN no-data marker.
    pub fn has_nan(&self) -> bool {
        self.pixels.iter().any(|v| v.is_nan())
    }

    /// Mean intensity across all cells, 0.0 for an empty grid.
    pub fn mean(&self) -> f32 {
        self.pixels.mean().unwrap_or(0.0)
    }
}

/// The activation maps for a test set, keyed by image index.
///
/// Per-image insertion order is preserved: when two candidate regions tie on
/// size, the evaluator keeps the one from the earlier-inserted map.
#[derive(Debug, Clone, Default)]
pub struct ActivationSet {
    maps: HashMap<usize, Vec<ActivationMap>>,
}

impl ActivationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a map, appending to the image's candidate list.
    pub fn insert(&mut self, map: ActivationMap) {
        self.maps.entry(map.image_index).or_default().push(map);
    }

    /// All maps for one image, in insertion order. Empty if none exist.
    pub fn for_image(&self, image_index: usize) -> &[ActivationMap] {
        self.maps
            .get(&image_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of images with at least one map.
    pub fn image_count(&self) -> usize {
        self.maps.len()
    }

    /// Total number of maps across all images.
    pub fn map_count(&self) -> usize {
        self.maps.values().map(Vec::len).sum()
    }
}

/// Outcome of evaluating one test image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub image_index: usize,
    /// Ground-truth class label, the per-class aggregation key.
    pub label: String,
    /// Ground-truth box mapped into the cropped frame.
    pub ground_truth: BoundingBox,
    /// Extracted box in the cropped frame, `None` when extraction failed.
    pub predicted: Option<BoundingBox>,
    /// Intersection over union between prediction and ground truth.
    pub iou: f64,
    /// Whether the prediction fully covers the ground-truth box.
    pub contained: bool,
}

impl EvaluationRecord {
    /// True if this record is a zero-IOU miss.
    pub fn is_miss(&self) -> bool {
        self.iou == 0.0
    }
}
