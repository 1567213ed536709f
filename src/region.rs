//! Candidate-region extraction from activation maps.
//!
//! An activation map is binarized against an adaptive threshold derived from
//! its own mean intensity, the foreground is split into 4-connected
//! components, and the largest component's tight bounding box becomes the
//! localization candidate for that (image, class) pair.

use crate::error::{CamEvalError, Result};
use crate::labeling::label_components;
use crate::types::{ActivationMap, BoundingBox};

/// Multiplier applied to the map's mean intensity to form the cutoff.
pub const THRESHOLD_SCALE: f32 = 1.95;

/// Ceiling on the adaptive threshold, bounding over-inclusive high means.
pub const THRESHOLD_CEILING: f32 = 0.6;

/// The most salient contiguous area of one activation map.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Tight axis-aligned box enclosing the component, in grid coordinates
    /// (x = column, y = row).
    pub bbox: BoundingBox,
    /// Number of cells in the component.
    pub size: usize,
}

/// Binarization cutoff for one map: `mean * 1.95`, capped at 0.6.
///
/// Scaling by the map's own mean adapts the cutoff to each map's intensity
/// distribution; the cap keeps maps with high overall activation from
/// producing a threshold no cell can exceed meaningfully.
pub fn adaptive_threshold(map: &ActivationMap) -> f32 {
    (map.mean() * THRESHOLD_SCALE).min(THRESHOLD_CEILING)
}

/// Extract the largest salient region of an activation map.
///
/// Cells strictly above the [`adaptive_threshold`] form the foreground,
/// which is labeled with 4-connectivity. The component with the most cells
/// wins; on a size tie the component labeled first (row-major first
/// encounter) is kept. Returns `Ok(None)` when no cell clears the threshold.
///
/// # Errors
///
/// Returns [`CamEvalError::InvalidActivationMap`] if the map carries any NaN
/// cell. Callers skip such maps; they are never partially used.
pub fn extract_region(map: &ActivationMap) -> Result<Option<Region>> {
    if map.has_nan() {
        return Err(CamEvalError::InvalidActivationMap(format!(
            "map for image {} class {} contains NaN cells",
            map.image_index, map.label
        )));
    }

    let threshold = adaptive_threshold(map);
    let mask = map.pixels.mapv(|v| v > threshold);

    let (labels, count) = label_components(&mask);
    if count == 0 {
        return Ok(None);
    }

    // Cell count per component; index 0 is background and stays out of the
    // running.
    let mut sizes = vec![0usize; count as usize + 1];
    for &label in labels.iter() {
        sizes[label as usize] += 1;
    }

    let mut best = 1;
    for candidate in 2..sizes.len() {
        if sizes[candidate] > sizes[best] {
            best = candidate;
        }
    }
    let best_label = best as u32;

    let mut min_row = usize::MAX;
    let mut max_row = 0;
    let mut min_col = usize::MAX;
    let mut max_col = 0;
    for ((row, col), &label) in labels.indexed_iter() {
        if label == best_label {
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }
    }

    let bbox = BoundingBox::new(
        min_col as f64,
        min_row as f64,
        (max_col - min_col + 1) as f64,
        (max_row - min_row + 1) as f64,
    );

    Ok(Some(Region {
        bbox,
        size: sizes[best],
    }))
}
