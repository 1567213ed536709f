//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
/// Both boxes must be expressed in the same coordinate frame.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
/// A pair of zero-area boxes has union 0 and scores 0.0 rather than
/// dividing by zero, so callers can feed degenerate boxes through without
/// guarding.
///
/// # Example
///
/// ```
/// use cam_eval::metrics::iou::calculate_iou;
/// use cam_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    // Overlap extent along each axis; negative when the boxes are disjoint
    // on that axis.
    let dx = bbox1.right().min(bbox2.right()) - bbox1.x.max(bbox2.x);
    let dy = bbox1.bottom().min(bbox2.bottom()) - bbox1.y.max(bbox2.y);

    let intersection = if dx >= 0.0 && dy >= 0.0 { dx * dy } else { 0.0 };

    let union = bbox1.area() + bbox2.area() - intersection;

    // Two degenerate boxes: define the result as 0 instead of dividing by zero.
    if union == 0.0 {
        return 0.0;
    }

    intersection / union
}
