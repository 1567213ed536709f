//! Containment predicate over axis-aligned boxes.

use crate::types::BoundingBox;

/// Test whether `inner` lies entirely within `outer`.
///
/// All four of `inner`'s edges must fall inside (or exactly on) `outer`'s
/// bounds. Argument order matters: the evaluator passes the predicted box as
/// `outer` and the ground-truth box as `inner`, so the flag records whether
/// the prediction fully covers the annotation.
///
/// # Example
///
/// ```
/// use cam_eval::metrics::containment::contains;
/// use cam_eval::types::BoundingBox;
///
/// let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
/// let inner = BoundingBox::new(20.0, 20.0, 40.0, 40.0);
/// assert!(contains(&outer, &inner));
/// assert!(!contains(&inner, &outer));
/// ```
pub fn contains(outer: &BoundingBox, inner: &BoundingBox) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}
