//! Coordinate conversion between the native annotation frame and the
//! center-cropped model-input frame.
//!
//! Annotations are drawn on the raw 1024x1024 radiographs, while the
//! classifier (and therefore every activation map) sees a 224x224 input
//! produced by downscaling to 256x256 and center-cropping away a 16-pixel
//! margin on each side. Boxes must be converted between the two frames
//! before any geometry is computed on them.

use crate::types::{BoundingBox, CROP_SIZE};

/// Downscale factor from the native frame to the 256x256 intermediate.
const DOWNSCALE: f64 = 4.0;

/// Margin removed on each side by the center crop, at the 256 scale.
const CROP_MARGIN: f64 = 16.0;

const CROP_MAX: f64 = CROP_SIZE as f64;

/// Convert a native-frame box into model-input (cropped-frame) coordinates.
///
/// Divides all four components by 4 and shifts the origin by the 16-pixel
/// crop margin. With `clip` set, the portion of the box falling inside the
/// removed margin is truncated: a left/top edge inside the margin snaps to 0
/// and the width/height shrinks by the overhang, and a right/bottom edge past
/// 224 pulls the width/height back so the edge lands exactly on the frame
/// border. Output components are truncated to whole pixels.
///
/// Never returns a negative width or height. A box lying entirely inside the
/// removed margin collapses to a zero-size box, which downstream geometry
/// scores as IOU 0 rather than raising.
///
/// # Example
///
/// ```
/// use cam_eval::frame::to_model_frame;
/// use cam_eval::types::BoundingBox;
///
/// let native = BoundingBox::new(100.0, 100.0, 200.0, 200.0);
/// let cropped = to_model_frame(&native, true);
/// assert_eq!(cropped, BoundingBox::new(9.0, 9.0, 50.0, 50.0));
/// ```
pub fn to_model_frame(bbox: &BoundingBox, clip: bool) -> BoundingBox {
    let mut x = bbox.x / DOWNSCALE;
    let mut y = bbox.y / DOWNSCALE;
    let mut width = bbox.width / DOWNSCALE;
    let mut height = bbox.height / DOWNSCALE;

    if clip {
        if x < CROP_MARGIN {
            width -= CROP_MARGIN - x;
            x = 0.0;
        } else {
            x -= CROP_MARGIN;
        }
        if x + width > CROP_MAX {
            width = CROP_MAX - x;
        }

        if y < CROP_MARGIN {
            height -= CROP_MARGIN - y;
            y = 0.0;
        } else {
            y -= CROP_MARGIN;
        }
        if y + height > CROP_MAX {
            height = CROP_MAX - y;
        }

        width = width.max(0.0);
        height = height.max(0.0);
    } else {
        x -= CROP_MARGIN;
        y -= CROP_MARGIN;
    }

    BoundingBox::new(x.trunc(), y.trunc(), width.trunc(), height.trunc())
}

/// Convert a cropped-frame box back into native-frame coordinates.
///
/// Inverse of the unclipped forward path: shift the origin by +16 at the 256
/// scale, then multiply by 4. The native frame has no crop, so this direction
/// never clips.
///
/// # Example
///
/// ```
/// use cam_eval::frame::to_native_frame;
/// use cam_eval::types::BoundingBox;
///
/// let cropped = BoundingBox::new(9.0, 9.0, 50.0, 50.0);
/// let native = to_native_frame(&cropped);
/// assert_eq!(native, BoundingBox::new(100.0, 100.0, 200.0, 200.0));
/// ```
pub fn to_native_frame(bbox: &BoundingBox) -> BoundingBox {
    BoundingBox::new(
        (bbox.x + CROP_MARGIN) * DOWNSCALE,
        (bbox.y + CROP_MARGIN) * DOWNSCALE,
        bbox.width * DOWNSCALE,
        bbox.height * DOWNSCALE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_box_needs_no_clipping() {
        let native = BoundingBox::new(100.0, 100.0, 200.0, 200.0);
        // 100/4 = 25, shifted by the 16-pixel margin -> 9; 200/4 = 50.
        let cropped = to_model_frame(&native, true);
        assert_eq!(cropped, BoundingBox::new(9.0, 9.0, 50.0, 50.0));
    }

    #[test]
    fn test_left_edge_clipped_by_overhang() {
        // At the 256 scale the box spans [10, 35); the crop removes [0, 16),
        // leaving [16, 35) -> origin 0, width 19.
        let native = BoundingBox::new(40.0, 40.0, 100.0, 100.0);
        let cropped = to_model_frame(&native, true);
        assert_eq!(cropped, BoundingBox::new(0.0, 0.0, 19.0, 19.0));
    }

    #[test]
    fn test_right_edge_clipped_to_frame_border() {
        let native = BoundingBox::new(800.0, 800.0, 224.0, 224.0);
        let cropped = to_model_frame(&native, true);
        assert_eq!(cropped, BoundingBox::new(184.0, 184.0, 40.0, 40.0));
        assert_eq!(cropped.right(), 224.0);
        assert_eq!(cropped.bottom(), 224.0);
    }

    #[test]
    fn test_box_inside_removed_margin_collapses() {
        // Spans [0, 10) at the 256 scale, entirely inside the removed border.
        let native = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
        let cropped = to_model_frame(&native, true);
        assert_eq!(cropped, BoundingBox::new(0.0, 0.0, 0.0, 0.0));
        assert!(!cropped.is_valid());
    }

    #[test]
    fn test_unclipped_path_may_go_negative() {
        let native = BoundingBox::new(0.0, 0.0, 40.0, 40.0);
        let cropped = to_model_frame(&native, false);
        assert_eq!(cropped, BoundingBox::new(-16.0, -16.0, 10.0, 10.0));
    }

    #[test]
    fn test_output_is_truncated_not_rounded() {
        let native = BoundingBox::new(101.0, 103.0, 201.0, 202.0);
        let cropped = to_model_frame(&native, true);
        assert_eq!(cropped, BoundingBox::new(9.0, 9.0, 50.0, 50.0));
    }

    #[test]
    fn test_round_trip_for_in_frame_boxes() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 224.0, 224.0),
            BoundingBox::new(9.0, 9.0, 50.0, 50.0),
            BoundingBox::new(200.0, 100.0, 24.0, 124.0),
        ];
        for b in boxes {
            let round_tripped = to_model_frame(&to_native_frame(&b), true);
            assert_eq!(round_tripped, b);
        }
    }

    #[test]
    fn test_native_frame_inverse() {
        let cropped = BoundingBox::new(0.0, 0.0, 224.0, 224.0);
        let native = to_native_frame(&cropped);
        assert_eq!(native, BoundingBox::new(64.0, 64.0, 896.0, 896.0));
    }
}
