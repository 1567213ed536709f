//! Basic evaluation example demonstrating core functionality.

use cam_eval::{
    evaluator::run_evaluation, frame::to_model_frame, load_ground_truth_json,
    metrics::iou::calculate_iou, ActivationMap, ActivationSet, BoundingBox,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Activation-Map Localization Example ===\n");

    // Example 1: IoU calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 50.0, 50.0);
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: mapping an annotation into the model-input frame
    println!("2. Coordinate Mapping");
    let native = BoundingBox::new(100.0, 100.0, 200.0, 200.0);
    let cropped = to_model_frame(&native, true);
    println!(
        "   native ({}, {}, {}, {}) -> cropped ({}, {}, {}, {})",
        native.x, native.y, native.width, native.height,
        cropped.x, cropped.y, cropped.width, cropped.height,
    );
    println!();

    // Example 3: load ground-truth annotations
    println!("3. Loading Ground Truth");
    let ground_truth_json = r#"[
        {
            "image_index": 0,
            "label": "Mass",
            "bbox": {"x": 100.0, "y": 100.0, "width": 200.0, "height": 200.0}
        },
        {
            "image_index": 1,
            "label": "Cardiomegaly",
            "bbox": {"x": 300.0, "y": 400.0, "width": 420.0, "height": 300.0}
        }
    ]"#;
    let ground_truths = load_ground_truth_json(ground_truth_json)?;
    println!("   loaded {} annotations", ground_truths.len());
    println!();

    // Example 4: run the evaluation
    //
    // The activation maps would normally come from the classifier's Grad-CAM
    // pass; here image 0 gets a synthetic map that activates exactly over the
    // mapped ground truth, and image 1 has no usable map at all.
    println!("4. Batch Evaluation");
    let mut pixels = vec![0.0_f32; 224 * 224];
    for row in 9..59 {
        for col in 9..59 {
            pixels[row * 224 + col] = 1.0;
        }
    }
    let mut maps = ActivationSet::new();
    maps.insert(ActivationMap::from_vec(0, "Mass", 224, 224, pixels)?);

    let stats = run_evaluation(&ground_truths, &maps);
    stats.print_summary();

    Ok(())
}
