//! Ground-truth annotation loading.
//!
//! The annotation table arrives either as a CSV file (columns `x`, `y`, `w`,
//! `h`, `Finding Label`, one row per test image in test-set order) or as a
//! JSON array of records. Activation maps are produced upstream and handed
//! over in memory; decoding their on-disk array format is not a concern of
//! this crate.

use polars::prelude::*;
use std::path::Path;

use crate::error::{CamEvalError, Result};
use crate::types::{BoundingBox, GroundTruth};

/// Columns the annotation table must carry.
const REQUIRED_COLUMNS: [&str; 5] = ["x", "y", "w", "h", "Finding Label"];

/// Load ground-truth boxes from an annotation CSV.
///
/// Row order defines the image index: row `i` annotates test image `i`.
///
/// # Errors
///
/// Returns [`CamEvalError::MissingColumn`] if a required column is absent,
/// [`CamEvalError::EmptyDataset`] for a table with no rows, and
/// [`CamEvalError::InvalidBoundingBox`] for null or negative-extent boxes.
///
/// # Example
///
/// ```no_run
/// use cam_eval::loader::load_ground_truth_csv;
///
/// let boxes = load_ground_truth_csv("BBox_List_2017.csv").unwrap();
/// println!("loaded {} annotations", boxes.len());
/// ```
pub fn load_ground_truth_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruth>> {
    let df = CsvReader::from_path(path.as_ref())?.has_header(true).finish()?;
    validate_columns(&df, &REQUIRED_COLUMNS)?;

    if df.height() == 0 {
        return Err(CamEvalError::EmptyDataset(
            "annotation table has no rows".to_string(),
        ));
    }

    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;
    let ws = df.column("w")?.cast(&DataType::Float64)?;
    let hs = df.column("h")?.cast(&DataType::Float64)?;
    let xs = xs.f64()?;
    let ys = ys.f64()?;
    let ws = ws.f64()?;
    let hs = hs.f64()?;
    let labels = df.column("Finding Label")?.str()?;

    let mut ground_truths = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let bbox = BoundingBox::new(
            required_value(xs.get(i), i, "x")?,
            required_value(ys.get(i), i, "y")?,
            required_value(ws.get(i), i, "w")?,
            required_value(hs.get(i), i, "h")?,
        );
        validate_bbox(&bbox, i)?;

        let label = labels.get(i).ok_or_else(|| {
            CamEvalError::InvalidBoundingBox(format!("row {} has a null Finding Label", i))
        })?;

        ground_truths.push(GroundTruth::new(i, label, bbox));
    }

    Ok(ground_truths)
}

/// Load ground-truth boxes from a JSON array of records.
///
/// Unlike the CSV path, each record carries its own `image_index`.
///
/// # Errors
///
/// Returns [`CamEvalError::JsonError`] for malformed JSON,
/// [`CamEvalError::EmptyDataset`] for an empty array, and
/// [`CamEvalError::InvalidBoundingBox`] for negative-extent boxes.
///
/// # Example
///
/// ```
/// use cam_eval::loader::load_ground_truth_json;
///
/// let json = r#"[
///     {
///         "image_index": 0,
///         "label": "Cardiomegaly",
///         "bbox": {"x": 300.0, "y": 400.0, "width": 420.0, "height": 300.0}
///     }
/// ]"#;
/// let boxes = load_ground_truth_json(json).unwrap();
/// assert_eq!(boxes.len(), 1);
/// ```
pub fn load_ground_truth_json(json_str: &str) -> Result<Vec<GroundTruth>> {
    let ground_truths: Vec<GroundTruth> = serde_json::from_str(json_str)?;

    if ground_truths.is_empty() {
        return Err(CamEvalError::EmptyDataset(
            "annotation array has no records".to_string(),
        ));
    }

    for (i, gt) in ground_truths.iter().enumerate() {
        validate_bbox(&gt.bbox, i)?;
    }

    Ok(ground_truths)
}

/// Validate that a DataFrame contains all required columns.
fn validate_columns(df: &DataFrame, required_columns: &[&str]) -> Result<()> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for col in required_columns {
        if !column_names.iter().any(|c| c == col) {
            return Err(CamEvalError::MissingColumn(col.to_string()));
        }
    }

    Ok(())
}

fn required_value(value: Option<f64>, row: usize, column: &str) -> Result<f64> {
    value.ok_or_else(|| {
        CamEvalError::InvalidBoundingBox(format!("row {} has a null {} value", row, column))
    })
}

fn validate_bbox(bbox: &BoundingBox, row: usize) -> Result<()> {
    if bbox.width < 0.0 || bbox.height < 0.0 {
        return Err(CamEvalError::InvalidBoundingBox(format!(
            "row {} has negative dimensions ({} x {})",
            row, bbox.width, bbox.height
        )));
    }
    Ok(())
}
