//! Connected-component labeling for binary foreground masks.

use ndarray::Array2;

/// Label the connected components of a boolean grid.
///
/// Uses 4-connectivity: cells join a component through shared edges only,
/// never diagonally. Components are numbered 1..=count in the order their
/// first cell is reached by a row-major scan; 0 marks background. The scratch
/// state is local to the call, so the function is safe to run concurrently
/// over different masks.
///
/// # Returns
///
/// The label grid (same shape as `mask`) and the number of components found.
///
/// # Example
///
/// ```
/// use cam_eval::labeling::label_components;
/// use ndarray::array;
///
/// let mask = array![
///     [true, true, false],
///     [false, false, false],
///     [false, true, true],
/// ];
/// let (labels, count) = label_components(&mask);
/// assert_eq!(count, 2);
/// assert_eq!(labels[[0, 0]], 1);
/// assert_eq!(labels[[2, 1]], 2);
/// ```
pub fn label_components(mask: &Array2<bool>) -> (Array2<u32>, u32) {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::<u32>::zeros((rows, cols));
    let mut count = 0u32;
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            if !mask[[row, col]] || labels[[row, col]] != 0 {
                continue;
            }

            // New component: flood fill from its first cell.
            count += 1;
            labels[[row, col]] = count;
            stack.push((row, col));

            while let Some((r, c)) = stack.pop() {
                if r > 0 && mask[[r - 1, c]] && labels[[r - 1, c]] == 0 {
                    labels[[r - 1, c]] = count;
                    stack.push((r - 1, c));
                }
                if r + 1 < rows && mask[[r + 1, c]] && labels[[r + 1, c]] == 0 {
                    labels[[r + 1, c]] = count;
                    stack.push((r + 1, c));
                }
                if c > 0 && mask[[r, c - 1]] && labels[[r, c - 1]] == 0 {
                    labels[[r, c - 1]] = count;
                    stack.push((r, c - 1));
                }
                if c + 1 < cols && mask[[r, c + 1]] && labels[[r, c + 1]] == 0 {
                    labels[[r, c + 1]] = count;
                    stack.push((r, c + 1));
                }
            }
        }
    }

    (labels, count)
}
