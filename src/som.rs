//! Self-organising map (Kohonen) training and assignment over a
//! rectangular grid of prototype vectors.

use log::trace;

use crate::errors::ClusteringError;
use crate::kernels::{self, DistanceKernel};
use crate::matrix::ExpressionMatrix;
use crate::rng::RandomSource;

/// A rectangular grid of unit-normalised prototype vectors.
#[derive(Debug, Clone)]
pub struct SomGrid {
    nx: usize,
    ny: usize,
    cells: Vec<Vec<Vec<f64>>>,
}

impl SomGrid {
    fn new_random(nx: usize, ny: usize, n_features: usize, rng: &mut impl RandomSource) -> Self {
        let mut cells = vec![vec![vec![0.0; n_features]; ny]; nx];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                for x in cell.iter_mut() {
                    *x = rng.uniform_real(-1.0, 1.0);
                }
                normalize(cell);
            }
        }
        SomGrid { nx, ny, cells }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// The prototype vector stored at grid cell `(ix, iy)`.
    pub fn prototype(&self, ix: usize, iy: usize) -> &[f64] {
        &self.cells[ix][iy]
    }
}

fn normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn extract_row(matrix: &ExpressionMatrix, obj: usize, transpose: bool, n_features: usize) -> (Vec<f64>, Vec<bool>) {
    let mut vals = Vec::with_capacity(n_features);
    let mut mask = Vec::with_capacity(n_features);
    for k in 0..n_features {
        vals.push(matrix.value(obj, k, transpose));
        mask.push(matrix.present(obj, k, transpose));
    }
    (vals, mask)
}

/// Finds the grid cell whose prototype is closest to `(obj_vals, obj_mask)`
/// under `kernel`. Compares against the candidate cell `(ix, iy)` directly
/// in both orientations, so unlike the reference implementation's column
/// orientation this never freezes the winner at `(0, 0)`.
fn closest_cell(
    grid: &SomGrid,
    kernel: DistanceKernel,
    weight: &[f64],
    obj_vals: &[f64],
    obj_mask: &[bool],
) -> (usize, usize) {
    let n_features = weight.len();
    let dummy_mask = vec![true; n_features];
    let mut best = (0usize, 0usize);
    let mut best_d = f64::INFINITY;
    for ix in 0..grid.nx() {
        for iy in 0..grid.ny() {
            let d = kernels::eval(kernel, n_features, weight, obj_vals, obj_mask, grid.prototype(ix, iy), &dummy_mask);
            if d < best_d {
                best_d = d;
                best = (ix, iy);
            }
        }
    }
    best
}

/// Trains a SOM grid over `matrix`'s objects for `niter` iterations, with
/// radius and learning rate `tau0` linearly annealed to zero. The object
/// visit order is a single random permutation fixed at the start and
/// repeated (indexed modulo the object count) for the whole run. Fails if
/// there are fewer than two objects.
pub fn som_worker(
    matrix: &ExpressionMatrix,
    kernel: DistanceKernel,
    transpose: bool,
    nx: usize,
    ny: usize,
    niter: usize,
    tau0: f64,
    rng: &mut impl RandomSource,
) -> Result<SomGrid, ClusteringError> {
    let n_objects = matrix.n_objects(transpose);
    if n_objects < 2 {
        return Err(ClusteringError::TooFewObjects { n_objects });
    }
    let n_features = matrix.n_features(transpose);
    let weight: Vec<f64> = (0..n_features).map(|k| matrix.weight(k)).collect();
    let mut grid = SomGrid::new_random(nx, ny, n_features, rng);

    let norms: Vec<f64> = (0..n_objects)
        .map(|obj| {
            let sum_sq: f64 = (0..n_features)
                .filter(|&k| matrix.present(obj, k, transpose))
                .map(|k| {
                    let v = matrix.value(obj, k, transpose);
                    v * v
                })
                .sum();
            let norm = sum_sq.sqrt();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();

    let mut index: Vec<usize> = (0..n_objects).collect();
    rng.shuffle(&mut index);

    let max_radius = ((nx * nx + ny * ny) as f64).sqrt();

    for iter in 0..niter {
        let obj = index[iter % n_objects];
        let (obj_vals, obj_mask) = extract_row(matrix, obj, transpose, n_features);
        let (winner_x, winner_y) = closest_cell(&grid, kernel, &weight, &obj_vals, &obj_mask);

        let progress = iter as f64 / niter as f64;
        let radius = max_radius * (1.0 - progress);
        let tau = tau0 * (1.0 - progress);
        let norm = norms[obj];

        for ix in 0..nx {
            for iy in 0..ny {
                let dx = ix as f64 - winner_x as f64;
                let dy = iy as f64 - winner_y as f64;
                if (dx * dx + dy * dy).sqrt() > radius {
                    continue;
                }
                let cell = &mut grid.cells[ix][iy];
                for k in 0..n_features {
                    if obj_mask[k] {
                        let target = obj_vals[k] / norm;
                        cell[k] += tau * (target - cell[k]);
                    }
                }
                normalize(cell);
            }
        }
        trace!("som iter {iter}: winner=({winner_x},{winner_y}) radius={radius:.4} tau={tau:.4}");
    }
    Ok(grid)
}

/// Assigns every object in `matrix` to its nearest grid cell.
pub fn som_assign(matrix: &ExpressionMatrix, kernel: DistanceKernel, transpose: bool, grid: &SomGrid) -> Vec<(usize, usize)> {
    let n_features = matrix.n_features(transpose);
    let n_objects = matrix.n_objects(transpose);
    let weight: Vec<f64> = (0..n_features).map(|k| matrix.weight(k)).collect();

    (0..n_objects)
        .map(|obj| {
            let (obj_vals, obj_mask) = extract_row(matrix, obj, transpose, n_features);
            closest_cell(grid, kernel, &weight, &obj_vals, &obj_mask)
        })
        .collect()
}

/// Outcome of `som_cluster`: the trained (or supplied) grid, plus each
/// object's `(ix, iy)` assignment if requested.
pub struct SomOutcome {
    pub grid: SomGrid,
    pub assignment: Option<Vec<(usize, usize)>>,
}

/// Dispatches SOM training and, optionally, assignment. Trains a fresh grid
/// via [`som_worker`] when `initial_grid` is `None`; otherwise runs
/// assignment directly against the supplied grid.
pub fn som_cluster(
    matrix: &ExpressionMatrix,
    kernel: DistanceKernel,
    transpose: bool,
    nx: usize,
    ny: usize,
    niter: usize,
    tau0: f64,
    assign: bool,
    initial_grid: Option<SomGrid>,
    rng: &mut impl RandomSource,
) -> Result<SomOutcome, ClusteringError> {
    let grid = match initial_grid {
        Some(g) => g,
        None => som_worker(matrix, kernel, transpose, nx, ny, niter, tau0, rng)?,
    };
    let assignment = if assign { Some(som_assign(matrix, kernel, transpose, &grid)) } else { None };
    Ok(SomOutcome { grid, assignment })
}
