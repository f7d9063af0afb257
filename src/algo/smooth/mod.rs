//! Cotangent-weighted Laplacian and Taubin smoothing.
//!
//! Every iteration moves each interior vertex toward the cotangent-weighted
//! mean of its one-ring. In [`SmoothMode::Taubin`] a second, negative step
//! follows to undo most of the shrinkage plain Laplacian smoothing causes.
//!
//! # Update rule
//!
//! For iteration `m` in `0..floor(iterations × envelope)` and every vertex `p`:
//!
//! ```text
//! boundary or unselected     -> unchanged
//! d  = L(p)                  -> unchanged if undefined or zero
//! p' = p + λ·d
//! Taubin: d' = L(p')         -> stop at p' if undefined or zero
//!         p'' = p' + μ·d'
//! ```
//!
//! `L` always reads the previous iteration's positions, including in the
//! Taubin step, so no vertex sees another vertex's update from the same
//! iteration. The result does not depend on traversal order or on whether
//! the per-vertex loop runs in parallel.
//!
//! # Example
//!
//! ```
//! use cotsmooth::prelude::*;
//! use cotsmooth::algo::smooth::{smooth_mesh, SmoothMode, SmoothOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.3), // lifted center
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let options = SmoothOptions::default()
//!     .with_mode(SmoothMode::Taubin)
//!     .with_iterations(5);
//! smooth_mesh(&mut mesh, &options).unwrap();
//!
//! assert!(mesh.position(VertexId::new(0)).z < 0.3);
//! ```

mod laplace;
mod snapshot;
mod weight;

pub use laplace::laplacian;
pub use snapshot::PositionSnapshot;
pub use weight::{cotangent_limit, cotangent_weight};

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, Neighborhood, RingTable, VertexId};

use super::Progress;

/// Which update is applied per iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothMode {
    /// One step with coefficient λ.
    #[default]
    Laplace,
    /// A λ step followed by a μ step (λ|μ smoothing).
    Taubin,
}

/// Options for cotangent smoothing.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Laplace-only or Laplace followed by the Taubin step.
    pub mode: SmoothMode,

    /// Requested number of iterations, before the envelope is applied.
    pub iterations: usize,

    /// Coefficient of the first step, in `[0, 1]`.
    pub lambda: f64,

    /// Coefficient of the Taubin step, in `[-1, 0]`.
    pub mu: f64,

    /// Fades the effect by scaling the iteration count, in `[0, 1]`.
    pub envelope: f64,

    /// Whether to run the per-vertex loop on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            mode: SmoothMode::Laplace,
            iterations: 0,
            lambda: 0.33,
            mu: -0.34,
            envelope: 1.0,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Set the smoothing mode.
    pub fn with_mode(mut self, mode: SmoothMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the requested number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set λ. Checked by [`validate`](Self::validate).
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set μ. Checked by [`validate`](Self::validate).
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Set the envelope. Checked by [`validate`](Self::validate).
    pub fn with_envelope(mut self, envelope: f64) -> Self {
        self.envelope = envelope;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that every coefficient is finite and inside its domain.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_range("lambda", self.lambda, 0.0..=1.0, "must be in [0, 1]")?;
        check_range("mu", self.mu, -1.0..=0.0, "must be in [-1, 0]")?;
        check_range("envelope", self.envelope, 0.0..=1.0, "must be in [0, 1]")
    }

    /// Number of iterations actually run: `floor(iterations × envelope)`.
    pub fn effective_iterations(&self) -> usize {
        (self.iterations as f64 * self.envelope).floor() as usize
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
    reason: &'static str,
) -> Result<()> {
    if !value.is_finite() {
        return Err(MeshError::invalid_param(name, value, "must be finite"));
    }
    if !range.contains(&value) {
        return Err(MeshError::invalid_param(name, value, reason));
    }
    Ok(())
}

/// Smooth the selected vertices of `initial` over `topology`.
///
/// Returns a snapshot with the same selection as `initial`. Boundary
/// vertices keep their input position bit for bit.
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] if `options` fail [`SmoothOptions::validate`]
/// - [`MeshError::TopologyMismatch`] if `initial` and `topology` disagree on the vertex count
pub fn smooth<N: Neighborhood>(
    topology: &N,
    initial: &PositionSnapshot,
    options: &SmoothOptions,
) -> Result<PositionSnapshot> {
    smooth_with_progress(topology, initial, options, &Progress::none())
}

/// [`smooth`] with progress reporting, once per iteration.
pub fn smooth_with_progress<N: Neighborhood>(
    topology: &N,
    initial: &PositionSnapshot,
    options: &SmoothOptions,
    progress: &Progress,
) -> Result<PositionSnapshot> {
    options.validate()?;

    if initial.len() != topology.num_vertices() {
        return Err(MeshError::TopologyMismatch {
            topology: topology.num_vertices(),
            positions: initial.len(),
        });
    }

    let rings = RingTable::from_neighborhood(topology);
    Ok(run(&rings, initial.clone(), options, progress))
}

/// Smooth a dense position list where every vertex is selected.
///
/// # Example
///
/// ```
/// use cotsmooth::algo::smooth::{smooth_positions, SmoothOptions};
/// use cotsmooth::mesh::RingTable;
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(-1.0, 0.0, 0.0),
///     Point3::new(0.0, -1.0, 0.0),
/// ];
/// let rings = vec![vec![1, 2, 3, 4], vec![], vec![], vec![], vec![]];
/// let topology = RingTable::new(&rings, vec![false, true, true, true, true]).unwrap();
///
/// let options = SmoothOptions::default().with_iterations(1).with_lambda(1.0);
/// let out = smooth_positions(&topology, &positions, &options).unwrap();
/// assert!((out[0] - Point3::origin()).norm() < 1e-12);
/// ```
pub fn smooth_positions<N: Neighborhood>(
    topology: &N,
    positions: &[Point3<f64>],
    options: &SmoothOptions,
) -> Result<Vec<Point3<f64>>> {
    let result = smooth(topology, &PositionSnapshot::full(positions), options)?;
    Ok(result.into_positions(positions))
}

/// Smooth a mesh in place, using its own topology and positions.
pub fn smooth_mesh(mesh: &mut HalfEdgeMesh, options: &SmoothOptions) -> Result<()> {
    smooth_mesh_with_progress(mesh, options, &Progress::none())
}

/// [`smooth_mesh`] with progress reporting.
pub fn smooth_mesh_with_progress(
    mesh: &mut HalfEdgeMesh,
    options: &SmoothOptions,
    progress: &Progress,
) -> Result<()> {
    let initial = PositionSnapshot::from_mesh(mesh);
    let result = smooth_with_progress(mesh, &initial, options, progress)?;
    result.apply_to(mesh);
    Ok(())
}

/// The iteration loop. Parameters are already validated.
fn run(
    rings: &RingTable,
    initial: PositionSnapshot,
    options: &SmoothOptions,
    progress: &Progress,
) -> PositionSnapshot {
    let total = options.effective_iterations();

    log::debug!(
        "{:?} smoothing: {} iterations, {} of {} vertices selected, {} boundary, lambda={}, mu={}",
        options.mode,
        total,
        initial.num_selected(),
        rings.len(),
        rings.num_boundary(),
        options.lambda,
        options.mu,
    );

    if total == 0 {
        return initial;
    }

    let mut previous = initial;
    let mut next = previous.clone();

    for m in 0..total {
        progress.report(m, total, "Cotangent smoothing");

        relax_all(rings, previous.as_slice(), next.as_mut_slice(), options);

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "iteration {}: max displacement {:.3e}",
                m,
                max_displacement(previous.as_slice(), next.as_slice())
            );
        }

        std::mem::swap(&mut previous, &mut next);
    }

    progress.report(total, total, "Cotangent smoothing");
    previous
}

/// One Jacobi sweep: read `previous`, write every slot of `next`.
fn relax_all(
    rings: &RingTable,
    previous: &[Option<Point3<f64>>],
    next: &mut [Option<Point3<f64>>],
    options: &SmoothOptions,
) {
    let update = |(i, slot): (usize, &mut Option<Point3<f64>>)| {
        *slot = previous[i].map(|p| relax_vertex(rings, previous, VertexId::new(i), p, options));
    };

    if options.parallel {
        next.par_iter_mut().enumerate().for_each(update);
    } else {
        next.iter_mut().enumerate().for_each(update);
    }
}

/// New position of a single selected vertex.
fn relax_vertex(
    rings: &RingTable,
    previous: &[Option<Point3<f64>>],
    v: VertexId,
    p: Point3<f64>,
    options: &SmoothOptions,
) -> Point3<f64> {
    if rings.boundary(v) {
        return p;
    }

    let ring = rings.ring(v);

    let Some(d) = displacement(ring, previous, &p) else {
        return p;
    };
    let moved = p + d * options.lambda;

    if options.mode == SmoothMode::Taubin {
        if let Some(d) = displacement(ring, previous, &moved) {
            return moved + d * options.mu;
        }
    }

    moved
}

/// The Laplacian, with an exact zero treated like an undefined result.
#[inline]
fn displacement(ring: &[VertexId], snapshot: &[Option<Point3<f64>>], p: &Point3<f64>) -> Option<Vector3<f64>> {
    laplacian(ring, snapshot, p).filter(|d| *d != Vector3::zeros())
}

fn max_displacement(before: &[Option<Point3<f64>>], after: &[Option<Point3<f64>>]) -> f64 {
    before
        .iter()
        .zip(after)
        .filter_map(|(a, b)| Some(nalgebra::distance(a.as_ref()?, b.as_ref()?)))
        .fold(0.0, f64::max)
}
