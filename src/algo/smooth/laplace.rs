//! Discrete Laplace operator with cotangent weights.

use nalgebra::{Point3, Vector3};

use super::weight::cotangent_weight;
use crate::mesh::VertexId;

/// Cotangent-weighted Laplacian of `p` over its one-ring.
///
/// Returns the offset from `p` to the weighted mean of the ring:
///
/// ```text
/// L(p) = (Σ w_i · q_i) / (Σ w_i) - p,   w_i = weight(p, q_i, q_{i+1}, q_{i-1})
/// ```
///
/// `snapshot` maps vertex index to position; `None` marks a vertex outside
/// the smoothed set. The result is `None` when:
///
/// - the ring is empty,
/// - any ring vertex is missing from the snapshot (the whole vertex is
///   skipped, no partial sum is formed),
/// - the weights sum to exactly zero, or
/// - the quotient is not finite.
///
/// `p` does not have to be the snapshot position of the center vertex; the
/// Taubin step evaluates the operator at an already moved point.
pub fn laplacian(ring: &[VertexId], snapshot: &[Option<Point3<f64>>], p: &Point3<f64>) -> Option<Vector3<f64>> {
    let n = ring.len();
    if n == 0 {
        return None;
    }

    let position = |i: usize| snapshot.get(ring[i].index()).copied().flatten();

    let mut total = 0.0;
    let mut weighted = Vector3::zeros();

    for i in 0..n {
        let q = position(i)?;
        let next = position((i + 1) % n)?;
        let prev = position((i + n - 1) % n)?;

        let w = cotangent_weight(p, &q, &next, &prev);
        total += w;
        weighted += q.coords * w;
    }

    if total == 0.0 {
        return None;
    }

    let displacement = weighted / total - p.coords;
    displacement.iter().all(|c| c.is_finite()).then_some(displacement)
}
