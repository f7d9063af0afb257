//! Cotangent edge weights.
//!
//! For an edge `p-q` shared by triangles `(p, q, r1)` and `(p, q, r2)`, the
//! weight is the mean cotangent of the two angles opposite the edge, at `r1`
//! and `r2`. Angles come from the law of cosines on edge lengths, so the
//! weight only depends on distances between the four points.

use nalgebra::Point3;

/// Largest cotangent magnitude a single angle may contribute.
///
/// Equals `cos(1e-6) / sin(1e-6)` evaluated in single precision, which keeps
/// near-collinear corners from producing near-infinite weights.
#[inline]
pub fn cotangent_limit() -> f64 {
    let angle = 1.0e-6_f32;
    f64::from(angle.cos() / angle.sin())
}

/// Cotangent weight of edge `p-q`.
///
/// `r1` and `r2` are the apices of the two triangles that share the edge
/// (the ring neighbors on either side of `q`). Swapping them gives the same
/// result.
///
/// If either triangle is degenerate the whole edge weight is 0. Each
/// cotangent is clamped to `±`[`cotangent_limit`]. The result is never NaN
/// or infinite.
///
/// # Example
///
/// ```
/// use cotsmooth::algo::smooth::cotangent_weight;
/// use nalgebra::Point3;
///
/// // Both opposite angles are 45 degrees, so each cotangent is 1.
/// let w = cotangent_weight(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
///     &Point3::new(0.0, -1.0, 0.0),
/// );
/// assert!((w - 1.0).abs() < 1e-12);
/// ```
pub fn cotangent_weight(p: &Point3<f64>, q: &Point3<f64>, r1: &Point3<f64>, r2: &Point3<f64>) -> f64 {
    let edge = nalgebra::distance(p, q);
    let limit = cotangent_limit();
    match (
        opposite_cotangent(p, q, r1, edge, limit),
        opposite_cotangent(p, q, r2, edge, limit),
    ) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        _ => 0.0,
    }
}

/// Cotangent of the angle at `r` in triangle `(p, q, r)`, where `edge = |p - q|`.
/// `None` if the angle is undefined.
fn opposite_cotangent(p: &Point3<f64>, q: &Point3<f64>, r: &Point3<f64>, edge: f64, limit: f64) -> Option<f64> {
    let b = nalgebra::distance(p, r);
    let c = nalgebra::distance(q, r);

    let cos = (b * b + c * c - edge * edge) / (2.0 * b * c);
    let sin_sq = 1.0 - cos * cos;

    // Zero-length sides give a NaN or infinite cosine, collinear corners
    // give |cos| >= 1. Both leave the angle undefined.
    if sin_sq.is_nan() || sin_sq <= 0.0 {
        return None;
    }

    Some((cos / sin_sq.sqrt()).clamp(-limit, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_limit_value() {
        let limit = cotangent_limit();
        assert!(limit > 9.0e5 && limit < 1.1e6, "limit = {}", limit);
    }

    #[test]
    fn test_right_isoceles_weight() {
        let w = cotangent_weight(
            &pt(0.0, 0.0, 0.0),
            &pt(1.0, 0.0, 0.0),
            &pt(0.0, 1.0, 0.0),
            &pt(0.0, -1.0, 0.0),
        );
        assert!((w - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equilateral_weight() {
        let h = 3f64.sqrt() / 2.0;
        let w = cotangent_weight(
            &pt(0.0, 0.0, 0.0),
            &pt(1.0, 0.0, 0.0),
            &pt(0.5, h, 0.0),
            &pt(0.5, -h, 0.0),
        );
        let cot60 = 1.0 / 3f64.sqrt();
        assert!((w - cot60).abs() < 1e-12);
    }

    #[test]
    fn test_obtuse_angle_is_negative() {
        // Apex sits close to the edge, so the opposite angle is obtuse.
        let w = cotangent_weight(
            &pt(0.0, 0.0, 0.0),
            &pt(2.0, 0.0, 0.0),
            &pt(1.0, 0.1, 0.0),
            &pt(1.0, -0.1, 0.0),
        );
        assert!(w < 0.0);
    }

    #[test]
    fn test_swapping_apices_is_symmetric() {
        let p = pt(0.1, -0.2, 0.3);
        let q = pt(1.2, 0.1, -0.1);
        let r1 = pt(0.4, 0.9, 0.2);
        let r2 = pt(0.7, -1.1, 0.5);
        assert_eq!(cotangent_weight(&p, &q, &r1, &r2), cotangent_weight(&p, &q, &r2, &r1));
    }

    #[test]
    fn test_coincident_p_and_q_is_finite() {
        let p = pt(0.0, 0.0, 0.0);
        let w = cotangent_weight(&p, &p, &pt(1.0, 0.0, 0.0), &pt(0.0, 1.0, 0.0));
        assert!(w.is_finite());
        assert_eq!(w, 0.0);
    }

    #[test]
    fn test_collinear_apex_contributes_zero() {
        // r1 lies on the segment p-q (180 degree angle), r2 is regular.
        let p = pt(0.0, 0.0, 0.0);
        let q = pt(2.0, 0.0, 0.0);
        let w = cotangent_weight(&p, &q, &pt(1.0, 0.0, 0.0), &pt(1.0, -1.0, 0.0));
        assert_eq!(w, 0.0);

        // Apex beyond q on the same line: 0 degree angle.
        let w = cotangent_weight(&p, &q, &pt(3.0, 0.0, 0.0), &pt(3.0, 0.0, 0.0));
        assert!(w.is_finite());
        assert_eq!(w, 0.0);
    }

    #[test]
    fn test_one_degenerate_side_zeroes_whole_weight() {
        // r2 alone would give cot = 0.75 (halved to 0.375); r1 is on the
        // edge, so the edge weight is dropped entirely.
        let p = pt(0.0, 0.0, 0.0);
        let q = pt(1.0, 0.0, 0.0);
        let w = cotangent_weight(&p, &q, &pt(0.3, 0.0, 0.0), &pt(0.5, -1.0, 0.0));
        assert_eq!(w, 0.0);
        assert_eq!(cotangent_weight(&p, &q, &pt(0.5, -1.0, 0.0), &pt(0.3, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_apex_on_endpoint_is_finite() {
        let p = pt(0.0, 0.0, 0.0);
        let q = pt(1.0, 0.0, 0.0);
        let w = cotangent_weight(&p, &q, &q, &p);
        assert!(w.is_finite());
        assert_eq!(w, 0.0);
    }

    #[test]
    fn test_near_collinear_is_clamped() {
        // Apex angle of about 1e-7 rad: the raw cotangent is ~1e7.
        let p = pt(0.0, -5.0e-8, 0.0);
        let q = pt(0.0, 5.0e-8, 0.0);
        let apex = pt(1.0, 0.0, 0.0);
        let w = cotangent_weight(&p, &q, &apex, &apex);
        assert_eq!(w, cotangent_limit());
    }
}
