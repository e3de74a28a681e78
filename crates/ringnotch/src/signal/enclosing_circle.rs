//! Minimal enclosing circle (Welzl, randomized incremental form).

use nalgebra::{Matrix2, Vector2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Relative slack for point-in-circle tests.
const CONTAINS_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circle {
    pub(crate) center: [f64; 2],
    pub(crate) radius: f64,
}

impl Circle {
    fn from_point(p: [f64; 2]) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn from_diameter(a: [f64; 2], b: [f64; 2]) -> Self {
        let center = [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5];
        Self {
            center,
            radius: dist(center, a).max(dist(center, b)),
        }
    }

    /// Circumcircle of three points; falls back to the widest pair when they
    /// are (nearly) collinear.
    fn from_triangle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let m = Matrix2::new(
            2.0 * (b[0] - a[0]),
            2.0 * (b[1] - a[1]),
            2.0 * (c[0] - a[0]),
            2.0 * (c[1] - a[1]),
        );
        let rhs = Vector2::new(norm_sq(b) - norm_sq(a), norm_sq(c) - norm_sq(a));
        match m.try_inverse().map(|inv| inv * rhs) {
            Some(o) if o.iter().all(|v| v.is_finite()) => {
                let center = [o[0], o[1]];
                Self {
                    center,
                    radius: dist(center, a).max(dist(center, b)).max(dist(center, c)),
                }
            }
            _ => [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ]
            .into_iter()
            .fold(Self::from_point(a), |best, cand| {
                if cand.radius > best.radius {
                    cand
                } else {
                    best
                }
            }),
        }
    }

    fn contains(&self, p: [f64; 2]) -> bool {
        dist(self.center, p) <= self.radius * (1.0 + CONTAINS_EPS) + CONTAINS_EPS
    }
}

#[inline]
fn norm_sq(p: [f64; 2]) -> f64 {
    p[0] * p[0] + p[1] * p[1]
}

#[inline]
fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Smallest circle containing every point, or `None` for an empty set.
///
/// Points are shuffled with a fixed `seed`, so the result is deterministic.
pub(crate) fn min_enclosing_circle(points: &[[f64; 2]], seed: u64) -> Option<Circle> {
    if points.is_empty() {
        return None;
    }
    let mut pts = points.to_vec();
    pts.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut circle = Circle::from_point(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::from_point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_triangle(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}
