//! Interpolating splines for positions and orientations.
//!
//! Both splines treat their control points as evenly spaced in time:
//! `interpolate(t)` maps `t` in `[0, 1]` across all segments, while
//! `interpolate_segment(index, t)` stays within one segment. Tangents are
//! recalculated whenever a point is added or moved. A spline is closed when
//! its first and last points coincide.

use cgmath::{InnerSpace, One, Zero};

use super::{Quaternion, QuaternionExt, Real, Vector3, squad};

/// Hermite spline through a list of points with Catmull-Rom tangents.
#[derive(Clone, Debug, Default)]
pub struct PositionSpline {
    points: Vec<Vector3>,
    tangents: Vec<Vector3>,
}

impl PositionSpline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Vector3) {
        self.points.push(point);
        self.recalc_tangents();
    }

    pub fn point(&self, index: usize) -> Option<&Vector3> {
        self.points.get(index)
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Moves an existing point. Out of range indices are ignored.
    pub fn update_point(&mut self, index: usize, point: Vector3) {
        if let Some(p) = self.points.get_mut(index) {
            *p = point;
            self.recalc_tangents();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.tangents.clear();
    }

    pub fn tangent(&self, index: usize) -> Option<&Vector3> {
        self.tangents.get(index)
    }

    /// Catmull-Rom tangents: half the vector between the neighbouring points.
    pub fn recalc_tangents(&mut self) {
        self.tangents.clear();
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let closed = self.points[0] == self.points[n - 1];
        let last = n - 1;
        for i in 0..n {
            let tangent = if i == 0 {
                if closed {
                    (self.points[1] - self.points[last - 1]) * 0.5
                } else {
                    (self.points[1] - self.points[0]) * 0.5
                }
            } else if i == last {
                if closed {
                    (self.points[1] - self.points[last - 1]) * 0.5
                } else {
                    (self.points[last] - self.points[last - 1]) * 0.5
                }
            } else {
                (self.points[i + 1] - self.points[i - 1]) * 0.5
            };
            self.tangents.push(tangent);
        }
    }

    /// Position at `t` in `[0, 1]` across the whole spline.
    pub fn interpolate(&self, t: Real) -> Vector3 {
        if self.points.is_empty() {
            return Vector3::zero();
        }
        let segments = (self.points.len() - 1) as Real;
        let global = t.clamp(0.0, 1.0) * segments;
        let index = global.floor() as usize;
        self.interpolate_segment(index, global - index as Real)
    }

    /// Position at `t` in `[0, 1]` between point `index` and `index + 1`.
    pub fn interpolate_segment(&self, index: usize, t: Real) -> Vector3 {
        let Some(&p1) = self.points.get(index) else {
            return self.points.last().copied().unwrap_or_else(Vector3::zero);
        };
        if index + 1 >= self.points.len() || t == 0.0 {
            return p1;
        }
        let p2 = self.points[index + 1];
        if t == 1.0 {
            return p2;
        }

        let t2 = t * t;
        let t3 = t2 * t;
        let h_p1 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h_p2 = -2.0 * t3 + 3.0 * t2;
        let h_t1 = t3 - 2.0 * t2 + t;
        let h_t2 = t3 - t2;
        p1 * h_p1 + p2 * h_p2 + self.tangents[index] * h_t1 + self.tangents[index + 1] * h_t2
    }
}

/// Smooth interpolation through orientations using squad.
#[derive(Clone, Debug, Default)]
pub struct RotationalSpline {
    points: Vec<Quaternion>,
    tangents: Vec<Quaternion>,
}

impl RotationalSpline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Quaternion) {
        self.points.push(point);
        self.recalc_tangents();
    }

    pub fn point(&self, index: usize) -> Option<&Quaternion> {
        self.points.get(index)
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn update_point(&mut self, index: usize, point: Quaternion) {
        if let Some(p) = self.points.get_mut(index) {
            *p = point;
            self.recalc_tangents();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.tangents.clear();
    }

    /// Shoemake's inner control points:
    /// `a_i = q_i * exp(-(ln(q_i^-1 q_{i+1}) + ln(q_i^-1 q_{i-1})) / 4)`.
    pub fn recalc_tangents(&mut self) {
        self.tangents.clear();
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let last = n - 1;
        let closed = self.points[0] == self.points[last];
        for i in 0..n {
            let p = self.points[i];
            let inv = p.inverse();
            let (next, prev) = if i == 0 {
                (self.points[1], if closed { self.points[last - 1] } else { p })
            } else if i == last {
                (if closed { self.points[1] } else { p }, self.points[i - 1])
            } else {
                (self.points[i + 1], self.points[i - 1])
            };
            let part1 = (inv * next).ln();
            let part2 = (inv * prev).ln();
            let pre_exp = (part1 + part2) * -0.25;
            self.tangents.push(p * pre_exp.exp());
        }
    }

    pub fn interpolate(&self, t: Real, shortest_path: bool) -> Quaternion {
        if self.points.is_empty() {
            return Quaternion::one();
        }
        let segments = (self.points.len() - 1) as Real;
        let global = t.clamp(0.0, 1.0) * segments;
        let index = global.floor() as usize;
        self.interpolate_segment(index, global - index as Real, shortest_path)
    }

    pub fn interpolate_segment(&self, index: usize, t: Real, shortest_path: bool) -> Quaternion {
        let Some(&p) = self.points.get(index) else {
            return self.points.last().copied().unwrap_or_else(Quaternion::one);
        };
        if index + 1 >= self.points.len() || t == 0.0 {
            return p;
        }
        let q = self.points[index + 1];
        if t == 1.0 {
            return q;
        }
        let a = self.tangents[index];
        let b = self.tangents[index + 1];
        squad(t, p, a, b, q, shortest_path).normalize()
    }
}
