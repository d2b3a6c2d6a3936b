use cgmath::InnerSpace;

use super::{EPSILON, Quaternion, Radian, Real, Vector3};

/// Quaternion operations used by the rotational spline and by the
/// engine's orientation code.
pub trait QuaternionExt: Sized {
    fn from_angle_axis(angle: Radian, axis: Vector3) -> Self;

    /// Returns the rotation angle and a unit axis. The identity yields a zero
    /// angle around the x axis.
    fn to_angle_axis(&self) -> (Radian, Vector3);

    /// Natural logarithm, valid for unit quaternions.
    fn ln(&self) -> Self;

    /// Exponential of a pure quaternion (w == 0).
    fn exp(&self) -> Self;

    /// Inverse of a non-zero quaternion. A zero quaternion is returned unchanged.
    fn inverse(&self) -> Self;

    /// Compares two orientations, treating `q` and `-q` as equal.
    fn orientation_equals(&self, other: &Self, tolerance: Radian) -> bool;
}

impl QuaternionExt for Quaternion {
    fn from_angle_axis(angle: Radian, axis: Vector3) -> Self {
        let half = angle.0 * 0.5;
        Quaternion::from_sv(half.cos(), axis * half.sin())
    }

    fn to_angle_axis(&self) -> (Radian, Vector3) {
        let sqr_length = self.v.magnitude2();
        if sqr_length > 0.0 {
            let angle = 2.0 * self.s.clamp(-1.0, 1.0).acos();
            (cgmath::Rad(angle), self.v / sqr_length.sqrt())
        } else {
            (cgmath::Rad(0.0), Vector3::unit_x())
        }
    }

    fn ln(&self) -> Self {
        if self.s.abs() < 1.0 {
            let angle = self.s.acos();
            let sin = angle.sin();
            if sin.abs() >= EPSILON {
                return Quaternion::from_sv(0.0, self.v * (angle / sin));
            }
        }
        Quaternion::from_sv(0.0, self.v)
    }

    fn exp(&self) -> Self {
        let angle = self.v.magnitude();
        let sin = angle.sin();
        let v = if sin.abs() >= EPSILON {
            self.v * (sin / angle)
        } else {
            self.v
        };
        Quaternion::from_sv(angle.cos(), v)
    }

    fn inverse(&self) -> Self {
        let norm = self.magnitude2();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            Quaternion::from_sv(self.s * inv, -self.v * inv)
        } else {
            *self
        }
    }

    fn orientation_equals(&self, other: &Self, tolerance: Radian) -> bool {
        let d = self.dot(*other).abs().min(1.0);
        let angle = 2.0 * d.acos();
        angle <= tolerance.0
    }
}

/// Spherical linear interpolation. With `shortest_path` the result never
/// travels more than 180 degrees.
pub fn slerp(t: Real, p: Quaternion, q: Quaternion, shortest_path: bool) -> Quaternion {
    let mut cos = p.dot(q);
    let target = if cos < 0.0 && shortest_path {
        cos = -cos;
        -q
    } else {
        q
    };

    if cos.abs() < 1.0 - EPSILON {
        let sin = (1.0 - cos * cos).sqrt();
        let angle = sin.atan2(cos);
        let inv_sin = 1.0 / sin;
        let c0 = ((1.0 - t) * angle).sin() * inv_sin;
        let c1 = (t * angle).sin() * inv_sin;
        p * c0 + target * c1
    } else {
        // nearly parallel, linear interpolation is accurate enough
        (p * (1.0 - t) + target * t).normalize()
    }
}

/// Normalised linear interpolation.
pub fn nlerp(t: Real, p: Quaternion, q: Quaternion, shortest_path: bool) -> Quaternion {
    let cos = p.dot(q);
    let result = if cos < 0.0 && shortest_path {
        p + (-q - p) * t
    } else {
        p + (q - p) * t
    };
    result.normalize()
}

/// Spherical quadrangle interpolation between `p` and `q` with the inner
/// control points `a` and `b`.
pub fn squad(
    t: Real,
    p: Quaternion,
    a: Quaternion,
    b: Quaternion,
    q: Quaternion,
    shortest_path: bool,
) -> Quaternion {
    let slerp_t = 2.0 * t * (1.0 - t);
    let slerp_p = slerp(t, p, q, shortest_path);
    let slerp_q = slerp(t, a, b, false);
    slerp(slerp_t, slerp_p, slerp_q, false)
}
