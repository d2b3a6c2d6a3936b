use cgmath::{InnerSpace, One};

use super::{Quaternion, QuaternionExt, Radian, Real, Vector3};

const ZERO_LENGTH: Real = 1e-6 * 1e-6;

pub trait Vector3Ext: Sized {
    fn is_zero_length(&self) -> bool;

    /// Some unit vector perpendicular to this one.
    fn perpendicular(&self) -> Self;

    /// Reflects this direction off a plane with the given unit normal.
    fn reflect(&self, normal: Self) -> Self;

    fn mid_point(&self, other: Self) -> Self;

    fn angle_between(&self, other: Self) -> Radian;

    /// Shortest arc rotation taking this direction onto `dest`. When the two
    /// directions are opposite the rotation is 180 degrees around
    /// `fallback_axis`, or around an arbitrary perpendicular axis.
    fn rotation_to(&self, dest: Self, fallback_axis: Option<Self>) -> Quaternion;
}

impl Vector3Ext for Vector3 {
    fn is_zero_length(&self) -> bool {
        self.magnitude2() < ZERO_LENGTH
    }

    fn perpendicular(&self) -> Self {
        let mut perp = self.cross(Vector3::unit_x());
        if perp.is_zero_length() {
            perp = self.cross(Vector3::unit_y());
        }
        perp.normalize()
    }

    fn reflect(&self, normal: Self) -> Self {
        *self - normal * (2.0 * self.dot(normal))
    }

    fn mid_point(&self, other: Self) -> Self {
        (*self + other) * 0.5
    }

    fn angle_between(&self, other: Self) -> Radian {
        let len = (self.magnitude2() * other.magnitude2()).sqrt().max(1e-6);
        let cos = (self.dot(other) / len).clamp(-1.0, 1.0);
        cgmath::Rad(cos.acos())
    }

    fn rotation_to(&self, dest: Self, fallback_axis: Option<Self>) -> Quaternion {
        let v0 = self.normalize();
        let v1 = dest.normalize();
        let d = v0.dot(v1);
        if d >= 1.0 {
            return Quaternion::one();
        }
        if d < 1e-6 - 1.0 {
            let axis = match fallback_axis {
                Some(axis) if !axis.is_zero_length() => axis,
                _ => {
                    let mut axis = Vector3::unit_x().cross(*self);
                    if axis.is_zero_length() {
                        axis = Vector3::unit_y().cross(*self);
                    }
                    axis.normalize()
                }
            };
            return Quaternion::from_angle_axis(cgmath::Rad(std::f32::consts::PI), axis);
        }

        let s = ((1.0 + d) * 2.0).sqrt();
        let c = v0.cross(v1) / s;
        Quaternion::from_sv(s * 0.5, c).normalize()
    }
}
