use cgmath::{InnerSpace, Matrix, SquareMatrix};

use super::{Matrix3, Matrix4, Quaternion, Radian, Real, Vector3};

/// Builds a matrix from 16 values given row by row, the order used by
/// `transform` and `param_named ... matrix4x4` in scripts.
///
/// cgmath stores matrices column-major, so `m[c][r] == values[r * 4 + c]`.
pub fn matrix4_from_row_major(values: &[Real; 16]) -> Matrix4 {
    let v = values;
    Matrix4::new(
        v[0], v[4], v[8], v[12], //
        v[1], v[5], v[9], v[13], //
        v[2], v[6], v[10], v[14], //
        v[3], v[7], v[11], v[15],
    )
}

/// Inverse of [`matrix4_from_row_major`].
pub fn matrix4_to_row_major(m: &Matrix4) -> [Real; 16] {
    let mut out = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            out[r * 4 + c] = m[c][r];
        }
    }
    out
}

/// Scale, then rotate, then translate.
pub fn make_transform(position: Vector3, scale: Vector3, orientation: Quaternion) -> Matrix4 {
    Matrix4::from_translation(position)
        * Matrix4::from(orientation)
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/// The inverse of [`make_transform`] without a general matrix inversion.
pub fn make_inverse_transform(
    position: Vector3,
    scale: Vector3,
    orientation: Quaternion,
) -> Matrix4 {
    let inv_rot = orientation.conjugate();
    let inv_scale = Vector3::new(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);
    let inv_pos = inv_rot * -position;
    let inv_pos = Vector3::new(
        inv_pos.x * inv_scale.x,
        inv_pos.y * inv_scale.y,
        inv_pos.z * inv_scale.z,
    );
    Matrix4::from_translation(inv_pos)
        * Matrix4::from_nonuniform_scale(inv_scale.x, inv_scale.y, inv_scale.z)
        * Matrix4::from(inv_rot)
}

/// Rotation matrix helpers that cgmath does not provide.
pub trait Matrix3Ext: Sized {
    /// `Rx(yaw) * Ry(pitch) * Rz(roll)`.
    fn from_euler_angles_xyz(yaw: Radian, pitch: Radian, roll: Radian) -> Self;

    /// Decomposes a rotation built by [`from_euler_angles_xyz`](Self::from_euler_angles_xyz).
    /// The flag is `false` when pitch sits at +-90 degrees and the solution is not unique.
    fn to_euler_angles_xyz(&self) -> (Radian, Radian, Radian, bool);

    /// Gram-Schmidt orthonormalisation of the columns.
    fn orthonormalized(&self) -> Self;

    fn is_orthonormal(&self, tolerance: Real) -> bool;
}

impl Matrix3Ext for Matrix3 {
    fn from_euler_angles_xyz(yaw: Radian, pitch: Radian, roll: Radian) -> Self {
        Matrix3::from_angle_x(yaw) * Matrix3::from_angle_y(pitch) * Matrix3::from_angle_z(roll)
    }

    fn to_euler_angles_xyz(&self) -> (Radian, Radian, Radian, bool) {
        // row/column access, cgmath indexes columns first
        let at = |r: usize, c: usize| self[c][r];
        let half_pi = std::f32::consts::FRAC_PI_2;

        let pitch = at(0, 2).clamp(-1.0, 1.0).asin();
        if pitch < half_pi {
            if pitch > -half_pi {
                let yaw = (-at(1, 2)).atan2(at(2, 2));
                let roll = (-at(0, 1)).atan2(at(0, 0));
                (cgmath::Rad(yaw), cgmath::Rad(pitch), cgmath::Rad(roll), true)
            } else {
                let r_minus_y = at(1, 0).atan2(at(1, 1));
                (cgmath::Rad(-r_minus_y), cgmath::Rad(pitch), cgmath::Rad(0.0), false)
            }
        } else {
            let r_plus_y = at(1, 0).atan2(at(1, 1));
            (cgmath::Rad(r_plus_y), cgmath::Rad(pitch), cgmath::Rad(0.0), false)
        }
    }

    fn orthonormalized(&self) -> Self {
        let c0 = self.x.normalize();
        let c1 = (self.y - c0 * c0.dot(self.y)).normalize();
        let c2 = (self.z - c0 * c0.dot(self.z) - c1 * c1.dot(self.z)).normalize();
        Matrix3::from_cols(c0, c1, c2)
    }

    fn is_orthonormal(&self, tolerance: Real) -> bool {
        let product = *self * self.transpose();
        let identity = Matrix3::identity();
        (0..3).all(|c| (0..3).all(|r| (product[c][r] - identity[c][r]).abs() <= tolerance))
    }
}
