//! Math value types shared by the script compiler and the engine.
//!
//! The linear algebra itself comes from [`cgmath`]. This module pins the
//! scalar type to [`Real`] and adds the operations the engine needs on top
//! of cgmath: row-major matrix conversion (scripts write matrices row by
//! row), quaternion logarithms and squad, and spline interpolation.
//!
//! # Key types
//! - [`PositionSpline`]: Hermite spline through points with Catmull-Rom tangents
//! - [`RotationalSpline`]: squad interpolation through orientations
//! - [`QuaternionExt`], [`Vector3Ext`], [`Matrix3Ext`]: extension traits for cgmath types

pub mod matrix;
pub mod quaternion;
pub mod spline;
pub mod vector;

pub use matrix::{
    Matrix3Ext, make_inverse_transform, make_transform, matrix4_from_row_major,
    matrix4_to_row_major,
};
pub use quaternion::{QuaternionExt, nlerp, slerp, squad};
pub use spline::{PositionSpline, RotationalSpline};
pub use vector::Vector3Ext;

/// Scalar type used throughout the engine.
pub type Real = f32;

pub type Vector2 = cgmath::Vector2<Real>;
pub type Vector3 = cgmath::Vector3<Real>;
pub type Vector4 = cgmath::Vector4<Real>;
pub type Matrix3 = cgmath::Matrix3<Real>;
pub type Matrix4 = cgmath::Matrix4<Real>;
pub type Quaternion = cgmath::Quaternion<Real>;
pub type Degree = cgmath::Deg<Real>;
pub type Radian = cgmath::Rad<Real>;

/// Tolerance used by the quaternion logarithm and slerp.
pub const EPSILON: Real = 1e-3;
