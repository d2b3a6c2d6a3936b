use crate::math::Real;

/// RGBA colour with floating point channels, normally within `[0, 1]`.
///
/// The layout matches a `vec4<f32>` uniform so colours can be written to GPU
/// buffers with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColourValue {
    pub r: Real,
    pub g: Real,
    pub b: Real,
    pub a: Real,
}

impl ColourValue {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: Real, g: Real, b: Real, a: Real) -> Self {
        Self { r, g, b, a }
    }

    pub fn saturated(&self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    pub fn to_array(&self) -> [Real; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for ColourValue {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<ColourValue> for wgpu::Color {
    fn from(c: ColourValue) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}
