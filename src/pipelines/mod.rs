//! Render pipeline state derived from compiled materials.
//!
//! Scripts describe render state in engine terms (scene blend factors,
//! hardware culling, texture addressing). The conversions here map it onto
//! the `wgpu` types a render pipeline or sampler is built from, so a pass can
//! be turned into pipeline state without a device.

pub mod sampler;
pub mod state;
