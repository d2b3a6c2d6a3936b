//! Engine data structures populated by the script compiler.
//!
//! This module contains the render resources that scripts describe:
//!
//! - `material` holds materials, techniques, passes and their render state enums
//! - `texture_unit` holds per-pass texture bindings, blending and animation effects
//! - `gpu_program` holds shader program declarations and pass program references
//! - `gpu_params` stores shader constants and auto constant bindings
//! - `auto_constants` is the table of engine supplied shader values
//! - `shared_params` holds constant blocks shared between programs
//! - `compositor` describes post-processing chains
//! - `particle` holds particle system templates, emitters and affectors
//! - `colour` is the RGBA value type used by all of the above

pub mod auto_constants;
pub mod colour;
pub mod compositor;
pub mod gpu_params;
pub mod gpu_program;
pub mod material;
pub mod particle;
pub mod shared_params;
pub mod texture_unit;
