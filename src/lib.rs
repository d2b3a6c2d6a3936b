//! flow-script
//!
//! Compiles material, gpu program, compositor and particle scripts into
//! engine resources. A parsed script tree goes through import resolution,
//! object inheritance and variable expansion before translators build the
//! resources and register them in [`Resources`].
//!
//! High-level modules
//! - `script`: the tree, the compiler front-end and the translators
//! - `data_structures`: materials, passes, texture units, programs, compositors
//!   and particle systems
//! - `resources`: the named registry compiled resources land in, plus render capabilities
//! - `pipelines`: conversions from pass and texture unit state to `wgpu` pipeline and sampler state
//! - `math`: vector, quaternion, matrix and spline helpers on top of `cgmath`
//!

pub mod data_structures;
pub mod math;
pub mod pipelines;
pub mod resources;
pub mod script;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use resources::{RenderCapabilities, ResourceKind, Resources};
pub use script::{
    AbstractNode, AtomNode, CompileError, CompileErrorCode, CompilerOptions, ImportNode, Keyword,
    ObjectNode, PropertyNode, ScriptCompiler, ScriptCompilerEvent, ScriptCompilerListener,
    VariableAccessNode,
};

/// Installs `env_logger` as the `log` backend. Calling it again is harmless.
pub fn init_logging() {
    if let Err(e) = env_logger::try_init() {
        println!("logger already initialised: {e}");
    }
}
