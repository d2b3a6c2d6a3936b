use std::collections::BTreeMap;

use super::gpu_params::GpuProgramParameters;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GpuProgramType {
    Vertex,
    Fragment,
    Geometry,
}

/// A shader program declared by `vertex_program`, `fragment_program` or
/// `geometry_program`.
///
/// Assembler programs (`language == "asm"`) carry a `syntax`, unified
/// programs list `delegates` and resolve to the first supported one.
#[derive(Clone, Debug)]
pub struct GpuProgram {
    pub name: String,
    pub group: String,
    /// Script file the program was declared in.
    pub origin: String,
    pub kind: GpuProgramType,
    pub language: String,
    pub syntax: String,
    pub source_file: String,
    pub delegates: Vec<String>,
    pub custom_parameters: BTreeMap<String, String>,
    pub skeletal_animation: bool,
    pub morph_animation: bool,
    pub pose_animation: u16,
    pub vertex_texture_fetch: bool,
    pub adjacency_information: bool,
    pub supported: bool,
    pub default_parameters: GpuProgramParameters,
}

impl GpuProgram {
    pub fn new(name: &str, kind: GpuProgramType, language: &str) -> Self {
        Self {
            name: name.to_string(),
            group: String::new(),
            origin: String::new(),
            kind,
            language: language.to_string(),
            syntax: String::new(),
            source_file: String::new(),
            delegates: Vec::new(),
            custom_parameters: BTreeMap::new(),
            skeletal_animation: false,
            morph_animation: false,
            pose_animation: 0,
            vertex_texture_fetch: false,
            adjacency_information: false,
            supported: true,
            default_parameters: GpuProgramParameters::new(),
        }
    }

    pub fn is_assembler(&self) -> bool {
        self.language == "asm"
    }

    pub fn is_unified(&self) -> bool {
        self.language == "unified"
    }

    /// Parameters seeded with this program's defaults.
    pub fn create_parameters(&self) -> GpuProgramParameters {
        self.default_parameters.clone()
    }
}

/// A pass's reference to a program together with its own parameter values.
#[derive(Clone, Debug)]
pub struct GpuProgramUsage {
    pub kind: GpuProgramType,
    pub program_name: String,
    pub parameters: GpuProgramParameters,
}

impl GpuProgramUsage {
    pub fn new(kind: GpuProgramType, program: &GpuProgram) -> Self {
        Self {
            kind,
            program_name: program.name.clone(),
            parameters: program.create_parameters(),
        }
    }
}
