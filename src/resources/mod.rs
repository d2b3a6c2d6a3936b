/**
 * This module keeps every resource the script compiler creates, looked up by name.
 */
pub mod capabilities;

use std::collections::BTreeMap;

use anyhow::bail;

pub use capabilities::RenderCapabilities;

use crate::data_structures::{
    compositor::Compositor, gpu_program::GpuProgram, material::Material, particle::ParticleSystem,
    shared_params::GpuSharedParameters,
};

/// The kinds of resource scripts can declare or reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Material,
    GpuProgram,
    SharedParameters,
    Compositor,
    ParticleSystem,
}

/// Named registry of compiled resources plus the capabilities of the
/// renderer they target.
#[derive(Clone, Debug, Default)]
pub struct Resources {
    pub capabilities: RenderCapabilities,
    materials: BTreeMap<String, Material>,
    gpu_programs: BTreeMap<String, GpuProgram>,
    shared_parameters: BTreeMap<String, GpuSharedParameters>,
    compositors: BTreeMap<String, Compositor>,
    particle_systems: BTreeMap<String, ParticleSystem>,
}

macro_rules! registry {
    (
        $field:ident,
        $ty:ty,
        $get:ident,
        $get_mut:ident,
        $add:ident,
        $remove:ident,
        $exists:ident,
        $label:literal
    ) => {
        pub fn $get(&self, name: &str) -> Option<&$ty> {
            self.$field.get(name)
        }

        pub fn $get_mut(&mut self, name: &str) -> Option<&mut $ty> {
            self.$field.get_mut(name)
        }

        pub fn $exists(&self, name: &str) -> bool {
            self.$field.contains_key(name)
        }

        /// Registers a new resource. Names are unique per kind.
        pub fn $add(&mut self, resource: $ty) -> anyhow::Result<()> {
            if self.$field.contains_key(&resource.name) {
                bail!(concat!($label, " {} already exists"), resource.name);
            }
            self.$field.insert(resource.name.clone(), resource);
            Ok(())
        }

        pub fn $remove(&mut self, name: &str) -> Option<$ty> {
            self.$field.remove(name)
        }
    };
}

impl Resources {
    pub fn new(capabilities: RenderCapabilities) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }

    registry!(
        materials,
        Material,
        material,
        material_mut,
        add_material,
        remove_material,
        has_material,
        "material"
    );
    registry!(
        gpu_programs,
        GpuProgram,
        gpu_program,
        gpu_program_mut,
        add_gpu_program,
        remove_gpu_program,
        has_gpu_program,
        "gpu program"
    );
    registry!(
        compositors,
        Compositor,
        compositor,
        compositor_mut,
        add_compositor,
        remove_compositor,
        has_compositor,
        "compositor"
    );
    registry!(
        particle_systems,
        ParticleSystem,
        particle_system,
        particle_system_mut,
        add_particle_system,
        remove_particle_system,
        has_particle_system,
        "particle system"
    );

    pub fn shared_parameters(&self, name: &str) -> Option<&GpuSharedParameters> {
        self.shared_parameters.get(name)
    }

    pub fn add_shared_parameters(&mut self, params: GpuSharedParameters) -> anyhow::Result<()> {
        if self.shared_parameters.contains_key(params.name()) {
            bail!("shared parameter set {} already exists", params.name());
        }
        self.shared_parameters
            .insert(params.name().to_string(), params);
        Ok(())
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn gpu_programs(&self) -> impl Iterator<Item = &GpuProgram> {
        self.gpu_programs.values()
    }

    pub fn compositors(&self) -> impl Iterator<Item = &Compositor> {
        self.compositors.values()
    }

    pub fn particle_systems(&self) -> impl Iterator<Item = &ParticleSystem> {
        self.particle_systems.values()
    }

    /// Whether a program with this name exists and the renderer can run it.
    /// Unified programs are supported when any of their delegates is.
    pub fn is_program_supported(&self, name: &str) -> bool {
        self.is_program_supported_inner(name, 0)
    }

    fn is_program_supported_inner(&self, name: &str, depth: usize) -> bool {
        let Some(program) = self.gpu_programs.get(name) else {
            return false;
        };
        if program.is_unified() {
            // delegates may point at other unified programs, bound the walk
            return depth < 8
                && program
                    .delegates
                    .iter()
                    .any(|d| self.is_program_supported_inner(d, depth + 1));
        }
        program.supported
    }
}
