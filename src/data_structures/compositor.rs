//! Compositor chains: full screen post-processing descriptions.
//!
//! A [`Compositor`] holds techniques. Each technique declares render
//! textures and a list of target passes that render into them, followed by
//! the output target pass that writes the final image.

use anyhow::{Result, bail};

use super::colour::ColourValue;
use super::material::CompareFunction;
use super::texture_unit::PixelFormat;
use crate::math::Real;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureScope {
    /// Visible to this compositor only.
    Local,
    /// Visible to compositors later in the same chain.
    Chain,
    Global,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureDefinition {
    pub name: String,
    /// Zero means "use the target size" scaled by the factor.
    pub width: u32,
    pub height: u32,
    pub width_factor: Real,
    pub height_factor: Real,
    pub formats: Vec<PixelFormat>,
    pub fsaa: bool,
    pub hw_gamma_write: bool,
    pub pooled: bool,
    pub scope: TextureScope,
    /// `(compositor, texture)` when declared with `texture_ref`.
    pub reference: Option<(String, String)>,
}

impl TextureDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            width_factor: 1.0,
            height_factor: 1.0,
            formats: Vec::new(),
            fsaa: true,
            hw_gamma_write: false,
            pooled: false,
            scope: TextureScope::Local,
            reference: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    None,
    Previous,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompositionPassType {
    Clear,
    Stencil,
    RenderScene,
    RenderQuad,
    RenderCustom,
}

impl CompositionPassType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clear" => Some(CompositionPassType::Clear),
            "stencil" => Some(CompositionPassType::Stencil),
            "render_scene" => Some(CompositionPassType::RenderScene),
            "render_quad" => Some(CompositionPassType::RenderQuad),
            "render_custom" => Some(CompositionPassType::RenderCustom),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuadNormals {
    None,
    ViewSpace,
    WorldSpace,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    IncrementWrap,
    DecrementWrap,
    Invert,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClearBuffers {
    pub colour: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl Default for ClearBuffers {
    fn default() -> Self {
        Self {
            colour: true,
            depth: true,
            stencil: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StencilState {
    pub check: bool,
    pub function: CompareFunction,
    pub ref_value: u32,
    pub mask: u32,
    pub fail_op: StencilOperation,
    pub depth_fail_op: StencilOperation,
    pub pass_op: StencilOperation,
    pub two_sided: bool,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            check: true,
            function: CompareFunction::AlwaysPass,
            ref_value: 0,
            mask: 0xFFFF_FFFF,
            fail_op: StencilOperation::Keep,
            depth_fail_op: StencilOperation::Keep,
            pass_op: StencilOperation::Keep,
            two_sided: false,
        }
    }
}

/// A texture a `render_quad` pass samples, bound to an input slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassInput {
    pub name: String,
    pub mrt_index: u32,
}

#[derive(Clone, Debug)]
pub struct CompositionPass {
    pub kind: CompositionPassType,
    /// Name given to `render_custom`.
    pub custom_type: String,
    pub material_name: String,
    pub inputs: Vec<Option<PassInput>>,
    pub identifier: u32,
    pub first_render_queue: u8,
    pub last_render_queue: u8,
    pub material_scheme: String,
    pub quad_normals: QuadNormals,
    pub clear_buffers: ClearBuffers,
    pub clear_colour: ColourValue,
    pub clear_depth: Real,
    pub clear_stencil: u32,
    pub stencil: StencilState,
}

impl CompositionPass {
    pub const RENDER_QUEUE_BACKGROUND: u8 = 0;
    pub const RENDER_QUEUE_SKIES_LATE: u8 = 95;
    /// Texture units a quad pass can bind inputs to.
    pub const MAX_INPUTS: usize = 16;

    pub fn new(kind: CompositionPassType) -> Self {
        Self {
            kind,
            custom_type: String::new(),
            material_name: String::new(),
            inputs: Vec::new(),
            identifier: 0,
            first_render_queue: Self::RENDER_QUEUE_BACKGROUND,
            last_render_queue: Self::RENDER_QUEUE_SKIES_LATE,
            material_scheme: String::new(),
            quad_normals: QuadNormals::None,
            clear_buffers: ClearBuffers::default(),
            clear_colour: ColourValue::ZERO,
            clear_depth: 1.0,
            clear_stencil: 0,
            stencil: StencilState::default(),
        }
    }

    pub fn set_input(&mut self, id: usize, name: &str, mrt_index: u32) -> Result<()> {
        if id >= Self::MAX_INPUTS {
            bail!("input {id} is out of range, a pass has {} inputs", Self::MAX_INPUTS);
        }
        if self.inputs.len() <= id {
            self.inputs.resize(id + 1, None);
        }
        self.inputs[id] = Some(PassInput {
            name: name.to_string(),
            mrt_index,
        });
        Ok(())
    }

    pub fn input(&self, id: usize) -> Option<&PassInput> {
        self.inputs.get(id).and_then(Option::as_ref)
    }
}

#[derive(Clone, Debug)]
pub struct CompositionTargetPass {
    /// Texture the pass renders into, empty for the output target.
    pub output_name: String,
    pub input_mode: InputMode,
    pub only_initial: bool,
    pub visibility_mask: u32,
    pub lod_bias: Real,
    pub material_scheme: String,
    pub shadows_enabled: bool,
    pub passes: Vec<CompositionPass>,
}

impl CompositionTargetPass {
    pub fn new() -> Self {
        Self {
            output_name: String::new(),
            input_mode: InputMode::None,
            only_initial: false,
            visibility_mask: 0xFFFF_FFFF,
            lod_bias: 1.0,
            material_scheme: String::new(),
            shadows_enabled: true,
            passes: Vec::new(),
        }
    }
}

impl Default for CompositionTargetPass {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CompositionTechnique {
    pub scheme: String,
    pub compositor_logic: String,
    pub texture_definitions: Vec<TextureDefinition>,
    pub target_passes: Vec<CompositionTargetPass>,
    pub output_target: CompositionTargetPass,
}

impl CompositionTechnique {
    pub fn texture_definition(&self, name: &str) -> Option<&TextureDefinition> {
        self.texture_definitions.iter().find(|d| d.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct Compositor {
    pub name: String,
    pub group: String,
    pub origin: String,
    pub techniques: Vec<CompositionTechnique>,
}

impl Compositor {
    pub fn new(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            origin: String::new(),
            techniques: Vec::new(),
        }
    }
}
