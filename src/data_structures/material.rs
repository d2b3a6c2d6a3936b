//! Materials and the techniques and passes they are made of.
//!
//! # Key types
//! - [`Material`]: named, top-level surface description with LOD settings
//! - [`Technique`]: one alternative way of rendering a material
//! - [`Pass`]: a single render of the geometry with fixed render state
//!
//! Only the data is modelled here. Converting a pass into `wgpu` state
//! lives in [`crate::pipelines`].

use std::collections::HashMap;

use super::colour::ColourValue;
use super::gpu_program::{GpuProgramType, GpuProgramUsage};
use super::texture_unit::TextureUnitState;
use crate::math::Real;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareFunction {
    AlwaysFail,
    AlwaysPass,
    Less,
    LessEqual,
    Equal,
    NotEqual,
    GreaterEqual,
    Greater,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneBlendFactor {
    One,
    Zero,
    DestColour,
    SourceColour,
    OneMinusDestColour,
    OneMinusSourceColour,
    DestAlpha,
    SourceAlpha,
    OneMinusDestAlpha,
    OneMinusSourceAlpha,
}

/// Blend shorthands accepted by `scene_blend`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneBlendType {
    TransparentAlpha,
    TransparentColour,
    Add,
    Modulate,
    Replace,
}

impl SceneBlendType {
    /// Source and destination factors.
    pub fn factors(self) -> (SceneBlendFactor, SceneBlendFactor) {
        use SceneBlendFactor as F;
        match self {
            SceneBlendType::TransparentAlpha => (F::SourceAlpha, F::OneMinusSourceAlpha),
            SceneBlendType::TransparentColour => (F::SourceColour, F::OneMinusSourceColour),
            SceneBlendType::Add => (F::One, F::One),
            SceneBlendType::Modulate => (F::DestColour, F::Zero),
            SceneBlendType::Replace => (F::One, F::Zero),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneBlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Hardware culling by winding order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CullingMode {
    None,
    Clockwise,
    Anticlockwise,
}

/// Culling done by the engine before submitting geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ManualCullingMode {
    None,
    Back,
    Front,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShadeOptions {
    Flat,
    Gouraud,
    Phong,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Points,
    Wireframe,
    Solid,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FogMode {
    None,
    Exp,
    Exp2,
    Linear,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightType {
    Point,
    Directional,
    Spotlight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IlluminationStage {
    Ambient,
    PerLight,
    Decal,
    Unknown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LodStrategy {
    Distance,
    PixelCount,
}

impl LodStrategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Distance" | "distance" => Some(LodStrategy::Distance),
            "PixelCount" | "pixel_count" => Some(LodStrategy::PixelCount),
            _ => None,
        }
    }
}

/// Which material colours follow the vertex colour instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackVertexColour(u8);

impl TrackVertexColour {
    pub const NONE: Self = Self(0);
    pub const AMBIENT: Self = Self(0x1);
    pub const DIFFUSE: Self = Self(0x2);
    pub const SPECULAR: Self = Self(0x4);
    pub const EMISSIVE: Self = Self(0x8);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FogSettings {
    /// Whether the pass replaces the scene fog.
    pub override_scene: bool,
    pub mode: FogMode,
    pub colour: ColourValue,
    pub density: Real,
    pub start: Real,
    pub end: Real,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            override_scene: false,
            mode: FogMode::None,
            colour: ColourValue::WHITE,
            density: 0.001,
            start: 0.0,
            end: 1.0,
        }
    }
}

/// How many times a pass is rendered and for which lights.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PassIteration {
    pub count: u32,
    pub per_light: bool,
    pub lights_per_iteration: u32,
    pub only_light_type: Option<LightType>,
}

impl Default for PassIteration {
    fn default() -> Self {
        Self {
            count: 1,
            per_light: false,
            lights_per_iteration: 1,
            only_light_type: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointAttenuation {
    pub enabled: bool,
    pub constant: Real,
    pub linear: Real,
    pub quadratic: Real,
}

impl Default for PointAttenuation {
    fn default() -> Self {
        Self {
            enabled: false,
            constant: 0.0,
            linear: 1.0,
            quadratic: 0.0,
        }
    }
}

/// Program slots a pass can reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgramSlot {
    Vertex,
    Fragment,
    Geometry,
    ShadowCasterVertex,
    ShadowReceiverVertex,
    ShadowReceiverFragment,
}

impl ProgramSlot {
    pub fn program_type(self) -> GpuProgramType {
        match self {
            ProgramSlot::Vertex
            | ProgramSlot::ShadowCasterVertex
            | ProgramSlot::ShadowReceiverVertex => GpuProgramType::Vertex,
            ProgramSlot::Fragment | ProgramSlot::ShadowReceiverFragment => GpuProgramType::Fragment,
            ProgramSlot::Geometry => GpuProgramType::Geometry,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pass {
    pub name: String,
    pub ambient: ColourValue,
    pub diffuse: ColourValue,
    pub specular: ColourValue,
    pub emissive: ColourValue,
    pub shininess: Real,
    pub tracking: TrackVertexColour,

    pub source_blend_factor: SceneBlendFactor,
    pub dest_blend_factor: SceneBlendFactor,
    pub source_blend_factor_alpha: SceneBlendFactor,
    pub dest_blend_factor_alpha: SceneBlendFactor,
    pub separate_blend: bool,
    pub blend_operation: SceneBlendOperation,
    pub alpha_blend_operation: SceneBlendOperation,
    pub separate_blend_operation: bool,

    pub depth_check: bool,
    pub depth_write: bool,
    pub depth_function: CompareFunction,
    pub depth_bias_constant: Real,
    pub depth_bias_slope_scale: Real,
    pub depth_bias_per_iteration: Real,

    pub alpha_reject_function: CompareFunction,
    pub alpha_reject_value: u8,
    pub alpha_to_coverage: bool,

    pub light_scissoring: bool,
    pub light_clip_planes: bool,
    pub transparent_sorting: bool,
    pub transparent_sorting_forced: bool,
    pub illumination_stage: IlluminationStage,

    pub culling_mode: CullingMode,
    pub manual_culling_mode: ManualCullingMode,
    pub lighting: bool,
    pub max_lights: u32,
    pub start_light: u32,
    pub shading: ShadeOptions,
    pub polygon_mode: PolygonMode,
    pub polygon_mode_overrideable: bool,
    pub normalise_normals: bool,
    pub fog: FogSettings,
    pub colour_write: bool,
    pub iteration: PassIteration,

    pub point_size: Real,
    pub point_sprites: bool,
    pub point_attenuation: PointAttenuation,
    pub point_min_size: Real,
    pub point_max_size: Real,

    pub texture_units: Vec<TextureUnitState>,
    pub vertex_program: Option<GpuProgramUsage>,
    pub fragment_program: Option<GpuProgramUsage>,
    pub geometry_program: Option<GpuProgramUsage>,
    pub shadow_caster_vertex_program: Option<GpuProgramUsage>,
    pub shadow_receiver_vertex_program: Option<GpuProgramUsage>,
    pub shadow_receiver_fragment_program: Option<GpuProgramUsage>,
}

impl Pass {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            ambient: ColourValue::WHITE,
            diffuse: ColourValue::WHITE,
            specular: ColourValue::BLACK,
            emissive: ColourValue::BLACK,
            shininess: 0.0,
            tracking: TrackVertexColour::NONE,
            source_blend_factor: SceneBlendFactor::One,
            dest_blend_factor: SceneBlendFactor::Zero,
            source_blend_factor_alpha: SceneBlendFactor::One,
            dest_blend_factor_alpha: SceneBlendFactor::Zero,
            separate_blend: false,
            blend_operation: SceneBlendOperation::Add,
            alpha_blend_operation: SceneBlendOperation::Add,
            separate_blend_operation: false,
            depth_check: true,
            depth_write: true,
            depth_function: CompareFunction::LessEqual,
            depth_bias_constant: 0.0,
            depth_bias_slope_scale: 0.0,
            depth_bias_per_iteration: 0.0,
            alpha_reject_function: CompareFunction::AlwaysPass,
            alpha_reject_value: 0,
            alpha_to_coverage: false,
            light_scissoring: false,
            light_clip_planes: false,
            transparent_sorting: true,
            transparent_sorting_forced: false,
            illumination_stage: IlluminationStage::Unknown,
            culling_mode: CullingMode::Clockwise,
            manual_culling_mode: ManualCullingMode::Back,
            lighting: true,
            max_lights: 8,
            start_light: 0,
            shading: ShadeOptions::Gouraud,
            polygon_mode: PolygonMode::Solid,
            polygon_mode_overrideable: true,
            normalise_normals: false,
            fog: FogSettings::default(),
            colour_write: true,
            iteration: PassIteration::default(),
            point_size: 1.0,
            point_sprites: false,
            point_attenuation: PointAttenuation::default(),
            point_min_size: 0.0,
            point_max_size: 0.0,
            texture_units: Vec::new(),
            vertex_program: None,
            fragment_program: None,
            geometry_program: None,
            shadow_caster_vertex_program: None,
            shadow_receiver_vertex_program: None,
            shadow_receiver_fragment_program: None,
        }
    }

    pub fn set_scene_blending(&mut self, blend: SceneBlendType) {
        let (src, dst) = blend.factors();
        self.set_scene_blend_factors(src, dst);
    }

    pub fn set_scene_blend_factors(&mut self, src: SceneBlendFactor, dst: SceneBlendFactor) {
        self.source_blend_factor = src;
        self.dest_blend_factor = dst;
        self.source_blend_factor_alpha = src;
        self.dest_blend_factor_alpha = dst;
        self.separate_blend = false;
    }

    pub fn set_separate_scene_blend_factors(
        &mut self,
        src: SceneBlendFactor,
        dst: SceneBlendFactor,
        src_alpha: SceneBlendFactor,
        dst_alpha: SceneBlendFactor,
    ) {
        self.source_blend_factor = src;
        self.dest_blend_factor = dst;
        self.source_blend_factor_alpha = src_alpha;
        self.dest_blend_factor_alpha = dst_alpha;
        self.separate_blend = true;
    }

    pub fn set_separate_scene_blending(&mut self, colour: SceneBlendType, alpha: SceneBlendType) {
        let (src, dst) = colour.factors();
        let (src_alpha, dst_alpha) = alpha.factors();
        self.set_separate_scene_blend_factors(src, dst, src_alpha, dst_alpha);
    }

    pub fn set_scene_blending_operation(&mut self, op: SceneBlendOperation) {
        self.blend_operation = op;
        self.alpha_blend_operation = op;
        self.separate_blend_operation = false;
    }

    pub fn set_separate_scene_blending_operation(
        &mut self,
        op: SceneBlendOperation,
        alpha_op: SceneBlendOperation,
    ) {
        self.blend_operation = op;
        self.alpha_blend_operation = alpha_op;
        self.separate_blend_operation = true;
    }

    /// A pass is transparent when its result depends on what is already in
    /// the frame buffer.
    pub fn is_transparent(&self) -> bool {
        use SceneBlendFactor as F;
        !(self.source_blend_factor == F::One && self.dest_blend_factor == F::Zero)
            || (self.separate_blend
                && !(self.source_blend_factor_alpha == F::One
                    && self.dest_blend_factor_alpha == F::Zero))
    }

    pub fn program(&self, slot: ProgramSlot) -> Option<&GpuProgramUsage> {
        match slot {
            ProgramSlot::Vertex => self.vertex_program.as_ref(),
            ProgramSlot::Fragment => self.fragment_program.as_ref(),
            ProgramSlot::Geometry => self.geometry_program.as_ref(),
            ProgramSlot::ShadowCasterVertex => self.shadow_caster_vertex_program.as_ref(),
            ProgramSlot::ShadowReceiverVertex => self.shadow_receiver_vertex_program.as_ref(),
            ProgramSlot::ShadowReceiverFragment => self.shadow_receiver_fragment_program.as_ref(),
        }
    }

    pub fn set_program(&mut self, slot: ProgramSlot, usage: GpuProgramUsage) {
        let target = match slot {
            ProgramSlot::Vertex => &mut self.vertex_program,
            ProgramSlot::Fragment => &mut self.fragment_program,
            ProgramSlot::Geometry => &mut self.geometry_program,
            ProgramSlot::ShadowCasterVertex => &mut self.shadow_caster_vertex_program,
            ProgramSlot::ShadowReceiverVertex => &mut self.shadow_receiver_vertex_program,
            ProgramSlot::ShadowReceiverFragment => &mut self.shadow_receiver_fragment_program,
        };
        *target = Some(usage);
    }

    pub fn texture_unit(&self, name: &str) -> Option<&TextureUnitState> {
        self.texture_units.iter().find(|t| t.name == name)
    }
}

impl Default for Pass {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuVendorRule {
    pub vendor: String,
    pub include: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuDeviceRule {
    pub pattern: String,
    pub include: bool,
    pub case_sensitive: bool,
}

#[derive(Clone, Debug)]
pub struct Technique {
    pub name: String,
    pub scheme: String,
    pub lod_index: u16,
    pub shadow_caster_material: Option<String>,
    pub shadow_receiver_material: Option<String>,
    pub vendor_rules: Vec<GpuVendorRule>,
    pub device_rules: Vec<GpuDeviceRule>,
    pub passes: Vec<Pass>,
}

impl Technique {
    pub const DEFAULT_SCHEME: &'static str = "Default";

    pub fn new() -> Self {
        Self {
            name: String::new(),
            scheme: Self::DEFAULT_SCHEME.to_string(),
            lod_index: 0,
            shadow_caster_material: None,
            shadow_receiver_material: None,
            vendor_rules: Vec::new(),
            device_rules: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Replaces an existing rule for the same vendor.
    pub fn add_vendor_rule(&mut self, rule: GpuVendorRule) {
        self.vendor_rules.retain(|r| r.vendor != rule.vendor);
        self.vendor_rules.push(rule);
    }

    pub fn add_device_rule(&mut self, rule: GpuDeviceRule) {
        self.device_rules.retain(|r| r.pattern != rule.pattern);
        self.device_rules.push(rule);
    }

    pub fn is_transparent(&self) -> bool {
        self.passes.first().is_some_and(Pass::is_transparent)
    }
}

impl Default for Technique {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub group: String,
    pub origin: String,
    pub receive_shadows: bool,
    pub transparency_casts_shadows: bool,
    pub lod_strategy: LodStrategy,
    pub lod_values: Vec<Real>,
    pub techniques: Vec<Technique>,
}

impl Material {
    pub fn new(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            origin: String::new(),
            receive_shadows: true,
            transparency_casts_shadows: false,
            lod_strategy: LodStrategy::Distance,
            lod_values: Vec::new(),
            techniques: Vec::new(),
        }
    }

    pub fn techniques_for_scheme<'a>(
        &'a self,
        scheme: &'a str,
    ) -> impl Iterator<Item = &'a Technique> {
        self.techniques.iter().filter(move |t| t.scheme == scheme)
    }

    /// Points every texture unit whose alias is in `aliases` at the aliased
    /// texture. Returns whether any unit changed.
    pub fn apply_texture_aliases(&mut self, aliases: &HashMap<String, String>) -> bool {
        let mut applied = false;
        let units = self
            .techniques
            .iter_mut()
            .flat_map(|t| t.passes.iter_mut())
            .flat_map(|p| p.texture_units.iter_mut());
        for unit in units {
            if unit.texture_alias.is_empty() {
                continue;
            }
            if let Some(texture) = aliases.get(&unit.texture_alias) {
                let texture_type = unit.texture_type;
                unit.set_texture_name(texture, texture_type);
                applied = true;
            }
        }
        applied
    }
}
