//! Texture unit state: one texture binding within a pass.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use cgmath::SquareMatrix;

use super::colour::ColourValue;
use super::material::SceneBlendFactor;
use crate::math::{Matrix4, Radian, Real};

/// Frames an animated texture can cycle through.
pub const MAX_ANIMATION_FRAMES: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureType {
    OneD,
    TwoD,
    ThreeD,
    CubeMap,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureMipmaps {
    Default,
    Unlimited,
    Count(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureAddressingMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UvwAddressingMode {
    pub u: TextureAddressingMode,
    pub v: TextureAddressingMode,
    pub w: TextureAddressingMode,
}

impl UvwAddressingMode {
    pub fn uniform(mode: TextureAddressingMode) -> Self {
        Self {
            u: mode,
            v: mode,
            w: mode,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterOptions {
    None,
    Point,
    Linear,
    Anisotropic,
}

/// Shorthand filtering levels accepted by `filtering`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureFilterOptions {
    None,
    Bilinear,
    Trilinear,
    Anisotropic,
}

impl TextureFilterOptions {
    /// Minification, magnification and mip filters.
    pub fn filters(self) -> (FilterOptions, FilterOptions, FilterOptions) {
        use FilterOptions as F;
        match self {
            TextureFilterOptions::None => (F::Point, F::Point, F::None),
            TextureFilterOptions::Bilinear => (F::Linear, F::Linear, F::Point),
            TextureFilterOptions::Trilinear => (F::Linear, F::Linear, F::Linear),
            TextureFilterOptions::Anisotropic => (F::Anisotropic, F::Anisotropic, F::Linear),
        }
    }
}

/// Simple blend shorthands accepted by `colour_op`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerBlendOperation {
    Replace,
    Add,
    Modulate,
    AlphaBlend,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerBlendOperationEx {
    Source1,
    Source2,
    Modulate,
    ModulateX2,
    ModulateX4,
    Add,
    AddSigned,
    AddSmooth,
    Subtract,
    BlendDiffuseAlpha,
    BlendTextureAlpha,
    BlendCurrentAlpha,
    BlendManual,
    DotProduct,
    BlendDiffuseColour,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerBlendSource {
    Current,
    Texture,
    Diffuse,
    Specular,
    Manual,
}

/// Full description of how a texture layer combines with the previous one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerBlendModeEx {
    pub operation: LayerBlendOperationEx,
    pub source1: LayerBlendSource,
    pub source2: LayerBlendSource,
    pub colour_arg1: ColourValue,
    pub colour_arg2: ColourValue,
    pub alpha_arg1: Real,
    pub alpha_arg2: Real,
    pub factor: Real,
}

impl Default for LayerBlendModeEx {
    fn default() -> Self {
        Self {
            operation: LayerBlendOperationEx::Modulate,
            source1: LayerBlendSource::Texture,
            source2: LayerBlendSource::Current,
            colour_arg1: ColourValue::WHITE,
            colour_arg2: ColourValue::WHITE,
            alpha_arg1: 1.0,
            alpha_arg2: 1.0,
            factor: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnvMapType {
    /// `spherical`
    Curved,
    Planar,
    /// `cubic_reflection`
    Reflection,
    /// `cubic_normal`
    Normal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureTransformType {
    TranslateU,
    TranslateV,
    ScaleU,
    ScaleV,
    Rotate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaveformType {
    Sine,
    Triangle,
    Square,
    Sawtooth,
    InverseSawtooth,
    PulseWidthModulation,
}

/// Animated texture coordinate effects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TextureEffect {
    EnvironmentMap(EnvMapType),
    UvScroll(Real),
    UScroll(Real),
    VScroll(Real),
    Rotate(Real),
    Transform {
        transform: TextureTransformType,
        waveform: WaveformType,
        base: Real,
        frequency: Real,
        phase: Real,
        amplitude: Real,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingType {
    Fragment,
    Vertex,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentType {
    Named,
    Shadow,
    Compositor {
        compositor: String,
        texture: String,
        mrt_index: u32,
    },
}

/// Pixel formats that scripts can request by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Unknown,
    L8,
    L16,
    A8,
    A8L8,
    R5G6B5,
    R8G8B8,
    B8G8R8,
    A8R8G8B8,
    A8B8G8R8,
    B8G8R8A8,
    R8G8B8A8,
    X8R8G8B8,
    X8B8G8R8,
    A2R10G10B10,
    FloatR16,
    FloatGR16,
    FloatRGB16,
    FloatRGBA16,
    FloatR32,
    FloatGR32,
    FloatRGB32,
    FloatRGBA32,
    Depth,
}

impl PixelFormat {
    /// Accepts `PF_A8R8G8B8` as well as `a8r8g8b8`, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let name = upper.strip_prefix("PF_").unwrap_or(&upper);
        use PixelFormat::*;
        let format = match name {
            "UNKNOWN" => Unknown,
            "L8" | "BYTE_L" => L8,
            "L16" | "SHORT_L" => L16,
            "A8" | "BYTE_A" => A8,
            "A8L8" | "BYTE_LA" => A8L8,
            "R5G6B5" => R5G6B5,
            "R8G8B8" | "BYTE_RGB" => R8G8B8,
            "B8G8R8" | "BYTE_BGR" => B8G8R8,
            "A8R8G8B8" => A8R8G8B8,
            "A8B8G8R8" => A8B8G8R8,
            "B8G8R8A8" | "BYTE_BGRA" => B8G8R8A8,
            "R8G8B8A8" | "BYTE_RGBA" => R8G8B8A8,
            "X8R8G8B8" => X8R8G8B8,
            "X8B8G8R8" => X8B8G8R8,
            "A2R10G10B10" => A2R10G10B10,
            "FLOAT16_R" => FloatR16,
            "FLOAT16_GR" => FloatGR16,
            "FLOAT16_RGB" => FloatRGB16,
            "FLOAT16_RGBA" => FloatRGBA16,
            "FLOAT32_R" => FloatR32,
            "FLOAT32_GR" => FloatGR32,
            "FLOAT32_RGB" => FloatRGB32,
            "FLOAT32_RGBA" => FloatRGBA32,
            "DEPTH" => Depth,
            _ => return None,
        };
        Some(format)
    }
}

/// Parameters handed to an external texture source plugin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalTextureSource {
    pub plugin: String,
    pub parameters: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct TextureUnitState {
    pub name: String,
    pub texture_alias: String,
    /// Texture names. More than one frame means an animated or cubic texture.
    pub frames: Vec<String>,
    pub animation_duration: Real,
    pub texture_type: TextureType,
    pub mipmaps: TextureMipmaps,
    pub is_alpha: bool,
    pub hardware_gamma: bool,
    pub desired_format: PixelFormat,
    pub tex_coord_set: u32,
    pub address_mode: UvwAddressingMode,
    pub border_colour: ColourValue,
    pub min_filter: FilterOptions,
    pub mag_filter: FilterOptions,
    pub mip_filter: FilterOptions,
    pub max_anisotropy: u32,
    pub mipmap_bias: Real,
    pub colour_blend: LayerBlendModeEx,
    pub alpha_blend: LayerBlendModeEx,
    pub colour_blend_fallback: (SceneBlendFactor, SceneBlendFactor),
    pub effects: Vec<TextureEffect>,
    pub u_scroll: Real,
    pub v_scroll: Real,
    pub u_scale: Real,
    pub v_scale: Real,
    pub rotation: Radian,
    /// Set by `transform`, replaces the matrix derived from scroll, scale and rotation.
    pub transform: Option<Matrix4>,
    pub binding_type: BindingType,
    pub content_type: ContentType,
    pub external_source: Option<ExternalTextureSource>,
}

impl TextureUnitState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            texture_alias: String::new(),
            frames: Vec::new(),
            animation_duration: 0.0,
            texture_type: TextureType::TwoD,
            mipmaps: TextureMipmaps::Default,
            is_alpha: false,
            hardware_gamma: false,
            desired_format: PixelFormat::Unknown,
            tex_coord_set: 0,
            address_mode: UvwAddressingMode::uniform(TextureAddressingMode::Wrap),
            border_colour: ColourValue::BLACK,
            min_filter: FilterOptions::Linear,
            mag_filter: FilterOptions::Linear,
            mip_filter: FilterOptions::Point,
            max_anisotropy: 1,
            mipmap_bias: 0.0,
            colour_blend: LayerBlendModeEx::default(),
            alpha_blend: LayerBlendModeEx::default(),
            colour_blend_fallback: (SceneBlendFactor::DestColour, SceneBlendFactor::Zero),
            effects: Vec::new(),
            u_scroll: 0.0,
            v_scroll: 0.0,
            u_scale: 1.0,
            v_scale: 1.0,
            rotation: cgmath::Rad(0.0),
            transform: None,
            binding_type: BindingType::Fragment,
            content_type: ContentType::Named,
            external_source: None,
        }
    }

    pub fn texture_name(&self) -> Option<&str> {
        self.frames.first().map(String::as_str)
    }

    pub fn set_texture_name(&mut self, name: &str, texture_type: TextureType) {
        self.frames = vec![name.to_string()];
        self.texture_type = texture_type;
        self.animation_duration = 0.0;
    }

    /// `base_N.ext` naming for `anim_texture base frames duration`.
    pub fn set_animated_texture_name(
        &mut self,
        base: &str,
        frames: u32,
        duration: Real,
    ) -> Result<()> {
        check_frame_count(frames as usize)?;
        let (stem, ext) = match base.rfind('.') {
            Some(dot) => (&base[..dot], &base[dot..]),
            None => (base, ""),
        };
        self.frames = (0..frames).map(|i| format!("{stem}_{i}{ext}")).collect();
        self.animation_duration = duration;
        Ok(())
    }

    pub fn set_frame_texture_names(&mut self, names: Vec<String>, duration: Real) -> Result<()> {
        check_frame_count(names.len())?;
        self.frames = names;
        self.animation_duration = duration;
        Ok(())
    }

    /// Six faces given separately (`separate_uv`) stay six 2D frames, a
    /// combined cube map is a single frame.
    pub fn set_cubic_texture_names(&mut self, names: Vec<String>, for_uvw: bool) {
        if for_uvw {
            self.frames = names.into_iter().take(1).collect();
            self.texture_type = TextureType::CubeMap;
        } else {
            self.frames = names;
            self.texture_type = TextureType::TwoD;
        }
        self.animation_duration = 0.0;
    }

    pub fn is_cubic(&self) -> bool {
        self.texture_type == TextureType::CubeMap || self.frames.len() == 6
    }

    pub fn set_texture_filtering(&mut self, options: TextureFilterOptions) {
        let (min, mag, mip) = options.filters();
        self.min_filter = min;
        self.mag_filter = mag;
        self.mip_filter = mip;
    }

    pub fn set_colour_operation(&mut self, op: LayerBlendOperation) {
        use LayerBlendOperationEx as Ex;
        use SceneBlendFactor as F;
        let (ex, fallback) = match op {
            LayerBlendOperation::Replace => (Ex::Source1, (F::One, F::Zero)),
            LayerBlendOperation::Add => (Ex::Add, (F::One, F::One)),
            LayerBlendOperation::Modulate => (Ex::Modulate, (F::DestColour, F::Zero)),
            LayerBlendOperation::AlphaBlend => {
                (Ex::BlendTextureAlpha, (F::SourceAlpha, F::OneMinusSourceAlpha))
            }
        };
        self.colour_blend.operation = ex;
        self.colour_blend.source1 = LayerBlendSource::Texture;
        self.colour_blend.source2 = LayerBlendSource::Current;
        self.colour_blend_fallback = fallback;
    }

    /// Adds an effect. Only one environment map, one rotation and one
    /// transform of each type can be active at a time.
    pub fn add_effect(&mut self, effect: TextureEffect) {
        self.effects.retain(|e| match (e, &effect) {
            (TextureEffect::EnvironmentMap(_), TextureEffect::EnvironmentMap(_)) => false,
            (TextureEffect::Rotate(_), TextureEffect::Rotate(_)) => false,
            (
                TextureEffect::UvScroll(_) | TextureEffect::UScroll(_) | TextureEffect::VScroll(_),
                TextureEffect::UvScroll(_),
            ) => false,
            (
                TextureEffect::UScroll(_) | TextureEffect::UvScroll(_),
                TextureEffect::UScroll(_),
            ) => false,
            (
                TextureEffect::VScroll(_) | TextureEffect::UvScroll(_),
                TextureEffect::VScroll(_),
            ) => false,
            (
                TextureEffect::Transform { transform: a, .. },
                TextureEffect::Transform { transform: b, .. },
            ) => a != b,
            _ => true,
        });
        self.effects.push(effect);
    }

    pub fn remove_environment_map(&mut self) {
        self.effects
            .retain(|e| !matches!(e, TextureEffect::EnvironmentMap(_)));
    }

    /// Texture coordinate matrix: scale and rotation about the texture
    /// centre, followed by the scroll offset.
    pub fn texture_matrix(&self) -> Matrix4 {
        if let Some(m) = self.transform {
            return m;
        }
        let centre = cgmath::Vector3::new(0.5, 0.5, 0.0);
        let mut m = Matrix4::identity();
        if self.u_scale != 1.0 || self.v_scale != 1.0 {
            m = Matrix4::from_translation(centre)
                * Matrix4::from_nonuniform_scale(1.0 / self.u_scale, 1.0 / self.v_scale, 1.0)
                * Matrix4::from_translation(-centre)
                * m;
        }
        if self.rotation.0 != 0.0 {
            m = Matrix4::from_translation(centre)
                * Matrix4::from_angle_z(self.rotation)
                * Matrix4::from_translation(-centre)
                * m;
        }
        if self.u_scroll != 0.0 || self.v_scroll != 0.0 {
            let scroll = cgmath::Vector3::new(self.u_scroll, self.v_scroll, 0.0);
            m = Matrix4::from_translation(scroll) * m;
        }
        m
    }
}

impl Default for TextureUnitState {
    fn default() -> Self {
        Self::new()
    }
}

fn check_frame_count(frames: usize) -> Result<()> {
    if frames > MAX_ANIMATION_FRAMES {
        bail!("{frames} animation frames given, at most {MAX_ANIMATION_FRAMES} are supported");
    }
    Ok(())
}
