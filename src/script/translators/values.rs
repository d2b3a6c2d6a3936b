//! Coercion of script values and the argument checks shared by translators.
//!
//! The `get_*` functions never report anything. They return `None` when a
//! node cannot be read as the requested type and leave the error message to
//! the caller, which knows which property it was reading.

use crate::data_structures::{
    colour::ColourValue,
    compositor::{QuadNormals, StencilOperation, TextureScope},
    material::{
        CompareFunction, CullingMode, FogMode, IlluminationStage, LightType, ManualCullingMode,
        PolygonMode, SceneBlendFactor, SceneBlendOperation, SceneBlendType, ShadeOptions,
    },
    texture_unit::{
        BindingType, EnvMapType, FilterOptions, LayerBlendOperation, LayerBlendOperationEx,
        LayerBlendSource, TextureAddressingMode, TextureFilterOptions, TextureTransformType,
        WaveformType,
    },
};
use crate::math::{Matrix4, Real, matrix4_from_row_major};
use crate::script::ast::{AbstractNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

pub fn get_node_at(nodes: &[AbstractNode], index: usize) -> Option<&AbstractNode> {
    nodes.get(index)
}

/// `on`, `true`, `yes` and their negations.
pub fn get_boolean(node: &AbstractNode) -> Option<bool> {
    match node.as_atom()?.id {
        Some(Keyword::On) => Some(true),
        Some(Keyword::Off) => Some(false),
        _ => None,
    }
}

pub fn get_string(node: &AbstractNode) -> Option<String> {
    node.as_atom().map(|a| a.value.clone())
}

pub fn get_real(node: &AbstractNode) -> Option<Real> {
    node.as_atom()?.number()
}

/// Integral text only, `1.5` is rejected.
pub fn get_int(node: &AbstractNode) -> Option<i32> {
    node.as_atom()?.value.trim().parse().ok()
}

pub fn get_uint(node: &AbstractNode) -> Option<u32> {
    node.as_atom()?.value.trim().parse().ok()
}

/// Reads up to `max` components. At least red, green and blue are needed
/// unless `max` asks for fewer. Alpha defaults to 1.
pub fn get_colour(values: &[AbstractNode], max: usize) -> Option<ColourValue> {
    let mut components = [0.0, 0.0, 0.0, 1.0];
    let mut n = 0;
    for node in values.iter().take(max.min(4)) {
        components[n] = get_real(node)?;
        n += 1;
    }
    if n >= 3 || n == max {
        let [r, g, b, a] = components;
        Some(ColourValue::new(r, g, b, a))
    } else {
        None
    }
}

/// Sixteen reals in row-major order.
pub fn get_matrix4(values: &[AbstractNode]) -> Option<Matrix4> {
    if values.len() < 16 {
        return None;
    }
    let mut m = [0.0; 16];
    for (slot, node) in m.iter_mut().zip(values) {
        *slot = get_real(node)?;
    }
    Some(matrix4_from_row_major(&m))
}

/// `count` reals, padded with zeros when the values run out.
pub fn get_floats(values: &[AbstractNode], count: usize) -> Option<Vec<Real>> {
    let mut out = values
        .iter()
        .take(count)
        .map(get_real)
        .collect::<Option<Vec<_>>>()?;
    out.resize(count, 0.0);
    Some(out)
}

pub fn get_ints(values: &[AbstractNode], count: usize) -> Option<Vec<i32>> {
    let mut out = values
        .iter()
        .take(count)
        .map(get_int)
        .collect::<Option<Vec<_>>>()?;
    out.resize(count, 0);
    Some(out)
}

/// Enumerations that scripts spell as keywords.
pub trait ScriptEnum: Sized {
    fn from_keyword(keyword: Keyword) -> Option<Self>;
}

pub fn get_enumeration<T: ScriptEnum>(node: &AbstractNode) -> Option<T> {
    T::from_keyword(node.as_atom()?.id?)
}

macro_rules! script_enum {
    ($ty:ty { $($keyword:ident => $value:expr),* $(,)? }) => {
        impl ScriptEnum for $ty {
            fn from_keyword(keyword: Keyword) -> Option<Self> {
                match keyword {
                    $(Keyword::$keyword => Some($value),)*
                    _ => None,
                }
            }
        }
    };
}

script_enum!(CompareFunction {
    AlwaysFail => CompareFunction::AlwaysFail,
    AlwaysPass => CompareFunction::AlwaysPass,
    Less => CompareFunction::Less,
    LessEqual => CompareFunction::LessEqual,
    Equal => CompareFunction::Equal,
    NotEqual => CompareFunction::NotEqual,
    GreaterEqual => CompareFunction::GreaterEqual,
    Greater => CompareFunction::Greater,
});

script_enum!(SceneBlendFactor {
    One => SceneBlendFactor::One,
    Zero => SceneBlendFactor::Zero,
    DestColour => SceneBlendFactor::DestColour,
    SrcColour => SceneBlendFactor::SourceColour,
    OneMinusDestColour => SceneBlendFactor::OneMinusDestColour,
    OneMinusSrcColour => SceneBlendFactor::OneMinusSourceColour,
    DestAlpha => SceneBlendFactor::DestAlpha,
    SrcAlpha => SceneBlendFactor::SourceAlpha,
    OneMinusDestAlpha => SceneBlendFactor::OneMinusDestAlpha,
    OneMinusSrcAlpha => SceneBlendFactor::OneMinusSourceAlpha,
});

script_enum!(SceneBlendType {
    Add => SceneBlendType::Add,
    Modulate => SceneBlendType::Modulate,
    ColourBlend => SceneBlendType::TransparentColour,
    AlphaBlend => SceneBlendType::TransparentAlpha,
    Replace => SceneBlendType::Replace,
});

script_enum!(SceneBlendOperation {
    Add => SceneBlendOperation::Add,
    Subtract => SceneBlendOperation::Subtract,
    ReverseSubtract => SceneBlendOperation::ReverseSubtract,
    Min => SceneBlendOperation::Min,
    Max => SceneBlendOperation::Max,
});

script_enum!(CullingMode {
    None => CullingMode::None,
    Clockwise => CullingMode::Clockwise,
    Anticlockwise => CullingMode::Anticlockwise,
});

script_enum!(ManualCullingMode {
    None => ManualCullingMode::None,
    Back => ManualCullingMode::Back,
    Front => ManualCullingMode::Front,
});

script_enum!(ShadeOptions {
    Flat => ShadeOptions::Flat,
    Gouraud => ShadeOptions::Gouraud,
    Phong => ShadeOptions::Phong,
});

script_enum!(PolygonMode {
    Solid => PolygonMode::Solid,
    Wireframe => PolygonMode::Wireframe,
    Points => PolygonMode::Points,
});

script_enum!(FogMode {
    None => FogMode::None,
    Linear => FogMode::Linear,
    Exp => FogMode::Exp,
    Exp2 => FogMode::Exp2,
});

script_enum!(LightType {
    Point => LightType::Point,
    Directional => LightType::Directional,
    Spot => LightType::Spotlight,
});

script_enum!(IlluminationStage {
    Ambient => IlluminationStage::Ambient,
    PerLight => IlluminationStage::PerLight,
    Decal => IlluminationStage::Decal,
});

script_enum!(TextureAddressingMode {
    Wrap => TextureAddressingMode::Wrap,
    Clamp => TextureAddressingMode::Clamp,
    Mirror => TextureAddressingMode::Mirror,
    Border => TextureAddressingMode::Border,
});

script_enum!(FilterOptions {
    None => FilterOptions::None,
    Point => FilterOptions::Point,
    Linear => FilterOptions::Linear,
    Anisotropic => FilterOptions::Anisotropic,
});

script_enum!(TextureFilterOptions {
    None => TextureFilterOptions::None,
    Bilinear => TextureFilterOptions::Bilinear,
    Trilinear => TextureFilterOptions::Trilinear,
    Anisotropic => TextureFilterOptions::Anisotropic,
});

script_enum!(LayerBlendOperation {
    Replace => LayerBlendOperation::Replace,
    Add => LayerBlendOperation::Add,
    Modulate => LayerBlendOperation::Modulate,
    AlphaBlend => LayerBlendOperation::AlphaBlend,
});

script_enum!(LayerBlendOperationEx {
    Source1 => LayerBlendOperationEx::Source1,
    Source2 => LayerBlendOperationEx::Source2,
    Modulate => LayerBlendOperationEx::Modulate,
    ModulateX2 => LayerBlendOperationEx::ModulateX2,
    ModulateX4 => LayerBlendOperationEx::ModulateX4,
    Add => LayerBlendOperationEx::Add,
    AddSigned => LayerBlendOperationEx::AddSigned,
    AddSmooth => LayerBlendOperationEx::AddSmooth,
    Subtract => LayerBlendOperationEx::Subtract,
    BlendDiffuseAlpha => LayerBlendOperationEx::BlendDiffuseAlpha,
    BlendTextureAlpha => LayerBlendOperationEx::BlendTextureAlpha,
    BlendCurrentAlpha => LayerBlendOperationEx::BlendCurrentAlpha,
    BlendManual => LayerBlendOperationEx::BlendManual,
    DotProduct => LayerBlendOperationEx::DotProduct,
    BlendDiffuseColour => LayerBlendOperationEx::BlendDiffuseColour,
});

script_enum!(LayerBlendSource {
    SrcCurrent => LayerBlendSource::Current,
    SrcTexture => LayerBlendSource::Texture,
    SrcDiffuse => LayerBlendSource::Diffuse,
    SrcSpecular => LayerBlendSource::Specular,
    SrcManual => LayerBlendSource::Manual,
});

script_enum!(EnvMapType {
    Spherical => EnvMapType::Curved,
    Planar => EnvMapType::Planar,
    CubicReflection => EnvMapType::Reflection,
    CubicNormal => EnvMapType::Normal,
});

script_enum!(TextureTransformType {
    ScrollX => TextureTransformType::TranslateU,
    ScrollY => TextureTransformType::TranslateV,
    ScaleX => TextureTransformType::ScaleU,
    ScaleY => TextureTransformType::ScaleV,
    Rotate => TextureTransformType::Rotate,
});

script_enum!(WaveformType {
    Sine => WaveformType::Sine,
    Triangle => WaveformType::Triangle,
    Square => WaveformType::Square,
    Sawtooth => WaveformType::Sawtooth,
    InverseSawtooth => WaveformType::InverseSawtooth,
    Pwm => WaveformType::PulseWidthModulation,
});

script_enum!(BindingType {
    Vertex => BindingType::Vertex,
    Fragment => BindingType::Fragment,
});

script_enum!(StencilOperation {
    Keep => StencilOperation::Keep,
    Zero => StencilOperation::Zero,
    Replace => StencilOperation::Replace,
    Increment => StencilOperation::Increment,
    Decrement => StencilOperation::Decrement,
    IncrementWrap => StencilOperation::IncrementWrap,
    DecrementWrap => StencilOperation::DecrementWrap,
    Invert => StencilOperation::Invert,
});

script_enum!(TextureScope {
    ScopeLocal => TextureScope::Local,
    ScopeChain => TextureScope::Chain,
    ScopeGlobal => TextureScope::Global,
});

script_enum!(QuadNormals {
    CameraFarCornersViewSpace => QuadNormals::ViewSpace,
    CameraFarCornersWorldSpace => QuadNormals::WorldSpace,
});

// Argument checks. Each reports its own error and returns `None` (or
// `false`) when the property should be skipped.

/// No arguments gives `code`, more than `max` gives `FewerParametersExpected`.
pub(crate) fn check_arity(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    code: CompileErrorCode,
    max: usize,
) -> bool {
    if prop.values.is_empty() {
        compiler.add_error(
            code,
            &prop.file,
            prop.line,
            format!("{} must have at least 1 argument", prop.name),
        );
        false
    } else if prop.values.len() > max {
        let noun = if max == 1 { "argument" } else { "arguments" };
        compiler.add_error(
            CompileErrorCode::FewerParametersExpected,
            &prop.file,
            prop.line,
            format!("{} must have at most {max} {noun}", prop.name),
        );
        false
    } else {
        true
    }
}

pub(crate) fn invalid(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    message: impl Into<String>,
) {
    compiler.add_error(
        CompileErrorCode::InvalidParameters,
        &prop.file,
        prop.line,
        message,
    );
}

pub(crate) fn unexpected_property(compiler: &mut ScriptCompiler, prop: &PropertyNode) {
    compiler.add_error(
        CompileErrorCode::UnexpectedToken,
        &prop.file,
        prop.line,
        format!("token \"{}\" is not recognized", prop.name),
    );
}

pub(crate) fn single_bool(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<bool> {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
        return None;
    }
    let value = get_boolean(&prop.values[0]);
    if value.is_none() {
        invalid(
            compiler,
            prop,
            format!(
                "{} argument must be \"true\", \"false\", \"yes\", \"no\", \"on\", or \"off\"",
                prop.name
            ),
        );
    }
    value
}

pub(crate) fn single_string(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<String> {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
        return None;
    }
    let value = get_string(&prop.values[0]);
    if value.is_none() {
        invalid(compiler, prop, format!("{} must be a string", prop.name));
    }
    value
}

pub(crate) fn single_real(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<Real> {
    if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, 1) {
        return None;
    }
    let value = get_real(&prop.values[0]);
    if value.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} is not a valid number", prop.values[0].value()),
        );
    }
    value
}

pub(crate) fn single_uint(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<u32> {
    if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, 1) {
        return None;
    }
    let value = get_uint(&prop.values[0]);
    if value.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} is not a valid unsigned integer", prop.values[0].value()),
        );
    }
    value
}

pub(crate) fn single_enum<T: ScriptEnum>(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    what: &str,
) -> Option<T> {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
        return None;
    }
    let value = get_enumeration(&prop.values[0]);
    if value.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} is not a valid {what}", prop.values[0].value()),
        );
    }
    value
}

/// Reads a colour property with up to `max` components.
pub(crate) fn colour_property(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    max: usize,
) -> Option<ColourValue> {
    if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, max) {
        return None;
    }
    let value = get_colour(&prop.values, max);
    if value.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} requires 3 or 4 colour arguments", prop.name),
        );
    }
    value
}
