//! `texture_unit` blocks inside a pass and the `texture_source` blocks that
//! hand a unit over to an external texture plugin.

use super::values::{
    check_arity, colour_property, get_colour, get_enumeration, get_matrix4, get_real, get_string,
    get_uint, invalid, single_enum, single_real, single_string, single_uint, unexpected_property,
};
use super::{Parent, Translator, misplaced, type_value};
use crate::data_structures::{
    material::{SceneBlendFactor, SceneBlendType},
    texture_unit::{
        BindingType, ContentType, EnvMapType, ExternalTextureSource, FilterOptions,
        LayerBlendModeEx, LayerBlendOperation, LayerBlendOperationEx, LayerBlendSource, PixelFormat,
        TextureAddressingMode, TextureEffect, TextureFilterOptions, TextureMipmaps,
        TextureTransformType, TextureType, TextureUnitState, UvwAddressingMode, WaveformType,
    },
};
use crate::math::{Degree, Radian, Real};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

/// Suffixes of the six faces of a cube map given as one base name.
const CUBE_FACE_SUFFIXES: [&str; 6] = ["_fr", "_bk", "_lf", "_rt", "_up", "_dn"];

pub struct TextureUnitTranslator;

impl Translator for TextureUnitTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::TextureUnit) && parent == Some(Keyword::Pass)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::Pass(pass) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let mut unit = TextureUnitState::new();
        unit.name = obj.name.clone();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => translate_property(compiler, prop, &mut unit),
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::TextureUnit),
                        Parent::TextureUnit(&mut unit),
                    );
                }
                _ => {}
            }
        }

        pass.texture_units.push(unit);
    }
}

fn translate_property(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    unit: &mut TextureUnitState,
) {
    match prop.id {
        Some(Keyword::TextureAlias) => {
            if let Some(alias) = single_string(compiler, prop) {
                unit.texture_alias = alias;
            }
        }
        Some(Keyword::Texture) => texture(compiler, prop, unit),
        Some(Keyword::AnimTexture) => anim_texture(compiler, prop, unit),
        Some(Keyword::CubicTexture) => cubic_texture(compiler, prop, unit),
        Some(Keyword::TexCoordSet) => {
            if let Some(set) = single_uint(compiler, prop) {
                unit.tex_coord_set = set;
            }
        }
        Some(Keyword::TexAddressMode) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 3) {
                return;
            }
            let modes = prop
                .values
                .iter()
                .map(get_enumeration::<TextureAddressingMode>)
                .collect::<Option<Vec<_>>>();
            let Some(modes) = modes else {
                invalid(compiler, prop, "tex_address_mode expects wrap, clamp, mirror or border");
                return;
            };
            let u = modes[0];
            unit.address_mode = UvwAddressingMode {
                u,
                v: modes.get(1).copied().unwrap_or(u),
                w: modes.get(2).copied().unwrap_or(u),
            };
        }
        Some(Keyword::TexBorderColour) => {
            if let Some(colour) = colour_property(compiler, prop, 4) {
                unit.border_colour = colour;
            }
        }
        Some(Keyword::Filtering) => filtering(compiler, prop, unit),
        Some(Keyword::MaxAnisotropy) => {
            if let Some(v) = single_uint(compiler, prop) {
                unit.max_anisotropy = v;
            }
        }
        Some(Keyword::MipmapBias) => {
            if let Some(v) = single_real(compiler, prop) {
                unit.mipmap_bias = v;
            }
        }
        Some(Keyword::ColourOp) => {
            if let Some(op) = single_enum::<LayerBlendOperation>(compiler, prop, "colour_op") {
                unit.set_colour_operation(op);
            }
        }
        Some(Keyword::ColourOpEx) => {
            if let Some(blend) = blend_ex(compiler, prop, false) {
                unit.colour_blend = blend;
            }
        }
        Some(Keyword::AlphaOpEx) => {
            if let Some(blend) = blend_ex(compiler, prop, true) {
                unit.alpha_blend = blend;
            }
        }
        Some(Keyword::ColourOpMultipassFallback) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 2) {
                return;
            }
            let fallback = if prop.values.len() == 1 {
                get_enumeration::<SceneBlendType>(&prop.values[0]).map(SceneBlendType::factors)
            } else {
                get_enumeration::<SceneBlendFactor>(&prop.values[0])
                    .zip(get_enumeration::<SceneBlendFactor>(&prop.values[1]))
            };
            match fallback {
                Some(fallback) => unit.colour_blend_fallback = fallback,
                None => invalid(
                    compiler,
                    prop,
                    "colour_op_multipass_fallback arguments are not valid blend factors",
                ),
            }
        }
        Some(Keyword::EnvMap) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
                return;
            }
            let node = &prop.values[0];
            if node.id() == Some(Keyword::Off) {
                unit.remove_environment_map();
            } else if let Some(kind) = get_enumeration::<EnvMapType>(node) {
                unit.add_effect(TextureEffect::EnvironmentMap(kind));
            } else {
                invalid(compiler, prop, format!("{} is not a valid env_map type", node.value()));
            }
        }
        Some(Keyword::Scroll) => {
            if let Some([u, v]) = reals::<2>(compiler, prop) {
                unit.u_scroll = u;
                unit.v_scroll = v;
            }
        }
        Some(Keyword::ScrollAnim) => {
            let Some([u, v]) = reals::<2>(compiler, prop) else {
                return;
            };
            if u == v {
                unit.add_effect(TextureEffect::UvScroll(u));
            } else {
                if u != 0.0 {
                    unit.add_effect(TextureEffect::UScroll(u));
                }
                if v != 0.0 {
                    unit.add_effect(TextureEffect::VScroll(v));
                }
            }
        }
        Some(Keyword::Rotate) => {
            if let Some(degrees) = single_real(compiler, prop) {
                let angle: Degree = cgmath::Deg(degrees);
                unit.rotation = Radian::from(angle);
            }
        }
        Some(Keyword::RotateAnim) => {
            if let Some(speed) = single_real(compiler, prop) {
                unit.add_effect(TextureEffect::Rotate(speed));
            }
        }
        Some(Keyword::Scale) => {
            if let Some([u, v]) = reals::<2>(compiler, prop) {
                unit.u_scale = u;
                unit.v_scale = v;
            }
        }
        Some(Keyword::WaveXform) => wave_xform(compiler, prop, unit),
        Some(Keyword::Transform) => {
            if prop.values.len() != 16 {
                invalid(compiler, prop, "transform requires 16 numbers");
                return;
            }
            match get_matrix4(&prop.values) {
                Some(m) => unit.transform = Some(m),
                None => invalid(compiler, prop, "transform requires 16 numbers"),
            }
        }
        Some(Keyword::BindingType) => {
            if let Some(binding) = single_enum::<BindingType>(compiler, prop, "binding type") {
                unit.binding_type = binding;
            }
        }
        Some(Keyword::ContentType) => content_type(compiler, prop, unit),
        _ => unexpected_property(compiler, prop),
    }
}

/// `texture name [1d|2d|3d|cubic] [unlimited|N] [alpha] [gamma] [format]`
fn texture(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 5) {
        return;
    }
    let Some(name) = get_string(&prop.values[0]) else {
        invalid(compiler, prop, "texture requires a file name");
        return;
    };
    let mut texture_type = TextureType::TwoD;
    let mut mipmaps = TextureMipmaps::Default;
    let mut is_alpha = false;
    let mut gamma = false;
    let mut format = PixelFormat::Unknown;

    for node in &prop.values[1..] {
        match node.id() {
            Some(Keyword::Tex1d) => texture_type = TextureType::OneD,
            Some(Keyword::Tex2d) => texture_type = TextureType::TwoD,
            Some(Keyword::Tex3d) => texture_type = TextureType::ThreeD,
            Some(Keyword::Cubic) => texture_type = TextureType::CubeMap,
            Some(Keyword::Unlimited) => mipmaps = TextureMipmaps::Unlimited,
            Some(Keyword::Alpha) => is_alpha = true,
            Some(Keyword::Gamma) => gamma = true,
            _ => {
                if let Some(count) = get_uint(node) {
                    mipmaps = TextureMipmaps::Count(count);
                } else if let Some(pf) = PixelFormat::from_name(node.value()) {
                    format = pf;
                } else {
                    invalid(compiler, prop, format!("invalid texture option {}", node.value()));
                }
            }
        }
    }

    let name = compiler.process_resource_name(ResourceKind::Texture, &name);
    unit.set_texture_name(&name, texture_type);
    unit.mipmaps = mipmaps;
    unit.is_alpha = is_alpha;
    unit.hardware_gamma = gamma;
    unit.desired_format = format;
}

/// `anim_texture base frames duration` or `anim_texture f1 f2 ... duration`
fn anim_texture(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if prop.values.len() < 3 {
        compiler.add_error(
            CompileErrorCode::StringExpected,
            &prop.file,
            prop.line,
            "anim_texture must have at least 3 arguments",
        );
        return;
    }
    let values = &prop.values;
    let short_form = values.len() == 3 && values[1].as_atom().is_some_and(|a| a.is_number());
    if short_form {
        let base = get_string(&values[0]);
        let frames = get_uint(&values[1]);
        let duration = get_real(&values[2]);
        match (base, frames, duration) {
            (Some(base), Some(frames), Some(duration)) => {
                let base = compiler.process_resource_name(ResourceKind::Texture, &base);
                if let Err(e) = unit.set_animated_texture_name(&base, frames, duration) {
                    invalid(compiler, prop, e.to_string());
                }
            }
            _ => invalid(
                compiler,
                prop,
                "anim_texture short form requires a name, a frame count and a duration",
            ),
        }
        return;
    }

    let Some((last, names)) = values.split_last() else {
        return;
    };
    let Some(duration) = get_real(last) else {
        invalid(compiler, prop, "anim_texture duration must be a number");
        return;
    };
    let Some(names) = names.iter().map(get_string).collect::<Option<Vec<_>>>() else {
        invalid(compiler, prop, "anim_texture frame names must be strings");
        return;
    };
    let names = names
        .iter()
        .map(|n| compiler.process_resource_name(ResourceKind::Texture, n))
        .collect();
    if let Err(e) = unit.set_frame_texture_names(names, duration) {
        invalid(compiler, prop, e.to_string());
    }
}

/// `cubic_texture name combinedUVW|separateUV` or six names and the mode.
fn cubic_texture(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if prop.values.len() != 2 && prop.values.len() != 7 {
        invalid(compiler, prop, "cubic_texture must have 2 or 7 arguments");
        return;
    }
    let Some((mode, names)) = prop.values.split_last() else {
        return;
    };
    let for_uvw = match mode.id() {
        Some(Keyword::CombinedUvw) => true,
        Some(Keyword::SeparateUv) => false,
        _ => {
            invalid(compiler, prop, "cubic_texture mode must be combinedUVW or separateUV");
            return;
        }
    };
    let Some(names) = names.iter().map(get_string).collect::<Option<Vec<_>>>() else {
        invalid(compiler, prop, "cubic_texture names must be strings");
        return;
    };
    let names = if names.len() == 1 && !for_uvw {
        cube_face_names(&names[0])
    } else {
        names
    };
    let names = names
        .iter()
        .map(|n| compiler.process_resource_name(ResourceKind::Texture, n))
        .collect();
    unit.set_cubic_texture_names(names, for_uvw);
}

fn cube_face_names(base: &str) -> Vec<String> {
    let (stem, ext) = match base.rfind('.') {
        Some(dot) => (&base[..dot], &base[dot..]),
        None => (base, ""),
    };
    CUBE_FACE_SUFFIXES.iter().map(|s| format!("{stem}{s}{ext}")).collect()
}

/// `filtering none|bilinear|trilinear|anisotropic` or `filtering min mag mip`
fn filtering(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 3) {
        return;
    }
    match prop.values.len() {
        1 => match get_enumeration::<TextureFilterOptions>(&prop.values[0]) {
            Some(options) => unit.set_texture_filtering(options),
            None => invalid(
                compiler,
                prop,
                format!("{} is not a valid filtering option", prop.values[0].value()),
            ),
        },
        3 => {
            let filters = prop
                .values
                .iter()
                .map(get_enumeration::<FilterOptions>)
                .collect::<Option<Vec<_>>>();
            match filters.as_deref() {
                Some(&[min, mag, mip]) => {
                    unit.min_filter = min;
                    unit.mag_filter = mag;
                    unit.mip_filter = mip;
                }
                _ => {
                    invalid(compiler, prop, "filtering expects none, point, linear or anisotropic")
                }
            }
        }
        _ => invalid(compiler, prop, "filtering must have 1 or 3 arguments"),
    }
}

/// `colour_op_ex op src1 src2 [factor] [arg1] [arg2]`. Colour arguments take
/// three components, alpha arguments one.
fn blend_ex(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    alpha: bool,
) -> Option<LayerBlendModeEx> {
    if prop.values.len() < 3 {
        compiler.add_error(
            CompileErrorCode::StringExpected,
            &prop.file,
            prop.line,
            format!("{} must have at least 3 arguments", prop.name),
        );
        return None;
    }
    let op = get_enumeration::<LayerBlendOperationEx>(&prop.values[0]);
    let source1 = get_enumeration::<LayerBlendSource>(&prop.values[1]);
    let source2 = get_enumeration::<LayerBlendSource>(&prop.values[2]);
    let (Some(op), Some(source1), Some(source2)) = (op, source1, source2) else {
        invalid(compiler, prop, format!("{} has an invalid operation or source", prop.name));
        return None;
    };

    let mut blend = LayerBlendModeEx {
        operation: op,
        source1,
        source2,
        ..Default::default()
    };
    let mut rest = &prop.values[3..];

    if op == LayerBlendOperationEx::BlendManual {
        let Some(factor) = rest.first().and_then(get_real) else {
            invalid(compiler, prop, "blend_manual requires a blend factor");
            return None;
        };
        blend.factor = factor;
        rest = &rest[1..];
    }

    let width = if alpha { 1 } else { 3 };
    for (source, is_first) in [(source1, true), (source2, false)] {
        if source != LayerBlendSource::Manual {
            continue;
        }
        if rest.len() < width {
            invalid(compiler, prop, format!("{} is missing a manual source value", prop.name));
            return None;
        }
        let (arg, tail) = rest.split_at(width);
        rest = tail;
        if alpha {
            let Some(v) = get_real(&arg[0]) else {
                invalid(compiler, prop, format!("{} manual value must be a number", prop.name));
                return None;
            };
            if is_first {
                blend.alpha_arg1 = v;
            } else {
                blend.alpha_arg2 = v;
            }
        } else {
            let Some(colour) = get_colour(arg, 3) else {
                invalid(compiler, prop, format!("{} manual colour must be 3 numbers", prop.name));
                return None;
            };
            if is_first {
                blend.colour_arg1 = colour;
            } else {
                blend.colour_arg2 = colour;
            }
        }
    }
    if !rest.is_empty() {
        compiler.add_error(
            CompileErrorCode::FewerParametersExpected,
            &prop.file,
            prop.line,
            format!("{} has too many arguments", prop.name),
        );
        return None;
    }
    Some(blend)
}

/// `wave_xform type waveform base frequency phase amplitude`
fn wave_xform(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if prop.values.len() != 6 {
        invalid(compiler, prop, "wave_xform must have 6 arguments");
        return;
    }
    let transform = get_enumeration::<TextureTransformType>(&prop.values[0]);
    let waveform = get_enumeration::<WaveformType>(&prop.values[1]);
    let params = prop.values[2..].iter().map(get_real).collect::<Option<Vec<_>>>();
    match (transform, waveform, params.as_deref()) {
        (Some(transform), Some(waveform), Some(&[base, frequency, phase, amplitude])) => {
            unit.add_effect(TextureEffect::Transform {
                transform,
                waveform,
                base,
                frequency,
                phase,
                amplitude,
            });
        }
        _ => invalid(compiler, prop, "wave_xform has invalid arguments"),
    }
}

/// `content_type named|shadow|compositor name texture [mrt_index]`
fn content_type(compiler: &mut ScriptCompiler, prop: &PropertyNode, unit: &mut TextureUnitState) {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 4) {
        return;
    }
    match prop.values[0].id() {
        Some(Keyword::Named) => unit.content_type = ContentType::Named,
        Some(Keyword::Shadow) => unit.content_type = ContentType::Shadow,
        Some(Keyword::Compositor) => {
            let compositor = prop.values.get(1).and_then(get_string);
            let texture = prop.values.get(2).and_then(get_string);
            let mrt_index = match prop.values.get(3) {
                Some(node) => get_uint(node),
                None => Some(0),
            };
            match (compositor, texture, mrt_index) {
                (Some(compositor), Some(texture), Some(mrt_index)) => {
                    let compositor =
                        compiler.process_resource_name(ResourceKind::Compositor, &compositor);
                    unit.content_type = ContentType::Compositor {
                        compositor,
                        texture,
                        mrt_index,
                    };
                }
                _ => invalid(
                    compiler,
                    prop,
                    "content_type compositor requires a compositor name and a texture name",
                ),
            }
        }
        _ => invalid(
            compiler,
            prop,
            format!("{} is not a valid content type", prop.values[0].value()),
        ),
    }
}

/// Exactly `N` numbers.
fn reals<const N: usize>(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<[Real; N]> {
    if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, N) {
        return None;
    }
    let values = prop.values.iter().map(get_real).collect::<Option<Vec<_>>>();
    let out = values.and_then(|v| <[Real; N]>::try_from(v).ok());
    if out.is_none() {
        invalid(compiler, prop, format!("{} requires {N} numbers", prop.name));
    }
    out
}

/// `texture_source plugin { key values... }` inside a texture unit.
pub struct TextureSourceTranslator;

impl Translator for TextureSourceTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::TextureSource) && parent == Some(Keyword::TextureUnit)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::TextureUnit(unit) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let Some(plugin) = type_value(obj) else {
            compiler.add_error(
                CompileErrorCode::StringExpected,
                &obj.file,
                obj.line,
                "texture_source requires a plugin name",
            );
            return;
        };
        let mut source = ExternalTextureSource {
            plugin,
            ..Default::default()
        };
        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => {
                    let value = prop
                        .values
                        .iter()
                        .map(AbstractNode::value)
                        .collect::<Vec<_>>()
                        .join(" ");
                    source.parameters.insert(prop.name.clone(), value);
                }
                AbstractNode::Object(child_obj) => misplaced(compiler, child_obj),
                _ => {}
            }
        }
        unit.external_source = Some(source);
    }
}
