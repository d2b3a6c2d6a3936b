//! `pass { ... }` inside a material technique, including the program
//! references nested in it.

use super::gpu_program::translate_program_parameters;
use super::values::{
    ScriptEnum, check_arity, colour_property, get_boolean, get_colour, get_enumeration, get_real,
    get_uint, invalid, single_bool, single_enum, single_real, single_uint, unexpected_property,
};
use super::{Parent, Translator, misplaced, require_name};
use crate::data_structures::{
    colour::ColourValue,
    gpu_program::GpuProgramUsage,
    material::{
        CompareFunction, CullingMode, FogMode, FogSettings, IlluminationStage, LightType,
        ManualCullingMode, Pass, PointAttenuation, PolygonMode, ProgramSlot, SceneBlendFactor,
        SceneBlendOperation, SceneBlendType, ShadeOptions, TrackVertexColour,
    },
};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

pub struct PassTranslator;

impl Translator for PassTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Pass) && parent == Some(Keyword::Technique)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::Technique(technique) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let mut pass = Pass::new();
        pass.name = obj.name.clone();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => translate_property(compiler, prop, &mut pass),
                AbstractNode::Object(child_obj) => match program_slot(child_obj.id) {
                    Some(slot) => translate_program_ref(compiler, child_obj, &mut pass, slot),
                    None => {
                        compiler.process_node(child, Some(Keyword::Pass), Parent::Pass(&mut pass))
                    }
                },
                _ => {}
            }
        }

        technique.passes.push(pass);
    }
}

fn program_slot(id: Option<Keyword>) -> Option<ProgramSlot> {
    match id? {
        Keyword::VertexProgramRef => Some(ProgramSlot::Vertex),
        Keyword::FragmentProgramRef => Some(ProgramSlot::Fragment),
        Keyword::GeometryProgramRef => Some(ProgramSlot::Geometry),
        Keyword::ShadowCasterVertexProgramRef => Some(ProgramSlot::ShadowCasterVertex),
        Keyword::ShadowReceiverVertexProgramRef => Some(ProgramSlot::ShadowReceiverVertex),
        Keyword::ShadowReceiverFragmentProgramRef => Some(ProgramSlot::ShadowReceiverFragment),
        _ => None,
    }
}

/// `vertex_program_ref name { param_named ... }` and friends.
fn translate_program_ref(
    compiler: &mut ScriptCompiler,
    obj: &ObjectNode,
    pass: &mut Pass,
    slot: ProgramSlot,
) {
    if !require_name(compiler, obj) {
        return;
    }
    let name = compiler.process_resource_name(ResourceKind::GpuProgram, &obj.name);
    let usage = compiler
        .resources()
        .gpu_program(&name)
        .map(|program| (program.kind, GpuProgramUsage::new(slot.program_type(), program)));
    let Some((kind, mut usage)) = usage else {
        compiler.add_error(
            CompileErrorCode::ReferenceToaNonExistingObject,
            &obj.file,
            obj.line,
            name,
        );
        return;
    };
    if kind != slot.program_type() {
        compiler.add_error(
            CompileErrorCode::InvalidParameters,
            &obj.file,
            obj.line,
            format!("{name} is a {kind:?} program and cannot be used in {}", obj.cls),
        );
        return;
    }

    if compiler.resources().is_program_supported(&name) {
        translate_program_parameters(compiler, obj, &mut usage.parameters);
    }
    pass.set_program(slot, usage);
}

fn translate_property(compiler: &mut ScriptCompiler, prop: &PropertyNode, pass: &mut Pass) {
    match prop.id {
        Some(Keyword::Ambient) => {
            if let Some(colour) =
                tracked_colour(compiler, prop, &mut pass.tracking, TrackVertexColour::AMBIENT)
            {
                pass.ambient = colour;
            }
        }
        Some(Keyword::Diffuse) => {
            if let Some(colour) =
                tracked_colour(compiler, prop, &mut pass.tracking, TrackVertexColour::DIFFUSE)
            {
                pass.diffuse = colour;
            }
        }
        Some(Keyword::Emissive) => {
            if let Some(colour) =
                tracked_colour(compiler, prop, &mut pass.tracking, TrackVertexColour::EMISSIVE)
            {
                pass.emissive = colour;
            }
        }
        Some(Keyword::Specular) => specular(compiler, prop, pass),
        Some(Keyword::SceneBlend) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 2) {
                return;
            }
            if prop.values.len() == 1 {
                match get_enumeration::<SceneBlendType>(&prop.values[0]) {
                    Some(blend) => pass.set_scene_blending(blend),
                    None => invalid(
                        compiler,
                        prop,
                        format!("{} is not a valid scene blend shorthand", prop.values[0].value()),
                    ),
                }
            } else {
                match factors::<2>(&prop.values) {
                    Some([src, dst]) => pass.set_scene_blend_factors(src, dst),
                    None => {
                        invalid(compiler, prop, "scene_blend factors are not valid blend factors")
                    }
                }
            }
        }
        Some(Keyword::SeparateSceneBlend) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 4) {
                return;
            }
            match prop.values.len() {
                2 => {
                    let colour = get_enumeration::<SceneBlendType>(&prop.values[0]);
                    let alpha = get_enumeration::<SceneBlendType>(&prop.values[1]);
                    match (colour, alpha) {
                        (Some(colour), Some(alpha)) => {
                            pass.set_separate_scene_blending(colour, alpha)
                        }
                        _ => {
                            invalid(compiler, prop, "separate_scene_blend shorthands are not valid")
                        }
                    }
                }
                4 => match factors::<4>(&prop.values) {
                    Some([src, dst, src_alpha, dst_alpha]) => {
                        pass.set_separate_scene_blend_factors(src, dst, src_alpha, dst_alpha)
                    }
                    None => invalid(
                        compiler,
                        prop,
                        "separate_scene_blend factors are not valid blend factors",
                    ),
                },
                _ => invalid(compiler, prop, "separate_scene_blend must have 2 or 4 arguments"),
            }
        }
        Some(Keyword::SceneBlendOp) => {
            if let Some(op) =
                single_enum::<SceneBlendOperation>(compiler, prop, "blend operation")
            {
                pass.set_scene_blending_operation(op);
            }
        }
        Some(Keyword::SeparateSceneBlendOp) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 2) {
                return;
            }
            let op = get_enumeration::<SceneBlendOperation>(&prop.values[0]);
            let alpha_op = prop.values.get(1).and_then(get_enumeration::<SceneBlendOperation>);
            match (op, alpha_op) {
                (Some(op), Some(alpha_op)) => {
                    pass.set_separate_scene_blending_operation(op, alpha_op)
                }
                _ => {
                    invalid(compiler, prop, "separate_scene_blend_op must have 2 blend operations")
                }
            }
        }
        Some(Keyword::DepthCheck) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.depth_check = v;
            }
        }
        Some(Keyword::DepthWrite) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.depth_write = v;
            }
        }
        Some(Keyword::DepthBias) => {
            if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, 2) {
                return;
            }
            let constant = get_real(&prop.values[0]);
            let slope = match prop.values.get(1) {
                Some(v) => get_real(v),
                None => Some(0.0),
            };
            match (constant, slope) {
                (Some(constant), Some(slope)) => {
                    pass.depth_bias_constant = constant;
                    pass.depth_bias_slope_scale = slope;
                }
                _ => invalid(compiler, prop, "depth_bias does not support non-numeric arguments"),
            }
        }
        Some(Keyword::DepthFunc) => {
            if let Some(func) = single_enum::<CompareFunction>(compiler, prop, "compare function") {
                pass.depth_function = func;
            }
        }
        Some(Keyword::IterationDepthBias) => {
            if let Some(v) = single_real(compiler, prop) {
                pass.depth_bias_per_iteration = v;
            }
        }
        Some(Keyword::AlphaRejection) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 2) {
                return;
            }
            let Some(func) = get_enumeration::<CompareFunction>(&prop.values[0]) else {
                invalid(
                    compiler,
                    prop,
                    format!("{} is not a valid compare function", prop.values[0].value()),
                );
                return;
            };
            if let Some(value) = prop.values.get(1) {
                match get_uint(value).and_then(|v| u8::try_from(v).ok()) {
                    Some(v) => pass.alpha_reject_value = v,
                    None => {
                        invalid(
                            compiler,
                            prop,
                            format!("{} is not a valid alpha value", value.value()),
                        );
                        return;
                    }
                }
            }
            pass.alpha_reject_function = func;
        }
        Some(Keyword::AlphaToCoverage) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.alpha_to_coverage = v;
            }
        }
        Some(Keyword::LightScissor) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.light_scissoring = v;
            }
        }
        Some(Keyword::LightClipPlanes) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.light_clip_planes = v;
            }
        }
        Some(Keyword::TransparentSorting) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
                return;
            }
            if prop.values[0].id() == Some(Keyword::Force) {
                pass.transparent_sorting = true;
                pass.transparent_sorting_forced = true;
            } else if let Some(v) = get_boolean(&prop.values[0]) {
                pass.transparent_sorting = v;
                pass.transparent_sorting_forced = false;
            } else {
                invalid(compiler, prop, "transparent_sorting must be a boolean or \"force\"");
            }
        }
        Some(Keyword::IlluminationStage) => {
            if let Some(stage) =
                single_enum::<IlluminationStage>(compiler, prop, "illumination stage")
            {
                pass.illumination_stage = stage;
            }
        }
        Some(Keyword::CullHardware) => {
            if let Some(mode) = single_enum::<CullingMode>(compiler, prop, "cull_hardware mode") {
                pass.culling_mode = mode;
            }
        }
        Some(Keyword::CullSoftware) => {
            if let Some(mode) =
                single_enum::<ManualCullingMode>(compiler, prop, "cull_software mode")
            {
                pass.manual_culling_mode = mode;
            }
        }
        Some(Keyword::NormaliseNormals) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.normalise_normals = v;
            }
        }
        Some(Keyword::Lighting) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.lighting = v;
            }
        }
        Some(Keyword::Shading) => {
            if let Some(mode) = single_enum::<ShadeOptions>(compiler, prop, "shading mode") {
                pass.shading = mode;
            }
        }
        Some(Keyword::PolygonMode) => {
            if let Some(mode) = single_enum::<PolygonMode>(compiler, prop, "polygon mode") {
                pass.polygon_mode = mode;
            }
        }
        Some(Keyword::PolygonModeOverrideable) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.polygon_mode_overrideable = v;
            }
        }
        Some(Keyword::FogOverride) => fog_override(compiler, prop, pass),
        Some(Keyword::ColourWrite) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.colour_write = v;
            }
        }
        Some(Keyword::MaxLights) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.max_lights = v;
            }
        }
        Some(Keyword::StartLight) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.start_light = v;
            }
        }
        Some(Keyword::Iteration) => iteration(compiler, prop, pass),
        Some(Keyword::PointSize) => {
            if let Some(v) = single_real(compiler, prop) {
                pass.point_size = v;
            }
        }
        Some(Keyword::PointSprites) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.point_sprites = v;
            }
        }
        Some(Keyword::PointSizeAttenuation) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 4) {
                return;
            }
            let Some(enabled) = get_boolean(&prop.values[0]) else {
                invalid(compiler, prop, "point_size_attenuation first argument must be a boolean");
                return;
            };
            let mut attenuation = PointAttenuation::default();
            if enabled && prop.values.len() > 1 {
                if prop.values.len() != 4 {
                    invalid(
                        compiler,
                        prop,
                        "point_size_attenuation needs constant, linear and quadratic factors",
                    );
                    return;
                }
                let Some(params) =
                    prop.values[1..].iter().map(get_real).collect::<Option<Vec<_>>>()
                else {
                    invalid(compiler, prop, "point_size_attenuation factors must be numbers");
                    return;
                };
                attenuation = PointAttenuation {
                    enabled,
                    constant: params[0],
                    linear: params[1],
                    quadratic: params[2],
                };
            }
            attenuation.enabled = enabled;
            pass.point_attenuation = attenuation;
        }
        Some(Keyword::PointSizeMin) => {
            if let Some(v) = single_real(compiler, prop) {
                pass.point_min_size = v;
            }
        }
        Some(Keyword::PointSizeMax) => {
            if let Some(v) = single_real(compiler, prop) {
                pass.point_max_size = v;
            }
        }
        _ => unexpected_property(compiler, prop),
    }
}

/// Colour or `vertexcolour`. Returns the colour to store, `None` when the
/// vertex colour is tracked instead or the value was rejected.
fn tracked_colour(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    tracking: &mut TrackVertexColour,
    flag: TrackVertexColour,
) -> Option<ColourValue> {
    if prop.values.len() == 1 && prop.values[0].id() == Some(Keyword::VertexColour) {
        tracking.insert(flag);
        return None;
    }
    colour_property(compiler, prop, 4)
}

/// `specular r g b [a] shininess` or `specular vertexcolour [shininess]`.
fn specular(compiler: &mut ScriptCompiler, prop: &PropertyNode, pass: &mut Pass) {
    if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, 5) {
        return;
    }
    if prop.values[0].id() == Some(Keyword::VertexColour) {
        if prop.values.len() > 2 {
            invalid(compiler, prop, "specular vertexcolour takes at most a shininess value");
            return;
        }
        if let Some(value) = prop.values.get(1) {
            match get_real(value) {
                Some(shininess) => pass.shininess = shininess,
                None => {
                    invalid(compiler, prop, "specular shininess must be a number");
                    return;
                }
            }
        }
        pass.tracking.insert(TrackVertexColour::SPECULAR);
        return;
    }

    let count = prop.values.len();
    if count < 4 {
        invalid(compiler, prop, "specular must have a colour followed by a shininess value");
        return;
    }
    let colour = get_colour(&prop.values[..count - 1], 4);
    let shininess = get_real(&prop.values[count - 1]);
    match (colour, shininess) {
        (Some(colour), Some(shininess)) => {
            pass.specular = colour;
            pass.shininess = shininess;
        }
        _ => invalid(compiler, prop, "specular requires numeric colour and shininess arguments"),
    }
}

fn factors<const N: usize>(values: &[AbstractNode]) -> Option<[SceneBlendFactor; N]> {
    let mut out = [SceneBlendFactor::One; N];
    for (slot, node) in out.iter_mut().zip(values) {
        *slot = get_enumeration(node)?;
    }
    (values.len() == N).then_some(out)
}

/// `fog_override enabled [mode r g b density start end]`
fn fog_override(compiler: &mut ScriptCompiler, prop: &PropertyNode, pass: &mut Pass) {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 8) {
        return;
    }
    let Some(enabled) = get_boolean(&prop.values[0]) else {
        invalid(compiler, prop, "fog_override first argument must be a boolean");
        return;
    };
    let mut fog = FogSettings {
        override_scene: enabled,
        ..Default::default()
    };
    if let Some(node) = prop.values.get(1) {
        match get_enumeration::<FogMode>(node) {
            Some(mode) => fog.mode = mode,
            None => {
                invalid(compiler, prop, format!("{} is not a valid fog mode", node.value()));
                return;
            }
        }
    }
    if prop.values.len() > 2 {
        match get_colour(&prop.values[2..], 3) {
            Some(colour) => fog.colour = colour,
            None => {
                invalid(compiler, prop, "fog_override colour must be 3 numbers");
                return;
            }
        }
    }
    for (index, target) in [(5, &mut fog.density), (6, &mut fog.start), (7, &mut fog.end)] {
        if let Some(node) = prop.values.get(index) {
            match get_real(node) {
                Some(v) => *target = v,
                None => {
                    invalid(compiler, prop, format!("{} is not a valid number", node.value()));
                    return;
                }
            }
        }
    }
    pass.fog = fog;
}

/// `once`, `once_per_light [type]`, `N`, `N per_light [type]` or
/// `N per_n_lights M [type]`.
fn iteration(compiler: &mut ScriptCompiler, prop: &PropertyNode, pass: &mut Pass) {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 4) {
        return;
    }
    let light_type = |node: Option<&AbstractNode>| -> Result<Option<LightType>, String> {
        match node {
            None => Ok(None),
            Some(node) => match node.id().and_then(LightType::from_keyword) {
                Some(t) => Ok(Some(t)),
                None => Err(format!("{} is not a valid light type", node.value())),
            },
        }
    };

    let first = &prop.values[0];
    let mut it = pass.iteration;
    let result = match first.id() {
        Some(Keyword::Once) => {
            it.per_light = false;
            it.only_light_type = None;
            Ok(())
        }
        Some(Keyword::OncePerLight) => light_type(prop.values.get(1)).map(|t| {
            it.count = 1;
            it.per_light = true;
            it.lights_per_iteration = 1;
            it.only_light_type = t;
        }),
        _ => match get_uint(first) {
            None => Err(format!("{} is not a valid iteration", first.value())),
            Some(count) => {
                it.count = count;
                match prop.values.get(1).map(|n| (n, n.id())) {
                    None => {
                        it.per_light = false;
                        Ok(())
                    }
                    Some((_, Some(Keyword::PerLight))) => light_type(prop.values.get(2)).map(|t| {
                        it.per_light = true;
                        it.lights_per_iteration = 1;
                        it.only_light_type = t;
                    }),
                    Some((_, Some(Keyword::PerNLights))) => {
                        match prop.values.get(2).and_then(get_uint) {
                            None => Err("per_n_lights requires a light count".to_string()),
                            Some(n) => light_type(prop.values.get(3)).map(|t| {
                                it.per_light = true;
                                it.lights_per_iteration = n;
                                it.only_light_type = t;
                            }),
                        }
                    }
                    Some((node, _)) => {
                        Err(format!("{} is not a valid iteration mode", node.value()))
                    }
                }
            }
        },
    };
    match result {
        Ok(()) => pass.iteration = it,
        Err(message) => invalid(compiler, prop, message),
    }
}
