//! Compositor scripts: `compositor`, its `technique`s, their `target` and
//! `target_output` passes and the render passes inside those.

use super::values::{
    check_arity, colour_property, get_enumeration, get_real, get_string, get_uint, invalid,
    single_bool, single_enum, single_real, single_string, single_uint, unexpected_property,
};
use super::{Parent, Translator, misplaced, require_name};
use crate::data_structures::{
    compositor::{
        ClearBuffers, CompositionPass, CompositionPassType, CompositionTargetPass,
        CompositionTechnique, Compositor, InputMode, QuadNormals, StencilOperation,
        TextureDefinition, TextureScope,
    },
    material::CompareFunction,
    texture_unit::PixelFormat,
};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

pub struct CompositorTranslator;

impl Translator for CompositorTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Compositor) && parent.is_none()
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, _parent: Parent<'_>) {
        if !require_name(compiler, obj) {
            return;
        }
        let Some(name) = compiler.create_object(ResourceKind::Compositor, obj, &obj.name) else {
            return;
        };
        if compiler.resources().has_compositor(&name) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                format!("compositor {name} already exists"),
            );
            return;
        }

        let mut compositor = Compositor::new(&name, compiler.group());
        compositor.origin = obj.file.clone();
        for child in &obj.children {
            match child {
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::Compositor),
                        Parent::Compositor(&mut compositor),
                    );
                }
                AbstractNode::Property(prop) => unexpected_property(compiler, prop),
                _ => {}
            }
        }

        log::debug!(
            "compiled compositor {} with {} technique(s)",
            compositor.name,
            compositor.techniques.len()
        );
        if let Err(e) = compiler.resources_mut().add_compositor(compositor) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                e.to_string(),
            );
        }
    }
}

/// `technique { texture ... target ... target_output ... }` inside a compositor.
pub struct CompositionTechniqueTranslator;

impl Translator for CompositionTechniqueTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Technique) && parent == Some(Keyword::Compositor)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::Compositor(compositor) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let mut technique = CompositionTechnique::default();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => match prop.id {
                    Some(Keyword::Texture) => {
                        if let Some(def) = texture_definition(compiler, prop) {
                            technique.texture_definitions.push(def);
                        }
                    }
                    Some(Keyword::TextureRef) => {
                        if prop.values.len() != 3 {
                            invalid(compiler, prop, "texture_ref only supports 3 argument");
                            continue;
                        }
                        let names = prop.values.iter().map(get_string).collect::<Option<Vec<_>>>();
                        let Some([local, other, texture]) =
                            names.and_then(|n| <[String; 3]>::try_from(n).ok())
                        else {
                            invalid(compiler, prop, "texture_ref requires 3 names");
                            continue;
                        };
                        let other =
                            compiler.process_resource_name(ResourceKind::Compositor, &other);
                        let mut def = TextureDefinition::new(&local);
                        def.reference = Some((other, texture));
                        technique.texture_definitions.push(def);
                    }
                    Some(Keyword::Scheme) => {
                        if let Some(scheme) = single_string(compiler, prop) {
                            technique.scheme = scheme;
                        }
                    }
                    Some(Keyword::CompositorLogic) => {
                        if let Some(logic) = single_string(compiler, prop) {
                            technique.compositor_logic = logic;
                        }
                    }
                    _ => unexpected_property(compiler, prop),
                },
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::Technique),
                        Parent::CompositionTechnique(&mut technique),
                    );
                }
                _ => {}
            }
        }

        compositor.techniques.push(technique);
    }
}

/// `texture name width height format... [pooled] [gamma] [no_fsaa] [scope]`
///
/// Width and height are a size in pixels, `target_width`/`target_height`
/// or `target_width_scaled factor`/`target_height_scaled factor`.
fn texture_definition(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
) -> Option<TextureDefinition> {
    let values = &prop.values;
    if values.len() < 4 {
        compiler.add_error(
            CompileErrorCode::StringExpected,
            &prop.file,
            prop.line,
            "texture must have at least 4 arguments",
        );
        return None;
    }
    let Some(name) = get_string(&values[0]) else {
        invalid(compiler, prop, "texture requires a name");
        return None;
    };
    let mut def = TextureDefinition::new(&name);
    let mut i = 1;

    for (target_keyword, scaled_keyword, is_width) in [
        (Keyword::TargetWidth, Keyword::TargetWidthScaled, true),
        (Keyword::TargetHeight, Keyword::TargetHeightScaled, false),
    ] {
        let Some(node) = values.get(i) else {
            compiler.add_error(
                CompileErrorCode::StringExpected,
                &prop.file,
                prop.line,
                "texture requires a width and a height",
            );
            return None;
        };
        let (size, factor) = if node.id() == Some(target_keyword) {
            (0, 1.0)
        } else if node.id() == Some(scaled_keyword) {
            i += 1;
            let Some(factor) = values.get(i).and_then(get_real) else {
                invalid(compiler, prop, format!("{} requires a factor", node.value()));
                return None;
            };
            (0, factor)
        } else if let Some(size) = get_uint(node) {
            (size, 1.0)
        } else {
            invalid(compiler, prop, format!("{} is not a valid texture size", node.value()));
            return None;
        };
        if is_width {
            def.width = size;
            def.width_factor = factor;
        } else {
            def.height = size;
            def.height_factor = factor;
        }
        i += 1;
    }

    for node in &values[i..] {
        match node.id() {
            Some(Keyword::Pooled) => def.pooled = true,
            Some(Keyword::Gamma) => def.hw_gamma_write = true,
            Some(Keyword::NoFsaa) => def.fsaa = false,
            _ => {
                if let Some(scope) = get_enumeration::<TextureScope>(node) {
                    def.scope = scope;
                } else if let Some(format) = PixelFormat::from_name(node.value()) {
                    def.formats.push(format);
                } else {
                    invalid(compiler, prop, format!("invalid texture option {}", node.value()));
                    return None;
                }
            }
        }
    }
    if def.formats.is_empty() {
        compiler.add_error(
            CompileErrorCode::StringExpected,
            &prop.file,
            prop.line,
            "texture requires at least one pixel format",
        );
        return None;
    }
    Some(def)
}

/// `target name { ... }` and `target_output { ... }` inside a compositor
/// technique.
pub struct CompositionTargetPassTranslator;

impl Translator for CompositionTargetPassTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        matches!(node.id, Some(Keyword::Target) | Some(Keyword::TargetOutput))
            && parent == Some(Keyword::Technique)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::CompositionTechnique(technique) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let is_output = obj.id == Some(Keyword::TargetOutput);
        let mut target = CompositionTargetPass::new();
        if !is_output {
            if !require_name(compiler, obj) {
                return;
            }
            target.output_name = obj.name.clone();
        }

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => {
                    translate_target_property(compiler, prop, &mut target)
                }
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        obj.id,
                        Parent::CompositionTargetPass(&mut target),
                    );
                }
                _ => {}
            }
        }

        if is_output {
            technique.output_target = target;
        } else {
            technique.target_passes.push(target);
        }
    }
}

fn translate_target_property(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    target: &mut CompositionTargetPass,
) {
    match prop.id {
        Some(Keyword::Input) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 1) {
                return;
            }
            match prop.values[0].id() {
                Some(Keyword::None) => target.input_mode = InputMode::None,
                Some(Keyword::Previous) => target.input_mode = InputMode::Previous,
                _ => invalid(compiler, prop, "input must be none or previous"),
            }
        }
        Some(Keyword::OnlyInitial) => {
            if let Some(v) = single_bool(compiler, prop) {
                target.only_initial = v;
            }
        }
        Some(Keyword::VisibilityMask) => {
            if let Some(v) = single_uint(compiler, prop) {
                target.visibility_mask = v;
            }
        }
        Some(Keyword::LodBias) => {
            if let Some(v) = single_real(compiler, prop) {
                target.lod_bias = v;
            }
        }
        Some(Keyword::MaterialScheme) => {
            if let Some(v) = single_string(compiler, prop) {
                target.material_scheme = v;
            }
        }
        Some(Keyword::Shadows) => {
            if let Some(v) = single_bool(compiler, prop) {
                target.shadows_enabled = v;
            }
        }
        _ => unexpected_property(compiler, prop),
    }
}

/// `pass clear|stencil|render_scene|render_quad|render_custom [type] { ... }`
/// inside a target.
pub struct CompositionPassTranslator;

impl Translator for CompositionPassTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Pass)
            && matches!(parent, Some(Keyword::Target) | Some(Keyword::TargetOutput))
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::CompositionTargetPass(target) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let Some(kind) = CompositionPassType::from_name(&obj.name) else {
            compiler.add_error(
                CompileErrorCode::InvalidParameters,
                &obj.file,
                obj.line,
                format!("pass type \"{}\" is not recognized", obj.name),
            );
            return;
        };
        let mut pass = CompositionPass::new(kind);
        if kind == CompositionPassType::RenderCustom {
            match obj.values.first().and_then(get_string) {
                Some(custom) => pass.custom_type = custom,
                None => {
                    compiler.add_error(
                        CompileErrorCode::StringExpected,
                        &obj.file,
                        obj.line,
                        "render_custom requires a custom pass type",
                    );
                    return;
                }
            }
        }

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => translate_pass_property(compiler, prop, &mut pass),
                AbstractNode::Object(child_obj) => misplaced(compiler, child_obj),
                _ => {}
            }
        }

        target.passes.push(pass);
    }
}

fn translate_pass_property(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    pass: &mut CompositionPass,
) {
    match prop.id {
        Some(Keyword::Material) => {
            if let Some(name) = single_string(compiler, prop) {
                pass.material_name = compiler.process_resource_name(ResourceKind::Material, &name);
            }
        }
        Some(Keyword::Input) => {
            if !check_arity(compiler, prop, CompileErrorCode::NumberExpected, 3) {
                return;
            }
            let id = get_uint(&prop.values[0]);
            let name = prop.values.get(1).and_then(get_string);
            let mrt = match prop.values.get(2) {
                Some(node) => get_uint(node),
                None => Some(0),
            };
            match (id, name, mrt) {
                (Some(id), Some(name), Some(mrt)) => {
                    if let Err(e) = pass.set_input(id as usize, &name, mrt) {
                        invalid(compiler, prop, e.to_string());
                    }
                }
                _ => invalid(
                    compiler,
                    prop,
                    "input requires an id, a texture name and an optional mrt index",
                ),
            }
        }
        Some(Keyword::Identifier) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.identifier = v;
            }
        }
        Some(Keyword::FirstRenderQueue) => {
            if let Some(v) = render_queue(compiler, prop) {
                pass.first_render_queue = v;
            }
        }
        Some(Keyword::LastRenderQueue) => {
            if let Some(v) = render_queue(compiler, prop) {
                pass.last_render_queue = v;
            }
        }
        Some(Keyword::MaterialScheme) => {
            if let Some(v) = single_string(compiler, prop) {
                pass.material_scheme = v;
            }
        }
        Some(Keyword::QuadNormals) => {
            if let Some(v) = single_enum::<QuadNormals>(compiler, prop, "quad_normals mode") {
                pass.quad_normals = v;
            }
        }
        Some(Keyword::Buffers) => {
            if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 3) {
                return;
            }
            let mut buffers = ClearBuffers {
                colour: false,
                depth: false,
                stencil: false,
            };
            for node in &prop.values {
                match node.id() {
                    Some(Keyword::Colour) => buffers.colour = true,
                    Some(Keyword::Depth) => buffers.depth = true,
                    Some(Keyword::Stencil) => buffers.stencil = true,
                    _ => {
                        invalid(compiler, prop, format!("{} is not a valid buffer", node.value()));
                        return;
                    }
                }
            }
            pass.clear_buffers = buffers;
        }
        Some(Keyword::ColourValue) => {
            if let Some(colour) = colour_property(compiler, prop, 4) {
                pass.clear_colour = colour;
            }
        }
        Some(Keyword::DepthValue) => {
            if let Some(v) = single_real(compiler, prop) {
                pass.clear_depth = v;
            }
        }
        Some(Keyword::StencilValue) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.clear_stencil = v;
            }
        }
        Some(Keyword::Check) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.stencil.check = v;
            }
        }
        Some(Keyword::CompFunc) => {
            if let Some(v) = single_enum::<CompareFunction>(compiler, prop, "compare function") {
                pass.stencil.function = v;
            }
        }
        Some(Keyword::RefValue) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.stencil.ref_value = v;
            }
        }
        Some(Keyword::Mask) => {
            if let Some(v) = single_uint(compiler, prop) {
                pass.stencil.mask = v;
            }
        }
        Some(Keyword::FailOp) => {
            if let Some(v) = single_enum::<StencilOperation>(compiler, prop, "stencil operation") {
                pass.stencil.fail_op = v;
            }
        }
        Some(Keyword::DepthFailOp) => {
            if let Some(v) = single_enum::<StencilOperation>(compiler, prop, "stencil operation") {
                pass.stencil.depth_fail_op = v;
            }
        }
        Some(Keyword::PassOp) => {
            if let Some(v) = single_enum::<StencilOperation>(compiler, prop, "stencil operation") {
                pass.stencil.pass_op = v;
            }
        }
        Some(Keyword::TwoSided) => {
            if let Some(v) = single_bool(compiler, prop) {
                pass.stencil.two_sided = v;
            }
        }
        _ => unexpected_property(compiler, prop),
    }
}

fn render_queue(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<u8> {
    let value = single_uint(compiler, prop)?;
    let queue = u8::try_from(value).ok();
    if queue.is_none() {
        invalid(compiler, prop, format!("{value} is not a valid render queue"));
    }
    queue
}
