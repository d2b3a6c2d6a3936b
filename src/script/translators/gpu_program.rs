//! Program declarations and the parameter blocks used by program
//! declarations (`default_params`) and pass program references.

use super::values::{
    get_floats, get_int, get_ints, get_matrix4, get_real, get_string, get_uint, invalid,
    single_bool, single_string, single_uint,
};
use super::{Parent, Translator, require_name};
use crate::data_structures::{
    auto_constants::{AutoConstantDataType, AutoConstantType},
    gpu_params::{AutoConstantData, GpuProgramParameters, MAX_CONSTANT_COMPONENTS, REGISTER_SIZE},
    gpu_program::{GpuProgram, GpuProgramType},
};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

/// `vertex_program`, `fragment_program` and `geometry_program` at the top
/// level.
pub struct GpuProgramTranslator;

impl Translator for GpuProgramTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        parent.is_none() && program_type(node.id).is_some()
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, _parent: Parent<'_>) {
        let Some(kind) = program_type(obj.id) else {
            return;
        };
        if !require_name(compiler, obj) {
            return;
        }
        let Some(language) = obj.values.first().and_then(get_string) else {
            compiler.add_error(
                CompileErrorCode::StringExpected,
                &obj.file,
                obj.line,
                format!("{} {} requires a language", obj.cls, obj.name),
            );
            return;
        };
        let Some(name) = compiler.create_object(ResourceKind::GpuProgram, obj, &obj.name) else {
            return;
        };
        if compiler.resources().has_gpu_program(&name) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                format!("gpu program {name} already exists"),
            );
            return;
        }

        let mut program = GpuProgram::new(&name, kind, &language);
        program.group = compiler.group().to_string();
        program.origin = obj.file.clone();
        let mut defaults = None;

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => {
                    translate_declaration_property(compiler, prop, &mut program)
                }
                AbstractNode::Object(child_obj) if child_obj.id == Some(Keyword::DefaultParams) => {
                    defaults = Some(child_obj);
                }
                AbstractNode::Object(_) => compiler.process_node(child, obj.id, Parent::None),
                _ => {}
            }
        }

        program.supported = if program.is_assembler() {
            let supported = compiler.resources().capabilities.is_syntax_supported(&program.syntax);
            if !supported {
                compiler.add_error(
                    CompileErrorCode::UnsupportedByRenderSystem,
                    &obj.file,
                    obj.line,
                    format!("{name} uses syntax \"{}\" which is not supported", program.syntax),
                );
            }
            supported
        } else if program.is_unified() {
            // resolved through the delegates, see Resources::is_program_supported
            true
        } else {
            compiler.resources().capabilities.is_language_supported(&program.language)
        };

        if let Some(defaults) = defaults {
            if program.supported {
                translate_program_parameters(compiler, defaults, &mut program.default_parameters);
            }
        }

        log::debug!("compiled {:?} program {} ({})", program.kind, program.name, program.language);
        if let Err(e) = compiler.resources_mut().add_gpu_program(program) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                e.to_string(),
            );
        }
    }
}

fn program_type(id: Option<Keyword>) -> Option<GpuProgramType> {
    match id? {
        Keyword::VertexProgram => Some(GpuProgramType::Vertex),
        Keyword::FragmentProgram => Some(GpuProgramType::Fragment),
        Keyword::GeometryProgram => Some(GpuProgramType::Geometry),
        _ => None,
    }
}

fn translate_declaration_property(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    program: &mut GpuProgram,
) {
    match prop.id {
        Some(Keyword::Source) => {
            if let Some(source) = single_string(compiler, prop) {
                program.source_file = source;
            }
        }
        Some(Keyword::Syntax) => {
            if let Some(syntax) = single_string(compiler, prop) {
                program.syntax = syntax;
            }
        }
        Some(Keyword::Delegate) => {
            if let Some(delegate) = single_string(compiler, prop) {
                let delegate = compiler.process_resource_name(ResourceKind::GpuProgram, &delegate);
                program.delegates.push(delegate);
            }
        }
        Some(Keyword::IncludesSkeletalAnimation) => {
            if let Some(v) = single_bool(compiler, prop) {
                program.skeletal_animation = v;
            }
        }
        Some(Keyword::IncludesMorphAnimation) => {
            if let Some(v) = single_bool(compiler, prop) {
                program.morph_animation = v;
            }
        }
        Some(Keyword::IncludesPoseAnimation) => {
            let Some(count) = single_uint(compiler, prop) else {
                return;
            };
            match u16::try_from(count) {
                Ok(count) => program.pose_animation = count,
                Err(_) => invalid(compiler, prop, format!("{count} is too many poses")),
            }
        }
        Some(Keyword::UsesVertexTextureFetch) => {
            if let Some(v) = single_bool(compiler, prop) {
                program.vertex_texture_fetch = v;
            }
        }
        Some(Keyword::UsesAdjacencyInformation) => {
            if let Some(v) = single_bool(compiler, prop) {
                program.adjacency_information = v;
            }
        }
        _ => {
            // anything else is passed through to the program as is
            let value = prop.values.iter().map(AbstractNode::value).collect::<Vec<_>>().join(" ");
            program.custom_parameters.insert(prop.name.clone(), value);
        }
    }
}

/// Applies the `param_*` and `shared_params_ref` properties of `obj` to
/// `params`. Nested objects are not allowed in parameter blocks.
pub(crate) fn translate_program_parameters(
    compiler: &mut ScriptCompiler,
    obj: &ObjectNode,
    params: &mut GpuProgramParameters,
) {
    let mut animation_parametric_index = 0;

    for child in &obj.children {
        match child {
            AbstractNode::Property(prop) => match prop.id {
                Some(Keyword::SharedParamsRef) => shared_params_ref(compiler, prop, params),
                Some(Keyword::ParamNamed) | Some(Keyword::ParamIndexed) => {
                    param(compiler, prop, params)
                }
                Some(Keyword::ParamNamedAuto) | Some(Keyword::ParamIndexedAuto) => {
                    param_auto(compiler, prop, params, &mut animation_parametric_index)
                }
                _ => super::values::unexpected_property(compiler, prop),
            },
            AbstractNode::Object(child_obj) => super::misplaced(compiler, child_obj),
            _ => {}
        }
    }
}

fn shared_params_ref(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    params: &mut GpuProgramParameters,
) {
    if prop.values.len() != 1 {
        invalid(compiler, prop, "shared_params_ref requires a single parameter");
        return;
    }
    let Some(name) = get_string(&prop.values[0]) else {
        invalid(compiler, prop, "shared_params_ref requires a name");
        return;
    };
    let result = match compiler.resources().shared_parameters(&name) {
        Some(shared) => params.add_shared_parameters(shared).map_err(|e| e.to_string()),
        None => Err(format!("shared parameter set {name} does not exist")),
    };
    if let Err(message) = result {
        invalid(compiler, prop, message);
    }
}

enum Target {
    Named(String),
    Indexed(usize),
}

fn target(compiler: &mut ScriptCompiler, prop: &PropertyNode) -> Option<Target> {
    let node = &prop.values[0];
    let target = if prop.id == Some(Keyword::ParamNamed)
        || prop.id == Some(Keyword::ParamNamedAuto)
    {
        get_string(node).map(Target::Named)
    } else {
        get_uint(node).map(|i| Target::Indexed(i as usize))
    };
    if target.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} is not a valid parameter name or index", node.value()),
        );
    }
    target
}

/// `param_named name type values...` or `param_indexed index type values...`
fn param(compiler: &mut ScriptCompiler, prop: &PropertyNode, params: &mut GpuProgramParameters) {
    if prop.values.len() < 3 {
        invalid(
            compiler,
            prop,
            "param_named and param_indexed properties require at least 3 arguments",
        );
        return;
    }
    let Some(target) = target(compiler, prop) else {
        return;
    };
    let type_name = prop.values[1].value();
    let data = &prop.values[2..];

    let result = if type_name == "matrix4x4" {
        match get_matrix4(data) {
            Some(m) => {
                clear_auto(params, &target);
                match &target {
                    Target::Named(name) => params.set_named_matrix4(name, &m),
                    Target::Indexed(index) => params.set_constant_matrix4(*index, &m),
                }
            }
            None => {
                invalid(compiler, prop, "incorrect matrix4x4 declaration");
                return;
            }
        }
    } else {
        let Some((is_float, count)) = element_spec(type_name) else {
            invalid(
                compiler,
                prop,
                format!("incorrect type {type_name}, only int and float variants are allowed"),
            );
            return;
        };
        if count > MAX_CONSTANT_COMPONENTS {
            invalid(
                compiler,
                prop,
                format!("{type_name} exceeds the limit of {MAX_CONSTANT_COMPONENTS} components"),
            );
            return;
        }
        // indexed writes fill whole registers
        let rounded = count.div_ceil(REGISTER_SIZE) * REGISTER_SIZE;
        let write_count = match target {
            Target::Named(_) => count,
            Target::Indexed(_) => rounded,
        };
        if is_float {
            let Some(values) = get_floats(data, write_count) else {
                invalid(compiler, prop, "incorrect float constant declaration");
                return;
            };
            clear_auto(params, &target);
            match &target {
                Target::Named(name) => params.set_named_constant_f32(name, &values),
                Target::Indexed(index) => params.set_constant_f32(*index, &values),
            }
        } else {
            let Some(values) = get_ints(data, write_count) else {
                invalid(compiler, prop, "incorrect integer constant declaration");
                return;
            };
            clear_auto(params, &target);
            match &target {
                Target::Named(name) => params.set_named_constant_i32(name, &values),
                Target::Indexed(index) => params.set_constant_i32(*index, &values),
            }
        }
    };
    if let Err(e) = result {
        invalid(compiler, prop, e.to_string());
    }
}

/// `float`, `float3`, `int2`... as (is_float, component count).
fn element_spec(type_name: &str) -> Option<(bool, usize)> {
    let (is_float, rest) = if let Some(rest) = type_name.strip_prefix("float") {
        (true, rest)
    } else {
        (false, type_name.strip_prefix("int")?)
    };
    if rest.is_empty() {
        return Some((is_float, 1));
    }
    let count: usize = rest.parse().ok()?;
    (count > 0).then_some((is_float, count))
}

fn clear_auto(params: &mut GpuProgramParameters, target: &Target) {
    match target {
        Target::Named(name) => params.clear_named_auto_constant(name),
        Target::Indexed(index) => params.clear_indexed_auto_constant(*index),
    }
}

/// `param_named_auto name constant [extra...]`
fn param_auto(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    params: &mut GpuProgramParameters,
    animation_parametric_index: &mut u32,
) {
    if prop.values.len() < 2 {
        invalid(
            compiler,
            prop,
            "param_named_auto and param_indexed_auto properties require at least 2 arguments",
        );
        return;
    }
    let Some(target) = target(compiler, prop) else {
        return;
    };
    let constant_name = prop.values[1].value();
    let Some(def) = AutoConstantType::from_name(constant_name) else {
        invalid(compiler, prop, format!("auto constant {constant_name} is not recognized"));
        return;
    };
    let extra = &prop.values[2..];

    let data = match def.data_type {
        AutoConstantDataType::None => AutoConstantData::None,
        AutoConstantDataType::Int => {
            if def.kind == AutoConstantType::AnimationParametric {
                let index = *animation_parametric_index;
                *animation_parametric_index += 1;
                AutoConstantData::Int(index)
            } else if extra.is_empty() {
                if !def.kind.defaults_extra_to_zero() {
                    compiler.add_error(
                        CompileErrorCode::NumberExpected,
                        &prop.file,
                        prop.line,
                        format!("extra parameters required by constant definition {}", def.name),
                    );
                    return;
                }
                AutoConstantData::Int(0)
            } else {
                let first = get_int(&extra[0]);
                let second = match extra.get(1) {
                    Some(node) => get_int(node),
                    None => Some(0),
                };
                match (first, second) {
                    // two extras pack into the low and high half
                    (Some(a), Some(b)) => {
                        AutoConstantData::Int((a as u32 & 0xffff) | ((b as u32) << 16))
                    }
                    _ => {
                        invalid(
                            compiler,
                            prop,
                            format!("invalid extra parameter for {}", def.name),
                        );
                        return;
                    }
                }
            }
        }
        AutoConstantDataType::Real => match extra.first() {
            Some(node) => match get_real(node) {
                Some(v) => AutoConstantData::Real(v),
                None => {
                    invalid(compiler, prop, format!("invalid extra parameter for {}", def.name));
                    return;
                }
            },
            None if def.kind.defaults_extra_to_one() => AutoConstantData::Real(1.0),
            None => {
                compiler.add_error(
                    CompileErrorCode::NumberExpected,
                    &prop.file,
                    prop.line,
                    format!("extra parameters required by constant definition {}", def.name),
                );
                return;
            }
        },
    };

    let result = match target {
        Target::Named(name) => params.set_named_auto_constant(&name, def.kind, data),
        Target::Indexed(index) => params.set_indexed_auto_constant(index, def.kind, data),
    };
    if let Err(e) = result {
        invalid(compiler, prop, e.to_string());
    }
}
