use super::values::{get_floats, get_ints, get_string, unexpected_property};
use super::{Parent, Translator, require_name};
use crate::data_structures::{
    gpu_params::ElementType,
    shared_params::{GpuConstantType, GpuSharedParameters},
};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

/// `shared_params name { shared_param_named ... }` at the top level.
pub struct SharedParametersTranslator;

impl Translator for SharedParametersTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::SharedParams) && parent.is_none()
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, _parent: Parent<'_>) {
        if !require_name(compiler, obj) {
            return;
        }
        let Some(name) =
            compiler.create_object(ResourceKind::SharedParameters, obj, &obj.name)
        else {
            return;
        };
        let mut shared = GpuSharedParameters::new(&name);
        shared.group = compiler.group().to_string();
        shared.origin = obj.file.clone();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) if prop.id == Some(Keyword::SharedParamNamed) => {
                    if let Err((code, message)) = shared_param_named(prop, &mut shared) {
                        compiler.add_error(code, &prop.file, prop.line, message);
                    }
                }
                AbstractNode::Property(prop) => unexpected_property(compiler, prop),
                AbstractNode::Object(_) => compiler.process_node(child, obj.id, Parent::None),
                _ => {}
            }
        }

        if let Err(e) = compiler.resources_mut().add_shared_parameters(shared) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                e.to_string(),
            );
        }
    }
}

type Failure = (CompileErrorCode, String);

fn invalid_parameters(message: impl ToString) -> Failure {
    (CompileErrorCode::InvalidParameters, message.to_string())
}

/// `shared_param_named name type [[N]] [values...]`
fn shared_param_named(
    prop: &PropertyNode,
    shared: &mut GpuSharedParameters,
) -> Result<(), Failure> {
    if prop.values.len() < 2 {
        return Err(invalid_parameters("shared_param_named requires at least 2 arguments"));
    }
    let name = get_string(&prop.values[0])
        .ok_or_else(|| invalid_parameters("shared_param_named requires a parameter name"))?;
    let type_name = prop.values[1].value();
    let constant_type = GpuConstantType::from_name(type_name)
        .ok_or_else(|| invalid_parameters(format!("invalid parameter type {type_name}")))?;

    let mut rest = &prop.values[2..];
    let mut array_size = 1;
    if let Some(first) = rest.first() {
        let text = first.value();
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            array_size = inner
                .parse::<usize>()
                .map_err(|_| invalid_parameters(format!("invalid array size {text}")))?;
            rest = &rest[1..];
        }
    }

    shared
        .add_constant_definition(&name, constant_type, array_size)
        .map_err(invalid_parameters)?;
    if rest.is_empty() {
        return Ok(());
    }

    let capacity = constant_type.element_size() * array_size.max(1);
    if rest.len() > capacity {
        return Err((
            CompileErrorCode::FewerParametersExpected,
            format!("{name} holds {capacity} values, {} given", rest.len()),
        ));
    }
    match constant_type.element_type() {
        ElementType::Real => {
            let values = get_floats(rest, rest.len())
                .ok_or_else(|| invalid_parameters(format!("invalid float values for {name}")))?;
            shared.set_named_constant_f32(&name, &values)
        }
        ElementType::Int => {
            let values = get_ints(rest, rest.len())
                .ok_or_else(|| invalid_parameters(format!("invalid int values for {name}")))?;
            shared.set_named_constant_i32(&name, &values)
        }
    }
    .map_err(invalid_parameters)
}
