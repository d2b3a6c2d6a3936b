use std::collections::HashMap;

use super::values::{
    check_arity, get_real, get_string, invalid, single_bool, single_string, unexpected_property,
};
use super::{Parent, Translator, require_name};
use crate::data_structures::material::{LodStrategy, Material};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;
use crate::script::listener::ScriptCompilerEvent;

/// `material name { ... }`
pub struct MaterialTranslator;

impl Translator for MaterialTranslator {
    fn check_for(&self, node: &ObjectNode, _parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Material)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, _parent: Parent<'_>) {
        if !require_name(compiler, obj) {
            return;
        }
        let Some(name) = compiler.create_object(ResourceKind::Material, obj, &obj.name) else {
            return;
        };
        if compiler.resources().has_material(&name) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                format!("material {name} already exists"),
            );
            return;
        }

        let mut material = Material::new(&name, compiler.group());
        material.origin = obj.file.clone();
        let mut aliases = HashMap::new();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => match prop.id {
                    Some(Keyword::LodValues) => {
                        if let Some(values) = lod_values(compiler, prop) {
                            material.lod_values = values;
                        }
                    }
                    Some(Keyword::LodDistances) => {
                        if let Some(values) = lod_values(compiler, prop) {
                            material.lod_strategy = LodStrategy::Distance;
                            material.lod_values = values;
                        }
                    }
                    Some(Keyword::LodStrategy) => {
                        let Some(strategy) = single_string(compiler, prop) else {
                            continue;
                        };
                        match LodStrategy::from_name(&strategy) {
                            Some(s) => material.lod_strategy = s,
                            None => invalid(
                                compiler,
                                prop,
                                format!("{strategy} is not a valid lod strategy"),
                            ),
                        }
                    }
                    Some(Keyword::ReceiveShadows) => {
                        if let Some(v) = single_bool(compiler, prop) {
                            material.receive_shadows = v;
                        }
                    }
                    Some(Keyword::TransparencyCastsShadows) => {
                        if let Some(v) = single_bool(compiler, prop) {
                            material.transparency_casts_shadows = v;
                        }
                    }
                    Some(Keyword::SetTextureAlias) => {
                        if !check_arity(compiler, prop, CompileErrorCode::StringExpected, 2) {
                            continue;
                        }
                        let alias = get_string(&prop.values[0]);
                        let texture = prop.values.get(1).and_then(get_string);
                        match (alias, texture) {
                            (Some(alias), Some(texture)) => {
                                aliases.insert(alias, texture);
                            }
                            _ => invalid(
                                compiler,
                                prop,
                                "set_texture_alias must have 2 string arguments",
                            ),
                        }
                    }
                    _ => unexpected_property(compiler, prop),
                },
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::Material),
                        Parent::Material(&mut material),
                    );
                }
                _ => {}
            }
        }

        if !aliases.is_empty() {
            let mut event = ScriptCompilerEvent::PreApplyTextureAliases {
                material: name.clone(),
                aliases,
            };
            compiler.fire_event(&mut event);
            if let ScriptCompilerEvent::PreApplyTextureAliases { aliases, .. } = event {
                material.apply_texture_aliases(&aliases);
            }
        }

        if let Err(e) = compiler.resources_mut().add_material(material) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                e.to_string(),
            );
        }
    }
}

fn lod_values(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
) -> Option<Vec<crate::math::Real>> {
    let values = prop.values.iter().map(get_real).collect::<Option<Vec<_>>>();
    if values.is_none() {
        invalid(
            compiler,
            prop,
            format!("{} expects only numbers as arguments", prop.name),
        );
    }
    values
}
