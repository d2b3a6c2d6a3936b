use super::values::{
    check_arity, get_boolean, get_string, invalid, single_string, single_uint, unexpected_property,
};
use super::{Parent, Translator, misplaced};
use crate::data_structures::material::{GpuDeviceRule, GpuVendorRule, Technique};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

/// `technique [name] { ... }` inside a material.
pub struct TechniqueTranslator;

impl Translator for TechniqueTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Technique) && parent == Some(Keyword::Material)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::Material(material) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let mut technique = Technique::new();
        technique.name = obj.name.clone();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => match prop.id {
                    Some(Keyword::Scheme) => {
                        if let Some(scheme) = single_string(compiler, prop) {
                            technique.scheme = scheme;
                        }
                    }
                    Some(Keyword::LodIndex) => {
                        let Some(index) = single_uint(compiler, prop) else {
                            continue;
                        };
                        match u16::try_from(index) {
                            Ok(index) => technique.lod_index = index,
                            Err(_) => {
                                invalid(compiler, prop, format!("{index} is not a valid lod index"))
                            }
                        }
                    }
                    Some(Keyword::ShadowCasterMaterial) => {
                        if let Some(name) = single_string(compiler, prop) {
                            let name =
                                compiler.process_resource_name(ResourceKind::Material, &name);
                            technique.shadow_caster_material = Some(name);
                        }
                    }
                    Some(Keyword::ShadowReceiverMaterial) => {
                        if let Some(name) = single_string(compiler, prop) {
                            let name =
                                compiler.process_resource_name(ResourceKind::Material, &name);
                            technique.shadow_receiver_material = Some(name);
                        }
                    }
                    Some(Keyword::GpuVendorRule) => {
                        if let Some((include, vendor)) = rule_header(compiler, prop, 2) {
                            technique.add_vendor_rule(GpuVendorRule { vendor, include });
                        }
                    }
                    Some(Keyword::GpuDeviceRule) => {
                        let Some((include, pattern)) = rule_header(compiler, prop, 3) else {
                            continue;
                        };
                        let case_sensitive = match prop.values.get(2) {
                            None => false,
                            Some(value) => match get_boolean(value) {
                                Some(b) => b,
                                None => {
                                    invalid(
                                        compiler,
                                        prop,
                                        "gpu_device_rule case sensitivity must be a boolean",
                                    );
                                    continue;
                                }
                            },
                        };
                        technique.add_device_rule(GpuDeviceRule {
                            pattern,
                            include,
                            case_sensitive,
                        });
                    }
                    _ => unexpected_property(compiler, prop),
                },
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::Technique),
                        Parent::Technique(&mut technique),
                    );
                }
                _ => {}
            }
        }

        material.techniques.push(technique);
    }
}

/// `include|exclude name` shared by the vendor and device rules.
fn rule_header(
    compiler: &mut ScriptCompiler,
    prop: &PropertyNode,
    max: usize,
) -> Option<(bool, String)> {
    if !check_arity(compiler, prop, CompileErrorCode::StringExpected, max) {
        return None;
    }
    if prop.values.len() < 2 {
        compiler.add_error(
            CompileErrorCode::StringExpected,
            &prop.file,
            prop.line,
            format!("{} must have at least 2 arguments", prop.name),
        );
        return None;
    }
    let include = match prop.values[0].id() {
        Some(Keyword::Include) => true,
        Some(Keyword::Exclude) => false,
        _ => {
            invalid(
                compiler,
                prop,
                format!("{} must be \"include\" or \"exclude\"", prop.values[0].value()),
            );
            return None;
        }
    };
    let Some(name) = get_string(&prop.values[1]) else {
        invalid(compiler, prop, format!("{} requires a string argument", prop.name));
        return None;
    };
    Some((include, name))
}
