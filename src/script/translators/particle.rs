use super::values::{invalid, single_string};
use super::{Parent, Translator, misplaced, require_name, type_value};
use crate::data_structures::particle::{ParticleAffector, ParticleEmitter, ParticleSystem};
use crate::resources::ResourceKind;
use crate::script::ast::{AbstractNode, ObjectNode, PropertyNode};
use crate::script::compiler::ScriptCompiler;
use crate::script::error::CompileErrorCode;
use crate::script::keywords::Keyword;

/// Attribute values are handed over as the script text joined by spaces.
fn joined_values(prop: &PropertyNode) -> String {
    prop.values.iter().map(AbstractNode::value).collect::<Vec<_>>().join(" ")
}

/// `particle_system name { ... }` at the top level.
pub struct ParticleSystemTranslator;

impl Translator for ParticleSystemTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::ParticleSystem) && parent.is_none()
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, _parent: Parent<'_>) {
        if !require_name(compiler, obj) {
            return;
        }
        let Some(name) = compiler.create_object(ResourceKind::ParticleSystem, obj, &obj.name) else {
            return;
        };
        if compiler.resources().has_particle_system(&name) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                format!("particle system {name} already exists"),
            );
            return;
        }

        let mut system = ParticleSystem::new(&name, compiler.group());
        system.origin = obj.file.clone();

        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) if prop.id == Some(Keyword::Material) => {
                    if let Some(material) = single_string(compiler, prop) {
                        system.material_name =
                            compiler.process_resource_name(ResourceKind::Material, &material);
                    }
                }
                AbstractNode::Property(prop) => {
                    if let Err(e) = system.set_parameter(&prop.name, &joined_values(prop)) {
                        invalid(compiler, prop, e.to_string());
                    }
                }
                AbstractNode::Object(_) => {
                    compiler.process_node(
                        child,
                        Some(Keyword::ParticleSystem),
                        Parent::ParticleSystem(&mut system),
                    );
                }
                _ => {}
            }
        }

        log::debug!(
            "compiled particle system {} with {} emitter(s) and {} affector(s)",
            system.name,
            system.emitters.len(),
            system.affectors.len()
        );
        if let Err(e) = compiler.resources_mut().add_particle_system(system) {
            compiler.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                e.to_string(),
            );
        }
    }
}

/// `emitter Type { ... }` inside a particle system.
pub struct ParticleEmitterTranslator;

impl Translator for ParticleEmitterTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Emitter) && parent == Some(Keyword::ParticleSystem)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::ParticleSystem(system) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let Some(kind) = type_value(obj) else {
            compiler.add_error(
                CompileErrorCode::StringExpected,
                &obj.file,
                obj.line,
                "emitter requires a type",
            );
            return;
        };
        let mut emitter = ParticleEmitter::new(&kind);
        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => {
                    if !emitter.set_parameter(&prop.name, &joined_values(prop)) {
                        invalid(
                            compiler,
                            prop,
                            format!("{kind} emitter has no attribute {}", prop.name),
                        );
                    }
                }
                AbstractNode::Object(child_obj) => misplaced(compiler, child_obj),
                _ => {}
            }
        }
        system.emitters.push(emitter);
    }
}

/// `affector Type { ... }` inside a particle system.
pub struct ParticleAffectorTranslator;

impl Translator for ParticleAffectorTranslator {
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool {
        node.id == Some(Keyword::Affector) && parent == Some(Keyword::ParticleSystem)
    }

    fn translate(&self, compiler: &mut ScriptCompiler, obj: &ObjectNode, parent: Parent<'_>) {
        let Parent::ParticleSystem(system) = parent else {
            misplaced(compiler, obj);
            return;
        };
        let Some(kind) = type_value(obj) else {
            compiler.add_error(
                CompileErrorCode::StringExpected,
                &obj.file,
                obj.line,
                "affector requires a type",
            );
            return;
        };
        let mut affector = ParticleAffector::new(&kind);
        for child in &obj.children {
            match child {
                AbstractNode::Property(prop) => {
                    affector.set_parameter(&prop.name, &joined_values(prop))
                }
                AbstractNode::Object(child_obj) => misplaced(compiler, child_obj),
                _ => {}
            }
        }
        system.affectors.push(affector);
    }
}
