//! Translators turn resolved script objects into engine objects.
//!
//! The compiler asks the [`TranslatorRegistry`] which [`Translator`] is
//! responsible for an object, keyed by the object's keyword and the keyword
//! of the object it is nested in. The translator reads the object's
//! properties, reports problems through the compiler and dispatches nested
//! objects back through [`ScriptCompiler::process_node`].
//!
//! # Built-in translators
//! - [`material`]: `material`, plus [`technique`], [`pass`] and [`texture_unit`] below it
//! - [`gpu_program`]: program declarations and the parameter blocks of program references
//! - [`shared_params`]: `shared_params` blocks
//! - [`compositor`]: compositors, their techniques, target passes and passes
//! - [`particle`]: particle systems, emitters and affectors

pub mod compositor;
pub mod gpu_program;
pub mod material;
pub mod particle;
pub mod pass;
pub mod shared_params;
pub mod technique;
pub mod texture_unit;
pub mod values;

use std::rc::Rc;

use super::ast::ObjectNode;
use super::compiler::ScriptCompiler;
use super::error::CompileErrorCode;
use super::keywords::Keyword;
use crate::data_structures::{
    compositor::{CompositionTargetPass, CompositionTechnique, Compositor},
    material::{Material, Pass, Technique},
    particle::ParticleSystem,
    texture_unit::TextureUnitState,
};

/// The object a nested translator populates.
pub enum Parent<'a> {
    None,
    Material(&'a mut Material),
    Technique(&'a mut Technique),
    Pass(&'a mut Pass),
    TextureUnit(&'a mut TextureUnitState),
    Compositor(&'a mut Compositor),
    CompositionTechnique(&'a mut CompositionTechnique),
    CompositionTargetPass(&'a mut CompositionTargetPass),
    ParticleSystem(&'a mut ParticleSystem),
}

pub trait Translator {
    /// Whether this translator handles `node` when nested in an object with
    /// keyword `parent` (`None` at the top level).
    fn check_for(&self, node: &ObjectNode, parent: Option<Keyword>) -> bool;

    fn translate(&self, compiler: &mut ScriptCompiler, node: &ObjectNode, parent: Parent<'_>);
}

#[derive(Clone)]
pub struct TranslatorRegistry {
    translators: Vec<Rc<dyn Translator>>,
}

impl TranslatorRegistry {
    /// A registry holding the built-in translators.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Rc::new(material::MaterialTranslator));
        registry.register(Rc::new(technique::TechniqueTranslator));
        registry.register(Rc::new(pass::PassTranslator));
        registry.register(Rc::new(texture_unit::TextureUnitTranslator));
        registry.register(Rc::new(texture_unit::TextureSourceTranslator));
        registry.register(Rc::new(gpu_program::GpuProgramTranslator));
        registry.register(Rc::new(shared_params::SharedParametersTranslator));
        registry.register(Rc::new(particle::ParticleSystemTranslator));
        registry.register(Rc::new(particle::ParticleEmitterTranslator));
        registry.register(Rc::new(particle::ParticleAffectorTranslator));
        registry.register(Rc::new(compositor::CompositorTranslator));
        registry.register(Rc::new(compositor::CompositionTechniqueTranslator));
        registry.register(Rc::new(compositor::CompositionTargetPassTranslator));
        registry.register(Rc::new(compositor::CompositionPassTranslator));
        registry
    }

    pub fn empty() -> Self {
        Self {
            translators: Vec::new(),
        }
    }

    pub fn register(&mut self, translator: Rc<dyn Translator>) {
        self.translators.push(translator);
    }

    /// The most recently registered translator accepting `node`.
    pub fn find(&self, node: &ObjectNode, parent: Option<Keyword>) -> Option<Rc<dyn Translator>> {
        self.translators
            .iter()
            .rev()
            .find(|t| t.check_for(node, parent))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports an object that ended up under a parent of the wrong kind, such as
/// a compositor `target` inside a material technique.
pub(crate) fn misplaced(compiler: &mut ScriptCompiler, node: &ObjectNode) {
    compiler.add_error(
        CompileErrorCode::UnexpectedToken,
        &node.file,
        node.line,
        format!("token \"{}\" is not recognized", node.cls),
    );
}

/// `emitter Point { }` style type names: the first header value, or the
/// object name when there are no values.
pub(crate) fn type_value(node: &ObjectNode) -> Option<String> {
    match node.values.first() {
        Some(value) => values::get_string(value),
        None => (!node.name.is_empty()).then(|| node.name.clone()),
    }
}

pub(crate) fn require_name(compiler: &mut ScriptCompiler, node: &ObjectNode) -> bool {
    if node.name.is_empty() {
        compiler.add_error(
            CompileErrorCode::ObjectNameExpected,
            &node.file,
            node.line,
            format!("{} must be given a name", node.cls),
        );
        return false;
    }
    true
}
