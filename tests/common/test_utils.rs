use std::{cell::RefCell, collections::HashMap, rc::Rc};

use flow_script::{
    AbstractNode, CompileError, CompileErrorCode, ObjectNode, PropertyNode, RenderCapabilities,
    Resources, ScriptCompiler, ScriptCompilerEvent, ScriptCompilerListener,
};

pub const FILE: &str = "test.material";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn obj(cls: &str, name: &str) -> ObjectNode {
    ObjectNode::new(cls, name).at(FILE, 1)
}

/// `name a b c` with one atom per word.
pub fn prop(name: &str, atoms: &str) -> PropertyNode {
    PropertyNode::new(name).at(FILE, 2).with_atoms(atoms)
}

pub fn compiler() -> ScriptCompiler {
    init_logging();
    ScriptCompiler::new(Resources::new(RenderCapabilities::default()))
}

/// A compiler that only runs glsl and the arbvp1/arbfp1 assembler syntaxes.
pub fn limited_compiler() -> ScriptCompiler {
    init_logging();
    ScriptCompiler::new(Resources::new(RenderCapabilities::new(
        ["arbvp1", "arbfp1"],
        ["glsl"],
    )))
}

pub fn codes(compiler: &ScriptCompiler) -> Vec<CompileErrorCode> {
    compiler.errors().iter().map(|e| e.code).collect()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[macro_export]
macro_rules! assert_approx {
    ($a:expr, $b:expr) => {{
        let (a, b): (f32, f32) = ($a, $b);
        assert!((a - b).abs() < 1e-4, "{} is not approximately {}", a, b);
    }};
}

/// What a [`RecordingListener`] saw during a compile.
#[derive(Default)]
pub struct Recorded {
    pub errors: Vec<CompileError>,
    pub events: Vec<ScriptCompilerEvent>,
    pub imports: Vec<String>,
    pub post_conversion: Option<Vec<AbstractNode>>,
}

/// Records everything and answers imports, renames and vetoes from its
/// tables. The log is shared so tests can inspect it after the listener
/// moved into the compiler.
#[derive(Default)]
pub struct RecordingListener {
    pub log: Rc<RefCell<Recorded>>,
    pub scripts: HashMap<String, Vec<AbstractNode>>,
    pub renames: HashMap<String, String>,
    pub vetoed: Vec<String>,
    pub aliases: HashMap<String, String>,
    pub handle_errors: bool,
    pub skip_translation: bool,
}

impl RecordingListener {
    pub fn new() -> (Self, Rc<RefCell<Recorded>>) {
        let listener = Self::default();
        let log = Rc::clone(&listener.log);
        (listener, log)
    }
}

impl ScriptCompilerListener for RecordingListener {
    fn import_file(&mut self, name: &str, _group: &str) -> Option<Vec<AbstractNode>> {
        self.log.borrow_mut().imports.push(name.to_string());
        self.scripts.get(name).cloned()
    }

    fn post_conversion(&mut self, nodes: &[AbstractNode]) -> bool {
        self.log.borrow_mut().post_conversion = Some(nodes.to_vec());
        !self.skip_translation
    }

    fn handle_error(&mut self, error: &CompileError) -> bool {
        self.log.borrow_mut().errors.push(error.clone());
        self.handle_errors
    }

    fn handle_event(&mut self, event: &mut ScriptCompilerEvent) -> bool {
        let mut vetoed = false;
        match event {
            ScriptCompilerEvent::ProcessResourceName { name, .. } => {
                if let Some(renamed) = self.renames.get(name) {
                    *name = renamed.clone();
                }
            }
            ScriptCompilerEvent::CreateObject { name, .. } => {
                vetoed = self.vetoed.contains(name);
                if let Some(renamed) = self.renames.get(name) {
                    *name = renamed.clone();
                }
            }
            ScriptCompilerEvent::PreApplyTextureAliases { aliases, .. } => {
                for (alias, texture) in &self.aliases {
                    aliases.insert(alias.clone(), texture.clone());
                }
            }
        }
        self.log.borrow_mut().events.push(event.clone());
        vetoed
    }
}
