//! The script compiler front-end.
//!
//! [`ScriptCompiler::compile`] takes an already parsed tree and runs it
//! through the phases below before handing top-level objects to their
//! translators:
//!
//! 1. imports are loaded through the listener and collected in an import table
//! 2. objects inherit from their bases (`material a : b`)
//! 3. `$variable` accesses are expanded
//! 4. keywords are assigned to objects, properties and atoms
//!
//! Errors never stop compilation. They are collected and can be inspected
//! with [`ScriptCompiler::errors`] afterwards.

use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use super::ast::{AbstractNode, ObjectNode, variable_name};
use super::error::{CompileError, CompileErrorCode};
use super::keywords::Keyword;
use super::listener::{ScriptCompilerEvent, ScriptCompilerListener};
use super::translators::{Parent, Translator, TranslatorRegistry};
use crate::resources::{ResourceKind, Resources};

/// Toggles for the front-end phases.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerOptions {
    pub process_imports: bool,
    pub process_objects: bool,
    pub process_variables: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            process_imports: true,
            process_objects: true,
            process_variables: true,
        }
    }
}

/// Variables visible from inside an object, innermost first.
struct Scope<'a> {
    variables: &'a HashMap<String, Vec<AbstractNode>>,
    parent: Option<&'a Scope<'a>>,
}

impl Scope<'_> {
    fn lookup(&self, name: &str) -> Option<&Vec<AbstractNode>> {
        self.variables
            .get(name)
            .or_else(|| self.parent.and_then(|p| p.lookup(name)))
    }
}

pub struct ScriptCompiler {
    pub options: CompilerOptions,
    resources: Resources,
    listener: Option<Box<dyn ScriptCompilerListener>>,
    translators: Rc<TranslatorRegistry>,
    errors: Vec<CompileError>,
    group: String,
    environment: HashMap<String, Vec<AbstractNode>>,
    imports: HashMap<String, Vec<AbstractNode>>,
    /// Requested object names per import source, in request order.
    import_requests: Vec<(String, String)>,
    import_table: Vec<AbstractNode>,
}

impl ScriptCompiler {
    pub fn new(resources: Resources) -> Self {
        Self {
            options: CompilerOptions::default(),
            resources,
            listener: None,
            translators: Rc::new(TranslatorRegistry::new()),
            errors: Vec::new(),
            group: String::new(),
            environment: HashMap::new(),
            imports: HashMap::new(),
            import_requests: Vec::new(),
            import_table: Vec::new(),
        }
    }

    pub fn set_listener(&mut self, listener: impl ScriptCompilerListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn remove_listener(&mut self) -> Option<Box<dyn ScriptCompilerListener>> {
        self.listener.take()
    }

    /// Later registrations win over the built-in translators.
    pub fn register_translator(&mut self, translator: impl Translator + 'static) {
        Rc::make_mut(&mut self.translators).register(Rc::new(translator));
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn into_resources(self) -> Resources {
        self.resources
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    /// Resource group of the compilation in progress.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Defines a global variable. Object scopes shadow it. Globals survive
    /// across `compile` calls.
    pub fn define_variable(&mut self, name: &str, value: Vec<AbstractNode>) {
        self.environment.insert(variable_name(name), value);
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Vec<AbstractNode>> {
        self.environment.remove(&variable_name(name))
    }

    /// Compiles a tree into `group`. Returns `true` when no error was
    /// reported.
    pub fn compile(&mut self, mut nodes: Vec<AbstractNode>, group: &str) -> bool {
        self.errors.clear();
        self.group = group.to_string();

        if self.options.process_imports {
            self.process_imports(&mut nodes);
        }
        if self.options.process_objects {
            self.process_objects(&mut nodes);
        }
        if self.options.process_variables {
            let mut expanding = Vec::new();
            self.process_variables(&mut nodes, None, &mut expanding);
        }
        assign_keywords(&mut nodes);

        let proceed = match self.listener.as_mut() {
            Some(listener) => listener.post_conversion(&nodes),
            None => true,
        };
        if proceed {
            let registry = Rc::clone(&self.translators);
            for node in &nodes {
                let AbstractNode::Object(obj) = node else {
                    continue;
                };
                if obj.is_abstract {
                    continue;
                }
                match registry.find(obj, None) {
                    Some(translator) => translator.translate(self, obj, Parent::None),
                    None => log::warn!(
                        "skipping unrecognised top-level object {} {} in {}({})",
                        obj.cls,
                        obj.name,
                        obj.file,
                        obj.line
                    ),
                }
            }
        }

        self.imports.clear();
        self.import_requests.clear();
        self.import_table.clear();
        self.errors.is_empty()
    }

    /// Records an error unless the listener handles it, in which case it is
    /// still recorded but not logged.
    pub fn add_error(
        &mut self,
        code: CompileErrorCode,
        file: &str,
        line: u32,
        message: impl Into<String>,
    ) {
        let error = CompileError {
            code,
            file: file.to_string(),
            line,
            message: message.into(),
        };
        let handled = match self.listener.as_mut() {
            Some(listener) => listener.handle_error(&error),
            None => false,
        };
        if !handled {
            log::error!("{}", error);
        }
        self.errors.push(error);
    }

    /// Fires an event. Returns what the listener returned, `false` without
    /// a listener.
    pub fn fire_event(&mut self, event: &mut ScriptCompilerEvent) -> bool {
        match self.listener.as_mut() {
            Some(listener) => listener.handle_event(event),
            None => false,
        }
    }

    /// Lets the listener redirect a resource reference.
    pub fn process_resource_name(&mut self, kind: ResourceKind, name: &str) -> String {
        let mut event = ScriptCompilerEvent::ProcessResourceName {
            kind,
            name: name.to_string(),
        };
        self.fire_event(&mut event);
        match event {
            ScriptCompilerEvent::ProcessResourceName { name, .. } => name,
            _ => name.to_string(),
        }
    }

    /// Announces a new resource. Returns the name to create it under, or
    /// `None` after reporting an allocation error when the listener vetoed it.
    pub fn create_object(
        &mut self,
        kind: ResourceKind,
        obj: &ObjectNode,
        name: &str,
    ) -> Option<String> {
        let mut event = ScriptCompilerEvent::CreateObject {
            kind,
            file: obj.file.clone(),
            name: name.to_string(),
            group: self.group.clone(),
        };
        let vetoed = self.fire_event(&mut event);
        if vetoed {
            self.add_error(
                CompileErrorCode::ObjectAllocationError,
                &obj.file,
                obj.line,
                format!("failed to create {name}"),
            );
            return None;
        }
        match event {
            ScriptCompilerEvent::CreateObject { name, .. } => Some(name),
            _ => Some(name.to_string()),
        }
    }

    /// Dispatches a child object to the translator responsible for it.
    pub fn process_node(
        &mut self,
        node: &AbstractNode,
        parent_keyword: Option<Keyword>,
        parent: Parent<'_>,
    ) {
        let AbstractNode::Object(obj) = node else {
            return;
        };
        if obj.is_abstract {
            return;
        }
        let registry = Rc::clone(&self.translators);
        match registry.find(obj, parent_keyword) {
            Some(translator) => translator.translate(self, obj, parent),
            None => self.add_error(
                CompileErrorCode::UnexpectedToken,
                &obj.file,
                obj.line,
                format!("token \"{}\" is not recognized", obj.cls),
            ),
        }
    }

    fn process_imports(&mut self, nodes: &mut Vec<AbstractNode>) {
        let mut i = 0;
        while i < nodes.len() {
            let AbstractNode::Import(import) = &nodes[i] else {
                i += 1;
                continue;
            };
            let import = import.clone();
            nodes.remove(i);

            if !self.imports.contains_key(&import.source) {
                // placeholder so that scripts importing each other terminate
                self.imports.insert(import.source.clone(), Vec::new());
                let group = self.group.clone();
                let loaded = match self.listener.as_mut() {
                    Some(listener) => listener.import_file(&import.source, &group),
                    None => None,
                };
                match loaded {
                    Some(mut imported) => {
                        self.process_imports(&mut imported);
                        self.process_objects(&mut imported);
                        self.imports.insert(import.source.clone(), imported);
                    }
                    None => log::warn!(
                        "could not import {} from {} in {}({})",
                        import.target,
                        import.source,
                        import.file,
                        import.line
                    ),
                }
            }

            if import.target == "*" {
                self.import_requests.retain(|(source, _)| source != &import.source);
                self.import_requests
                    .push((import.source.clone(), import.target.clone()));
            } else if !self
                .import_requests
                .iter()
                .any(|(source, target)| source == &import.source && target == "*")
            {
                self.import_requests.push((import.source, import.target));
            }
        }
        self.rebuild_import_table();
    }

    fn rebuild_import_table(&mut self) {
        self.import_table.clear();
        for (source, target) in &self.import_requests {
            let Some(imported) = self.imports.get(source) else {
                continue;
            };
            if target == "*" {
                self.import_table.splice(0..0, imported.iter().cloned());
            } else if let Some(obj) = locate_target(imported, target) {
                self.import_table.insert(0, AbstractNode::Object(obj.clone()));
            }
        }
    }

    fn process_objects(&mut self, nodes: &mut Vec<AbstractNode>) {
        for i in 0..nodes.len() {
            if !matches!(nodes[i], AbstractNode::Object(_)) {
                continue;
            }
            // taken out while it is rewritten, `nodes` stays searchable for bases
            let mut node = std::mem::replace(&mut nodes[i], AbstractNode::from(""));
            if let AbstractNode::Object(obj) = &mut node {
                self.process_object(obj, nodes);
            }
            nodes[i] = node;
        }
    }

    fn process_object(&mut self, obj: &mut ObjectNode, top: &[AbstractNode]) {
        for base in obj.bases.clone() {
            let found = locate_target(top, &base)
                .or_else(|| locate_target(&self.import_table, &base))
                .cloned();
            match found {
                Some(src) => self.overlay_object(&src, obj),
                None => self.add_error(
                    CompileErrorCode::ObjectBaseNotFound,
                    &obj.file,
                    obj.line,
                    base,
                ),
            }
        }

        for child in obj.children.iter_mut() {
            if let AbstractNode::Object(child) = child {
                self.process_object(child, top);
            }
        }

        let overrides = std::mem::take(&mut obj.overrides);
        obj.children.splice(0..0, overrides);
    }

    /// Copies `src` into `dest` as its base. Object children are paired by
    /// class and name (or wildcard), then by position among unnamed
    /// children. Paired children inherit recursively, the rest are copied.
    fn overlay_object(&mut self, src: &ObjectNode, dest: &mut ObjectNode) {
        for (name, value) in &src.variables {
            if !dest.variables.contains_key(name) {
                dest.variables.insert(name.clone(), value.clone());
            }
        }

        let mut base_objects = Vec::new();
        for child in &src.children {
            match child {
                AbstractNode::Object(obj) => base_objects.push(obj),
                other => dest.overrides.push(other.clone()),
            }
        }
        let mut paired: Vec<Option<usize>> = vec![None; base_objects.len()];

        struct Tracking {
            min_index: usize,
            overridden: bool,
        }

        // name matching, wildcards expand into one copy per match
        let old_children = std::mem::take(&mut dest.children);
        let mut children = Vec::with_capacity(old_children.len());
        let mut tracking: Vec<Option<Tracking>> = Vec::with_capacity(old_children.len());
        let mut max_override = 0;
        for child in old_children {
            let AbstractNode::Object(node) = child else {
                children.push(child);
                tracking.push(None);
                continue;
            };

            let wildcard = (!node.name.is_empty() && node.name.contains('*'))
                .then(|| wildcard_regex(&node.name))
                .flatten();
            if let Some(pattern) = wildcard {
                for (j, base) in base_objects.iter().enumerate() {
                    if base.cls != node.cls || !pattern.is_match(&base.name) {
                        continue;
                    }
                    if paired[j].is_some() {
                        self.add_error(
                            CompileErrorCode::DuplicateOverride,
                            &node.file,
                            node.line,
                            &node.name,
                        );
                        continue;
                    }
                    let mut copy = node.clone();
                    copy.name = base.name.clone();
                    paired[j] = Some(children.len());
                    max_override = max_override.max(j);
                    children.push(AbstractNode::Object(copy));
                    tracking.push(Some(Tracking {
                        min_index: max_override,
                        overridden: true,
                    }));
                }
                continue;
            }

            let mut entry = Tracking {
                min_index: max_override,
                overridden: false,
            };
            if !node.name.is_empty() {
                let matched = base_objects
                    .iter()
                    .position(|base| base.cls == node.cls && base.name == node.name);
                if let Some(j) = matched {
                    if paired[j].is_some() {
                        self.add_error(
                            CompileErrorCode::DuplicateOverride,
                            &node.file,
                            node.line,
                            &node.name,
                        );
                    } else {
                        paired[j] = Some(children.len());
                        max_override = max_override.max(j);
                        entry = Tracking {
                            min_index: max_override,
                            overridden: true,
                        };
                    }
                }
            }
            children.push(AbstractNode::Object(node));
            tracking.push(Some(entry));
        }

        // position matching for the rest
        for (index, child) in children.iter().enumerate() {
            let (AbstractNode::Object(node), Some(entry)) = (child, &tracking[index]) else {
                continue;
            };
            if entry.overridden {
                continue;
            }
            let candidate = (entry.min_index..base_objects.len()).find(|&j| {
                base_objects[j].name.is_empty()
                    && base_objects[j].cls == node.cls
                    && paired[j].is_none()
            });
            if let Some(j) = candidate {
                paired[j] = Some(index);
            }
        }

        let mut insert_pos = 0;
        for (j, base) in base_objects.iter().enumerate() {
            match paired[j] {
                Some(index) => {
                    if let AbstractNode::Object(target) = &mut children[index] {
                        self.overlay_object(base, target);
                    }
                    insert_pos = index + 1;
                }
                None => {
                    let at = insert_pos.min(children.len());
                    children.insert(at, AbstractNode::Object((*base).clone()));
                    for slot in paired.iter_mut().flatten() {
                        if *slot >= at {
                            *slot += 1;
                        }
                    }
                    insert_pos = at + 1;
                }
            }
        }
        dest.children = children;
    }

    fn process_variables(
        &mut self,
        nodes: &mut Vec<AbstractNode>,
        scope: Option<&Scope<'_>>,
        expanding: &mut Vec<String>,
    ) {
        let mut i = 0;
        while i < nodes.len() {
            let (name, file, line) = match &mut nodes[i] {
                AbstractNode::Object(obj) => {
                    if !obj.is_abstract {
                        let ObjectNode {
                            variables,
                            children,
                            values,
                            ..
                        } = obj;
                        let inner = Scope {
                            variables: &*variables,
                            parent: scope,
                        };
                        self.process_variables(children, Some(&inner), expanding);
                        self.process_variables(values, Some(&inner), expanding);
                    }
                    i += 1;
                    continue;
                }
                AbstractNode::Property(prop) => {
                    self.process_variables(&mut prop.values, scope, expanding);
                    i += 1;
                    continue;
                }
                AbstractNode::VariableAccess(access) => {
                    (access.name.clone(), access.file.clone(), access.line)
                }
                _ => {
                    i += 1;
                    continue;
                }
            };

            let value = scope
                .and_then(|s| s.lookup(&name))
                .or_else(|| self.environment.get(&name))
                .cloned();
            match value {
                Some(mut expansion) if !expanding.contains(&name) => {
                    expanding.push(name);
                    self.process_variables(&mut expansion, scope, expanding);
                    expanding.pop();
                    let count = expansion.len();
                    nodes.splice(i..=i, expansion);
                    i += count;
                }
                Some(_) => {
                    self.add_error(
                        CompileErrorCode::UndefinedVariable,
                        &file,
                        line,
                        format!("{name} refers to itself"),
                    );
                    nodes.remove(i);
                }
                None => {
                    self.add_error(CompileErrorCode::UndefinedVariable, &file, line, name);
                    nodes.remove(i);
                }
            }
        }
    }
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new(Resources::default())
    }
}

/// The last top-level object called `name`.
fn locate_target<'a>(nodes: &'a [AbstractNode], name: &str) -> Option<&'a ObjectNode> {
    nodes
        .iter()
        .filter_map(AbstractNode::as_object)
        .filter(|obj| obj.name == name)
        .last()
}

/// `*` matches any run of characters, everything else is literal.
fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).ok()
}

fn assign_keywords(nodes: &mut [AbstractNode]) {
    for node in nodes {
        match node {
            AbstractNode::Object(obj) => {
                obj.id = Keyword::from_word(&obj.cls);
                assign_keywords(&mut obj.values);
                assign_keywords(&mut obj.children);
            }
            AbstractNode::Property(prop) => {
                prop.id = Keyword::from_word(&prop.name);
                assign_keywords(&mut prop.values);
            }
            AbstractNode::Atom(atom) => atom.id = Keyword::from_word(&atom.value),
            AbstractNode::Import(_) | AbstractNode::VariableAccess(_) => {}
        }
    }
}
