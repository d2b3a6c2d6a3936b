//! Abstract syntax tree handed to the compiler.
//!
//! A front-end (or a test) builds these nodes, usually through the `with_*`
//! builders. Every node remembers the file and line it came from so that
//! compile errors can point back at the script.

use std::collections::HashMap;

use super::keywords::Keyword;
use crate::math::Real;

#[derive(Clone, Debug, PartialEq)]
pub enum AbstractNode {
    Object(ObjectNode),
    Property(PropertyNode),
    Atom(AtomNode),
    Import(ImportNode),
    VariableAccess(VariableAccessNode),
}

impl AbstractNode {
    pub fn file(&self) -> &str {
        match self {
            AbstractNode::Object(n) => &n.file,
            AbstractNode::Property(n) => &n.file,
            AbstractNode::Atom(n) => &n.file,
            AbstractNode::Import(n) => &n.file,
            AbstractNode::VariableAccess(n) => &n.file,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            AbstractNode::Object(n) => n.line,
            AbstractNode::Property(n) => n.line,
            AbstractNode::Atom(n) => n.line,
            AbstractNode::Import(n) => n.line,
            AbstractNode::VariableAccess(n) => n.line,
        }
    }

    /// The token to print when talking about this node.
    pub fn value(&self) -> &str {
        match self {
            AbstractNode::Object(n) => &n.cls,
            AbstractNode::Property(n) => &n.name,
            AbstractNode::Atom(n) => &n.value,
            AbstractNode::Import(n) => &n.target,
            AbstractNode::VariableAccess(n) => &n.name,
        }
    }

    /// Keyword assigned by the compiler. Imports and variable accesses never
    /// have one.
    pub fn id(&self) -> Option<Keyword> {
        match self {
            AbstractNode::Object(n) => n.id,
            AbstractNode::Property(n) => n.id,
            AbstractNode::Atom(n) => n.id,
            AbstractNode::Import(_) | AbstractNode::VariableAccess(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            AbstractNode::Object(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&AtomNode> {
        match self {
            AbstractNode::Atom(n) => Some(n),
            _ => None,
        }
    }
}

/// `cls name [values] : bases { children }`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectNode {
    pub file: String,
    pub line: u32,
    pub cls: String,
    pub name: String,
    /// Header values after the name, such as the language of a program.
    pub values: Vec<AbstractNode>,
    pub bases: Vec<String>,
    pub is_abstract: bool,
    pub children: Vec<AbstractNode>,
    /// Non-object children inherited from a base, merged into `children`
    /// once inheritance is resolved.
    pub overrides: Vec<AbstractNode>,
    pub variables: HashMap<String, Vec<AbstractNode>>,
    pub id: Option<Keyword>,
}

impl ObjectNode {
    pub fn new(cls: &str, name: &str) -> Self {
        Self {
            cls: cls.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn at(mut self, file: &str, line: u32) -> Self {
        self.file = file.to_string();
        self.line = line;
        self
    }

    pub fn with_value(mut self, value: impl Into<AbstractNode>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.bases.push(base.to_string());
        self
    }

    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_child(mut self, child: impl Into<AbstractNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Defines `$name` for this object and everything nested in it.
    pub fn with_variable(mut self, name: &str, value: Vec<AbstractNode>) -> Self {
        self.variables.insert(variable_name(name), value);
        self
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectNode> {
        self.children.iter().filter_map(AbstractNode::as_object)
    }
}

/// `name values...` inside an object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyNode {
    pub file: String,
    pub line: u32,
    pub name: String,
    pub values: Vec<AbstractNode>,
    pub id: Option<Keyword>,
}

impl PropertyNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn at(mut self, file: &str, line: u32) -> Self {
        self.file = file.to_string();
        self.line = line;
        self
    }

    pub fn with_value(mut self, value: impl Into<AbstractNode>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Adds one atom per whitespace separated word.
    pub fn with_atoms(mut self, words: &str) -> Self {
        self.values
            .extend(words.split_whitespace().map(|w| AtomNode::new(w).into()));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomNode {
    pub file: String,
    pub line: u32,
    pub value: String,
    pub id: Option<Keyword>,
}

impl AtomNode {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Default::default()
        }
    }

    pub fn is_number(&self) -> bool {
        self.number().is_some()
    }

    pub fn number(&self) -> Option<Real> {
        self.value.trim().parse::<Real>().ok().filter(|v| v.is_finite())
    }
}

/// `import target from source`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportNode {
    pub file: String,
    pub line: u32,
    /// Object name to import, or `*` for everything.
    pub target: String,
    pub source: String,
}

impl ImportNode {
    pub fn new(target: &str, source: &str) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableAccessNode {
    pub file: String,
    pub line: u32,
    /// Includes the leading `$`.
    pub name: String,
}

impl VariableAccessNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: variable_name(name),
            ..Default::default()
        }
    }
}

/// Variable names are stored with their `$` prefix.
pub(crate) fn variable_name(name: &str) -> String {
    if name.starts_with('$') {
        name.to_string()
    } else {
        format!("${name}")
    }
}

impl From<ObjectNode> for AbstractNode {
    fn from(node: ObjectNode) -> Self {
        AbstractNode::Object(node)
    }
}

impl From<PropertyNode> for AbstractNode {
    fn from(node: PropertyNode) -> Self {
        AbstractNode::Property(node)
    }
}

impl From<AtomNode> for AbstractNode {
    fn from(node: AtomNode) -> Self {
        AbstractNode::Atom(node)
    }
}

impl From<ImportNode> for AbstractNode {
    fn from(node: ImportNode) -> Self {
        AbstractNode::Import(node)
    }
}

impl From<VariableAccessNode> for AbstractNode {
    fn from(node: VariableAccessNode) -> Self {
        AbstractNode::VariableAccess(node)
    }
}

impl From<&str> for AbstractNode {
    fn from(value: &str) -> Self {
        AbstractNode::Atom(AtomNode::new(value))
    }
}
