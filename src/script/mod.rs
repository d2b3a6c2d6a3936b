//! Script compilation: from a parsed script tree to registered resources.
//!
//! - `ast` is the tree the compiler consumes
//! - `keywords` is the vocabulary translators match on
//! - `compiler` resolves imports, inheritance and variables, then dispatches
//! - `translators` turn objects into materials, programs, compositors and particle systems
//! - `listener` lets the embedding application load imports and redirect names
//! - `error` holds the diagnostics collected during a compile

pub mod ast;
pub mod compiler;
pub mod error;
pub mod keywords;
pub mod listener;
pub mod translators;

pub use ast::{AbstractNode, AtomNode, ImportNode, ObjectNode, PropertyNode, VariableAccessNode};
pub use compiler::{CompilerOptions, ScriptCompiler};
pub use error::{CompileError, CompileErrorCode};
pub use keywords::Keyword;
pub use listener::{ScriptCompilerEvent, ScriptCompilerListener};
pub use translators::{Parent, Translator, TranslatorRegistry};
