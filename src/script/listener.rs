use std::collections::HashMap;

use super::ast::AbstractNode;
use super::error::CompileError;
use crate::resources::ResourceKind;

/// Notifications the compiler sends while translating. Listeners may edit
/// the payload in place.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptCompilerEvent {
    /// A script refers to a resource by name. Rewriting `name` redirects the
    /// reference.
    ProcessResourceName { kind: ResourceKind, name: String },
    /// A resource is about to be created. Rewriting `name` renames it.
    CreateObject {
        kind: ResourceKind,
        file: String,
        name: String,
        group: String,
    },
    /// Texture aliases declared by a material are about to be applied.
    PreApplyTextureAliases {
        material: String,
        aliases: HashMap<String, String>,
    },
}

/// Hooks into compilation. Every method has a default, so implementors only
/// override what they need.
pub trait ScriptCompilerListener {
    /// Supplies the AST of an imported script. `None` means it could not be
    /// loaded.
    fn import_file(&mut self, _name: &str, _group: &str) -> Option<Vec<AbstractNode>> {
        None
    }

    /// Called once the tree is fully resolved. Returning `false` skips
    /// translation.
    fn post_conversion(&mut self, _nodes: &[AbstractNode]) -> bool {
        true
    }

    /// Returning `true` marks the error as handled and keeps it out of the log.
    fn handle_error(&mut self, _error: &CompileError) -> bool {
        false
    }

    /// For [`ScriptCompilerEvent::CreateObject`], returning `true` vetoes the
    /// creation. Other events ignore the result.
    fn handle_event(&mut self, _event: &mut ScriptCompilerEvent) -> bool {
        false
    }
}
