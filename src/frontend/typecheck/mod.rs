//! Type model, registry, and inference
//!
//! The structural type system of the pseudocode core: type descriptors
//! ([`types`]), the two-layer symbol table ([`registry`]), constant
//! evaluation for enumeration codes ([`const_eval`]), and bottom-up
//! expression type inference ([`infer`]).

pub mod const_eval;
pub mod infer;
pub mod registry;
pub mod types;


pub use infer::infer_type;
pub use registry::{
    standard_type, standard_type_for, RegistryEntry, SharedRegistry, TypeOrigin, TypeRegistry,
};
pub use types::{PrimValue, Type, TypeKind};

use crate::frontend::core::lexer::{TokenKind, TokenList};
use std::sync::Arc;

/// Resolves a dotted/indexed access path (e.g. `rec.sub[2].` or
/// `rec.sub.pre`) against the registry and returns the record component
/// names available at the end of the path. Used by GUI-side
/// autocompletion; a final partial segment is not descended into.
/// Returns an empty list when the path does not lead to a record.
pub fn component_names_along_path(path: &str, registry: &TypeRegistry) -> Vec<String> {
    let tokens = TokenList::from_text(path);
    if tokens.is_blank() || tokens.get(0).kind != TokenKind::Name {
        return Vec::new();
    }
    let mut ty: Arc<Type> = match registry.get_type_for(tokens.text_at(0)) {
        Some(ty) => ty,
        None => return Vec::new(),
    };
    let mut i = 1;
    while i < tokens.size() {
        match tokens.text_at(i) {
            "[" => {
                // Skip the index expression(s) up to the matching bracket
                let mut depth = 1;
                i += 1;
                while i < tokens.size() && depth > 0 {
                    match tokens.text_at(i) {
                        "[" => depth += 1,
                        "]" => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                if depth > 0 {
                    // Unclosed index: treat like a trailing partial segment
                    break;
                }
                ty = match ty.element_type() {
                    Some(element) => element,
                    None => return Vec::new(),
                };
            }
            "." => {
                if i + 2 >= tokens.size() {
                    // Trailing dot or final (possibly partial) component:
                    // complete against the current record
                    break;
                }
                let component = tokens.text_at(i + 1);
                ty = match ty.component_type(component) {
                    Some(comp_ty) => comp_ty,
                    None => return Vec::new(),
                };
                i += 2;
            }
            _ => break,
        }
    }
    ty.component_names()
}
