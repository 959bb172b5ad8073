//! Bottom-up type inference over expression trees
//!
//! Walks an expression tree assigning a type to every node using literal
//! shape rules, operator rules, and registry look-ups. Inference never
//! fails: undecidable types degrade to `None` or the dummy sentinel.
//! Results can be cached on the nodes; a node whose type is marked safe
//! (final) is never recomputed, so repeated inference is idempotent.

use super::registry::{standard_type, standard_type_for, TypeRegistry};
use super::types::{Type, TypeKind};
use crate::frontend::core::parser::{Expr, ExprKind, OpArity};
use indexmap::IndexMap;
use std::sync::Arc;

/// Infers the type of `expr` (or `None` if undecidable), consulting and
/// possibly extending `registry`. With `cache` set, inferred types are
/// stored on the nodes and assignment-propagated variable types are
/// registered; without it, neither the tree nor the registry is touched.
pub fn infer_type(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> Option<Arc<Type>> {
    infer_node(expr, registry, cache).0
}

/// Core walk returning the type and whether it is final ("safe").
fn infer_node(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    if expr.ty_is_safe {
        if let Some(ty) = &expr.ty {
            return (Some(ty.clone()), true);
        }
    }
    let (ty, safe) = match expr.kind.clone() {
        ExprKind::Literal => {
            // Decided purely from the textual shape; always final
            (Some(standard_type_for(&expr.text)), true)
        }
        ExprKind::Identifier => {
            // Unresolved identifiers stay unknown and are never cached
            // as final
            (registry.get_type_for(&expr.text), false)
        }
        ExprKind::Operator { arity } => {
            let symbol = expr.text.clone();
            infer_operator(expr, &symbol, arity, registry, cache)
        }
        ExprKind::FunctionCall => {
            // No built-in routine signatures: infer the arguments for
            // their own sake, the call result stays open
            for child in &mut expr.children {
                infer_node(child, registry, cache);
            }
            (None, false)
        }
        ExprKind::ArrayInitializer => infer_array_initializer(expr, registry, cache),
        ExprKind::RecordInitializer => infer_record_initializer(expr, registry, cache),
        ExprKind::Component => match expr.children.first_mut() {
            Some(value) => infer_node(value, registry, cache),
            None => (None, false),
        },
    };
    if cache {
        if let Some(ty) = &ty {
            expr.set_type(ty.clone(), safe);
        }
    }
    (ty, safe)
}

fn infer_operator(
    expr: &mut Expr,
    symbol: &str,
    arity: OpArity,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    if symbol == "." {
        return infer_member_access(expr, registry, cache);
    }
    if symbol == "<-" || symbol == ":=" {
        return infer_assignment(expr, registry, cache);
    }
    if is_boolean_operator(symbol) {
        // Comparison, boolean connective or negation: always boolean,
        // always final
        for child in &mut expr.children {
            infer_node(child, registry, cache);
        }
        return (standard_type("boolean"), true);
    }
    if symbol == "[]" {
        return infer_index_access(expr, registry, cache);
    }
    if arity == OpArity::Unary {
        let (operand, safe) = match expr.children.first_mut() {
            Some(operand) => infer_node(operand, registry, cache),
            None => (None, false),
        };
        return match symbol {
            // Sign keeps the numeric operand type
            "+" | "-" => match operand {
                Some(ty) if ty.is_numeric() => (Some(ty), safe),
                _ => (None, false),
            },
            // Postfix increment/decrement keep the operand type
            "++" | "--" => match operand {
                Some(ty) if ty.is_numeric() => (Some(ty), safe),
                _ => (None, false),
            },
            // Dereference and address-of have no pointer types to
            // resolve to
            _ => (None, false),
        };
    }
    infer_arithmetic(expr, symbol, registry, cache)
}

/// `left.component`: the left operand must be a record; the result is the
/// named component's type. The left operand's safety propagates only if
/// the component type is itself named.
fn infer_member_access(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    let (record_ty, record_safe) = match expr.children.first_mut() {
        Some(record) => infer_node(record, registry, cache),
        None => return (None, false),
    };
    let component = match expr.children.get(1) {
        Some(child) => child.text.clone(),
        None => return (None, false),
    };
    match record_ty.and_then(|ty| ty.component_type(&component)) {
        Some(comp_ty) => {
            let safe = record_safe && !comp_ty.is_anonymous();
            (Some(comp_ty), safe)
        }
        None => (None, false),
    }
}

/// `target <- value`: the right-hand side is inferred first; a left-hand
/// identifier without a prior type adopts it (and is registered when
/// caching).
fn infer_assignment(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    if expr.children.len() < 2 {
        return (None, false);
    }
    let (rhs_ty, _) = infer_node(&mut expr.children[1], registry, cache);
    let target = &mut expr.children[0];
    if target.kind == ExprKind::Identifier && registry.get_type_for(&target.text).is_none() {
        if let Some(rhs_ty) = &rhs_ty {
            if cache {
                registry.put_type_for(&target.text, rhs_ty.clone(), false);
                target.set_type(rhs_ty.clone(), false);
            }
            return (Some(rhs_ty.clone()), false);
        }
    }
    let (lhs_ty, _) = infer_node(&mut expr.children[0], registry, cache);
    (lhs_ty.or(rhs_ty), false)
}

/// `value[index...]`: the first child must be an array; the result is its
/// element type.
fn infer_index_access(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    let mut children = expr.children.iter_mut();
    let (array_ty, array_safe) = match children.next() {
        Some(array) => infer_node(array, registry, cache),
        None => return (None, false),
    };
    for index in children {
        infer_node(index, registry, cache);
    }
    match array_ty.and_then(|ty| ty.element_type()) {
        Some(element) => {
            let safe = array_safe && !element.is_anonymous();
            (Some(element), safe)
        }
        None => (None, false),
    }
}

fn infer_arithmetic(
    expr: &mut Expr,
    symbol: &str,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    let mut types: Vec<Option<Arc<Type>>> = Vec::new();
    let mut all_safe = true;
    for child in &mut expr.children {
        let (ty, safe) = infer_node(child, registry, cache);
        all_safe &= safe;
        types.push(ty);
    }
    let known: Vec<&Arc<Type>> = types.iter().flatten().collect();
    let all_known = known.len() == types.len();
    let all_same = all_known
        && known
            .windows(2)
            .all(|pair| pair[0].structurally_equal(pair[1]));
    let string_operand = known
        .iter()
        .find(|ty| ty.resolve().name() == "string")
        .copied();
    let float_operand = known
        .iter()
        .find(|ty| ty.resolve().name() == "double")
        .or_else(|| known.iter().find(|ty| ty.resolve().name() == "float"))
        .copied();
    let all_numeric = known.iter().all(|ty| ty.is_numeric());

    if symbol == "+" {
        // String concatenation beats numeric promotion
        if all_same {
            return (Some(known[0].clone()), all_safe);
        }
        if let Some(string_ty) = string_operand {
            return (Some(string_ty.clone()), all_safe);
        }
        if all_numeric {
            if let Some(float_ty) = float_operand {
                return (Some(float_ty.clone()), all_safe);
            }
        }
        return (None, false);
    }
    if is_integer_class(symbol) {
        // Multiplicative remainder, shifts and bitwise connectives fall
        // back to the generic integer type on mixed operands
        if all_same && all_numeric {
            return (Some(known[0].clone()), all_safe);
        }
        return (standard_type("int"), all_safe);
    }
    if matches!(symbol, "-" | "*" | "/") && all_numeric {
        if all_same {
            return (Some(known[0].clone()), all_safe);
        }
        if all_known {
            if let Some(float_ty) = float_operand {
                return (Some(float_ty.clone()), all_safe);
            }
        }
    }
    (None, false)
}

fn infer_array_initializer(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    let mut element: Option<Arc<Type>> = None;
    let mut conflict = false;
    let mut all_safe = true;
    let count = expr.children.len();
    for child in &mut expr.children {
        let (ty, safe) = infer_node(child, registry, cache);
        all_safe &= safe;
        if let Some(ty) = ty {
            match &element {
                None => element = Some(ty),
                Some(seen) if seen.structurally_equal(&ty) => {}
                Some(_) => conflict = true,
            }
        }
    }
    if conflict {
        // Disagreeing elements degrade to the unknown sentinel
        element = Some(super::registry::dummy_type());
    }
    // The array node's type is always freshly constructed and anonymous,
    // never registered by name
    let array = Type::new(
        "",
        TypeKind::Array {
            element,
            offset: 0,
            size: count as i64,
        },
    )
    .expect("anonymous array type is always well-formed");
    (Some(Arc::new(array)), all_safe && !conflict)
}

fn infer_record_initializer(
    expr: &mut Expr,
    registry: &mut TypeRegistry,
    cache: bool,
) -> (Option<Arc<Type>>, bool) {
    let type_name = expr.text.clone();
    let registered = registry.get_type(&type_name);
    let mut components: IndexMap<String, Arc<Type>> = IndexMap::new();
    for (i, child) in expr.children.iter_mut().enumerate() {
        if child.kind == ExprKind::Component {
            let (ty, _) = infer_node(child, registry, cache);
            components.insert(
                child.text.clone(),
                ty.unwrap_or_else(super::registry::dummy_type),
            );
        } else {
            let (ty, _) = infer_node(child, registry, cache);
            // Positional fallback name for unnamed components
            components.insert(
                format!("{}#{}", type_name, i),
                ty.unwrap_or_else(super::registry::dummy_type),
            );
        }
    }
    if let Some(ty) = registered {
        return (Some(ty), false);
    }
    // No registered definition: synthesize an anonymous record type from
    // the encountered components
    let record = Type::new("", TypeKind::Record { components })
        .expect("anonymous record type is always well-formed");
    (Some(Arc::new(record)), false)
}

/// Comparison, equality, boolean connectives and negation
fn is_boolean_operator(symbol: &str) -> bool {
    matches!(
        symbol,
        "=" | "==" | "<>" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" | "!"
    ) || symbol.eq_ignore_ascii_case("and")
        || symbol.eq_ignore_ascii_case("or")
        || symbol.eq_ignore_ascii_case("not")
}

/// Operator classes that default to the generic integer type on mixed
/// operand types
fn is_integer_class(symbol: &str) -> bool {
    matches!(symbol, "%" | "<<" | ">>" | ">>>" | "|" | "&" | "^")
        || symbol.eq_ignore_ascii_case("div")
        || symbol.eq_ignore_ascii_case("mod")
        || symbol.eq_ignore_ascii_case("shl")
        || symbol.eq_ignore_ascii_case("shr")
        || symbol.eq_ignore_ascii_case("xor")
}
