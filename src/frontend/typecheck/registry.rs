//! Type registry
//!
//! A symbol table mapping type names and variable names to type
//! descriptors. Two layers exist: one process-wide, lazily-initialized,
//! immutable global layer holding exactly the built-in primitive types
//! (keyed `:name`), and any number of local registries, each pre-seeded
//! with a copy of the global layer and owned by a single analysis context
//! (one diagram/program). Local mutation never perturbs the global
//! defaults or other local registries.
//!
//! All mutation methods return either the value actually stored or the
//! pre-existing conflicting value, never an error, so callers can log and
//! proceed.

use super::types::{PrimValue, Type, TypeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// A local registry behind a lock, for callers that must share one
/// analysis context across threads. A local registry itself is meant for
/// a single logical owner; concurrent mutation has to be serialized.
pub type SharedRegistry = Arc<parking_lot::Mutex<TypeRegistry>>;

static BIN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^0b[01]+$").unwrap());
static OCT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^0[0-7]+$").unwrap());
static HEX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^0x[0-9A-Fa-f]+$").unwrap());

/// Where a registered type or association was defined: an external
/// diagram element reference plus a line number. `None` in a
/// [`RegistryEntry`] means built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeOrigin {
    /// Id of the defining diagram element
    pub element_id: u64,
    /// Line number within the element text
    pub line: u32,
}

/// A registry slot: the type plus where it was defined
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub ty: Arc<Type>,
    pub origin: Option<TypeOrigin>,
}

/// The global layer: exactly the built-in primitives (plus the dummy
/// sentinel), created once per process on first use and never mutated
/// afterwards.
static GLOBAL_TYPES: Lazy<HashMap<String, RegistryEntry>> = Lazy::new(|| {
    let mut map = HashMap::new();
    let mut put = |ty: Type| {
        let key = format!(":{}", if ty.name().is_empty() { "dummy" } else { ty.name() });
        map.insert(
            key,
            RegistryEntry {
                ty: Arc::new(ty),
                origin: None,
            },
        );
    };
    put(Type::dummy());
    put(Type::primitive("boolean", PrimValue::Bool(false)));
    put(Type::primitive("byte", PrimValue::Int(0)));
    put(Type::primitive("short", PrimValue::Int(0)));
    put(Type::primitive("int", PrimValue::Int(0)));
    put(Type::primitive("long", PrimValue::Int(0)));
    put(Type::primitive("ubyte", PrimValue::UInt(0)));
    put(Type::primitive("ushort", PrimValue::UInt(0)));
    put(Type::primitive("uint", PrimValue::UInt(0)));
    put(Type::primitive("ulong", PrimValue::UInt(0)));
    put(Type::primitive("float", PrimValue::Float(0.0)));
    put(Type::primitive("double", PrimValue::Float(0.0)));
    put(Type::primitive("char", PrimValue::Char('\0')));
    put(Type::primitive("string", PrimValue::Str(String::new())));
    map
});

/// Retrieves a built-in type by name (`None` for non-standard names).
pub fn standard_type(name: &str) -> Option<Arc<Type>> {
    GLOBAL_TYPES.get(&format!(":{}", name)).map(|e| e.ty.clone())
}

/// The dummy type singleton of the global layer
pub fn dummy_type() -> Arc<Type> {
    standard_type("dummy").expect("global layer always holds the dummy type")
}

/// Decides the built-in type of a literal purely from its textual shape:
/// boolean keywords, quoted forms (char by length), the numeric parse
/// cascade double -> long -> int, and the infinity token. Undecidable
/// shapes yield the dummy type.
pub fn standard_type_for(literal: &str) -> Arc<Type> {
    let fallback = dummy_type();
    if literal == "true" || literal == "false" {
        return standard_type("boolean").unwrap_or(fallback);
    }
    if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
        // Rough but serviceable: a single (possibly escaped) character is
        // a char, anything longer a string
        let chars = literal.chars().count();
        if chars == 3 || (chars == 4 && literal.chars().nth(1) == Some('\\')) {
            return standard_type("char").unwrap_or(fallback);
        }
        return standard_type("string").unwrap_or(fallback);
    }
    if literal.len() > 2 && literal.starts_with('"') && literal.ends_with('"') {
        return standard_type("string").unwrap_or(fallback);
    }
    if BIN_PATTERN.is_match(literal)
        || OCT_PATTERN.is_match(literal)
        || HEX_PATTERN.is_match(literal)
    {
        return standard_type("int").unwrap_or(fallback);
    }
    if literal == "Infinity" {
        return standard_type("double").unwrap_or(fallback);
    }
    // In this cascade the last successful parse wins
    let mut ty = fallback;
    if literal.parse::<f64>().is_ok() {
        ty = standard_type("double").unwrap_or(ty);
        if literal.parse::<i64>().is_ok() {
            ty = standard_type("long").unwrap_or(ty);
            if literal.parse::<i32>().is_ok() {
                ty = standard_type("int").unwrap_or(ty);
            }
        }
    }
    ty
}

/// A per-context type registry (one per analyzed diagram/program),
/// seeded with a copy of the global layer. Keys are `:typeName` for type
/// definitions and bare variable names for variable-to-type associations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    map: HashMap<String, RegistryEntry>,
    /// Registered constant values, resolvable from enumeration member
    /// value expressions
    constants: HashMap<String, i64>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a local registry pre-seeded with a copy of the global
    /// built-in layer.
    pub fn new() -> Self {
        Self {
            map: GLOBAL_TYPES.clone(),
            constants: HashMap::new(),
        }
    }

    /// Retrieves the data type registered under the type name
    /// `type_name`, if any.
    pub fn get_type(&self, type_name: &str) -> Option<Arc<Type>> {
        self.map.get(&format!(":{}", type_name)).map(|e| e.ty.clone())
    }

    /// Retrieves the data type associated with the variable `var_name`,
    /// if any.
    pub fn get_type_for(&self, var_name: &str) -> Option<Arc<Type>> {
        self.map.get(var_name).map(|e| e.ty.clone())
    }

    /// Where the type with the given name was defined (`None` for
    /// built-ins and unknown names).
    pub fn origin_of(&self, type_name: &str) -> Option<TypeOrigin> {
        self.map
            .get(&format!(":{}", type_name))
            .and_then(|e| e.origin)
    }

    /// Registers `ty` under its own name unless it is anonymous or a
    /// different type is already registered under that name; `force`
    /// overrides the conflict (but built-in primitive names can never be
    /// overridden). Returns the value actually stored on success, or the
    /// pre-existing conflicting value (the dummy type for an anonymous
    /// argument) as a no-op signal.
    pub fn put_type(&mut self, ty: Arc<Type>, force: bool) -> Arc<Type> {
        self.put_type_at(ty, None, force)
    }

    /// [`TypeRegistry::put_type`] with a defining-element origin.
    pub fn put_type_at(
        &mut self,
        ty: Arc<Type>,
        origin: Option<TypeOrigin>,
        force: bool,
    ) -> Arc<Type> {
        if ty.is_anonymous() {
            tracing::debug!("refusing to register an anonymous type");
            return dummy_type();
        }
        if standard_type(ty.name()).is_some() {
            // Built-in names can never be overridden
            return standard_type(ty.name()).unwrap();
        }
        let key = format!(":{}", ty.name());
        if let Some(existing) = self.map.get(&key) {
            // An equivalent registration is a no-op; a different one is
            // only replaced when forced
            if existing.ty.structurally_equal(&ty) || !force {
                return existing.ty.clone();
            }
        }
        self.map.insert(
            key,
            RegistryEntry {
                ty: ty.clone(),
                origin,
            },
        );
        ty
    }

    /// Registers an additional synonym name for `ty`: the alias resolves
    /// to the same definition through a transparent redirect. Conflict
    /// and force semantics match [`TypeRegistry::put_type`].
    pub fn put_type_alias(&mut self, alias: &str, ty: Arc<Type>, force: bool) -> Arc<Type> {
        let redirect = match Type::new(
            alias,
            TypeKind::Redirect { target: ty.clone() },
        ) {
            Ok(redirect) => Arc::new(redirect),
            Err(_) => return dummy_type(),
        };
        // Make sure the target itself is registered
        self.put_type(ty, false);
        self.put_type(redirect, force)
    }

    /// Associates the variable `var_name` with `ty`, simultaneously
    /// ensuring the type itself is registered. An existing different
    /// association is not overwritten unless `force` is set; the
    /// pre-existing value is returned as the no-op signal.
    pub fn put_type_for(&mut self, var_name: &str, ty: Arc<Type>, force: bool) -> Arc<Type> {
        self.put_type_for_at(var_name, ty, None, force)
    }

    /// [`TypeRegistry::put_type_for`] with a defining-element origin.
    pub fn put_type_for_at(
        &mut self,
        var_name: &str,
        ty: Arc<Type>,
        origin: Option<TypeOrigin>,
        force: bool,
    ) -> Arc<Type> {
        if let Some(existing) = self.map.get(var_name) {
            if existing.ty.structurally_equal(&ty) {
                return existing.ty.clone();
            }
            if !force {
                return existing.ty.clone();
            }
        }
        if !force && !ty.is_anonymous() {
            if let Some(registered) = self.get_type(ty.name()) {
                if !registered.structurally_equal(&ty) {
                    // A different type owns this name
                    return registered;
                }
            }
        }
        self.map.insert(
            var_name.to_string(),
            RegistryEntry {
                ty: ty.clone(),
                origin,
            },
        );
        if !ty.is_anonymous() {
            self.put_type(ty.clone(), false);
        }
        ty
    }

    /// Registers a constant value (e.g. an evaluated enumeration member)
    pub fn put_constant(&mut self, name: &str, value: i64) {
        self.constants.insert(name.to_string(), value);
    }

    /// Looks up a registered constant value
    pub fn get_constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    /// Evaluates the member codes of an enumeration type against the
    /// constants registered here.
    pub fn enum_codes(
        &self,
        ty: &Type,
    ) -> (
        indexmap::IndexMap<String, Option<i64>>,
        Vec<crate::util::diagnostic::Diagnostic>,
    ) {
        ty.evaluate_enum_codes(&|name| self.get_constant(name))
    }

    /// Number of entries (types and variable associations)
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Wraps this registry for lock-guarded sharing between threads.
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(parking_lot::Mutex::new(self))
    }
}
