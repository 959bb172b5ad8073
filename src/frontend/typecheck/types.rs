//! Type descriptors
//!
//! A closed hierarchy of data type descriptions: primitive, array, record,
//! enumeration, name redirect (synonym), and the anonymous "dummy" type
//! signalling inference ambiguity. Every type produces a canonical,
//! deterministic self-description string with a fixed one-character sigil
//! per variant (`$` record, `#` enumeration, `@` array) that serves both
//! for display and as the structural equality key.
//!
//! Descriptions come in a shallow form (name and component/item count
//! only) and a deep form (fully expanded substructure); the shallow form
//! avoids infinite recursion on mutually-referential types.

use crate::frontend::core::lexer::literals::{is_identifier_char, is_identifier_start};
use crate::frontend::core::parser::SyntaxError;
use crate::frontend::typecheck::const_eval;
use crate::util::diagnostic::Diagnostic;
use crate::util::span::Span;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// The display name used for nameless (anonymous/dummy) types
pub const ANON_NAME: &str = "???";

/// Zero value of a primitive type; doubles as the value-class witness for
/// the numeric tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
}

/// Variant-specific structure of a type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Built-in primitive with its zero value
    Primitive { zero: PrimValue },
    /// Array with element type (possibly unknown), index start offset and
    /// declared length (-1 when unknown/flexible)
    Array {
        element: Option<Arc<Type>>,
        offset: i64,
        size: i64,
    },
    /// Record with its ordered component name to type mapping
    Record { components: IndexMap<String, Arc<Type>> },
    /// Enumeration with its ordered member name to optional value
    /// expression mapping
    Enum { items: IndexMap<String, Option<String>> },
    /// Synonym redirecting to another already-registered type;
    /// transparent to structural comparisons
    Redirect { target: Arc<Type> },
    /// The "unknown type" sentinel
    Dummy,
}

/// A data type description
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    /// The type identifier; empty iff the type is anonymous
    name: String,
    pub kind: TypeKind,
}

/// Checks ASCII identifier syntax for type names
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii() && is_identifier_start(first) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii() && is_identifier_char(c))
}

impl Type {
    /// Constructs a type from `name` (validated against identifier
    /// syntax; an empty name makes the type anonymous) and its structure.
    pub fn new(name: &str, kind: TypeKind) -> Result<Self, SyntaxError> {
        if !name.is_empty() && !is_identifier(name) {
            return Err(SyntaxError::new(
                format!("type name '{}' is not an ASCII identifier", name),
                Span::dummy(),
            ));
        }
        Ok(Self {
            name: name.trim().to_string(),
            kind,
        })
    }

    /// The dummy type, used as default for unspecified types
    pub fn dummy() -> Self {
        Self {
            name: String::new(),
            kind: TypeKind::Dummy,
        }
    }

    pub(crate) fn primitive(name: &str, zero: PrimValue) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Primitive { zero },
        }
    }

    /// The raw type identifier; empty for anonymous types
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display name; anonymous types show as `???`
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            ANON_NAME
        } else {
            &self.name
        }
    }

    /// `true` iff this type has no name (including the dummy type); an
    /// anonymous type must never be registered under a name
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// `true` iff this is the unknown-type sentinel
    pub fn is_dummy(&self) -> bool {
        matches!(self.resolved_kind(), TypeKind::Dummy)
    }

    /// `true` if this type represents a primitive data type
    pub fn is_primitive(&self) -> bool {
        matches!(self.resolved_kind(), TypeKind::Primitive { .. })
    }

    /// `true` if this type represents numeric values
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.resolved_kind(),
            TypeKind::Primitive {
                zero: PrimValue::Int(_) | PrimValue::UInt(_) | PrimValue::Float(_)
            }
        )
    }

    /// `true` for floating-point primitives
    pub fn is_floating(&self) -> bool {
        matches!(
            self.resolved_kind(),
            TypeKind::Primitive {
                zero: PrimValue::Float(_)
            }
        )
    }

    /// `true` for integral numeric primitives
    pub fn is_integral(&self) -> bool {
        self.is_numeric() && !self.is_floating()
    }

    /// `true` if the type is composed (array or record)
    pub fn is_structured(&self) -> bool {
        matches!(
            self.resolved_kind(),
            TypeKind::Array { .. } | TypeKind::Record { .. }
        )
    }

    /// `true` if this type is (or redirects to) a record
    pub fn is_record(&self) -> bool {
        matches!(self.resolved_kind(), TypeKind::Record { .. })
    }

    /// `true` if this type is (or redirects to) an array
    pub fn is_array(&self) -> bool {
        matches!(self.resolved_kind(), TypeKind::Array { .. })
    }

    /// The variant after following any redirect chain
    pub fn resolved_kind(&self) -> &TypeKind {
        match &self.kind {
            TypeKind::Redirect { target } => target.resolved_kind(),
            kind => kind,
        }
    }

    /// Follows a redirect chain to the eventual material type; returns
    /// `self` for non-redirect types.
    pub fn resolve(&self) -> &Type {
        match &self.kind {
            TypeKind::Redirect { target } => target.resolve(),
            _ => self,
        }
    }

    /// The type of the record component with the given name, if this is a
    /// record owning one.
    pub fn component_type(&self, component: &str) -> Option<Arc<Type>> {
        match self.resolved_kind() {
            TypeKind::Record { components } => components.get(component).cloned(),
            _ => None,
        }
    }

    /// The ordered component names of a record type
    pub fn component_names(&self) -> Vec<String> {
        match self.resolved_kind() {
            TypeKind::Record { components } => components.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// The element type of an array type, if known
    pub fn element_type(&self) -> Option<Arc<Type>> {
        match self.resolved_kind() {
            TypeKind::Array { element, .. } => element.clone(),
            _ => None,
        }
    }

    /// Canonical self-description; `deep` expands all substructure,
    /// otherwise only names and counts appear.
    pub fn describe(&self, deep: bool) -> String {
        self.describe_with_name(None, deep)
    }

    /// Self-description with an alternative top-level name substituted
    /// (used to equalize names when comparing anonymous types).
    fn describe_with_name(&self, alt_name: Option<&str>, deep: bool) -> String {
        let name = alt_name.unwrap_or(self.display_name());
        match &self.kind {
            TypeKind::Primitive { .. } => name.to_string(),
            TypeKind::Dummy => ANON_NAME.to_string(),
            TypeKind::Redirect { target } => {
                // Synonyms are transparent: they describe as their target
                target.resolve().describe_with_name(None, deep)
            }
            TypeKind::Array {
                element,
                offset,
                size,
            } => {
                let el = match element {
                    Some(el) => {
                        if deep {
                            el.describe(true)
                        } else {
                            el.display_name().to_string()
                        }
                    }
                    None => ANON_NAME.to_string(),
                };
                format!("@{}({},{},{})", name, el, offset, size)
            }
            TypeKind::Record { components } => {
                if deep {
                    let comps: Vec<String> = components
                        .iter()
                        .map(|(comp, ty)| format!("{}:{}", comp, ty.describe(true)))
                        .collect();
                    format!("${}({})", name, comps.join(";"))
                } else {
                    format!("${}({})", name, components.len())
                }
            }
            TypeKind::Enum { items } => {
                if deep {
                    let members: Vec<String> = items
                        .iter()
                        .map(|(member, value)| match value {
                            Some(value) => format!("{}={}", member, value),
                            None => member.clone(),
                        })
                        .collect();
                    format!("#{}({})", name, members.join(","))
                } else {
                    format!("#{}({})", name, items.len())
                }
            }
        }
    }

    /// Assigns integer codes to the members of an enumeration type.
    ///
    /// Members without an explicit value continue from the previous
    /// member's code plus one, starting at 0. Explicit values are
    /// evaluated as constant expressions; `lookup` resolves references to
    /// registered constants, and already-coded sibling members are
    /// resolvable by name. A member whose code cannot be determined gets
    /// `None`, which also suppresses automatic incrementing until the
    /// next member with a determinable value. All evaluation problems are
    /// collected and returned, never thrown, so a best-effort set of
    /// codes is always produced.
    pub fn evaluate_enum_codes(
        &self,
        lookup: &dyn Fn(&str) -> Option<i64>,
    ) -> (IndexMap<String, Option<i64>>, Vec<Diagnostic>) {
        let mut codes: IndexMap<String, Option<i64>> = IndexMap::new();
        let mut problems = Vec::new();
        let items = match self.resolved_kind() {
            TypeKind::Enum { items } => items,
            _ => return (codes, problems),
        };
        let mut next: Option<i64> = Some(0);
        for (member, value) in items {
            let code = match value {
                Some(text) => {
                    let siblings = &codes;
                    let combined = |name: &str| {
                        siblings
                            .get(name)
                            .copied()
                            .flatten()
                            .or_else(|| lookup(name))
                    };
                    match const_eval::evaluate_text(text, &combined) {
                        Ok(code) => Some(code),
                        Err(problem) => {
                            problems.push(problem);
                            None
                        }
                    }
                }
                None => next,
            };
            next = code.map(|code| code + 1);
            codes.insert(member.clone(), code);
        }
        (codes, problems)
    }

    /// Structural equality: two types are equal iff their deep canonical
    /// self-descriptions match. For anonymous types the top-level name
    /// comparison is suppressed by name equalization. The dummy type
    /// compares unequal to everything, including itself.
    pub fn structurally_equal(&self, other: &Type) -> bool {
        if self.is_dummy() || other.is_dummy() {
            return false;
        }
        let mine = self.describe(true);
        let theirs = other.describe(true);
        if mine == theirs {
            return true;
        }
        if self.is_anonymous() {
            return self.describe_with_name(Some(other.display_name()), true) == theirs;
        }
        if other.is_anonymous() {
            return mine == other.describe_with_name(Some(self.display_name()), true);
        }
        false
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Arc<Type> {
        Arc::new(Type::primitive("int", PrimValue::Int(0)))
    }

    fn point() -> Type {
        let mut components = IndexMap::new();
        components.insert("x".to_string(), int());
        components.insert("y".to_string(), int());
        Type::new("Point", TypeKind::Record { components }).unwrap()
    }

    #[test]
    fn test_record_description() {
        let ty = point();
        assert_eq!(ty.describe(true), "$Point(x:int;y:int)");
        assert_eq!(ty.describe(false), "$Point(2)");
    }

    #[test]
    fn test_enum_description() {
        let mut items = IndexMap::new();
        items.insert("A".to_string(), None);
        items.insert("B".to_string(), Some("5".to_string()));
        items.insert("C".to_string(), None);
        let ty = Type::new("Color", TypeKind::Enum { items }).unwrap();
        assert_eq!(ty.describe(true), "#Color(A,B=5,C)");
        assert_eq!(ty.describe(false), "#Color(3)");
    }

    #[test]
    fn test_array_description() {
        let ty = Type::new(
            "Row",
            TypeKind::Array {
                element: Some(int()),
                offset: 0,
                size: 100,
            },
        )
        .unwrap();
        assert_eq!(ty.describe(true), "@Row(int,0,100)");
        let unknown = Type::new(
            "",
            TypeKind::Array {
                element: None,
                offset: 0,
                size: -1,
            },
        )
        .unwrap();
        assert_eq!(unknown.describe(true), "@???(???,0,-1)");
    }

    #[test]
    fn test_name_validation() {
        assert!(Type::new("Point2", TypeKind::Dummy).is_ok());
        assert!(Type::new("_ok", TypeKind::Dummy).is_ok());
        assert!(Type::new("2bad", TypeKind::Dummy).is_err());
        assert!(Type::new("no way", TypeKind::Dummy).is_err());
        assert!(Type::new("", TypeKind::Dummy).is_ok());
    }

    #[test]
    fn test_structural_equality() {
        assert!(point().structurally_equal(&point()));
        let mut components = IndexMap::new();
        components.insert("x".to_string(), int());
        components.insert("y".to_string(), int());
        let anon = Type::new("", TypeKind::Record { components }).unwrap();
        // Anonymous types compare with equalized names
        assert!(anon.structurally_equal(&point()));
        assert!(point().structurally_equal(&anon));
    }

    #[test]
    fn test_dummy_never_equal() {
        let dummy = Type::dummy();
        assert!(!dummy.structurally_equal(&Type::dummy()));
        assert!(!dummy.structurally_equal(&point()));
        assert!(dummy.is_anonymous());
        assert!(dummy.is_dummy());
    }

    #[test]
    fn test_redirect_transparent() {
        let target = Arc::new(point());
        let alias = Type::new(
            "Position",
            TypeKind::Redirect {
                target: target.clone(),
            },
        )
        .unwrap();
        assert_eq!(alias.describe(true), target.describe(true));
        assert!(alias.structurally_equal(&target));
        assert!(alias.is_record());
        assert_eq!(alias.component_type("x").unwrap().name(), "int");
    }

    #[test]
    fn test_enum_coding() {
        let mut items = IndexMap::new();
        items.insert("A".to_string(), None);
        items.insert("B".to_string(), Some("5".to_string()));
        items.insert("C".to_string(), None);
        let ty = Type::new("Color", TypeKind::Enum { items }).unwrap();
        let (codes, problems) = ty.evaluate_enum_codes(&|_| None);
        assert!(problems.is_empty());
        assert_eq!(codes["A"], Some(0));
        assert_eq!(codes["B"], Some(5));
        assert_eq!(codes["C"], Some(6));
    }

    #[test]
    fn test_enum_coding_with_sibling_reference() {
        let mut items = IndexMap::new();
        items.insert("A".to_string(), None);
        items.insert("B".to_string(), Some("A + 4".to_string()));
        items.insert("C".to_string(), None);
        let ty = Type::new("Steps", TypeKind::Enum { items }).unwrap();
        let (codes, problems) = ty.evaluate_enum_codes(&|_| None);
        assert!(problems.is_empty());
        assert_eq!(codes["B"], Some(4));
        assert_eq!(codes["C"], Some(5));
    }

    #[test]
    fn test_enum_coding_with_constant_reference() {
        let mut items = IndexMap::new();
        items.insert("FIRST".to_string(), Some("BASE".to_string()));
        let ty = Type::new("Ids", TypeKind::Enum { items }).unwrap();
        let lookup = |name: &str| (name == "BASE").then_some(100);
        let (codes, problems) = ty.evaluate_enum_codes(&lookup);
        assert!(problems.is_empty());
        assert_eq!(codes["FIRST"], Some(100));
    }

    #[test]
    fn test_enum_coding_collects_problems() {
        let mut items = IndexMap::new();
        items.insert("A".to_string(), None);
        items.insert("B".to_string(), Some("NOWHERE".to_string()));
        items.insert("C".to_string(), None);
        items.insert("D".to_string(), Some("1".to_string()));
        let ty = Type::new("Partial", TypeKind::Enum { items }).unwrap();
        let (codes, problems) = ty.evaluate_enum_codes(&|_| None);
        assert_eq!(problems.len(), 1);
        assert_eq!(codes["A"], Some(0));
        assert_eq!(codes["B"], None);
        // The undetermined code suppresses auto-increment...
        assert_eq!(codes["C"], None);
        // ...until a determinable value resumes the sequence
        assert_eq!(codes["D"], Some(1));
    }

    #[test]
    fn test_numeric_classes() {
        let int = Type::primitive("int", PrimValue::Int(0));
        let double = Type::primitive("double", PrimValue::Float(0.0));
        let string = Type::primitive("string", PrimValue::Str(String::new()));
        assert!(int.is_numeric() && int.is_integral());
        assert!(double.is_numeric() && double.is_floating());
        assert!(!string.is_numeric());
        assert!(string.is_primitive());
    }
}
