//! Data model for the symbol database.
//!
//! These are the durable records produced by a scan: namespaces, classes,
//! enums, free functions and the resolved-type table. Everything here is
//! plain data with structural equality rules chosen for deduplication:
//! - parameters compare by canonical string form (overloads differ by type)
//! - fields compare by name (fields cannot be overloaded)
//! - methods compare by name plus pairwise parameter equality
//!
//! All records serialize to JSON so downstream code generators can consume
//! the database directly.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Scope Name Helpers
// ============================================================================

/// Split a scoped name into its components: `"::A::B"` -> `["A", "B"]`.
pub fn split_scopes(name: &str) -> Vec<String> {
    name.split("::")
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join scope components rooted at the global scope: `["A", "B"]` -> `"::A::B"`.
///
/// An empty component list yields the empty string, so that appending
/// `"::name"` produces a global-scope name.
pub fn join_scopes(parts: &[String]) -> String {
    let mut joined = String::new();
    for part in parts {
        joined.push_str("::");
        joined.push_str(part);
    }
    joined
}

/// Enclosing scope of a fully-qualified name: `"::A::B::C"` -> `"::A::B"`,
/// `"::C"` -> `"::"`.
pub fn enclosing_scope(full_name: &str) -> String {
    let mut parts = split_scopes(full_name);
    if parts.len() <= 1 {
        return "::".to_string();
    }
    parts.pop();
    join_scopes(&parts)
}

// ============================================================================
// Resolved Types
// ============================================================================

/// Discriminant of a resolved type record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive,
    Struct,
    Class,
    Enum,
    Typedef,
    /// No registered declaration matched; `full_name` is a best-effort label.
    #[default]
    Unresolved,
}

/// Canonical representation of a type reference after qualifier extraction
/// and scope matching.
///
/// Pointer and reference depth are additive counts: resolving through an
/// alias chain accumulates the indirection contributed by every layer.
/// Invariant: `full_name` is empty only while `kind` is
/// [`TypeKind::Unresolved`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedType {
    /// The spelling the reference was written with.
    pub raw_name: String,
    /// Unqualified name after stripping scopes and qualifiers.
    pub name: String,
    /// Scope components as written (`"N::S"` -> `["N"]`).
    pub scopes: Vec<String>,
    /// Fully-qualified name of the matched declaration, or a best-effort
    /// label for unresolved references.
    pub full_name: String,
    /// Scope the reference appeared in, used to retry matching from the
    /// usage context.
    pub declaration_scope: Vec<String>,
    pub is_const: bool,
    pub pointer_depth: u32,
    pub reference_depth: u32,
    pub kind: TypeKind,
}

impl ResolvedType {
    /// Best-effort printable name: scope components joined with the
    /// unqualified name, rooted at the global scope.
    pub fn scoped_name(&self) -> String {
        format!("{}::{}", join_scopes(&self.scopes), self.name)
    }

    /// Structural comparability for override/overload checks: scope path,
    /// name and full name all match. Qualifier depths and constness are
    /// compared separately by callers where they matter.
    pub fn type_match(&self, other: &ResolvedType) -> bool {
        self.scopes == other.scopes && self.name == other.name && self.full_name == other.full_name
    }

    /// Whether two records describe the same registered type entry.
    pub fn same_record(&self, other: &ResolvedType) -> bool {
        self.raw_name == other.raw_name && self.type_match(other)
    }
}

/// One template parameter with an optional resolved default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParameter {
    /// Parameter kind tag; only type parameters are modeled.
    pub kind: String,
    pub name: String,
    /// Canonical resolved name of the default value, when one was seen.
    pub default_value: Option<String>,
}

impl TemplateParameter {
    /// A `typename` parameter with no default.
    pub fn typename(name: impl Into<String>) -> Self {
        TemplateParameter {
            kind: "typename".to_string(),
            name: name.into(),
            default_value: None,
        }
    }
}

// ============================================================================
// Parameters and Fields
// ============================================================================

/// Visibility of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        };
        write!(f, "{label}")
    }
}

/// A parameter or a value slot of a function-like declaration.
///
/// The canonical type name is held as a field; equality and formatting are
/// explicit operations on that field. Two parameters are equal iff their
/// canonical string forms match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared parameter name (may be empty for unnamed parameters).
    pub name: String,
    /// Canonical resolved type name (full name of the matched declaration,
    /// primitive spelling, or a best-effort label).
    pub type_name: String,
    /// The alias name the type was written with, when it went through one.
    pub type_alias: Option<String>,
    pub is_const: bool,
    pub pointer_depth: u32,
    pub reference_depth: u32,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.type_name)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        for _ in 0..self.reference_depth {
            write!(f, "&")?;
        }
        Ok(())
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Parameter {}

/// A data member of a class. Fields cannot be overloaded, so equality is
/// by name only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    pub parameter: Parameter,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.parameter.name == other.parameter.name
    }
}

impl Eq for Field {}

// ============================================================================
// Invokables
// ============================================================================

/// Common shape of methods and free functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invokable {
    /// Absent when the declaration returns void.
    pub return_type: Option<Parameter>,
    pub params: Vec<Parameter>,
    pub template_params: Vec<TemplateParameter>,
    pub is_variadic: bool,
}

impl Invokable {
    pub fn is_template(&self) -> bool {
        !self.template_params.is_empty()
    }
}

/// A member function. Constructors are methods with no return type whose
/// name is the class name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure_virtual: bool,
    pub is_const: bool,
    pub invokable: Invokable,
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.invokable.params.len() == other.invokable.params.len()
            && self
                .invokable
                .params
                .iter()
                .zip(&other.invokable.params)
                .all(|(a, b)| a == b)
    }
}

impl Eq for Method {}

/// A free function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub full_name: String,
    pub from_file: PathBuf,
    pub include_path: String,
    pub invokable: Invokable,
}

impl Function {
    /// Scope the function was declared in.
    pub fn enclosing_scope(&self) -> String {
        enclosing_scope(&self.full_name)
    }
}

// ============================================================================
// Namespaces, Classes, Enums
// ============================================================================

/// A namespace: purely a scoping node, never merged with class data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub full_name: String,
}

impl Namespace {
    pub fn enclosing_scope(&self) -> String {
        enclosing_scope(&self.full_name)
    }
}

/// Declaration keyword of a class-like record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Struct,
    Class,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Struct => write!(f, "struct"),
            ClassKind::Class => write!(f, "class"),
        }
    }
}

/// A class or struct with its members.
///
/// An "empty" record (no bases, constructors or methods) marks a forward
/// declaration; only an empty record may have its origin file refreshed by
/// a later declaration with the same full name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub full_name: String,
    pub kind: ClassKind,
    pub from_file: PathBuf,
    pub include_path: String,
    /// Base classes as written (resolved to full names where possible).
    pub bases: Vec<String>,
    /// The subset of `bases` that matched a known class, by full name.
    pub known_bases: Vec<String>,
    pub constructors: Vec<Method>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub template_params: Vec<TemplateParameter>,
}

impl Class {
    /// Whether this record is still a bare forward declaration.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty() && self.constructors.is_empty() && self.methods.is_empty()
    }

    pub fn is_template(&self) -> bool {
        !self.template_params.is_empty()
    }

    /// Exact name + parameter-list structural match against the methods of
    /// this class.
    pub fn implements(&self, method: &Method) -> bool {
        self.methods.iter().any(|candidate| candidate == method)
    }

    pub fn enclosing_scope(&self) -> String {
        enclosing_scope(&self.full_name)
    }
}

/// An enum with its constants in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub full_name: String,
    pub from_file: PathBuf,
    /// Constant name to signed value, insertion order preserved, values
    /// taken verbatim from the provider.
    pub constants: Vec<(String, i64)>,
}

// ============================================================================
// Tests
// ============================================================================
