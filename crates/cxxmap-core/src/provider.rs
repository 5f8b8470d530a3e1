//! AST provider trait and the vocabulary shared across the provider seam.
//!
//! The provider is the external collaborator that parses C++ source into a
//! cursor tree (libclang in the reference deployment). The core never talks
//! to a parser directly; it consumes the depth-first declaration stream
//! through [`AstProvider`] and compares cursors only through the
//! [`CursorEq`] identity primitive.
//!
//! # Identity model
//!
//! Cursors are opaque handles. The same logical declaration is delivered
//! multiple times across translation units, and two structurally identical
//! forward declarations are still distinct occurrences, so identity is
//! established exclusively through the provider's equality primitive and
//! never through structural comparison.
//!
//! # Context model
//!
//! The traversal callback receives the driver as an explicitly passed
//! closure. A provider whose native callback contract has no user-context
//! slot (libclang's `clang_visitChildren`) must bridge that at its own
//! boundary; the restriction is not allowed to leak into this trait.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Visibility;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by an AST provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not produce a translation unit at all.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

// ============================================================================
// Traversal Vocabulary
// ============================================================================

/// Directive returned by the traversal callback for each visited cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    /// Proceed to the next sibling without descending into this cursor.
    Continue,
    /// Descend into this cursor's children.
    Recurse,
    /// Abandon the traversal of the current translation unit.
    Break,
}

/// Kind tag of a declaration cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Namespace,
    Struct,
    Class,
    ClassTemplate,
    Enum,
    EnumConstant,
    Typedef,
    Method,
    Constructor,
    Field,
    Variable,
    Function,
    FunctionTemplate,
    TemplateTypeParameter,
    TypeRef,
    NamespaceRef,
    BaseSpecifier,
    AccessSpecifier,
    TranslationUnit,
    Other,
}

/// Severity of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Whether this severity fails the file it was reported for.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

/// A single diagnostic attached to a parsed translation unit.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
        }
    }
}

// ============================================================================
// Type Vocabulary
// ============================================================================

/// Built-in C++ types with a fixed canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    UChar,
    UShort,
    UInt,
    ULong,
    ULongLong,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    LongDouble,
}

impl Primitive {
    /// Canonical spelling used in resolved type names.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::UChar => "unsigned char",
            Primitive::UShort => "unsigned short",
            Primitive::UInt => "unsigned int",
            Primitive::ULong => "unsigned long",
            Primitive::ULongLong => "unsigned long long",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::LongLong => "long long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::LongDouble => "long double",
        }
    }
}

/// Structural shape of a provider type handle, one layer at a time.
///
/// Pointer and reference layers are unwrapped by the resolution engine via
/// [`AstProvider::pointee_type`]; everything that is not a primitive,
/// pointer or reference is a possibly-qualified reference to a declared
/// type and is reported as [`TypeShape::Named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Primitive(Primitive),
    Pointer,
    LValueReference,
    RValueReference,
    Named,
    Invalid,
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Cursor identity seam.
///
/// The registry tracks which cursors belong to which registered symbol so
/// that revisits of the same declaration can be recognized. It only ever
/// needs equality; no ordering or hashing of cursors is assumed.
pub trait CursorEq {
    type Cursor: Clone;

    /// Structural identity test for "same declaration node revisited".
    fn cursors_equal(&self, a: &Self::Cursor, b: &Self::Cursor) -> bool;
}

/// The AST provider: parse, diagnostics, traversal and per-node queries.
///
/// Implementations wrap a real parser (libclang) or an in-memory arena for
/// tests. All queries are read-only; the provider owns its cursor and type
/// handles and the core never stores them beyond the registry's identity
/// lists.
pub trait AstProvider: CursorEq {
    /// One parsed translation unit.
    type Unit;
    /// Opaque type handle.
    type Type: Clone;

    /// Parse one file. A `None`-like hard failure is a [`ProviderError`];
    /// recoverable problems surface as diagnostics on the unit instead.
    fn parse(&self, path: &Path, args: &[String]) -> Result<Self::Unit, ProviderError>;

    /// Diagnostics attached to a parsed unit.
    fn diagnostics(&self, unit: &Self::Unit) -> Vec<Diagnostic>;

    /// Depth-first traversal. The callback receives `(cursor, parent)` for
    /// every declaration and steers the walk through its [`VisitAction`].
    fn visit(
        &self,
        unit: &Self::Unit,
        callback: &mut dyn FnMut(Self::Cursor, Self::Cursor) -> VisitAction,
    );

    // ---- per-cursor queries ------------------------------------------------

    fn cursor_kind(&self, cursor: &Self::Cursor) -> CursorKind;

    /// Name string of the cursor (empty for anonymous declarations).
    fn spelling(&self, cursor: &Self::Cursor) -> String;

    /// Canonical path of the file this cursor was declared in.
    fn source_file(&self, cursor: &Self::Cursor) -> PathBuf;

    /// Declared type of the cursor, if it has one.
    fn cursor_type(&self, cursor: &Self::Cursor) -> Option<Self::Type>;

    /// Underlying type of a typedef declaration, as written.
    fn typedef_underlying_type(&self, cursor: &Self::Cursor) -> Option<Self::Type>;

    /// Access level carried by an access-specifier cursor.
    fn access_specifier(&self, cursor: &Self::Cursor) -> Visibility;

    fn is_static_method(&self, cursor: &Self::Cursor) -> bool;
    fn is_virtual_method(&self, cursor: &Self::Cursor) -> bool;
    fn is_pure_virtual_method(&self, cursor: &Self::Cursor) -> bool;
    fn is_const_method(&self, cursor: &Self::Cursor) -> bool;
    fn is_variadic(&self, cursor: &Self::Cursor) -> bool;

    /// Literal value of an enum-constant cursor, verbatim.
    fn enum_constant_value(&self, cursor: &Self::Cursor) -> i64;

    /// The `index`-th argument cursor of a function-like cursor, when the
    /// provider has one (synthesized arguments may not).
    fn argument_cursor(&self, cursor: &Self::Cursor, index: usize) -> Option<Self::Cursor>;

    // ---- per-type queries --------------------------------------------------

    fn type_shape(&self, ty: &Self::Type) -> TypeShape;

    /// Pointee/referent of a pointer or reference type.
    fn pointee_type(&self, ty: &Self::Type) -> Option<Self::Type>;

    fn is_const_qualified(&self, ty: &Self::Type) -> bool;

    fn type_spelling(&self, ty: &Self::Type) -> String;

    /// Result type of a function type; `None` when void or absent.
    fn result_type(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// The `index`-th argument type of a function type.
    fn argument_type(&self, ty: &Self::Type, index: usize) -> Option<Self::Type>;
}

// ============================================================================
// Tests
// ============================================================================
