//! Type resolution engine.
//!
//! Turns a raw type reference (a provider type handle or a free-form scoped
//! spelling) into a canonical [`ResolvedType`]: qualifiers are stripped into
//! depth counters, the remaining name is matched against the registered
//! type table, and typedef chains are unwound with qualifier accumulation.
//!
//! Resolution fails open: an unmatched reference produces an
//! [`TypeKind::Unresolved`] record carrying a best-effort printable label,
//! never an error. The single loud failure in this module is building a
//! parameter from an invalid type handle, which breaks the provider's own
//! contract.

use tracing::warn;

use crate::provider::{AstProvider, TypeShape};
use crate::types::{split_scopes, Parameter, ResolvedType, TypeKind};

// ============================================================================
// Raw Reference Loading
// ============================================================================

/// Load a resolved-type skeleton from a provider type handle.
///
/// Pointer and reference wrapping is unwrapped one layer at a time,
/// incrementing the respective depth counter; `const` observed on any layer
/// sets the const flag. Primitives map through the fixed name table. Named
/// references are parsed into scope components but not yet matched, so the
/// returned record stays [`TypeKind::Unresolved`] until [`find_parent`]
/// succeeds.
pub fn type_from_handle<P: AstProvider>(provider: &P, handle: &P::Type) -> ResolvedType {
    let mut resolved = ResolvedType::default();
    let mut current = handle.clone();
    loop {
        if provider.is_const_qualified(&current) {
            resolved.is_const = true;
        }
        match provider.type_shape(&current) {
            TypeShape::Pointer => match provider.pointee_type(&current) {
                Some(inner) => {
                    resolved.pointer_depth += 1;
                    current = inner;
                }
                None => {
                    resolved.raw_name = provider.type_spelling(&current);
                    return resolved;
                }
            },
            TypeShape::LValueReference | TypeShape::RValueReference => {
                match provider.pointee_type(&current) {
                    Some(inner) => {
                        resolved.reference_depth += 1;
                        current = inner;
                    }
                    None => {
                        resolved.raw_name = provider.type_spelling(&current);
                        return resolved;
                    }
                }
            }
            TypeShape::Primitive(primitive) => {
                resolved.raw_name = provider.type_spelling(&current);
                resolved.name = primitive.name().to_string();
                resolved.full_name = primitive.name().to_string();
                resolved.kind = TypeKind::Primitive;
                return resolved;
            }
            TypeShape::Named => {
                let spelling = provider.type_spelling(&current);
                apply_spelling(&mut resolved, &spelling);
                return resolved;
            }
            TypeShape::Invalid => {
                resolved.raw_name = provider.type_spelling(&current);
                return resolved;
            }
        }
    }
}

/// Load a resolved-type skeleton from a free-form scoped spelling, e.g. the
/// written form of a typedef's underlying type.
pub fn type_from_spelling(spelling: &str) -> ResolvedType {
    let mut resolved = ResolvedType::default();
    apply_spelling(&mut resolved, spelling);
    resolved
}

/// Parse a type spelling into name, scope components and qualifiers.
///
/// Handles indirection written into the spelling itself (`S*&`), template
/// arguments (truncated at the first bracket) and leading
/// `const`/`struct`/`class`/`enum` keywords.
fn apply_spelling(resolved: &mut ResolvedType, spelling: &str) {
    resolved.raw_name = spelling.to_string();
    let mut text = spelling.trim().to_string();
    loop {
        if let Some(stripped) = text.strip_suffix('*') {
            resolved.pointer_depth += 1;
            text = stripped.trim_end().to_string();
        } else if let Some(stripped) = text.strip_suffix('&') {
            resolved.reference_depth += 1;
            text = stripped.trim_end().to_string();
        } else {
            break;
        }
    }
    if let Some(bracket) = text.find('<') {
        text.truncate(bracket);
    }
    let mut rest = text.trim();
    loop {
        if let Some(stripped) = rest.strip_prefix("const ") {
            resolved.is_const = true;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix("struct ") {
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix("class ") {
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix("enum ") {
            rest = stripped.trim_start();
        } else {
            break;
        }
    }
    let mut parts = split_scopes(rest);
    resolved.name = parts.pop().unwrap_or_default();
    resolved.scopes = parts;
}

// ============================================================================
// Scope Matching
// ============================================================================

/// Exact match of (scope path, name) against the registered type table.
///
/// Fails open: a miss returns `None` and the caller keeps a best-effort
/// label instead of raising.
pub fn find_parent<'a>(
    candidate: &ResolvedType,
    known: &'a [ResolvedType],
) -> Option<&'a ResolvedType> {
    known
        .iter()
        .find(|entry| entry.name == candidate.name && entry.scopes == candidate.scopes)
}

/// Canonical printable name for a reference: the matched declaration's full
/// name when one exists, trying the declaration scope as a prefix first,
/// otherwise the best-effort joined label.
pub fn canonical_name(candidate: &ResolvedType, known: &[ResolvedType]) -> String {
    if !candidate.declaration_scope.is_empty() {
        let mut prefixed = candidate.clone();
        prefixed.scopes = candidate
            .declaration_scope
            .iter()
            .chain(&candidate.scopes)
            .cloned()
            .collect();
        if let Some(parent) = find_parent(&prefixed, known) {
            return parent.full_name.clone();
        }
    }
    if let Some(parent) = find_parent(candidate, known) {
        return parent.full_name.clone();
    }
    if candidate.kind == TypeKind::Primitive {
        return candidate.name.clone();
    }
    candidate.scoped_name()
}

// ============================================================================
// Parameter Construction
// ============================================================================

/// Build a parameter from a provider type handle.
///
/// Qualifiers from the written reference and from the matched declaration
/// accumulate: pointer/reference depths add up and const flags combine, so
/// a pointer typedef to a reference type keeps every level of indirection.
///
/// # Panics
///
/// Panics when the handle reports an invalid type. The provider guaranteed
/// a valid type for this cursor; degrading silently here would corrupt
/// signatures downstream.
pub fn parameter_from_handle<P: AstProvider>(
    provider: &P,
    name: impl Into<String>,
    handle: &P::Type,
    known: &[ResolvedType],
) -> Parameter {
    assert!(
        provider.type_shape(handle) != TypeShape::Invalid,
        "parameter built from an invalid type handle"
    );
    let resolved = type_from_handle(provider, handle);
    let mut parameter = Parameter {
        name: name.into(),
        is_const: resolved.is_const,
        pointer_depth: resolved.pointer_depth,
        reference_depth: resolved.reference_depth,
        ..Parameter::default()
    };
    if resolved.kind == TypeKind::Primitive {
        parameter.type_name = resolved.name;
        return parameter;
    }
    parameter.type_alias = Some(resolved.name.clone());
    match find_parent(&resolved, known) {
        Some(parent) => {
            parameter.type_name = parent.full_name.clone();
            parameter.is_const |= parent.is_const;
            parameter.pointer_depth += parent.pointer_depth;
            parameter.reference_depth += parent.reference_depth;
        }
        None => parameter.type_name = resolved.scoped_name(),
    }
    parameter
}

// ============================================================================
// Typedef Chains
// ============================================================================

/// Resolve a typedef declaration into a registrable type record.
///
/// The underlying type is matched twice: first with the declaring scope
/// prefixed onto the written scope components, then as written. Qualifiers
/// from the alias, the written reference and the matched target all
/// accumulate. When both passes miss, the record keeps a best-effort joined
/// label and is marked [`TypeKind::Unresolved`] so consumers can tell a
/// guessed name from a resolved one.
pub fn resolve_typedef<P: AstProvider>(
    provider: &P,
    alias_handle: &P::Type,
    underlying_handle: &P::Type,
    usage_scope: &str,
    known: &[ResolvedType],
) -> ResolvedType {
    let written = type_from_handle(provider, underlying_handle);
    let mut alias = type_from_handle(provider, alias_handle);
    alias.kind = TypeKind::Typedef;

    let mut prefixed = written.clone();
    prefixed.scopes = split_scopes(usage_scope)
        .into_iter()
        .chain(written.scopes.iter().cloned())
        .collect();

    match find_parent(&prefixed, known).or_else(|| find_parent(&written, known)) {
        Some(parent) => {
            alias.full_name = parent.full_name.clone();
            alias.is_const |= parent.is_const;
            alias.pointer_depth += parent.pointer_depth;
            alias.reference_depth += parent.reference_depth;
        }
        None => {
            let guess = type_from_spelling(&provider.type_spelling(underlying_handle));
            alias.full_name = guess.scoped_name();
            alias.kind = TypeKind::Unresolved;
            warn!(
                alias = %alias.scoped_name(),
                label = %alias.full_name,
                "typedef target not registered; keeping best-effort label"
            );
        }
    }
    alias.declaration_scope = prefixed.scopes;
    alias.is_const |= written.is_const;
    alias.pointer_depth += written.pointer_depth;
    alias.reference_depth += written.reference_depth;
    alias
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::join_scopes;

    fn registered(name: &str, scopes: &[&str], full_name: &str, kind: TypeKind) -> ResolvedType {
        ResolvedType {
            name: name.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            full_name: full_name.to_string(),
            kind,
            ..ResolvedType::default()
        }
    }

    mod spelling {
        use super::*;

        #[test]
        fn parses_scoped_names() {
            let rt = type_from_spelling("N::S");
            assert_eq!(rt.scopes, vec!["N"]);
            assert_eq!(rt.name, "S");
            assert_eq!(rt.raw_name, "N::S");
            assert_eq!(rt.kind, TypeKind::Unresolved);
        }

        #[test]
        fn strips_keywords_and_const() {
            let rt = type_from_spelling("const struct N::S");
            assert!(rt.is_const);
            assert_eq!(rt.scopes, vec!["N"]);
            assert_eq!(rt.name, "S");
        }

        #[test]
        fn counts_written_indirection() {
            let rt = type_from_spelling("N::S *&");
            assert_eq!(rt.pointer_depth, 1);
            assert_eq!(rt.reference_depth, 1);
            assert_eq!(rt.name, "S");
        }

        #[test]
        fn truncates_template_arguments() {
            let rt = type_from_spelling("N::Box<int, N::S>");
            assert_eq!(rt.name, "Box");
            assert_eq!(rt.scopes, vec!["N"]);
        }
    }

    mod matching {
        use super::*;

        #[test]
        fn find_parent_needs_exact_scope_and_name() {
            let known = vec![registered("S", &["N"], "::N::S", TypeKind::Struct)];
            let hit = type_from_spelling("N::S");
            assert!(find_parent(&hit, &known).is_some());

            let wrong_scope = type_from_spelling("M::S");
            assert!(find_parent(&wrong_scope, &known).is_none());

            let unqualified = type_from_spelling("S");
            assert!(find_parent(&unqualified, &known).is_none());
        }

        #[test]
        fn canonical_name_prefers_declaration_scope() {
            let known = vec![registered("S", &["N"], "::N::S", TypeKind::Struct)];
            let mut candidate = type_from_spelling("S");
            candidate.declaration_scope = vec!["N".to_string()];
            assert_eq!(canonical_name(&candidate, &known), "::N::S");
        }

        #[test]
        fn canonical_name_falls_back_to_joined_label() {
            let candidate = type_from_spelling("M::Unknown");
            assert_eq!(canonical_name(&candidate, &[]), "::M::Unknown");
            assert_eq!(
                candidate.scoped_name(),
                format!("{}::{}", join_scopes(&candidate.scopes), candidate.name)
            );
        }

        #[test]
        fn canonical_name_of_primitive_is_its_spelling() {
            let mut candidate = ResolvedType {
                name: "int".to_string(),
                full_name: "int".to_string(),
                kind: TypeKind::Primitive,
                ..ResolvedType::default()
            };
            candidate.declaration_scope = vec!["N".to_string()];
            assert_eq!(canonical_name(&candidate, &[]), "int");
        }
    }
}
