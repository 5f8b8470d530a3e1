//! Symbol registry: the durable, deduplicated symbol tables of one scan.
//!
//! The registry exclusively owns every namespace, class, enum, function and
//! resolved-type record for the lifetime of a traversal session. Merge
//! policy by fully-qualified name:
//! - namespaces collapse into one record, accumulating cursors
//! - a repeated class full name refreshes an empty (forward) record or is
//!   remembered as a duplicate of a populated one, never re-inserted
//! - a repeated enum full name is ignored outright
//!
//! Identity of "the same declaration seen again" goes through the provider's
//! cursor-equality primitive ([`CursorEq`]); structural equality is never
//! used, since two distinct forward declarations look identical.

use crate::provider::CursorEq;
use crate::summary::ScanSummary;
use crate::types::{
    enclosing_scope, join_scopes, split_scopes, Class, ClassKind, Enum, Function, Namespace,
    ResolvedType, TypeKind, Visibility,
};

// ============================================================================
// Entries
// ============================================================================

/// Outcome of registering a class declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassInsertion {
    /// Brand-new full name; a type record was registered alongside it.
    Inserted,
    /// Same full name as an existing forward declaration; origin metadata
    /// was refreshed and the definition should be descended into.
    RefreshedForward,
    /// Same full name as an already-populated record; remembered for
    /// identity only, members must not be counted again.
    Duplicate,
}

/// A namespace with the cursors it was declared through.
#[derive(Debug, Clone)]
pub struct NamespaceEntry<C> {
    pub namespace: Namespace,
    cursors: Vec<C>,
}

/// A class with its known cursors and the access level the traversal is
/// currently at inside it.
#[derive(Debug, Clone)]
pub struct ClassEntry<C> {
    pub class: Class,
    /// Traversal bookkeeping: access specifier in effect for the next
    /// member event. Defaults to public for structs, private for classes.
    pub current_access: Visibility,
    cursors: Vec<C>,
}

/// An enum with its declaring cursor.
#[derive(Debug, Clone)]
pub struct EnumEntry<C> {
    pub decl: Enum,
    cursor: C,
}

// ============================================================================
// Registry
// ============================================================================

/// The symbol database for one traversal session.
#[derive(Debug)]
pub struct SymbolRegistry<C> {
    types: Vec<ResolvedType>,
    namespaces: Vec<NamespaceEntry<C>>,
    classes: Vec<ClassEntry<C>>,
    enums: Vec<EnumEntry<C>>,
    functions: Vec<Function>,
}

impl<C> Default for SymbolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SymbolRegistry<C> {
    pub fn new() -> Self {
        SymbolRegistry {
            types: Vec::new(),
            namespaces: Vec::new(),
            classes: Vec::new(),
            enums: Vec::new(),
            functions: Vec::new(),
        }
    }

    // ---- type table --------------------------------------------------------

    pub fn types(&self) -> &[ResolvedType] {
        &self.types
    }

    pub fn push_type(&mut self, record: ResolvedType) {
        self.types.push(record);
    }

    /// Whether an identical type record is already registered.
    pub fn has_type_record(&self, record: &ResolvedType) -> bool {
        self.types.iter().any(|entry| entry.same_record(record))
    }

    // ---- registration ------------------------------------------------------

    /// Register a namespace declaration, collapsing repeats by full name.
    /// Returns the namespace's fully-qualified name.
    pub fn register_namespace(
        &mut self,
        name: &str,
        parent_scope: Option<&str>,
        cursor: C,
    ) -> String {
        let full_name = format!("{}::{}", parent_scope.unwrap_or(""), name);
        match self
            .namespaces
            .iter_mut()
            .find(|entry| entry.namespace.full_name == full_name)
        {
            Some(entry) => entry.cursors.push(cursor),
            None => self.namespaces.push(NamespaceEntry {
                namespace: Namespace {
                    name: name.to_string(),
                    full_name: full_name.clone(),
                },
                cursors: vec![cursor],
            }),
        }
        full_name
    }

    /// Register a class declaration under the merge policy for forward
    /// declarations. A brand-new full name also registers a type record so
    /// later references resolve against it.
    pub fn insert_class(&mut self, class: Class, cursor: C) -> ClassInsertion {
        if let Some(index) = self.class_index_by_full_name(&class.full_name) {
            let entry = &mut self.classes[index];
            let outcome = if entry.class.is_empty() {
                entry.class.from_file = class.from_file;
                entry.class.include_path = class.include_path;
                ClassInsertion::RefreshedForward
            } else {
                ClassInsertion::Duplicate
            };
            entry.cursors.push(cursor);
            return outcome;
        }
        let kind = match class.kind {
            ClassKind::Struct => TypeKind::Struct,
            ClassKind::Class => TypeKind::Class,
        };
        self.types.push(ResolvedType {
            raw_name: class.name.clone(),
            name: class.name.clone(),
            scopes: split_scopes(&class.enclosing_scope()),
            full_name: class.full_name.clone(),
            kind,
            ..ResolvedType::default()
        });
        let current_access = match class.kind {
            ClassKind::Struct => Visibility::Public,
            ClassKind::Class => Visibility::Private,
        };
        self.classes.push(ClassEntry {
            class,
            current_access,
            cursors: vec![cursor],
        });
        ClassInsertion::Inserted
    }

    /// Register an enum and its type record. A later re-declaration with
    /// the same full name is ignored, not merged; returns whether the enum
    /// was new.
    pub fn register_enum(&mut self, decl: Enum, cursor: C) -> bool {
        if self
            .enums
            .iter()
            .any(|entry| entry.decl.full_name == decl.full_name)
        {
            return false;
        }
        self.types.push(ResolvedType {
            raw_name: decl.name.clone(),
            name: decl.name.clone(),
            scopes: split_scopes(&enclosing_scope(&decl.full_name)),
            full_name: decl.full_name.clone(),
            kind: TypeKind::Enum,
            ..ResolvedType::default()
        });
        self.enums.push(EnumEntry { decl, cursor });
        true
    }

    /// Append a constant to the enum at `index`, preserving insertion order.
    pub fn add_enum_constant(&mut self, index: usize, name: String, value: i64) {
        if let Some(entry) = self.enums.get_mut(index) {
            entry.decl.constants.push((name, value));
        }
    }

    /// Register a free function. Returns its index for later template
    /// parameter attachment.
    pub fn register_function(&mut self, function: Function) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    pub fn function_mut(&mut self, index: usize) -> Option<&mut Function> {
        self.functions.get_mut(index)
    }

    // ---- lookups -----------------------------------------------------------

    pub fn class_index_by_full_name(&self, full_name: &str) -> Option<usize> {
        self.classes
            .iter()
            .position(|entry| entry.class.full_name == full_name)
    }

    pub fn class_by_full_name(&self, full_name: &str) -> Option<&ClassEntry<C>> {
        self.class_index_by_full_name(full_name)
            .map(|index| &self.classes[index])
    }

    pub fn has_class(&self, full_name: &str) -> bool {
        self.class_index_by_full_name(full_name).is_some()
    }

    pub fn class_entry(&self, index: usize) -> &ClassEntry<C> {
        &self.classes[index]
    }

    pub fn class_entry_mut(&mut self, index: usize) -> &mut ClassEntry<C> {
        &mut self.classes[index]
    }

    /// Index of the class one of whose declaration cursors equals `cursor`.
    pub fn class_for_cursor<E: CursorEq<Cursor = C>>(
        &self,
        identity: &E,
        cursor: &C,
    ) -> Option<usize> {
        self.classes.iter().position(|entry| {
            entry
                .cursors
                .iter()
                .any(|known| identity.cursors_equal(known, cursor))
        })
    }

    /// Index of the enum whose declaring cursor equals `cursor`.
    pub fn enum_for_cursor<E: CursorEq<Cursor = C>>(
        &self,
        identity: &E,
        cursor: &C,
    ) -> Option<usize> {
        self.enums
            .iter()
            .position(|entry| identity.cursors_equal(&entry.cursor, cursor))
    }

    /// Fully-qualified name of the namespace or class declared by `cursor`,
    /// when one is registered. Namespaces win over classes, matching how
    /// enclosing scopes are derived for nested declarations.
    pub fn scope_name_for_cursor<E: CursorEq<Cursor = C>>(
        &self,
        identity: &E,
        cursor: &C,
    ) -> Option<String> {
        for entry in &self.namespaces {
            if entry
                .cursors
                .iter()
                .any(|known| identity.cursors_equal(known, cursor))
            {
                return Some(entry.namespace.full_name.clone());
            }
        }
        for entry in &self.classes {
            if entry
                .cursors
                .iter()
                .any(|known| identity.cursors_equal(known, cursor))
            {
                return Some(entry.class.full_name.clone());
            }
        }
        None
    }

    /// Resolve an unqualified or partially-qualified symbol by walking up
    /// the enclosing scope: try `scope::name`, strip the innermost scope
    /// component, retry, down to the global scope.
    ///
    /// Models enclosing-scope name lookup for base-class clauses; no
    /// using-directives, no argument-dependent lookup.
    pub fn find_class_like(
        &self,
        symbol_name: &str,
        enclosing_scope: &str,
    ) -> Option<&ClassEntry<C>> {
        let mut parts = split_scopes(enclosing_scope);
        loop {
            let candidate = format!("{}::{}", join_scopes(&parts), symbol_name);
            if let Some(entry) = self.class_by_full_name(&candidate) {
                return Some(entry);
            }
            if parts.is_empty() {
                return None;
            }
            parts.pop();
        }
    }

    // ---- read-only views -----------------------------------------------

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter().map(|entry| &entry.namespace)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter().map(|entry| &entry.class)
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.enums.iter().map(|entry| &entry.decl)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            types: self.types.len(),
            classes: self.classes.len(),
            enums: self.enums.len(),
            functions: self.functions.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
