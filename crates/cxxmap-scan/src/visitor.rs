//! Declaration visitor.
//!
//! [`Scanner`] consumes the provider's depth-first `(cursor, parent)` stream
//! one event at a time and translates it into registry operations. It never
//! sees the tree whole, so cross-event state lives in two single-slot
//! contexts:
//! - the class-template slot, armed when a class template parameter is
//!   seen, consumed by the immediately following type reference (the
//!   parameter's default)
//! - the invokable slot, pointing at the most recently registered
//!   function-like declaration, which collects template parameters and
//!   their defaults delivered as later sibling events
//!
//! Arming a new context or hitting any unrelated declaration drops the old
//! one. Each slot holds an index into the registry, never a borrow, so the
//! registry stays exclusively owned by the scanner between events.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use cxxmap_core::provider::{AstProvider, CursorKind, VisitAction};
use cxxmap_core::registry::{ClassInsertion, SymbolRegistry};
use cxxmap_core::resolve::{
    canonical_name, parameter_from_handle, resolve_typedef, type_from_handle,
};
use cxxmap_core::types::{
    split_scopes, Class, ClassKind, Enum, Field, Function, Invokable, Method, TemplateParameter,
    Visibility,
};

// ============================================================================
// Pending Contexts
// ============================================================================

/// The function-like declaration that later template-vocabulary events
/// attach to. Indices stay valid because registry lists are append-only
/// during a scan.
#[derive(Debug, Clone, Copy)]
enum InvokableSlot {
    Method {
        class: usize,
        ctor: bool,
        index: usize,
    },
    Function {
        index: usize,
    },
}

// ============================================================================
// Scanner
// ============================================================================

/// Cursor-stream state machine over one [`SymbolRegistry`].
///
/// One scanner instance spans every translation unit of a scan, so symbols
/// merge across files instead of per file.
pub struct Scanner<'p, P: AstProvider> {
    provider: &'p P,
    registry: SymbolRegistry<P::Cursor>,
    roots: Vec<PathBuf>,
    class_template_slot: Option<usize>,
    invokable_slot: Option<InvokableSlot>,
    visited: u64,
}

impl<'p, P: AstProvider> Scanner<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Scanner {
            provider,
            registry: SymbolRegistry::new(),
            roots: Vec::new(),
            class_template_slot: None,
            invokable_slot: None,
            visited: 0,
        }
    }

    pub fn provider(&self) -> &'p P {
        self.provider
    }

    /// Restrict the scan to declarations under `root`. With no roots
    /// configured every declaration is taken, which keeps small scans and
    /// tests free of setup.
    pub fn add_include_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        let canonical = fs::canonicalize(&root).unwrap_or(root);
        self.roots.push(canonical);
    }

    pub fn registry(&self) -> &SymbolRegistry<P::Cursor> {
        &self.registry
    }

    pub fn into_registry(self) -> SymbolRegistry<P::Cursor> {
        self.registry
    }

    /// Number of cursor events consumed so far.
    pub fn visited(&self) -> u64 {
        self.visited
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handle one `(cursor, parent)` event and steer the traversal.
    pub fn visit(&mut self, cursor: P::Cursor, parent: P::Cursor) -> VisitAction {
        self.visited += 1;

        let file = self.provider.source_file(&cursor);
        if !self.is_included(&file) {
            return VisitAction::Continue;
        }

        // A class template parameter arms this slot; the very next event
        // either is the parameter's default or ends the context.
        if let Some(class_index) = self.class_template_slot.take() {
            if self.provider.cursor_kind(&cursor) == CursorKind::TypeRef {
                self.apply_class_template_default(class_index, &cursor);
                return VisitAction::Continue;
            }
        }

        if let Some(action) = self.try_visit_template_vocabulary(&cursor, &parent) {
            return action;
        }

        let kind = self.provider.cursor_kind(&cursor);
        match kind {
            CursorKind::Namespace => self.visit_namespace(&cursor, &parent),
            CursorKind::Typedef => self.visit_typedef(&cursor, &parent),
            CursorKind::Enum => self.visit_enum(&cursor, &parent),
            CursorKind::EnumConstant => self.visit_enum_constant(&cursor, &parent),
            CursorKind::Struct | CursorKind::Class | CursorKind::ClassTemplate => {
                self.visit_class(&cursor, &parent)
            }
            _ => {
                if let Some(class_index) = self.registry.class_for_cursor(self.provider, &parent) {
                    return self.visit_class_member(kind, class_index, &cursor);
                }
                match kind {
                    CursorKind::Function => self.visit_function(&cursor, &parent, false),
                    CursorKind::FunctionTemplate => self.visit_function(&cursor, &parent, true),
                    _ => {
                        trace!(?kind, "unhandled declaration kind");
                        VisitAction::Continue
                    }
                }
            }
        }
    }

    /// Template parameters and their defaults arrive as loose sibling
    /// events after the declaration they belong to; route them into the
    /// pending invokable. Returns `None` when the event is not template
    /// vocabulary, after dropping the context.
    fn try_visit_template_vocabulary(
        &mut self,
        cursor: &P::Cursor,
        parent: &P::Cursor,
    ) -> Option<VisitAction> {
        self.invokable_slot?;
        match self.provider.cursor_kind(cursor) {
            CursorKind::TemplateTypeParameter => {
                let param = TemplateParameter::typename(self.provider.spelling(cursor));
                self.with_pending_invokable(|invokable| invokable.template_params.push(param));
                Some(VisitAction::Continue)
            }
            CursorKind::TypeRef => {
                if let Some(value) = self.solve_type_ref(cursor, parent) {
                    let mut awaiting_default = false;
                    self.with_pending_invokable(|invokable| {
                        if let Some(param) = invokable.template_params.last_mut() {
                            if param.default_value.is_none() {
                                awaiting_default = true;
                                apply_template_default(param, value);
                            }
                        }
                    });
                    // a reference past the last default belongs to the
                    // declaration body, not the parameter list
                    if !awaiting_default {
                        self.invokable_slot = None;
                    }
                }
                Some(VisitAction::Continue)
            }
            CursorKind::NamespaceRef => Some(VisitAction::Continue),
            _ => {
                self.invokable_slot = None;
                None
            }
        }
    }

    // ========================================================================
    // Scoping Declarations
    // ========================================================================

    fn visit_namespace(&mut self, cursor: &P::Cursor, parent: &P::Cursor) -> VisitAction {
        let name = self.provider.spelling(cursor);
        let parent_scope = self.parent_scope(parent);
        self.registry
            .register_namespace(&name, parent_scope.as_deref(), cursor.clone());
        VisitAction::Recurse
    }

    fn visit_class(&mut self, cursor: &P::Cursor, parent: &P::Cursor) -> VisitAction {
        let name = self.provider.spelling(cursor);
        let full_name = match self.provider.cursor_kind(parent) {
            CursorKind::TranslationUnit => format!("::{name}"),
            _ => {
                if let Some(parent_index) =
                    self.registry.class_for_cursor(self.provider, parent)
                {
                    let entry = self.registry.class_entry(parent_index);
                    // Nested types are only reachable through their owner,
                    // so a non-public one never enters the database.
                    if entry.current_access != Visibility::Public {
                        return VisitAction::Continue;
                    }
                    format!("{}::{name}", entry.class.full_name)
                } else if let Some(scope) =
                    self.registry.scope_name_for_cursor(self.provider, parent)
                {
                    format!("{scope}::{name}")
                } else {
                    warn!(%name, "class declared in unregistered scope, skipping");
                    return VisitAction::Continue;
                }
            }
        };

        let kind = match self.provider.cursor_kind(cursor) {
            CursorKind::Class | CursorKind::ClassTemplate => ClassKind::Class,
            _ => ClassKind::Struct,
        };
        let from_file = self.provider.source_file(cursor);
        let include_path = self.relative_path(&from_file);
        let class = Class {
            name,
            full_name,
            kind,
            from_file,
            include_path,
            ..Class::default()
        };

        match self.registry.insert_class(class, cursor.clone()) {
            ClassInsertion::Inserted => {
                // a new type declaration ends any pending function context
                self.invokable_slot = None;
                VisitAction::Recurse
            }
            ClassInsertion::RefreshedForward => VisitAction::Recurse,
            ClassInsertion::Duplicate => VisitAction::Continue,
        }
    }

    // ========================================================================
    // Class Members
    // ========================================================================

    fn visit_class_member(
        &mut self,
        kind: CursorKind,
        class_index: usize,
        cursor: &P::Cursor,
    ) -> VisitAction {
        match kind {
            CursorKind::TemplateTypeParameter => {
                let param = TemplateParameter::typename(self.provider.spelling(cursor));
                self.registry
                    .class_entry_mut(class_index)
                    .class
                    .template_params
                    .push(param);
                self.class_template_slot = Some(class_index);
                VisitAction::Recurse
            }
            CursorKind::BaseSpecifier => self.visit_base_class(class_index, cursor),
            CursorKind::AccessSpecifier => {
                self.registry.class_entry_mut(class_index).current_access =
                    self.provider.access_specifier(cursor);
                VisitAction::Recurse
            }
            CursorKind::Constructor => self.visit_method(class_index, cursor, true),
            CursorKind::Method | CursorKind::FunctionTemplate => {
                self.visit_method(class_index, cursor, false)
            }
            CursorKind::Field => self.visit_field(class_index, cursor, false),
            // a VarDecl member is a static data member
            CursorKind::Variable => self.visit_field(class_index, cursor, true),
            _ => VisitAction::Recurse,
        }
    }

    fn visit_base_class(&mut self, class_index: usize, cursor: &P::Cursor) -> VisitAction {
        let written = self.provider.spelling(cursor);
        let symbol = normalize_base_specifier(&written);
        let declaring = self.registry.class_entry(class_index).class.full_name.clone();
        let resolved = self
            .registry
            .find_class_like(&symbol, &declaring)
            .map(|entry| entry.class.full_name.clone());

        let entry = self.registry.class_entry_mut(class_index);
        match resolved {
            Some(full_name) => {
                entry.class.bases.push(full_name.clone());
                entry.class.known_bases.push(full_name);
            }
            None => {
                warn!(base = %written, class = %entry.class.full_name, "base class not registered");
                entry.class.bases.push(symbol);
            }
        }
        VisitAction::Recurse
    }

    fn visit_method(&mut self, class_index: usize, cursor: &P::Cursor, ctor: bool) -> VisitAction {
        let invokable = self.create_invokable(cursor);
        let method = Method {
            name: self.provider.spelling(cursor),
            visibility: self.registry.class_entry(class_index).current_access,
            is_static: self.provider.is_static_method(cursor),
            is_virtual: self.provider.is_virtual_method(cursor),
            is_pure_virtual: self.provider.is_pure_virtual_method(cursor),
            is_const: self.provider.is_const_method(cursor),
            invokable,
        };

        let entry = self.registry.class_entry_mut(class_index);
        let list = if ctor {
            &mut entry.class.constructors
        } else {
            &mut entry.class.methods
        };
        list.push(method);
        self.invokable_slot = Some(InvokableSlot::Method {
            class: class_index,
            ctor,
            index: list.len() - 1,
        });
        VisitAction::Recurse
    }

    fn visit_field(&mut self, class_index: usize, cursor: &P::Cursor, is_static: bool) -> VisitAction {
        let Some(handle) = self.provider.cursor_type(cursor) else {
            return VisitAction::Continue;
        };
        let name = self.provider.spelling(cursor);
        let parameter = parameter_from_handle(self.provider, name, &handle, self.registry.types());
        let visibility = self.registry.class_entry(class_index).current_access;

        let field = Field {
            parameter,
            is_static,
            visibility,
        };
        let entry = self.registry.class_entry_mut(class_index);
        // fields compare by name; the first declaration wins
        if !entry.class.fields.contains(&field) {
            entry.class.fields.push(field);
        }
        VisitAction::Continue
    }

    // ========================================================================
    // Enums and Typedefs
    // ========================================================================

    fn visit_enum(&mut self, cursor: &P::Cursor, parent: &P::Cursor) -> VisitAction {
        let name = self.provider.spelling(cursor);
        let scope = self.parent_scope(parent).unwrap_or_default();
        let decl = Enum {
            full_name: format!("{scope}::{name}"),
            name,
            from_file: self.provider.source_file(cursor),
            constants: Vec::new(),
        };
        if self.registry.register_enum(decl, cursor.clone()) {
            VisitAction::Recurse
        } else {
            debug!(enum_name = %self.provider.spelling(cursor), "enum re-declared, ignoring");
            VisitAction::Continue
        }
    }

    fn visit_enum_constant(&mut self, cursor: &P::Cursor, parent: &P::Cursor) -> VisitAction {
        if let Some(index) = self.registry.enum_for_cursor(self.provider, parent) {
            self.registry.add_enum_constant(
                index,
                self.provider.spelling(cursor),
                self.provider.enum_constant_value(cursor),
            );
        }
        VisitAction::Recurse
    }

    fn visit_typedef(&mut self, cursor: &P::Cursor, parent: &P::Cursor) -> VisitAction {
        let Some(usage_scope) = self.parent_scope_or_global(parent) else {
            warn!(
                name = %self.provider.spelling(cursor),
                "typedef in unregistered scope, skipping"
            );
            return VisitAction::Continue;
        };
        let (Some(alias), Some(underlying)) = (
            self.provider.cursor_type(cursor),
            self.provider.typedef_underlying_type(cursor),
        ) else {
            return VisitAction::Continue;
        };

        let record = resolve_typedef(
            self.provider,
            &alias,
            &underlying,
            &usage_scope,
            self.registry.types(),
        );
        if !self.registry.has_type_record(&record) {
            self.registry.push_type(record);
        }
        VisitAction::Continue
    }

    // ========================================================================
    // Free Functions
    // ========================================================================

    fn visit_function(
        &mut self,
        cursor: &P::Cursor,
        parent: &P::Cursor,
        is_template: bool,
    ) -> VisitAction {
        let name = self.provider.spelling(cursor);
        let Some(scope) = self.parent_scope_or_global(parent) else {
            trace!(%name, "free function in unregistered scope, skipping");
            return VisitAction::Continue;
        };
        let full_name = format!("{scope}::{name}");
        let invokable = self.create_invokable(cursor);

        // headers are re-parsed per translation unit; an identical
        // signature is the same declaration seen again
        let duplicate = self.registry.functions().iter().any(|known| {
            known.full_name == full_name && known.invokable.params == invokable.params
        });
        if duplicate {
            return VisitAction::Continue;
        }

        let from_file = self.provider.source_file(cursor);
        let function = Function {
            name,
            full_name,
            include_path: self.relative_path(&from_file),
            from_file,
            invokable,
        };
        let index = self.registry.register_function(function);
        self.invokable_slot = Some(InvokableSlot::Function { index });
        if is_template {
            VisitAction::Recurse
        } else {
            VisitAction::Continue
        }
    }

    // ========================================================================
    // Signature and Reference Construction
    // ========================================================================

    /// Build the signature of a function-like cursor: return slot, then
    /// arguments in order. Argument names come from the argument cursors
    /// when the provider has them; synthesized signatures fall back to the
    /// bare argument types.
    fn create_invokable(&self, cursor: &P::Cursor) -> Invokable {
        let mut invokable = Invokable {
            is_variadic: self.provider.is_variadic(cursor),
            ..Invokable::default()
        };
        let Some(fn_type) = self.provider.cursor_type(cursor) else {
            return invokable;
        };
        if let Some(result) = self.provider.result_type(&fn_type) {
            invokable.return_type = Some(parameter_from_handle(
                self.provider,
                "",
                &result,
                self.registry.types(),
            ));
        }
        let mut index = 0;
        while let Some(arg_type) = self.provider.argument_type(&fn_type, index) {
            let parameter = match self.provider.argument_cursor(cursor, index) {
                Some(arg_cursor) => {
                    let name = self.provider.spelling(&arg_cursor);
                    let handle = self
                        .provider
                        .cursor_type(&arg_cursor)
                        .unwrap_or(arg_type);
                    parameter_from_handle(self.provider, name, &handle, self.registry.types())
                }
                None => parameter_from_handle(self.provider, "", &arg_type, self.registry.types()),
            };
            invokable.params.push(parameter);
            index += 1;
        }
        invokable
    }

    /// Canonical name of the type a `TypeRef` points at, matched against
    /// the registered table with the parent's scope as a retry prefix.
    fn solve_type_ref(&self, cursor: &P::Cursor, parent: &P::Cursor) -> Option<String> {
        let handle = self.provider.cursor_type(cursor)?;
        let mut reference = type_from_handle(self.provider, &handle);
        if let Some(scope) = self.registry.scope_name_for_cursor(self.provider, parent) {
            reference.declaration_scope = split_scopes(&scope);
        }
        Some(canonical_name(&reference, self.registry.types()))
    }

    fn apply_class_template_default(&mut self, class_index: usize, cursor: &P::Cursor) {
        let Some(handle) = self.provider.cursor_type(cursor) else {
            return;
        };
        let mut reference = type_from_handle(self.provider, &handle);
        let scope = self.registry.class_entry(class_index).class.enclosing_scope();
        reference.declaration_scope = split_scopes(&scope);
        let value = canonical_name(&reference, self.registry.types());

        let entry = self.registry.class_entry_mut(class_index);
        if let Some(param) = entry.class.template_params.last_mut() {
            apply_template_default(param, value);
        }
    }

    fn with_pending_invokable(&mut self, apply: impl FnOnce(&mut Invokable)) {
        match self.invokable_slot {
            Some(InvokableSlot::Method { class, ctor, index }) => {
                let entry = self.registry.class_entry_mut(class);
                let list = if ctor {
                    &mut entry.class.constructors
                } else {
                    &mut entry.class.methods
                };
                if let Some(method) = list.get_mut(index) {
                    apply(&mut method.invokable);
                }
            }
            Some(InvokableSlot::Function { index }) => {
                if let Some(function) = self.registry.function_mut(index) {
                    apply(&mut function.invokable);
                }
            }
            None => {}
        }
    }

    // ========================================================================
    // Scopes and Paths
    // ========================================================================

    /// Registered scope of `parent`, `None` at translation-unit level.
    fn parent_scope(&self, parent: &P::Cursor) -> Option<String> {
        match self.provider.cursor_kind(parent) {
            CursorKind::TranslationUnit => None,
            _ => self.registry.scope_name_for_cursor(self.provider, parent),
        }
    }

    /// Like [`Self::parent_scope`], but translation-unit level maps to the
    /// empty (global) scope while an unregistered parent stays `None`.
    fn parent_scope_or_global(&self, parent: &P::Cursor) -> Option<String> {
        match self.provider.cursor_kind(parent) {
            CursorKind::TranslationUnit => Some(String::new()),
            _ => self.registry.scope_name_for_cursor(self.provider, parent),
        }
    }

    fn is_included(&self, file: &Path) -> bool {
        self.roots.is_empty() || self.roots.iter().any(|root| file.starts_with(root))
    }

    /// Include path of `file` relative to the first matching root.
    fn relative_path(&self, file: &Path) -> String {
        for root in &self.roots {
            if let Ok(rest) = file.strip_prefix(root) {
                return rest.display().to_string();
            }
        }
        file.display().to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Set a template parameter default unless one is already recorded or the
/// value is the parameter referring to itself.
fn apply_template_default(param: &mut TemplateParameter, value: String) {
    if param.default_value.is_none() && value != format!("::{}", param.name) {
        param.default_value = Some(value);
    }
}

/// Reduce a base-specifier spelling to a lookup symbol: template arguments
/// and the declaration keyword are not part of the class name.
fn normalize_base_specifier(written: &str) -> String {
    let mut text = written.trim();
    if let Some(bracket) = text.find('<') {
        text = &text[..bracket];
    }
    text = text
        .strip_prefix("class ")
        .or_else(|| text.strip_prefix("struct "))
        .unwrap_or(text);
    text.trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================
