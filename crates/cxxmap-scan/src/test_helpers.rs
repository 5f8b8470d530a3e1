//! In-memory AST provider for the test suite.
//!
//! [`MockAst`] is an arena of declaration nodes and type records built by
//! hand, exposing the same traversal and query surface a real parser
//! backend does. The whole tree is replayed for every parsed unit, the way
//! a header included from several translation units is re-parsed each time;
//! deduplication is the registry's job, so tests exercise it for free.

use std::path::{Path, PathBuf};

use cxxmap_core::provider::{
    AstProvider, CursorEq, CursorKind, Diagnostic, Primitive, ProviderError, Severity, TypeShape,
    VisitAction,
};
use cxxmap_core::types::Visibility;

/// Cursor handle: an index into the node arena. Equality of indices is
/// cursor identity, so the same declaration revisited from another unit
/// compares equal while two forward declarations stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCursor(pub usize);

/// Type handle: an index into the type arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTypeRef(pub usize);

#[derive(Debug)]
struct MockNode {
    kind: CursorKind,
    spelling: String,
    file: PathBuf,
    children: Vec<usize>,
    ty: Option<usize>,
    underlying: Option<usize>,
    access: Visibility,
    is_static: bool,
    is_virtual: bool,
    is_pure_virtual: bool,
    is_const: bool,
    is_variadic: bool,
    enum_value: i64,
    arguments: Vec<usize>,
}

impl MockNode {
    fn new(kind: CursorKind, spelling: &str, file: &Path) -> Self {
        MockNode {
            kind,
            spelling: spelling.to_string(),
            file: file.to_path_buf(),
            children: Vec::new(),
            ty: None,
            underlying: None,
            access: Visibility::Public,
            is_static: false,
            is_virtual: false,
            is_pure_virtual: false,
            is_const: false,
            is_variadic: false,
            enum_value: 0,
            arguments: Vec::new(),
        }
    }
}

#[derive(Debug)]
enum MockType {
    Primitive(Primitive),
    Pointer { pointee: usize, is_const: bool },
    Reference { pointee: usize, is_const: bool },
    Named { spelling: String, is_const: bool },
    Function { result: Option<usize>, args: Vec<usize> },
    Invalid,
}

/// Hand-built AST arena implementing [`AstProvider`].
#[derive(Debug, Default)]
pub struct MockAst {
    nodes: Vec<MockNode>,
    types: Vec<MockType>,
    diagnostics: Vec<(PathBuf, Diagnostic)>,
    fail_paths: Vec<PathBuf>,
}

impl MockAst {
    /// An empty tree whose root is the translation unit.
    pub fn new() -> Self {
        MockAst {
            nodes: vec![MockNode::new(CursorKind::TranslationUnit, "", Path::new(""))],
            ..MockAst::default()
        }
    }

    /// The translation-unit root every top-level declaration hangs off.
    pub fn root(&self) -> usize {
        0
    }

    // ---- node builders -------------------------------------------------

    /// Append a child declaration under `parent` and return its index.
    pub fn add_node(
        &mut self,
        parent: usize,
        kind: CursorKind,
        spelling: &str,
        file: &Path,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(MockNode::new(kind, spelling, file));
        self.nodes[parent].children.push(index);
        index
    }

    /// Append an argument node to a function-like declaration. Argument
    /// nodes are reachable through `argument_cursor` only, not through the
    /// traversal, matching how signatures are queried.
    pub fn add_argument(&mut self, function: usize, name: &str, ty: usize) -> usize {
        let index = self.nodes.len();
        let file = self.nodes[function].file.clone();
        let mut node = MockNode::new(CursorKind::Other, name, &file);
        node.ty = Some(ty);
        self.nodes.push(node);
        self.nodes[function].arguments.push(index);
        index
    }

    pub fn set_type(&mut self, node: usize, ty: usize) {
        self.nodes[node].ty = Some(ty);
    }

    pub fn set_underlying(&mut self, node: usize, ty: usize) {
        self.nodes[node].underlying = Some(ty);
    }

    pub fn set_access(&mut self, node: usize, access: Visibility) {
        self.nodes[node].access = access;
    }

    pub fn set_enum_value(&mut self, node: usize, value: i64) {
        self.nodes[node].enum_value = value;
    }

    pub fn set_method_flags(
        &mut self,
        node: usize,
        is_static: bool,
        is_virtual: bool,
        is_pure_virtual: bool,
        is_const: bool,
    ) {
        let record = &mut self.nodes[node];
        record.is_static = is_static;
        record.is_virtual = is_virtual;
        record.is_pure_virtual = is_pure_virtual;
        record.is_const = is_const;
    }

    pub fn set_variadic(&mut self, node: usize) {
        self.nodes[node].is_variadic = true;
    }

    // ---- type builders ---------------------------------------------------

    pub fn primitive_type(&mut self, primitive: Primitive) -> usize {
        self.push_type(MockType::Primitive(primitive))
    }

    pub fn named_type(&mut self, spelling: &str) -> usize {
        self.push_type(MockType::Named {
            spelling: spelling.to_string(),
            is_const: false,
        })
    }

    pub fn named_type_const(&mut self, spelling: &str) -> usize {
        self.push_type(MockType::Named {
            spelling: spelling.to_string(),
            is_const: true,
        })
    }

    pub fn pointer_to(&mut self, pointee: usize, is_const: bool) -> usize {
        self.push_type(MockType::Pointer { pointee, is_const })
    }

    pub fn reference_to(&mut self, pointee: usize, is_const: bool) -> usize {
        self.push_type(MockType::Reference { pointee, is_const })
    }

    pub fn function_type(&mut self, result: Option<usize>, args: Vec<usize>) -> usize {
        self.push_type(MockType::Function { result, args })
    }

    pub fn invalid_type(&mut self) -> usize {
        self.push_type(MockType::Invalid)
    }

    fn push_type(&mut self, record: MockType) -> usize {
        self.types.push(record);
        self.types.len() - 1
    }

    // ---- parse behavior --------------------------------------------------

    pub fn add_diagnostic(&mut self, path: &Path, severity: Severity, message: &str) {
        self.diagnostics
            .push((path.to_path_buf(), Diagnostic::new(severity, message)));
    }

    /// Make `parse` fail outright for this path.
    pub fn fail_parse(&mut self, path: &Path) {
        self.fail_paths.push(path.to_path_buf());
    }

    fn walk(
        &self,
        parent: usize,
        callback: &mut dyn FnMut(MockCursor, MockCursor) -> VisitAction,
    ) -> bool {
        for &child in &self.nodes[parent].children {
            match callback(MockCursor(child), MockCursor(parent)) {
                VisitAction::Break => return false,
                VisitAction::Recurse => {
                    if !self.walk(child, callback) {
                        return false;
                    }
                }
                VisitAction::Continue => {}
            }
        }
        true
    }
}

impl CursorEq for MockAst {
    type Cursor = MockCursor;

    fn cursors_equal(&self, a: &MockCursor, b: &MockCursor) -> bool {
        a.0 == b.0
    }
}

impl AstProvider for MockAst {
    type Unit = PathBuf;
    type Type = MockTypeRef;

    fn parse(&self, path: &Path, _args: &[String]) -> Result<PathBuf, ProviderError> {
        if self.fail_paths.iter().any(|fail| fail == path) {
            return Err(ProviderError::Parse {
                path: path.display().to_string(),
                message: "unreadable translation unit".to_string(),
            });
        }
        Ok(path.to_path_buf())
    }

    fn diagnostics(&self, unit: &PathBuf) -> Vec<Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|(path, _)| path == unit)
            .map(|(_, diagnostic)| diagnostic.clone())
            .collect()
    }

    fn visit(
        &self,
        _unit: &PathBuf,
        callback: &mut dyn FnMut(MockCursor, MockCursor) -> VisitAction,
    ) {
        self.walk(self.root(), callback);
    }

    fn cursor_kind(&self, cursor: &MockCursor) -> CursorKind {
        self.nodes[cursor.0].kind
    }

    fn spelling(&self, cursor: &MockCursor) -> String {
        self.nodes[cursor.0].spelling.clone()
    }

    fn source_file(&self, cursor: &MockCursor) -> PathBuf {
        self.nodes[cursor.0].file.clone()
    }

    fn cursor_type(&self, cursor: &MockCursor) -> Option<MockTypeRef> {
        self.nodes[cursor.0].ty.map(MockTypeRef)
    }

    fn typedef_underlying_type(&self, cursor: &MockCursor) -> Option<MockTypeRef> {
        self.nodes[cursor.0].underlying.map(MockTypeRef)
    }

    fn access_specifier(&self, cursor: &MockCursor) -> Visibility {
        self.nodes[cursor.0].access
    }

    fn is_static_method(&self, cursor: &MockCursor) -> bool {
        self.nodes[cursor.0].is_static
    }

    fn is_virtual_method(&self, cursor: &MockCursor) -> bool {
        self.nodes[cursor.0].is_virtual
    }

    fn is_pure_virtual_method(&self, cursor: &MockCursor) -> bool {
        self.nodes[cursor.0].is_pure_virtual
    }

    fn is_const_method(&self, cursor: &MockCursor) -> bool {
        self.nodes[cursor.0].is_const
    }

    fn is_variadic(&self, cursor: &MockCursor) -> bool {
        self.nodes[cursor.0].is_variadic
    }

    fn enum_constant_value(&self, cursor: &MockCursor) -> i64 {
        self.nodes[cursor.0].enum_value
    }

    fn argument_cursor(&self, cursor: &MockCursor, index: usize) -> Option<MockCursor> {
        self.nodes[cursor.0].arguments.get(index).copied().map(MockCursor)
    }

    fn type_shape(&self, ty: &MockTypeRef) -> TypeShape {
        match &self.types[ty.0] {
            MockType::Primitive(primitive) => TypeShape::Primitive(*primitive),
            MockType::Pointer { .. } => TypeShape::Pointer,
            MockType::Reference { .. } => TypeShape::LValueReference,
            MockType::Named { .. } => TypeShape::Named,
            MockType::Function { .. } | MockType::Invalid => TypeShape::Invalid,
        }
    }

    fn pointee_type(&self, ty: &MockTypeRef) -> Option<MockTypeRef> {
        match &self.types[ty.0] {
            MockType::Pointer { pointee, .. } | MockType::Reference { pointee, .. } => {
                Some(MockTypeRef(*pointee))
            }
            _ => None,
        }
    }

    fn is_const_qualified(&self, ty: &MockTypeRef) -> bool {
        match &self.types[ty.0] {
            MockType::Pointer { is_const, .. }
            | MockType::Reference { is_const, .. }
            | MockType::Named { is_const, .. } => *is_const,
            _ => false,
        }
    }

    fn type_spelling(&self, ty: &MockTypeRef) -> String {
        match &self.types[ty.0] {
            MockType::Primitive(primitive) => primitive.name().to_string(),
            MockType::Named { spelling, .. } => spelling.clone(),
            MockType::Pointer { pointee, .. } => {
                format!("{}*", self.type_spelling(&MockTypeRef(*pointee)))
            }
            MockType::Reference { pointee, .. } => {
                format!("{}&", self.type_spelling(&MockTypeRef(*pointee)))
            }
            MockType::Function { .. } | MockType::Invalid => String::new(),
        }
    }

    fn result_type(&self, ty: &MockTypeRef) -> Option<MockTypeRef> {
        match &self.types[ty.0] {
            MockType::Function { result, .. } => result.map(MockTypeRef),
            _ => None,
        }
    }

    fn argument_type(&self, ty: &MockTypeRef, index: usize) -> Option<MockTypeRef> {
        match &self.types[ty.0] {
            MockType::Function { args, .. } => args.get(index).copied().map(MockTypeRef),
            _ => None,
        }
    }
}
