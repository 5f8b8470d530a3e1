//! End-to-end scans over the in-memory provider.

use std::path::{Path, PathBuf};

use cxxmap_core::error::ScanError;
use cxxmap_core::provider::{CursorKind, Primitive, Severity};
use cxxmap_core::registry::SymbolRegistry;
use cxxmap_core::resolve::parameter_from_handle;
use cxxmap_core::types::{ClassKind, TypeKind, Visibility};
use cxxmap_scan::runner::run_scan;
use cxxmap_scan::test_helpers::{MockAst, MockCursor, MockTypeRef};
use cxxmap_scan::visitor::Scanner;

fn scan(ast: &MockAst, files: &[&str]) -> SymbolRegistry<MockCursor> {
    let mut scanner = Scanner::new(ast);
    let files: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    run_scan(&mut scanner, &files, &[]).expect("scan succeeds");
    scanner.into_registry()
}

#[test]
fn namespaces_nest_and_scope_their_members() {
    let mut ast = MockAst::new();
    let file = Path::new("geo.hpp");
    let geo = ast.add_node(ast.root(), CursorKind::Namespace, "geo", file);
    let detail = ast.add_node(geo, CursorKind::Namespace, "detail", file);
    ast.add_node(detail, CursorKind::Struct, "Point", file);
    let make_point = ast.add_node(geo, CursorKind::Function, "make_point", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let fn_ty = ast.function_type(None, vec![int_ty, int_ty]);
    ast.set_type(make_point, fn_ty);

    let registry = scan(&ast, &["geo.hpp"]);

    let namespaces: Vec<_> = registry.namespaces().map(|n| n.full_name.clone()).collect();
    assert_eq!(namespaces, vec!["::geo", "::geo::detail"]);
    assert!(registry.has_class("::geo::detail::Point"));

    let function = &registry.functions()[0];
    assert_eq!(function.full_name, "::geo::make_point");
    assert_eq!(function.enclosing_scope(), "::geo");
    assert!(function.invokable.return_type.is_none());
    assert_eq!(function.invokable.params.len(), 2);
    assert_eq!(function.invokable.params[0].type_name, "int");
}

#[test]
fn access_specifiers_gate_member_visibility() {
    let mut ast = MockAst::new();
    let file = Path::new("widget.hpp");
    let widget = ast.add_node(ast.root(), CursorKind::Struct, "Widget", file);

    let int_ty = ast.primitive_type(Primitive::Int);
    let x = ast.add_node(widget, CursorKind::Field, "x", file);
    ast.set_type(x, int_ty);

    let to_private = ast.add_node(widget, CursorKind::AccessSpecifier, "", file);
    ast.set_access(to_private, Visibility::Private);
    let hidden = ast.add_node(widget, CursorKind::Method, "hide", file);
    let void_fn = ast.function_type(None, vec![]);
    ast.set_type(hidden, void_fn);

    let to_public = ast.add_node(widget, CursorKind::AccessSpecifier, "", file);
    ast.set_access(to_public, Visibility::Public);

    let ctor = ast.add_node(widget, CursorKind::Constructor, "Widget", file);
    let ctor_ty = ast.function_type(None, vec![int_ty]);
    ast.set_type(ctor, ctor_ty);
    ast.add_argument(ctor, "count", int_ty);

    let run = ast.add_node(widget, CursorKind::Method, "run", file);
    let bool_ty = ast.primitive_type(Primitive::Bool);
    let run_ty = ast.function_type(Some(bool_ty), vec![]);
    ast.set_type(run, run_ty);
    ast.set_method_flags(run, false, true, false, true);

    let instances = ast.add_node(widget, CursorKind::Variable, "instances", file);
    ast.set_type(instances, int_ty);

    let registry = scan(&ast, &["widget.hpp"]);
    let entry = registry.class_by_full_name("::Widget").unwrap();
    let class = &entry.class;

    // struct members default to public
    assert_eq!(class.fields[0].parameter.name, "x");
    assert_eq!(class.fields[0].visibility, Visibility::Public);
    assert!(!class.fields[0].is_static);

    assert_eq!(class.methods[0].name, "hide");
    assert_eq!(class.methods[0].visibility, Visibility::Private);

    assert_eq!(class.constructors.len(), 1);
    let ctor = &class.constructors[0];
    assert_eq!(ctor.visibility, Visibility::Public);
    assert!(ctor.invokable.return_type.is_none());
    assert_eq!(ctor.invokable.params[0].name, "count");
    assert_eq!(ctor.invokable.params[0].type_name, "int");

    let run = &class.methods[1];
    assert!(run.is_virtual);
    assert!(run.is_const);
    assert!(!run.is_pure_virtual);
    assert_eq!(
        run.invokable.return_type.as_ref().unwrap().type_name,
        "bool"
    );

    // a member VarDecl is a static field
    let statics: Vec<_> = class.fields.iter().filter(|f| f.is_static).collect();
    assert_eq!(statics.len(), 1);
    assert_eq!(statics[0].parameter.name, "instances");
}

#[test]
fn forward_declaration_merges_into_the_definition() {
    let mut ast = MockAst::new();
    ast.add_node(ast.root(), CursorKind::Struct, "Widget", Path::new("fwd.hpp"));

    let def = ast.add_node(ast.root(), CursorKind::Struct, "Widget", Path::new("def.hpp"));
    let run = ast.add_node(def, CursorKind::Method, "run", Path::new("def.hpp"));
    let void_fn = ast.function_type(None, vec![]);
    ast.set_type(run, void_fn);

    // a third declaration: recognized, but its members are never re-counted
    let dup = ast.add_node(ast.root(), CursorKind::Struct, "Widget", Path::new("dup.hpp"));
    let extra = ast.add_node(dup, CursorKind::Method, "extra", Path::new("dup.hpp"));
    ast.set_type(extra, void_fn);

    let registry = scan(&ast, &["fwd.hpp"]);
    assert_eq!(registry.classes().count(), 1);
    let entry = registry.class_by_full_name("::Widget").unwrap();
    assert_eq!(entry.class.from_file, PathBuf::from("def.hpp"));
    assert_eq!(entry.class.methods.len(), 1);
    assert_eq!(entry.class.methods[0].name, "run");

    // every declaration cursor identifies the merged record
    assert!(registry.class_for_cursor(&ast, &MockCursor(dup)).is_some());
    // exactly one type record was registered for all three declarations
    assert_eq!(
        registry
            .types()
            .iter()
            .filter(|t| t.full_name == "::Widget")
            .count(),
        1
    );
}

#[test]
fn rescanning_the_same_declarations_is_idempotent() {
    let mut ast = MockAst::new();
    let file = Path::new("widget.hpp");
    let widget = ast.add_node(ast.root(), CursorKind::Struct, "Widget", file);
    let run = ast.add_node(widget, CursorKind::Method, "run", file);
    let void_fn = ast.function_type(None, vec![]);
    ast.set_type(run, void_fn);
    let free = ast.add_node(ast.root(), CursorKind::Function, "helper", file);
    ast.set_type(free, void_fn);

    // the provider replays the whole tree for every translation unit
    let registry = scan(&ast, &["first.hpp", "second.hpp"]);
    assert_eq!(registry.classes().count(), 1);
    assert_eq!(
        registry.class_by_full_name("::Widget").unwrap().class.methods.len(),
        1
    );
    assert_eq!(registry.functions().len(), 1);
}

#[test]
fn non_public_nested_classes_stay_out_of_the_database() {
    let mut ast = MockAst::new();
    let file = Path::new("outer.hpp");
    let outer = ast.add_node(ast.root(), CursorKind::Class, "Outer", file);
    // class members start private
    ast.add_node(outer, CursorKind::Struct, "Hidden", file);
    let to_public = ast.add_node(outer, CursorKind::AccessSpecifier, "", file);
    ast.set_access(to_public, Visibility::Public);
    ast.add_node(outer, CursorKind::Struct, "Shown", file);

    let registry = scan(&ast, &["outer.hpp"]);
    let outer = registry.class_by_full_name("::Outer").unwrap();
    assert_eq!(outer.class.kind, ClassKind::Class);
    assert!(registry.has_class("::Outer::Shown"));
    assert!(!registry.has_class("::Outer::Hidden"));
}

#[test]
fn base_classes_resolve_through_enclosing_scopes() {
    let mut ast = MockAst::new();
    let file = Path::new("shapes.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "shapes", file);
    ast.add_node(ns, CursorKind::Struct, "Base", file);
    let derived = ast.add_node(ns, CursorKind::Struct, "Derived", file);
    ast.add_node(derived, CursorKind::BaseSpecifier, "class Base", file);
    ast.add_node(derived, CursorKind::BaseSpecifier, "vendor::Mixin", file);

    // two translation units: base entries must not double up
    let registry = scan(&ast, &["shapes.hpp", "shapes_again.hpp"]);
    let derived = registry.class_by_full_name("::shapes::Derived").unwrap();
    assert_eq!(
        derived.class.bases,
        vec!["::shapes::Base", "vendor::Mixin"]
    );
    assert_eq!(derived.class.known_bases, vec!["::shapes::Base"]);
}

#[test]
fn duplicate_field_names_keep_the_first_declaration() {
    let mut ast = MockAst::new();
    let file = Path::new("widget.hpp");
    let widget = ast.add_node(ast.root(), CursorKind::Struct, "Widget", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let bool_ty = ast.primitive_type(Primitive::Bool);
    let first = ast.add_node(widget, CursorKind::Field, "x", file);
    ast.set_type(first, int_ty);
    let second = ast.add_node(widget, CursorKind::Field, "x", file);
    ast.set_type(second, bool_ty);

    let registry = scan(&ast, &["widget.hpp"]);
    let class = &registry.class_by_full_name("::Widget").unwrap().class;
    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.fields[0].parameter.type_name, "int");
}

#[test]
fn enum_constants_keep_order_and_values() {
    let mut ast = MockAst::new();
    let file = Path::new("color.hpp");
    let color = ast.add_node(ast.root(), CursorKind::Enum, "Color", file);
    let red = ast.add_node(color, CursorKind::EnumConstant, "Red", file);
    ast.set_enum_value(red, 0);
    let green = ast.add_node(color, CursorKind::EnumConstant, "Green", file);
    ast.set_enum_value(green, 5);
    let blue = ast.add_node(color, CursorKind::EnumConstant, "Blue", file);
    ast.set_enum_value(blue, -2);

    // re-declaration with a different body is ignored outright
    let again = ast.add_node(ast.root(), CursorKind::Enum, "Color", file);
    let bogus = ast.add_node(again, CursorKind::EnumConstant, "Bogus", file);
    ast.set_enum_value(bogus, 99);

    let registry = scan(&ast, &["color.hpp"]);
    assert_eq!(registry.enums().count(), 1);
    let color = registry.enums().next().unwrap();
    assert_eq!(color.full_name, "::Color");
    assert_eq!(
        color.constants,
        vec![
            ("Red".to_string(), 0),
            ("Green".to_string(), 5),
            ("Blue".to_string(), -2)
        ]
    );
    // enums register a resolvable type record
    assert!(registry
        .types()
        .iter()
        .any(|t| t.full_name == "::Color" && t.kind == TypeKind::Enum));
}

#[test]
fn enums_inside_classes_take_the_class_scope() {
    let mut ast = MockAst::new();
    let file = Path::new("widget.hpp");
    let widget = ast.add_node(ast.root(), CursorKind::Struct, "Widget", file);
    let state = ast.add_node(widget, CursorKind::Enum, "State", file);
    let idle = ast.add_node(state, CursorKind::EnumConstant, "Idle", file);
    ast.set_enum_value(idle, 1);

    let registry = scan(&ast, &["widget.hpp"]);
    let state = registry.enums().next().unwrap();
    assert_eq!(state.full_name, "::Widget::State");
    assert_eq!(state.constants, vec![("Idle".to_string(), 1)]);
}

#[test]
fn typedefs_resolve_against_the_usage_scope_and_accumulate_qualifiers() {
    let mut ast = MockAst::new();
    let file = Path::new("handles.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "N", file);
    ast.add_node(ns, CursorKind::Struct, "S", file);

    // typedef S* Handle;  (inside N, underlying written unqualified)
    let handle = ast.add_node(ns, CursorKind::Typedef, "Handle", file);
    let alias_ty = ast.named_type("Handle");
    let s_ty = ast.named_type("S");
    let ptr_s = ast.pointer_to(s_ty, false);
    ast.set_type(handle, alias_ty);
    ast.set_underlying(handle, ptr_s);

    // typedef Handle& HandleRef;  (chains through the first alias)
    let handle_ref = ast.add_node(ns, CursorKind::Typedef, "HandleRef", file);
    let ref_alias_ty = ast.named_type("HandleRef");
    let handle_named = ast.named_type("Handle");
    let ref_handle = ast.reference_to(handle_named, false);
    ast.set_type(handle_ref, ref_alias_ty);
    ast.set_underlying(handle_ref, ref_handle);

    // typedef lib::Missing Opaque;  (nothing registered to match)
    let opaque = ast.add_node(ast.root(), CursorKind::Typedef, "Opaque", file);
    let opaque_ty = ast.named_type("Opaque");
    let missing_ty = ast.named_type("lib::Missing");
    ast.set_type(opaque, opaque_ty);
    ast.set_underlying(opaque, missing_ty);

    let registry = scan(&ast, &["handles.hpp"]);

    let handle = registry
        .types()
        .iter()
        .find(|t| t.name == "Handle")
        .unwrap();
    assert_eq!(handle.kind, TypeKind::Typedef);
    assert_eq!(handle.full_name, "::N::S");
    assert_eq!(handle.pointer_depth, 1);

    let handle_ref = registry
        .types()
        .iter()
        .find(|t| t.name == "HandleRef")
        .unwrap();
    assert_eq!(handle_ref.full_name, "::N::S");
    // pointer from the first alias plus the reference written here
    assert_eq!(handle_ref.pointer_depth, 1);
    assert_eq!(handle_ref.reference_depth, 1);

    let opaque = registry
        .types()
        .iter()
        .find(|t| t.name == "Opaque")
        .unwrap();
    assert_eq!(opaque.kind, TypeKind::Unresolved);
    assert_eq!(opaque.full_name, "::lib::Missing");
}

#[test]
fn fields_resolve_through_registered_aliases() {
    let mut ast = MockAst::new();
    let file = Path::new("owner.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "N", file);
    ast.add_node(ns, CursorKind::Struct, "S", file);

    let handle = ast.add_node(ns, CursorKind::Typedef, "Handle", file);
    let alias_ty = ast.named_type("Handle");
    let s_ty = ast.named_type("S");
    let ptr_s = ast.pointer_to(s_ty, false);
    ast.set_type(handle, alias_ty);
    ast.set_underlying(handle, ptr_s);

    let owner = ast.add_node(ns, CursorKind::Struct, "Owner", file);
    let field = ast.add_node(owner, CursorKind::Field, "handle", file);
    let handle_named = ast.named_type("Handle");
    ast.set_type(field, handle_named);

    let registry = scan(&ast, &["owner.hpp"]);
    let owner = registry.class_by_full_name("::N::Owner").unwrap();
    let field = &owner.class.fields[0];
    assert_eq!(field.parameter.type_name, "::N::S");
    assert_eq!(field.parameter.type_alias.as_deref(), Some("Handle"));
    assert_eq!(field.parameter.pointer_depth, 1);
}

#[test]
fn function_templates_collect_parameters_and_defaults() {
    let mut ast = MockAst::new();
    let file = Path::new("tmpl.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "N", file);
    ast.add_node(ns, CursorKind::Struct, "S", file);

    let tmpl = ast.add_node(ast.root(), CursorKind::FunctionTemplate, "identity", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let fn_ty = ast.function_type(Some(int_ty), vec![int_ty]);
    ast.set_type(tmpl, fn_ty);
    ast.add_argument(tmpl, "value", int_ty);

    // template<typename T = N::S, typename U>
    ast.add_node(tmpl, CursorKind::TemplateTypeParameter, "T", file);
    let default_ref = ast.add_node(tmpl, CursorKind::TypeRef, "N::S", file);
    let default_ty = ast.named_type("N::S");
    ast.set_type(default_ref, default_ty);
    ast.add_node(tmpl, CursorKind::TemplateTypeParameter, "U", file);
    // a reference to the parameter itself is not a default
    let self_ref = ast.add_node(tmpl, CursorKind::TypeRef, "U", file);
    let self_ty = ast.named_type("U");
    ast.set_type(self_ref, self_ty);

    let registry = scan(&ast, &["tmpl.hpp"]);
    let function = registry
        .functions()
        .iter()
        .find(|f| f.name == "identity")
        .unwrap();
    assert!(function.invokable.is_template());
    assert_eq!(function.invokable.params[0].name, "value");

    let params = &function.invokable.template_params;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "T");
    assert_eq!(params[0].default_value.as_deref(), Some("::N::S"));
    assert_eq!(params[1].name, "U");
    assert_eq!(params[1].default_value, None);
}

#[test]
fn a_reference_past_the_last_default_ends_the_template_context() {
    let mut ast = MockAst::new();
    let file = Path::new("tmpl.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "N", file);
    ast.add_node(ns, CursorKind::Struct, "S", file);

    let tmpl = ast.add_node(ast.root(), CursorKind::FunctionTemplate, "apply", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let fn_ty = ast.function_type(Some(int_ty), vec![]);
    ast.set_type(tmpl, fn_ty);

    ast.add_node(tmpl, CursorKind::TemplateTypeParameter, "T", file);
    let default_ref = ast.add_node(tmpl, CursorKind::TypeRef, "N::S", file);
    let default_ty = ast.named_type("N::S");
    ast.set_type(default_ref, default_ty);
    // a second reference after the default is the declaration body,
    // and whatever follows it no longer belongs to the parameter list
    let body_ref = ast.add_node(tmpl, CursorKind::TypeRef, "N::S", file);
    ast.set_type(body_ref, default_ty);
    ast.add_node(tmpl, CursorKind::TemplateTypeParameter, "Stray", file);

    let registry = scan(&ast, &["tmpl.hpp"]);
    let function = registry.functions().iter().find(|f| f.name == "apply").unwrap();
    let params = &function.invokable.template_params;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "T");
    assert_eq!(params[0].default_value.as_deref(), Some("::N::S"));
}

#[test]
#[should_panic(expected = "invalid type handle")]
fn parameters_from_invalid_type_handles_fail_loudly() {
    let mut ast = MockAst::new();
    let bad = ast.invalid_type();
    let _ = parameter_from_handle(&ast, "broken", &MockTypeRef(bad), &[]);
}

#[test]
fn class_templates_collect_parameters_and_defaults() {
    let mut ast = MockAst::new();
    let file = Path::new("box.hpp");
    let ns = ast.add_node(ast.root(), CursorKind::Namespace, "N", file);
    ast.add_node(ns, CursorKind::Struct, "S", file);

    let template = ast.add_node(ns, CursorKind::ClassTemplate, "Box", file);
    let param = ast.add_node(template, CursorKind::TemplateTypeParameter, "T", file);
    // the default rides as a child of the parameter, written unqualified
    let default_ref = ast.add_node(param, CursorKind::TypeRef, "S", file);
    let default_ty = ast.named_type("S");
    ast.set_type(default_ref, default_ty);

    let registry = scan(&ast, &["box.hpp"]);
    let class = &registry.class_by_full_name("::N::Box").unwrap().class;
    assert_eq!(class.kind, ClassKind::Class);
    assert!(class.is_template());
    assert_eq!(class.template_params[0].name, "T");
    // the unqualified default resolved from the template's own scope
    assert_eq!(class.template_params[0].default_value.as_deref(), Some("::N::S"));
}

#[test]
fn method_overloads_are_distinguished_by_signature() {
    let mut ast = MockAst::new();
    let file = Path::new("runner.hpp");
    let runner = ast.add_node(ast.root(), CursorKind::Struct, "Runner", file);

    let int_ty = ast.primitive_type(Primitive::Int);
    let bool_ty = ast.primitive_type(Primitive::Bool);
    let by_int = ast.add_node(runner, CursorKind::Method, "run", file);
    let by_int_ty = ast.function_type(None, vec![int_ty]);
    ast.set_type(by_int, by_int_ty);
    let by_bool = ast.add_node(runner, CursorKind::Method, "run", file);
    let by_bool_ty = ast.function_type(None, vec![bool_ty]);
    ast.set_type(by_bool, by_bool_ty);

    let registry = scan(&ast, &["runner.hpp"]);
    let class = &registry.class_by_full_name("::Runner").unwrap().class;
    assert_eq!(class.methods.len(), 2);
    assert_ne!(class.methods[0], class.methods[1]);
    assert!(class.implements(&class.methods[0]));
}

#[test]
fn variadic_functions_keep_the_flag() {
    let mut ast = MockAst::new();
    let file = Path::new("log.hpp");
    let log = ast.add_node(ast.root(), CursorKind::Function, "log_all", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let fn_ty = ast.function_type(Some(int_ty), vec![]);
    ast.set_type(log, fn_ty);
    ast.set_variadic(log);

    let registry = scan(&ast, &["log.hpp"]);
    assert!(registry.functions()[0].invokable.is_variadic);
}

#[test]
fn include_roots_filter_foreign_declarations() {
    let mut ast = MockAst::new();
    ast.add_node(
        ast.root(),
        CursorKind::Struct,
        "Mine",
        Path::new("/proj/include/widget.hpp"),
    );
    ast.add_node(
        ast.root(),
        CursorKind::Struct,
        "Foreign",
        Path::new("/usr/include/vendor.hpp"),
    );

    let mut scanner = Scanner::new(&ast);
    scanner.add_include_root("/proj/include");
    run_scan(
        &mut scanner,
        &[PathBuf::from("/proj/include/widget.hpp")],
        &[],
    )
    .unwrap();

    // both top-level declarations were offered to the scanner
    assert_eq!(scanner.visited(), 2);
    let registry = scanner.into_registry();
    assert!(registry.has_class("::Mine"));
    assert!(!registry.has_class("::Foreign"));
    assert_eq!(
        registry.class_by_full_name("::Mine").unwrap().class.include_path,
        "widget.hpp"
    );
}

#[test]
fn parse_failure_aborts_the_run() {
    let mut ast = MockAst::new();
    ast.fail_parse(Path::new("bad.hpp"));

    let mut scanner = Scanner::new(&ast);
    let err = run_scan(&mut scanner, &[PathBuf::from("bad.hpp")], &[]).unwrap_err();
    match err {
        ScanError::Parse { path, .. } => assert_eq!(path, "bad.hpp"),
        other => panic!("expected a parse error, got {other}"),
    }
}

#[test]
fn error_diagnostics_abort_but_earlier_files_survive() {
    let mut ast = MockAst::new();
    ast.add_node(ast.root(), CursorKind::Struct, "Early", Path::new("a.hpp"));
    ast.add_diagnostic(Path::new("b.hpp"), Severity::Error, "expected ';'");

    let mut scanner = Scanner::new(&ast);
    let err = run_scan(
        &mut scanner,
        &[PathBuf::from("a.hpp"), PathBuf::from("b.hpp")],
        &[],
    )
    .unwrap_err();
    match err {
        ScanError::Diagnostics { path, messages } => {
            assert_eq!(path, "b.hpp");
            assert_eq!(messages, vec!["expected ';'"]);
        }
        other => panic!("expected a diagnostics error, got {other}"),
    }
    assert!(scanner.registry().has_class("::Early"));
}

#[test]
fn failing_files_contribute_no_symbols() {
    let mut ast = MockAst::new();
    ast.add_node(ast.root(), CursorKind::Struct, "Broken", Path::new("a.hpp"));
    ast.add_diagnostic(Path::new("a.hpp"), Severity::Fatal, "unknown type name");

    // diagnostics gate the visit, so nothing from the failing unit lands
    let mut scanner = Scanner::new(&ast);
    run_scan(&mut scanner, &[PathBuf::from("a.hpp")], &[]).unwrap_err();
    assert_eq!(scanner.registry().classes().count(), 0);
    assert_eq!(scanner.visited(), 0);
}

#[test]
fn warning_diagnostics_do_not_abort() {
    let mut ast = MockAst::new();
    ast.add_node(ast.root(), CursorKind::Struct, "Fine", Path::new("a.hpp"));
    ast.add_diagnostic(Path::new("a.hpp"), Severity::Warning, "deprecated header");

    let mut scanner = Scanner::new(&ast);
    let summary = run_scan(&mut scanner, &[PathBuf::from("a.hpp")], &[]).unwrap();
    assert_eq!(summary.classes, 1);
    assert_eq!(summary.types, 1);
}

#[test]
fn registry_output_serializes_for_downstream_consumers() {
    let mut ast = MockAst::new();
    let file = Path::new("point.hpp");
    let point = ast.add_node(ast.root(), CursorKind::Struct, "Point", file);
    let int_ty = ast.primitive_type(Primitive::Int);
    let x = ast.add_node(point, CursorKind::Field, "x", file);
    ast.set_type(x, int_ty);

    let registry = scan(&ast, &["point.hpp"]);
    let class = registry.classes().next().unwrap();
    let json = serde_json::to_value(class).unwrap();
    assert_eq!(json["full_name"], "::Point");
    assert_eq!(json["kind"], "struct");
    assert_eq!(json["fields"][0]["parameter"]["type_name"], "int");
}
