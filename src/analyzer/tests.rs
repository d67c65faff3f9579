//! Unit tests for the analyzer module.

use std::{
    io::{self, Write},
    rc::Rc,
};

use crate::{
    ast::{
        ast::{ExprKind, NodeId, NodeKind, StmtKind, SyntaxTree},
        types::DataType,
    },
    errors::{errors::ErrorImpl, reporter::Reporter},
    lexer::lexer::tokenize,
    parser::parser::parse,
    symtab::symtab::{SymbolKind, SymbolStore, SymbolTable, GLOBAL_SCOPE, USE_SITE},
};

use super::{
    analyzer::{build_symbol_table, Analyzer},
    builder::{is_builtin, SymbolTableBuilder},
    context::{AnalysisContext, Scope},
    traverse::{traverse, Visitor},
};

fn parse_source(source: &str) -> SyntaxTree {
    let _ = env_logger::builder().is_test(true).try_init();

    let tokens = tokenize(source.to_string(), Some("test.c-".to_string())).unwrap();
    parse(tokens, Rc::new("test.c-".to_string())).unwrap()
}

fn analyze(source: &str) -> Analyzer<SymbolTable, Vec<u8>> {
    let tree = parse_source(source);
    let mut analyzer = Analyzer::new(Vec::new());
    analyzer.analyze(&tree);
    analyzer
}

fn error_kinds(analyzer: &Analyzer<SymbolTable, Vec<u8>>) -> Vec<ErrorImpl> {
    analyzer
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.get_internal_error().clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Insert {
    name: String,
    line: u32,
    location: usize,
    scope: String,
    data_type: DataType,
    kind: SymbolKind,
}

/// Store that remembers every insertion and forwards it to a real table.
#[derive(Default)]
struct RecordingStore {
    table: SymbolTable,
    inserts: Vec<Insert>,
}

impl RecordingStore {
    fn inserts_of(&self, name: &str) -> Vec<&Insert> {
        self.inserts.iter().filter(|insert| insert.name == name).collect()
    }
}

impl SymbolStore for RecordingStore {
    fn insert(&mut self, name: &str, line: u32, location: usize, scope: &str, data_type: DataType, kind: SymbolKind) {
        self.inserts.push(Insert {
            name: name.to_string(),
            line,
            location,
            scope: scope.to_string(),
            data_type,
            kind,
        });
        self.table.insert(name, line, location, scope, data_type, kind);
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.table.lookup(name)
    }

    fn lookup_in_scope(&self, name: &str, scope: &str) -> Option<(usize, SymbolKind)> {
        self.table.lookup_in_scope(name, scope)
    }

    fn function_type(&self, name: &str) -> Option<DataType> {
        self.table.function_type(name)
    }

    fn has_entry_point(&self, name: &str) -> bool {
        self.table.has_entry_point(name)
    }

    fn print_table(&self, out: &mut dyn Write) -> io::Result<()> {
        self.table.print_table(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pre,
    Post,
}

#[derive(Default)]
struct RecordingVisitor {
    events: Vec<(Phase, NodeKind, String)>,
}

impl Visitor for RecordingVisitor {
    fn pre_visit(&mut self, tree: &SyntaxTree, node: NodeId, ctx: &mut AnalysisContext) {
        self.events.push((Phase::Pre, tree.node(node).kind, ctx.scope.to_string()));
    }

    fn post_visit(&mut self, tree: &SyntaxTree, node: NodeId, ctx: &mut AnalysisContext) {
        self.events.push((Phase::Post, tree.node(node).kind, ctx.scope.to_string()));
    }
}

#[test]
fn test_context_allocate() {
    let mut ctx = AnalysisContext::new();
    assert_eq!(ctx.allocate(1), 0);
    assert_eq!(ctx.allocate(5), 1);
    assert_eq!(ctx.allocate(1), 6);
    assert_eq!(ctx.next_location(), 7);

    ctx.scope = Scope::Function("main".to_string());
    ctx.reset();
    assert_eq!(ctx.next_location(), 0);
    assert!(ctx.scope.is_global());
    assert_eq!(ctx.scope.as_str(), GLOBAL_SCOPE);
}

#[test]
fn test_traverse_order_and_scope() {
    let tree = parse_source("int g;\nvoid main(void) { }");
    let mut visitor = RecordingVisitor::default();
    let mut ctx = AnalysisContext::new();

    traverse(&tree, tree.root(), &mut visitor, &mut ctx);

    let expected = vec![
        (Phase::Pre, NodeKind::Expr(ExprKind::Type), "global".to_string()),
        (Phase::Pre, NodeKind::Expr(ExprKind::Var), "global".to_string()),
        (Phase::Post, NodeKind::Expr(ExprKind::Var), "global".to_string()),
        (Phase::Post, NodeKind::Expr(ExprKind::Type), "global".to_string()),
        (Phase::Pre, NodeKind::Expr(ExprKind::Type), "main".to_string()),
        (Phase::Pre, NodeKind::Expr(ExprKind::Func), "main".to_string()),
        (Phase::Pre, NodeKind::Stmt(StmtKind::Compound), "main".to_string()),
        (Phase::Post, NodeKind::Stmt(StmtKind::Compound), "main".to_string()),
        (Phase::Post, NodeKind::Expr(ExprKind::Func), "main".to_string()),
        (Phase::Post, NodeKind::Expr(ExprKind::Type), "global".to_string()),
    ];
    assert_eq!(visitor.events, expected);
    assert!(ctx.scope.is_global());
}

#[test]
fn test_traverse_visits_every_node_once() {
    let tree = parse_source("int f(int a) { if (a < 1) return a * 2; else return f(a - 1); }");
    let mut visitor = RecordingVisitor::default();

    traverse(&tree, tree.root(), &mut visitor, &mut AnalysisContext::new());

    let pre = visitor.events.iter().filter(|event| event.0 == Phase::Pre).count();
    let post = visitor.events.iter().filter(|event| event.0 == Phase::Post).count();
    assert_eq!(pre, tree.len());
    assert_eq!(post, tree.len());
}

#[test]
fn test_traverse_empty_tree() {
    let tree = SyntaxTree::new();
    let mut visitor = RecordingVisitor::default();

    traverse(&tree, tree.root(), &mut visitor, &mut AnalysisContext::new());

    assert!(visitor.events.is_empty());
}

#[test]
fn test_declared_variable_assignment() {
    let analyzer = analyze("int x;\nvoid main(void)\n{\n    x = 1;\n}\n");

    assert!(!analyzer.failed());
    assert!(analyzer.diagnostics().is_empty());

    let x = analyzer.store().get("x").unwrap();
    assert_eq!(x.location, 2);
    assert_eq!(x.scope, GLOBAL_SCOPE);
    assert_eq!(x.kind, SymbolKind::Variable);
    assert_eq!(x.lines, vec![1, 4]);

    let main = analyzer.store().get("main").unwrap();
    assert_eq!(main.location, 3);
    assert_eq!(main.data_type, DataType::Void);
    assert_eq!(main.lines, vec![2]);
}

#[test]
fn test_listing_printed_on_success() {
    let analyzer = analyze("void main(void) { }");
    let listing = String::from_utf8(analyzer.into_output()).unwrap();

    assert!(listing.starts_with("\nSymbol table:\n\n"));
    assert!(listing.contains("input"));
    assert!(listing.contains("output"));
    assert!(listing.contains("main"));
    assert!(!listing.contains("Semantic error"));
}

#[test]
fn test_undeclared_assignment_target() {
    let analyzer = analyze("void main(void)\n{\n    y = 2;\n}\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VariableNotDeclared { variable: "y".to_string() }]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 3);

    let listing = String::from_utf8(analyzer.into_output()).unwrap();
    assert!(listing.contains("Semantic error [VariableNotDeclared]"));
    assert!(!listing.contains("Symbol table"));
}

#[test]
fn test_undeclared_bare_expression() {
    let analyzer = analyze("void main(void)\n{\n    y;\n    y + 1;\n}\n");

    assert_eq!(analyzer.diagnostics().len(), 2);
    assert_eq!(analyzer.diagnostics()[0].get_line(), 3);
    assert_eq!(analyzer.diagnostics()[1].get_line(), 4);
}

#[test]
fn test_void_assignment() {
    let analyzer = analyze("void f(void) { }\nvoid main(void)\n{\n    int x;\n    x = f();\n}\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VoidAssignment { function: "f".to_string() }]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 5);
}

#[test]
fn test_void_operand() {
    let analyzer = analyze("void f(void) { }\nvoid main(void)\n{\n    int x;\n    x = 1\n      + f();\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VoidOperand { function: "f".to_string() }]
    );
    // Reported at the first operand.
    assert_eq!(analyzer.diagnostics()[0].get_line(), 5);
}

#[test]
fn test_void_operand_in_condition() {
    let analyzer = analyze("void f(void) { }\nvoid main(void)\n{\n    if (f() < 2) ;\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VoidOperand { function: "f".to_string() }]
    );
}

#[test]
fn test_int_call_is_not_flagged() {
    let analyzer = analyze("int f(void) { return 1; }\nvoid main(void)\n{\n    int x;\n    x = f() + f();\n}\n");

    assert!(!analyzer.failed());
}

#[test]
fn test_builtins_need_no_declaration() {
    let analyzer = analyze("void main(void)\n{\n    int x;\n    x = input();\n    output(x);\n}\n");

    assert!(!analyzer.failed());
    assert!(is_builtin("input"));
    assert!(is_builtin("output"));
    assert!(!is_builtin("main"));

    let input = analyzer.store().get("input").unwrap();
    assert_eq!(input.location, 0);
    assert_eq!(input.lines, vec![0, 4]);
    assert_eq!(analyzer.store().get("output").unwrap().data_type, DataType::Void);
}

#[test]
fn test_output_result_assigned() {
    let analyzer = analyze("void main(void)\n{\n    int x;\n    x = output(1);\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VoidAssignment { function: "output".to_string() }]
    );
}

#[test]
fn test_array_reserves_its_length() {
    let analyzer = analyze("int arr[5];\nint z;\nvoid main(void) { }\n");

    let arr = analyzer.store().get("arr").unwrap().location;
    let z = analyzer.store().get("z").unwrap().location;
    assert_eq!(z, arr + 5);
    assert_eq!(analyzer.store().get("main").unwrap().location, z + 1);
    assert_eq!(analyzer.context().next_location(), z + 2);
}

#[test]
fn test_parameters_are_scoped_to_their_function() {
    let analyzer = analyze("int f(int a, int b[])\n{\n    return a;\n}\nvoid main(void) { }\n");

    assert!(!analyzer.failed());

    let store = analyzer.store();
    assert_eq!(store.get("f").unwrap().scope, GLOBAL_SCOPE);
    assert_eq!(store.get("f").unwrap().location, 2);

    let a = store.get_in_scope("a", "f").unwrap();
    assert_eq!(a.location, 3);
    assert_eq!(a.lines, vec![1, 3]);
    assert_eq!(store.get_in_scope("b", "f").unwrap().location, 4);
}

#[test]
fn test_local_declarations_use_function_scope() {
    let analyzer = analyze("void main(void)\n{\n    int i;\n    i = 0;\n    while (i < 10) i = i + 1;\n}\n");

    assert!(!analyzer.failed());
    let i = analyzer.store().get_in_scope("i", "main").unwrap();
    assert_eq!(i.lines, vec![3, 4, 5, 5, 5]);
}

#[test]
fn test_redeclaration_resolves_to_use_site() {
    let tree = parse_source("void main(void)\n{\n    int a;\n    int a;\n}\n");
    let mut ctx = AnalysisContext::new();
    let mut store = RecordingStore::default();
    let mut reporter = Reporter::silent();

    assert!(build_symbol_table(&tree, &mut ctx, &mut store, &mut reporter));

    let inserts = store.inserts_of("a");
    assert_eq!(inserts.len(), 2);
    assert_eq!(inserts[0].location, 3);
    assert_eq!(inserts[1].location, USE_SITE);
    assert_eq!(inserts[1].scope, "main");
    assert_eq!(ctx.next_location(), 4);
}

#[test]
fn test_identifier_use_recorded_as_function() {
    let tree = parse_source("int x;\nvoid main(void)\n{\n    output(x);\n}\n");
    let mut store = RecordingStore::default();
    let mut reporter = Reporter::silent();

    build_symbol_table(&tree, &mut AnalysisContext::new(), &mut store, &mut reporter);

    let uses = store.inserts_of("x");
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[1].kind, SymbolKind::Function);
    assert_eq!(uses[1].location, USE_SITE);
    assert_eq!(uses[1].line, 4);

    // The stored entry keeps the kind it was declared with.
    assert_eq!(store.table.get("x").unwrap().kind, SymbolKind::Variable);
}

#[test]
fn test_assignment_target_registered_once() {
    let tree = parse_source("int x;\nvoid main(void)\n{\n    x = 3;\n}\n");
    let mut store = RecordingStore::default();
    let mut reporter = Reporter::silent();
    let mut ctx = AnalysisContext::new();

    let mut builder = SymbolTableBuilder::new(&mut store, &mut reporter);
    traverse(&tree, tree.root(), &mut builder, &mut ctx);

    let uses = store.inserts_of("x");
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[1].kind, SymbolKind::Variable);
    assert_eq!(uses[1].line, 4);
}

#[test]
fn test_call_recorded_without_type() {
    let tree = parse_source("int f(void) { return 0; }\nvoid main(void)\n{\n    f();\n}\n");
    let mut store = RecordingStore::default();
    let mut reporter = Reporter::silent();

    build_symbol_table(&tree, &mut AnalysisContext::new(), &mut store, &mut reporter);

    let calls = store.inserts_of("f");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].data_type, DataType::Unset);
    assert_eq!(calls[1].scope, "main");
    assert_eq!(store.table.function_type("f"), Some(DataType::Int));
}

#[test]
fn test_local_of_other_function_is_not_visible() {
    let analyzer = analyze("void a(void) { int x; }\nvoid main(void)\n{\n    x = 1;\n}\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::VariableNotDeclared { variable: "x".to_string() }]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 4);
    assert!(analyzer.store().get_in_scope("x", "main").is_none());
}

#[test]
fn test_local_named_main_is_not_an_entry_point() {
    let analyzer = analyze("void a(void) { int main; }\nvoid b(void)\n{\n    main;\n}\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![
            ErrorImpl::VariableNotDeclared { variable: "main".to_string() },
            ErrorImpl::MainNotDeclared,
        ]
    );
    assert!(analyzer.store().get_in_scope("main", "b").is_none());

    let listing = String::from_utf8(analyzer.into_output()).unwrap();
    assert!(!listing.contains("Symbol table"));
}

#[test]
fn test_same_local_name_in_two_functions() {
    let analyzer = analyze("void a(void) { int i; }\nvoid main(void) { int i; i = 1; }\n");

    assert!(!analyzer.failed());

    let in_a = analyzer.store().get_in_scope("i", "a").unwrap();
    let in_main = analyzer.store().get_in_scope("i", "main").unwrap();
    assert_ne!(in_a.location, in_main.location);
    assert_eq!(in_main.lines, vec![2, 2]);
}

#[test]
fn test_variable_named_after_function() {
    let analyzer = analyze("int f(void) { return 0; }\nvoid main(void)\n{\n    int f;\n    f = 1;\n}\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![
            ErrorImpl::NameUsedForFunction { name: "f".to_string() },
            ErrorImpl::NameUsedForFunction { name: "f".to_string() },
        ]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 4);
    assert_eq!(analyzer.diagnostics()[1].get_line(), 5);

    // The function entry is left untouched.
    let f = analyzer.store().get("f").unwrap();
    assert_eq!(f.kind, SymbolKind::Function);
    assert_eq!(f.lines, vec![1]);
}

#[test]
fn test_builtin_names_are_functions() {
    let analyzer = analyze("void main(void)\n{\n    int input;\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::NameUsedForFunction { name: "input".to_string() }]
    );
}

#[test]
fn test_repeated_parameter_gets_its_own_location() {
    let tree = parse_source("int f(int a, int a)\n{\n    return 0;\n}\nvoid main(void) { }\n");
    let mut ctx = AnalysisContext::new();
    let mut store = RecordingStore::default();
    let mut reporter = Reporter::silent();

    assert!(build_symbol_table(&tree, &mut ctx, &mut store, &mut reporter));
    assert!(reporter.diagnostics().is_empty());

    let params = store.inserts_of("a");
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].location, 3);
    assert_eq!(params[1].location, 4);
    assert!(params.iter().all(|param| param.scope == "f" && param.kind == SymbolKind::Variable));

    // input, output, f, a, a, main
    assert_eq!(ctx.next_location(), 6);
}

#[test]
fn test_undeclared_function() {
    let analyzer = analyze("void main(void)\n{\n    g();\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::FunctionNotDeclared { function: "g".to_string() }]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 3);
}

#[test]
fn test_duplicate_function() {
    let analyzer = analyze("void main(void) { }\nvoid main(void) { }\n");

    assert!(analyzer.failed());
    assert_eq!(
        error_kinds(&analyzer),
        vec![ErrorImpl::FunctionAlreadyDeclared { function: "main".to_string() }]
    );
    assert_eq!(analyzer.diagnostics()[0].get_line(), 2);
}

#[test]
fn test_missing_main() {
    let analyzer = analyze("int x;\n");

    assert_eq!(error_kinds(&analyzer), vec![ErrorImpl::MainNotDeclared]);
    assert_eq!(analyzer.diagnostics()[0].get_line(), 0);
}

#[test]
fn test_errors_accumulate() {
    let analyzer = analyze("void f(void) { }\nint g(void)\n{\n    a = 1;\n    b;\n    h();\n    return f();\n}\n");

    assert_eq!(
        error_kinds(&analyzer),
        vec![
            ErrorImpl::VariableNotDeclared { variable: "a".to_string() },
            ErrorImpl::VariableNotDeclared { variable: "b".to_string() },
            ErrorImpl::FunctionNotDeclared { function: "h".to_string() },
            ErrorImpl::MainNotDeclared,
        ]
    );
}

#[test]
fn test_reset_matches_fresh_run() {
    let first = parse_source("int a[10];\nint f(int p) { return p; }\nvoid main(void) { int q; q = f(1); }\n");
    let second = parse_source("int x;\nvoid main(void)\n{\n    x = input();\n}\n");

    let mut reused: Analyzer<SymbolTable, Vec<u8>> = Analyzer::new(Vec::new());
    assert!(reused.analyze(&first));
    reused.reset();
    assert_eq!(reused.context().next_location(), 0);
    assert!(reused.store().is_empty());
    assert!(reused.analyze(&second));

    let mut fresh: Analyzer<SymbolTable, Vec<u8>> = Analyzer::new(Vec::new());
    assert!(fresh.analyze(&second));

    assert_eq!(reused.store().symbols(), fresh.store().symbols());
    assert_eq!(reused.context().next_location(), fresh.context().next_location());
    assert_eq!(reused.context().scope, Scope::Global);
}

#[test]
fn test_reset_keeps_failure_until_cleared() {
    let broken = parse_source("void main(void) { y = 1; }");
    let valid = parse_source("void main(void) { }");

    let mut analyzer: Analyzer<SymbolTable, Vec<u8>> = Analyzer::new(Vec::new());
    assert!(!analyzer.analyze(&broken));

    analyzer.reset();
    assert!(analyzer.failed());

    analyzer.reporter_mut().clear();
    assert!(analyzer.analyze(&valid));
    assert!(analyzer.diagnostics().is_empty());
}
