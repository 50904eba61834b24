use tyscript::ast::NodeKind;
use tyscript::types::{EngineError, Inference, Type, pretty};
use tyscript::{CheckError, check_source};

fn infer(source: &str) -> Inference {
    match check_source(source) {
        Ok(checked) => checked.inference,
        Err(err) => panic!("checking failed: {err}"),
    }
}

fn binding(inference: &Inference, name: &str) -> String {
    inference
        .binding(name)
        .map(pretty)
        .unwrap_or_else(|| panic!("no binding named {name}"))
}

/// Types of every slot of the given kind, in visitation order
fn types_of(inference: &Inference, kind: NodeKind) -> Vec<String> {
    inference
        .entries()
        .iter()
        .filter(|slot| slot.kind == kind)
        .map(|slot| pretty(&slot.ty))
        .collect()
}

#[test]
fn literals_have_primitive_types() {
    let inference = infer("true; 42; 'text';");
    assert_eq!(types_of(&inference, NodeKind::BooleanLiteral), vec!["bool"]);
    assert_eq!(types_of(&inference, NodeKind::NumericLiteral), vec!["int"]);
    assert_eq!(types_of(&inference, NodeKind::StringLiteral), vec!["str"]);
}

#[test]
fn addition_of_ints_is_int() {
    let inference = infer("1 + 1;");
    assert_eq!(types_of(&inference, NodeKind::BinaryExpression), vec!["int"]);
    assert!(inference.type_errors().is_empty());
}

#[test]
fn comparison_is_bool() {
    let inference = infer("const small = 1 < 2;");
    assert_eq!(binding(&inference, "small"), "bool");
}

#[test]
fn equality_accepts_any_matching_operands() {
    let inference = infer("const same = 'a' === 'b';");
    assert_eq!(binding(&inference, "same"), "bool");
    assert!(inference.type_errors().is_empty());
}

#[test]
fn adding_string_to_int_is_a_type_error() {
    let inference = infer(r#""hi" + 1;"#);

    assert_eq!(
        types_of(&inference, NodeKind::StringLiteral),
        vec!["err: expected str and got int"]
    );

    let errors = inference.type_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, NodeKind::StringLiteral);
    assert_eq!(
        errors[0].message(),
        "type error in StringLiteral: err: expected str and got int"
    );
}

#[test]
fn declared_constant_takes_initializer_type() {
    let inference = infer("const answer = 42;");
    assert_eq!(binding(&inference, "answer"), "int");
}

#[test]
fn identity_function_is_polymorphic() {
    let inference = infer("const f = x => x; const i = f(1);");
    assert_eq!(binding(&inference, "f"), "(a) => a");
    assert_eq!(binding(&inference, "i"), "int");
}

#[test]
fn let_polymorphism_allows_different_instantiations() {
    let inference = infer(r#"const id = x => x; const a = id(1); const b = id("a");"#);
    assert_eq!(binding(&inference, "a"), "int");
    assert_eq!(binding(&inference, "b"), "str");
    assert!(inference.type_errors().is_empty());
}

#[test]
fn identity_called_in_separate_statements() {
    let inference = infer(r#"const id = x => x; id(1); id("a");"#);
    assert_eq!(
        types_of(&inference, NodeKind::CallExpression),
        vec!["int", "str"]
    );
    assert!(inference.type_errors().is_empty());
}

#[test]
fn literal_type_does_not_depend_on_context() {
    let alone = infer("true;");
    let among_bindings = infer("const q = 1; true;");
    assert_eq!(
        types_of(&alone, NodeKind::BooleanLiteral),
        types_of(&among_bindings, NodeKind::BooleanLiteral)
    );
    assert_eq!(types_of(&alone, NodeKind::BooleanLiteral), vec!["bool"]);
}

#[test]
fn memoize_keeps_the_wrapped_return_type() {
    let inference = infer(
        "const memoize = fn => a => fn(a);
         const getOne = memoize(a => 1);
         const n = getOne(0);",
    );
    assert_eq!(binding(&inference, "getOne"), "(a) => int");
    assert_eq!(binding(&inference, "n"), "int");
    assert!(inference.type_errors().is_empty());
}

#[test]
fn recursive_function_declaration() {
    let inference = infer("function f(x) { return f(x); }");
    assert_eq!(binding(&inference, "f"), "(a) => b");
    assert!(inference.type_errors().is_empty());
}

#[test]
fn redeclared_name_takes_the_last_declaration() {
    let inference = infer("var x = 1; var x = 'a';");
    assert_eq!(binding(&inference, "x"), "str");
    assert_eq!(types_of(&inference, NodeKind::NumericLiteral), vec!["int"]);
    assert!(inference.type_errors().is_empty());
}

#[test]
fn use_between_declarations_sees_the_earlier_one() {
    let inference = infer("let x = 1; const y = x; let x = true;");
    assert_eq!(binding(&inference, "y"), "int");
    assert_eq!(binding(&inference, "x"), "bool");
    assert!(inference.type_errors().is_empty());
}

#[test]
fn two_parameter_arrow() {
    let inference = infer("(x, y) => y;");
    assert_eq!(
        types_of(&inference, NodeKind::ArrowFunctionExpression),
        vec!["(a, b) => b"]
    );
}

#[test]
fn parameter_called_as_function() {
    let inference = infer("x => x(true);");
    assert_eq!(
        types_of(&inference, NodeKind::ArrowFunctionExpression),
        vec!["((bool) => a) => a"]
    );
}

#[test]
fn immediately_invoked_identity() {
    let inference = infer("(x => x)(1);");
    assert_eq!(types_of(&inference, NodeKind::CallExpression), vec!["int"]);
}

#[test]
fn object_literal_collects_properties() {
    let inference = infer(r#"const person = { name: "Jill", age: 41 };"#);
    assert_eq!(binding(&inference, "person"), "{ name: str, age: int }");
}

#[test]
fn empty_object_literal() {
    let inference = infer("const nothing = {};");
    assert_eq!(binding(&inference, "nothing"), "{}");
}

#[test]
fn function_declaration_with_return() {
    let inference = infer("function add(n) { return n + 1; }");
    assert_eq!(binding(&inference, "add"), "(int) => int");
}

#[test]
fn function_without_return_is_void() {
    let inference = infer("function noop(n) { const m = n; }");
    assert_eq!(binding(&inference, "noop"), "(a) => void");
}

#[test]
fn arrow_with_block_body() {
    let inference = infer("const twice = n => { return n * 2; };");
    assert_eq!(binding(&inference, "twice"), "(int) => int");
}

#[test]
fn later_use_narrows_earlier_parameter() {
    let inference = infer("const inc = n => n + 1;");
    assert_eq!(binding(&inference, "n"), "int");
    assert_eq!(binding(&inference, "inc"), "(int) => int");
}

#[test]
fn calling_with_too_few_arguments_is_an_error() {
    let inference = infer("const f = (a, b) => a; f(1);");
    let calls = types_of(&inference, NodeKind::CallExpression);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("err: "), "got {}", calls[0]);
    assert!(!inference.type_errors().is_empty());
}

#[test]
fn calling_a_number_is_an_error() {
    let inference = infer("const n = 1; n(2);");
    let call = inference
        .entries()
        .iter()
        .find(|slot| slot.kind == NodeKind::CallExpression)
        .map(|slot| slot.ty.clone());
    assert!(call.as_ref().is_some_and(Type::is_err));
    assert_eq!(inference.type_errors().len(), 1);
}

#[test]
fn nested_blocks_see_outer_declarations() {
    let inference = infer("const a = 1; { const b = a + 1; }");
    assert_eq!(binding(&inference, "b"), "int");
}

#[test]
fn declarator_without_initializer_is_a_variable() {
    let inference = infer("let later;");
    assert_eq!(binding(&inference, "later"), "a");
}

#[test]
fn undefined_identifier_stops_inference() {
    let err = check_source("missing;").err();
    assert!(matches!(
        err,
        Some(CheckError::Engine(EngineError::UnboundIdentifier { ref name, .. })) if name == "missing"
    ));
}

#[test]
fn null_has_no_rule() {
    let err = check_source("null;").err();
    assert!(matches!(
        err,
        Some(CheckError::Engine(EngineError::NoRule {
            kind: NodeKind::NullLiteral,
            ..
        }))
    ));
}

#[test]
fn parse_errors_are_reported_before_inference() {
    assert!(matches!(
        check_source("const = 1;"),
        Err(CheckError::Parse(errors)) if !errors.is_empty()
    ));
}

#[test]
fn type_at_finds_innermost_node() {
    let checked = check_source("const n = 1;").expect("checking failed");
    let tyscript::ast::statement::Statement::Declaration(declaration) = &checked.program.body[0]
    else {
        panic!("expected declaration");
    };
    let init = declaration.declarators[0]
        .init
        .as_ref()
        .expect("initializer");
    let (line, column) = init.position().start;

    let slot = checked
        .inference
        .type_at(line, column)
        .expect("a node at the literal");
    assert_eq!(slot.kind, NodeKind::NumericLiteral);
    assert_eq!(pretty(&slot.ty), "int");
}

#[test]
fn every_binding_is_reported_in_order() {
    let inference = infer("const f = x => x; const n = f(2);");
    let names: Vec<_> = inference.bindings().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "f", "n"]);
}

#[test]
fn comments_do_not_affect_inference() {
    let inference = infer("// a number\nconst n = /* inline */ 1;");
    assert_eq!(binding(&inference, "n"), "int");
}
