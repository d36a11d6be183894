// Integration tests for the C-minus pipeline

use cminus::codegen::Opcode;
use cminus::config::Config;
use cminus::parser::ast::{Declaration, NodeKind, TypeSpec};
use cminus::Compiler;

fn compiler() -> Compiler {
    let _ = env_logger::builder().is_test(true).try_init();
    Compiler::with_defaults().expect("built-in grammar loads")
}

fn listing(source: &str) -> Vec<String> {
    compiler()
        .compile(source)
        .code
        .iter()
        .map(|i| i.to_string())
        .collect()
}

#[test]
fn test_assign_sum() {
    let compilation = compiler().compile("int x ; void main ( void ) { x = 1 + 2 ; }");

    assert!(compilation.syntax_errors().is_empty());
    let decls = &compilation.program.declarations;
    assert!(matches!(
        &decls[0],
        Declaration::Var { ty: TypeSpec::Int, name, .. } if name == "x"
    ));
    assert!(matches!(&decls[1], Declaration::Fun { name, .. } if name == "main"));

    let x = compilation.symbols.lookup("x").expect("x is bound").address;
    let adds: Vec<_> = compilation.code.iter().filter(|i| i.op == Opcode::Add).collect();
    let assigns: Vec<_> = compilation.code.iter().filter(|i| i.op == Opcode::Assign).collect();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].to_string(), "0\t(ADD, #1, #2, 1000)");
    assert_eq!(assigns.len(), 1);
    assert_eq!(assigns[0].to_string(), format!("1\t(ASSIGN, 1000, , {})", x));
}

#[test]
fn test_if_else() {
    let code = listing(
        "int x;
        void main(void) {
            if (x < 1) x = 1;
            else x = 2;
        }",
    );

    assert_eq!(
        code,
        vec![
            "0\t(LT, 500, #1, 1000)",
            "1\t(JPF, 1000, , 4)",
            "2\t(ASSIGN, #1, , 500)",
            "3\t(JP, , , 5)",
            "4\t(ASSIGN, #2, , 500)",
        ]
    );
}

#[test]
fn test_missing_semicolon() {
    let compilation = compiler().compile("int x void main ( void ) { }");

    assert_eq!(
        compilation.syntax_report(),
        "#1 : syntax error, missing Declaration-prime\n#1 : syntax error, missing ;\n"
    );
    assert_eq!(compilation.ast_json().unwrap(), "{}");
    assert!(compilation.tree.render().trim_end().ends_with('$'));
}

#[test]
fn test_array_element() {
    let compilation = compiler().compile("int a [ 10 ] ; void main ( void ) { a [ 1 ] = 5 ; }");

    assert_eq!(compilation.symbols.entries().len(), 1);
    assert_eq!(
        compilation.tac_listing(),
        "0\t(MULT, #1, #4, 1000)\n1\t(ADD, #500, 1000, 1004)\n2\t(ASSIGN, #5, , @1004)\n"
    );
}

#[test]
fn test_loop_with_output() {
    let code = listing(
        "int i;
        int sum;
        void main(void) {
            i = 0;
            sum = 0;
            repeat {
                sum = sum + i;
                i = i + 1;
                if (10 <= i) break;
            } until (i == 100)
            output(sum);
        }",
    );

    assert_eq!(
        code,
        vec![
            "0\t(ASSIGN, #0, , 500)",
            "1\t(ASSIGN, #0, , 504)",
            "2\t(ADD, 504, 500, 1000)",
            "3\t(ASSIGN, 1000, , 504)",
            "4\t(ADD, 500, #1, 1004)",
            "5\t(ASSIGN, 1004, , 500)",
            "6\t(LE, #10, 500, 1008)",
            "7\t(JPF, 1008, , 9)",
            "8\t(JP, , , 11)",
            "9\t(EQ, 500, #100, 1012)",
            "10\t(JPF, 1012, , 2)",
            "11\t(PRINT, 504, , )",
        ]
    );
}

#[test]
fn test_ast_export() {
    let compilation = compiler().compile("int x; void main(void) { x = 1; }");
    let json = compilation.ast_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["NodeType"], "Program");
    assert_eq!(value["Children"][0]["NodeType"], "VarDecl");
    assert_eq!(value["Children"][1]["NodeType"], "FunDecl");
    assert_eq!(compilation.program.to_record().node_type, NodeKind::Program);
}

#[test]
fn test_comments_and_lexical_errors() {
    let compilation = compiler().compile(
        "/* globals */ int x;\nvoid main(void) { // body\n x = 2 ! 3; }",
    );

    assert_eq!(compilation.lexical_errors.len(), 1);
    assert_eq!(compilation.lexical_errors[0].line, 2);
}

#[test]
fn test_deterministic() {
    let source = "int a[4]; void main(void) { repeat { a[1] = a[1] + 1; if (a[1] == 3) break; } until (a[1] < 3) }";
    let first = compiler().compile(source);
    let second = compiler().compile(source);

    assert_eq!(first.program, second.program);
    assert_eq!(first.code, second.code);
    assert_eq!(first.tree.render(), second.tree.render());
}

#[test]
fn test_semantic_hook() {
    let mut config = Config::default();
    config.semantic.enabled = true;
    let compiler = Compiler::new(config).unwrap();

    let compilation = compiler.compile("void v;\nvoid main(void) {\n y = v;\n output(y);\n}");
    let rendered: Vec<String> = compilation
        .semantic_errors
        .unwrap()
        .iter()
        .map(|e| e.to_string())
        .collect();

    assert_eq!(
        rendered,
        vec![
            "1: Semantic Error! Illegal type of void for 'v'",
            "3: Semantic Error! 'y' is not defined",
            "4: Semantic Error! 'y' is not defined",
        ]
    );
}
