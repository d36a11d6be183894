// Error recovery and robustness tests

use cminus::grammar::{Decision, GrammarModel, ParseTable};
use cminus::parser::{Lexer, PredictiveParser, SyntaxErrorKind, Token, TokenKind, MAX_NESTING_DEPTH};
use cminus::Compiler;

fn compiler() -> Compiler {
    Compiler::with_defaults().expect("built-in grammar loads")
}

/// Token source that counts how often the parser pulls from it.
struct CountingSource {
    tokens: std::vec::IntoIter<Token>,
    pulls: usize,
}

impl Iterator for CountingSource {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.pulls += 1;
        self.tokens.next()
    }
}

#[test]
fn test_table_covers_follow_sets() {
    let grammar = GrammarModel::cminus().unwrap();
    let table = ParseTable::build(&grammar);

    for nonterminal in grammar.nonterminals() {
        for terminal in grammar.follow(nonterminal) {
            assert!(
                !matches!(table.lookup(nonterminal, terminal), Decision::Error),
                "no entry for ({}, {})",
                nonterminal,
                terminal
            );
        }
    }
    assert!(table.conflicts().is_empty());
}

#[test]
fn test_garbage_terminates() {
    let inputs = [
        "",
        "}}}}}}",
        "int int int int",
        "void main(void) { if ( repeat until ) else }",
        "void main(void) { output(1, ; }",
        "int a[; int b]; void",
        "( ( ( ( ( 1",
        "@@@ $$$ ###",
        "void main(void) { repeat repeat repeat until until }",
        "int x = 5;",
        "/* never closed",
    ];

    for source in inputs {
        let compilation = compiler().compile(source);
        // Every significant token is read at most once, plus the end marker.
        assert!(compilation.tokens_consumed <= source.len() + 1, "{source:?}");
        assert!(compilation.tree.render().lines().count() >= 1);
    }
}

#[test]
fn test_cursor_reads_each_token_once() {
    let grammar = GrammarModel::cminus().unwrap();
    let table = ParseTable::build(&grammar);
    let inputs = [
        "int x; void main(void) { x = 1 + 2; output(x); }",
        "}}}} else until ) ]",
        "int a[; int b]; void",
        "void main(void) { if ( repeat until ) else }",
        "int x /* note */ ;\n void f(int v[]) { v[0] = 1; }",
        "( ( ( ( ( 1",
        "",
    ];

    for source in inputs {
        let (tokens, _) = Lexer::tokenize(source);
        let significant: Vec<Token> = tokens.iter().filter(|t| !t.kind.is_trivia()).cloned().collect();
        let mut counting = CountingSource {
            tokens: tokens.clone().into_iter(),
            pulls: 0,
        };

        let outcome = PredictiveParser::new(&table)
            .with_trace(true)
            .parse(&mut counting);

        // At most one pull past the last token, to see the source is empty.
        assert!(counting.pulls <= tokens.len() + 1, "{source:?}");
        assert!(outcome.tokens_consumed <= significant.len(), "{source:?}");
        assert_eq!(
            &outcome.trace[..outcome.tokens_consumed],
            &significant[..outcome.tokens_consumed],
            "{source:?}"
        );
    }
}

#[test]
fn test_deep_nesting_is_reported_not_fatal() {
    let parens = format!(
        "int x;\nvoid main(void) {{ x = {}1{}; }}\nvoid f(void) {{ x = 2; }}",
        "(".repeat(20_000),
        ")".repeat(20_000)
    );
    let blocks = format!("void main(void) {}{}", "{".repeat(20_000), "}".repeat(20_000));

    let mut listings = Vec::new();
    for source in [parens, blocks] {
        let compilation = compiler().compile(&source);
        assert!(
            compilation
                .syntax_errors()
                .iter()
                .any(|e| e.kind == SyntaxErrorKind::TooDeep(MAX_NESTING_DEPTH)),
            "no nesting diagnostic"
        );
        listings.push(compilation.tac_listing());
    }
    assert_eq!(listings, vec!["0\t(ASSIGN, #2, , 500)\n".to_string(), String::new()]);
}

#[test]
fn test_malformed_constructs_are_reported() {
    let inputs = [
        "int x void main(void) { }",
        "void main(void) { x = ; }",
        "void main(void) { if (x) }",
        "void main(void) { repeat x = 1; }",
        "int f(int) { }",
        "int a[];",
        "void main(void) {",
    ];

    for source in inputs {
        let compilation = compiler().compile(source);
        assert!(compilation.has_syntax_errors(), "no diagnostic for {source:?}");
        assert!(!compilation.syntax_report().starts_with("There is no"));
    }
}

#[test]
fn test_recovery_keeps_later_declarations() {
    let compilation = compiler().compile(
        "int a;\nint b[;\nint c;\nvoid main(void) { c = 1; }",
    );

    assert!(compilation.has_syntax_errors());
    let names: Vec<&str> = compilation.program.declarations.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["a", "c", "main"]);
    assert_eq!(compilation.tac_listing(), "0\t(ASSIGN, #1, , 504)\n");
}

#[test]
fn test_unexpected_eof() {
    let compilation = compiler().compile("void main(void) {\n x = 1;\n");

    let errors = compilation.syntax_errors();
    assert!(
        errors.iter().any(|e| e.kind == SyntaxErrorKind::UnexpectedEof),
        "{:?}",
        errors
    );
}

#[test]
fn test_custom_token_source() {
    let grammar = GrammarModel::cminus().unwrap();
    let table = ParseTable::build(&grammar);
    let tokens = vec![
        Token::new(1, TokenKind::Keyword, "int"),
        Token::new(1, TokenKind::Whitespace, " "),
        Token::new(1, TokenKind::Id, "x"),
        Token::new(1, TokenKind::Comment, "/* c */"),
        Token::new(1, TokenKind::Symbol, ";"),
        Token::eof(1),
    ];

    let outcome = PredictiveParser::new(&table)
        .with_trace(true)
        .parse(tokens.into_iter());

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let lexemes: Vec<&str> = outcome.trace.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["int", "x", ";", "$"]);
    assert_eq!(outcome.tokens_consumed, 4);
}

#[test]
fn test_codegen_runs_on_recovered_ast() {
    let compilation = compiler().compile(
        "int x;\nvoid main(void) {\n x = 1 +;\n x = 2;\n}",
    );

    assert!(compilation.has_syntax_errors());
    assert_eq!(compilation.tac_listing(), "0\t(ASSIGN, #2, , 500)\n");
}
