//! Re-serialization tests

use crate::frontend::core::lexer::TokenList;
use crate::frontend::core::parser::{
    append_to_token_list, parse_expression, Expr, OpArity, OpRendering, OperatorTable,
};

fn parse_one(line: &str) -> Expr {
    let mut tokens = TokenList::from_text(line);
    parse_expression(&mut tokens, None)
        .expect("parse failed")
        .expect("no expression")
}

fn render(expr: &Expr, table: &OperatorTable) -> String {
    let mut tokens = TokenList::new();
    append_to_token_list(expr, &mut tokens, table, Some(-1));
    tokens.to_text()
}

#[test]
fn test_display_round_trip() {
    for (line, expected) in [
        ("a + b * c", "a+b*c"),
        ("(a + b) * c", "(a+b)*c"),
        ("a * (b + c)", "a*(b+c)"),
        ("x <- 3 + 4 * 2", "x<-3+4*2"),
        ("pow(x, 2)", "pow(x,2)"),
        ("stack[top - 1]", "stack[top-1]"),
        ("m[i, j]", "m[i,j]"),
        ("{1, 2, 3}", "{1,2,3}"),
        ("Point{x: 1, y: 2}", "Point{x:1,y:2}"),
        ("-x * y", "-x*y"),
        ("-(x * y)", "-(x*y)"),
        ("p.x + 1", "p.x+1"),
        ("a and b", "a and b"),
    ] {
        let expr = parse_one(line);
        assert_eq!(expr.to_string(), expected, "rendering {}", line);
    }
}

#[test]
fn test_reparse_of_rendering_gives_same_tree() {
    for line in ["a + b * c", "(a + b) * c", "f(a, -b)", "r.x[2] <- {1, 2}"] {
        let expr = parse_one(line);
        let again = parse_one(&expr.to_string());
        // Spans differ, shape and texts must not
        assert_eq!(strip(&expr), strip(&again), "{}", line);
    }
}

fn strip(expr: &Expr) -> (String, Vec<(String, String)>) {
    fn walk(expr: &Expr, out: &mut Vec<(String, String)>) {
        out.push((format!("{:?}", expr.kind), expr.text.clone()));
        for child in &expr.children {
            walk(child, out);
        }
    }
    let mut shape = Vec::new();
    walk(expr, &mut shape);
    (expr.to_string(), shape)
}

#[test]
fn test_no_parens_below_access_operators() {
    // The index position is bracketed anyway
    let expr = parse_one("a[i + 1]");
    assert_eq!(expr.to_string(), "a[i+1]");
}

#[test]
fn test_alternate_symbol_table() {
    let table = OperatorTable::standard().with("div", OpArity::Binary, OpRendering::symbol("/", 10));
    let expr = parse_one("10 div 3");
    assert_eq!(render(&expr, &table), "10/3");
}

#[test]
fn test_operator_as_function_call() {
    let table =
        OperatorTable::standard().with("<<", OpArity::Binary, OpRendering::call("shiftl", vec![]));
    let expr = parse_one("a << 2");
    assert_eq!(render(&expr, &table), "shiftl(a,2)");
}

#[test]
fn test_operator_as_method_with_reordered_operands() {
    let table = OperatorTable::standard().with(
        "+",
        OpArity::Binary,
        OpRendering::method("plus", vec![1, 0]),
    );
    let expr = parse_one("a + b");
    assert_eq!(render(&expr, &table), "b.plus(a)");
}

#[test]
fn test_empty_table_forces_parentheses() {
    let table = OperatorTable::empty();
    let expr = parse_one("a + b * c");
    assert_eq!(render(&expr, &table), "(a+(b*c))");
}
