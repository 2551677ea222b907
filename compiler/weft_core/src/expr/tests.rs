#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;
use crate::parser::prim::{eof, ret, ParserSlot};
use crate::test_helpers::{ch, number, parse, parse_ok};

fn bin(c: char, f: fn(i64, i64) -> i64) -> Parser<BinaryOp<i64>> {
    let f: BinaryOp<i64> = Arc::new(f);
    ch(c).then(&ret(f))
}

fn un(c: char, f: fn(i64) -> i64) -> Parser<UnaryOp<i64>> {
    let f: UnaryOp<i64> = Arc::new(f);
    ch(c).then(&ret(f))
}

fn whole<T: 'static>(p: &Parser<T>) -> Parser<T> {
    p.followed_by(&eof("EOF"))
}

fn calculator() -> Parser<i64> {
    let expr = ParserSlot::new();
    let term = number() | expr.parser().between(&ch('('), &ch(')'));
    let table = OperatorTable::new()
        .infixl(bin('+', |a, b| a + b), 40)
        .infixl(bin('-', |a, b| a - b), 40)
        .infixl(bin('*', |a, b| a * b), 50)
        .infixl(bin('/', |a, b| a / b), 50)
        .infixr(bin('^', |a, b| a.pow(u32::try_from(b).unwrap_or(0))), 60)
        .prefix(un('-', |a| -a), 70);
    let parser = build_expression_parser(&term, &table);
    expr.set(parser.clone());
    whole(&parser)
}

#[test]
fn test_infixl_folds_left() {
    let p = whole(&infixl(&bin('-', |a, b| a - b), &number()));
    assert_eq!(parse_ok(&p, "8-3-2"), 3);
    assert_eq!(parse_ok(&p, "8"), 8);
}

#[test]
fn test_infixr_folds_right() {
    let p = whole(&infixr(&bin('^', |a, b| a.pow(u32::try_from(b).unwrap_or(0))), &number()));
    assert_eq!(parse_ok(&p, "2^3^2"), 512);
    let p = whole(&infixr(&bin('-', |a, b| a - b), &number()));
    assert_eq!(parse_ok(&p, "8-3-2"), 7);
}

#[test]
fn test_infixn_does_not_chain() {
    let eq = whole(&infixn(&bin('=', |a, b| i64::from(a == b)), &number()));
    assert_eq!(parse_ok(&eq, "1=1"), 1);
    assert_eq!(parse_ok(&eq, "1"), 1);
    assert!(parse(&eq, "1=1=1").is_err());
}

#[test]
fn test_prefix_applies_innermost_first() {
    let ops = un('-', |a| -a) | un('~', |a| a + 10);
    let p = whole(&prefix(&ops, &number()));
    assert_eq!(parse_ok(&p, "-~5"), -15);
    assert_eq!(parse_ok(&p, "--5"), 5);
}

#[test]
fn test_postfix_applies_left_to_right() {
    let ops = un('!', |a| a * 2) | un('?', |a| a + 1);
    let p = whole(&postfix(&ops, &number()));
    assert_eq!(parse_ok(&p, "5!?"), 11);
    assert_eq!(parse_ok(&p, "5?!"), 12);
}

#[test]
fn test_operator_table_precedence() {
    let calc = calculator();
    for (source, value) in [
        ("2*3+4", 10),
        ("2+3*4", 14),
        ("10-4-3", 3),
        ("2^3^2", 512),
        ("-2^2", 4),
        ("(1+2)*3", 9),
        ("-(1+2)*-(3)", 9),
    ] {
        assert_eq!(parse_ok(&calc, source), value, "{source}");
    }
    assert!(parse(&calc, "1+").is_err());
    assert!(parse(&calc, "(1").is_err());
}

#[test]
fn test_levels_group_by_precedence_and_kind() {
    let table = OperatorTable::new()
        .infixl(bin('+', |a, b| a + b), 10)
        .prefix(un('-', |a| -a), 10)
        .infixl(bin('-', |a, b| a - b), 10)
        .infixr(bin('^', |a, b| a + b), 30)
        .postfix(un('!', |a| a), 20);
    assert_eq!(table.len(), 5);
    assert!(!table.is_empty());
    let levels: Vec<(OperatorKind, usize)> = table.levels().iter().map(|(k, ops)| (*k, ops.len())).collect();
    assert_eq!(
        levels,
        vec![
            (OperatorKind::RightAssoc, 1),
            (OperatorKind::Postfix, 1),
            (OperatorKind::Prefix, 1),
            (OperatorKind::LeftAssoc, 2),
        ]
    );
    assert!(OperatorTable::<i64>::new().is_empty());
}
