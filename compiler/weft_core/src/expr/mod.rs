//! Operator expressions.
//!
//! Operator parsers yield the function to apply: a [`UnaryOp`] for prefix
//! and postfix operators, a [`BinaryOp`] for infix ones. [`prefix`],
//! [`postfix`] and the `infix*` functions wrap one precedence level around
//! an operand parser; [`build_expression_parser`] stacks the levels of an
//! [`OperatorTable`], tightest first:
//!
//! ```ignore
//! let table = OperatorTable::new()
//!     .infixl(plus, 40)
//!     .infixl(minus, 40)
//!     .infixl(times, 50)
//!     .prefix(negate, 70);
//! let expr = build_expression_parser(&atom, &table);
//! ```

use std::sync::Arc;

use crate::accumulator::FoldLeft;
use crate::parser::{plus, repeat_into, Parser};

/// What a prefix or postfix operator parses to.
pub type UnaryOp<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// What an infix operator parses to.
pub type BinaryOp<T> = Arc<dyn Fn(T, T) -> T + Send + Sync>;

/// Zero or more prefix operators, then the operand; the operator closest
/// to the operand applies first.
pub fn prefix<T: 'static>(op: &Parser<UnaryOp<T>>, operand: &Parser<T>) -> Parser<T> {
    op.many()
        .and(operand, |ops, value| ops.iter().rev().fold(value, |acc, f| f(acc)))
}

/// The operand, then zero or more postfix operators, applied left to right.
pub fn postfix<T: 'static>(op: &Parser<UnaryOp<T>>, operand: &Parser<T>) -> Parser<T> {
    operand.and(&op.many(), |value, ops| ops.iter().fold(value, |acc, f| f(acc)))
}

/// `a`, or `a op b`; never `a op b op c`.
pub fn infixn<T: 'static>(op: &Parser<BinaryOp<T>>, operand: &Parser<T>) -> Parser<T> {
    let tail = op.and(operand, |f, rhs| (f, rhs)).optional();
    operand.and(&tail, |lhs, tail| match tail {
        Some((f, rhs)) => f(lhs, rhs),
        None => lhs,
    })
}

/// `a op b op c` as `(a op b) op c`.
pub fn infixl<T: 'static>(op: &Parser<BinaryOp<T>>, operand: &Parser<T>) -> Parser<T> {
    let first = operand.clone();
    let tail = op.and(operand, |f, rhs| (f, rhs));
    Parser::from_fn(move |ctx| {
        let lhs = first.parse(ctx)?;
        let fold = FoldLeft::new(lhs, |acc, (f, rhs): (BinaryOp<T>, T)| f(acc, rhs));
        repeat_into(&tail, ctx, fold, 0, None)
    })
}

/// `a op b op c` as `a op (b op c)`.
pub fn infixr<T: 'static>(op: &Parser<BinaryOp<T>>, operand: &Parser<T>) -> Parser<T> {
    let tail = op.and(operand, |f, rhs| (f, rhs));
    operand.and(&tail.many(), fold_right)
}

fn fold_right<T>(first: T, rest: Vec<(BinaryOp<T>, T)>) -> T {
    let mut rest = rest.into_iter().rev();
    let Some((mut op, mut acc)) = rest.next() else {
        return first;
    };
    for (prev, value) in rest {
        acc = op(value, acc);
        op = prev;
    }
    op(first, acc)
}

/// Operator kinds, in the order levels of equal precedence are built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorKind {
    Prefix,
    Postfix,
    LeftAssoc,
    RightAssoc,
    NonAssoc,
}

enum OpParser<T> {
    Unary(Parser<UnaryOp<T>>),
    Binary(Parser<BinaryOp<T>>),
}

struct Operator<T> {
    kind: OperatorKind,
    precedence: i32,
    op: OpParser<T>,
}

/// Operators with precedences; a higher precedence binds tighter.
pub struct OperatorTable<T> {
    operators: Vec<Operator<T>>,
}

impl<T> Default for OperatorTable<T> {
    fn default() -> Self {
        OperatorTable {
            operators: Vec::new(),
        }
    }
}

impl<T: 'static> OperatorTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, kind: OperatorKind, precedence: i32, op: OpParser<T>) -> Self {
        self.operators.push(Operator { kind, precedence, op });
        self
    }

    #[must_use]
    pub fn prefix(self, op: Parser<UnaryOp<T>>, precedence: i32) -> Self {
        self.with(OperatorKind::Prefix, precedence, OpParser::Unary(op))
    }

    #[must_use]
    pub fn postfix(self, op: Parser<UnaryOp<T>>, precedence: i32) -> Self {
        self.with(OperatorKind::Postfix, precedence, OpParser::Unary(op))
    }

    #[must_use]
    pub fn infixl(self, op: Parser<BinaryOp<T>>, precedence: i32) -> Self {
        self.with(OperatorKind::LeftAssoc, precedence, OpParser::Binary(op))
    }

    #[must_use]
    pub fn infixr(self, op: Parser<BinaryOp<T>>, precedence: i32) -> Self {
        self.with(OperatorKind::RightAssoc, precedence, OpParser::Binary(op))
    }

    #[must_use]
    pub fn infixn(self, op: Parser<BinaryOp<T>>, precedence: i32) -> Self {
        self.with(OperatorKind::NonAssoc, precedence, OpParser::Binary(op))
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators grouped into levels: highest precedence first, then by
    /// kind; registration order within a level.
    fn levels(&self) -> Vec<(OperatorKind, Vec<&OpParser<T>>)> {
        let mut sorted: Vec<&Operator<T>> = self.operators.iter().collect();
        sorted.sort_by(|a, b| b.precedence.cmp(&a.precedence).then(a.kind.cmp(&b.kind)));
        let mut levels: Vec<(i32, OperatorKind, Vec<&OpParser<T>>)> = Vec::new();
        for op in sorted {
            match levels.last_mut() {
                Some((prec, kind, ops)) if *prec == op.precedence && *kind == op.kind => ops.push(&op.op),
                _ => levels.push((op.precedence, op.kind, vec![&op.op])),
            }
        }
        levels.into_iter().map(|(_, kind, ops)| (kind, ops)).collect()
    }
}

/// Wrap `term` in one level per (precedence, kind) group of `table`, from
/// the tightest binding level outwards.
pub fn build_expression_parser<T: 'static>(term: &Parser<T>, table: &OperatorTable<T>) -> Parser<T> {
    let mut operand = term.clone();
    for (kind, ops) in table.levels() {
        operand = match kind {
            OperatorKind::Prefix | OperatorKind::Postfix => {
                let op = plus(ops.into_iter().filter_map(unary).collect());
                if kind == OperatorKind::Prefix {
                    prefix(&op, &operand)
                } else {
                    postfix(&op, &operand)
                }
            }
            OperatorKind::LeftAssoc | OperatorKind::RightAssoc | OperatorKind::NonAssoc => {
                let op = plus(ops.into_iter().filter_map(binary).collect());
                match kind {
                    OperatorKind::LeftAssoc => infixl(&op, &operand),
                    OperatorKind::RightAssoc => infixr(&op, &operand),
                    _ => infixn(&op, &operand),
                }
            }
        };
    }
    operand
}

fn unary<T>(op: &OpParser<T>) -> Option<Parser<UnaryOp<T>>> {
    match op {
        OpParser::Unary(p) => Some(p.clone()),
        OpParser::Binary(_) => None,
    }
}

fn binary<T>(op: &OpParser<T>) -> Option<Parser<BinaryOp<T>>> {
    match op {
        OpParser::Binary(p) => Some(p.clone()),
        OpParser::Unary(_) => None,
    }
}

#[cfg(test)]
mod tests;
