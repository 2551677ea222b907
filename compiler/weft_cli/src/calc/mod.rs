//! The calculator grammar.
//!
//! Lexing and parsing are two layers: a char-level lexeme produces operator,
//! decimal and word tokens, and a token grammar built from an operator
//! table evaluates them.
//!
//! | Precedence | Operators | Kind |
//! |------------|-----------|------|
//! | 70 | `+` `-` `!` | prefix |
//! | 60 | `**` | infix, right |
//! | 50 | `*` `/` `%` | infix, left |
//! | 40 | `+` `-` | infix, left |
//! | 20 | `==` `!=` `<=` `<` `>=` `>` | infix, left |
//! | 10 | `&&` `\|\|` | infix, left |
//!
//! Comparisons and logic yield `1` or `0`. A word is a constant, or a
//! function applied to a parenthesized list separated by `,` or `#`.

mod library;

use std::sync::Arc;

use weft_core::{
    build_expression_parser, eof, parse_tokens, plus, ret, run_parser, BinaryOp, OperatorTable, Parser,
    ParserException, ParserSlot, Tok, UnaryOp, UserError,
};
use weft_lex::lexer::{lex_decimal, lex_word, lexeme};
use weft_lex::scanner::is_whitespaces;
use weft_lex::terms::{on_decimal, on_word};
use weft_lex::{Terms, WordsError};

pub use library::{AngleMode, Library};

/// Every operator and punctuation token.
pub const OPERATORS: &[&str] = &[
    "!", "+", "-", "**", "*", "/", "%", "==", "!=", "<=", ">=", "<", ">", "&&", "||", "(", ")", ",", "#",
];

/// A compiled calculator; cheap to clone and share across threads.
#[derive(Clone)]
pub struct Calculator {
    lexer: Parser<Vec<Tok>>,
    parser: Parser<f64>,
}

impl Calculator {
    pub fn new(mode: AngleMode) -> Result<Self, WordsError> {
        let terms = Terms::operators(OPERATORS);
        let token = plus(vec![terms.lexer(), lex_decimal(), lex_word()]);
        let lexer = lexeme(&is_whitespaces().skip_many(), &token).followed_by(&eof("EOF"));

        let expr = ParserSlot::new();
        let term = term(&terms, &expr.parser(), Library::new(mode))?;
        let parsed = build_expression_parser(&term, &operator_table(&terms)?);
        expr.set(parsed.clone());
        let grammar = parsed.followed_by(&eof("EOF")).print_error("calculator", 1);
        let parser = parse_tokens(&lexer, &grammar, "EOF", |t| t.to_string(), "calculator");
        Ok(Calculator { lexer, parser })
    }

    /// Evaluate `expression`.
    pub fn run(&self, expression: &str) -> Result<f64, ParserException> {
        run_parser(expression, &self.parser, "calculate")
    }

    /// The tokens of `text`, without evaluating anything.
    pub fn tokens(&self, text: &str) -> Result<Vec<Tok>, ParserException> {
        run_parser(text, &self.lexer, "lex")
    }
}

/// A parenthesized expression, a constant or call, or a number.
fn term(terms: &Terms, expr: &Parser<f64>, library: Library) -> Result<Parser<f64>, WordsError> {
    let (open, close) = (terms.token("(")?, terms.token(")")?);
    let comma = terms.parser(&[",", "#"])?;
    let args = expr.sep_end_by(&comma).between(&open, &close);
    let call = on_word(|_, _, name| name.to_owned())
        .label("word")
        .and(&args.optional(), |name, args| (name, args.unwrap_or_default()))
        .try_map(move |(name, args)| library.call(&name, &args));
    let number = on_decimal(|_, _, text| text.to_owned())
        .label("number")
        .try_map(|text| text.parse::<f64>().map_err(|e| UserError::new(format!("{text}: {e}"))));
    Ok(plus(vec![expr.between(&open, &close), call, number]))
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn binary(
    terms: &Terms,
    name: &str,
    f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
) -> Result<Parser<BinaryOp<f64>>, WordsError> {
    let f: BinaryOp<f64> = Arc::new(f);
    Ok(terms.token(name)?.then(&ret(f)))
}

fn unary(
    terms: &Terms,
    name: &str,
    f: impl Fn(f64) -> f64 + Send + Sync + 'static,
) -> Result<Parser<UnaryOp<f64>>, WordsError> {
    let f: UnaryOp<f64> = Arc::new(f);
    Ok(terms.token(name)?.then(&ret(f)))
}

#[allow(clippy::float_cmp, reason = "comparison operators compare exactly")]
fn operator_table(terms: &Terms) -> Result<OperatorTable<f64>, WordsError> {
    Ok(OperatorTable::new()
        .infixl(binary(terms, "&&", |a, b| truth(a != 0.0 && b != 0.0))?, 10)
        .infixl(binary(terms, "||", |a, b| truth(a != 0.0 || b != 0.0))?, 10)
        .infixl(binary(terms, "==", |a, b| truth(a == b))?, 20)
        .infixl(binary(terms, "!=", |a, b| truth(a != b))?, 20)
        .infixl(binary(terms, "<=", |a, b| truth(a <= b))?, 20)
        .infixl(binary(terms, "<", |a, b| truth(a < b))?, 20)
        .infixl(binary(terms, ">=", |a, b| truth(a >= b))?, 20)
        .infixl(binary(terms, ">", |a, b| truth(a > b))?, 20)
        .infixl(binary(terms, "+", |a, b| a + b)?, 40)
        .infixl(binary(terms, "-", |a, b| a - b)?, 40)
        .infixl(binary(terms, "*", |a, b| a * b)?, 50)
        .infixl(binary(terms, "/", |a, b| a / b)?, 50)
        .infixl(binary(terms, "%", |a, b| a % b)?, 50)
        .infixr(binary(terms, "**", f64::powf)?, 60)
        .prefix(unary(terms, "+", |a| a)?, 70)
        .prefix(unary(terms, "-", |a| -a)?, 70)
        .prefix(unary(terms, "!", |a| truth(a == 0.0))?, 70))
}
