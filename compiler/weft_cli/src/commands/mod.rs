//! Command handlers for the `weft` CLI.
//!
//! Handlers print their results and exit with status 1 on failure; the
//! pieces they are built from return values so they can be tested.

use rayon::prelude::*;
use weft_core::{ExceptionKind, ParserException};

use crate::calc::{AngleMode, Calculator};

/// Evaluate one expression and print the result.
pub fn calc_expression(expression: &str, mode: AngleMode) {
    let calculator = calculator(mode);
    match calculator.run(expression) {
        Ok(value) => println!("{}", format_value(value)),
        Err(e) => {
            eprint!("{}", render_error(&e));
            std::process::exit(1);
        }
    }
}

/// Print the tokens of an expression, one per line.
pub fn lex_expression(expression: &str) {
    let calculator = calculator(AngleMode::default());
    match calculator.tokens(expression) {
        Ok(tokens) => {
            println!("Tokens for '{expression}':");
            for tok in &tokens {
                println!("  {:>4}..{:<4} {}", tok.index, tok.index + tok.length, tok.token);
            }
        }
        Err(e) => {
            eprint!("{}", render_error(&e));
            std::process::exit(1);
        }
    }
}

/// Evaluate every non-blank line of a file, printing results in order.
pub fn batch_file(path: &str, mode: AngleMode) {
    let content = read_file(path);
    let calculator = calculator(mode);
    let results = evaluate_lines(&calculator, &content);
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    for (line, result) in &results {
        match result {
            Ok(value) => println!("{line}: {}", format_value(*value)),
            Err(e) => print!("{line}: {}", render_error(e)),
        }
    }
    tracing::debug!(path, lines = results.len(), failed, "batch evaluated");
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Evaluate the non-blank lines of `text` in parallel; results keep
/// their 1-based line numbers and the input order.
pub fn evaluate_lines(calculator: &Calculator, text: &str) -> Vec<(usize, Result<f64, ParserException>)> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect();
    lines
        .par_iter()
        .map(|&(number, line)| (number, calculator.run(line)))
        .collect()
}

/// Integral values print without a fraction.
#[allow(clippy::float_cmp, reason = "an exact zero fraction is what is tested")]
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// The exception text, with the parser frames of internal faults.
pub fn render_error(e: &ParserException) -> String {
    let mut out = format!("error: {e}");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    if e.kind() == ExceptionKind::Internal && !e.frames().is_empty() {
        out.push_str("parser frames:\n");
        e.write_trace(&mut out).ok();
    }
    out
}

fn calculator(mode: AngleMode) -> Calculator {
    match Calculator::new(mode) {
        Ok(calculator) => calculator,
        Err(e) => {
            eprintln!("internal error: calculator grammar: {e}");
            std::process::exit(1);
        }
    }
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
                std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;
