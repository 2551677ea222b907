#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_format_value() {
    assert_eq!(format_value(3.0), "3");
    assert_eq!(format_value(-0.0), "-0");
    assert_eq!(format_value(2.5), "2.5");
    assert_eq!(format_value(f64::INFINITY), "inf");
    assert_eq!(format_value(1e20), "100000000000000000000");
}

#[test]
fn test_evaluate_lines_keeps_order_and_line_numbers() {
    let calculator = Calculator::new(AngleMode::Radian).unwrap();
    let text = "1 + 1\n\n  \n2 *\nmax(3, 4)\n";
    let results = evaluate_lines(&calculator, text);

    let numbers: Vec<usize> = results.iter().map(|(n, _)| *n).collect();
    assert_eq!(numbers, vec![1, 4, 5]);
    assert_eq!(results[0].1.as_ref().ok().copied().map(format_value), Some("2".to_owned()));
    assert!(results[1].1.is_err());
    assert_eq!(results[2].1.as_ref().ok().copied().map(format_value), Some("4".to_owned()));
}

#[test]
fn test_render_error_starts_with_the_exception_text() {
    let calculator = Calculator::new(AngleMode::Radian).unwrap();
    let e = calculator.run("1 +").unwrap_err();
    let rendered = render_error(&e);
    assert!(rendered.starts_with("error: calculate - "));
    assert!(rendered.ends_with('\n'));
    assert!(!rendered.contains("parser frames"));
}
