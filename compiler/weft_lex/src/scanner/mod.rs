//! Scanners: char-level parsers that recognize text and return nothing.
//!
//! Most scanners are a [`Pattern`] run at the cursor, see [`is_pattern`].
//! A pattern match is one step however long it is, and a mismatch never
//! consumes, so scanners built this way are atomic. Scanners composed from
//! other scanners (block comments, quoted literals) commit once their opening
//! part has matched.

use std::sync::Arc;

use weft_core::{plus, sequence, zero, Failure, Parser};
use weft_pattern::chars::{self, is_alphanumeric, is_whitespace, CharPredicate};
use weft_pattern::pattern::{self, has_at_least, is_escaped, many_min, many_of, or};
use weft_pattern::Pattern;

/// Scanner output.
pub type Scanner = Parser<()>;

/// How a char reads in a label; blanks get names.
pub fn encode(c: char) -> String {
    match c {
        ' ' => "SPACE".to_owned(),
        '\t' => "HTAB".to_owned(),
        '\r' => "CR".to_owned(),
        '\n' => "LF".to_owned(),
        c => c.to_string(),
    }
}

fn list_label(prefix: &str, cs: &[char]) -> String {
    let body: Vec<String> = cs.iter().map(|&c| encode(c)).collect();
    format!("{prefix}[{}]", body.join(","))
}

/// Match `pattern` at the cursor, expecting `label` on a mismatch.
pub fn is_pattern(pattern: &Pattern, label: impl Into<Arc<str>>) -> Scanner {
    let pattern = pattern.clone();
    let label: Arc<str> = label.into();
    Parser::from_fn(move |ctx| {
        let source = ctx.source()?;
        match pattern.matches(source, ctx.at(), ctx.end()) {
            Some(len) => {
                ctx.advance_by(len);
                Ok(())
            }
            None => Err(ctx.fail_expecting_encountered(Arc::clone(&label))),
        }
    })
}

pub fn any_char() -> Scanner {
    Parser::from_fn(|ctx| match ctx.peek_char()? {
        Some(_) => {
            ctx.advance();
            Ok(())
        }
        None => Err(ctx.fail_expecting_encountered("any character")),
    })
}

pub fn is_char(c: char) -> Scanner {
    is_pattern(&pattern::is_char(c), encode(c))
}

/// One char satisfying `pred`, expecting the predicate's label.
pub fn is_char_where(pred: &CharPredicate) -> Scanner {
    is_pattern(&pattern::is_char_where(pred.clone()), pred.label())
}

pub fn not_char(c: char) -> Scanner {
    is_pattern(&pattern::not_char(c), format!("^{}", encode(c)))
}

/// One of `cs`; never matches if `cs` is empty.
pub fn among(cs: &[char]) -> Scanner {
    match cs {
        [] => zero(),
        [c] => is_char(*c),
        _ => is_pattern(&pattern::among(cs), list_label("", cs)),
    }
}

/// Any char but `cs`.
pub fn not_among(cs: &[char]) -> Scanner {
    match cs {
        [] => any_char(),
        [c] => not_char(*c),
        _ => is_pattern(&pattern::not_among(cs), list_label("^", cs)),
    }
}

/// Zero or more chars satisfying `pred`; never fails.
pub fn many_chars(pred: &CharPredicate) -> Scanner {
    is_pattern(&many_of(pred.clone()), "many")
}

/// Zero or more matches of `pattern`; never fails.
pub fn many_pattern(pattern: &Pattern) -> Scanner {
    is_pattern(&pattern.many(), "many")
}

pub fn is_string(s: &str) -> Scanner {
    is_pattern(&pattern::is_string(s), s)
}

pub fn is_string_ci(s: &str) -> Scanner {
    is_pattern(&pattern::is_string_ci(s), s)
}

/// One or more whitespace chars.
pub fn is_whitespaces() -> Scanner {
    is_pattern(&many_min(1, is_whitespace()), "whitespace")
}

// === Comments ===

/// `open` up to the end of the line; the line break is not part of it.
pub fn is_line_comment(open: &str) -> Scanner {
    is_pattern(&pattern::is_line_comment(open), open)
}

pub fn is_java_line_comment() -> Scanner {
    is_line_comment("//")
}

pub fn is_sql_line_comment() -> Scanner {
    is_line_comment("--")
}

pub fn is_haskell_line_comment() -> Scanner {
    is_line_comment("--")
}

/// `open`, anything up to the first `close`, then `close`.
pub fn is_block_comment(open: &str, close: &str) -> Scanner {
    let opening = pattern::is_string(open).seq(&pattern::not_string(close).many());
    is_pattern(&opening, open)
        .then(&is_string(close))
        .rename("block comment")
}

/// A block comment whose body is made of `commented` matches.
pub fn is_block_comment_with(open: &str, close: &str, commented: &Pattern) -> Scanner {
    let opening = pattern::is_string(open).seq(&pattern::is_string(close).not().seq(commented).many());
    is_pattern(&opening, open).then(&is_string(close))
}

/// A block comment from scanners: `open`, `commented` until `close`, `close`.
pub fn is_block_comment_by(open: &Scanner, close: &Scanner, commented: &Scanner) -> Scanner {
    let body = close.not().then(commented).skip_many();
    sequence(vec![open.clone(), body, close.clone()])
}

/// One char, unless the next two are `c1` `c2`; needs two chars left.
fn not_char2(c1: char, c2: char) -> Pattern {
    let pair: String = [c1, c2].iter().collect();
    pattern::sequence(vec![
        has_at_least(2).peek(),
        pattern::is_string(&pair).not(),
        has_at_least(1),
    ])
}

/// `/* ... */`, not nested.
pub fn is_java_block_comment() -> Scanner {
    let body = is_pattern(&not_char2('*', '/').many(), "commented block");
    sequence(vec![is_string("/*"), body, is_string("*/")]).rename("java block comment")
}

/// `{- ... -}`, not nested.
pub fn is_haskell_block_comment() -> Scanner {
    let body = is_pattern(&not_char2('-', '}').many(), "commented block");
    sequence(vec![is_string("{-"), body, is_string("-}")]).rename("haskell block comment")
}

/// A block comment where `open`/`close` pairs nest.
pub fn is_nestable_block_comment(open: &str, close: &str) -> Scanner {
    is_nestable_block_comment_by(&is_string(open), &is_string(close), &any_char())
}

/// Nesting block comment from scanners.
///
/// All three scanners must consume when they succeed; one that does not is
/// an internal fault, since the comment could never end.
pub fn is_nestable_block_comment_by(open: &Scanner, close: &Scanner, commented: &Scanner) -> Scanner {
    let (open, close, commented) = (open.clone(), close.clone(), commented.clone());
    Parser::from_fn(move |ctx| {
        open.parse(ctx)?;
        let mut level = 1usize;
        while level > 0 {
            let at = ctx.at();
            match close.parse(ctx) {
                Ok(()) if ctx.at() == at => {
                    return Err(ctx.fault("closing comment scanner not consuming input"));
                }
                Ok(()) => {
                    level -= 1;
                    continue;
                }
                Err(Failure::Fail) if ctx.at() == at => {}
                Err(failure) => return Err(failure),
            }
            match open.parse(ctx) {
                Ok(()) if ctx.at() == at => {
                    return Err(ctx.fault("opening comment scanner not consuming input"));
                }
                Ok(()) => {
                    level += 1;
                    continue;
                }
                Err(Failure::Fail) if ctx.at() == at => {}
                Err(failure) => return Err(failure),
            }
            commented.parse(ctx)?;
            if ctx.at() == at {
                return Err(ctx.fault("commented scanner not consuming input"));
            }
        }
        Ok(())
    })
    .rename("nestable block comment")
}

// === Literals ===

/// `'...'` where `''` is an escaped quote.
pub fn is_sql_string() -> Scanner {
    let quote = is_char('\'');
    let body = or(&pattern::is_string("''"), &pattern::not_char('\'')).many();
    is_pattern(&body, "quoted string")
        .between(&quote, &quote)
        .rename("sql string")
}

/// `"..."` with backslash escapes.
pub fn is_quoted_string() -> Scanner {
    let quote = is_char('"');
    let body = or(&is_escaped(), &pattern::not_among(&['"', '\\'])).many();
    is_pattern(&body, "quoted string")
        .between(&quote, &quote)
        .rename("quoted string")
}

/// `'c'` or `'\c'`.
pub fn is_quoted_char() -> Scanner {
    let quote = is_char('\'');
    let body = or(&is_escaped(), &pattern::not_among(&['\'', '\\']));
    is_pattern(&body, "quoted char")
        .between(&quote, &quote)
        .rename("quoted char")
}

/// `open`, anything but `close`, then `close`.
pub fn is_quoted_by(open: char, close: char) -> Scanner {
    let opening = pattern::is_char(open).seq(&many_of(chars::not_char(close)));
    is_pattern(&opening, open.to_string())
        .then(&is_char(close))
        .rename("quoted")
}

/// `open`, any number of `quoted`, then `close`.
pub fn is_quoted_by_with(open: &Scanner, close: &Scanner, quoted: &Scanner) -> Scanner {
    sequence(vec![open.clone(), quoted.skip_many(), close.clone()]).rename("quoted")
}

// === Delimiters ===

/// Whitespace, `//` and `/* */` comments.
pub fn java_delimiter() -> Scanner {
    plus(vec![is_whitespaces(), is_java_line_comment(), is_java_block_comment()])
        .skip_many()
        .rename("java delimiter")
}

/// Whitespace, `{- -}` and `--` comments.
pub fn haskell_delimiter() -> Scanner {
    plus(vec![is_whitespaces(), is_haskell_block_comment(), is_haskell_line_comment()])
        .skip_many()
        .rename("haskell delimiter")
}

/// Whitespace, `--` and `/* */` comments.
pub fn sql_delimiter() -> Scanner {
    plus(vec![is_whitespaces(), is_sql_line_comment(), is_java_block_comment()])
        .skip_many()
        .rename("sql delimiter")
}

/// Whitespace, line comments opened by `line_comment` and block comments
/// between `open` and `close`.
pub fn std_delimiter(line_comment: &str, open: &str, close: &str) -> Scanner {
    plus(vec![
        is_whitespaces(),
        is_line_comment(line_comment),
        is_block_comment(open, close),
    ])
    .skip_many()
    .rename("delimiter")
}

/// `scanner`, provided no alphanumeric char follows what it matched.
pub fn delimited(scanner: &Scanner) -> Scanner {
    delimited_with(scanner, "alphanumeric")
}

/// Like [`delimited`]; an alphanumeric char after the match is reported as
/// `label` unexpected.
pub fn delimited_with(scanner: &Scanner, label: impl Into<Arc<str>>) -> Scanner {
    let alnum = is_char_where(&is_alphanumeric());
    scanner.followed_by(&alnum.not_with(label)).rename("delimited")
}

#[cfg(test)]
mod tests;
