//! The pattern type and its combinators.
//!
//! Patterns form a tree of [`Kind`] nodes interpreted by [`Pattern::matches`].
//! Every node is immutable; combinators allocate one new node and share
//! their operands.
//!
//! # Repetition
//!
//! | Combinator | Stops on |
//! |------------|----------|
//! | `many`, `many_min` | mismatch, or a zero-length match |
//! | `some`, `some_range` | mismatch, or the upper bound |
//! | `repeat` | never; exactly `n` matches or a mismatch |
//!
//! The zero-length stop keeps `optional().many()` and friends terminating.

use std::fmt;
use std::sync::Arc;

use crate::chars::{self, CharPredicate};
use crate::BoundsError;

/// A stateless text recognizer.
#[derive(Clone)]
pub struct Pattern(Arc<Kind>);

enum Kind {
    AtLeast(usize),
    Exact(usize),
    Char(char),
    Pred(CharPredicate),
    Escaped,
    Str(Box<str>),
    StrCi(Box<str>),
    NotStr(Box<str>),
    NotStrCi(Box<str>),
    Regex(regex::Regex),
    Not(Pattern),
    Peek(Pattern),
    Optional(Pattern),
    Or(Vec<Pattern>),
    Seq(Vec<Pattern>),
    All(Vec<Pattern>),
    Longest(Vec<Pattern>),
    Shortest(Vec<Pattern>),
    IfElse(Pattern, Pattern, Pattern),
    RepeatPred(usize, CharPredicate),
    Repeat(usize, Pattern),
    ManyPred(usize, CharPredicate),
    Many(usize, Pattern),
    SomePred(usize, usize, CharPredicate),
    Some(usize, usize, Pattern),
    Never,
    Always,
}

impl Pattern {
    fn new(kind: Kind) -> Self {
        Pattern(Arc::new(kind))
    }

    /// Match at `begin`, looking no further than `end`.
    ///
    /// Returns the matched length in bytes, or `None` on mismatch (including
    /// a window that is out of bounds or splits a char).
    pub fn matches(&self, source: &str, begin: usize, end: usize) -> Option<usize> {
        let window = source.get(begin..end)?;
        self.run(window, 0)
    }

    /// Match against the whole of `text`.
    pub fn matches_str(&self, text: &str) -> Option<usize> {
        self.run(text, 0)
    }

    fn run(&self, text: &str, at: usize) -> Option<usize> {
        let rest = text.get(at..)?;
        match &*self.0 {
            Kind::AtLeast(n) => prefix_len(rest, *n),
            Kind::Exact(n) => (rest.chars().count() == *n).then_some(rest.len()),
            Kind::Char(expected) => first_char(rest).filter(|c| c == expected).map(char::len_utf8),
            Kind::Pred(pred) => first_char(rest).filter(|&c| pred.test(c)).map(char::len_utf8),
            Kind::Escaped => {
                let mut it = rest.chars();
                match (it.next(), it.next()) {
                    (Some('\\'), Some(c)) => Some(1 + c.len_utf8()),
                    _ => None,
                }
            }
            Kind::Str(s) => rest.starts_with(&**s).then_some(s.len()),
            Kind::StrCi(s) => match_ci(s, rest),
            Kind::NotStr(s) if rest.starts_with(&**s) => None,
            Kind::NotStr(_) => first_char(rest).map(char::len_utf8),
            Kind::NotStrCi(s) => match match_ci(s, rest) {
                Some(_) => None,
                None => first_char(rest).map(char::len_utf8),
            },
            Kind::Regex(re) => re.find(rest).map(|m| m.end()),
            Kind::Not(p) => match p.run(text, at) {
                Some(_) => None,
                None => Some(0),
            },
            Kind::Peek(p) => p.run(text, at).map(|_| 0),
            Kind::Optional(p) => Some(p.run(text, at).unwrap_or(0)),
            Kind::Or(alts) => alts.iter().find_map(|p| p.run(text, at)),
            Kind::Seq(parts) => {
                let mut len = 0;
                for p in parts {
                    len += p.run(text, at + len)?;
                }
                Some(len)
            }
            Kind::All(alts) => {
                let mut best = 0;
                for p in alts {
                    best = best.max(p.run(text, at)?);
                }
                Some(best)
            }
            Kind::Longest(alts) => alts
                .iter()
                .filter_map(|p| p.run(text, at))
                .fold(None, |best, l| match best {
                    Some(b) if b >= l => Some(b),
                    _ => Some(l),
                }),
            Kind::Shortest(alts) => alts
                .iter()
                .filter_map(|p| p.run(text, at))
                .fold(None, |best, l| match best {
                    Some(b) if b <= l => Some(b),
                    _ => Some(l),
                }),
            Kind::IfElse(cond, yes, no) => match cond.run(text, at) {
                Some(l) => yes.run(text, at + l).map(|l2| l + l2),
                None => no.run(text, at),
            },
            Kind::RepeatPred(n, pred) => repeat_pred(*n, pred, rest),
            Kind::Repeat(n, p) => repeat_pat(*n, p, text, at),
            Kind::ManyPred(min, pred) => {
                let head = repeat_pred(*min, pred, rest)?;
                Some(head + many_pred(usize::MAX, pred, &rest[head..]))
            }
            Kind::Many(min, p) => {
                let head = repeat_pat(*min, p, text, at)?;
                Some(head + many(usize::MAX, p, text, at + head))
            }
            Kind::SomePred(min, max, pred) => {
                let head = repeat_pred(*min, pred, rest)?;
                Some(head + many_pred(max - min, pred, &rest[head..]))
            }
            Kind::Some(min, max, p) => {
                let head = repeat_pat(*min, p, text, at)?;
                Some(head + many(max - min, p, text, at + head))
            }
            Kind::Never => None,
            Kind::Always => Some(0),
        }
    }

    // === Combinators ===

    /// `self` then `next`; lengths add up.
    #[must_use]
    pub fn seq(&self, next: &Pattern) -> Pattern {
        sequence(vec![self.clone(), next.clone()])
    }

    /// `self` or, on mismatch, `other` from the same position.
    #[must_use]
    pub fn or(&self, other: &Pattern) -> Pattern {
        or(self, other)
    }

    /// Never mismatches: a mismatch becomes a zero-length match.
    #[must_use]
    pub fn optional(&self) -> Pattern {
        Pattern::new(Kind::Optional(self.clone()))
    }

    /// Zero or more, greedy.
    #[must_use]
    pub fn many(&self) -> Pattern {
        Pattern::new(Kind::Many(0, self.clone()))
    }

    /// At least `min`, then greedy.
    #[must_use]
    pub fn many_min(&self, min: usize) -> Pattern {
        Pattern::new(Kind::Many(min, self.clone()))
    }

    /// Up to `max`, greedy.
    #[must_use]
    pub fn some(&self, max: usize) -> Pattern {
        if max == 0 {
            return always();
        }
        Pattern::new(Kind::Some(0, max, self.clone()))
    }

    /// Between `min` and `max` matches.
    pub fn some_range(&self, min: usize, max: usize) -> Result<Pattern, BoundsError> {
        BoundsError::check(min, max)?;
        if max == 0 {
            return Ok(always());
        }
        Ok(Pattern::new(Kind::Some(min, max, self.clone())))
    }

    /// Exactly `n` matches.
    #[must_use]
    pub fn repeat(&self, n: usize) -> Pattern {
        match n {
            0 => always(),
            1 => self.clone(),
            _ => Pattern::new(Kind::Repeat(n, self.clone())),
        }
    }

    /// Zero-length match iff `self` mismatches.
    #[must_use]
    pub fn not(&self) -> Pattern {
        Pattern::new(Kind::Not(self.clone()))
    }

    /// Zero-length match iff `self` matches.
    #[must_use]
    pub fn peek(&self) -> Pattern {
        Pattern::new(Kind::Peek(self.clone()))
    }

    /// If `self` matches, continue with `yes` after it (a `yes` mismatch is
    /// final); otherwise run `no` from the original position.
    #[must_use]
    pub fn if_else(&self, yes: &Pattern, no: &Pattern) -> Pattern {
        Pattern::new(Kind::IfElse(self.clone(), yes.clone(), no.clone()))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &*self.0 {
            Kind::AtLeast(_) => "AtLeast",
            Kind::Exact(_) => "Exact",
            Kind::Char(_) => "Char",
            Kind::Pred(_) => "Pred",
            Kind::Escaped => "Escaped",
            Kind::Str(_) => "Str",
            Kind::StrCi(_) => "StrCi",
            Kind::NotStr(_) => "NotStr",
            Kind::NotStrCi(_) => "NotStrCi",
            Kind::Regex(_) => "Regex",
            Kind::Not(_) => "Not",
            Kind::Peek(_) => "Peek",
            Kind::Optional(_) => "Optional",
            Kind::Or(_) => "Or",
            Kind::Seq(_) => "Seq",
            Kind::All(_) => "All",
            Kind::Longest(_) => "Longest",
            Kind::Shortest(_) => "Shortest",
            Kind::IfElse(..) => "IfElse",
            Kind::RepeatPred(..) | Kind::Repeat(..) => "Repeat",
            Kind::ManyPred(..) | Kind::Many(..) => "Many",
            Kind::SomePred(..) | Kind::Some(..) => "Some",
            Kind::Never => "Never",
            Kind::Always => "Always",
        };
        write!(f, "Pattern::{name}")
    }
}

// === Constructors ===

/// At least `n` chars remain; matches exactly `n` of them.
pub fn has_at_least(n: usize) -> Pattern {
    Pattern::new(Kind::AtLeast(n))
}

/// Exactly `n` chars remain; matches all of them.
pub fn has_exact(n: usize) -> Pattern {
    Pattern::new(Kind::Exact(n))
}

/// Zero-length match at the end of the window.
pub fn eof() -> Pattern {
    has_exact(0)
}

pub fn is_char(c: char) -> Pattern {
    Pattern::new(Kind::Char(c))
}

pub fn is_char_where(pred: CharPredicate) -> Pattern {
    Pattern::new(Kind::Pred(pred))
}

pub fn not_char(c: char) -> Pattern {
    is_char_where(chars::not_char(c))
}

pub fn in_range(lo: char, hi: char) -> Pattern {
    is_char_where(chars::in_range(lo, hi))
}

pub fn not_in_range(lo: char, hi: char) -> Pattern {
    is_char_where(chars::not_in_range(lo, hi))
}

pub fn among(cs: &[char]) -> Pattern {
    is_char_where(chars::among(cs))
}

pub fn not_among(cs: &[char]) -> Pattern {
    is_char_where(chars::not_among(cs))
}

/// A backslash and the char after it.
pub fn is_escaped() -> Pattern {
    Pattern::new(Kind::Escaped)
}

/// `open` followed by everything up to (not including) the line break.
pub fn is_line_comment(open: &str) -> Pattern {
    is_string(open).seq(&many_of(chars::not_char('\n')))
}

pub fn is_string(s: &str) -> Pattern {
    Pattern::new(Kind::Str(s.into()))
}

/// Case-insensitive string, compared char by char in lowercase.
pub fn is_string_ci(s: &str) -> Pattern {
    Pattern::new(Kind::StrCi(s.into()))
}

/// One char, provided the window does not start with `s`.
pub fn not_string(s: &str) -> Pattern {
    Pattern::new(Kind::NotStr(s.into()))
}

pub fn not_string_ci(s: &str) -> Pattern {
    Pattern::new(Kind::NotStrCi(s.into()))
}

/// Anchored regular expression.
pub fn regex(re: &str) -> Result<Pattern, regex::Error> {
    let anchored = regex::Regex::new(&format!("^(?:{re})"))?;
    Ok(Pattern::new(Kind::Regex(anchored)))
}

pub fn or(p1: &Pattern, p2: &Pattern) -> Pattern {
    any(vec![p1.clone(), p2.clone()])
}

/// First alternative that matches.
pub fn any(alts: Vec<Pattern>) -> Pattern {
    match alts.len() {
        0 => never(),
        1 => alts.into_iter().next().unwrap_or_else(never),
        _ => Pattern::new(Kind::Or(alts)),
    }
}

pub fn sequence(parts: Vec<Pattern>) -> Pattern {
    match parts.len() {
        0 => always(),
        1 => parts.into_iter().next().unwrap_or_else(always),
        _ => Pattern::new(Kind::Seq(parts)),
    }
}

/// Every alternative must match; the longest length wins.
pub fn all(alts: Vec<Pattern>) -> Pattern {
    Pattern::new(Kind::All(alts))
}

/// Longest match among the alternatives; ties go to the first listed.
pub fn longest(alts: Vec<Pattern>) -> Pattern {
    Pattern::new(Kind::Longest(alts))
}

/// Shortest match among the alternatives; ties go to the first listed.
pub fn shortest(alts: Vec<Pattern>) -> Pattern {
    Pattern::new(Kind::Shortest(alts))
}

pub fn never() -> Pattern {
    Pattern::new(Kind::Never)
}

pub fn always() -> Pattern {
    Pattern::new(Kind::Always)
}

/// Exactly `n` chars satisfying `pred`.
pub fn repeat(n: usize, pred: CharPredicate) -> Pattern {
    match n {
        0 => always(),
        1 => is_char_where(pred),
        _ => Pattern::new(Kind::RepeatPred(n, pred)),
    }
}

/// Zero or more chars satisfying `pred`.
pub fn many_of(pred: CharPredicate) -> Pattern {
    Pattern::new(Kind::ManyPred(0, pred))
}

pub fn many_min(min: usize, pred: CharPredicate) -> Pattern {
    Pattern::new(Kind::ManyPred(min, pred))
}

/// Up to `max` chars satisfying `pred`.
pub fn some_of(max: usize, pred: CharPredicate) -> Pattern {
    if max == 0 {
        return always();
    }
    Pattern::new(Kind::SomePred(0, max, pred))
}

pub fn some_range(min: usize, max: usize, pred: CharPredicate) -> Result<Pattern, BoundsError> {
    BoundsError::check(min, max)?;
    if max == 0 {
        return Ok(always());
    }
    Ok(Pattern::new(Kind::SomePred(min, max, pred)))
}

// === Helpers ===

#[inline]
fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

/// Byte length of the first `n` chars, if there are that many.
fn prefix_len(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (i, c) in s.char_indices() {
        seen += 1;
        if seen == n {
            return Some(i + c.len_utf8());
        }
    }
    None
}

fn match_ci(expected: &str, rest: &str) -> Option<usize> {
    let mut len = 0;
    let mut text = rest.chars();
    for e in expected.chars() {
        let c = text.next()?;
        if !c.to_lowercase().eq(e.to_lowercase()) {
            return None;
        }
        len += c.len_utf8();
    }
    Some(len)
}

fn repeat_pred(n: usize, pred: &CharPredicate, rest: &str) -> Option<usize> {
    let mut len = 0;
    let mut it = rest.chars();
    for _ in 0..n {
        let c = it.next().filter(|&c| pred.test(c))?;
        len += c.len_utf8();
    }
    Some(len)
}

fn many_pred(max: usize, pred: &CharPredicate, rest: &str) -> usize {
    rest.chars()
        .take(max)
        .take_while(|&c| pred.test(c))
        .map(char::len_utf8)
        .sum()
}

fn repeat_pat(n: usize, p: &Pattern, text: &str, at: usize) -> Option<usize> {
    let mut len = 0;
    for _ in 0..n {
        len += p.run(text, at + len)?;
    }
    Some(len)
}

fn many(max: usize, p: &Pattern, text: &str, at: usize) -> usize {
    let mut len = 0;
    for _ in 0..max {
        match p.run(text, at + len) {
            Some(0) | None => break,
            Some(l) => len += l,
        }
    }
    len
}
