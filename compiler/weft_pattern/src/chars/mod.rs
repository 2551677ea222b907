//! Char predicates.
//!
//! A [`CharPredicate`] is a shareable `char -> bool` test with a short label.
//! The label is what scanners report as "expecting" when no explicit name is
//! given, so the constructors here pick labels that read well in a
//! diagnostic (`digit`, `[a-z]`, `^[',\]`).

use std::fmt;
use std::sync::Arc;

/// A labelled char test.
#[derive(Clone)]
pub struct CharPredicate {
    test: Arc<dyn Fn(char) -> bool + Send + Sync>,
    label: Arc<str>,
}

impl CharPredicate {
    pub fn new(label: impl Into<Arc<str>>, test: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        CharPredicate {
            test: Arc::new(test),
            label: label.into(),
        }
    }

    #[inline]
    pub fn test(&self, c: char) -> bool {
        (self.test)(c)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same test, different label.
    #[must_use]
    pub fn relabel(&self, label: impl Into<Arc<str>>) -> Self {
        CharPredicate {
            test: Arc::clone(&self.test),
            label: label.into(),
        }
    }

    #[must_use]
    pub fn not(&self) -> Self {
        let inner = self.clone();
        CharPredicate::new(format!("^{}", self.label), move |c| !inner.test(c))
    }

    #[must_use]
    pub fn and(&self, other: &CharPredicate) -> Self {
        let (a, b) = (self.clone(), other.clone());
        CharPredicate::new(format!("{} and {}", self.label, other.label), move |c| {
            a.test(c) && b.test(c)
        })
    }

    #[must_use]
    pub fn or(&self, other: &CharPredicate) -> Self {
        let (a, b) = (self.clone(), other.clone());
        CharPredicate::new(format!("{} or {}", self.label, other.label), move |c| {
            a.test(c) || b.test(c)
        })
    }
}

impl fmt::Debug for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CharPredicate").field(&self.label).finish()
    }
}

impl fmt::Display for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub fn is_char(expected: char) -> CharPredicate {
    CharPredicate::new(expected.to_string(), move |c| c == expected)
}

pub fn not_char(excluded: char) -> CharPredicate {
    CharPredicate::new(format!("^{excluded}"), move |c| c != excluded)
}

pub fn in_range(lo: char, hi: char) -> CharPredicate {
    CharPredicate::new(format!("[{lo}-{hi}]"), move |c| (lo..=hi).contains(&c))
}

pub fn not_in_range(lo: char, hi: char) -> CharPredicate {
    CharPredicate::new(format!("^[{lo}-{hi}]"), move |c| !(lo..=hi).contains(&c))
}

pub fn is_digit() -> CharPredicate {
    in_range('0', '9').relabel("digit")
}

pub fn among(chars: &[char]) -> CharPredicate {
    let set: Arc<[char]> = chars.into();
    CharPredicate::new(format!("[{}]", join_chars(chars)), move |c| set.contains(&c))
}

pub fn not_among(chars: &[char]) -> CharPredicate {
    let set: Arc<[char]> = chars.into();
    CharPredicate::new(format!("^[{}]", join_chars(chars)), move |c| !set.contains(&c))
}

pub fn is_hex_digit() -> CharPredicate {
    CharPredicate::new("hex digit", |c| c.is_ascii_hexdigit())
}

pub fn is_uppercase() -> CharPredicate {
    CharPredicate::new("uppercase", char::is_uppercase)
}

pub fn is_lowercase() -> CharPredicate {
    CharPredicate::new("lowercase", char::is_lowercase)
}

pub fn is_whitespace() -> CharPredicate {
    CharPredicate::new("whitespace", char::is_whitespace)
}

/// ASCII letters.
pub fn is_alpha() -> CharPredicate {
    CharPredicate::new("alpha", |c| c.is_ascii_alphabetic())
}

/// ASCII letters and `_`.
pub fn is_alpha_() -> CharPredicate {
    CharPredicate::new("alpha_", |c| c == '_' || c.is_ascii_alphabetic())
}

/// Any Unicode letter.
pub fn is_letter() -> CharPredicate {
    CharPredicate::new("letter", char::is_alphabetic)
}

/// ASCII letters, digits and `_`.
pub fn is_alphanumeric() -> CharPredicate {
    CharPredicate::new("alphanumeric", |c| c == '_' || c.is_ascii_alphanumeric())
}

/// Conjunction of all predicates; empty is [`always`], a single one is itself.
pub fn all_of(preds: Vec<CharPredicate>) -> CharPredicate {
    match preds.len() {
        0 => always(),
        1 => preds.into_iter().next().unwrap_or_else(always),
        _ => {
            let label = preds.iter().map(CharPredicate::label).collect::<Vec<_>>().join(" and ");
            CharPredicate::new(label, move |c| preds.iter().all(|p| p.test(c)))
        }
    }
}

/// Disjunction of all predicates; empty is [`never`], a single one is itself.
pub fn any_of(preds: Vec<CharPredicate>) -> CharPredicate {
    match preds.len() {
        0 => never(),
        1 => preds.into_iter().next().unwrap_or_else(never),
        _ => {
            let label = preds.iter().map(CharPredicate::label).collect::<Vec<_>>().join(" or ");
            CharPredicate::new(label, move |c| preds.iter().any(|p| p.test(c)))
        }
    }
}

pub fn never() -> CharPredicate {
    CharPredicate::new("nothing", |_| false)
}

pub fn always() -> CharPredicate {
    CharPredicate::new("any character", |_| true)
}

fn join_chars(chars: &[char]) -> String {
    chars.iter().map(char::to_string).collect::<Vec<_>>().join(",")
}
