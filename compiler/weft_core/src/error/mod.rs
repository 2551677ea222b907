//! The parse error model.
//!
//! A failed application leaves a [`ParseError`] in the context's error slot.
//! Errors from competing alternatives are merged rather than discarded, so
//! the error that survives a whole parse describes the furthest point any
//! alternative reached.
//!
//! # Merging
//!
//! | Situation | Result |
//! |-----------|--------|
//! | one side missing | the other side |
//! | different indices | the one further along |
//! | same index, different precedence | the higher precedence |
//! | both only "X encountered" | the first |
//! | otherwise | both, rendered together |
//!
//! An error carrying any expecting, unexpected or free-form message has
//! precedence 2; a bare "X encountered" has precedence 1.
//!
//! Merges and relabels are recorded as tree nodes and only flattened by
//! [`ParseError::render`], which happens once per reported failure. Failing
//! branches that are later abandoned never pay for the flattening.

use std::fmt::Write as _;
use std::rc::Rc;
use std::sync::Arc;

use smallvec::SmallVec;
use weft_pos::Pos;

type Labels = SmallVec<[Arc<str>; 2]>;

/// An accumulated parse error.
///
/// Cheap to clone (one `Rc`). Not `Send`: errors live inside a single parse
/// and leave it only as a rendered [`ErrorDetail`].
#[derive(Clone)]
pub struct ParseError(Rc<Node>);

enum Node {
    Leaf(Leaf),
    Merged {
        index: usize,
        precedence: u8,
        first: ParseError,
        second: ParseError,
    },
    Expecting {
        index: usize,
        precedence: u8,
        label: Arc<str>,
        inner: ParseError,
    },
}

#[derive(Clone, Default)]
struct Leaf {
    index: usize,
    encountered: Option<Arc<str>>,
    unexpected: Labels,
    expecting: Labels,
    messages: Labels,
}

impl Leaf {
    fn precedence(&self) -> u8 {
        if self.expecting.is_empty() && self.unexpected.is_empty() && self.messages.is_empty() {
            1
        } else {
            2
        }
    }
}

impl ParseError {
    fn leaf(leaf: Leaf) -> Self {
        ParseError(Rc::new(Node::Leaf(leaf)))
    }

    /// "expecting `label`" at `index`.
    pub fn expecting(index: usize, label: Arc<str>) -> Self {
        let mut leaf = Leaf { index, ..Leaf::default() };
        leaf.expecting.push(label);
        Self::leaf(leaf)
    }

    /// "`label` unexpected" at `index`.
    pub fn unexpected(index: usize, label: Arc<str>) -> Self {
        let mut leaf = Leaf { index, ..Leaf::default() };
        leaf.unexpected.push(label);
        Self::leaf(leaf)
    }

    /// A free-form message at `index`.
    pub fn message(index: usize, message: Arc<str>) -> Self {
        let mut leaf = Leaf { index, ..Leaf::default() };
        leaf.messages.push(message);
        Self::leaf(leaf)
    }

    /// "`what` encountered" at `index`: what the input actually holds there.
    pub fn encountered(index: usize, what: Arc<str>) -> Self {
        Self::leaf(Leaf {
            index,
            encountered: Some(what),
            ..Leaf::default()
        })
    }

    pub fn index(&self) -> usize {
        match &*self.0 {
            Node::Leaf(leaf) => leaf.index,
            Node::Merged { index, .. } | Node::Expecting { index, .. } => *index,
        }
    }

    fn precedence(&self) -> u8 {
        match &*self.0 {
            Node::Leaf(leaf) => leaf.precedence(),
            Node::Merged { precedence, .. } | Node::Expecting { precedence, .. } => *precedence,
        }
    }

    /// Only an "X encountered" and nothing else.
    fn is_bare(&self) -> bool {
        matches!(&*self.0, Node::Leaf(leaf) if leaf.precedence() == 1)
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &ParseError) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Merge two errors under the rules in the module docs.
    #[must_use]
    pub fn merge(first: &ParseError, second: &ParseError) -> ParseError {
        if Rc::ptr_eq(&first.0, &second.0) {
            return first.clone();
        }
        let (i1, i2) = (first.index(), second.index());
        if i1 != i2 {
            return if i1 > i2 { first.clone() } else { second.clone() };
        }
        let (p1, p2) = (first.precedence(), second.precedence());
        if p1 != p2 {
            return if p1 > p2 { first.clone() } else { second.clone() };
        }
        if first.is_bare() && second.is_bare() {
            return first.clone();
        }
        ParseError(Rc::new(Node::Merged {
            index: i1,
            precedence: p1,
            first: first.clone(),
            second: second.clone(),
        }))
    }

    /// [`merge`](Self::merge) lifted over optional errors.
    pub fn merge_opt(first: Option<ParseError>, second: Option<ParseError>) -> Option<ParseError> {
        match (first, second) {
            (Some(a), Some(b)) => Some(ParseError::merge(&a, &b)),
            (a, b) => a.or(b),
        }
    }

    /// Replace whatever this error expects with `label`.
    #[must_use]
    pub fn set_expecting(&self, label: Arc<str>) -> ParseError {
        match &*self.0 {
            Node::Leaf(leaf) => {
                let mut leaf = leaf.clone();
                leaf.expecting.clear();
                leaf.expecting.push(label);
                Self::leaf(leaf)
            }
            Node::Merged { .. } | Node::Expecting { .. } => ParseError(Rc::new(Node::Expecting {
                index: self.index(),
                precedence: self.precedence().max(2),
                label,
                inner: self.clone(),
            })),
        }
    }

    /// Flatten into a plain description.
    pub fn render(&self) -> ErrorDetail {
        let mut detail = ErrorDetail {
            index: self.index(),
            ..ErrorDetail::default()
        };
        self.render_into(&mut detail);
        detail
    }

    fn render_into(&self, out: &mut ErrorDetail) {
        match &*self.0 {
            Node::Leaf(leaf) => {
                if out.encountered.is_none() {
                    out.encountered = leaf.encountered.as_deref().map(str::to_owned);
                }
                out.unexpected.extend(leaf.unexpected.iter().map(|s| s.to_string()));
                out.expecting.extend(leaf.expecting.iter().map(|s| s.to_string()));
                out.messages.extend(leaf.messages.iter().map(|s| s.to_string()));
            }
            Node::Merged { first, second, .. } => {
                first.render_into(out);
                second.render_into(out);
            }
            Node::Expecting { label, inner, .. } => {
                let mut sub = ErrorDetail::default();
                inner.render_into(&mut sub);
                if out.encountered.is_none() {
                    out.encountered = sub.encountered;
                }
                out.unexpected.extend(sub.unexpected);
                out.expecting.push(label.to_string());
                out.messages.extend(sub.messages);
            }
        }
    }
}

impl std::fmt::Debug for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseError")
            .field("index", &self.index())
            .field("precedence", &self.precedence())
            .finish_non_exhaustive()
    }
}

/// A rendered parse error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    pub index: usize,
    pub encountered: Option<String>,
    pub unexpected: Vec<String>,
    pub expecting: Vec<String>,
    pub messages: Vec<String>,
}

impl ErrorDetail {
    /// The diagnostic text for this error at `pos`.
    ///
    /// ```text
    /// line 3, column 7:
    /// expecting digit or letter.
    /// ; unexpected.
    /// a free-form message
    /// EOF encountered.
    /// ```
    pub fn show(&self, pos: Pos) -> String {
        let mut out = format!("{pos}:\n");
        let mut expecting = self.expecting.clone();
        expecting.sort();
        expecting.dedup();
        if !expecting.is_empty() {
            let _ = writeln!(out, "expecting {}.", format_alternatives(&expecting));
        }
        let unexpected = dedup_in_order(&self.unexpected);
        if !unexpected.is_empty() {
            let _ = writeln!(out, "{} unexpected.", unexpected.join(" "));
        }
        if !self.messages.is_empty() {
            let _ = writeln!(out, "{}", self.messages.join(" or \n"));
        }
        if let Some(encountered) = &self.encountered {
            let _ = writeln!(out, "{encountered} encountered.");
        }
        out
    }
}

/// `a`, `a or b`, `a b or c`.
fn format_alternatives(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [single] => single.clone(),
        [rest @ .., last] => format!("{} or {last}", rest.join(" ")),
    }
}

fn dedup_in_order(items: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item.as_str()) {
            seen.push(item);
        }
    }
    seen
}

#[cfg(test)]
mod tests;
