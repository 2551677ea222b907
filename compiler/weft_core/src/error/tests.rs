use super::*;
use pretty_assertions::assert_eq;

fn label(s: &str) -> Arc<str> {
    Arc::from(s)
}

#[test]
fn test_further_index_wins() {
    let near = ParseError::expecting(1, label("a"));
    let far = ParseError::encountered(4, label("x"));
    assert_eq!(ParseError::merge(&near, &far).index(), 4);
    assert_eq!(ParseError::merge(&far, &near).index(), 4);
}

#[test]
fn test_precedence_breaks_ties() {
    let bare = ParseError::encountered(2, label("x"));
    let expecting = ParseError::expecting(2, label("digit"));
    let merged = ParseError::merge(&bare, &expecting).render();
    assert_eq!(merged.expecting, vec!["digit".to_string()]);
    assert_eq!(merged.encountered, None);
}

#[test]
fn test_bare_errors_keep_first() {
    let a = ParseError::encountered(0, label("a"));
    let b = ParseError::encountered(0, label("b"));
    assert_eq!(ParseError::merge(&a, &b).render().encountered.as_deref(), Some("a"));
}

#[test]
fn test_same_index_labels_accumulate() {
    let a = ParseError::expecting(3, label("digit"));
    let b = ParseError::expecting(3, label("letter"));
    let c = ParseError::unexpected(3, label("comma"));
    let merged = ParseError::merge(&ParseError::merge(&a, &b), &c).render();
    assert_eq!(merged.expecting, vec!["digit".to_string(), "letter".to_string()]);
    assert_eq!(merged.unexpected, vec!["comma".to_string()]);
}

#[test]
fn test_merge_opt() {
    let a = ParseError::expecting(0, label("a"));
    assert!(ParseError::merge_opt(None, None).is_none());
    assert_eq!(ParseError::merge_opt(None, Some(a.clone())).map(|e| e.index()), Some(0));
    assert_eq!(ParseError::merge_opt(Some(a), None).map(|e| e.index()), Some(0));
}

#[test]
fn test_set_expecting_on_leaf_keeps_encountered() {
    let err = ParseError::encountered(0, label("<EOF>")).set_expecting(label("digit"));
    let detail = err.render();
    assert_eq!(detail.expecting, vec!["digit".to_string()]);
    assert_eq!(detail.encountered.as_deref(), Some("<EOF>"));
}

#[test]
fn test_set_expecting_on_merged_replaces_all() {
    let merged = ParseError::merge(
        &ParseError::expecting(1, label("a")),
        &ParseError::message(1, label("boom")),
    );
    let detail = merged.set_expecting(label("thing")).render();
    assert_eq!(detail.expecting, vec!["thing".to_string()]);
    assert_eq!(detail.messages, vec!["boom".to_string()]);
}

#[test]
fn test_show_full_layout() {
    let detail = ErrorDetail {
        index: 0,
        encountered: Some("x".into()),
        unexpected: vec!["foo".into(), "bar".into(), "foo".into()],
        expecting: vec!["c".into(), "a".into(), "b".into(), "a".into()],
        messages: vec!["m1".into(), "m2".into()],
    };
    assert_eq!(
        detail.show(Pos::new(2, 5)),
        "line 2, column 5:\n\
         expecting a b or c.\n\
         foo bar unexpected.\n\
         m1 or \nm2\n\
         x encountered.\n"
    );
}

#[test]
fn test_show_two_alternatives() {
    let detail = ErrorDetail {
        expecting: vec!["b".into(), "a".into()],
        ..ErrorDetail::default()
    };
    assert_eq!(detail.show(Pos::new(1, 1)), "line 1, column 1:\nexpecting a or b.\n");
}
