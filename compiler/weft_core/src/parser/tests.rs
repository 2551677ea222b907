#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::prim::*;
use super::*;
use crate::exception::ExceptionKind;
use crate::failure::{SignalKey, UserError};
use crate::test_helpers::{ch, digit, lower, number, parse_err, parse_ok, with_chars, word};

fn expecting(e: &crate::exception::ParserException) -> Vec<String> {
    e.detail().map(|d| d.expecting.clone()).unwrap_or_default()
}

fn shown(e: &crate::exception::ParserException) -> String {
    e.detail().map(|d| d.show(e.pos())).unwrap_or_default()
}

// === Alternation and lookahead ===

#[test]
fn test_alternation_is_not_retried_after_consumption() {
    let tried = Arc::new(AtomicBool::new(false));
    let ab = ch('a').then(&ch('b'));
    let ac = {
        let ac = ch('a').then(&ch('c'));
        let tried = Arc::clone(&tried);
        Parser::from_fn(move |ctx| {
            tried.store(true, Ordering::SeqCst);
            ac.parse(ctx)
        })
    };
    let e = parse_err(&(ab | ac), "ac");
    assert!(!tried.load(Ordering::SeqCst));
    assert_eq!(e.detail().map(|d| d.index), Some(1));
    assert_eq!(expecting(&e), vec!["'b'".to_owned()]);
}

#[test]
fn test_lookahead_widens_the_backtracking_window() {
    let ab = ch('a').then(&ch('b'));
    let ac = ch('a').then(&ch('c'));
    assert_eq!(parse_ok(&(ab.clone() | ac.clone()).lookahead(2), "ac"), 'c');
    let abc = ch('a').then(&ch('b')).then(&ch('c'));
    assert!(crate::test_helpers::parse(&(abc | ac).lookahead(2), "abx").is_err());
}

#[test]
fn test_atomize_restores_on_failure() {
    let ab = ch('a').then(&ch('b')).atomize();
    with_chars("ac", |ctx| {
        let start = ctx.snapshot();
        assert!(ab.parse(ctx).is_err());
        assert_eq!(ctx.snapshot(), start);
    });
    assert_eq!(parse_ok(&(ab | ch('a').then(&ch('c'))), "ac"), 'c');
}

#[test]
fn test_atomize_and_step_set_the_cost() {
    let ab = ch('a').then(&ch('b'));
    with_chars("ab", |ctx| {
        ab.parse(ctx).unwrap();
        assert_eq!(ctx.step(), 2);
    });
    with_chars("ab", |ctx| {
        ab.atomize().parse(ctx).unwrap();
        assert_eq!(ctx.step(), 1);
    });
    with_chars("ab", |ctx| {
        ab.step(5).parse(ctx).unwrap();
        assert_eq!((ctx.at(), ctx.step()), (2, 5));
    });
}

#[test]
fn test_peek_restores_either_way() {
    for (source, ok) in [("ab", true), ("ax", false)] {
        with_chars(source, |ctx| {
            let start = ctx.snapshot();
            let reply = ch('a').then(&ch('b')).peek().parse(ctx);
            assert_eq!(reply.is_ok(), ok);
            assert_eq!(ctx.snapshot(), start);
        });
    }
}

#[test]
fn test_longest_and_shortest() {
    with_chars("abc", |ctx| {
        let p = longest(vec![word("a"), word("ab"), ch('x').map(|_| "x")]);
        assert_eq!(p.parse(ctx).unwrap(), "ab");
        assert_eq!(ctx.at(), 2);
    });
    with_chars("abc", |ctx| {
        let p = shortest(vec![word("ab"), word("a")]);
        assert_eq!(p.parse(ctx).unwrap(), "a");
        assert_eq!(ctx.at(), 1);
    });
    let e = parse_err(&longest(vec![word("x"), word("y")]), "z");
    assert_eq!(expecting(&e), vec!["x".to_owned(), "y".to_owned()]);
}

// === Errors ===

#[test]
fn test_empty_input_diagnostic() {
    let e = parse_err(&digit(), "");
    assert_eq!(e.kind(), ExceptionKind::Syntax);
    let text = shown(&e);
    assert!(text.starts_with("line 1, column 1:\nexpecting digit.\n"), "{text}");
    assert!(text.ends_with("<EOF> encountered.\n"), "{text}");
    assert_eq!(e.to_string(), format!("test - {text}"));
}

#[test]
fn test_alternatives_merge_their_expectations() {
    let e = parse_err(&(ch('a') | ch('b')), "c");
    assert_eq!(shown(&e), "line 1, column 1:\nexpecting 'a' or 'b'.\nc encountered.\n");
}

#[test]
fn test_furthest_error_wins() {
    let p = ch('a').then(&ch('b')).atomize() | ch('x');
    let e = parse_err(&p, "ac");
    assert_eq!(e.column(), 2);
    assert_eq!(expecting(&e), vec!["'b'".to_owned()]);
}

#[test]
fn test_label_replaces_expecting_without_consumption() {
    let e = parse_err(&(ch('a') | ch('b')).label("letter"), "c");
    assert_eq!(shown(&e), "line 1, column 1:\nexpecting letter.\nc encountered.\n");
    let e = parse_err(&ch('a').then(&ch('b')).label("pair"), "ac");
    assert_eq!(expecting(&e), vec!["'b'".to_owned()]);
}

#[test]
fn test_failure_constructors() {
    assert_eq!(expecting(&parse_err(&expect::<u8>("thing"), "")), vec!["thing".to_owned()]);
    let e = parse_err(&unexpected::<u8>("keyword"), "x");
    assert_eq!(shown(&e), "line 1, column 1:\nkeyword unexpected.\n");
    let e = parse_err(&(fail::<u8>("bad") | fail("worse")), "x");
    assert_eq!(shown(&e), "line 1, column 1:\nbad or \nworse\n");
    let e = parse_err(&(zero() | ch('a')), "b");
    assert_eq!(expecting(&e), vec!["'a'".to_owned()]);
    let e = parse_err(&eof("EOF"), "x");
    assert_eq!(shown(&e), "line 1, column 1:\nexpecting EOF.\nx encountered.\n");
}

// === Control ===

#[test]
fn test_not() {
    assert_eq!(parse_ok(&ch('a').not().then(&lower()), "b"), 'b');
    let e = parse_err(&ch('a').not(), "a");
    assert_eq!(shown(&e), "line 1, column 1:\nsomething unexpected.\n");
    let e = parse_err(&ch('a').rename("an a").not(), "a");
    assert_eq!(e.detail().map(|d| d.unexpected.clone()), Some(vec!["an a".to_owned()]));
}

#[test]
fn test_optional_and_option() {
    with_chars("b", |ctx| {
        assert_eq!(ch('a').optional().parse(ctx).unwrap(), None);
        assert_eq!(ctx.at(), 0);
    });
    assert_eq!(parse_ok(&ch('a').optional(), "a"), Some('a'));
    assert_eq!(parse_ok(&number().option(-1), ""), -1);
}

#[test]
fn test_if_else() {
    let signed = ch('-').if_else(|_| number().map(|n| -n), &number());
    assert_eq!(parse_ok(&signed, "-5"), -5);
    assert_eq!(parse_ok(&signed, "7"), 7);
}

#[test]
fn test_consumption_assertions() {
    let e = parse_err(&lower().many().is_consumed("empty list"), "1");
    assert_eq!(e.detail().map(|d| d.messages.clone()), Some(vec!["empty list".to_owned()]));
    assert_eq!(parse_ok(&lower().optional().not_consumed("letter"), "1"), None);
    with_chars("a", |ctx| {
        assert!(lower().optional().not_consumed("letter").parse(ctx).is_err());
        assert_eq!(ctx.at(), 0);
    });
}

#[test]
fn test_is_return() {
    let small = number().is_return(|n| *n < 100, Some("small number"));
    assert_eq!(parse_ok(&small, "42"), 42);
    let e = parse_err(&small, "250");
    assert_eq!(e.column(), 1);
    assert_eq!(expecting(&e), vec!["small number".to_owned()]);
    assert_eq!(parse_ok(&(small | ret(0)), "250"), 0);
}

#[test]
fn test_sequence_and_map_n() {
    assert_eq!(parse_ok(&sequence(vec![ch('a'), ch('b')]), "ab"), 'b');
    assert_eq!(parse_ok(&sequence::<char>(vec![]), ""), '\0');
    with_chars("ab", |ctx| {
        assert_eq!(sequence::<u8>(vec![]).parse(ctx).unwrap(), 0);
        assert_eq!(ctx.at(), 0);
    });
    let joined = map_n(vec![digit(), lower(), digit()], |cs| cs.into_iter().collect::<String>());
    assert_eq!(parse_ok(&joined, "1a2"), "1a2");
    assert_eq!(parse_ok(&ch('a').then(&get_index()), "ab"), 1);
    assert_eq!(parse_ok(&digit().and(&lower(), |d, l| format!("{l}{d}")), "1a"), "a1");
}

#[test]
fn test_slot_and_lazy_recursion() {
    let slot = ParserSlot::new();
    let nested = ch('(').then(&slot.parser()).followed_by(&ch(')')).map(|d: usize| d + 1) | ret(0usize);
    assert!(slot.set(nested));
    assert!(!slot.set(ret(0)));
    assert_eq!(parse_ok(&slot.parser(), "((()))"), 3);

    let depth = 5_000;
    let deep = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_ok(&slot.parser(), &deep), depth);

    assert_eq!(parse_ok(&lazy(|| ch('a')), "a"), 'a');
}

#[test]
fn test_unset_slot_is_a_fault() {
    let e = parse_err(&ParserSlot::<u8>::new().parser(), "");
    assert_eq!(e.kind(), ExceptionKind::Internal);
}

// === Hard failures ===

#[test]
fn test_user_error_escapes_alternation() {
    let boom = ch('a').try_map(|_| Err::<char, _>(UserError::new("boom")));
    let e = parse_err(&(boom.many() | ret(Vec::new())), "a");
    assert_eq!(e.kind(), ExceptionKind::User);
    assert_eq!(e.to_string(), "boom\ntest - line 1, column 1:\n");
}

#[test]
fn test_try_map_reports_at_start() {
    let byte = number().try_map(|n| u8::try_from(n).map_err(|_| UserError::new("too big")));
    assert_eq!(parse_ok(&ch(' ').then(&byte), " 255"), 255);
    let e = parse_err(&ch(' ').then(&byte), " 256");
    assert_eq!((e.kind(), e.column()), (ExceptionKind::User, 2));
}

#[test]
fn test_abort() {
    let e = parse_err(&ch('a').then(&abort::<char>("stop here")), "ab");
    assert_eq!(e.kind(), ExceptionKind::User);
    assert_eq!(e.column(), 2);
}

#[test]
fn test_faults_collect_named_frames() {
    let broken: Parser<char> = Parser::from_fn(|ctx| Err(ctx.fault("broken")));
    let p = ch('x').then(&broken.rename("inner")).rename("outer");
    let e = parse_err(&p, "xy");
    assert_eq!(e.kind(), ExceptionKind::Internal);
    let names: Vec<&str> = e.frames().iter().map(|f| f.parser.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer"]);
    assert_eq!(e.frames()[0].to_string(), "test - line 1, column 2: inner");
    let mut trace = String::new();
    e.write_trace(&mut trace).unwrap();
    assert_eq!(trace.lines().count(), 2);
    assert!(e.to_string().starts_with("broken\ntest - line 1, column 2:"));
}

// === Escapes ===

#[test]
fn test_try_catch_receives_partial_result() {
    let stop = SignalKey::new("stop");
    let letters = (lower() | raise(stop.clone())).many();
    let caught = {
        let stop = stop.clone();
        letters.try_catch(move |partial, signal| match partial.take() {
            Some(v) if signal.is(&stop) => Recovery::Value(v),
            _ => Recovery::Propagate,
        })
    };
    with_chars("ab1", |ctx| {
        assert_eq!(caught.parse(ctx).unwrap(), vec!['a', 'b']);
        assert_eq!(ctx.at(), 2);
    });

    let resumed = letters.try_catch(|_, _| Recovery::Parser(digit().map(|d| vec![d])));
    assert_eq!(parse_ok(&resumed, "ab1"), vec!['1']);
}

#[test]
fn test_propagated_signal_keeps_partial_result() {
    let stop = SignalKey::new("stop");
    let letters = (lower() | raise(stop)).many();
    let outer = letters
        .try_catch(|_, _| Recovery::Propagate)
        .try_catch(|partial, _| Recovery::Value(partial.take().unwrap_or_else(|| vec!['X'])));
    assert_eq!(parse_ok(&outer, "ab1"), vec!['a', 'b']);

    let peeked = letters
        .try_catch(|partial, _| {
            assert_eq!(partial.as_deref(), Some(&['a'][..]));
            Recovery::Propagate
        })
        .try_catch(|partial, _| Recovery::Value(partial.take().unwrap_or_default()));
    assert_eq!(parse_ok(&peeked, "a1"), vec!['a']);

    // A handler for another result type leaves the partial in place.
    let counted = letters
        .map(|v| v.len())
        .try_catch(|partial, _| {
            assert_eq!(*partial, None);
            Recovery::Propagate
        })
        .map(|n| vec!['?'; n])
        .try_catch(|partial, _| Recovery::Value(partial.take().unwrap_or_default()));
    assert_eq!(parse_ok(&counted, "ab1"), vec!['a', 'b']);
}

#[test]
fn test_uncaught_signal() {
    let other = SignalKey::unique();
    let p = raise::<u8>(SignalKey::new("stop")).try_catch(move |_, s| {
        if s.is(&other) {
            Recovery::Value(0)
        } else {
            Recovery::Propagate
        }
    });
    let e = parse_err(&p, "");
    assert_eq!(e.kind(), ExceptionKind::Syntax);
    assert!(e.to_string().starts_with("User exception: stop\n"));
}

#[test]
fn test_signal_payload() {
    let key = SignalKey::new(42_u32);
    let p = raise::<u32>(key).try_catch(|_, s| match s.downcast_ref::<u32>() {
        Some(n) => Recovery::Value(*n),
        None => Recovery::Propagate,
    });
    assert_eq!(parse_ok(&p, ""), 42);
}

// === Repetition ===

#[test]
fn test_many_stops_on_empty_match() {
    assert_eq!(parse_ok(&ret(1).many(), "abc"), Vec::<i32>::new());
    assert_eq!(parse_ok(&lower().optional().many(), "ab1"), vec![Some('a'), Some('b')]);
}

#[test]
fn test_many_fails_after_partial_iteration() {
    let pair = ch('a').then(&ch('b'));
    assert_eq!(parse_ok(&pair.many(), "abab"), vec!['b', 'b']);
    let e = parse_err(&pair.many(), "abac");
    assert_eq!(e.column(), 4);
}

#[test]
fn test_many_min_and_accumulators() {
    assert!(crate::test_helpers::parse(&digit().many_min(2), "1a").is_err());
    assert_eq!(parse_ok(&digit().count_many(0), "123x"), 3);
    assert_eq!(parse_ok(&digit().skip_many().then(&lower()), "12a"), 'a');
    let sum = digit().many_with(1, || {
        crate::accumulator::FoldLeft::new(0, |acc, d: char| acc + d.to_digit(10).unwrap_or(0))
    });
    assert_eq!(parse_ok(&sum, "1234"), 10);
}

#[test]
fn test_bounded_repetition() {
    with_chars("aaaa", |ctx| {
        assert_eq!(ch('a').some(3).parse(ctx).unwrap().len(), 3);
        assert_eq!(ctx.at(), 3);
    });
    assert_eq!(parse_ok(&ch('a').some(0), "aaa"), Vec::<char>::new());
    assert!(ch('a').some_range(3, 1).is_err());
    let two_to_three = ch('a').some_range(2, 3).unwrap();
    assert!(crate::test_helpers::parse(&two_to_three, "a").is_err());
    assert_eq!(parse_ok(&two_to_three, "aaaa").len(), 3);
    assert_eq!(parse_ok(&ch('a').repeat(2), "aaa"), vec!['a', 'a']);
    assert!(crate::test_helpers::parse(&ch('a').repeat(2), "a").is_err());
    assert_eq!(parse_ok(&ch('a').skip_repeat(2).then(&ch('b')), "aab"), 'b');
    assert_eq!(parse_ok(&ch('a').skip_some(5).then(&ch('b')), "aab"), 'b');
}

#[test]
fn test_sep_by() {
    let list = lower().sep_by(&ch(','));
    assert_eq!(parse_ok(&list, ""), Vec::<char>::new());
    assert_eq!(parse_ok(&list, "a,b"), vec!['a', 'b']);
    let e = parse_err(&list, "a,");
    assert_eq!(e.column(), 3);
    assert_eq!(parse_ok(&lower().skip_sep_by1(&ch(',')).then(&get_index()), "a,b,c"), 5);
}

#[test]
fn test_sep_end_by_accepts_trailing_separator() {
    let list = lower().sep_end_by(&ch(',')).followed_by(&eof("EOF"));
    assert_eq!(parse_ok(&list, "a,b,c,"), vec!['a', 'b', 'c']);
    assert_eq!(parse_ok(&list, "a,b,c"), vec!['a', 'b', 'c']);
    assert_eq!(parse_ok(&list, ""), Vec::<char>::new());
    assert!(crate::test_helpers::parse(&lower().sep_end_by1(&ch(',')), ",").is_err());
    assert_eq!(parse_ok(&lower().skip_sep_end_by(&ch(';')).then(&get_index()), "a;b;"), 4);
}

#[test]
fn test_end_by_and_between() {
    assert_eq!(parse_ok(&lower().end_by(&ch(';')), "a;b;"), vec!['a', 'b']);
    assert!(crate::test_helpers::parse(&lower().end_by1(&ch(';')), "").is_err());
    let e = parse_err(&lower().end_by(&ch(';')).followed_by(&eof("EOF")), "a;b");
    assert_eq!(e.column(), 4);
    assert_eq!(parse_ok(&number().between(&ch('['), &ch(']')), "[12]"), 12);
}

// === Trace hooks ===

#[test]
fn test_traced_reports_each_application() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&events);
    let traced = digit().traced(move |e| log.lock().unwrap().push((e.ok(), e.steps, e.offset)));
    assert_eq!(parse_ok(&traced.many(), "12"), vec!['1', '2']);
    assert_eq!(*events.lock().unwrap(), vec![(true, 1, 1), (true, 1, 1), (false, 0, 0)]);
}

#[test]
fn test_trace_event_leading_text() {
    let event = |source: &'static str, index| TraceEvent::<()> {
        outcome: Ok(&()),
        source,
        index,
        steps: 0,
        offset: 0,
    };
    assert_eq!(event("abc", 1).leading(), "bc");
    assert_eq!(event("abc", 3).leading(), "<EOF>");
    let long = "x".repeat(40);
    let long: &'static str = Box::leak(long.into_boxed_str());
    assert_eq!(event(long, 0).leading(), format!("{}...", "x".repeat(32)));
}

#[test]
fn test_parsers_are_shared_across_threads() {
    let p = number();
    std::thread::scope(|s| {
        for n in 0..4_i64 {
            let p = &p;
            s.spawn(move || assert_eq!(parse_ok(p, &n.to_string()), n));
        }
    });
}

proptest! {
    #[test]
    fn prop_peek_never_moves(source in "[a-c1]{0,8}") {
        let p = lower().many().peek();
        with_chars(&source, |ctx| {
            let before = ctx.snapshot();
            let _ = p.parse(ctx);
            prop_assert_eq!(ctx.snapshot(), before);
            Ok(())
        })?;
    }

    #[test]
    fn prop_sep_by_round_trips(letters in proptest::collection::vec("[a-z]", 0..6)) {
        let source = letters.join(",");
        let expected: Vec<char> = letters.iter().filter_map(|s| s.chars().next()).collect();
        prop_assert_eq!(parse_ok(&lower().sep_by(&ch(',')), &source), expected);
    }
}
